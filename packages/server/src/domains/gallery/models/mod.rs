pub mod gallery_entry;

pub use gallery_entry::GalleryEntry;
