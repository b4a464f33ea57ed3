//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod meili_client;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostmarkMailer, ServerDeps};
pub use meili_client::{MeiliSearchIndex, NoopSearchIndex};
pub use test_dependencies::{MockMailer, MockSearchIndex, TestDependencies, TEST_ADMIN_EMAIL};
pub use traits::*;
