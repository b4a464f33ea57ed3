// Business domains
pub mod audit;
pub mod auth;
pub mod gallery;
pub mod notifications;
pub mod submissions;
