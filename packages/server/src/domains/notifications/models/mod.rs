pub mod notification_job;

pub use notification_job::{
    NotificationJob, NotificationKind, NotificationStatus, DEFAULT_MAX_ATTEMPTS,
};
