//! Notifications domain: user notifications and the activity feed

pub mod api;
pub mod application;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Activity, ActivityFilter, NewActivity, NewNotification, Notification, NotificationFilter,
};
pub use repository::{
    notify, record_activity, ActivityRepository, DynActivityRepository, DynNotificationRepository,
    InMemoryActivityRepository, InMemoryNotificationRepository, NotificationRepository,
    PgActivityRepository, PgNotificationRepository,
};

// Re-export API wiring
pub use api::routes;
pub use api::NotificationsState;
