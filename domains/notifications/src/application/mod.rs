//! Use cases for the Notifications domain

pub mod notifications;
