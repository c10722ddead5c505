//! Shared utilities, configuration, and error handling for Worklane
//!
//! This crate provides common functionality used across the Worklane application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Response envelopes and pagination
//! - Custom axum extractors

pub mod config;
pub mod error;
pub mod extractors;
pub mod response;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use response::{ApiResponse, Page, PageMeta, Paginated};
