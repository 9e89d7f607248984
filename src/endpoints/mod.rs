//! Typed endpoint groups
//!
//! Each group maps logical operations to an HTTP verb and path on the shared
//! [`ApiClient`](crate::client::ApiClient). Groups carry no state and no
//! retry logic; every failure propagates from the core unchanged.

pub mod analytics;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod companies;
pub mod documents;
pub mod jobs;
pub mod notifications;
pub mod users;

use serde::{Deserialize, Serialize};

/// Paged collection envelope used by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}
