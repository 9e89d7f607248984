//! TalentGrid Rust Client
//!
//! A Rust client library for the TalentGrid job-marketplace REST API,
//! with automatic bearer-token attachment, one-shot session renewal on 401,
//! and typed endpoint groups for jobs, applications, documents and more.

pub mod cancel;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod session_store;

pub use cancel::CancelToken;
pub use client::{
    ApiClient, ApiResponse, FilePart, RequestBody, RequestOptions, SessionEvent, SessionState,
};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use session::SessionTokens;
pub use session_store::{FileStore, MemoryStore, SessionStore};

/// Re-export commonly used types
pub use reqwest::Method;
