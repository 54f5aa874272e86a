//! Twitter API module.
//!
//! This module provides:
//! - HTTP client for the v1.1 REST API
//! - App-only (bearer token) authentication
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

pub use client::{build_http_client, TwitterApi, UserRef, API_BASE};
pub use types::*;
