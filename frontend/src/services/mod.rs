//! Backend services.
//!
//! This module provides services for external communication:
//!
//! # Services
//!
//! - [`api`] - HTTP client with bearer authentication
//! - [`upload`] - Order file upload to the backend
//! - [`errors`] - Normalization of upload failures for display

pub mod api;
pub mod upload;
pub mod errors;

pub use api::*;
pub use upload::*;
pub use errors::*;
