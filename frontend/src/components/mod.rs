//! UI Components for the order upload application.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with session indicator
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//! - [`NotFound`] - Catch-all 404 page
//!
//! # Feature Components
//! - [`UploadCard`] - CSV/XLSX upload with drag & drop
//! - [`ProgressBar`] - Upload progress indicator

mod header;
mod hero;
mod upload;
mod progress;
mod footer;
mod not_found;

pub use header::*;
pub use hero::*;
pub use upload::*;
pub use progress::*;
pub use footer::*;
pub use not_found::*;
