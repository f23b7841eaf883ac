//! Order Upload - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading order spreadsheets (CSV or XLSX)
//! to the orders backend and reporting rows it refused.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App (Router)                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /       HomePage                                            │
//! │          ├── Header (session indicator)                      │
//! │          ├── Hero (title, description)                       │
//! │          ├── UploadCard ── UploadMachine ── ApiClient        │
//! │          └── Footer                                          │
//! │  /*any   NotFound (back to home)                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Build-time settings and user-facing messages
//! - [`types`] - Common types (SelectedFile, UploadStatus, errors)
//! - [`state`] - Upload widget state machine
//! - [`components`] - UI components (Header, UploadCard, NotFound, etc.)
//! - [`services`] - Backend communication (HTTP client, upload, error reports)

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod state;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    FileKind, SelectedFile,
    // Status
    ErrorReport, UploadStatus,
    // Errors
    ApiError, ApiResult, SelectionError,
};

// State
pub use state::{drive_upload, UploadMachine, UploadTicket};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <Routes>
                <Route path="/" view=HomePage/>
                <Route path="/*any" view=NotFound/>
            </Routes>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <Header/>

        <main class="container">
            <Hero/>
            <UploadCard/>
        </main>

        <Footer/>
    }
}
