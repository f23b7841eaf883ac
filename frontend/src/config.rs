//! Application configuration.
//!
//! Centralized configuration for the order upload frontend.
//! The backend base URL is the only setting taken from the environment;
//! it is read at compile time so trunk builds can target any deployment.

use std::time::Duration;

/// Backend API base URL.
///
/// Set `ORDERS_API_BASE_URL` when building to override the default.
pub const BASE_URL: &str = match option_env!("ORDERS_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

/// Upload endpoint, relative to [`BASE_URL`].
pub const UPLOAD_PATH: &str = "/api/orders/upload";

/// Multipart field holding the file content.
pub const UPLOAD_FIELD: &str = "file";

/// Local storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Application name, used as the document title.
pub const APP_NAME: &str = "CSV File Uploader";

/// Accepted file extensions, lowercase.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

/// `accept` attribute for the file picker.
pub const ACCEPT_ATTRIBUTE: &str = ".csv,.xlsx";

/// Maximum file size for upload (in bytes).
///
/// 10 MB limit, as advertised in the instructions.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Delay before a successful upload clears the selected file.
pub const SUCCESS_RESET_DELAY: Duration = Duration::from_secs(3);

/// Shown when the picked file has an unsupported extension.
pub const FORMAT_ERROR_MESSAGE: &str =
    "Invalid file format. Please upload a CSV or Excel (.xlsx) file.";

/// Shown when the picked file exceeds [`MAX_FILE_SIZE`].
pub const SIZE_ERROR_MESSAGE: &str = "File is too large. Maximum file size is 10MB.";

/// Returned when a file is picked while an upload is running.
pub const UPLOAD_IN_PROGRESS_MESSAGE: &str =
    "An upload is already in progress. Wait for it to finish before choosing another file.";

/// Headline for every failed upload.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file. Please try again.";

/// Detail used when the backend gave no per-row errors.
pub const UNEXPECTED_ERROR_DETAIL: &str = "An unexpected error occurred.";
