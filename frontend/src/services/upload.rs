//! Order file upload to the backend.

use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_sys::{File, FormData};

use super::api::{ApiClient, ProgressCallback};
use super::errors::RowError;
use crate::config::{UPLOAD_FIELD, UPLOAD_PATH};
use crate::types::{ApiError, ApiResult};

/// Body returned by the upload endpoint.
///
/// The only field the frontend relies on is `errors`: when present, the
/// upload is treated as failed even under a 2xx status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Rows the backend refused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RowError>>,
    /// Optional human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Sends a selected file somewhere and reports progress.
///
/// The widget drives uploads through this trait so its state machine can
/// be exercised without a browser.
pub trait UploadTransport<H> {
    fn upload<'a>(
        &'a self,
        file: &'a H,
        on_progress: ProgressCallback,
    ) -> LocalBoxFuture<'a, ApiResult<Value>>;
}

impl UploadTransport<File> for ApiClient {
    fn upload<'a>(
        &'a self,
        file: &'a File,
        on_progress: ProgressCallback,
    ) -> LocalBoxFuture<'a, ApiResult<Value>> {
        upload_order_file(self, file, on_progress).boxed_local()
    }
}

/// Upload an order file as multipart form data under field `file`.
pub async fn upload_order_file(
    client: &ApiClient,
    file: &File,
    on_progress: ProgressCallback,
) -> ApiResult<Value> {
    let form_data = FormData::new()
        .map_err(|e| ApiError::Browser(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
        .map_err(|e| ApiError::Browser(format!("Failed to append file: {:?}", e)))?;

    log::info!(
        "📤 Uploading {} ({} bytes) to {}",
        file.name(),
        file.size(),
        client.url(UPLOAD_PATH)
    );

    client
        .post_form(UPLOAD_PATH, &form_data, Some(on_progress))
        .await
}
