//! Normalization of upload failures into display-ready reports.
//!
//! The backend reports rejected rows as
//! `{ "errors": [{ "orderNumber": "A1", "messages": ["bad date"] }] }`,
//! either in a 2xx body (partial failure) or attached to a non-2xx
//! response. Everything else collapses to a generic report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{UNEXPECTED_ERROR_DETAIL, UPLOAD_FAILED_MESSAGE};
use crate::types::{ApiError, ErrorReport};

/// One rejected row from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// Order number of the rejected row
    #[serde(alias = "identifier")]
    pub order_number: String,
    /// Reasons the row was rejected
    #[serde(default)]
    pub messages: Vec<String>,
}

impl RowError {
    /// `"<orderNumber>: <messages joined by ', '>"`
    pub fn detail(&self) -> String {
        if self.messages.is_empty() {
            self.order_number.clone()
        } else {
            format!("{}: {}", self.order_number, self.messages.join(", "))
        }
    }
}

/// Extract the structured `errors` array from a response body.
///
/// Returns `None` when the body carries no `errors` array. Entries that do
/// not look like row errors are skipped.
pub fn structured_errors(body: &Value) -> Option<Vec<RowError>> {
    let items = body.get("errors")?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value::<RowError>(item.clone()).ok())
            .collect(),
    )
}

impl ErrorReport {
    /// Build a report from a response body, structured or not.
    pub fn from_body(body: Option<&Value>) -> Self {
        let Some(body) = body else {
            return Self::unexpected(UPLOAD_FAILED_MESSAGE);
        };

        match structured_errors(body) {
            Some(rows) if !rows.is_empty() => Self {
                message: UPLOAD_FAILED_MESSAGE.to_string(),
                details: rows.iter().map(RowError::detail).collect(),
            },
            Some(_) => Self::unexpected(UPLOAD_FAILED_MESSAGE),
            None => {
                let headline = body
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(UPLOAD_FAILED_MESSAGE);
                Self::unexpected(headline)
            }
        }
    }

    /// Build a report from a failed request.
    pub fn from_api_error(err: &ApiError) -> Self {
        Self::from_body(err.body())
    }

    fn unexpected(headline: &str) -> Self {
        Self {
            message: headline.to_string(),
            details: vec![UNEXPECTED_ERROR_DETAIL.to_string()],
        }
    }
}
