//! Upload widget state machine.
//!
//! ```text
//! idle ──select(valid)──▶ idle(file) ──begin_upload──▶ uploading
//!   ▲                                                   │      │
//!   │                                          finish(ok)    finish(err)
//!   │                                                   ▼      ▼
//!   └────────────── reset ◀──────────────────── success    error
//! ```
//!
//! An invalid selection goes straight to `error` and drops the file.
//! After success the file is cleared by a deferred call to
//! [`UploadMachine::clear_after_success`]; the status stays `success`.
//!
//! Selections are refused while uploading. Every accepted or rejected
//! selection and every reset starts a new attempt generation. Progress and
//! completions tagged with an older generation are ignored, so a
//! superseded upload can never overwrite fresh state.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::{RwSignal, SignalUpdate};
use serde_json::Value;

use crate::config::MAX_FILE_SIZE;
use crate::services::api::ProgressCallback;
use crate::services::errors::structured_errors;
use crate::services::upload::{UploadResponse, UploadTransport};
use crate::types::{
    ApiResult, ErrorReport, FileKind, SelectedFile, SelectionError, UploadStatus,
};

/// Handed out by [`UploadMachine::begin_upload`] for the upload in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadTicket<H> {
    /// Attempt generation the upload belongs to
    pub attempt: u64,
    /// File to send
    pub handle: H,
}

/// Client-side state of one upload widget.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadMachine<H> {
    file: Option<SelectedFile<H>>,
    status: UploadStatus,
    progress: u8,
    error: Option<ErrorReport>,
    success_message: Option<String>,
    dragging: bool,
    attempt: u64,
}

impl<H> Default for UploadMachine<H> {
    fn default() -> Self {
        Self {
            file: None,
            status: UploadStatus::Idle,
            progress: 0,
            error: None,
            success_message: None,
            dragging: false,
            attempt: 0,
        }
    }
}

impl<H: Clone> UploadMachine<H> {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn file(&self) -> Option<&SelectedFile<H>> {
        self.file.as_ref()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Percentage in `0..=100`.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        self.error.as_ref()
    }

    /// Headline of the current error, empty when there is none.
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map(|e| e.message.as_str()).unwrap_or("")
    }

    /// Message the backend attached to a successful upload.
    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Whether [`begin_upload`](Self::begin_upload) would start an upload.
    pub fn can_upload(&self) -> bool {
        self.file.is_some()
            && !matches!(self.status, UploadStatus::Uploading | UploadStatus::Success)
    }

    /// Whether the cancel control has anything to clear.
    pub fn can_cancel(&self) -> bool {
        self.file.is_some() && !self.is_uploading()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Highlight flag toggled by drag-over and drag-leave.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Accept or reject a picked or dropped file.
    ///
    /// Accepting stores the file and clears any previous error. Rejecting
    /// drops any stored file and moves to `error` with a fixed message.
    /// While an upload is in flight every file is refused and state is left
    /// untouched, so the running attempt still settles.
    pub fn select(&mut self, name: &str, size: u64, handle: H) -> Result<(), SelectionError> {
        if self.is_uploading() {
            log::warn!("🚫 Ignored {} while an upload is in flight", name);
            self.dragging = false;
            return Err(SelectionError::UploadInProgress);
        }

        self.attempt += 1;
        self.dragging = false;
        self.progress = 0;
        self.success_message = None;

        let outcome = match FileKind::from_name(name) {
            None => Err(SelectionError::UnsupportedFormat),
            Some(_) if size > MAX_FILE_SIZE => Err(SelectionError::TooLarge { size }),
            Some(kind) => Ok(kind),
        };

        match outcome {
            Ok(kind) => {
                log::info!("📄 Selected {} ({}, {} bytes)", name, kind.extension(), size);
                self.file = Some(SelectedFile {
                    name: name.to_string(),
                    size,
                    kind,
                    handle,
                });
                self.status = UploadStatus::Idle;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("🚫 Rejected {}: {}", name, err);
                self.file = None;
                self.status = UploadStatus::Error;
                self.error = Some(ErrorReport::message(err.to_string()));
                Err(err)
            }
        }
    }

    /// Enter `uploading` and return what to send.
    ///
    /// Returns `None` without touching state when there is no file, an
    /// upload is already in flight, or this file was already uploaded.
    pub fn begin_upload(&mut self) -> Option<UploadTicket<H>> {
        if !self.can_upload() {
            log::debug!("Upload ignored in status {:?}", self.status);
            return None;
        }
        let handle = self.file.as_ref()?.handle.clone();

        self.progress = 0;
        self.error = None;
        self.success_message = None;
        self.status = UploadStatus::Uploading;

        Some(UploadTicket {
            attempt: self.attempt,
            handle,
        })
    }

    /// Apply a transport progress event to the upload in flight.
    pub fn record_progress(&mut self, attempt: u64, loaded: u64, total: u64) {
        if attempt != self.attempt || !self.is_uploading() || total == 0 {
            return;
        }
        let percent = percent_of(loaded, total);
        if percent > self.progress {
            self.progress = percent;
            if percent % 25 == 0 {
                log::debug!("⏳ Upload {}%", percent);
            }
        }
    }

    /// Settle the upload in flight.
    ///
    /// Returns the attempt to clear later when the upload fully succeeded.
    /// A 2xx body carrying an `errors` array counts as a failure.
    pub fn finish(&mut self, attempt: u64, outcome: ApiResult<Value>) -> Option<u64> {
        if attempt != self.attempt || !self.is_uploading() {
            log::debug!("Ignoring completion of superseded attempt {}", attempt);
            return None;
        }

        let report = match outcome {
            Ok(body) if structured_errors(&body).is_some() => {
                Err(ErrorReport::from_body(Some(&body)))
            }
            Ok(body) => Ok(body),
            Err(err) => {
                log::error!("❌ Upload failed: {}", err);
                Err(ErrorReport::from_api_error(&err))
            }
        };

        match report {
            Ok(body) => {
                let response: UploadResponse = serde_json::from_value(body).unwrap_or_default();
                log::info!("✅ Upload successful");
                self.progress = 100;
                self.status = UploadStatus::Success;
                self.success_message = response.message;
                Some(attempt)
            }
            Err(report) => {
                log::warn!("⚠️ Upload rejected: {}", report);
                self.status = UploadStatus::Error;
                self.error = Some(report);
                None
            }
        }
    }

    /// Deferred clear after a success. Stale attempts are ignored.
    pub fn clear_after_success(&mut self, attempt: u64) -> bool {
        if attempt != self.attempt || self.status != UploadStatus::Success {
            return false;
        }
        self.file = None;
        true
    }

    /// Back to a fresh widget, whatever the current state.
    pub fn reset(&mut self) {
        let attempt = self.attempt + 1;
        *self = Self {
            attempt,
            ..Self::default()
        };
    }
}

/// `round(loaded * 100 / total)`, capped at 100.
pub fn percent_of(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (loaded as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

// =============================================================================
// Async driver
// =============================================================================

/// Shared owner of an [`UploadMachine`].
///
/// `None` means the owner is gone (for a signal: the widget unmounted).
pub trait MachineCell<H>: Clone + 'static {
    fn update_machine<R>(&self, f: impl FnOnce(&mut UploadMachine<H>) -> R) -> Option<R>;
}

impl<H: 'static> MachineCell<H> for Rc<RefCell<UploadMachine<H>>> {
    fn update_machine<R>(&self, f: impl FnOnce(&mut UploadMachine<H>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl<H: 'static> MachineCell<H> for RwSignal<UploadMachine<H>> {
    fn update_machine<R>(&self, f: impl FnOnce(&mut UploadMachine<H>) -> R) -> Option<R> {
        self.try_update(f)
    }
}

/// Run one upload attempt end to end.
///
/// Returns the attempt to clear later when the upload succeeded.
pub async fn drive_upload<H, T, C>(cell: C, transport: &T) -> Option<u64>
where
    H: Clone + 'static,
    T: UploadTransport<H>,
    C: MachineCell<H>,
{
    let ticket = cell.update_machine(|m| m.begin_upload()).flatten()?;
    let attempt = ticket.attempt;

    let progress_cell = cell.clone();
    let on_progress: ProgressCallback = Rc::new(move |loaded, total| {
        progress_cell.update_machine(|m| m.record_progress(attempt, loaded, total));
    });

    let outcome = transport.upload(&ticket.handle, on_progress).await;
    cell.update_machine(|m| m.finish(attempt, outcome)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FORMAT_ERROR_MESSAGE, UNEXPECTED_ERROR_DETAIL, UPLOAD_FAILED_MESSAGE};
    use crate::types::ApiError;
    use futures::executor::block_on;
    use futures::future::{FutureExt, LocalBoxFuture};
    use serde_json::json;

    type Machine = UploadMachine<&'static str>;

    fn with_file(name: &'static str) -> Machine {
        let mut machine = Machine::new();
        machine.select(name, 2048, name).unwrap();
        machine
    }

    fn assert_fresh(machine: &Machine) {
        assert!(machine.file().is_none());
        assert_eq!(machine.status(), UploadStatus::Idle);
        assert_eq!(machine.progress(), 0);
        assert_eq!(machine.error_message(), "");
    }

    #[test]
    fn test_select_is_case_insensitive() {
        for name in ["DATA.CSV", "data.csv", "orders.XLSX"] {
            let mut machine = Machine::new();
            assert!(machine.select(name, 10, name).is_ok());
            assert_eq!(machine.file().unwrap().name, name);
            assert_eq!(machine.status(), UploadStatus::Idle);
        }
    }

    #[test]
    fn test_select_rejects_other_formats() {
        for name in ["report.pdf", "noext"] {
            let mut machine = with_file("good.csv");
            let err = machine.select(name, 10, name).unwrap_err();
            assert_eq!(err, SelectionError::UnsupportedFormat);
            assert!(machine.file().is_none());
            assert_eq!(machine.status(), UploadStatus::Error);
            assert_eq!(machine.error_message(), FORMAT_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_select_rejects_oversized_file() {
        let mut machine = Machine::new();
        let err = machine
            .select("big.csv", MAX_FILE_SIZE + 1, "big.csv")
            .unwrap_err();
        assert!(matches!(err, SelectionError::TooLarge { .. }));
        assert!(machine.file().is_none());

        assert!(machine.select("edge.csv", MAX_FILE_SIZE, "edge.csv").is_ok());
    }

    #[test]
    fn test_valid_selection_clears_error() {
        let mut machine = Machine::new();
        let _ = machine.select("report.pdf", 10, "report.pdf");
        assert_eq!(machine.status(), UploadStatus::Error);

        machine.select("orders.csv", 10, "orders.csv").unwrap();
        assert_eq!(machine.status(), UploadStatus::Idle);
        assert!(machine.error().is_none());
        assert_eq!(machine.error_message(), "");
    }

    #[test]
    fn test_begin_upload_guards() {
        let mut machine = Machine::new();
        assert!(machine.begin_upload().is_none());
        assert_eq!(machine.status(), UploadStatus::Idle);

        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();
        assert_eq!(ticket.handle, "orders.csv");
        assert_eq!(machine.status(), UploadStatus::Uploading);

        // re-entrant call while in flight
        assert!(machine.begin_upload().is_none());
        assert_eq!(machine.attempt(), ticket.attempt);
    }

    #[test]
    fn test_progress_events() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        machine.record_progress(ticket.attempt, 50, 100);
        assert_eq!(machine.progress(), 50);
        machine.record_progress(ticket.attempt, 100, 100);
        assert_eq!(machine.progress(), 100);
    }

    #[test]
    fn test_progress_is_monotonic_and_rounded() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        machine.record_progress(ticket.attempt, 1, 3);
        assert_eq!(machine.progress(), 33);
        machine.record_progress(ticket.attempt, 2, 3);
        assert_eq!(machine.progress(), 67);
        machine.record_progress(ticket.attempt, 1, 3);
        assert_eq!(machine.progress(), 67);
        machine.record_progress(ticket.attempt, 10, 0);
        assert_eq!(machine.progress(), 67);
        machine.record_progress(ticket.attempt + 1, 3, 3);
        assert_eq!(machine.progress(), 67);
    }

    #[test]
    fn test_partial_failure_under_2xx() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        let body = json!({ "errors": [{ "orderNumber": "A1", "messages": ["bad date"] }] });
        assert_eq!(machine.finish(ticket.attempt, Ok(body)), None);

        assert_eq!(machine.status(), UploadStatus::Error);
        assert_eq!(machine.error().unwrap().details, vec!["A1: bad date"]);
        assert!(machine.file().is_some());
    }

    #[test]
    fn test_select_during_upload_is_refused() {
        let mut machine = with_file("a.csv");
        let first = machine.begin_upload().unwrap();

        let err = machine.select("b.csv", 10, "b.csv").unwrap_err();
        assert_eq!(err, SelectionError::UploadInProgress);
        assert_eq!(machine.status(), UploadStatus::Uploading);
        assert_eq!(machine.file().unwrap().name, "a.csv");
        assert!(machine.begin_upload().is_none());

        // an invalid file does not disturb the running attempt either
        assert!(machine.select("report.pdf", 10, "report.pdf").is_err());
        assert_eq!(machine.status(), UploadStatus::Uploading);
        assert!(machine.error().is_none());

        let clear = machine.finish(first.attempt, Ok(json!({ "message": "imported 5" })));
        assert_eq!(clear, Some(first.attempt));
        assert_eq!(machine.status(), UploadStatus::Success);
        assert_eq!(machine.success_message(), Some("imported 5"));
    }

    #[test]
    fn test_plain_text_2xx_is_success() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        let outcome = crate::services::api::classify_response(200, "File uploaded");
        assert!(machine.finish(ticket.attempt, outcome).is_some());
        assert_eq!(machine.status(), UploadStatus::Success);
        assert!(machine.error().is_none());
    }

    #[test]
    fn test_empty_errors_with_message_under_2xx() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        let body = json!({ "errors": [], "message": "nothing imported" });
        assert_eq!(machine.finish(ticket.attempt, Ok(body)), None);
        assert_eq!(machine.status(), UploadStatus::Error);
        assert_eq!(machine.error_message(), UPLOAD_FAILED_MESSAGE);
        assert_eq!(
            machine.error().unwrap().details,
            vec![UNEXPECTED_ERROR_DETAIL]
        );
    }

    #[test]
    fn test_network_rejection() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();

        machine.finish(ticket.attempt, Err(ApiError::Network("offline".into())));
        assert_eq!(machine.status(), UploadStatus::Error);
        assert_eq!(
            machine.error().unwrap().details,
            vec![UNEXPECTED_ERROR_DETAIL]
        );
        // retry is allowed after a failed attempt
        assert!(machine.can_upload());
    }

    #[test]
    fn test_success_then_deferred_clear() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();
        machine.record_progress(ticket.attempt, 10, 100);

        let clear = machine.finish(ticket.attempt, Ok(json!({ "message": "3 orders imported" })));
        assert_eq!(clear, Some(ticket.attempt));
        assert_eq!(machine.status(), UploadStatus::Success);
        assert_eq!(machine.progress(), 100);
        assert_eq!(machine.success_message(), Some("3 orders imported"));
        assert!(machine.file().is_some());
        assert!(!machine.can_upload());

        assert!(machine.clear_after_success(ticket.attempt));
        assert!(machine.file().is_none());
        assert_eq!(machine.status(), UploadStatus::Success);
    }

    #[test]
    fn test_deferred_clear_spares_newer_selection() {
        let mut machine = with_file("orders.csv");
        let ticket = machine.begin_upload().unwrap();
        machine.finish(ticket.attempt, Ok(Value::Null));

        machine.select("next.xlsx", 10, "next.xlsx").unwrap();
        assert!(!machine.clear_after_success(ticket.attempt));
        assert_eq!(machine.file().unwrap().name, "next.xlsx");
    }

    #[test]
    fn test_reset_from_every_state() {
        let mut idle = with_file("orders.csv");
        idle.reset();
        assert_fresh(&idle);

        let mut rejected = Machine::new();
        let _ = rejected.select("report.pdf", 1, "report.pdf");
        rejected.reset();
        assert_fresh(&rejected);

        let mut uploading = with_file("orders.csv");
        let ticket = uploading.begin_upload().unwrap();
        uploading.record_progress(ticket.attempt, 40, 100);
        uploading.reset();
        assert_fresh(&uploading);

        // the superseded upload cannot resurrect state
        assert_eq!(uploading.finish(ticket.attempt, Ok(Value::Null)), None);
        assert_fresh(&uploading);

        let mut done = with_file("orders.csv");
        let ticket = done.begin_upload().unwrap();
        done.finish(ticket.attempt, Ok(Value::Null));
        done.reset();
        assert_fresh(&done);
    }

    #[test]
    fn test_dragging_flag() {
        let mut machine = Machine::new();
        machine.set_dragging(true);
        assert!(machine.is_dragging());
        machine.select("orders.csv", 1, "orders.csv").unwrap();
        assert!(!machine.is_dragging());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 100), 0);
        assert_eq!(percent_of(995, 1000), 100);
        assert_eq!(percent_of(150, 100), 100);
        assert_eq!(percent_of(5, 0), 0);
    }

    /// Replays scripted progress events, then resolves with a canned outcome.
    struct ScriptedTransport {
        events: Vec<(u64, u64)>,
        outcome: ApiResult<Value>,
        seen: Rc<RefCell<Vec<u8>>>,
        cell: Rc<RefCell<Machine>>,
    }

    impl UploadTransport<&'static str> for ScriptedTransport {
        fn upload<'a>(
            &'a self,
            _file: &'a &'static str,
            on_progress: ProgressCallback,
        ) -> LocalBoxFuture<'a, ApiResult<Value>> {
            async move {
                for (loaded, total) in &self.events {
                    on_progress(*loaded, *total);
                    self.seen.borrow_mut().push(self.cell.borrow().progress());
                }
                self.outcome.clone()
            }
            .boxed_local()
        }
    }

    fn scripted(cell: &Rc<RefCell<Machine>>, outcome: ApiResult<Value>) -> ScriptedTransport {
        ScriptedTransport {
            events: vec![(50, 100), (100, 100)],
            outcome,
            seen: Rc::new(RefCell::new(Vec::new())),
            cell: cell.clone(),
        }
    }

    #[test]
    fn test_drive_upload_success() {
        let cell = Rc::new(RefCell::new(with_file("orders.csv")));
        let transport = scripted(&cell, Ok(json!({})));

        let clear = block_on(drive_upload(cell.clone(), &transport));

        assert_eq!(*transport.seen.borrow(), vec![50, 100]);
        assert_eq!(clear, Some(cell.borrow().attempt()));
        assert_eq!(cell.borrow().status(), UploadStatus::Success);
        assert_eq!(cell.borrow().progress(), 100);
    }

    #[test]
    fn test_drive_upload_http_error_with_rows() {
        let cell = Rc::new(RefCell::new(with_file("orders.xlsx")));
        let transport = scripted(
            &cell,
            Err(ApiError::Http {
                status: 422,
                body: Some(json!({
                    "errors": [{ "orderNumber": "Z3", "messages": ["unknown customer", "bad total"] }]
                })),
            }),
        );

        assert_eq!(block_on(drive_upload(cell.clone(), &transport)), None);
        let machine = cell.borrow();
        assert_eq!(machine.status(), UploadStatus::Error);
        assert_eq!(
            machine.error().unwrap().details,
            vec!["Z3: unknown customer, bad total"]
        );
    }

    #[test]
    fn test_drive_upload_without_file_is_noop() {
        let cell = Rc::new(RefCell::new(Machine::new()));
        let transport = scripted(&cell, Ok(json!({})));

        assert_eq!(block_on(drive_upload(cell.clone(), &transport)), None);
        assert!(transport.seen.borrow().is_empty());
        assert_eq!(cell.borrow().status(), UploadStatus::Idle);
    }
}
