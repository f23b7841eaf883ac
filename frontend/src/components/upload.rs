//! Order file upload card with drag & drop support.
//!
//! Handles file selection, validation, upload with progress, and
//! success / per-row error feedback. All state lives in an
//! [`UploadMachine`] signal; this module only wires DOM events to it.

use gloo_timers::callback::Timeout;
use leptos::*;
use web_sys::{DragEvent, Event, File, HtmlInputElement, MouseEvent};

use super::ProgressBar;
use crate::config::{ACCEPT_ATTRIBUTE, BASE_URL, SUCCESS_RESET_DELAY};
use crate::services::{ApiClient, Session};
use crate::state::{drive_upload, MachineCell, UploadMachine};
use crate::types::UploadStatus;

#[component]
pub fn UploadCard() -> impl IntoView {
    let machine = create_rw_signal(UploadMachine::<File>::new());
    let client = store_value(ApiClient::new(BASE_URL, Session::from_local_storage()));
    let file_input_ref = create_node_ref::<html::Input>();

    // Pending post-success clear. Dropping a Timeout cancels it.
    let clear_timer = store_value(None::<Timeout>);
    on_cleanup(move || {
        clear_timer.try_update_value(|timer| timer.take());
    });

    let cancel_clear = move || {
        clear_timer.try_update_value(|timer| timer.take());
    };

    let schedule_clear = move |attempt: u64| {
        let timeout = Timeout::new(SUCCESS_RESET_DELAY.as_millis() as u32, move || {
            let cleared = machine
                .update_machine(|m| m.clear_after_success(attempt))
                .unwrap_or(false);
            if cleared {
                log::debug!("🧹 Cleared uploaded file");
                clear_file_input(file_input_ref);
            }
        });
        clear_timer.try_update_value(|timer| *timer = Some(timeout));
    };

    let select_file = move |file: File| {
        if machine.with_untracked(|m| m.is_uploading()) {
            log::debug!("Drop zone is locked while uploading");
            clear_file_input(file_input_ref);
            return;
        }
        cancel_clear();
        let name = file.name();
        let size = file.size() as u64;
        let accepted = machine
            .update_machine(|m| m.select(&name, size, file).is_ok())
            .unwrap_or(false);
        if !accepted {
            clear_file_input(file_input_ref);
        }
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            select_file(file);
        }
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        if !machine.with_untracked(|m| m.is_dragging()) {
            machine.update(|m| m.set_dragging(true));
        }
    };

    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        machine.update(|m| m.set_dragging(false));
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        machine.update(|m| m.set_dragging(false));
        let dropped = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0));
        if let Some(file) = dropped {
            select_file(file);
        }
    };

    // the whole drop zone opens the picker
    let open_picker = move |_: MouseEvent| {
        if machine.with_untracked(|m| m.is_uploading()) {
            return;
        }
        if let Some(input) = file_input_ref.get_untracked() {
            input.click();
        }
    };

    let reset = move || {
        cancel_clear();
        machine.update(|m| m.reset());
        clear_file_input(file_input_ref);
    };

    let on_remove = move |ev: MouseEvent| {
        ev.stop_propagation();
        reset();
    };

    let on_upload = move |_: MouseEvent| {
        let client = client.get_value();
        spawn_local(async move {
            if let Some(attempt) = drive_upload(machine, &client).await {
                schedule_clear(attempt);
            }
        });
    };

    let status = move || machine.with(|m| m.status());
    let progress = Signal::derive(move || machine.with(|m| m.progress()));
    let error_details = move || {
        machine
            .with(|m| m.error().map(|e| e.details.clone()))
            .unwrap_or_default()
            .into_iter()
            .enumerate()
    };

    view! {
        <div class=move || format!("card {}", status().css_class())>
            <div class="card-header">
                <h2 class="card-title">"Upload Data File"</h2>
                <p class="card-description">
                    "Upload your CSV or Excel (.xlsx) file to import data"
                </p>
            </div>

            <div class="card-content">
                <Instructions/>

                <div
                    class="drop-zone"
                    class:dragging=move || machine.with(|m| m.is_dragging())
                    class:locked=move || status() == UploadStatus::Uploading
                    on:dragover=on_drag_over
                    on:dragleave=on_drag_leave
                    on:drop=on_drop
                    on:click=open_picker
                >
                    <input
                        type="file"
                        node_ref=file_input_ref
                        accept=ACCEPT_ATTRIBUTE
                        style="display:none"
                        disabled=move || status() == UploadStatus::Uploading
                        on:change=on_file_change
                        on:click=|ev: MouseEvent| ev.stop_propagation()
                    />
                    <div class="upload-icon">"📤"</div>
                    <p class="upload-text">"Drag and drop your file here or click to browse"</p>
                    <p class="upload-hint">"Supports CSV and Excel (.xlsx) files"</p>
                </div>

                {move || {
                    machine
                        .with(|m| m.file().map(|f| (f.name.clone(), f.size_label(), f.kind)))
                        .map(|(name, size, kind)| {
                            view! {
                                <div class="selected-file">
                                    <div class="selected-file-info">
                                        <span class=kind.icon_class()>{kind.emoji()}</span>
                                        <div>
                                            <p class="file-name" title=name.clone()>{name.clone()}</p>
                                            <p class="file-size">{size}</p>
                                        </div>
                                    </div>
                                    <button
                                        class="button ghost"
                                        title="Remove file"
                                        disabled=move || machine.with(|m| m.is_uploading())
                                        on:click=on_remove
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        })
                }}

                <Show when=move || status() == UploadStatus::Uploading>
                    <ProgressBar progress=progress label="Uploading..."/>
                </Show>

                <Show when=move || status() == UploadStatus::Success>
                    <div class="alert alert-success">
                        <div class="alert-title">"✅ Success"</div>
                        <div class="alert-description">
                            {move || {
                                machine
                                    .with(|m| m.success_message().map(str::to_string))
                                    .unwrap_or_else(|| {
                                        "Your file has been uploaded successfully.".to_string()
                                    })
                            }}
                        </div>
                    </div>
                </Show>

                <Show when=move || status() == UploadStatus::Error>
                    <div class="alert alert-error">
                        <div class="alert-title">"❌ Error"</div>
                        <div class="alert-description">
                            {move || machine.with(|m| m.error_message().to_string())}
                        </div>
                        <ul class="error-details">
                            <For
                                each=error_details
                                key=|(idx, detail)| (*idx, detail.clone())
                                children=move |(_, detail)| view! { <li>{detail}</li> }
                            />
                        </ul>
                    </div>
                </Show>
            </div>

            <div class="card-footer">
                <button
                    class="button outline"
                    disabled=move || !machine.with(|m| m.can_cancel())
                    on:click=move |_| reset()
                >
                    "Cancel"
                </button>
                <button
                    class="button primary"
                    disabled=move || !machine.with(|m| m.can_upload())
                    on:click=on_upload
                >
                    {move || if status() == UploadStatus::Uploading {
                        "Uploading..."
                    } else {
                        "Upload File"
                    }}
                </button>
            </div>
        </div>
    }
}

#[component]
fn Instructions() -> impl IntoView {
    view! {
        <div class="instructions">
            <h3>"Instructions:"</h3>
            <ul>
                <li>"File must be in CSV or Excel (.xlsx) format"</li>
                <li>"Maximum file size: 10MB"</li>
                <li>"First row should contain column headers"</li>
                <li>"Drag and drop or click to select your file"</li>
            </ul>
        </div>
    }
}

/// Reset the picker so choosing the same file again fires `change`.
fn clear_file_input(input_ref: NodeRef<html::Input>) {
    if let Some(input) = input_ref.get_untracked() {
        input.set_value("");
    }
}
