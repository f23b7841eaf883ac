//! Browser entry point: logging, then the router-backed app.

use leptos::*;
use orders_upload::{App, BASE_URL, UPLOAD_PATH};

pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("📦 Order upload UI, posting to {}{}", BASE_URL, UPLOAD_PATH);

    mount_to_body(App)
}
