//! Footer component

use leptos::*;

use crate::{ACCEPTED_EXTENSIONS, BASE_URL, MAX_FILE_SIZE};

#[component]
pub fn Footer() -> impl IntoView {
    let formats = ACCEPTED_EXTENSIONS.join(", ").to_uppercase();
    let limit_mb = MAX_FILE_SIZE / (1024 * 1024);

    view! {
        <footer>
            <div>
                "Accepted formats: " {formats} " • Max " {limit_mb} " MB"
            </div>
            <div class="footer-api">"Orders API: " <code>{BASE_URL}</code></div>
        </footer>
    }
}
