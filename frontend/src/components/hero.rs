//! Hero section component

use leptos::*;

use crate::APP_NAME;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{APP_NAME}</h1>
            <p class="subtitle">
                "Import orders in bulk from a CSV or Excel spreadsheet. "
                "Rows the server cannot import are listed with the reason."
            </p>
        </div>
    }
}
