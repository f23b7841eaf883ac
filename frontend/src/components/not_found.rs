//! Catch-all 404 page.

use leptos::*;
use leptos_router::use_navigate;
use web_sys::MouseEvent;

#[component]
pub fn NotFound() -> impl IntoView {
    let navigate = use_navigate();

    let back_home = move |ev: MouseEvent| {
        ev.prevent_default();
        navigate("/", Default::default());
    };

    view! {
        <div id="error-page">
            <main class="not-found">
                <p class="not-found-code">"404"</p>
                <h1>"Page not found"</h1>
                <p class="not-found-text">
                    "Sorry, we couldn’t find the page you’re looking for."
                </p>
                <div class="not-found-actions">
                    <a href="/" class="back-link" on:click=back_home>
                        <span aria-hidden="true">"←"</span>
                        " Back to home"
                    </a>
                </div>
            </main>
        </div>
    }
}
