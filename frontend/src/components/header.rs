use leptos::*;
use leptos_router::A;

use crate::services::Session;

#[component]
pub fn Header() -> impl IntoView {
    let signed_in = Session::from_local_storage().is_authenticated();

    view! {
        <header>
            <div class="header-left">
                <A href="/" class="logo">"ORDERS"</A>
            </div>
            <div class="header-right">
                <div class="session-status" class:connected=signed_in>
                    <span class="session-dot" class:connected=signed_in></span>
                    <span>{if signed_in { "Signed in" } else { "Not signed in" }}</span>
                </div>
            </div>
        </header>
    }
}
