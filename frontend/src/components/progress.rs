use leptos::*;

#[component]
pub fn ProgressBar(
    /// Percentage in `0..=100`
    progress: Signal<u8>,
    #[prop(default = "")] label: &'static str,
) -> impl IntoView {
    view! {
        <div class="progress-section">
            <div class="progress-labels">
                <span>{label}</span>
                <span>{move || format!("{}%", progress.get())}</span>
            </div>
            <div
                class="progress-bar"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=move || progress.get().to_string()
            >
                <div
                    class="progress-fill"
                    style=move || format!("width: {}%;", progress.get())
                ></div>
            </div>
        </div>
    }
}
