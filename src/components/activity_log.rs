//! Activity Log Component
//!
//! Collapsible footer listing the most recent log records.

use leptos::prelude::*;

use crate::context::use_board;

const SHOWN_RECORDS: usize = 20;

#[component]
pub fn ActivityLog() -> impl IntoView {
    let ctx = use_board();
    let (open, set_open) = signal(false);

    let lines = move || {
        let _ = ctx.revision.get();
        ctx.recent_logs(SHOWN_RECORDS)
            .into_iter()
            .map(|record| {
                let class = format!("log-line log-{}", record.level.as_str().to_lowercase());
                view! { <li class=class>{record.to_string()}</li> }
            })
            .collect_view()
    };

    view! {
        <footer class="activity-log">
            <button class="log-toggle" on:click=move |_| set_open.update(|v| *v = !*v)>
                {move || if open.get() { "Hide activity" } else { "Show activity" }}
            </button>
            <Show when=move || open.get()>
                <ul class="log-lines">{lines}</ul>
            </Show>
        </footer>
    }
}
