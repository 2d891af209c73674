//! Kanban Board App
//!
//! Composes the board: store, controller, drag state and one column per
//! configured category.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::create_dnd_signals;
use rolling_logger::RollingHandle;
use tracing::info;

use crate::board::Board;
use crate::components::{ActivityLog, CategoryColumn};
use crate::config::BoardConfig;
use crate::context::{BoardContext, SharedController};
use crate::controller::report;
use crate::store::{CardStore, RestCardStore};

#[component]
pub fn App(
    config: BoardConfig,
    /// Buffer behind the activity log, if logging was installed
    logs: Option<RollingHandle>,
) -> impl IntoView {
    let (revision, set_revision) = signal(0u32);

    let store: Rc<dyn CardStore> = Rc::new(RestCardStore::new(&config));
    let controller: SharedController = SharedController::new(store, Board::new(&config.categories))
        .with_notifier(move || set_revision.update(|v| *v += 1));

    let ctx = BoardContext::new(
        controller,
        revision,
        create_dnd_signals(),
        config.category_keys(),
        logs,
    );
    provide_context(ctx);

    // Load cards on mount
    Effect::new(move |_| {
        let ctrl = ctx.controller();
        spawn_local(async move {
            match ctrl.bootstrap().await {
                Ok(count) => info!("[APP] board ready with {} cards", count),
                Err(e) => report("load cards", &e),
            }
        });
    });

    // "Add card" entry point, handed to each column explicitly
    let on_add = Callback::new(move |category: String| {
        if let Err(e) = ctx.controller().create_new_card(&category) {
            report("add card", &e);
        }
    });

    view! {
        <div class="board-layout">
            <h1>"Kanban"</h1>
            <main class="board">
                {config
                    .categories
                    .into_iter()
                    .map(|category| view! { <CategoryColumn category=category on_add=on_add /> })
                    .collect_view()}
            </main>
            <ActivityLog />
        </div>
    }
}
