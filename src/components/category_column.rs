//! Category Column Component
//!
//! A column holding the cards of one category. Its card container is the
//! drop zone for moving cards in from other columns.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_dragenter, make_on_dragleave, make_on_dragover, make_on_drop};

use crate::components::CardView;
use crate::config::Category;
use crate::context::use_board;
use crate::controller::report;

#[component]
pub fn CategoryColumn(
    category: Category,
    /// Invoked with the category key when "add card" is clicked
    on_add: Callback<String>,
) -> impl IntoView {
    let ctx = use_board();
    let key = category.key.clone();

    let cards = {
        let key = key.clone();
        move || {
            ctx.with_board(|b| {
                b.column(&key)
                    .map(|c| c.cards.iter().map(|n| n.key).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
        }
    };
    let count = {
        let key = key.clone();
        move || ctx.with_board(|b| b.column(&key).map_or(0, |c| c.cards.len()))
    };

    let container_class = {
        let key = key.clone();
        move || {
            let mut c = String::from("card-container");
            if ctx.dnd.is_valid_target(&key) { c.push_str(" hoverable"); }
            if ctx.dnd.is_hovered(&key) { c.push_str(" hover"); }
            c
        }
    };

    let on_drop = make_on_drop(ctx.dnd, key.clone(), move |outcome| {
        let ctrl = ctx.controller();
        spawn_local(async move {
            if let Err(e) = ctrl.drop_card(outcome).await {
                report("move card", &e);
            }
        });
    });

    let add_key = key.clone();

    view! {
        <section class="card-column" data-card-category=key.clone()>
            <header class="card-column-header">
                <h2>{category.label}</h2>
                <span class="card-count">{count}</span>
            </header>
            <div
                class=container_class
                on:dragenter=make_on_dragenter(ctx.dnd, key.clone())
                on:dragleave=make_on_dragleave(ctx.dnd, key.clone())
                on:dragover=make_on_dragover()
                on:drop=on_drop
            >
                <For
                    each=cards
                    key=|node_key| *node_key
                    children=move |node_key| view! { <CardView node_key=node_key /> }
                />
            </div>
            <button class="add-card-btn" on:click=move |_| on_add.run(add_key.clone())>
                "+ Add card"
            </button>
        </section>
    }
}
