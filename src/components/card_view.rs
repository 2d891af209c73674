//! Card View Component
//!
//! One draggable card: editable title plus a delete affordance.

use leptos::html::Textarea;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_dragend, make_on_dragstart};
use wasm_bindgen::JsCast;

use crate::board::NodeKey;
use crate::context::use_board;
use crate::controller::report;

#[component]
pub fn CardView(node_key: NodeKey) -> impl IntoView {
    let ctx = use_board();

    let node = move || ctx.with_board(|b| b.node(node_key).cloned());
    let title = move || node().map(|n| n.title).unwrap_or_default();
    let dom_id = move || node().map(|n| n.dom_id).filter(|id| !id.is_empty());

    // New cards grab focus once so typing can start right away
    let title_ref = NodeRef::<Textarea>::new();
    Effect::new(move |_| {
        let wants_focus = node().is_some_and(|n| n.autofocus);
        if let (true, Some(el)) = (wants_focus, title_ref.get()) {
            let _ = el.focus();
            ctx.controller().clear_autofocus(node_key);
        }
    });

    let on_change = move |ev: web_sys::Event| {
        let value = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
            .map(|t| t.value())
            .unwrap_or_default();
        let ctrl = ctx.controller();
        spawn_local(async move {
            if let Err(e) = ctrl.title_changed(node_key, &value).await {
                report("save title", &e);
            }
        });
    };

    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let ctrl = ctx.controller();
        spawn_local(async move {
            if let Err(e) = ctrl.delete_clicked(node_key).await {
                report("delete card", &e);
            }
        });
    };

    let on_dragstart = make_on_dragstart(ctx.dnd, ctx.categories(), move || {
        match ctx.controller().drag_payload(node_key) {
            Ok(payload) => Some(payload),
            Err(e) => {
                report("drag card", &e);
                None
            }
        }
    });

    let card_class = move || {
        let mut c = String::from("card");
        if dom_id().is_some_and(|id| ctx.dnd.is_dragging_item(&id)) {
            c.push_str(" dragging");
        }
        c
    };

    view! {
        <div
            class=card_class
            id=dom_id
            draggable="true"
            on:dragstart=on_dragstart
            on:dragend=make_on_dragend(ctx.dnd)
        >
            <div class="card-delete" on:click=on_delete>"x"</div>
            <textarea
                class="card-title"
                name="title"
                rows="3"
                node_ref=title_ref
                prop:value=title
                on:change=on_change
            ></textarea>
        </div>
    }
}
