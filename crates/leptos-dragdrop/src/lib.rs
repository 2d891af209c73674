//! Leptos DragDrop Utilities
//!
//! Native HTML5 drag-and-drop of items between named zones.
//! `DragState` is the gesture state machine; the `make_on_*` factories
//! bind browser drag events to it and carry the payload in `DataTransfer`.

use std::collections::{BTreeMap, BTreeSet};

use leptos::prelude::*;
use web_sys::DragEvent;

/// DataTransfer key for the dragged item id
pub const ITEM_KEY: &str = "cardID";
/// DataTransfer key for the zone the drag started in
pub const ZONE_KEY: &str = "columnType";

/// What a drag carries from its source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
    pub item_id: String,
    pub source_zone: String,
}

/// Result of dropping onto a zone
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Item should move between two different zones
    Commit { item_id: String, from: String, to: String },
    /// Dropped back onto the zone it came from
    SameZone { item_id: String, zone: String },
    /// Item id, source or target missing
    Malformed,
}

/// State of the single in-flight gesture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
    payload: Option<DragPayload>,
    /// Zones highlighted as valid targets while dragging
    valid_zones: BTreeSet<String>,
    /// Zones under the pointer, with their enter/leave depth. Drag events
    /// bubble up from child elements, so a zone stays hovered until every
    /// enter has been matched by a leave.
    hovered: BTreeMap<String, u32>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    pub fn is_valid_target(&self, zone: &str) -> bool {
        self.valid_zones.contains(zone)
    }

    pub fn is_hovered(&self, zone: &str) -> bool {
        self.hovered.contains_key(zone)
    }

    /// Idle -> Dragging. Every zone other than the source becomes a valid target.
    pub fn start<'a>(&mut self, payload: DragPayload, zones: impl IntoIterator<Item = &'a str>) {
        self.valid_zones = zones
            .into_iter()
            .filter(|zone| *zone != payload.source_zone)
            .map(str::to_string)
            .collect();
        self.hovered.clear();
        self.payload = Some(payload);
    }

    pub fn enter(&mut self, zone: &str) {
        if self.is_dragging() {
            *self.hovered.entry(zone.to_string()).or_insert(0) += 1;
        }
    }

    pub fn leave(&mut self, zone: &str) {
        if let Some(depth) = self.hovered.get_mut(zone) {
            *depth -= 1;
            if *depth == 0 {
                self.hovered.remove(zone);
            }
        }
    }

    /// Resolve a drop on `to`. Ids read from the transfer win; the
    /// in-memory payload fills in whatever the browser did not hand back.
    pub fn drop_on(&mut self, item_id: Option<&str>, from: Option<&str>, to: Option<&str>) -> DropOutcome {
        if let Some(zone) = to {
            self.hovered.remove(zone);
        }
        let fallback = self.payload.as_ref();
        let item_id = non_blank(item_id).or_else(|| fallback.map(|p| p.item_id.as_str()));
        let from = non_blank(from).or_else(|| fallback.map(|p| p.source_zone.as_str()));
        resolve_drop(item_id, from, to)
    }

    /// Back to idle; clears every highlight whether or not a drop happened
    pub fn end(&mut self) {
        *self = Self::default();
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Decide what a drop means. Blank values count as missing.
pub fn resolve_drop(item_id: Option<&str>, from: Option<&str>, to: Option<&str>) -> DropOutcome {
    match (non_blank(item_id), non_blank(from), non_blank(to)) {
        (Some(item_id), Some(from), Some(to)) if from == to => DropOutcome::SameZone {
            item_id: item_id.to_string(),
            zone: to.to_string(),
        },
        (Some(item_id), Some(from), Some(to)) => DropOutcome::Commit {
            item_id: item_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        },
        _ => DropOutcome::Malformed,
    }
}

// ========================
// Leptos bindings
// ========================

/// DnD state signal shared by draggables and zones
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub state: RwSignal<DragState>,
}

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        state: RwSignal::new(DragState::default()),
    }
}

impl DndSignals {
    pub fn is_valid_target(&self, zone: &str) -> bool {
        self.state.with(|s| s.is_valid_target(zone))
    }

    pub fn is_hovered(&self, zone: &str) -> bool {
        self.state.with(|s| s.is_hovered(zone))
    }

    pub fn is_dragging_item(&self, item_id: &str) -> bool {
        self.state
            .with(|s| s.payload().is_some_and(|p| !item_id.is_empty() && p.item_id == item_id))
    }
}

/// Create dragstart handler for a draggable item.
///
/// `payload` is evaluated when the drag begins; returning `None` cancels it.
pub fn make_on_dragstart<F>(dnd: DndSignals, zones: Vec<String>, payload: F) -> impl Fn(DragEvent) + 'static
where
    F: Fn() -> Option<DragPayload> + 'static,
{
    move |ev: DragEvent| {
        let Some(payload) = payload() else {
            ev.prevent_default();
            return;
        };
        if let Some(transfer) = ev.data_transfer() {
            let _ = transfer.set_data(ITEM_KEY, &payload.item_id);
            let _ = transfer.set_data(ZONE_KEY, &payload.source_zone);
            transfer.set_effect_allowed("move");
        }
        log::debug!("[DND] start item={} zone={}", payload.item_id, payload.source_zone);
        dnd.state.update(|s| s.start(payload, zones.iter().map(String::as_str)));
    }
}

/// Create dragenter handler for a zone
pub fn make_on_dragenter(dnd: DndSignals, zone: String) -> impl Fn(DragEvent) + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        dnd.state.update(|s| s.enter(&zone));
    }
}

/// Create dragleave handler for a zone
pub fn make_on_dragleave(dnd: DndSignals, zone: String) -> impl Fn(DragEvent) + 'static {
    move |_ev: DragEvent| {
        dnd.state.update(|s| s.leave(&zone));
    }
}

/// Create dragover handler; zones must cancel dragover to accept drops
pub fn make_on_dragover() -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
    }
}

/// Create drop handler for a zone
pub fn make_on_drop<F>(dnd: DndSignals, zone: String, on_drop: F) -> impl Fn(DragEvent) + 'static
where
    F: Fn(DropOutcome) + 'static,
{
    move |ev: DragEvent| {
        ev.prevent_default();
        let (item_id, from) = match ev.data_transfer() {
            Some(transfer) => (transfer.get_data(ITEM_KEY).ok(), transfer.get_data(ZONE_KEY).ok()),
            None => (None, None),
        };

        let mut outcome = DropOutcome::Malformed;
        dnd.state.update(|s| {
            outcome = s.drop_on(item_id.as_deref(), from.as_deref(), Some(&zone));
        });
        log::debug!("[DND] drop on {}: {:?}", zone, outcome);
        on_drop(outcome);
    }
}

/// Create dragend handler for a draggable item
pub fn make_on_dragend(dnd: DndSignals) -> impl Fn(DragEvent) + Copy + 'static {
    move |_ev: DragEvent| {
        dnd.state.update(DragState::end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: [&str; 3] = ["todo", "doing", "done"];

    fn payload(id: &str, zone: &str) -> DragPayload {
        DragPayload {
            item_id: id.to_string(),
            source_zone: zone.to_string(),
        }
    }

    #[test]
    fn test_start_marks_other_zones() {
        let mut state = DragState::default();
        state.start(payload("card-id-1", "todo"), ZONES);

        assert!(state.is_dragging());
        assert!(!state.is_valid_target("todo"));
        assert!(state.is_valid_target("doing"));
        assert!(state.is_valid_target("done"));
    }

    #[test]
    fn test_hover_only_while_dragging() {
        let mut state = DragState::default();
        state.enter("doing");
        assert!(!state.is_hovered("doing"));

        state.start(payload("card-id-1", "todo"), ZONES);
        state.enter("doing");
        assert!(state.is_hovered("doing"));
        state.leave("doing");
        assert!(!state.is_hovered("doing"));
    }

    #[test]
    fn test_leave_from_child_keeps_hover() {
        let mut state = DragState::default();
        state.start(payload("card-id-1", "todo"), ZONES);

        // Pointer enters the zone, then moves onto a card inside it
        state.enter("done");
        state.enter("done");
        state.leave("done");
        assert!(state.is_hovered("done"));

        state.leave("done");
        assert!(!state.is_hovered("done"));

        // Stray leave without a matching enter
        state.leave("done");
        assert!(!state.is_hovered("done"));
    }

    #[test]
    fn test_drop_clears_nested_hover() {
        let mut state = DragState::default();
        state.start(payload("card-id-1", "todo"), ZONES);
        state.enter("done");
        state.enter("done");

        state.drop_on(Some("card-id-1"), Some("todo"), Some("done"));
        assert!(!state.is_hovered("done"));
    }

    #[test]
    fn test_drop_on_other_zone_commits() {
        let mut state = DragState::default();
        state.start(payload("card-id-1", "todo"), ZONES);
        state.enter("done");

        let outcome = state.drop_on(Some("card-id-1"), Some("todo"), Some("done"));
        assert_eq!(
            outcome,
            DropOutcome::Commit {
                item_id: "card-id-1".to_string(),
                from: "todo".to_string(),
                to: "done".to_string(),
            }
        );
        assert!(!state.is_hovered("done"));
    }

    #[test]
    fn test_drop_on_source_zone_is_noop() {
        let outcome = resolve_drop(Some("card-id-1"), Some("todo"), Some("todo"));
        assert!(matches!(outcome, DropOutcome::SameZone { .. }));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        assert_eq!(resolve_drop(None, Some("todo"), Some("done")), DropOutcome::Malformed);
        assert_eq!(resolve_drop(Some("card-id-1"), Some(""), Some("done")), DropOutcome::Malformed);
        assert_eq!(resolve_drop(Some("card-id-1"), Some("todo"), None), DropOutcome::Malformed);
    }

    #[test]
    fn test_drop_falls_back_to_payload() {
        let mut state = DragState::default();
        state.start(payload("card-id-7", "doing"), ZONES);

        let outcome = state.drop_on(Some(""), None, Some("done"));
        assert!(matches!(outcome, DropOutcome::Commit { ref item_id, .. } if item_id == "card-id-7"));
    }

    #[test]
    fn test_end_clears_everything() {
        let mut state = DragState::default();
        state.start(payload("card-id-1", "todo"), ZONES);
        state.enter("done");
        state.end();

        assert_eq!(state, DragState::default());
        assert!(!state.is_valid_target("done"));
    }
}
