//! Board Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;
use leptos_dragdrop::DndSignals;
use rolling_logger::{LogRecord, RollingHandle};

use crate::board::Board;
use crate::controller::BoardController;
use crate::store::CardStore;

pub type SharedController = BoardController<dyn CardStore>;

/// Board-wide handles provided via context
#[derive(Clone, Copy)]
pub struct BoardContext {
    controller: StoredValue<SharedController, LocalStorage>,
    /// Bumped after every board mutation
    pub revision: ReadSignal<u32>,
    /// Drag gesture shared by cards and columns
    pub dnd: DndSignals,
    categories: StoredValue<Vec<String>>,
    logs: StoredValue<Option<RollingHandle>>,
}

impl BoardContext {
    pub fn new(
        controller: SharedController,
        revision: ReadSignal<u32>,
        dnd: DndSignals,
        categories: Vec<String>,
        logs: Option<RollingHandle>,
    ) -> Self {
        Self {
            controller: StoredValue::new_local(controller),
            revision,
            dnd,
            categories: StoredValue::new(categories),
            logs: StoredValue::new(logs),
        }
    }

    pub fn controller(&self) -> SharedController {
        self.controller.get_value()
    }

    /// Read the board, re-running the caller whenever it changes
    pub fn with_board<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        self.revision.track();
        self.controller.with_value(|c| f(&c.board()))
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.get_value()
    }

    /// Most recent log records, newest first
    pub fn recent_logs(&self, limit: usize) -> Vec<LogRecord> {
        self.logs.with_value(|logs| {
            logs.as_ref()
                .map(|handle| handle.recent().into_iter().rev().take(limit).collect())
                .unwrap_or_default()
        })
    }
}

/// Get the board context
pub fn use_board() -> BoardContext {
    expect_context::<BoardContext>()
}
