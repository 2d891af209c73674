//! Board Controller
//!
//! Bootstraps the board from the store and handles card intents. Every
//! handler mutates the board first and then syncs with the server; a
//! failed request is returned to the caller but never rolls back the
//! local change.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use leptos_dragdrop::{DragPayload, DropOutcome};
use tracing::{debug, error, info, warn};

use crate::board::{Board, CardOrigin, NodeKey, NodePhase};
use crate::error::{BoardError, BoardResult};
use crate::models::Card;
use crate::store::CardStore;

/// What a title edit ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleOutcome {
    /// Draft was persisted under this id
    Created(String),
    /// Existing card was updated
    Updated,
    /// Create in flight; the edit is sent once the id arrives
    Deferred,
    /// Unsaved card dropped without contacting the server
    Discarded,
    /// Persisted card removed
    Deleted,
}

/// What a drop ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResult {
    Moved,
    Ignored,
}

pub struct BoardController<S: ?Sized> {
    store: Rc<S>,
    board: Rc<RefCell<Board>>,
    notify: Rc<dyn Fn()>,
}

impl<S: ?Sized> Clone for BoardController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
            board: Rc::clone(&self.board),
            notify: Rc::clone(&self.notify),
        }
    }
}

impl<S: CardStore + ?Sized> BoardController<S> {
    pub fn new(store: Rc<S>, board: Board) -> Self {
        Self {
            store,
            board: Rc::new(RefCell::new(board)),
            notify: Rc::new(|| {}),
        }
    }

    /// Called after every board mutation
    pub fn with_notifier(mut self, notify: impl Fn() + 'static) -> Self {
        self.notify = Rc::new(notify);
        self
    }

    pub fn board(&self) -> Ref<'_, Board> {
        self.board.borrow()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        let result = {
            let mut board = self.board.borrow_mut();
            f(&mut board)
        };
        (self.notify)();
        result
    }

    /// Load every card from the server and render it in server order.
    ///
    /// Cards whose category has no column are logged and skipped.
    pub async fn bootstrap(&self) -> BoardResult<usize> {
        let cards = self.store.list_cards().await?;
        let shown = self.mutate(|board| {
            let mut shown = 0;
            for card in &cards {
                match board.materialize(card, CardOrigin::Stored) {
                    Ok(_) => shown += 1,
                    Err(e) => warn!("[BOARD] skipping card {}: {}", card.id, e),
                }
            }
            shown
        });
        info!(
            "[BOARD] loaded {} of {} cards, board holds {}",
            shown,
            cards.len(),
            self.board.borrow().len()
        );
        Ok(shown)
    }

    /// Put an empty draft card in `category` for the user to type into
    pub fn create_new_card(&self, category: &str) -> BoardResult<NodeKey> {
        let draft = Card::draft(category);
        let key = self.mutate(|board| board.materialize(&draft, CardOrigin::Draft))?;
        debug!("[BOARD] draft {} in {}", draft.id, category);
        Ok(key)
    }

    pub fn clear_autofocus(&self, key: NodeKey) {
        self.mutate(|board| board.clear_autofocus(key));
    }

    /// Title field committed a new value
    pub async fn title_changed(&self, key: NodeKey, raw_title: &str) -> BoardResult<TitleOutcome> {
        let title = raw_title.trim();
        let phase = self
            .board
            .borrow()
            .node(key)
            .map(|n| n.phase)
            .ok_or(BoardError::InvalidCardId)?;

        if title.is_empty() {
            return self.discard(key, phase).await;
        }

        self.mutate(|board| board.set_title(key, title));
        match phase {
            NodePhase::Draft => self.persist_new(key).await,
            NodePhase::Creating { .. } => {
                self.mutate(|board| board.set_phase(key, NodePhase::Creating { dirty: true }));
                Ok(TitleOutcome::Deferred)
            }
            NodePhase::Persisted => {
                let card = self.board.borrow().extract(key).ok_or(BoardError::InvalidCardId)?;
                self.store.update_card(&card).await?;
                debug!("[BOARD] updated card {}", card.id);
                Ok(TitleOutcome::Updated)
            }
        }
    }

    async fn persist_new(&self, key: NodeKey) -> BoardResult<TitleOutcome> {
        let (card, draft) = {
            let board = self.board.borrow();
            let card = board.extract(key).ok_or(BoardError::InvalidCardId)?;
            let draft = board.node(key).map(|n| n.temp_id.clone()).unwrap_or_default();
            (card, draft)
        };
        self.mutate(|board| board.set_phase(key, NodePhase::Creating { dirty: false }));

        let id = match self.store.create_card(&card).await {
            Ok(id) => id,
            Err(e) => {
                // Stays on screen; the next edit tries the create again
                self.mutate(|board| board.set_phase(key, NodePhase::Draft));
                return Err(e.into());
            }
        };

        let phase = self.board.borrow().node(key).map(|n| n.phase);
        match phase {
            None => {
                // Title was cleared while the create was in flight
                info!("[BOARD] draft {} abandoned during create, deleting {}", draft, id);
                self.store.delete_card(&id).await?;
                Ok(TitleOutcome::Discarded)
            }
            Some(phase) => {
                self.mutate(|board| board.assign_id(key, &id));
                info!("[BOARD] created card {} from draft {}", id, draft);
                if phase == (NodePhase::Creating { dirty: true }) {
                    let card = self.board.borrow().extract(key).ok_or(BoardError::InvalidCardId)?;
                    self.store.update_card(&card).await?;
                }
                Ok(TitleOutcome::Created(id))
            }
        }
    }

    /// Empty title: drop a draft locally, delete a persisted card
    async fn discard(&self, key: NodeKey, phase: NodePhase) -> BoardResult<TitleOutcome> {
        let removed = self.mutate(|board| board.remove(key));
        match (phase, removed.as_ref().and_then(|n| n.card_id())) {
            (NodePhase::Persisted, Some(id)) => {
                self.store.delete_card(id).await?;
                info!("[BOARD] deleted card {} (title cleared)", id);
                Ok(TitleOutcome::Deleted)
            }
            _ => Ok(TitleOutcome::Discarded),
        }
    }

    /// Delete affordance clicked. The node goes away before the server answers.
    pub async fn delete_clicked(&self, key: NodeKey) -> BoardResult<()> {
        let id = self
            .board
            .borrow()
            .node(key)
            .and_then(|n| n.card_id())
            .map(str::to_string)
            .ok_or(BoardError::InvalidCardId)?;

        self.mutate(|board| board.remove(key));
        self.store.delete_card(&id).await?;
        info!("[BOARD] deleted card {}", id);
        Ok(())
    }

    /// Payload for dragging the node at `key`; unsaved cards cannot be dragged
    pub fn drag_payload(&self, key: NodeKey) -> BoardResult<DragPayload> {
        let board = self.board.borrow();
        let node = board.node(key).ok_or(BoardError::InvalidCardId)?;
        if node.card_id().is_none() {
            return Err(BoardError::InvalidCardId);
        }
        let category = board.category_of(key).ok_or(BoardError::InvalidCardId)?;
        Ok(DragPayload {
            item_id: node.dom_id.clone(),
            source_zone: category.to_string(),
        })
    }

    /// Apply a resolved drop: move the node now, then send the update
    pub async fn drop_card(&self, outcome: DropOutcome) -> BoardResult<DropResult> {
        let (item_id, to) = match outcome {
            DropOutcome::Malformed => return Err(BoardError::MalformedGesture),
            DropOutcome::SameZone { .. } => return Ok(DropResult::Ignored),
            DropOutcome::Commit { item_id, to, .. } => (item_id, to),
        };

        let key = self
            .board
            .borrow()
            .find_by_dom_id(&item_id)
            .ok_or(BoardError::InvalidCardId)?;
        if self.board.borrow().category_of(key) == Some(to.as_str()) {
            return Ok(DropResult::Ignored);
        }

        self.mutate(|board| board.move_to(key, &to))?;
        let mut card = self.board.borrow().extract(key).ok_or(BoardError::InvalidCardId)?;
        card.category = to;
        self.store.update_card(&card).await?;
        info!("[BOARD] moved card {} to {}", card.id, card.category);
        Ok(DropResult::Moved)
    }
}

/// Log a handler failure. Nothing is surfaced beyond the log.
pub fn report(action: &str, err: &BoardError) {
    match err {
        BoardError::Transport(_) => error!("[BOARD] {} failed: {}", action, err),
        BoardError::MalformedGesture => debug!("[DND] {} ignored: {}", action, err),
        _ => warn!("[BOARD] {} failed: {}", action, err),
    }
}
