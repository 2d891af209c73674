//! Board View-Model
//!
//! The board is the single source of truth for what is on screen: ordered
//! columns, each holding its card nodes. Views render from it, and every
//! mutation goes through it first.

use crate::config::Category;
use crate::error::{BoardError, BoardResult};
use crate::models::{card_from_node, dom_id_for, Card, CARD_ID_PREFIX};

/// Local render key of a card node; stable for the node's whole life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

/// Where a node is in its persistence lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Created locally, nothing sent yet
    Draft,
    /// Create request in flight; `dirty` if edited since it was sent
    Creating { dirty: bool },
    /// Has a durable server id
    Persisted,
}

/// How a card reaches the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOrigin {
    /// New card the user is about to type into
    Draft,
    /// Card loaded from the server
    Stored,
}

/// A rendered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNode {
    pub key: NodeKey,
    /// `card-id-<id>` once persisted, empty before
    pub dom_id: String,
    /// Client-generated token of a draft
    pub temp_id: String,
    pub title: String,
    pub phase: NodePhase,
    /// Title field should grab focus when mounted
    pub autofocus: bool,
}

impl CardNode {
    /// Server id, if any
    pub fn card_id(&self) -> Option<&str> {
        self.dom_id
            .strip_prefix(CARD_ID_PREFIX)
            .filter(|id| !id.is_empty())
    }
}

/// One category container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub category: String,
    pub label: String,
    pub cards: Vec<CardNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    columns: Vec<Column>,
    next_key: u64,
}

impl Board {
    pub fn new(categories: &[Category]) -> Self {
        Self {
            columns: categories
                .iter()
                .map(|c| Column {
                    category: c.key.clone(),
                    label: c.label.clone(),
                    cards: Vec::new(),
                })
                .collect(),
            next_key: 0,
        }
    }

    pub fn column(&self, category: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.category == category)
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a node for `card` and append it to its category's column.
    ///
    /// Fails without touching the board if the column does not exist.
    pub fn materialize(&mut self, card: &Card, origin: CardOrigin) -> BoardResult<NodeKey> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.category == card.category)
            .ok_or_else(|| BoardError::CategoryNotFound(card.category.clone()))?;

        self.next_key += 1;
        let key = NodeKey(self.next_key);
        let node = match origin {
            CardOrigin::Draft => CardNode {
                key,
                dom_id: String::new(),
                temp_id: card.id.clone(),
                title: card.title.clone(),
                phase: NodePhase::Draft,
                autofocus: true,
            },
            CardOrigin::Stored => CardNode {
                key,
                dom_id: dom_id_for(&card.id),
                temp_id: String::new(),
                title: card.title.clone(),
                phase: if card.has_id() { NodePhase::Persisted } else { NodePhase::Draft },
                autofocus: false,
            },
        };
        column.cards.push(node);
        Ok(key)
    }

    fn locate(&self, key: NodeKey) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, column)| {
            column
                .cards
                .iter()
                .position(|n| n.key == key)
                .map(|ni| (ci, ni))
        })
    }

    pub fn node(&self, key: NodeKey) -> Option<&CardNode> {
        let (ci, ni) = self.locate(key)?;
        Some(&self.columns[ci].cards[ni])
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut CardNode> {
        let (ci, ni) = self.locate(key)?;
        Some(&mut self.columns[ci].cards[ni])
    }

    /// Category of the column holding `key`
    pub fn category_of(&self, key: NodeKey) -> Option<&str> {
        let (ci, _) = self.locate(key)?;
        Some(&self.columns[ci].category)
    }

    /// Find a node by its DOM id attribute
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeKey> {
        if dom_id.is_empty() {
            return None;
        }
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|n| n.dom_id == dom_id)
            .map(|n| n.key)
    }

    /// Current state of the card rendered at `key`
    pub fn extract(&self, key: NodeKey) -> Option<Card> {
        let (ci, ni) = self.locate(key)?;
        let column = &self.columns[ci];
        Some(card_from_node(&column.cards[ni], &column.category))
    }

    /// Every card in display order
    #[cfg(test)]
    pub fn cards(&self) -> Vec<Card> {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter().map(|n| card_from_node(n, &column.category)))
            .collect()
    }

    pub fn remove(&mut self, key: NodeKey) -> Option<CardNode> {
        let (ci, ni) = self.locate(key)?;
        Some(self.columns[ci].cards.remove(ni))
    }

    /// Move a node to the end of another column
    pub fn move_to(&mut self, key: NodeKey, category: &str) -> BoardResult<()> {
        let target = self
            .columns
            .iter()
            .position(|c| c.category == category)
            .ok_or_else(|| BoardError::CategoryNotFound(category.to_string()))?;
        let node = self.remove(key).ok_or(BoardError::InvalidCardId)?;
        self.columns[target].cards.push(node);
        Ok(())
    }

    pub fn set_title(&mut self, key: NodeKey, title: &str) -> bool {
        match self.node_mut(key) {
            Some(node) => {
                node.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_phase(&mut self, key: NodeKey, phase: NodePhase) -> bool {
        match self.node_mut(key) {
            Some(node) => {
                node.phase = phase;
                true
            }
            None => false,
        }
    }

    /// Record the server id on a node, marking it persisted
    pub fn assign_id(&mut self, key: NodeKey, id: &str) -> bool {
        match self.node_mut(key) {
            Some(node) => {
                node.dom_id = dom_id_for(id);
                node.phase = NodePhase::Persisted;
                true
            }
            None => false,
        }
    }

    /// Focus is a one-shot request
    pub fn clear_autofocus(&mut self, key: NodeKey) {
        if let Some(node) = self.node_mut(key) {
            node.autofocus = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_categories;

    fn board() -> Board {
        Board::new(&parse_categories("todo,doing,done"))
    }

    fn stored(id: &str, title: &str, category: &str) -> Card {
        Card {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_materialize_then_extract_round_trips() {
        let mut board = board();
        let cards = vec![
            stored("1", "Buy milk", "todo"),
            stored("2", "Write report", "doing"),
            stored("abc", "", "done"),
        ];
        let keys: Vec<_> = cards
            .iter()
            .map(|c| board.materialize(c, CardOrigin::Stored).unwrap())
            .collect();

        for (key, card) in keys.into_iter().zip(&cards) {
            assert_eq!(board.extract(key).as_ref(), Some(card));
        }
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_materialize_unknown_category_leaves_board_untouched() {
        let mut board = board();
        let before = board.clone();
        let err = board
            .materialize(&stored("1", "x", "archive"), CardOrigin::Stored)
            .unwrap_err();

        assert_eq!(err, BoardError::CategoryNotFound("archive".to_string()));
        assert_eq!(board, before);
    }

    #[test]
    fn test_draft_node_has_no_dom_id_and_wants_focus() {
        let mut board = board();
        let draft = Card::draft("todo");
        let key = board.materialize(&draft, CardOrigin::Draft).unwrap();

        let node = board.node(key).unwrap();
        assert_eq!(node.dom_id, "");
        assert_eq!(node.temp_id, draft.id);
        assert_eq!(node.phase, NodePhase::Draft);
        assert!(node.autofocus);
        assert_eq!(board.extract(key).unwrap().id, "");

        board.clear_autofocus(key);
        assert!(!board.node(key).unwrap().autofocus);
    }

    #[test]
    fn test_server_order_is_kept() {
        let mut board = board();
        for id in ["3", "1", "2"] {
            board.materialize(&stored(id, id, "todo"), CardOrigin::Stored).unwrap();
        }
        let ids: Vec<_> = board.cards().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_move_to_changes_column() {
        let mut board = board();
        let key = board.materialize(&stored("1", "a", "todo"), CardOrigin::Stored).unwrap();

        board.move_to(key, "done").unwrap();
        assert_eq!(board.category_of(key), Some("done"));
        assert!(board.column("todo").unwrap().cards.is_empty());
        assert_eq!(board.extract(key).unwrap().category, "done");
    }

    #[test]
    fn test_move_to_missing_column_keeps_node() {
        let mut board = board();
        let key = board.materialize(&stored("1", "a", "todo"), CardOrigin::Stored).unwrap();

        assert!(board.move_to(key, "nowhere").is_err());
        assert_eq!(board.category_of(key), Some("todo"));
    }

    #[test]
    fn test_assign_id_and_find() {
        let mut board = board();
        let key = board.materialize(&Card::draft("doing"), CardOrigin::Draft).unwrap();
        assert_eq!(board.find_by_dom_id(""), None);

        assert!(board.assign_id(key, "42"));
        assert_eq!(board.find_by_dom_id("card-id-42"), Some(key));
        let node = board.node(key).unwrap();
        assert_eq!(node.card_id(), Some("42"));
        assert_eq!(node.phase, NodePhase::Persisted);
    }

    #[test]
    fn test_remove() {
        let mut board = board();
        let key = board.materialize(&stored("1", "a", "todo"), CardOrigin::Stored).unwrap();
        assert!(board.remove(key).is_some());
        assert!(board.remove(key).is_none());
        assert!(board.is_empty());
        assert!(!board.set_title(key, "gone"));
    }
}
