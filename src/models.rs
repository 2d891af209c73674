//! Frontend Models
//!
//! The card entity, its wire shape, and extraction from a rendered node.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::board::CardNode;

/// Prefix of the id attribute on a rendered card
pub const CARD_ID_PREFIX: &str = "card-id-";

/// Card data structure (matches the REST resource)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Server id once persisted; empty or a temporary token before that
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    pub category: String,
}

impl Card {
    /// A brand-new, unsaved card with a client-generated temporary id
    pub fn draft(category: &str) -> Self {
        Self {
            id: temp_id(),
            title: String::new(),
            category: category.to_string(),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCard<'a> {
    pub title: &'a str,
    pub category: &'a str,
}

impl<'a> From<&'a Card> for NewCard<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            title: &card.title,
            category: &card.category,
        }
    }
}

/// Create response; only the assigned id is used
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCard {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

/// Timestamp-based temporary id
pub fn temp_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// DOM id attribute for a server id; empty ids map to no attribute
pub fn dom_id_for(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!("{}{}", CARD_ID_PREFIX, id)
    }
}

/// Read a card back out of its rendered node and enclosing column.
///
/// A node that has not been persisted yet yields an empty id.
pub fn card_from_node(node: &CardNode, column_category: &str) -> Card {
    Card {
        id: node
            .dom_id
            .strip_prefix(CARD_ID_PREFIX)
            .unwrap_or(&node.dom_id)
            .to_string(),
        title: node.title.clone(),
        category: column_category.to_string(),
    }
}

/// Decode a card listing record by record. Records that do not look
/// like a card are logged and skipped so the rest still render.
pub fn cards_from_values(values: Vec<Value>) -> Vec<Card> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Card>(value) {
            Ok(card) => Some(card),
            Err(e) => {
                warn!("[STORE] skipping card record #{}: {}", index, e);
                None
            }
        })
        .collect()
}

/// A null title is treated as empty
fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Servers differ on whether ids are strings or numbers
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<WireId>::deserialize(deserializer)? {
        Some(WireId::Text(s)) => s,
        Some(WireId::Int(n)) => n.to_string(),
        Some(WireId::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CardNode, NodeKey, NodePhase};

    fn node(dom_id: &str, title: &str) -> CardNode {
        CardNode {
            key: NodeKey(1),
            dom_id: dom_id.to_string(),
            temp_id: String::new(),
            title: title.to_string(),
            phase: NodePhase::Persisted,
            autofocus: false,
        }
    }

    #[test]
    fn test_extract_strips_prefix() {
        let card = card_from_node(&node("card-id-42", "Buy milk"), "todo");
        assert_eq!(card.id, "42");
        assert_eq!(card.title, "Buy milk");
        assert_eq!(card.category, "todo");
    }

    #[test]
    fn test_extract_tolerates_missing_id() {
        let card = card_from_node(&node("", "draft"), "doing");
        assert_eq!(card.id, "");
        assert!(!card.has_id());
    }

    #[test]
    fn test_dom_id_for() {
        assert_eq!(dom_id_for("42"), "card-id-42");
        assert_eq!(dom_id_for(""), "");
    }

    #[test]
    fn test_draft_card() {
        let card = Card::draft("todo");
        assert!(card.title.is_empty());
        assert_eq!(card.category, "todo");
        assert!(card.id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let cards: Vec<Card> = serde_json::from_str(
            r#"[{"id":42,"title":"a","category":"todo"},{"id":"x1","title":"b","category":"done"}]"#,
        )
        .unwrap();
        assert_eq!(cards[0].id, "42");
        assert_eq!(cards[1].id, "x1");

        let created: CreatedCard = serde_json::from_str(r#"{"id":7,"title":"a"}"#).unwrap();
        assert_eq!(created.id, "7");
    }

    #[test]
    fn test_null_title_is_empty() {
        let card: Card = serde_json::from_str(r#"{"id":1,"title":null,"category":"todo"}"#).unwrap();
        assert_eq!(card.title, "");
        assert_eq!(card.id, "1");
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let values: Vec<Value> = serde_json::from_str(
            r#"[
                {"id":1,"title":null,"category":"todo"},
                {"id":2,"title":"no column"},
                "not a card",
                {"id":3,"title":"ok","category":"done"}
            ]"#,
        )
        .unwrap();

        let cards = cards_from_values(values);
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(cards[1].title, "ok");
    }

    #[test]
    fn test_new_card_body_has_no_id() {
        let card = Card {
            id: "123".to_string(),
            title: "Buy milk".to_string(),
            category: "todo".to_string(),
        };
        let body = serde_json::to_value(NewCard::from(&card)).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "category": "todo"}));
    }
}
