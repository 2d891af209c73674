//! Remote Card Store
//!
//! CRUD access to the `cards` collection. One network round trip per
//! call: no retries, no caching, no batching.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::BoardConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::{cards_from_values, Card, CreatedCard, NewCard};

// Unreserved characters (RFC 3986) stay as they are in a path segment
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Remote persistence for cards
#[async_trait(?Send)]
pub trait CardStore {
    /// All cards known to the server, in server order
    async fn list_cards(&self) -> StoreResult<Vec<Card>>;

    /// Persist a new card, returning the server-assigned id
    async fn create_card(&self, card: &Card) -> StoreResult<String>;

    /// Full replace of an existing card
    async fn update_card(&self, card: &Card) -> StoreResult<Card>;

    /// Delete by id; the response body is ignored
    async fn delete_card(&self, id: &str) -> StoreResult<()>;
}

/// [`CardStore`] over the REST endpoint
#[derive(Clone, Debug)]
pub struct RestCardStore {
    client: Client,
    endpoint: String,
}

impl RestCardStore {
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_endpoint(config.cards_endpoint())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/{id}` with the id percent-encoded
    pub fn card_url(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, utf8_percent_encode(id, ID_SEGMENT))
    }
}

async fn check(response: reqwest::Result<Response>) -> StoreResult<Response> {
    let response = response.map_err(|e| StoreError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    response.json::<T>().await.map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl CardStore for RestCardStore {
    async fn list_cards(&self) -> StoreResult<Vec<Card>> {
        debug!("[STORE] GET {}", self.endpoint());
        let response = check(self.client.get(&self.endpoint).send().await).await?;
        // Some backends answer an empty collection with `null`
        let records: Option<Vec<Value>> = decode(response).await?;
        Ok(cards_from_values(records.unwrap_or_default()))
    }

    async fn create_card(&self, card: &Card) -> StoreResult<String> {
        debug!("[STORE] POST {} ({})", self.endpoint(), card.category);
        let response = check(
            self.client
                .post(&self.endpoint)
                .json(&NewCard::from(card))
                .send()
                .await,
        )
        .await?;
        let created: CreatedCard = decode(response).await?;
        if created.id.is_empty() {
            return Err(StoreError::Decode("create response has no id".to_string()));
        }
        Ok(created.id)
    }

    async fn update_card(&self, card: &Card) -> StoreResult<Card> {
        let url = self.card_url(&card.id);
        debug!("[STORE] PUT {}", url);
        let response = check(
            self.client
                .put(&url)
                .json(card)
                .send()
                .await,
        )
        .await?;
        decode(response).await
    }

    async fn delete_card(&self, id: &str) -> StoreResult<()> {
        let url = self.card_url(id);
        debug!("[STORE] DELETE {}", url);
        check(self.client.delete(&url).send().await).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_url_encodes_id() {
        let store = RestCardStore::with_endpoint("http://localhost:8080/cards");
        assert_eq!(store.card_url("42"), "http://localhost:8080/cards/42");
        assert_eq!(store.card_url("a b/c"), "http://localhost:8080/cards/a%20b%2Fc");
    }

    #[test]
    fn test_card_url_keeps_unreserved_chars() {
        let store = RestCardStore::with_endpoint("http://localhost:8080/cards");
        assert_eq!(
            store.card_url("3f2a-b1_c.d~e"),
            "http://localhost:8080/cards/3f2a-b1_c.d~e"
        );
        assert_eq!(store.card_url("a?b#c"), "http://localhost:8080/cards/a%3Fb%23c");
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = BoardConfig::new("http://api.test/", "todo").unwrap();
        let store = RestCardStore::new(&config);
        assert_eq!(store.endpoint(), "http://api.test/cards");
    }

    #[test]
    fn test_update_body_is_full_card() {
        let card = Card {
            id: "42".to_string(),
            title: "Buy oat milk".to_string(),
            category: "done".to_string(),
        };
        let body = serde_json::to_value(&card).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"id": "42", "title": "Buy oat milk", "category": "done"})
        );
    }
}
