//! Board Configuration
//!
//! Resolved at build time from `KANBAN_API_URL` and `KANBAN_CATEGORIES`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_CATEGORIES: &str = "todo:To Do,doing:Doing,done:Done";

/// Collection name appended to the API url
pub const CARDS_RESOURCE: &str = "cards";

/// One column of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub api_url: String,
    pub categories: Vec<Category>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            categories: parse_categories(DEFAULT_CATEGORIES),
        }
    }
}

impl BoardConfig {
    pub fn new(api_url: &str, categories: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        let categories = parse_categories(categories);
        if categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        Ok(Self { api_url, categories })
    }

    /// Config baked in at compile time, falling back to defaults on bad input
    pub fn from_env() -> Self {
        let api_url = option_env!("KANBAN_API_URL").unwrap_or(DEFAULT_API_URL);
        let categories = option_env!("KANBAN_CATEGORIES").unwrap_or(DEFAULT_CATEGORIES);
        match Self::new(api_url, categories) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[CONFIG] {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// `{api_url}/cards`
    pub fn cards_endpoint(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), CARDS_RESOURCE)
    }

    pub fn category_keys(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.key.clone()).collect()
    }
}

/// Parse `key[:label],key[:label],...`
pub fn parse_categories(raw: &str) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    for entry in raw.split(',') {
        let (key, label) = match entry.split_once(':') {
            Some((key, label)) => (key.trim(), label.trim()),
            None => (entry.trim(), ""),
        };
        if key.is_empty() || categories.iter().any(|c| c.key == key) {
            continue;
        }
        categories.push(Category {
            key: key.to_string(),
            label: (if label.is_empty() { key } else { label }).to_string(),
        });
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        let cats = parse_categories("todo:To Do, doing ,done:Done,,todo:Again");
        assert_eq!(cats.len(), 3);
        assert_eq!(cats[0], Category { key: "todo".into(), label: "To Do".into() });
        assert_eq!(cats[1].label, "doing");
        assert_eq!(cats[2].key, "done");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = BoardConfig::new("https://api.example.com/v1/", "todo").unwrap();
        assert_eq!(config.cards_endpoint(), "https://api.example.com/v1/cards");
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(BoardConfig::new("  ", "todo"), Err(ConfigError::EmptyApiUrl));
        assert_eq!(BoardConfig::new("http://x", " , "), Err(ConfigError::NoCategories));
    }

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.category_keys(), vec!["todo", "doing", "done"]);
        assert_eq!(config.cards_endpoint(), "http://localhost:8080/cards");
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: BoardConfig = serde_json::from_str(
            r#"{"api_url":"http://h","categories":[{"key":"a","label":"A"}]}"#,
        )
        .unwrap();
        assert_eq!(config.categories[0].label, "A");
    }
}
