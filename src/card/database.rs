use crate::card::types::CardRecord;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CardDatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Invalid card data: {0}")]
    InvalidCard(String),
}

/// Card metadata loaded from a JSON array of card records.
///
/// Lookups are case-insensitive on the card name.
#[derive(Debug, Default)]
pub struct CardDatabase {
    cards: HashMap<String, CardRecord>,
}

impl CardDatabase {
    /// Load cards from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CardDatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load cards from a JSON string
    pub fn from_json(content: &str) -> Result<Self, CardDatabaseError> {
        let records: Vec<CardRecord> = serde_json::from_str(content)?;
        Self::from_records(records)
    }

    pub fn from_records<I: IntoIterator<Item = CardRecord>>(
        records: I,
    ) -> Result<Self, CardDatabaseError> {
        let mut cards = HashMap::new();
        for record in records {
            if record.name.trim().is_empty() {
                return Err(CardDatabaseError::InvalidCard(
                    "card record without a name".to_string(),
                ));
            }
            cards.insert(normalize(&record.name), record);
        }
        Ok(CardDatabase { cards })
    }

    /// Get a card by name
    pub fn get_card(&self, name: &str) -> Result<CardRecord, CardDatabaseError> {
        self.cards
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| CardDatabaseError::CardNotFound(name.to_string()))
    }

    /// Get a card by name, or a bare record carrying only the name.
    ///
    /// Missing metadata is not an error: the placeholder simply fails every
    /// text predicate and lands in "other".
    pub fn lookup(&self, name: &str) -> CardRecord {
        match self.get_card(name) {
            Ok(card) => card,
            Err(_) => {
                warn!(card = name, "no metadata for card, using placeholder");
                CardRecord::named(name)
            }
        }
    }

    /// Get all card names
    pub fn card_names(&self) -> Vec<&str> {
        self.cards.values().map(|c| c.name.as_str()).collect()
    }

    /// Get total number of cards
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
