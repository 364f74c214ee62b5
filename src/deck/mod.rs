pub mod list;

pub use list::{parse_deck_file, parse_deck_str, DeckError};

use crate::card::CardRecord;

/// Commander main deck size, commander excluded
pub const COMMANDER_DECK_SIZE: usize = 99;

/// An ordered multiset of card records.
///
/// Copies are expanded into repeated records. Membership is fixed once
/// built; only the categorizer touches the records afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    records: Vec<CardRecord>,
}

impl Deck {
    pub fn new(records: Vec<CardRecord>) -> Self {
        Deck { records }
    }

    /// Build from `(record, count)` pairs
    pub fn from_counts<I: IntoIterator<Item = (CardRecord, usize)>>(entries: I) -> Self {
        let mut records = Vec::new();
        for (record, count) in entries {
            records.extend(std::iter::repeat(record).take(count));
        }
        Deck { records }
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [CardRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }

    /// Number of copies of a card by exact name
    pub fn count_of(&self, name: &str) -> usize {
        self.records.iter().filter(|c| c.name == name).count()
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts_expands_copies() {
        let deck = Deck::from_counts([
            (CardRecord::named("Island"), 3),
            (CardRecord::named("Counterspell"), 1),
            (CardRecord::named("Nothing"), 0),
        ]);
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.count_of("Island"), 3);
        assert_eq!(deck.count_of("Nothing"), 0);
        assert_eq!(deck.records()[3].name, "Counterspell");
    }

    #[test]
    fn test_empty_deck() {
        let deck = Deck::default();
        assert!(deck.is_empty());
        assert_eq!(deck.iter().count(), 0);
    }
}
