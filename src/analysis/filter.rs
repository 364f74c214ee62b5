//! Filtering and sorting the records of a deck.

use crate::card::{type_segment, CardRecord, Color};
use crate::deck::Deck;
use std::cmp::Ordering;

/// Card types in the order used by [`SortKey::Type`]
pub const TYPE_ORDER: [&str; 7] = [
    "Land",
    "Creature",
    "Planeswalker",
    "Artifact",
    "Enchantment",
    "Instant",
    "Sorcery",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMatch {
    /// At least one of the requested colors
    #[default]
    Any,
    /// Every requested color
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    ManaValueAsc,
    ManaValueDesc,
    Color,
    Type,
}

/// Conjunction of optional filters. An empty filter keeps every record.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub colors: Vec<Color>,
    pub color_match: ColorMatch,
    /// Card types, any of which must appear before the type line's dash
    pub types: Vec<String>,
    pub name_contains: Option<String>,
    pub sort: SortKey,
}

impl CardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors<I: IntoIterator<Item = Color>>(mut self, colors: I, mode: ColorMatch) -> Self {
        self.colors = colors.into_iter().collect();
        self.color_match = mode;
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.name_contains = if text.trim().is_empty() {
            None
        } else {
            Some(text.trim().to_lowercase())
        };
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        self.matches_colors(card) && self.matches_types(card) && self.matches_name(card)
    }

    fn matches_colors(&self, card: &CardRecord) -> bool {
        if self.colors.is_empty() {
            return true;
        }
        let colors = card.effective_colors();
        match self.color_match {
            ColorMatch::Any => self.colors.iter().any(|c| colors.contains(c)),
            ColorMatch::All => self.colors.iter().all(|c| colors.contains(c)),
        }
    }

    fn matches_types(&self, card: &CardRecord) -> bool {
        if self.types.is_empty() {
            return true;
        }
        let types = type_segment(&card.type_line);
        self.types.iter().any(|wanted| {
            types
                .split_whitespace()
                .any(|t| t.eq_ignore_ascii_case(wanted.trim()))
        })
    }

    fn matches_name(&self, card: &CardRecord) -> bool {
        match &self.name_contains {
            Some(text) => card.name.to_lowercase().contains(text.as_str()),
            None => true,
        }
    }

    /// Matching records in the requested order. Equal keys keep deck order.
    pub fn apply<'a>(&self, deck: &'a Deck) -> Vec<&'a CardRecord> {
        let mut cards: Vec<&CardRecord> = deck.iter().filter(|c| self.matches(c)).collect();
        cards.sort_by(|a, b| self.compare(a, b));
        cards
    }

    fn compare(&self, a: &CardRecord, b: &CardRecord) -> Ordering {
        match self.sort {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::ManaValueAsc => a.mana_value.cmp(&b.mana_value),
            SortKey::ManaValueDesc => b.mana_value.cmp(&a.mana_value),
            SortKey::Color => color_key(a).cmp(&color_key(b)),
            SortKey::Type => type_rank(a).cmp(&type_rank(b)),
        }
    }
}

/// Colored cards by their color letters, colorless last
fn color_key(card: &CardRecord) -> String {
    let letters: String = card
        .colors
        .iter()
        .filter(|c| **c != Color::Colorless)
        .map(Color::to_char)
        .collect();
    if letters.is_empty() {
        "Z".to_string()
    } else {
        letters
    }
}

fn type_rank(card: &CardRecord) -> usize {
    let types = type_segment(&card.type_line);
    TYPE_ORDER
        .iter()
        .position(|t| types.split_whitespace().any(|w| w == *t))
        .unwrap_or(TYPE_ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Deck {
        Deck::new(vec![
            CardRecord::named("Risen Reef")
                .with_type_line("Creature — Elemental")
                .with_mana_value(3)
                .with_colors([Color::Green, Color::Blue]),
            CardRecord::named("Counterspell")
                .with_type_line("Instant")
                .with_mana_value(2)
                .with_colors([Color::Blue]),
            CardRecord::named("Sol Ring")
                .with_type_line("Artifact")
                .with_mana_value(1),
            CardRecord::named("Forest").with_type_line("Basic Land — Forest"),
            CardRecord::named("Cultivate")
                .with_type_line("Sorcery")
                .with_mana_value(3)
                .with_colors([Color::Green]),
        ])
    }

    fn names(cards: &[&CardRecord]) -> Vec<String> {
        cards.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_sorts_by_name() {
        let deck = deck();
        let result = CardFilter::new().apply(&deck);
        assert_eq!(
            names(&result),
            vec!["Counterspell", "Cultivate", "Forest", "Risen Reef", "Sol Ring"]
        );
    }

    #[test]
    fn test_color_any_and_all() {
        let deck = deck();
        let any = CardFilter::new()
            .colors([Color::Green, Color::Blue], ColorMatch::Any)
            .apply(&deck);
        assert_eq!(names(&any), vec!["Counterspell", "Cultivate", "Risen Reef"]);

        let all = CardFilter::new()
            .colors([Color::Green, Color::Blue], ColorMatch::All)
            .apply(&deck);
        assert_eq!(names(&all), vec!["Risen Reef"]);
    }

    #[test]
    fn test_colorless_filter() {
        let deck = deck();
        let colorless = CardFilter::new()
            .colors([Color::Colorless], ColorMatch::Any)
            .apply(&deck);
        assert_eq!(names(&colorless), vec!["Forest", "Sol Ring"]);
    }

    #[test]
    fn test_type_and_name_filters() {
        let deck = deck();
        let spells = CardFilter::new().types(["instant", "Sorcery"]).apply(&deck);
        assert_eq!(names(&spells), vec!["Counterspell", "Cultivate"]);

        let by_name = CardFilter::new().name_contains("  RE ").apply(&deck);
        assert_eq!(names(&by_name), vec!["Forest", "Risen Reef"]);

        let nothing = CardFilter::new().types(["Planeswalker"]).apply(&deck);
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_sort_keys() {
        let deck = deck();
        let desc = CardFilter::new().sort_by(SortKey::ManaValueDesc).apply(&deck);
        assert_eq!(desc[0].mana_value, 3);
        assert_eq!(desc.last().map(|c| c.name.as_str()), Some("Forest"));

        let asc = CardFilter::new().sort_by(SortKey::ManaValueAsc).apply(&deck);
        assert_eq!(asc[0].name, "Forest");

        let by_type = CardFilter::new().sort_by(SortKey::Type).apply(&deck);
        assert_eq!(
            names(&by_type),
            vec!["Forest", "Risen Reef", "Sol Ring", "Counterspell", "Cultivate"]
        );

        let by_color = CardFilter::new().sort_by(SortKey::Color).apply(&deck);
        assert_eq!(
            names(&by_color),
            vec!["Cultivate", "Counterspell", "Risen Reef", "Sol Ring", "Forest"]
        );
    }
}
