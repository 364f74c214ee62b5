//! Deck statistics.
//!
//! Every function recomputes from the deck it is given; nothing is cached.

use crate::card::{Category, Color};
use crate::deck::Deck;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Highest mana value with its own curve bucket
pub const CURVE_CAP: u32 = 7;

/// Mana curve bucket: one per mana value, with everything from 7 merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum CostBucket {
    Cost(u32),
    SevenPlus,
}

impl CostBucket {
    pub fn for_mana_value(mana_value: u32) -> Self {
        if mana_value >= CURVE_CAP {
            CostBucket::SevenPlus
        } else {
            CostBucket::Cost(mana_value)
        }
    }
}

impl fmt::Display for CostBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostBucket::Cost(cost) => write!(f, "{}", cost),
            CostBucket::SevenPlus => write!(f, "{}+", CURVE_CAP),
        }
    }
}

impl From<CostBucket> for String {
    fn from(bucket: CostBucket) -> Self {
        bucket.to_string()
    }
}

/// Summary of a categorized deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSummary {
    pub total_cards: usize,
    /// Records carrying at least one label other than "other", each counted once
    pub categorized: usize,
    pub category_counts: BTreeMap<Category, usize>,
    pub mana_curve: BTreeMap<CostBucket, usize>,
    pub average_cost: f64,
    pub color_distribution: BTreeMap<Color, usize>,
}

/// Records holding each label. A record counts once for every label it has.
pub fn category_counts(deck: &Deck) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for card in deck {
        for category in card.categories() {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Records holding at least one of `categories`, each counted once
pub fn combined_count(deck: &Deck, categories: &[Category]) -> usize {
    deck.iter()
        .filter(|card| categories.iter().any(|c| card.has_category(c)))
        .count()
}

/// Cards per mana value
pub fn mana_curve(deck: &Deck, exclude_lands: bool) -> BTreeMap<CostBucket, usize> {
    let mut curve = BTreeMap::new();
    for card in deck {
        if exclude_lands && card.is_land() {
            continue;
        }
        *curve
            .entry(CostBucket::for_mana_value(card.mana_value))
            .or_insert(0) += 1;
    }
    curve
}

/// Mean mana value, 0 when no card qualifies
pub fn average_cost(deck: &Deck, exclude_lands: bool) -> f64 {
    let costs: Vec<u32> = deck
        .iter()
        .filter(|card| !(exclude_lands && card.is_land()))
        .map(|card| card.mana_value)
        .collect();

    if costs.is_empty() {
        return 0.0;
    }
    costs.iter().map(|&c| c as f64).sum::<f64>() / costs.len() as f64
}

/// Records of each color; colorless cards have their own entry
pub fn color_distribution(deck: &Deck) -> BTreeMap<Color, usize> {
    let mut counts = BTreeMap::new();
    for card in deck {
        for color in card.effective_colors() {
            *counts.entry(color).or_insert(0) += 1;
        }
    }
    counts
}

pub fn summarize(deck: &Deck) -> DeckSummary {
    let categorized = deck
        .iter()
        .filter(|card| card.categories().iter().any(|c| *c != Category::Other))
        .count();

    DeckSummary {
        total_cards: deck.len(),
        categorized,
        category_counts: category_counts(deck),
        mana_curve: mana_curve(deck, true),
        average_cost: average_cost(deck, true),
        color_distribution: color_distribution(deck),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardRecord;
    use crate::categorize::Categorizer;

    fn spell(name: &str, cost: u32) -> CardRecord {
        CardRecord::named(name)
            .with_type_line("Sorcery")
            .with_mana_value(cost)
    }

    fn small_deck() -> Deck {
        Deck::new(vec![
            spell("A", 2),
            spell("B", 2),
            spell("C", 5),
            CardRecord::named("Forest").with_type_line("Basic Land — Forest"),
        ])
    }

    #[test]
    fn test_curve_and_average_exclude_lands() {
        let deck = small_deck();
        assert_eq!(average_cost(&deck, true), 3.0);
        assert_eq!(
            mana_curve(&deck, true),
            BTreeMap::from([(CostBucket::Cost(2), 2), (CostBucket::Cost(5), 1)])
        );
    }

    #[test]
    fn test_curve_and_average_with_lands() {
        let deck = small_deck();
        assert_eq!(average_cost(&deck, false), 9.0 / 4.0);
        assert_eq!(mana_curve(&deck, false).get(&CostBucket::Cost(0)), Some(&1));
    }

    #[test]
    fn test_seven_plus_bucket() {
        let deck = Deck::new(vec![spell("A", 6), spell("B", 7), spell("C", 12)]);
        let curve = mana_curve(&deck, true);
        assert_eq!(curve.get(&CostBucket::Cost(6)), Some(&1));
        assert_eq!(curve.get(&CostBucket::SevenPlus), Some(&2));
        assert_eq!(CostBucket::SevenPlus.to_string(), "7+");
        assert!(CostBucket::Cost(6) < CostBucket::SevenPlus);
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        let lands = Deck::new(vec![CardRecord::named("Island").with_type_line("Basic Land")]);
        assert_eq!(average_cost(&lands, true), 0.0);
        assert_eq!(average_cost(&Deck::default(), false), 0.0);
    }

    #[test]
    fn test_category_counts_count_every_label() {
        let mut deck = Deck::new(vec![
            CardRecord::named("Growth Spiral")
                .with_type_line("Instant")
                .with_oracle_text("Draw a card. You may put a land card from your hand onto the battlefield."),
            CardRecord::named("Forest").with_type_line("Basic Land — Forest"),
            CardRecord::named("Forest").with_type_line("Basic Land — Forest"),
        ]);
        Categorizer::default().categorize(&mut deck);

        let counts = category_counts(&deck);
        assert_eq!(counts.get(&Category::Land), Some(&2));
        assert_eq!(counts.get(&Category::Ramp), Some(&1));
        assert_eq!(counts.get(&Category::CardDraw), Some(&1));
        assert_eq!(counts.get(&Category::Removal), None);

        assert_eq!(combined_count(&deck, &[Category::Ramp, Category::CardDraw]), 1);
        assert_eq!(combined_count(&deck, &[Category::Ramp, Category::Land]), 3);
    }

    #[test]
    fn test_color_distribution() {
        let deck = Deck::new(vec![
            CardRecord::named("Sol Ring"),
            CardRecord::named("Growth Spiral").with_colors([Color::Green, Color::Blue]),
            CardRecord::named("Counterspell").with_colors([Color::Blue]),
        ]);
        let colors = color_distribution(&deck);
        assert_eq!(colors.get(&Color::Blue), Some(&2));
        assert_eq!(colors.get(&Color::Green), Some(&1));
        assert_eq!(colors.get(&Color::Colorless), Some(&1));
        assert_eq!(colors.get(&Color::Red), None);
    }

    #[test]
    fn test_summary() {
        let mut deck = small_deck();
        Categorizer::default().categorize(&mut deck);
        let summary = summarize(&deck);

        assert_eq!(summary.total_cards, 4);
        // The three vanilla sorceries fall into "other"
        assert_eq!(summary.categorized, 1);
        assert_eq!(summary.category_counts.get(&Category::Other), Some(&3));
        assert_eq!(summary.average_cost, 3.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["mana_curve"]["2"], 2);
        assert_eq!(json["category_counts"]["land"], 1);
        assert_eq!(json["color_distribution"]["C"], 4);
    }
}
