//! Colored mana requirements and a basic land split for a deck.

use crate::card::{CardRecord, Color};
use crate::deck::Deck;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Commander land count used when the caller has no opinion
pub const DEFAULT_TOTAL_LANDS: u32 = 37;
/// Slots kept back for nonbasic utility lands
pub const DEFAULT_UTILITY_LANDS: u32 = 10;

const BASIC_LAND_TYPES: [(&str, Color); 5] = [
    ("Plains", Color::White),
    ("Island", Color::Blue),
    ("Swamp", Color::Black),
    ("Mountain", Color::Red),
    ("Forest", Color::Green),
];

fn symbol_regex() -> &'static Regex {
    static SYMBOL: OnceLock<Regex> = OnceLock::new();
    SYMBOL.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("mana symbol regex is valid"))
}

fn pip_color(symbol: &str) -> Option<Color> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Color::from_char(c).filter(|color| *color != Color::Colorless),
        _ => None,
    }
}

/// Colored pips in one mana cost.
///
/// `{G}` counts 1, a hybrid `{G/U}` counts 0.5 for each color and a
/// phyrexian `{G/P}` counts 1. Generic, colorless and `{X}` symbols are
/// ignored.
pub fn parse_mana_cost(mana_cost: &str) -> BTreeMap<Color, f64> {
    let mut pips = BTreeMap::new();

    for captures in symbol_regex().captures_iter(mana_cost) {
        let symbol = captures[1].trim().to_ascii_uppercase();

        if let Some(color) = pip_color(&symbol) {
            *pips.entry(color).or_insert(0.0) += 1.0;
            continue;
        }

        let parts: Vec<&str> = symbol.split('/').collect();
        if parts.len() < 2 {
            continue;
        }
        if parts.contains(&"P") {
            for color in parts.iter().filter_map(|p| pip_color(p)) {
                *pips.entry(color).or_insert(0.0) += 1.0;
            }
        } else {
            for color in parts.iter().filter_map(|p| pip_color(p)) {
                *pips.entry(color).or_insert(0.0) += 0.5;
            }
        }
    }

    pips
}

/// Total colored pips over every nonland card in the deck
pub fn color_requirements(deck: &Deck) -> BTreeMap<Color, f64> {
    let mut totals = BTreeMap::new();
    for card in deck.iter().filter(|c| !c.is_land()) {
        for (color, pips) in parse_mana_cost(&card.mana_cost) {
            *totals.entry(color).or_insert(0.0) += pips;
        }
    }
    totals
}

/// Share of all colored pips per color, in percent. Empty when the deck has no
/// colored pips.
pub fn color_percentages(deck: &Deck) -> BTreeMap<Color, f64> {
    let requirements = color_requirements(deck);
    let total: f64 = requirements.values().sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    requirements
        .into_iter()
        .map(|(color, pips)| (color, pips / total * 100.0))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LandCounts {
    pub total: usize,
    /// Lands carrying a basic land type, per color they tap for
    pub basics_by_color: BTreeMap<Color, usize>,
    /// Lands that produce two or more colors
    pub multicolor: usize,
}

/// Colors a land can produce, read from its basic land types and the
/// `{W}`..`{G}` symbols in its rules text
fn land_colors(card: &CardRecord) -> BTreeSet<Color> {
    let mut colors: BTreeSet<Color> = card
        .subtypes()
        .into_iter()
        .filter_map(|subtype| {
            BASIC_LAND_TYPES
                .iter()
                .find(|(name, _)| subtype.eq_ignore_ascii_case(name))
                .map(|(_, color)| *color)
        })
        .collect();

    for captures in symbol_regex().captures_iter(&card.oracle_text) {
        if let Some(color) = pip_color(captures[1].trim()) {
            colors.insert(color);
        }
    }
    colors
}

pub fn land_counts(deck: &Deck) -> LandCounts {
    let mut counts = LandCounts::default();

    for card in deck.iter().filter(|c| c.is_land()) {
        counts.total += 1;

        for subtype in card.subtypes() {
            if let Some((_, color)) = BASIC_LAND_TYPES
                .iter()
                .find(|(name, _)| subtype.eq_ignore_ascii_case(name))
            {
                *counts.basics_by_color.entry(*color).or_insert(0) += 1;
            }
        }

        if land_colors(card).len() >= 2 {
            counts.multicolor += 1;
        }
    }

    counts
}

/// Split `total_lands - utility_lands` basics by color share.
///
/// Each color gets its rounded proportional share; any rounding difference
/// goes to the color with the most basics (ties broken by the larger pip
/// count). Returns an empty map when the deck has no colored pips.
pub fn suggest_basics(deck: &Deck, total_lands: u32, utility_lands: u32) -> BTreeMap<Color, u32> {
    let requirements = color_requirements(deck);
    let total_pips: f64 = requirements.values().sum();
    if total_pips <= 0.0 {
        return BTreeMap::new();
    }

    let colored_lands = total_lands.saturating_sub(utility_lands);
    let mut basics: BTreeMap<Color, i64> = requirements
        .iter()
        .map(|(color, pips)| (*color, (pips / total_pips * colored_lands as f64).round() as i64))
        .collect();

    let allocated: i64 = basics.values().sum();
    let difference = colored_lands as i64 - allocated;
    if difference != 0 {
        let dominant = requirements
            .iter()
            .max_by(|(a_color, a_pips), (b_color, b_pips)| {
                basics[*a_color]
                    .cmp(&basics[*b_color])
                    .then(a_pips.total_cmp(b_pips))
            })
            .map(|(color, _)| *color);
        if let Some(color) = dominant {
            if let Some(count) = basics.get_mut(&color) {
                *count += difference;
            }
        }
    }

    basics
        .into_iter()
        .map(|(color, count)| (color, count.max(0) as u32))
        .collect()
}
