//! Reductions over a categorized deck.

pub mod filter;
pub mod mana_base;
pub mod stats;

pub use filter::{CardFilter, ColorMatch, SortKey};
pub use mana_base::{
    color_percentages, color_requirements, land_counts, parse_mana_cost, suggest_basics,
    LandCounts, DEFAULT_TOTAL_LANDS, DEFAULT_UTILITY_LANDS,
};
pub use stats::{
    average_cost, category_counts, color_distribution, combined_count, mana_curve, summarize,
    CostBucket, DeckSummary,
};
