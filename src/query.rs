//! Named and custom draw-probability questions about a categorized deck.
//!
//! A query names one or more categories. Several categories are merged into a
//! single success count before the distribution is built, so a card in two of
//! them is counted once.

use crate::analysis::combined_count;
use crate::card::Category;
use crate::deck::Deck;
use crate::probability::{DomainError, Hypergeometric};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Cards in an opening hand
pub const OPENING_HAND: u32 = 7;

/// Cards seen by the given turn on the draw: the opening hand plus one per turn.
/// Saturates; a count past the deck size is rejected when the query runs.
pub fn cards_seen_by_turn(turn: u32) -> u32 {
    OPENING_HAND.saturating_add(turn)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("deck is empty")]
    EmptyDeck,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// How many successes the question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Target {
    Exactly { k: i64 },
    AtLeast { k: i64 },
    AtMost { k: i64 },
    Between { min: i64, max: i64 },
}

impl Target {
    pub fn exactly(k: i64) -> Self {
        Target::Exactly { k }
    }

    pub fn at_least(k: i64) -> Self {
        Target::AtLeast { k }
    }

    pub fn at_most(k: i64) -> Self {
        Target::AtMost { k }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Target::Between { min, max }
    }

    pub fn probability(&self, distribution: &Hypergeometric) -> f64 {
        match *self {
            Target::Exactly { k } => distribution.exactly(k),
            Target::AtLeast { k } => distribution.at_least(k),
            Target::AtMost { k } => distribution.at_most(k),
            Target::Between { min, max } => distribution.between(min, max),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Exactly { k } => write!(f, "exactly {}", k),
            Target::AtLeast { k } => write!(f, "at least {}", k),
            Target::AtMost { k } => write!(f, "at most {}", k),
            Target::Between { min, max } => write!(f, "{} to {}", min, max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub label: String,
    pub categories: Vec<Category>,
    pub draws: u32,
    pub target: Target,
}

impl Query {
    /// Any label set, drawn `draws` cards deep
    pub fn category<I: IntoIterator<Item = Category>>(
        label: impl Into<String>,
        categories: I,
        draws: u32,
        target: Target,
    ) -> Self {
        Query {
            label: label.into(),
            categories: categories.into_iter().collect(),
            draws,
            target,
        }
    }

    pub fn lands_in_opening_hand(target: Target) -> Self {
        Query::category(
            format!("{} lands in opening hand", target),
            [Category::Land],
            OPENING_HAND,
            target,
        )
    }

    pub fn ramp_in_draws(draws: u32, target: Target) -> Self {
        Query::category(
            format!("{} ramp in {} cards", target, draws),
            [Category::Ramp],
            draws,
            target,
        )
    }

    pub fn tribal_in_opening_hand(subtype: &str, target: Target) -> Self {
        let category = Category::tribal(subtype);
        Query::category(
            format!("{} {} in opening hand", target, subtype.trim().to_lowercase()),
            [category],
            OPENING_HAND,
            target,
        )
    }

    /// Removal, counterspells and board wipes merged into one count
    pub fn interaction_available(draws: u32, target: Target) -> Self {
        Query::category(
            format!("{} interaction in {} cards", target, draws),
            [Category::Removal, Category::Counterspell, Category::BoardWipe],
            draws,
            target,
        )
    }
}

/// The standard set of questions for a deck tracking `tribal_subtype`
pub fn standard_scenarios(tribal_subtype: Option<&str>, ramp_draws: u32, interaction_draws: u32) -> Vec<Query> {
    let mut queries = vec![
        Query::lands_in_opening_hand(Target::between(2, 4)),
        Query::lands_in_opening_hand(Target::between(3, 4)),
        Query::lands_in_opening_hand(Target::at_least(2)),
        Query::ramp_in_draws(ramp_draws, Target::at_least(1)),
        Query::ramp_in_draws(ramp_draws, Target::at_least(2)),
        Query::ramp_in_draws(ramp_draws, Target::exactly(0)),
    ];
    if let Some(subtype) = tribal_subtype {
        queries.push(Query::tribal_in_opening_hand(subtype, Target::at_least(1)));
        queries.push(Query::tribal_in_opening_hand(subtype, Target::at_least(2)));
        queries.push(Query::tribal_in_opening_hand(subtype, Target::exactly(0)));
    }
    queries.push(Query::interaction_available(interaction_draws, Target::at_least(1)));
    queries.push(Query::interaction_available(interaction_draws, Target::at_least(2)));
    queries
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum Outcome {
    Probability(f64),
    /// None of the queried categories occur in the deck
    NoCardsInCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub label: String,
    pub population: usize,
    pub successes: usize,
    pub draws: u32,
    pub target: Target,
    pub outcome: Outcome,
}

impl QueryResult {
    /// 0.0 when the categories were absent
    pub fn probability(&self) -> f64 {
        match self.outcome {
            Outcome::Probability(p) => p,
            Outcome::NoCardsInCategory => 0.0,
        }
    }
}

/// Opening-hand land odds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandReport {
    pub deck_size: usize,
    pub lands: usize,
    /// P(exactly k lands) for k in 0..=7
    pub exact: Vec<(u32, f64)>,
    /// 0 or 1 lands
    pub screw: f64,
    /// 2 to 4 lands
    pub keepable: f64,
    /// 3 or 4 lands
    pub ideal: f64,
    /// 5 or more lands
    pub flood: f64,
    pub at_least_two: f64,
    pub expected: f64,
}

/// Answers queries against one deck
#[derive(Debug, Clone, Copy)]
pub struct QueryLayer<'a> {
    deck: &'a Deck,
}

impl<'a> QueryLayer<'a> {
    pub fn new(deck: &'a Deck) -> Self {
        QueryLayer { deck }
    }

    pub fn deck(&self) -> &Deck {
        self.deck
    }

    pub fn evaluate(&self, query: &Query) -> Result<QueryResult, QueryError> {
        if self.deck.is_empty() {
            return Err(QueryError::EmptyDeck);
        }

        let population = self.deck.len();
        let successes = combined_count(self.deck, &query.categories);
        let distribution = Hypergeometric::new(
            population as i64,
            successes as i64,
            i64::from(query.draws),
        )?;

        let outcome = if successes == 0 {
            Outcome::NoCardsInCategory
        } else {
            Outcome::Probability(query.target.probability(&distribution))
        };

        debug!(
            label = %query.label,
            population,
            successes,
            draws = query.draws,
            ?outcome,
            "evaluated query"
        );

        Ok(QueryResult {
            label: query.label.clone(),
            population,
            successes,
            draws: query.draws,
            target: query.target,
            outcome,
        })
    }

    /// One result per query, in order. A failing query does not stop the rest.
    pub fn evaluate_all(&self, queries: &[Query]) -> Vec<Result<QueryResult, QueryError>> {
        queries.par_iter().map(|q| self.evaluate(q)).collect()
    }

    /// A question with explicit counts, independent of any deck
    pub fn custom(population: i64, successes: i64, draws: i64, target: Target) -> Result<f64, DomainError> {
        let distribution = Hypergeometric::new(population, successes, draws)?;
        Ok(target.probability(&distribution))
    }

    pub fn land_report(&self) -> Result<LandReport, QueryError> {
        land_report(self.deck)
    }
}

pub fn land_report(deck: &Deck) -> Result<LandReport, QueryError> {
    if deck.is_empty() {
        return Err(QueryError::EmptyDeck);
    }

    let deck_size = deck.len();
    let lands = deck.iter().filter(|c| c.is_land()).count();
    let hand = Hypergeometric::new(deck_size as i64, lands as i64, i64::from(OPENING_HAND))?;

    let exact = (0..=OPENING_HAND)
        .map(|k| (k, hand.exactly(i64::from(k))))
        .collect();

    Ok(LandReport {
        deck_size,
        lands,
        exact,
        screw: hand.at_most(1),
        keepable: hand.between(2, 4),
        ideal: hand.between(3, 4),
        flood: hand.at_least(5),
        at_least_two: hand.at_least(2),
        expected: hand.expected(),
    })
}
