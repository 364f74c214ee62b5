//! Category rules as data.
//!
//! A [`Rule`] pairs a [`Category`] with a [`Matcher`]. Rules never look at
//! each other: the categorizer evaluates every rule and collects every label
//! that matches, so adding a category means adding a rule.

use crate::card::{subtype_segment, type_segment, CardRecord, Category};
use regex::Regex;

/// Ramp: mana production or putting lands into play
pub const RAMP_PHRASES: &[&str] = &[
    "add {",
    "add one mana",
    "add two mana",
    "add three mana",
    "put a land card",
    "land card from your library",
    "land cards from your library",
    "untap target land",
    "play an additional land",
    "play two additional lands",
];

pub const RAMP_PATTERNS: &[&str] = &[r"(?i)search your library for [^.]*\blands?\b"];

/// Targeted removal of permanents
pub const REMOVAL_PHRASES: &[&str] = &[
    "destroy target",
    "exile target",
    "put target",
    "sacrifice target",
    "damage to target",
    "damage to any target",
    "fights target",
    "fight target",
    "fights another target",
];

pub const REMOVAL_PATTERNS: &[&str] = &[
    r"(?i)return (up to one |another )?target [^.]*to (its|their) owner'?s'? hand",
    r"(?i)\bgets? -(\d+|x)/-(\d+|x)",
];

/// Creatures only count as removal through a trigger or an activated ability
pub const CREATURE_REMOVAL_HINTS: &[&str] = &["when", "enters", "{t}:"];

pub const BOARD_WIPE_PHRASES: &[&str] = &[
    "destroy all",
    "exile all",
    "return all",
    "destroy each",
    "damage to each creature",
    "all creatures get -",
    "each player sacrifices",
    "each opponent sacrifices",
];

pub const BOARD_WIPE_NAMES: &[&str] = &[
    "evacuation",
    "cyclone summoner",
    "in garruk's wake",
    "blustersquall",
    "aetherize",
];

pub const COUNTERSPELL_PHRASES: &[&str] = &["counter target", "counter that", "counter up to"];

pub const CARD_DRAW_PHRASES: &[&str] = &[
    "draw a card",
    "draws a card",
    "draw cards",
    "draw that many",
    "you may draw",
    "scry",
    "surveil",
    "look at the top",
];

pub const CARD_DRAW_PATTERNS: &[&str] = &[r"(?i)\bdraws? (one|two|three|four|five|six|seven|x|\d+) cards?"];

/// Known card-advantage engines whose text does not say "draw"
pub const CARD_DRAW_NAMES: &[&str] = &[
    "sensei's divining top",
    "mystic remora",
    "the temporal anchor",
    "prying eyes",
    "halimar depths",
];

pub const DEFAULT_TRIBAL_SUBTYPE: &str = "Elemental";

/// Predicate over a card's text fields
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Whole word among the card types, before the dash (`Land`, `Creature`)
    TypeLine(String),
    /// Whole word among the subtypes, after the dash (`Elemental`)
    Subtype(String),
    /// Any phrase appears in the oracle text, ignoring case
    Oracle(Vec<String>),
    /// Regex over the oracle text as printed
    OraclePattern(Regex),
    /// Any phrase appears in the card name, ignoring case
    Name(Vec<String>),
    /// Mana value inside an inclusive range
    ManaValue { min: Option<u32>, max: Option<u32> },
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn type_line(word: &str) -> Self {
        Matcher::TypeLine(word.to_string())
    }

    pub fn oracle(phrases: &[&str]) -> Self {
        Matcher::Oracle(phrases.iter().map(|p| p.to_string()).collect())
    }

    pub fn name(phrases: &[&str]) -> Self {
        Matcher::Name(phrases.iter().map(|p| p.to_string()).collect())
    }

    /// Compile a fixed pattern table
    pub fn patterns(patterns: &[&str]) -> Result<Self, regex::Error> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p).map(Matcher::OraclePattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Matcher::Any(compiled))
    }

    pub fn not(matcher: Matcher) -> Self {
        Matcher::Not(Box::new(matcher))
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        match self {
            Matcher::TypeLine(word) => contains_word(type_segment(&card.type_line), word),
            Matcher::Subtype(word) => {
                subtype_segment(&card.type_line).is_some_and(|segment| contains_word(segment, word))
            }
            Matcher::Oracle(phrases) => contains_any(&card.oracle_text, phrases),
            Matcher::OraclePattern(re) => re.is_match(&card.oracle_text),
            Matcher::Name(phrases) => contains_any(&card.name, phrases),
            Matcher::ManaValue { min, max } => {
                min.map_or(true, |m| card.mana_value >= m)
                    && max.map_or(true, |m| card.mana_value <= m)
            }
            Matcher::All(matchers) => matchers.iter().all(|m| m.matches(card)),
            Matcher::Any(matchers) => matchers.iter().any(|m| m.matches(card)),
            Matcher::Not(matcher) => !matcher.matches(card),
        }
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    let word = word.trim();
    !word.is_empty()
        && text
            .split(|c: char| c.is_whitespace() || c == ',')
            .any(|w| w.eq_ignore_ascii_case(word))
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    if text.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    phrases
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| text.contains(&p.to_lowercase()))
}

/// One independent `(label, predicate)` entry in the rule table
#[derive(Debug, Clone)]
pub struct Rule {
    pub category: Category,
    pub matcher: Matcher,
    /// Structural labels (card type, subtype) do not keep a card out of "other"
    pub structural: bool,
}

impl Rule {
    pub fn new(category: Category, matcher: Matcher) -> Self {
        Rule {
            category,
            matcher,
            structural: false,
        }
    }

    pub fn structural(category: Category, matcher: Matcher) -> Self {
        Rule {
            category,
            matcher,
            structural: true,
        }
    }

    /// Creature-subtype rule, matched against the subtype segment only
    pub fn tribal(subtype: &str) -> Self {
        Rule::structural(
            Category::tribal(subtype),
            Matcher::Subtype(subtype.trim().to_string()),
        )
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        self.matcher.matches(card)
    }
}

fn board_wipe() -> Matcher {
    Matcher::Any(vec![
        Matcher::oracle(BOARD_WIPE_PHRASES),
        Matcher::name(BOARD_WIPE_NAMES),
    ])
}

/// The built-in table, without a tribal rule
pub fn default_rules() -> Vec<Rule> {
    let patterns = |table: &[&str]| Matcher::patterns(table).expect("built-in patterns are valid");

    vec![
        Rule::new(Category::Land, Matcher::type_line("Land")),
        Rule::new(
            Category::Ramp,
            Matcher::All(vec![
                Matcher::not(Matcher::type_line("Land")),
                Matcher::Any(vec![Matcher::oracle(RAMP_PHRASES), patterns(RAMP_PATTERNS)]),
            ]),
        ),
        Rule::new(
            Category::Removal,
            Matcher::All(vec![
                Matcher::Any(vec![
                    Matcher::oracle(REMOVAL_PHRASES),
                    patterns(REMOVAL_PATTERNS),
                ]),
                Matcher::Any(vec![
                    Matcher::not(Matcher::type_line("Creature")),
                    Matcher::oracle(CREATURE_REMOVAL_HINTS),
                ]),
                Matcher::not(board_wipe()),
            ]),
        ),
        Rule::new(Category::BoardWipe, board_wipe()),
        Rule::new(Category::Counterspell, Matcher::oracle(COUNTERSPELL_PHRASES)),
        Rule::new(
            Category::CardDraw,
            Matcher::Any(vec![
                Matcher::oracle(CARD_DRAW_PHRASES),
                patterns(CARD_DRAW_PATTERNS),
                Matcher::name(CARD_DRAW_NAMES),
            ]),
        ),
        Rule::structural(Category::Creature, Matcher::type_line("Creature")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_line_matches_whole_words_before_dash() {
        let land = Matcher::type_line("Land");
        assert!(land.matches(&CardRecord::named("Forest").with_type_line("Basic Land — Forest")));
        assert!(land.matches(&CardRecord::named("x").with_type_line("Artifact Land")));
        assert!(!land.matches(&CardRecord::named("x").with_type_line("Creature — Island Landwalker")));
        assert!(!land.matches(&CardRecord::named("x")));
    }

    #[test]
    fn test_subtype_ignores_card_types() {
        let elemental = Matcher::Subtype("Elemental".to_string());
        assert!(elemental.matches(&CardRecord::named("x").with_type_line("Creature — Elemental Horse")));
        assert!(elemental.matches(&CardRecord::named("x").with_type_line("Creature - elemental")));
        // "Elemental" in the card-type half is not a subtype
        assert!(!elemental.matches(&CardRecord::named("x").with_type_line("Elemental Instant")));
        assert!(!elemental.matches(&CardRecord::named("x").with_type_line("Creature — Elementalist")));
    }

    #[test]
    fn test_oracle_phrases_ignore_case() {
        let draw = Matcher::oracle(&["draw a card"]);
        assert!(draw.matches(&CardRecord::named("x").with_oracle_text("Draw a card.")));
        assert!(!draw.matches(&CardRecord::named("x")));
    }

    #[test]
    fn test_ramp_phrases_cover_any_color_mana() {
        let ramp = Matcher::oracle(RAMP_PHRASES);
        let signet = CardRecord::named("Arcane Signet")
            .with_type_line("Artifact")
            .with_oracle_text("{T}: Add one mana of any color in your commander's color identity.");
        assert!(ramp.matches(&signet));
    }

    #[test]
    fn test_mana_value_range() {
        let cheap = Matcher::ManaValue { min: None, max: Some(2) };
        assert!(cheap.matches(&CardRecord::named("x").with_mana_value(2)));
        assert!(!cheap.matches(&CardRecord::named("x").with_mana_value(3)));
    }

    #[test]
    fn test_combinators() {
        let card = CardRecord::named("x")
            .with_type_line("Instant")
            .with_oracle_text("Counter target spell.");
        let counter = Matcher::oracle(COUNTERSPELL_PHRASES);
        assert!(Matcher::All(vec![counter.clone(), Matcher::type_line("Instant")]).matches(&card));
        assert!(!Matcher::not(counter.clone()).matches(&card));
        assert!(Matcher::Any(vec![Matcher::type_line("Land"), counter]).matches(&card));
        assert!(Matcher::All(vec![]).matches(&card));
        assert!(!Matcher::Any(vec![]).matches(&card));
    }

    #[test]
    fn test_default_patterns_compile() {
        for table in [RAMP_PATTERNS, REMOVAL_PATTERNS, CARD_DRAW_PATTERNS] {
            assert!(Matcher::patterns(table).is_ok());
        }
        assert_eq!(default_rules().len(), 7);
    }

    #[test]
    fn test_tribal_rule_is_structural() {
        let rule = Rule::tribal(" Elemental ");
        assert!(rule.structural);
        assert_eq!(rule.category, Category::tribal("elemental"));
    }
}
