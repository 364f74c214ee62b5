//! Rule-based card classification.

pub mod config;
pub mod rules;

pub use config::{CategorizerConfig, ConfigError, MatcherSpec, RuleSpec};
pub use rules::{default_rules, Matcher, Rule, DEFAULT_TRIBAL_SUBTYPE};

use crate::card::{CardRecord, Category};
use crate::deck::Deck;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Assigns category labels from an inspectable rule table
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<Rule>,
}

impl Default for Categorizer {
    /// Built-in rules plus an Elemental tribal rule
    fn default() -> Self {
        Categorizer::new(default_rules()).with_tribal_subtype(DEFAULT_TRIBAL_SUBTYPE)
    }
}

impl Categorizer {
    pub fn new(rules: Vec<Rule>) -> Self {
        Categorizer { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Replace the tracked creature subtype
    pub fn with_tribal_subtype(mut self, subtype: &str) -> Self {
        self.rules.retain(|rule| !matches!(rule.category, Category::Tribal(_)));
        if !subtype.trim().is_empty() {
            self.rules.push(Rule::tribal(subtype));
        }
        self
    }

    /// Lower-cased subtype of the first tribal rule, if any
    pub fn tribal_subtype(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match &rule.category {
            Category::Tribal(subtype) => Some(subtype.as_str()),
            _ => None,
        })
    }

    /// Labels for one card.
    ///
    /// Every rule is checked. A card that matches no functional rule gets
    /// `Other`, alongside any structural labels it picked up.
    pub fn classify(&self, card: &CardRecord) -> BTreeSet<Category> {
        let mut labels = BTreeSet::new();
        let mut functional = false;

        for rule in &self.rules {
            if rule.matches(card) {
                functional |= !rule.structural;
                labels.insert(rule.category.clone());
            }
        }

        if !functional {
            labels.insert(Category::Other);
        }
        trace!(card = %card.name, ?labels, "classified");
        labels
    }

    /// Label every record in the deck. Labels are only ever added.
    pub fn categorize(&self, deck: &mut Deck) {
        deck.records_mut().par_iter_mut().for_each(|card| {
            let labels = self.classify(card);
            card.extend_categories(labels);
        });
        debug!(cards = deck.len(), rules = self.rules.len(), "categorized deck");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(categories: &[Category]) -> BTreeSet<Category> {
        categories.iter().cloned().collect()
    }

    #[test]
    fn test_basic_land_is_only_land() {
        let categorizer = Categorizer::default();
        let bare = CardRecord::named("Wastes").with_type_line("Land");
        assert_eq!(categorizer.classify(&bare), labels(&[Category::Land]));

        let forest = CardRecord::named("Forest")
            .with_type_line("Basic Land — Forest")
            .with_oracle_text("({T}: Add {G}.)");
        assert_eq!(categorizer.classify(&forest), labels(&[Category::Land]));
    }

    #[test]
    fn test_land_tutor_sorcery_is_ramp() {
        let cultivate = CardRecord::named("Cultivate")
            .with_type_line("Sorcery")
            .with_mana_value(3)
            .with_oracle_text(
                "Search your library for up to two basic land cards, reveal those cards, \
                 put one onto the battlefield tapped and the other into your hand, then shuffle.",
            );
        assert_eq!(
            Categorizer::default().classify(&cultivate),
            labels(&[Category::Ramp])
        );
    }

    #[test]
    fn test_mana_rock_is_ramp() {
        let rock = CardRecord::named("Sol Ring")
            .with_type_line("Artifact")
            .with_oracle_text("{T}: Add {C}{C}.");
        assert_eq!(Categorizer::default().classify(&rock), labels(&[Category::Ramp]));
    }

    #[test]
    fn test_vanilla_creature_is_creature_and_other() {
        let bears = CardRecord::named("Grizzly Bears").with_type_line("Creature — Bear");
        assert_eq!(
            Categorizer::default().classify(&bears),
            labels(&[Category::Creature, Category::Other])
        );
    }

    #[test]
    fn test_tribal_creature_with_draw() {
        let reef = CardRecord::named("Risen Reef")
            .with_type_line("Creature — Elemental")
            .with_oracle_text(
                "Whenever Risen Reef or another Elemental you control enters, look at the top \
                 card of your library. If it's a land card, you may put it onto the battlefield \
                 tapped. If you don't put the card onto the battlefield, put it into your hand.",
            );
        let result = Categorizer::default().classify(&reef);
        assert!(result.contains(&Category::Creature));
        assert!(result.contains(&Category::tribal("Elemental")));
        assert!(result.contains(&Category::CardDraw));
        assert!(!result.contains(&Category::Other));
    }

    #[test]
    fn test_counterspell_and_removal() {
        let categorizer = Categorizer::default();
        let counter = CardRecord::named("Counterspell")
            .with_type_line("Instant")
            .with_oracle_text("Counter target spell.");
        assert_eq!(categorizer.classify(&counter), labels(&[Category::Counterspell]));

        let bolt = CardRecord::named("Lightning Bolt")
            .with_type_line("Instant")
            .with_oracle_text("Lightning Bolt deals 3 damage to any target.");
        assert_eq!(categorizer.classify(&bolt), labels(&[Category::Removal]));

        let bounce = CardRecord::named("Into the Roil")
            .with_type_line("Instant")
            .with_oracle_text(
                "Kicker {1}{U}\nReturn target nonland permanent to its owner's hand. \
                 If this spell was kicked, draw a card.",
            );
        assert_eq!(
            categorizer.classify(&bounce),
            labels(&[Category::Removal, Category::CardDraw])
        );
    }

    #[test]
    fn test_creature_removal_needs_trigger() {
        let categorizer = Categorizer::default();
        let fighter = CardRecord::named("x")
            .with_type_line("Creature — Beast")
            .with_oracle_text("Trample. Deals damage to target creature blocking it.");
        assert!(!categorizer.classify(&fighter).contains(&Category::Removal));

        let etb = CardRecord::named("Ravenous Chupacabra")
            .with_type_line("Creature — Beast Horror")
            .with_oracle_text("When this creature enters, destroy target creature an opponent controls.");
        assert!(categorizer.classify(&etb).contains(&Category::Removal));
    }

    #[test]
    fn test_board_wipe_is_not_spot_removal() {
        let wrath = CardRecord::named("Wrath of God")
            .with_type_line("Sorcery")
            .with_oracle_text("Destroy all creatures. They can't be regenerated.");
        assert_eq!(
            Categorizer::default().classify(&wrath),
            labels(&[Category::BoardWipe])
        );

        let evacuation = CardRecord::named("Evacuation")
            .with_type_line("Instant")
            .with_oracle_text("Return all creatures to their owners' hands.");
        assert_eq!(
            Categorizer::default().classify(&evacuation),
            labels(&[Category::BoardWipe])
        );
    }

    #[test]
    fn test_missing_fields_land_in_other() {
        let unknown = CardRecord::named("Mystery Card");
        assert_eq!(
            Categorizer::default().classify(&unknown),
            labels(&[Category::Other])
        );
    }

    #[test]
    fn test_rule_order_does_not_matter() {
        let card = CardRecord::named("Growth Spiral")
            .with_type_line("Instant")
            .with_oracle_text("Draw a card. You may put a land card from your hand onto the battlefield.");
        let forward = Categorizer::new(default_rules());
        let mut reversed_rules = default_rules();
        reversed_rules.reverse();
        let reversed = Categorizer::new(reversed_rules);
        assert_eq!(forward.classify(&card), reversed.classify(&card));
        assert_eq!(
            forward.classify(&card),
            labels(&[Category::Ramp, Category::CardDraw])
        );
    }

    #[test]
    fn test_with_tribal_subtype_replaces_rule() {
        let categorizer = Categorizer::default().with_tribal_subtype("Dragon");
        assert_eq!(categorizer.tribal_subtype(), Some("dragon"));
        let tribal_rules = categorizer
            .rules()
            .iter()
            .filter(|r| matches!(r.category, Category::Tribal(_)))
            .count();
        assert_eq!(tribal_rules, 1);

        let dragon = CardRecord::named("Shivan Dragon").with_type_line("Creature — Dragon");
        assert!(categorizer.classify(&dragon).contains(&Category::tribal("dragon")));
    }

    #[test]
    fn test_with_rule_adds_category() {
        let categorizer = Categorizer::default().with_rule(Rule::new(
            Category::from("mill"),
            Matcher::oracle(&["mills"]),
        ));
        let card = CardRecord::named("x")
            .with_type_line("Sorcery")
            .with_oracle_text("Target player mills ten cards.");
        assert_eq!(categorizer.classify(&card), labels(&[Category::from("mill")]));
    }

    #[test]
    fn test_categorize_is_idempotent() {
        let categorizer = Categorizer::default();
        let mut deck = Deck::from_counts([
            (CardRecord::named("Forest").with_type_line("Basic Land — Forest"), 2),
            (
                CardRecord::named("Counterspell")
                    .with_type_line("Instant")
                    .with_oracle_text("Counter target spell."),
                1,
            ),
        ]);

        categorizer.categorize(&mut deck);
        let first = deck.clone();
        categorizer.categorize(&mut deck);
        assert_eq!(deck, first);
        assert!(deck.records()[0].has_category(&Category::Land));
        assert!(deck.records()[2].has_category(&Category::Counterspell));
    }
}
