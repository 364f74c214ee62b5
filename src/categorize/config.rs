//! JSON configuration for the categorizer.
//!
//! ```json
//! {
//!   "tribal_subtype": "Dragon",
//!   "rules": [
//!     { "category": "graveyard-hate", "when": { "oracle": ["exile each opponent's graveyard"] } },
//!     { "category": "cheap-interaction",
//!       "when": { "all": [ { "mana_value": { "max": 2 } }, { "oracle": ["counter target"] } ] } }
//!   ]
//! }
//! ```

use crate::card::Category;
use crate::categorize::rules::{Matcher, Rule};
use crate::categorize::Categorizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Serializable form of [`Matcher`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherSpec {
    TypeLine(String),
    Subtype(String),
    Oracle(Vec<String>),
    OraclePattern(String),
    Name(Vec<String>),
    ManaValue {
        #[serde(default)]
        min: Option<u32>,
        #[serde(default)]
        max: Option<u32>,
    },
    All(Vec<MatcherSpec>),
    Any(Vec<MatcherSpec>),
    Not(Box<MatcherSpec>),
}

impl MatcherSpec {
    pub fn compile(&self) -> Result<Matcher, ConfigError> {
        Ok(match self {
            MatcherSpec::TypeLine(word) => Matcher::TypeLine(word.clone()),
            MatcherSpec::Subtype(word) => Matcher::Subtype(word.clone()),
            MatcherSpec::Oracle(phrases) => Matcher::Oracle(phrases.clone()),
            MatcherSpec::OraclePattern(pattern) => {
                let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                Matcher::OraclePattern(re)
            }
            MatcherSpec::Name(phrases) => Matcher::Name(phrases.clone()),
            MatcherSpec::ManaValue { min, max } => Matcher::ManaValue {
                min: *min,
                max: *max,
            },
            MatcherSpec::All(specs) => Matcher::All(compile_all(specs)?),
            MatcherSpec::Any(specs) => Matcher::Any(compile_all(specs)?),
            MatcherSpec::Not(spec) => Matcher::not(spec.compile()?),
        })
    }
}

fn compile_all(specs: &[MatcherSpec]) -> Result<Vec<Matcher>, ConfigError> {
    specs.iter().map(MatcherSpec::compile).collect()
}

/// Serializable form of [`Rule`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub category: Category,
    #[serde(rename = "when")]
    pub matcher: MatcherSpec,
    #[serde(default)]
    pub structural: bool,
}

impl RuleSpec {
    pub fn compile(&self) -> Result<Rule, ConfigError> {
        Ok(Rule {
            category: self.category.clone(),
            matcher: self.matcher.compile()?,
            structural: self.structural,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizerConfig {
    /// Creature subtype tracked as a tribal category
    #[serde(default)]
    pub tribal_subtype: Option<String>,
    /// Drop the built-in rules and use only `rules`
    #[serde(default)]
    pub replace_defaults: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl CategorizerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn build(&self) -> Result<Categorizer, ConfigError> {
        let mut categorizer = if self.replace_defaults {
            Categorizer::new(Vec::new())
        } else {
            Categorizer::default()
        };

        if let Some(subtype) = &self.tribal_subtype {
            categorizer = categorizer.with_tribal_subtype(subtype);
        }
        for spec in &self.rules {
            categorizer = categorizer.with_rule(spec.compile()?);
        }
        Ok(categorizer)
    }
}
