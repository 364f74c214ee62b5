use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Colors in Magic: The Gathering, plus the colorless marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "C")]
    Colorless,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    /// Convert to the single character representation
    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Colorless => 'C',
        }
    }

    /// Parse a single mana symbol letter, case-insensitive
    pub fn from_char(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'C' => Some(Color::Colorless),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Colorless => "Colorless",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Functional label assigned to a card by the categorizer.
///
/// Labels are not exclusive: a card may hold several at once. They serialize
/// as plain strings (`"card-draw"`, `"tribal:elemental"`); any unrecognized
/// string round-trips as [`Category::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Land,
    Ramp,
    Removal,
    BoardWipe,
    Counterspell,
    CardDraw,
    Creature,
    /// Creature subtype, stored lower-cased
    Tribal(String),
    Other,
    Custom(String),
}

impl Category {
    pub fn tribal(subtype: &str) -> Self {
        Category::Tribal(subtype.trim().to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Land => write!(f, "land"),
            Category::Ramp => write!(f, "ramp"),
            Category::Removal => write!(f, "removal"),
            Category::BoardWipe => write!(f, "board-wipe"),
            Category::Counterspell => write!(f, "counterspell"),
            Category::CardDraw => write!(f, "card-draw"),
            Category::Creature => write!(f, "creature"),
            Category::Tribal(subtype) => write!(f, "tribal:{}", subtype),
            Category::Other => write!(f, "other"),
            Category::Custom(label) => write!(f, "{}", label),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "land" | "lands" => Category::Land,
            "ramp" => Category::Ramp,
            "removal" => Category::Removal,
            "board-wipe" | "board_wipe" | "wipe" => Category::BoardWipe,
            "counterspell" | "counterspells" | "counter" => Category::Counterspell,
            "card-draw" | "card_draw" | "draw" => Category::CardDraw,
            "creature" | "creatures" => Category::Creature,
            "other" => Category::Other,
            _ => match normalized.strip_prefix("tribal:") {
                Some(subtype) => Category::tribal(subtype),
                None => Category::Custom(label.trim().to_string()),
            },
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::from(label.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.to_string()
    }
}

/// A card as enriched by the metadata source.
///
/// Every field except `name` is optional on input; missing metadata leaves the
/// field empty and only degrades classification accuracy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    #[serde(
        default,
        alias = "cmc",
        alias = "mana_cost_value",
        deserialize_with = "mana_value_from_number"
    )]
    pub mana_value: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mana_cost: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_line: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub oracle_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: BTreeSet<Color>,
    #[serde(default, skip_deserializing)]
    categories: BTreeSet<Category>,
}

impl CardRecord {
    /// A record with only a name, as produced when enrichment found nothing
    pub fn named(name: impl Into<String>) -> Self {
        CardRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = type_line.into();
        self
    }

    pub fn with_oracle_text(mut self, oracle_text: impl Into<String>) -> Self {
        self.oracle_text = oracle_text.into();
        self
    }

    pub fn with_mana_value(mut self, mana_value: u32) -> Self {
        self.mana_value = mana_value;
        self
    }

    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>) -> Self {
        self.mana_cost = mana_cost.into();
        self
    }

    pub fn with_colors<I: IntoIterator<Item = Color>>(mut self, colors: I) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    /// Append labels. Only the categorizer calls this; labels are never removed.
    pub(crate) fn extend_categories<I: IntoIterator<Item = Category>>(&mut self, labels: I) {
        self.categories.extend(labels);
    }

    /// Labelled a land, or the type line says so
    pub fn is_land(&self) -> bool {
        self.categories.contains(&Category::Land)
            || type_segment(&self.type_line)
                .split_whitespace()
                .any(|t| t == "Land")
    }

    /// Words after the type line's dash (`Creature — Elemental Shaman`)
    pub fn subtypes(&self) -> Vec<&str> {
        subtype_segment(&self.type_line)
            .map(|segment| segment.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Colors used for distribution counts: no colors means colorless
    pub fn effective_colors(&self) -> BTreeSet<Color> {
        if self.colors.is_empty() {
            BTreeSet::from([Color::Colorless])
        } else {
            self.colors.clone()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whole or fractional mana value (`3` or `3.0`), truncated; null means 0
fn mana_value_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Whole(u64),
        Fractional(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Number::Whole(value)) => u32::try_from(value)
            .map_err(|_| de::Error::custom(format!("mana value {} is out of range", value))),
        Some(Number::Fractional(value)) if value >= 0.0 && value <= u32::MAX as f64 => {
            Ok(value.trunc() as u32)
        }
        Some(Number::Fractional(value)) => Err(de::Error::custom(format!(
            "mana value must be a non-negative number, got {}",
            value
        ))),
    }
}

/// Card types before the dash (`Legendary Creature` in `Legendary Creature — Elf`)
pub fn type_segment(type_line: &str) -> &str {
    let head = type_line.split('—').next().unwrap_or("");
    head.split(" - ").next().unwrap_or("").trim()
}

/// Text after the first em dash, or after ` - ` for plain-ASCII type lines
pub fn subtype_segment(type_line: &str) -> Option<&str> {
    type_line
        .split_once('—')
        .or_else(|| type_line.split_once(" - "))
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}
