use crate::card::CardDatabase;
use crate::deck::Deck;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
}

/// Which part of an exported list a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Main,
    Excluded,
}

/// Parse a deck file and return the expanded deck
pub fn parse_deck_file(path: impl AsRef<Path>, database: &CardDatabase) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path)?;
    parse_deck_str(&content, database)
}

/// Parse a plain-text deck list.
///
/// Format: `4 Card Name`, `4x Card Name` or just `Card Name` (one copy) per
/// line. Comments start with `#` or `//`. Set suffixes such as `(C21) 263` and
/// foil markers are ignored. Cards under a sideboard, maybeboard or commander
/// header are left out; the deck is the main deck only.
pub fn parse_deck_str(content: &str, database: &CardDatabase) -> Result<Deck, DeckError> {
    let mut entries = Vec::new();
    let mut section = Section::Main;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        if let Some(next) = section_header(trimmed) {
            section = next;
            continue;
        }
        if section == Section::Excluded {
            continue;
        }

        let (count, name) = parse_entry(trimmed, line_num + 1)?;
        entries.push((database.lookup(name), count));
    }

    let deck = Deck::from_counts(entries);
    debug!(cards = deck.len(), "parsed deck list");
    Ok(deck)
}

fn section_header(line: &str) -> Option<Section> {
    let label = line.trim_end_matches(':').trim().to_lowercase();
    match label.as_str() {
        "deck" | "main" | "mainboard" => Some(Section::Main),
        "sideboard" | "maybeboard" | "considering" | "commander" | "companion" => {
            Some(Section::Excluded)
        }
        _ if line.ends_with(':') => Some(Section::Main),
        _ => None,
    }
}

fn parse_entry(line: &str, line_num: usize) -> Result<(usize, &str), DeckError> {
    let (count, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => match parse_count(first) {
            Some(count) => (count, rest.trim()),
            None => (1, line),
        },
        None => match parse_count(line) {
            Some(_) => {
                return Err(DeckError::InvalidFormat {
                    line: line_num,
                    reason: "Expected format: 'COUNT CARD_NAME'".to_string(),
                })
            }
            None => (1, line),
        },
    };

    if count == 0 {
        return Err(DeckError::InvalidFormat {
            line: line_num,
            reason: "card count must be at least 1".to_string(),
        });
    }

    Ok((count, strip_printing(rest)))
}

/// `4` or `4x`
fn parse_count(token: &str) -> Option<usize> {
    token
        .strip_suffix(|c: char| c == 'x' || c == 'X')
        .unwrap_or(token)
        .parse()
        .ok()
}

/// Drop trailing set code, collector number and foil marker
fn strip_printing(name: &str) -> &str {
    static PRINTING: OnceLock<Regex> = OnceLock::new();
    let re = PRINTING.get_or_init(|| {
        Regex::new(r"\s+\([A-Za-z0-9]{2,6}\)(\s+\S+)?(\s+\*[A-Z]\*)?$").expect("valid regex")
    });
    let name = match re.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    };
    name.trim_end_matches("*F*").trim()
}
