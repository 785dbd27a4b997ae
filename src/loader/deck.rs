//! Deck lists
//!
//! Text form is one `<count> <card name>` entry per line. Blank lines, `#`
//! comments and `[section]` headers are skipped; everything after a
//! `[Sideboard]` header is ignored.

use crate::loader::CardCatalogue;
use crate::{MtgError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// Ordered list of deck entries; cards enter the library in this order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: add `count` copies of a card
    pub fn with(mut self, card_name: impl Into<String>, count: u8) -> Self {
        self.entries.push(DeckEntry {
            card_name: card_name.into(),
            count,
        });
        self
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.eq_ignore_ascii_case("[sideboard]") {
                break;
            }
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }

            let parsed = line
                .split_once(' ')
                .and_then(|(count, name)| Some((count.parse::<u8>().ok()?, name.trim())));
            match parsed {
                Some((count, name)) if !name.is_empty() => entries.push(DeckEntry {
                    card_name: name.to_string(),
                    count,
                }),
                _ => {
                    return Err(MtgError::InvalidDeck(format!(
                        "line {}: expected `<count> <card name>`, got `{line}`",
                        line_no + 1
                    )))
                }
            }
        }

        if entries.is_empty() {
            return Err(MtgError::InvalidDeck("Empty deck".to_string()));
        }
        Ok(DeckList { entries })
    }

    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// Fail on the first card the catalogue does not know
    pub fn check_against(&self, catalogue: &CardCatalogue) -> Result<()> {
        for entry in &self.entries {
            catalogue.get(&entry.card_name)?;
        }
        Ok(())
    }
}
