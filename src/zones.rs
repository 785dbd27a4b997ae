//! Game zones (Library, Hand, Battlefield, Graveyard, etc.)

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    /// Cards being cast live here (attached to a stack object) until they resolve
    Stack,
    Command,
}

/// A zone containing cards
///
/// Library and graveyard are ordered with the top at the end of the vector.
/// Hand and battlefield are semantically unordered, but removal still keeps
/// the remaining order stable so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone) -> Self {
        CardZone {
            zone_type,
            cards: Vec::new(),
        }
    }

    /// Add to the top (or simply "into" for unordered zones)
    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for Library)
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn add_to_bottom(&mut self, card_id: CardId) {
        self.cards.insert(0, card_id);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}

/// Collection of all zones for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerZones {
    pub library: CardZone,
    pub hand: CardZone,
    pub battlefield: CardZone,
    pub graveyard: CardZone,
    pub command: CardZone,
}

impl PlayerZones {
    pub fn new() -> Self {
        PlayerZones {
            library: CardZone::new(Zone::Library),
            hand: CardZone::new(Zone::Hand),
            battlefield: CardZone::new(Zone::Battlefield),
            graveyard: CardZone::new(Zone::Graveyard),
            command: CardZone::new(Zone::Command),
        }
    }

    /// The stack is shared, so it has no per-player zone
    pub fn get_zone(&self, zone: Zone) -> Option<&CardZone> {
        match zone {
            Zone::Library => Some(&self.library),
            Zone::Hand => Some(&self.hand),
            Zone::Battlefield => Some(&self.battlefield),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Command => Some(&self.command),
            Zone::Stack => None,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> Option<&mut CardZone> {
        match zone {
            Zone::Library => Some(&mut self.library),
            Zone::Hand => Some(&mut self.hand),
            Zone::Battlefield => Some(&mut self.battlefield),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Command => Some(&mut self.command),
            Zone::Stack => None,
        }
    }

    /// Which of these zones holds the card, if any
    pub fn zone_of(&self, card_id: CardId) -> Option<Zone> {
        [
            &self.battlefield,
            &self.hand,
            &self.graveyard,
            &self.library,
            &self.command,
        ]
        .into_iter()
        .find(|zone| zone.contains(card_id))
        .map(|zone| zone.zone_type)
    }
}

impl Default for PlayerZones {
    fn default() -> Self {
        Self::new()
    }
}
