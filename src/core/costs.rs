//! Cost system for activated abilities
//!
//! An ability lists its costs in order; they are paid in exactly that order
//! when the ability is activated.

use crate::core::ManaCost;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cost that must be paid to activate an ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Tap the source permanent ({T})
    Tap,

    /// Pay mana from the activating player's pool
    Mana(ManaCost),

    /// Pay life
    PayLife { amount: i32 },

    /// Sacrifice the source permanent
    Sacrifice,
}

impl Cost {
    pub fn includes_tap(&self) -> bool {
        matches!(self, Cost::Tap)
    }

    pub fn mana_cost(&self) -> Option<&ManaCost> {
        match self {
            Cost::Mana(mana) => Some(mana),
            _ => None,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Tap => write!(f, "{{T}}"),
            Cost::Mana(mana) => write!(f, "{{{mana}}}"),
            Cost::PayLife { amount } => write!(f, "Pay {amount} life"),
            Cost::Sacrifice => write!(f, "Sacrifice this"),
        }
    }
}
