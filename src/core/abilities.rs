//! Spell and activated-ability capabilities carried by card definitions

use crate::core::{Cost, Effect};
use serde::{Deserialize, Serialize};

/// What kind of object a targeting requirement accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Player,
    Creature,
    Permanent,
    /// A player or a creature
    AnyTarget,
}

/// Targeting requirement of a spell or ability: kind plus min/max cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequirement {
    pub kind: TargetKind,
    pub min: usize,
    pub max: usize,
}

impl TargetRequirement {
    /// Exactly one target of the given kind
    pub fn single(kind: TargetKind) -> Self {
        TargetRequirement { kind, min: 1, max: 1 }
    }

    pub fn accepts_count(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// When a spell may be cast or an ability activated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timing {
    /// Any time the player holds priority
    #[default]
    Instant,
    /// Only the active player, in a main phase, with an empty stack
    Sorcery,
}

/// The "castable spell" capability of a card
#[derive(Debug, Clone, PartialEq)]
pub struct SpellAbility {
    pub effect: Effect,
    pub targeting: Option<TargetRequirement>,
    pub timing: Timing,
}

impl SpellAbility {
    pub fn instant(effect: Effect) -> Self {
        SpellAbility {
            effect,
            targeting: None,
            timing: Timing::Instant,
        }
    }

    pub fn sorcery(effect: Effect) -> Self {
        SpellAbility {
            effect,
            targeting: None,
            timing: Timing::Sorcery,
        }
    }

    pub fn targeting(mut self, requirement: TargetRequirement) -> Self {
        self.targeting = Some(requirement);
        self
    }
}

/// An activated ability: "[Costs]: [Effect]"
#[derive(Debug, Clone, PartialEq)]
pub struct ActivatedAbility {
    /// Paid strictly in this order
    pub costs: Vec<Cost>,
    pub effect: Effect,
    pub targeting: Option<TargetRequirement>,
    pub timing: Timing,
    /// Explicitly flagged as producing mana
    pub produces_mana: bool,
    /// Loyalty-style ability tied to a cost on the permanent itself
    pub loyalty: bool,
    pub description: String,
}

impl ActivatedAbility {
    pub fn new(costs: Vec<Cost>, effect: Effect, description: impl Into<String>) -> Self {
        ActivatedAbility {
            costs,
            effect,
            targeting: None,
            timing: Timing::Instant,
            produces_mana: false,
            loyalty: false,
            description: description.into(),
        }
    }

    /// Build a mana ability; flagged as mana-producing and never targeted
    pub fn mana(costs: Vec<Cost>, effect: Effect, description: impl Into<String>) -> Self {
        ActivatedAbility {
            produces_mana: true,
            ..Self::new(costs, effect, description)
        }
    }

    pub fn targeting(mut self, requirement: TargetRequirement) -> Self {
        self.targeting = Some(requirement);
        self
    }

    pub fn sorcery_speed(mut self) -> Self {
        self.timing = Timing::Sorcery;
        self
    }

    pub fn loyalty(mut self) -> Self {
        self.loyalty = true;
        self
    }

    /// Mana abilities resolve immediately and never use the stack.
    ///
    /// An ability qualifies when it is flagged as mana-producing, takes no
    /// target, and is not a loyalty ability.
    pub fn is_mana_ability(&self) -> bool {
        self.produces_mana && self.targeting.is_none() && !self.loyalty
    }

    pub fn includes_tap(&self) -> bool {
        self.costs.iter().any(Cost::includes_tap)
    }
}
