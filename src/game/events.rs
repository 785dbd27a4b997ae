//! Events emitted by state transitions
//!
//! Every transition reports what happened as a list of events, in the order
//! the changes were made. Events are plain data: observers can log them,
//! replay them, or serialize them.

use crate::core::{CardId, Color, PlayerId, StackObjectId, TargetRef};
use crate::game::{GameState, StackObjectKind};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SpellCast {
        player: PlayerId,
        card: CardId,
        stack_object: StackObjectId,
    },
    SpellResolved {
        stack_object: StackObjectId,
        controller: PlayerId,
        source: Option<CardId>,
        kind: StackObjectKind,
    },
    CardMoved {
        card: CardId,
        from: Zone,
        to: Zone,
        owner: PlayerId,
    },
    ManaAdded {
        player: PlayerId,
        color: Color,
        amount: u8,
    },
    AbilityActivated {
        player: PlayerId,
        card: CardId,
        ability_index: usize,
        stack_object: StackObjectId,
    },
    /// Resolved on the spot, never touches the stack
    ManaAbilityActivated {
        player: PlayerId,
        card: CardId,
        ability_index: usize,
    },
    DirectDamageApplied {
        source: Option<CardId>,
        target: TargetRef,
        amount: i32,
    },
    LifeGained {
        player: PlayerId,
        amount: i32,
    },
    DecisionRequested {
        player: PlayerId,
        decision_count: usize,
    },
    /// The engine ran too many automatic actions in a row and stopped the game
    EngineKillSwitchTriggered {
        iterations: usize,
    },
}

impl GameEvent {
    /// Short category used when logging
    pub fn category(&self) -> &'static str {
        match self {
            GameEvent::SpellCast { .. } | GameEvent::SpellResolved { .. } => "stack",
            GameEvent::CardMoved { .. } => "zone_change",
            GameEvent::ManaAdded { .. } | GameEvent::ManaAbilityActivated { .. } => "mana",
            GameEvent::AbilityActivated { .. } => "stack",
            GameEvent::DirectDamageApplied { .. } | GameEvent::LifeGained { .. } => "life",
            GameEvent::DecisionRequested { .. } => "decision",
            GameEvent::EngineKillSwitchTriggered { .. } => "engine",
        }
    }

    /// Human-readable description using names from `state`
    pub fn describe(&self, state: &GameState) -> String {
        let target_name = |target: &TargetRef| match target {
            TargetRef::Player(p) => state.player_name(*p),
            TargetRef::Permanent(c) => state.card_name(*c),
        };

        match self {
            GameEvent::SpellCast { player, card, .. } => {
                format!("{} casts {}", state.player_name(*player), state.card_name(*card))
            }
            GameEvent::SpellResolved {
                source, kind, controller, ..
            } => match source {
                Some(card) => format!("{} ({:?}) resolves", state.card_name(*card), kind),
                None => format!("{:?} controlled by {} resolves", kind, state.player_name(*controller)),
            },
            GameEvent::CardMoved { card, from, to, .. } => {
                format!("{} moves from {:?} to {:?}", state.card_name(*card), from, to)
            }
            GameEvent::ManaAdded { player, color, amount } => {
                format!("{} adds {} {} mana", state.player_name(*player), amount, color)
            }
            GameEvent::AbilityActivated {
                player, card, ability_index, ..
            } => format!(
                "{} activates ability {} of {}",
                state.player_name(*player),
                ability_index,
                state.card_name(*card)
            ),
            GameEvent::ManaAbilityActivated {
                player, card, ability_index,
            } => format!(
                "{} activates mana ability {} of {}",
                state.player_name(*player),
                ability_index,
                state.card_name(*card)
            ),
            GameEvent::DirectDamageApplied { target, amount, .. } => {
                format!("{} takes {} damage", target_name(target), amount)
            }
            GameEvent::LifeGained { player, amount } => {
                format!("{} gains {} life", state.player_name(*player), amount)
            }
            GameEvent::DecisionRequested { player, decision_count } => format!(
                "{} to decide ({} options)",
                state.player_name(*player),
                decision_count
            ),
            GameEvent::EngineKillSwitchTriggered { iterations } => {
                format!("Engine stopped after {iterations} automatic actions")
            }
        }
    }
}
