//! Pluggable rules: how mana costs get paid and which targets are legal
//!
//! The reducer and the decision enumerator both consult the same `Rules`, so a
//! replacement payment or targeting model changes validation and enumeration
//! together.

use crate::core::{ManaCost, PlayerId, TargetKind, TargetRef, TargetRequirement};
use crate::game::GameState;
use crate::{MtgError, Result};
use std::fmt;
use std::sync::Arc;

/// Decides whether and how a player pays a mana cost
pub trait ManaPayment: Send + Sync {
    fn can_pay(&self, state: &GameState, player: PlayerId, cost: &ManaCost) -> bool;

    /// Pay the cost, editing `state`; on error `state` may be partially changed
    /// and must be discarded by the caller
    fn pay(&self, state: &mut GameState, player: PlayerId, cost: &ManaCost) -> Result<()>;
}

/// Pays strictly from mana already floating in the player's pool
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolPayment;

impl ManaPayment for PoolPayment {
    fn can_pay(&self, state: &GameState, player: PlayerId, cost: &ManaCost) -> bool {
        state
            .player(player)
            .map(|p| p.mana_pool.can_pay(cost))
            .unwrap_or(false)
    }

    fn pay(&self, state: &mut GameState, player: PlayerId, cost: &ManaCost) -> Result<()> {
        state
            .player_mut(player)?
            .mana_pool
            .pay_cost(cost)
            .map_err(MtgError::InvalidAction)
    }
}

/// Computes the legal targets for a requirement
pub trait TargetingRules: Send + Sync {
    fn legal_targets(
        &self,
        state: &GameState,
        requirement: &TargetRequirement,
        player: PlayerId,
    ) -> Vec<TargetRef>;
}

/// Every player, and every permanent of the right kind on any battlefield
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTargeting;

impl TargetingRules for BasicTargeting {
    fn legal_targets(
        &self,
        state: &GameState,
        requirement: &TargetRequirement,
        _player: PlayerId,
    ) -> Vec<TargetRef> {
        let players = || state.players.iter().map(|p| TargetRef::Player(p.id));
        let creatures = || {
            state
                .battlefield_cards()
                .filter(|&card| {
                    state
                        .definition_of(card)
                        .map(|def| def.is_creature())
                        .unwrap_or(false)
                })
                .map(TargetRef::Permanent)
        };

        match requirement.kind {
            TargetKind::Player => players().collect(),
            TargetKind::Creature => creatures().collect(),
            TargetKind::Permanent => state.battlefield_cards().map(TargetRef::Permanent).collect(),
            TargetKind::AnyTarget => players().chain(creatures()).collect(),
        }
    }
}

/// The rule capabilities shared by the reducer and the enumerator
#[derive(Clone)]
pub struct Rules {
    pub payment: Arc<dyn ManaPayment>,
    pub targeting: Arc<dyn TargetingRules>,
}

impl Rules {
    pub fn new(payment: Arc<dyn ManaPayment>, targeting: Arc<dyn TargetingRules>) -> Self {
        Rules { payment, targeting }
    }

    /// Check a chosen target list against a requirement
    ///
    /// With no requirement the list must be empty.
    pub fn validate_targets(
        &self,
        state: &GameState,
        requirement: Option<&TargetRequirement>,
        player: PlayerId,
        targets: &[TargetRef],
    ) -> Result<()> {
        let Some(requirement) = requirement else {
            if targets.is_empty() {
                return Ok(());
            }
            return Err(MtgError::invalid("This does not take targets"));
        };

        if !requirement.accepts_count(targets.len()) {
            return Err(MtgError::invalid(format!(
                "Expected {}..={} targets, got {}",
                requirement.min,
                requirement.max,
                targets.len()
            )));
        }

        let legal = self.targeting.legal_targets(state, requirement, player);
        if let Some(bad) = targets.iter().find(|t| !legal.contains(t)) {
            return Err(MtgError::invalid(format!("Illegal target: {bad:?}")));
        }
        Ok(())
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::new(Arc::new(PoolPayment), Arc::new(BasicTargeting))
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rules { .. }")
    }
}
