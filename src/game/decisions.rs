//! Decisions offered to players and the pipeline that enumerates them

use crate::core::{ActivatedAbility, CardId, Cost, PlayerId, Targets, Timing};
use crate::game::{GameState, Rules};
use serde::{Deserialize, Serialize};

/// A choice a player (human or bot) can hand to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Draw,
    CastSpell {
        card: CardId,
        /// Left empty by the enumerator; the caller picks targets
        targets: Option<Targets>,
    },
    PlayLand {
        card: CardId,
    },
    TapForMana {
        card: CardId,
    },
    ActivateAbility {
        card: CardId,
        ability_index: usize,
        targets: Option<Targets>,
    },
    PassPriority,
    /// Debug and testing escape hatch
    EndGame,
}

impl Decision {
    /// Same decision with targets filled in (no-op for untargeted kinds)
    pub fn with_targets(self, chosen: Targets) -> Self {
        match self {
            Decision::CastSpell { card, .. } => Decision::CastSpell {
                card,
                targets: Some(chosen),
            },
            Decision::ActivateAbility {
                card, ability_index, ..
            } => Decision::ActivateAbility {
                card,
                ability_index,
                targets: Some(chosen),
            },
            other => other,
        }
    }

    pub fn describe(&self, state: &GameState) -> String {
        match self {
            Decision::Draw => "draw a card".to_string(),
            Decision::CastSpell { card, .. } => format!("cast {}", state.card_name(*card)),
            Decision::PlayLand { card } => format!("play {}", state.card_name(*card)),
            Decision::TapForMana { card } => format!("tap {} for mana", state.card_name(*card)),
            Decision::ActivateAbility {
                card, ability_index, ..
            } => format!("activate ability {} of {}", ability_index, state.card_name(*card)),
            Decision::PassPriority => "pass priority".to_string(),
            Decision::EndGame => "end the game".to_string(),
        }
    }
}

/// Everything a stage needs to look at
pub struct DecisionContext<'a> {
    pub state: &'a GameState,
    pub player: PlayerId,
    pub rules: &'a Rules,
}

/// One step of the pipeline: receives the decisions so far, returns them extended
pub type DecisionStage = fn(&DecisionContext<'_>, Vec<Decision>) -> Vec<Decision>;

/// Ordered pipeline of independent stages
///
/// Stage order only affects presentation order, never legality.
#[derive(Clone)]
pub struct DecisionEnumerator {
    rules: Rules,
    stages: Vec<DecisionStage>,
}

impl DecisionEnumerator {
    pub fn new(rules: Rules) -> Self {
        DecisionEnumerator {
            rules,
            stages: vec![
                land_plays as DecisionStage,
                spell_casts,
                ability_activations,
                legacy_mana_taps,
                pass_priority,
                end_game,
            ],
        }
    }

    /// Replace the stage list
    pub fn with_stages(rules: Rules, stages: Vec<DecisionStage>) -> Self {
        DecisionEnumerator { rules, stages }
    }

    pub fn available_decisions(&self, state: &GameState, player: PlayerId) -> Vec<Decision> {
        if !state.has_player(player) {
            return Vec::new();
        }
        let ctx = DecisionContext {
            state,
            player,
            rules: &self.rules,
        };
        self.stages
            .iter()
            .fold(Vec::new(), |decisions, stage| stage(&ctx, decisions))
    }
}

impl std::fmt::Debug for DecisionEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEnumerator")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl Default for DecisionEnumerator {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Lands in hand, for the active player under the land-play limit
pub fn land_plays(ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    let Ok(player) = ctx.state.player(ctx.player) else {
        return decisions;
    };
    if ctx.state.turn.active_player != ctx.player
        || ctx.state.turn.lands_played_this_turn >= player.land_plays_per_turn
    {
        return decisions;
    }

    decisions.extend(
        player
            .zones
            .hand
            .iter()
            .filter(|&card| ctx.state.definition_of(card).map(|d| d.is_land()).unwrap_or(false))
            .map(|card| Decision::PlayLand { card }),
    );
    decisions
}

/// Castable cards in hand
///
/// Not filtered by affordability: the player may still tap for mana first.
pub fn spell_casts(ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    let Ok(player) = ctx.state.player(ctx.player) else {
        return decisions;
    };

    for card in player.zones.hand.iter() {
        let Some(spell) = ctx.state.definition_of(card).ok().and_then(|d| d.spell.as_ref()) else {
            continue;
        };
        if !timing_allows(ctx, spell.timing) {
            continue;
        }
        if let Some(requirement) = &spell.targeting {
            let legal = ctx.rules.targeting.legal_targets(ctx.state, requirement, ctx.player);
            if legal.len() < requirement.min {
                continue;
            }
        }
        decisions.push(Decision::CastSpell { card, targets: None });
    }
    decisions
}

/// Activated abilities of the player's permanents whose costs can all be paid
pub fn ability_activations(ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    let Ok(player) = ctx.state.player(ctx.player) else {
        return decisions;
    };

    for card in player.zones.battlefield.iter() {
        let Ok(definition) = ctx.state.definition_of(card) else {
            continue;
        };
        for (ability_index, ability) in definition.activated_abilities.iter().enumerate() {
            if !ability.is_mana_ability() && !timing_allows(ctx, ability.timing) {
                continue;
            }
            if !costs_affordable(ctx, card, ability) {
                continue;
            }
            if let Some(requirement) = &ability.targeting {
                let legal = ctx.rules.targeting.legal_targets(ctx.state, requirement, ctx.player);
                if legal.len() < requirement.min {
                    continue;
                }
            }
            decisions.push(Decision::ActivateAbility {
                card,
                ability_index,
                targets: None,
            });
        }
    }
    decisions
}

/// Untapped permanents with a basic tap color
pub fn legacy_mana_taps(ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    let Ok(player) = ctx.state.player(ctx.player) else {
        return decisions;
    };

    decisions.extend(
        player
            .zones
            .battlefield
            .iter()
            .filter(|&card| {
                let untapped = ctx
                    .state
                    .card(card)
                    .map(|c| !c.tapped && c.controller == ctx.player)
                    .unwrap_or(false);
                let taps = ctx
                    .state
                    .definition_of(card)
                    .map(|d| d.tap_color.is_some())
                    .unwrap_or(false);
                untapped && taps
            })
            .map(|card| Decision::TapForMana { card }),
    );
    decisions
}

pub fn pass_priority(_ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    decisions.push(Decision::PassPriority);
    decisions
}

pub fn end_game(_ctx: &DecisionContext<'_>, mut decisions: Vec<Decision>) -> Vec<Decision> {
    decisions.push(Decision::EndGame);
    decisions
}

fn timing_allows(ctx: &DecisionContext<'_>, timing: Timing) -> bool {
    match timing {
        Timing::Instant => true,
        Timing::Sorcery => ctx.state.in_sorcery_window(ctx.player),
    }
}

fn costs_affordable(ctx: &DecisionContext<'_>, card: CardId, ability: &ActivatedAbility) -> bool {
    let Ok(instance) = ctx.state.card(card) else {
        return false;
    };
    let Ok(player) = ctx.state.player(ctx.player) else {
        return false;
    };

    ability.costs.iter().all(|cost| match cost {
        Cost::Tap => !instance.tapped,
        Cost::Mana(mana) => ctx.rules.payment.can_pay(ctx.state, ctx.player, mana),
        Cost::PayLife { amount } => player.life >= *amount,
        Cost::Sacrifice => true,
    })
}
