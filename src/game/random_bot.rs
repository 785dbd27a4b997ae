//! Seeded random decision maker for self-play, benchmarks and replay tests

use crate::game::{Decision, GameController};
use crate::Result;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Picks uniformly among the offered decisions (never `EndGame`), choosing
/// the minimum number of targets at random when a choice needs them
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: ChaCha12Rng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        RandomBot {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    pub fn choose(&mut self, controller: &GameController) -> Decision {
        let options: Vec<&Decision> = controller
            .get_available_decisions()
            .iter()
            .filter(|d| **d != Decision::EndGame)
            .collect();
        let Some(&choice) = options.choose(&mut self.rng) else {
            return Decision::PassPriority;
        };

        let info = match choice {
            Decision::CastSpell { card, .. } => controller.get_targeting_info(*card),
            Decision::ActivateAbility {
                card, ability_index, ..
            } => controller.get_ability_targeting_info(*card, *ability_index),
            _ => return choice.clone(),
        };

        match info {
            Ok(Some(info)) => {
                let targets = info
                    .candidates
                    .choose_multiple(&mut self.rng, info.min)
                    .copied()
                    .collect();
                choice.clone().with_targets(targets)
            }
            _ => choice.clone(),
        }
    }
}

/// Summary of a finished self-play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfPlayReport {
    pub decisions: usize,
    pub rejected: usize,
}

/// Let one bot per seat play until the game ends or `max_turns` is passed
///
/// Rejected decisions fall back to passing priority. Once the turn number
/// exceeds `max_turns` the waiting player ends the game.
pub fn self_play(controller: &mut GameController, bots: &mut [RandomBot], max_turns: u32) -> Result<SelfPlayReport> {
    let mut report = SelfPlayReport {
        decisions: 0,
        rejected: 0,
    };

    while let Some(player) = controller.get_player_needing_decision() {
        let state = controller.get_state();
        if state.turn.turn_number > max_turns {
            controller.provide_decision(Decision::EndGame)?;
            break;
        }

        let seat = state.players.iter().position(|p| p.id == player).unwrap_or(0);
        let decision = match bots.get_mut(seat) {
            Some(bot) => bot.choose(controller),
            None => Decision::PassPriority,
        };

        report.decisions += 1;
        if let Err(err) = controller.provide_decision(decision) {
            if err.is_fatal() {
                return Err(err);
            }
            report.rejected += 1;
            controller.provide_decision(Decision::PassPriority)?;
        }
    }

    Ok(report)
}
