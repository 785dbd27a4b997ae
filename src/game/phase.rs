//! Turn phases, steps and the turn clock

use crate::core::PlayerId;
use crate::{MtgError, Result};
use serde::{Deserialize, Serialize};

/// Major phases of a turn, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PreCombatMain,
    Combat,
    PostCombatMain,
    Ending,
}

impl Phase {
    /// Steps owned by this phase, in order. Main phases have none: the phase
    /// itself is the unit of time.
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Phase::Beginning => &[Step::Untap, Step::Upkeep, Step::Draw],
            Phase::PreCombatMain | Phase::PostCombatMain => &[],
            Phase::Combat => &[
                Step::BeginCombat,
                Step::DeclareAttackers,
                Step::DeclareBlockers,
                Step::CombatDamage,
                Step::EndCombat,
            ],
            Phase::Ending => &[Step::End, Step::Cleanup],
        }
    }

    pub fn first_step(&self) -> Option<Step> {
        self.steps().first().copied()
    }

    /// Next phase in the cycle (Ending wraps to Beginning)
    pub fn next(&self) -> Phase {
        match self {
            Phase::Beginning => Phase::PreCombatMain,
            Phase::PreCombatMain => Phase::Combat,
            Phase::Combat => Phase::PostCombatMain,
            Phase::PostCombatMain => Phase::Ending,
            Phase::Ending => Phase::Beginning,
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self, Phase::PreCombatMain | Phase::PostCombatMain)
    }
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap,
    Upkeep,
    Draw,

    // Combat Phase
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,

    // Ending Phase
    End,
    Cleanup,
}

impl Step {
    pub fn phase(&self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage
            | Step::EndCombat => Phase::Combat,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// Untap and cleanup run their turn-based actions and move on without
    /// anyone receiving priority
    pub fn grants_priority(&self) -> bool {
        !matches!(self, Step::Untap | Step::Cleanup)
    }
}

/// Where in the turn cycle the game is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub active_player: PlayerId,
    pub starting_player: PlayerId,
    pub phase: Phase,
    /// `None` while in a phase without steps
    pub step: Option<Step>,
    /// Counts full rotations back to the starting player (starts at 1)
    pub turn_number: u32,
    pub lands_played_this_turn: u8,
}

impl TurnState {
    pub fn new(starting_player: PlayerId) -> Self {
        TurnState {
            active_player: starting_player,
            starting_player,
            phase: Phase::Beginning,
            step: Phase::Beginning.first_step(),
            turn_number: 1,
            lands_played_this_turn: 0,
        }
    }

    pub fn grants_priority(&self) -> bool {
        self.step.map_or(true, |step| step.grants_priority())
    }

    pub fn is_main_phase(&self) -> bool {
        self.phase.is_main()
    }

    pub fn describe(&self) -> String {
        match self.step {
            Some(step) => format!("{:?}/{:?}", self.phase, step),
            None => format!("{:?}", self.phase),
        }
    }
}

/// The rules for moving from one step (or stepless phase) to the next
pub struct TurnClock;

impl TurnClock {
    /// Compute the turn state after the current step ends
    ///
    /// Moves to the next step in the current phase if one remains, else to the
    /// first step of the next phase. Wrapping back to the first phase hands
    /// the turn to the next seat, bumps the turn number only when that seat is
    /// the starting player, and resets the land counter.
    pub fn advance(turn: &TurnState, seating: &[PlayerId]) -> Result<TurnState> {
        let mut next = turn.clone();

        let remaining = turn.step.and_then(|current| {
            let steps = turn.phase.steps();
            let idx = steps.iter().position(|&s| s == current)?;
            steps.get(idx + 1).copied()
        });

        if let Some(step) = remaining {
            next.step = Some(step);
            return Ok(next);
        }

        next.phase = turn.phase.next();
        next.step = next.phase.first_step();

        if next.phase == Phase::Beginning {
            let active_idx = seating
                .iter()
                .position(|&p| p == turn.active_player)
                .ok_or_else(|| {
                    MtgError::CorruptState(format!(
                        "active player {} is not seated",
                        turn.active_player
                    ))
                })?;
            next.active_player = seating[(active_idx + 1) % seating.len()];
            if next.active_player == turn.starting_player {
                next.turn_number += 1;
            }
            next.lands_played_this_turn = 0;
        }

        Ok(next)
    }
}
