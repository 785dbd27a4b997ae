//! Priority tracking
//!
//! Priority circulates in seating order starting with the active player. The
//! record of who has passed lives in `GameState::passed_priority` and is wiped
//! by every state-changing action, so everybody gets to respond again.

use crate::core::PlayerId;
use crate::game::GameState;
use crate::{MtgError, Result};

impl GameState {
    /// Who holds priority, or `None` once every player has passed in succession
    pub fn next_player_with_priority(&self) -> Result<Option<PlayerId>> {
        let active = self.turn.active_player;
        let start = self
            .players
            .iter()
            .position(|p| p.id == active)
            .ok_or_else(|| {
                MtgError::CorruptState(format!("active player {active} is not seated"))
            })?;

        let seats = self.players.len();
        Ok((0..seats)
            .map(|offset| self.players[(start + offset) % seats].id)
            .find(|id| !self.passed_priority.contains(id)))
    }

    /// Record that `player` passed priority; passing twice is a no-op
    pub fn mark_passed(&mut self, player: PlayerId) -> Result<()> {
        if !self.has_player(player) {
            return Err(MtgError::EntityNotFound(player.as_u32()));
        }
        if !self.passed_priority.contains(&player) {
            self.passed_priority.push(player);
        }
        Ok(())
    }

    pub fn reset_passes(&mut self) {
        self.passed_priority.clear();
    }

    pub fn all_players_passed(&self) -> bool {
        self.players.iter().all(|p| self.passed_priority.contains(&p.id))
    }
}
