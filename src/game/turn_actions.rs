//! Turn-based actions performed on entering a step

use crate::core::CardId;
use crate::game::{Step, TransitionContext};
use crate::Result;
use smallvec::SmallVec;

impl TransitionContext {
    /// Perform whatever the step just entered does on its own
    pub fn perform_turn_based_actions(&mut self) -> Result<()> {
        match self.state.turn.step {
            Some(Step::Untap) => self.untap_step(),
            Some(Step::Draw) => self.draw_step(),
            Some(Step::End) | Some(Step::Cleanup) => {
                for player in &mut self.state.players {
                    player.empty_mana_pool();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Untap all permanents controlled by the active player
    fn untap_step(&mut self) -> Result<()> {
        let active_player = self.state.turn.active_player;

        let cards_to_untap: SmallVec<[CardId; 8]> = self
            .state
            .battlefield_cards()
            .filter(|&card_id| {
                self.state
                    .card(card_id)
                    .map(|c| c.controller == active_player && c.tapped)
                    .unwrap_or(false)
            })
            .collect();

        for card_id in cards_to_untap {
            self.state.card_mut(card_id)?.untap();
        }
        Ok(())
    }

    /// The active player draws, except the starting player on the first turn
    /// of a two-player game
    fn draw_step(&mut self) -> Result<()> {
        let turn = &self.state.turn;
        let active_player = turn.active_player;
        if turn.turn_number == 1 && self.state.players.len() == 2 && active_player == turn.starting_player {
            return Ok(());
        }

        self.draw_card(active_player)?;
        Ok(())
    }
}
