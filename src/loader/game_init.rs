//! Game initialization from decks
//!
//! Seats players in order, registers every card definition their decks use,
//! fills libraries, optionally shuffles them with the game's own random
//! source and deals opening hands.

use crate::config::EngineConfig;
use crate::core::CardDefId;
use crate::game::GameState;
use crate::loader::{CardCatalogue, DeckList};
use crate::zones::Zone;
use crate::{MtgError, Result};
use rustc_hash::FxHashMap;

/// Builder for a ready-to-start `GameState`
#[derive(Debug, Clone)]
pub struct GameBuilder<'a> {
    catalogue: &'a CardCatalogue,
    config: EngineConfig,
    seed: u64,
    shuffle: bool,
    seats: Vec<(String, DeckList)>,
    starting_seat: usize,
}

impl<'a> GameBuilder<'a> {
    pub fn new(catalogue: &'a CardCatalogue) -> Self {
        GameBuilder {
            catalogue,
            config: EngineConfig::default(),
            seed: 0,
            shuffle: true,
            seats: Vec::new(),
            starting_seat: 0,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep libraries in deck-list order when false (last card listed on top)
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seat the next player
    pub fn player(mut self, name: impl Into<String>, deck: DeckList) -> Self {
        self.seats.push((name.into(), deck));
        self
    }

    /// Seat index of the starting player (default: first seat)
    pub fn starting_seat(mut self, seat: usize) -> Self {
        self.starting_seat = seat;
        self
    }

    pub fn build(&self) -> Result<GameState> {
        self.config.validate()?;
        if self.seats.len() < 2 {
            return Err(MtgError::InvalidConfig(
                "a game needs at least two players".to_string(),
            ));
        }
        if self.starting_seat >= self.seats.len() {
            return Err(MtgError::InvalidConfig(format!(
                "starting seat {} out of range",
                self.starting_seat
            )));
        }

        let names: Vec<&str> = self.seats.iter().map(|(name, _)| name.as_str()).collect();
        let mut game = GameState::new(names, self.config.starting_life, self.seed);
        for player in &mut game.players {
            player.land_plays_per_turn = self.config.land_plays_per_turn;
        }

        let seating = game.seating();
        let mut registered: FxHashMap<String, CardDefId> = FxHashMap::default();
        for (&player_id, (_, deck)) in seating.iter().zip(&self.seats) {
            for entry in &deck.entries {
                let template = self.catalogue.get(&entry.card_name)?;
                let definition = match registered.get(template.name.as_str()) {
                    Some(&id) => id,
                    None => {
                        let id = game.register_definition(template.clone());
                        registered.insert(template.name.to_string(), id);
                        id
                    }
                };
                for _ in 0..entry.count {
                    game.create_card(definition, player_id, Zone::Library)?;
                }
            }
        }

        if self.shuffle {
            for &player_id in &seating {
                let mut rng = game.rng.next_stream();
                game.player_mut(player_id)?.zones.library.shuffle(&mut rng);
            }
        }

        for &player_id in &seating {
            for _ in 0..self.config.opening_hand_size {
                let Some(card) = game.player(player_id)?.zones.library.peek_top() else {
                    break;
                };
                game.move_card(card, Zone::Library, Zone::Hand)?;
            }
        }

        game.set_starting_player(seating[self.starting_seat])?;
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> DeckList {
        DeckList::new().with("Mountain", 20).with("Lightning Bolt", 20)
    }

    #[test]
    fn test_build_two_player_game() {
        let catalogue = CardCatalogue::standard();
        let game = GameBuilder::new(&catalogue)
            .seed(7)
            .player("Alice", deck())
            .player("Bob", deck())
            .build()
            .unwrap();

        assert_eq!(game.players.len(), 2);
        assert_eq!(game.cards.len(), 80);
        // Two shared definitions, not one per copy
        assert_eq!(game.definitions.len(), 2);
        for player in &game.players {
            assert_eq!(player.zones.hand.len(), 7);
            assert_eq!(player.zones.library.len(), 33);
        }
        assert_eq!(game.turn.starting_player, game.players[0].id);
        assert_eq!(game.rng.counter(), 2);
    }

    #[test]
    fn test_same_seed_same_game() {
        let catalogue = CardCatalogue::standard();
        let build = |seed| {
            GameBuilder::new(&catalogue)
                .seed(seed)
                .player("Alice", deck())
                .player("Bob", deck())
                .build()
                .unwrap()
        };
        assert_eq!(build(3), build(3));
        assert_ne!(build(3), build(4));
    }

    #[test]
    fn test_unshuffled_library_order() {
        let catalogue = CardCatalogue::standard();
        let config = EngineConfig {
            opening_hand_size: 0,
            ..EngineConfig::default()
        };
        let game = GameBuilder::new(&catalogue)
            .config(config)
            .shuffle(false)
            .player("Alice", DeckList::new().with("Forest", 1).with("Island", 1))
            .player("Bob", DeckList::new().with("Swamp", 1))
            .starting_seat(1)
            .build()
            .unwrap();

        let alice = &game.players[0];
        let top = alice.zones.library.peek_top().unwrap();
        assert_eq!(game.card_name(top), "Island");
        assert_eq!(game.turn.active_player, game.players[1].id);
    }

    #[test]
    fn test_build_errors() {
        let catalogue = CardCatalogue::standard();
        let lonely = GameBuilder::new(&catalogue).player("Alice", deck()).build();
        assert!(matches!(lonely, Err(MtgError::InvalidConfig(_))));

        let unknown = GameBuilder::new(&catalogue)
            .player("Alice", DeckList::new().with("Shock", 4))
            .player("Bob", deck())
            .build();
        assert!(matches!(unknown, Err(MtgError::UnknownCard(_))));
    }
}
