//! Main game state structure

use crate::core::{
    CardDefId, CardDefinition, CardId, CardInstance, EntityId, EntityStore, PlayerId, PlayerName,
    PlayerState,
};
use crate::game::{Stack, TurnState};
use crate::zones::Zone;
use crate::{MtgError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Deterministic random source carried inside the state
///
/// Plain data: a seed plus a counter of streams handed out so far. Every
/// request derives a fresh ChaCha12 stream from the pair and bumps the counter,
/// so two equal states always produce the same randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRng {
    seed: u64,
    counter: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        GameRng { seed, counter: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Hand out the next random stream
    pub fn next_stream(&mut self) -> ChaCha12Rng {
        let mut rng = ChaCha12Rng::seed_from_u64(self.seed);
        rng.set_stream(self.counter);
        self.counter += 1;
        rng
    }
}

/// Complete game state
///
/// Treated as a value: every transition clones it, edits the clone and hands
/// the clone back, so an older `GameState` is never changed underneath its
/// holder.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Players in seating order
    pub players: Vec<PlayerState>,

    /// Every card copy in the game
    pub cards: EntityStore<CardInstance>,

    /// Shared card templates
    pub definitions: EntityStore<CardDefinition>,

    pub stack: Stack,

    pub turn: TurnState,

    pub game_ended: bool,

    /// Players who passed since the last state-changing action
    pub passed_priority: SmallVec<[PlayerId; 4]>,

    pub rng: GameRng,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,
}

impl GameState {
    /// Create a game with players seated in the given order; the first seat starts
    pub fn new<N: Into<PlayerName>>(
        player_names: impl IntoIterator<Item = N>,
        starting_life: i32,
        seed: u64,
    ) -> Self {
        let mut next_entity_id = 0;
        let players: Vec<PlayerState> = player_names
            .into_iter()
            .map(|name| {
                let id = PlayerId::new(next_entity_id);
                next_entity_id += 1;
                PlayerState::new(id, name, starting_life)
            })
            .collect();

        let starting = players
            .first()
            .map(|p| p.id)
            .unwrap_or_else(|| PlayerId::new(0));

        GameState {
            players,
            cards: EntityStore::new(),
            definitions: EntityStore::new(),
            stack: Stack::new(),
            turn: TurnState::new(starting),
            game_ended: false,
            passed_priority: SmallVec::new(),
            rng: GameRng::new(seed),
            next_entity_id,
        }
    }

    pub fn new_two_player(player1_name: &str, player2_name: &str, starting_life: i32) -> Self {
        Self::new([player1_name, player2_name], starting_life, 0)
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Register a card template and return its id
    pub fn register_definition(&mut self, mut definition: CardDefinition) -> CardDefId {
        let id = self.next_id();
        definition.id = id;
        self.definitions.insert(id, definition);
        id
    }

    /// Create a new copy of a registered card in one of the owner's zones
    pub fn create_card(&mut self, definition: CardDefId, owner: PlayerId, zone: Zone) -> Result<CardId> {
        if !self.definitions.contains(definition) {
            return Err(MtgError::EntityNotFound(definition.as_u32()));
        }
        self.player(owner)?;
        let id = self.next_id();
        self.cards.insert(id, CardInstance::new(id, definition, owner));
        let target = self
            .player_mut(owner)?
            .zones
            .get_zone_mut(zone)
            .ok_or_else(|| MtgError::invalid(format!("Cannot create a card directly in {zone:?}")))?;
        target.add(id);
        Ok(id)
    }

    /// Make a different seat the starting (and active) player before play begins
    pub fn set_starting_player(&mut self, player_id: PlayerId) -> Result<()> {
        self.player(player_id)?;
        self.turn = TurnState::new(player_id);
        Ok(())
    }

    /// Player ids in seating order
    pub fn seating(&self) -> SmallVec<[PlayerId; 4]> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn player(&self, id: PlayerId) -> Result<&PlayerState> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(MtgError::EntityNotFound(id.as_u32()))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerState> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(MtgError::EntityNotFound(id.as_u32()))
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn card(&self, id: CardId) -> Result<&CardInstance> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut CardInstance> {
        self.cards.get_mut(id)
    }

    /// The template behind a card copy
    pub fn definition_of(&self, id: CardId) -> Result<&CardDefinition> {
        let card = self.cards.get(id)?;
        self.definitions.get(card.definition_id)
    }

    pub fn card_name(&self, id: CardId) -> String {
        self.definition_of(id)
            .map(|d| d.name.to_string())
            .unwrap_or_else(|_| format!("card {id}"))
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("player {id}"))
    }

    /// Find the player zone holding a card
    pub fn locate_card(&self, card_id: CardId) -> Option<(PlayerId, Zone)> {
        self.players
            .iter()
            .find_map(|p| p.zones.zone_of(card_id).map(|zone| (p.id, zone)))
    }

    pub fn is_on_battlefield(&self, card_id: CardId) -> bool {
        matches!(self.locate_card(card_id), Some((_, Zone::Battlefield)))
    }

    /// Permanents on every battlefield, seat by seat
    pub fn battlefield_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.players.iter().flat_map(|p| p.zones.battlefield.iter())
    }

    /// Move a card between zones without emitting events
    ///
    /// `Zone::Stack` is not a player zone: moving from it means the card is
    /// currently attached to a stack object, moving to it only removes the card
    /// from its source zone. Permanents enter their controller's battlefield;
    /// every other destination belongs to the owner. Leaving the battlefield
    /// untaps the card and returns control to its owner.
    pub fn move_card(&mut self, card_id: CardId, from: Zone, to: Zone) -> Result<()> {
        let (owner, controller) = {
            let card = self.card(card_id)?;
            (card.owner, card.controller)
        };

        if from != Zone::Stack {
            let removed = self
                .players
                .iter_mut()
                .filter_map(|p| p.zones.get_zone_mut(from))
                .any(|zone| zone.remove(card_id));
            if !removed {
                return Err(MtgError::invalid(format!(
                    "Card {card_id} not found in {from:?}"
                )));
            }
        }

        if to != Zone::Stack {
            let destination = if to == Zone::Battlefield { controller } else { owner };
            if let Some(zone) = self.player_mut(destination)?.zones.get_zone_mut(to) {
                zone.add(card_id);
            }
        }

        if from == Zone::Battlefield && to != Zone::Battlefield {
            let card = self.card_mut(card_id)?;
            card.untap();
            card.controller = owner;
        }

        Ok(())
    }

    /// Is this player allowed to do something at sorcery speed right now?
    pub fn in_sorcery_window(&self, player_id: PlayerId) -> bool {
        self.turn.active_player == player_id && self.turn.is_main_phase() && self.stack.is_empty()
    }
}
