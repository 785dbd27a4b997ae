//! Player representation

use crate::core::{GameEntity, ManaPool, PlayerId, PlayerName};
use crate::zones::PlayerZones;

/// A player's state: life, mana and every personal zone
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub mana_pool: ManaPool,
    pub zones: PlayerZones,

    /// Maximum lands per turn (usually 1; effects may raise it)
    pub land_plays_per_turn: u8,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        PlayerState {
            id,
            name: name.into(),
            life: starting_life,
            mana_pool: ManaPool::new(),
            zones: PlayerZones::new(),
            land_plays_per_turn: 1,
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn empty_mana_pool(&mut self) {
        self.mana_pool.clear();
    }
}

impl GameEntity<PlayerState> for PlayerState {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
