//! Core game types and entities

pub mod abilities;
pub mod card;
pub mod costs;
pub mod effects;
pub mod entity;
pub mod mana;
pub mod player;
pub mod types;

pub use abilities::{ActivatedAbility, SpellAbility, TargetKind, TargetRequirement, Timing};
pub use card::{CardDefinition, CardInstance, CardType};
pub use costs::Cost;
pub use effects::{Effect, EffectFn, EffectScope, TargetRef, Targets};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use mana::{Color, ColorCounts, ManaCost, ManaPool};
pub use player::PlayerState;
pub use types::{CardName, PlayerName};

pub type PlayerId = EntityId<PlayerState>;
pub type CardId = EntityId<CardInstance>;
pub type CardDefId = EntityId<CardDefinition>;
pub type StackObjectId = EntityId<crate::game::StackObject>;
