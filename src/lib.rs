//! MTG turn engine
//!
//! Turn structure, priority and the stack for a Magic: The Gathering style
//! game, driven one decision at a time. State changes only through the
//! action reducer; the engine loop applies automatic actions until some
//! player has to decide, and the controller exposes that as a simple
//! request/response API.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{MtgError, Result};
