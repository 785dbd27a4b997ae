//! Card catalogue, deck lists and game construction

pub mod catalogue;
pub mod deck;
pub mod game_init;

pub use catalogue::CardCatalogue;
pub use deck::{DeckEntry, DeckList};
pub use game_init::GameBuilder;
