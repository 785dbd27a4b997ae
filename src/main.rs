//! MTG turn engine - self-play binary
//!
//! Plays seeded random bots against each other through the controller API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mtg_turn_engine::{
    config::EngineConfig,
    game::{self_play, GameController, GameEvent, RandomBot, VerbosityLevel},
    loader::{CardCatalogue, DeckList, GameBuilder},
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mtg-engine")]
#[command(about = "Turn, priority and stack engine for Magic: The Gathering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play two random bots against each other
    Play {
        /// Seed for deck shuffling and both bots
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// End the game once this turn number is passed
        #[arg(long, short = 't', default_value_t = 10)]
        turns: u32,

        /// Verbosity level (silent/0, minimal/1, normal/2, verbose/3)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,

        /// Deck file for player 1 (`<count> <card name>` per line)
        #[arg(long, value_name = "DECK")]
        deck1: Option<PathBuf>,

        /// Deck file for player 2 (defaults to player 1's deck)
        #[arg(long, value_name = "DECK")]
        deck2: Option<PathBuf>,

        /// JSON engine configuration
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Print every event as a JSON line after the game
        #[arg(long)]
        events_json: bool,
    },

    /// List the cards in the built-in catalogue
    Cards,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            turns,
            verbosity,
            deck1,
            deck2,
            config,
            events_json,
        } => run_play(seed, turns, verbosity, deck1, deck2, config, events_json)?,
        Commands::Cards => {
            for name in CardCatalogue::standard().names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn default_deck() -> DeckList {
    DeckList::new()
        .with("Mountain", 9)
        .with("Forest", 9)
        .with("Plains", 3)
        .with("Island", 3)
        .with("Lightning Bolt", 6)
        .with("Llanowar Elves", 4)
        .with("Grizzly Bears", 4)
        .with("Prodigal Pyromancer", 3)
        .with("Sol Ring", 2)
        .with("Bottle Gnomes", 2)
        .with("Healing Salve", 3)
        .with("Divination", 2)
}

fn load_deck(path: &Path) -> Result<DeckList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading deck file {}", path.display()))?;
    DeckList::parse(&content).with_context(|| format!("parsing deck file {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    seed: u64,
    turns: u32,
    verbosity: Option<VerbosityLevel>,
    deck1: Option<PathBuf>,
    deck2: Option<PathBuf>,
    config: Option<PathBuf>,
    events_json: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            EngineConfig::from_json_str(&json)?
        }
        None => EngineConfig::default(),
    };
    if let Some(verbosity) = verbosity {
        config.verbosity = verbosity;
    }

    let deck1 = match deck1 {
        Some(path) => load_deck(&path)?,
        None => default_deck(),
    };
    let deck2 = match deck2 {
        Some(path) => load_deck(&path)?,
        None => deck1.clone(),
    };

    let catalogue = CardCatalogue::standard();
    let state = GameBuilder::new(&catalogue)
        .config(config.clone())
        .seed(seed)
        .player("Player 1", deck1)
        .player("Player 2", deck2)
        .build()?;

    let mut controller = GameController::from_config(state, &config)?;
    let mut bots = [
        RandomBot::new(seed.wrapping_add(1)),
        RandomBot::new(seed.wrapping_add(2)),
    ];
    let report = self_play(&mut controller, &mut bots, turns)?;

    let state = controller.get_state();
    if config.verbosity >= VerbosityLevel::Minimal {
        println!("=== Game Over ===");
        println!("Turns played: {}", state.turn.turn_number);
        println!(
            "Decisions: {} ({} rejected), events: {}",
            report.decisions,
            report.rejected,
            controller.get_events().len()
        );
        for player in &state.players {
            println!(
                "  {}: {} life, {} cards in hand, {} permanents",
                player.name,
                player.life,
                player.zones.hand.len(),
                player.zones.battlefield.len()
            );
        }
        let resolved = controller
            .get_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::SpellResolved { .. }))
            .count();
        println!("Stack objects resolved: {resolved}");
    }

    if events_json {
        for event in controller.get_events() {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    Ok(())
}
