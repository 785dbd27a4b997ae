//! Core game state, turn structure and the engine that drives them

pub mod actions;
pub mod capabilities;
pub mod context;
pub mod controller;
pub mod decisions;
pub mod engine;
pub mod events;
pub mod logger;
pub mod phase;
pub mod priority;
pub mod random_bot;
pub mod stack;
pub mod state;
pub mod turn_actions;

pub use actions::{ActionReducer, GameAction, Transition};
pub use capabilities::{BasicTargeting, ManaPayment, PoolPayment, Rules, TargetingRules};
pub use context::TransitionContext;
pub use controller::{ControllerStatus, EventListener, GameController, PendingDecision, TargetingInfo};
pub use decisions::{Decision, DecisionContext, DecisionEnumerator, DecisionStage};
pub use engine::{EngineLoop, EngineRun, DEFAULT_MAX_AUTOMATIC_ACTIONS};
pub use events::GameEvent;
pub use logger::{GameLogger, LogEntry, LogGuard, OutputMode, VerbosityLevel};
pub use random_bot::{self_play, RandomBot, SelfPlayReport};
pub use phase::{Phase, Step, TurnClock, TurnState};
pub use stack::{Stack, StackObject, StackObjectKind};
pub use state::{GameRng, GameState};
