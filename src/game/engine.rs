//! Engine loop: applies automatic actions until a player must decide
//!
//! The loop never blocks. It keeps advancing the clock and resolving the stack
//! while nobody can act, and returns as soon as some player holds priority
//! (suspended) or the game ends.

use crate::core::PlayerId;
use crate::game::{
    ActionReducer, Decision, DecisionEnumerator, GameAction, GameEvent, GameLogger, GameState, Rules,
    VerbosityLevel,
};
use crate::Result;

/// Log a message only when verbose logging is compiled in
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

/// Default cap on consecutive automatic actions before the kill switch fires
pub const DEFAULT_MAX_AUTOMATIC_ACTIONS: usize = 10_000;

/// Outcome of one engine run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    pub state: GameState,
    /// Every event produced during this run, in order
    pub events: Vec<GameEvent>,
    pub suspended: bool,
    pub player_needing_decision: Option<PlayerId>,
    /// Legal decisions for the player we stopped on
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Clone)]
pub struct EngineLoop {
    reducer: ActionReducer,
    enumerator: DecisionEnumerator,
    max_automatic_actions: usize,
}

impl EngineLoop {
    pub fn new(rules: Rules) -> Self {
        EngineLoop {
            reducer: ActionReducer::new(rules.clone()),
            enumerator: DecisionEnumerator::new(rules),
            max_automatic_actions: DEFAULT_MAX_AUTOMATIC_ACTIONS,
        }
    }

    pub fn with_max_automatic_actions(mut self, max: usize) -> Self {
        self.max_automatic_actions = max;
        self
    }

    pub fn with_enumerator(mut self, enumerator: DecisionEnumerator) -> Self {
        self.enumerator = enumerator;
        self
    }

    pub fn reducer(&self) -> &ActionReducer {
        &self.reducer
    }

    pub fn enumerator(&self) -> &DecisionEnumerator {
        &self.enumerator
    }

    /// The action the engine takes on its own, if any
    ///
    /// With an empty stack the clock moves once the step grants no priority or
    /// everybody has passed. With a non-empty stack the top resolves once
    /// everybody has passed.
    pub fn next_automatic_action(&self, state: &GameState) -> Option<GameAction> {
        if state.stack.is_empty() {
            if !state.turn.grants_priority() || state.all_players_passed() {
                return Some(GameAction::AdvanceToNextStep);
            }
        } else if state.all_players_passed() {
            return Some(GameAction::ResolveTopOfStack);
        }
        None
    }

    /// Run from `state` until someone has to decide or the game ends
    pub fn run(
        &self,
        state: GameState,
        logger: &GameLogger,
        mut on_events: Option<&mut dyn FnMut(&[GameEvent])>,
    ) -> Result<EngineRun> {
        let mut state = state;
        let mut events = Vec::new();
        let mut automatic_actions = 0;

        while !state.game_ended {
            let Some(action) = self.next_automatic_action(&state) else {
                let Some(player) = state.next_player_with_priority()? else {
                    // Everyone passed yet nothing is automatic: nothing left to do
                    break;
                };

                let decisions = self.enumerator.available_decisions(&state, player);
                let request = GameEvent::DecisionRequested {
                    player,
                    decision_count: decisions.len(),
                };
                log_event(logger, &state, &request);
                if let Some(callback) = on_events.as_mut() {
                    callback(std::slice::from_ref(&request));
                }
                events.push(request);

                return Ok(EngineRun {
                    state,
                    events,
                    suspended: true,
                    player_needing_decision: Some(player),
                    decisions,
                });
            };

            if automatic_actions >= self.max_automatic_actions {
                let kill = GameEvent::EngineKillSwitchTriggered {
                    iterations: automatic_actions,
                };
                logger.minimal(&kill.describe(&state));
                if let Some(callback) = on_events.as_mut() {
                    callback(std::slice::from_ref(&kill));
                }
                events.push(kill);
                state.game_ended = true;
                break;
            }
            automatic_actions += 1;

            let transition = self.reducer.reduce(&state, &action)?;
            if action == GameAction::AdvanceToNextStep {
                let turn = &transition.state.turn;
                log_if_verbose!(
                    logger,
                    "Turn {} ({}): {}",
                    turn.turn_number,
                    transition.state.player_name(turn.active_player),
                    turn.describe()
                );
            }
            for event in &transition.events {
                log_event(logger, &transition.state, event);
            }
            if let Some(callback) = on_events.as_mut() {
                if !transition.events.is_empty() {
                    callback(&transition.events);
                }
            }

            events.extend(transition.events);
            state = transition.state;
        }

        Ok(EngineRun {
            state,
            events,
            suspended: false,
            player_needing_decision: None,
            decisions: Vec::new(),
        })
    }
}

impl Default for EngineLoop {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Decision requests are noisy, so they only show up at verbose level
pub(crate) fn log_event(logger: &GameLogger, state: &GameState, event: &GameEvent) {
    let level = match event {
        GameEvent::DecisionRequested { .. } => VerbosityLevel::Verbose,
        GameEvent::EngineKillSwitchTriggered { .. } => VerbosityLevel::Minimal,
        _ => VerbosityLevel::Normal,
    };
    logger.categorized(level, event.category(), &event.describe(state));
}
