//! Game controller: the request/response surface over the engine loop
//!
//! The controller owns the current state and is always in one of three
//! states. It runs the engine until someone must decide (Suspended), takes
//! that player's decision, and runs again, until the game is over (Ended).
//! A rejected decision leaves everything exactly as it was.

use crate::config::EngineConfig;
use crate::core::{CardId, PlayerId, TargetRef, TargetRequirement};
use crate::game::engine::log_event;
use crate::game::{
    Decision, EngineLoop, EngineRun, GameAction, GameEvent, GameLogger, GameState, VerbosityLevel,
};
use crate::{MtgError, Result};

/// Who must decide, and what they may choose from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub player: PlayerId,
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerStatus {
    /// Between a decision and the next suspension
    Running,
    Suspended(PendingDecision),
    /// Terminal
    Ended,
}

/// Legal targets and cardinality for a targeted spell or ability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetingInfo {
    pub candidates: Vec<TargetRef>,
    pub min: usize,
    pub max: usize,
}

pub type EventListener = Box<dyn FnMut(&[GameEvent])>;

pub struct GameController {
    state: GameState,
    engine: EngineLoop,
    status: ControllerStatus,
    /// Everything emitted since creation
    events: Vec<GameEvent>,
    listeners: Vec<EventListener>,
    logger: GameLogger,
}

impl GameController {
    /// Start a game with default rules and logging
    pub fn new(state: GameState) -> Result<Self> {
        Self::with_engine(state, EngineLoop::default(), GameLogger::new())
    }

    /// Start a game using the limits and logging settings of `config`
    pub fn from_config(state: GameState, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let engine = EngineLoop::default().with_max_automatic_actions(config.max_automatic_actions);
        let mut logger = GameLogger::with_verbosity(config.verbosity);
        logger.set_output_mode(config.output_mode);
        Self::with_engine(state, engine, logger)
    }

    /// Run the starting step's turn-based actions, then the engine
    pub fn with_engine(state: GameState, engine: EngineLoop, logger: GameLogger) -> Result<Self> {
        let begin = engine.reducer().begin_game(&state)?;
        logger.normal(&format!(
            "Game start: {} players, {} goes first",
            begin.state.players.len(),
            begin.state.player_name(begin.state.turn.starting_player)
        ));
        for event in &begin.events {
            log_event(&logger, &begin.state, event);
        }

        let run = engine.run(begin.state, &logger, None)?;
        let mut events = begin.events;
        events.extend_from_slice(&run.events);
        let (state, status) = settle(run, &logger)?;

        Ok(GameController {
            state,
            engine,
            status,
            events,
            listeners: Vec::new(),
            logger,
        })
    }

    pub fn get_state(&self) -> &GameState {
        &self.state
    }

    pub fn get_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    pub fn is_waiting_for_decision(&self) -> bool {
        matches!(self.status, ControllerStatus::Suspended(_))
    }

    pub fn is_game_over(&self) -> bool {
        self.status == ControllerStatus::Ended
    }

    pub fn get_player_needing_decision(&self) -> Option<PlayerId> {
        match &self.status {
            ControllerStatus::Suspended(pending) => Some(pending.player),
            _ => None,
        }
    }

    /// Legal decisions for the player we are waiting on (empty otherwise)
    pub fn get_available_decisions(&self) -> &[Decision] {
        match &self.status {
            ControllerStatus::Suspended(pending) => &pending.decisions,
            _ => &[],
        }
    }

    /// Register a listener for events emitted from now on
    pub fn on_events<F>(&mut self, listener: F)
    where
        F: FnMut(&[GameEvent]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Apply the waiting player's decision and run until the next suspension
    ///
    /// Fails with `NotWaitingForDecision` unless suspended. Any error leaves
    /// the controller unchanged.
    pub fn provide_decision(&mut self, decision: Decision) -> Result<()> {
        let ControllerStatus::Suspended(pending) = &self.status else {
            return Err(MtgError::NotWaitingForDecision);
        };
        let player = pending.player;
        // Described against the state the decision was made in
        let description = format!(
            "{} chose to {}",
            self.state.player_name(player),
            decision.describe(&self.state)
        );

        let mut events = Vec::new();
        let next = match Self::to_action(player, &decision) {
            Some(action) => {
                let transition = self.engine.reducer().reduce(&self.state, &action)?;
                events = transition.events;
                transition.state
            }
            None if decision == Decision::EndGame => {
                let mut next = self.state.clone();
                next.game_ended = true;
                next
            }
            None => {
                let mut next = self.state.clone();
                next.mark_passed(player)?;
                next
            }
        };

        self.logger.categorized(VerbosityLevel::Normal, "decision", &description);
        for event in &events {
            log_event(&self.logger, &next, event);
        }

        let run = self.engine.run(next, &self.logger, None)?;
        events.extend_from_slice(&run.events);
        self.commit(run, events)
    }

    /// Legal targets for a card's spell, from the view of the deciding player
    ///
    /// `None` when the card's spell takes no targets or nobody is deciding.
    pub fn get_targeting_info(&self, card: CardId) -> Result<Option<TargetingInfo>> {
        let requirement = self
            .state
            .definition_of(card)?
            .spell
            .as_ref()
            .and_then(|spell| spell.targeting);
        Ok(self.targeting_info_for(requirement))
    }

    /// Legal targets for one of a permanent's activated abilities
    pub fn get_ability_targeting_info(&self, card: CardId, ability_index: usize) -> Result<Option<TargetingInfo>> {
        let ability = self
            .state
            .definition_of(card)?
            .activated_abilities
            .get(ability_index)
            .ok_or_else(|| MtgError::invalid(format!("No activated ability at index {ability_index}")))?;
        Ok(self.targeting_info_for(ability.targeting))
    }

    fn targeting_info_for(&self, requirement: Option<TargetRequirement>) -> Option<TargetingInfo> {
        let requirement = requirement?;
        let player = self.get_player_needing_decision()?;
        let candidates = self
            .engine
            .reducer()
            .rules()
            .targeting
            .legal_targets(&self.state, &requirement, player);
        Some(TargetingInfo {
            candidates,
            min: requirement.min,
            max: requirement.max,
        })
    }

    /// Reducer action for a decision; `None` for pure bookkeeping
    fn to_action(player_id: PlayerId, decision: &Decision) -> Option<GameAction> {
        let action = match decision.clone() {
            Decision::Draw => GameAction::DrawCard { player_id },
            Decision::CastSpell { card, targets } => GameAction::CastSpell {
                player_id,
                card_id: card,
                targets: targets.unwrap_or_default(),
            },
            Decision::PlayLand { card } => GameAction::PlayLand {
                player_id,
                card_id: card,
            },
            Decision::TapForMana { card } => GameAction::TapPermanentForMana {
                player_id,
                card_id: card,
            },
            Decision::ActivateAbility {
                card,
                ability_index,
                targets,
            } => GameAction::ActivateAbility {
                player_id,
                card_id: card,
                ability_index,
                targets: targets.unwrap_or_default(),
            },
            Decision::PassPriority | Decision::EndGame => return None,
        };
        Some(action)
    }

    /// Adopt the result of an engine run and tell listeners what happened
    fn commit(&mut self, run: EngineRun, events: Vec<GameEvent>) -> Result<()> {
        let (state, status) = settle(run, &self.logger)?;
        self.state = state;
        self.status = status;
        if !events.is_empty() {
            for listener in &mut self.listeners {
                listener(&events);
            }
        }
        self.events.extend(events);
        Ok(())
    }
}

/// Turn a finished engine run into the controller's next state and status
fn settle(run: EngineRun, logger: &GameLogger) -> Result<(GameState, ControllerStatus)> {
    let status = match (run.suspended, run.player_needing_decision) {
        (true, Some(player)) => ControllerStatus::Suspended(PendingDecision {
            player,
            decisions: run.decisions,
        }),
        _ if run.state.game_ended => {
            logger.minimal(&format!("Game over after turn {}", run.state.turn.turn_number));
            ControllerStatus::Ended
        }
        _ => {
            return Err(MtgError::CorruptState(
                "engine stopped without a decision or a finished game".to_string(),
            ))
        }
    };
    Ok((run.state, status))
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("status", &self.status)
            .field("turn", &self.state.turn)
            .field("events", &self.events.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, Color};
    use crate::game::{Phase, Step};
    use crate::zones::Zone;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game() -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", 20);
        let forest = game.register_definition(CardDefinition::basic_land("Forest", Color::Green));
        for player in game.seating() {
            for _ in 0..10 {
                game.create_card(forest, player, Zone::Library).unwrap();
            }
        }
        game
    }

    fn quiet(state: GameState) -> GameController {
        GameController::with_engine(state, EngineLoop::default(), GameLogger::capturing()).unwrap()
    }

    #[test]
    fn test_starts_suspended_on_starting_player() {
        let controller = quiet(game());
        let alice = controller.get_state().players[0].id;
        assert!(controller.is_waiting_for_decision());
        assert_eq!(controller.get_player_needing_decision(), Some(alice));
        assert_eq!(controller.get_state().turn.turn_number, 1);
        assert!(controller.get_available_decisions().contains(&Decision::PassPriority));
    }

    #[test]
    fn test_passing_moves_priority_then_step() {
        let mut controller = quiet(game());
        let [alice, bob] = [controller.get_state().players[0].id, controller.get_state().players[1].id];

        controller.provide_decision(Decision::PassPriority).unwrap();
        assert_eq!(controller.get_player_needing_decision(), Some(bob));
        assert_eq!(controller.get_state().turn.step, Some(Step::Upkeep));

        controller.provide_decision(Decision::PassPriority).unwrap();
        assert_eq!(controller.get_player_needing_decision(), Some(alice));
        assert_eq!(controller.get_state().turn.step, Some(Step::Draw));
    }

    #[test]
    fn test_end_game_is_terminal() {
        let mut controller = quiet(game());
        controller.provide_decision(Decision::EndGame).unwrap();
        assert!(controller.is_game_over());
        assert!(controller.get_available_decisions().is_empty());

        let err = controller.provide_decision(Decision::PassPriority).unwrap_err();
        assert!(matches!(err, MtgError::NotWaitingForDecision));
    }

    #[test]
    fn test_rejected_decision_changes_nothing() {
        let mut controller = quiet(game());
        let before = controller.get_state().clone();
        let events = controller.get_events().len();

        // Nothing in hand during upkeep
        let land = before.players[0].zones.library.peek_top().unwrap();
        assert!(controller.provide_decision(Decision::PlayLand { card: land }).is_err());
        assert_eq!(controller.get_state(), &before);
        assert_eq!(controller.get_events().len(), events);
        assert!(controller.is_waiting_for_decision());
    }

    #[test]
    fn test_decision_logged_only_once_accepted() {
        let mut controller = quiet(game());
        let land = controller.get_state().players[0].zones.library.peek_top().unwrap();
        let decision_lines = |c: &GameController| {
            c.logger()
                .logs()
                .iter()
                .filter(|e| e.message.contains(" chose to "))
                .count()
        };

        let logged = controller.logger().logs().len();
        assert!(controller.provide_decision(Decision::PlayLand { card: land }).is_err());
        assert_eq!(controller.logger().logs().len(), logged);
        assert_eq!(decision_lines(&controller), 0);

        controller.provide_decision(Decision::PassPriority).unwrap();
        assert_eq!(decision_lines(&controller), 1);
        assert!(controller
            .logger()
            .logs()
            .iter()
            .any(|e| e.message == "Alice chose to pass priority"));
    }

    #[test]
    fn test_listeners_receive_new_events() {
        let mut controller = quiet(game());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.on_events(move |events| sink.borrow_mut().extend_from_slice(events));

        let before = controller.get_events().len();
        controller.provide_decision(Decision::PassPriority).unwrap();
        assert_eq!(&seen.borrow()[..], &controller.get_events()[before..]);
        assert!(!seen.borrow().is_empty());
    }

    #[test]
    fn test_targeting_info_uses_deciding_player() {
        use crate::core::{CardType, Effect, SpellAbility, TargetKind, TargetRequirement};
        let mut state = game();
        let alice = state.players[0].id;
        let bolt = state.register_definition(
            CardDefinition::new("Lightning Bolt")
                .with_type(CardType::Instant)
                .with_spell(
                    SpellAbility::instant(Effect::DealDamage { amount: 3 })
                        .targeting(TargetRequirement::single(TargetKind::Player)),
                ),
        );
        let card = state.create_card(bolt, alice, Zone::Hand).unwrap();
        let land = state.player(alice).unwrap().zones.library.peek_top().unwrap();

        let controller = quiet(state);
        let info = controller.get_targeting_info(card).unwrap().unwrap();
        assert_eq!((info.min, info.max), (1, 1));
        assert_eq!(info.candidates.len(), 2);
        assert_eq!(controller.get_targeting_info(land).unwrap(), None);
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            verbosity: VerbosityLevel::Silent,
            output_mode: crate::game::OutputMode::Memory,
            ..EngineConfig::default()
        };
        let mut state = game();
        state.turn.phase = Phase::PreCombatMain;
        state.turn.step = None;
        for player in state.seating() {
            state.mark_passed(player).unwrap();
        }
        // begin_game resets passes, so the engine stops on the starting player
        let controller = GameController::from_config(state, &config).unwrap();
        assert!(controller.is_waiting_for_decision());
        assert_eq!(controller.get_state().turn.phase, Phase::PreCombatMain);
        assert!(!controller.logger().logs().is_empty());

        let bad = EngineConfig {
            max_automatic_actions: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameController::from_config(game(), &bad),
            Err(MtgError::InvalidConfig(_))
        ));
    }
}
