//! End-to-end scenarios driven through the controller API
//!
//! Each test builds a small two-player game, then plays it one decision at a
//! time and checks the turn, priority and stack rules along the way.

use mtg_turn_engine::{
    config::EngineConfig,
    core::{CardId, Color, PlayerId, TargetRef},
    game::{
        Decision, EngineLoop, GameController, GameEvent, GameLogger, GameState, Phase, StackObjectKind,
        Step,
    },
    loader::{CardCatalogue, DeckList, GameBuilder},
    zones::Zone,
    MtgError,
};
use similar_asserts::assert_eq;
use smallvec::smallvec;

struct Table {
    state: GameState,
    catalogue: CardCatalogue,
    alice: PlayerId,
    bob: PlayerId,
}

impl Table {
    /// Unshuffled game with Mountain libraries and the given opening hand size
    fn new(opening_hand_size: usize) -> Self {
        let catalogue = CardCatalogue::standard();
        let config = EngineConfig {
            opening_hand_size,
            ..EngineConfig::default()
        };
        let deck = DeckList::new().with("Mountain", 30);
        let state = GameBuilder::new(&catalogue)
            .config(config)
            .shuffle(false)
            .player("Alice", deck.clone())
            .player("Bob", deck)
            .build()
            .unwrap();
        let (alice, bob) = (state.players[0].id, state.players[1].id);
        Table {
            state,
            catalogue,
            alice,
            bob,
        }
    }

    fn add_card(&mut self, name: &str, owner: PlayerId, zone: Zone) -> CardId {
        let definition = self.catalogue.get(name).unwrap().clone();
        let definition = self.state.register_definition(definition);
        self.state.create_card(definition, owner, zone).unwrap()
    }

    fn add_mana(&mut self, player: PlayerId, color: Color, amount: u8) {
        self.state.player_mut(player).unwrap().mana_pool.add(color, amount);
    }

    fn start(self) -> GameController {
        GameController::with_engine(self.state, EngineLoop::default(), GameLogger::capturing()).unwrap()
    }
}

/// Pass priority until `done` holds, failing if the game stalls or ends first
fn pass_until(controller: &mut GameController, done: impl Fn(&GameState) -> bool) {
    for _ in 0..1_000 {
        if done(controller.get_state()) {
            return;
        }
        assert!(controller.is_waiting_for_decision(), "game ended early");
        controller.provide_decision(Decision::PassPriority).unwrap();
    }
    panic!("condition never reached");
}

fn life(controller: &GameController, player: PlayerId) -> i32 {
    controller.get_state().player(player).unwrap().life
}

fn hand_size(controller: &GameController, player: PlayerId) -> usize {
    controller.get_state().player(player).unwrap().zones.hand.len()
}

#[test]
fn test_game_start_waits_on_starting_player() {
    let table = Table::new(7);
    let alice = table.alice;
    let controller = table.start();

    let turn = &controller.get_state().turn;
    assert_eq!(turn.turn_number, 1);
    assert_eq!(turn.active_player, alice);
    assert_eq!(turn.step, Some(Step::Upkeep));
    assert_eq!(controller.get_player_needing_decision(), Some(alice));
    assert!(controller.get_available_decisions().contains(&Decision::PassPriority));
    assert!(controller.get_available_decisions().contains(&Decision::EndGame));
}

#[test]
fn test_starting_player_skips_first_draw() {
    let table = Table::new(7);
    let (alice, bob) = (table.alice, table.bob);
    let mut controller = table.start();

    pass_until(&mut controller, |s| s.turn.step == Some(Step::Draw));
    assert_eq!(controller.get_state().turn.active_player, alice);
    assert_eq!(hand_size(&controller, alice), 7);

    pass_until(&mut controller, |s| {
        s.turn.active_player == bob && s.turn.step == Some(Step::Draw)
    });
    assert_eq!(hand_size(&controller, bob), 8);

    pass_until(&mut controller, |s| {
        s.turn.active_player == alice && s.turn.step == Some(Step::Draw)
    });
    assert_eq!(controller.get_state().turn.turn_number, 2);
    assert_eq!(hand_size(&controller, alice), 8);
}

#[test]
fn test_cast_without_mana_is_rejected_atomically() {
    let mut table = Table::new(0);
    let (alice, bob) = (table.alice, table.bob);
    let bolt = table.add_card("Lightning Bolt", alice, Zone::Hand);
    let mut controller = table.start();

    let before = controller.get_state().clone();
    let events = controller.get_events().len();
    let err = controller
        .provide_decision(Decision::CastSpell {
            card: bolt,
            targets: Some(smallvec![TargetRef::Player(bob)]),
        })
        .unwrap_err();

    assert!(matches!(err, MtgError::InvalidAction(_)));
    assert_eq!(controller.get_state(), &before);
    assert_eq!(controller.get_events().len(), events);
    assert!(controller.get_state().player(alice).unwrap().zones.hand.contains(bolt));
    assert!(controller.get_state().stack.is_empty());
    assert_eq!(controller.get_player_needing_decision(), Some(alice));
}

#[test]
fn test_mana_ability_skips_the_stack() {
    let mut table = Table::new(0);
    let alice = table.alice;
    let elves = table.add_card("Llanowar Elves", alice, Zone::Battlefield);
    let mut controller = table.start();

    controller
        .provide_decision(Decision::ActivateAbility {
            card: elves,
            ability_index: 0,
            targets: None,
        })
        .unwrap();

    let state = controller.get_state();
    assert!(state.stack.is_empty());
    assert!(state.card(elves).unwrap().tapped);
    assert_eq!(state.player(alice).unwrap().mana_pool.amount(Color::Green), 1);
    assert!(controller
        .get_events()
        .iter()
        .any(|e| matches!(e, GameEvent::ManaAbilityActivated { card, .. } if *card == elves)));
    // Still Alice's priority in the same step
    assert_eq!(controller.get_player_needing_decision(), Some(alice));
    assert_eq!(state.turn.step, Some(Step::Upkeep));
}

#[test]
fn test_tap_ability_uses_the_stack() {
    let mut table = Table::new(0);
    let (alice, bob) = (table.alice, table.bob);
    let pyromancer = table.add_card("Prodigal Pyromancer", alice, Zone::Battlefield);
    let mut controller = table.start();

    controller
        .provide_decision(Decision::ActivateAbility {
            card: pyromancer,
            ability_index: 0,
            targets: Some(smallvec![TargetRef::Player(bob)]),
        })
        .unwrap();

    let state = controller.get_state();
    assert!(state.card(pyromancer).unwrap().tapped);
    assert_eq!(state.stack.len(), 1);
    assert_eq!(state.stack.peek().unwrap().kind, StackObjectKind::Ability);
    assert_eq!(life(&controller, bob), 20);

    // Both pass: the ability resolves and the permanent stays put
    controller.provide_decision(Decision::PassPriority).unwrap();
    controller.provide_decision(Decision::PassPriority).unwrap();
    let state = controller.get_state();
    assert!(state.stack.is_empty());
    assert_eq!(life(&controller, bob), 19);
    assert!(state.is_on_battlefield(pyromancer));
    assert_eq!(state.turn.step, Some(Step::Upkeep));
}

#[test]
fn test_stack_resolves_last_in_first_out() {
    let mut table = Table::new(0);
    let (alice, bob) = (table.alice, table.bob);
    let first = table.add_card("Lightning Bolt", alice, Zone::Hand);
    let second = table.add_card("Lightning Bolt", alice, Zone::Hand);
    table.add_mana(alice, Color::Red, 2);
    let mut controller = table.start();

    controller
        .provide_decision(Decision::CastSpell {
            card: first,
            targets: Some(smallvec![TargetRef::Player(bob)]),
        })
        .unwrap();
    controller
        .provide_decision(Decision::CastSpell {
            card: second,
            targets: Some(smallvec![TargetRef::Player(alice)]),
        })
        .unwrap();
    assert_eq!(controller.get_state().stack.len(), 2);
    assert_eq!(controller.get_state().stack.peek().unwrap().source, Some(second));

    controller.provide_decision(Decision::PassPriority).unwrap();
    controller.provide_decision(Decision::PassPriority).unwrap();
    assert_eq!((life(&controller, alice), life(&controller, bob)), (17, 20));
    assert_eq!(controller.get_state().stack.len(), 1);

    controller.provide_decision(Decision::PassPriority).unwrap();
    controller.provide_decision(Decision::PassPriority).unwrap();
    assert_eq!((life(&controller, alice), life(&controller, bob)), (17, 17));

    let resolved: Vec<Option<CardId>> = controller
        .get_events()
        .iter()
        .filter_map(|e| match e {
            GameEvent::SpellResolved { source, .. } => Some(*source),
            _ => None,
        })
        .collect();
    assert_eq!(resolved, vec![Some(second), Some(first)]);

    let graveyard = &controller.get_state().player(alice).unwrap().zones.graveyard;
    assert!(graveyard.contains(first) && graveyard.contains(second));
}

#[test]
fn test_state_change_resets_passes() {
    let mut table = Table::new(0);
    let (alice, bob) = (table.alice, table.bob);
    table.add_card("Llanowar Elves", bob, Zone::Battlefield);
    let mut controller = table.start();

    controller.provide_decision(Decision::PassPriority).unwrap();
    assert_eq!(controller.get_player_needing_decision(), Some(bob));
    assert_eq!(controller.get_state().passed_priority.to_vec(), vec![alice]);

    let elves = controller.get_state().player(bob).unwrap().zones.battlefield.cards[0];
    controller
        .provide_decision(Decision::ActivateAbility {
            card: elves,
            ability_index: 0,
            targets: None,
        })
        .unwrap();

    assert!(controller.get_state().passed_priority.is_empty());
    assert_eq!(controller.get_player_needing_decision(), Some(alice));
    assert_eq!(controller.get_state().turn.step, Some(Step::Upkeep));
}

#[test]
fn test_resolved_creature_spell_goes_to_graveyard() {
    let mut table = Table::new(0);
    let alice = table.alice;
    let bears = table.add_card("Grizzly Bears", alice, Zone::Hand);
    table.add_mana(alice, Color::Green, 2);
    let mut controller = table.start();

    // Sorcery speed: not during upkeep
    assert!(controller
        .provide_decision(Decision::CastSpell {
            card: bears,
            targets: None
        })
        .is_err());

    pass_until(&mut controller, |s| s.turn.phase == Phase::PreCombatMain);
    assert!(controller
        .get_available_decisions()
        .iter()
        .any(|d| matches!(d, Decision::CastSpell { card, .. } if *card == bears)));
    controller
        .provide_decision(Decision::CastSpell {
            card: bears,
            targets: None,
        })
        .unwrap();
    controller.provide_decision(Decision::PassPriority).unwrap();
    controller.provide_decision(Decision::PassPriority).unwrap();

    let state = controller.get_state();
    assert!(state.stack.is_empty());
    assert_eq!(state.locate_card(bears), Some((alice, Zone::Graveyard)));
    assert!(!state.is_on_battlefield(bears));
    assert!(state.player(alice).unwrap().mana_pool.is_empty());
}

#[test]
fn test_turn_number_counts_rotations() {
    let table = Table::new(7);
    let (alice, bob) = (table.alice, table.bob);
    let mut controller = table.start();
    let mut seen = vec![(1, alice)];

    for _ in 0..4 {
        let (_, active) = *seen.last().unwrap();
        pass_until(&mut controller, |s| s.turn.active_player != active);
        let turn = &controller.get_state().turn;
        seen.push((turn.turn_number, turn.active_player));
    }

    assert_eq!(
        seen,
        vec![(1, alice), (1, bob), (2, alice), (2, bob), (3, alice)]
    );
}

#[test]
fn test_land_play_limit() {
    let table = Table::new(7);
    let alice = table.alice;
    let mut controller = table.start();
    pass_until(&mut controller, |s| s.turn.phase == Phase::PreCombatMain);

    let hand: Vec<CardId> = controller
        .get_state()
        .player(alice)
        .unwrap()
        .zones
        .hand
        .iter()
        .collect();
    controller
        .provide_decision(Decision::PlayLand { card: hand[0] })
        .unwrap();
    assert!(controller.get_state().is_on_battlefield(hand[0]));
    assert!(!controller
        .get_available_decisions()
        .iter()
        .any(|d| matches!(d, Decision::PlayLand { .. })));
    assert!(controller
        .provide_decision(Decision::PlayLand { card: hand[1] })
        .is_err());

    // Basic lands still tap for mana directly
    controller
        .provide_decision(Decision::TapForMana { card: hand[0] })
        .unwrap();
    assert_eq!(
        controller.get_state().player(alice).unwrap().mana_pool.amount(Color::Red),
        1
    );
}

#[test]
fn test_land_play_outside_main_phase() {
    let table = Table::new(7);
    let (alice, bob) = (table.alice, table.bob);
    let mut controller = table.start();
    assert_eq!(controller.get_state().turn.step, Some(Step::Upkeep));

    let land = controller.get_state().player(alice).unwrap().zones.hand.cards[0];
    assert!(controller
        .get_available_decisions()
        .contains(&Decision::PlayLand { card: land }));
    controller
        .provide_decision(Decision::PlayLand { card: land })
        .unwrap();
    assert!(controller.get_state().is_on_battlefield(land));
    assert_eq!(controller.get_state().turn.step, Some(Step::Upkeep));

    // Bob holds priority during Alice's turn but may not play lands
    controller.provide_decision(Decision::PassPriority).unwrap();
    assert_eq!(controller.get_player_needing_decision(), Some(bob));
    let theirs = controller.get_state().player(bob).unwrap().zones.hand.cards[0];
    assert!(!controller
        .get_available_decisions()
        .iter()
        .any(|d| matches!(d, Decision::PlayLand { .. })));
    assert!(controller
        .provide_decision(Decision::PlayLand { card: theirs })
        .is_err());
}

#[test]
fn test_end_game_stops_everything() {
    let mut controller = Table::new(7).start();
    controller.provide_decision(Decision::EndGame).unwrap();

    assert!(controller.is_game_over());
    assert!(controller.get_state().game_ended);
    assert_eq!(controller.get_player_needing_decision(), None);
    assert!(matches!(
        controller.provide_decision(Decision::PassPriority),
        Err(MtgError::NotWaitingForDecision)
    ));
}
