//! Working area for a single state transition
//!
//! A transition owns a fresh copy of the state plus the list of events it has
//! produced so far. Handlers and effect procedures edit the copy through these
//! helpers, which keep the events in step with the changes.

use crate::core::{CardId, Color, Effect, EffectScope, PlayerId, TargetRef};
use crate::game::{GameEvent, GameState, Transition};
use crate::zones::Zone;
use crate::{MtgError, Result};

#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl TransitionContext {
    /// Start a transition from a copy of `state`
    pub fn new(state: &GameState) -> Self {
        TransitionContext {
            state: state.clone(),
            events: Vec::new(),
        }
    }

    pub fn finish(self) -> Transition {
        Transition {
            state: self.state,
            events: self.events,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Move a card and report it
    pub fn move_card(&mut self, card: CardId, from: Zone, to: Zone) -> Result<()> {
        self.state.move_card(card, from, to)?;
        let owner = self.state.card(card)?.owner;
        self.emit(GameEvent::CardMoved { card, from, to, owner });
        Ok(())
    }

    /// Draw the top card of a library; `None` when the library is empty
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Option<CardId>> {
        let Some(card) = self.state.player(player)?.zones.library.peek_top() else {
            return Ok(None);
        };
        self.move_card(card, Zone::Library, Zone::Hand)?;
        Ok(Some(card))
    }

    pub fn add_mana(&mut self, player: PlayerId, color: Color, amount: u8) -> Result<()> {
        self.state.player_mut(player)?.mana_pool.add(color, amount);
        self.emit(GameEvent::ManaAdded { player, color, amount });
        Ok(())
    }

    pub fn gain_life(&mut self, player: PlayerId, amount: i32) -> Result<()> {
        self.state.player_mut(player)?.gain_life(amount);
        self.emit(GameEvent::LifeGained { player, amount });
        Ok(())
    }

    /// Deal damage to a player or a creature
    ///
    /// A creature dealt damage at least equal to its toughness goes to its
    /// owner's graveyard. Targets that are gone, or permanents that are not
    /// creatures, are skipped without error.
    pub fn deal_damage(&mut self, source: Option<CardId>, target: TargetRef, amount: i32) -> Result<()> {
        match target {
            TargetRef::Player(player) => {
                if !self.state.has_player(player) {
                    return Ok(());
                }
                self.state.player_mut(player)?.lose_life(amount);
            }
            TargetRef::Permanent(card) => {
                if !self.state.is_on_battlefield(card) {
                    return Ok(());
                }
                let Some(toughness) = self.state.definition_of(card)?.toughness else {
                    return Ok(());
                };
                self.emit(GameEvent::DirectDamageApplied { source, target, amount });
                if amount >= i32::from(toughness) {
                    self.move_card(card, Zone::Battlefield, Zone::Graveyard)?;
                }
                return Ok(());
            }
        }
        self.emit(GameEvent::DirectDamageApplied { source, target, amount });
        Ok(())
    }

    /// Run an effect on behalf of `scope`
    pub fn execute_effect(&mut self, effect: &Effect, scope: &EffectScope) -> Result<()> {
        match effect {
            Effect::None => Ok(()),
            Effect::DealDamage { amount } => {
                for &target in &scope.targets {
                    self.deal_damage(scope.source, target, *amount)?;
                }
                Ok(())
            }
            Effect::GainLife { amount } => self.gain_life(scope.controller, *amount),
            Effect::DrawCards { count } => {
                for _ in 0..*count {
                    if self.draw_card(scope.controller)?.is_none() {
                        break;
                    }
                }
                Ok(())
            }
            Effect::AddMana { color, amount } => self.add_mana(scope.controller, *color, *amount),
            Effect::Custom(procedure) => procedure.call(self, scope),
        }
    }

    /// Shorthand for the error raised by handlers on a rules violation
    pub fn reject<T>(message: impl Into<String>) -> Result<T> {
        Err(MtgError::invalid(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, CardType};
    use smallvec::smallvec;

    fn setup() -> (GameState, PlayerId, PlayerId) {
        let game = GameState::new_two_player("Alice", "Bob", 20);
        let (alice, bob) = (game.players[0].id, game.players[1].id);
        (game, alice, bob)
    }

    fn scope(controller: PlayerId, targets: crate::core::Targets) -> EffectScope {
        EffectScope {
            controller,
            source: None,
            targets,
        }
    }

    #[test]
    fn test_context_leaves_original_untouched() {
        let (game, alice, _) = setup();
        let mut ctx = TransitionContext::new(&game);
        ctx.gain_life(alice, 3).unwrap();

        assert_eq!(game.player(alice).unwrap().life, 20);
        let transition = ctx.finish();
        assert_eq!(transition.state.player(alice).unwrap().life, 23);
        assert_eq!(
            transition.events,
            vec![GameEvent::LifeGained { player: alice, amount: 3 }]
        );
    }

    #[test]
    fn test_damage_to_player_and_creature() {
        let (mut game, alice, bob) = setup();
        let bears = game.register_definition(
            CardDefinition::new("Grizzly Bears")
                .with_type(CardType::Creature)
                .with_stats(2, 2),
        );
        let creature = game.create_card(bears, alice, Zone::Battlefield).unwrap();

        let mut ctx = TransitionContext::new(&game);
        let targets = smallvec![TargetRef::Player(bob), TargetRef::Permanent(creature)];
        ctx.execute_effect(&Effect::DealDamage { amount: 3 }, &scope(alice, targets))
            .unwrap();

        assert_eq!(ctx.state.player(bob).unwrap().life, 17);
        assert_eq!(ctx.state.locate_card(creature), Some((alice, Zone::Graveyard)));
        assert_eq!(ctx.events.len(), 3);
    }

    #[test]
    fn test_damage_to_missing_target_is_skipped() {
        let (game, alice, _) = setup();
        let mut ctx = TransitionContext::new(&game);
        let targets = smallvec![TargetRef::Permanent(CardId::new(77))];
        ctx.execute_effect(&Effect::DealDamage { amount: 3 }, &scope(alice, targets))
            .unwrap();
        assert!(ctx.events.is_empty());
        assert_eq!(ctx.state, game);
    }

    #[test]
    fn test_draw_stops_at_empty_library() {
        let (mut game, alice, _) = setup();
        let def = game.register_definition(CardDefinition::basic_land("Island", Color::Blue));
        game.create_card(def, alice, Zone::Library).unwrap();

        let mut ctx = TransitionContext::new(&game);
        ctx.execute_effect(&Effect::DrawCards { count: 2 }, &scope(alice, smallvec![]))
            .unwrap();
        assert_eq!(ctx.state.player(alice).unwrap().zones.hand.len(), 1);
        assert!(ctx.state.player(alice).unwrap().zones.library.is_empty());
    }

    #[test]
    fn test_custom_effect_runs_with_scope() {
        let (game, alice, _) = setup();
        let effect = Effect::custom(|ctx, scope| ctx.add_mana(scope.controller, Color::Black, 2));
        let mut ctx = TransitionContext::new(&game);
        ctx.execute_effect(&effect, &scope(alice, smallvec![])).unwrap();
        assert_eq!(ctx.state.player(alice).unwrap().mana_pool.amount(Color::Black), 2);
    }
}
