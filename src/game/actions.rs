//! Game actions and the reducer that applies them
//!
//! `ActionReducer::reduce` is the only way game state changes. It copies the
//! incoming state into a `TransitionContext`, runs the handler for the action
//! against the copy and returns the copy with the events it produced. When a
//! handler fails the copy is dropped, so the caller's state is never touched.

use crate::core::{
    ActivatedAbility, CardId, Cost, EffectScope, PlayerId, SpellAbility, StackObjectId, Targets, Timing,
};
use crate::game::{GameEvent, GameState, Rules, StackObject, StackObjectKind, TransitionContext, TurnClock};
use crate::zones::Zone;
use crate::{MtgError, Result};

/// Types of game actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    /// Draw the top card of the player's library
    DrawCard { player_id: PlayerId },

    /// Play a land from hand
    PlayLand { player_id: PlayerId, card_id: CardId },

    /// Cast a spell from hand
    CastSpell {
        player_id: PlayerId,
        card_id: CardId,
        targets: Targets,
    },

    /// Activate an ability of a permanent on the battlefield
    ActivateAbility {
        player_id: PlayerId,
        card_id: CardId,
        ability_index: usize,
        targets: Targets,
    },

    /// Tap a basic land for one mana of its color
    TapPermanentForMana { player_id: PlayerId, card_id: CardId },

    /// Engine only: resolve the top of the stack
    ResolveTopOfStack,

    /// Engine only: move the turn clock forward one step
    AdvanceToNextStep,
}

impl GameAction {
    /// Actions players may submit; the rest are driven by the engine
    pub fn is_player_action(&self) -> bool {
        !matches!(self, GameAction::ResolveTopOfStack | GameAction::AdvanceToNextStep)
    }
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Applies actions to states, one transition at a time
#[derive(Debug, Clone, Default)]
pub struct ActionReducer {
    rules: Rules,
}

impl ActionReducer {
    pub fn new(rules: Rules) -> Self {
        ActionReducer { rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Apply `action` to a copy of `state`
    pub fn reduce(&self, state: &GameState, action: &GameAction) -> Result<Transition> {
        let mut ctx = TransitionContext::new(state);

        match action {
            GameAction::DrawCard { player_id } => self.draw_card(&mut ctx, *player_id)?,
            GameAction::PlayLand { player_id, card_id } => self.play_land(&mut ctx, *player_id, *card_id)?,
            GameAction::CastSpell {
                player_id,
                card_id,
                targets,
            } => self.cast_spell(&mut ctx, *player_id, *card_id, targets)?,
            GameAction::ActivateAbility {
                player_id,
                card_id,
                ability_index,
                targets,
            } => self.activate_ability(&mut ctx, *player_id, *card_id, *ability_index, targets)?,
            GameAction::TapPermanentForMana { player_id, card_id } => {
                self.tap_for_mana(&mut ctx, *player_id, *card_id)?
            }
            GameAction::ResolveTopOfStack => self.resolve_top_of_stack(&mut ctx)?,
            GameAction::AdvanceToNextStep => self.advance_to_next_step(&mut ctx)?,
        }

        Ok(ctx.finish())
    }

    /// Run the turn-based actions of the step the game starts in
    pub fn begin_game(&self, state: &GameState) -> Result<Transition> {
        let mut ctx = TransitionContext::new(state);
        ctx.state.next_player_with_priority()?;
        ctx.perform_turn_based_actions()?;
        ctx.state.reset_passes();
        Ok(ctx.finish())
    }

    fn draw_card(&self, ctx: &mut TransitionContext, player_id: PlayerId) -> Result<()> {
        if ctx.draw_card(player_id)?.is_none() {
            return TransitionContext::reject("Cannot draw from an empty library");
        }
        ctx.state.reset_passes();
        Ok(())
    }

    fn play_land(&self, ctx: &mut TransitionContext, player_id: PlayerId, card_id: CardId) -> Result<()> {
        let player = ctx.state.player(player_id)?;
        if !player.zones.hand.contains(card_id) {
            return TransitionContext::reject("Card not in hand");
        }
        if !ctx.state.definition_of(card_id)?.is_land() {
            return TransitionContext::reject("Card is not a land");
        }
        if ctx.state.turn.active_player != player_id {
            return TransitionContext::reject("Only the active player can play lands");
        }
        if ctx.state.turn.lands_played_this_turn >= player.land_plays_per_turn {
            return TransitionContext::reject("Cannot play more lands this turn");
        }

        ctx.move_card(card_id, Zone::Hand, Zone::Battlefield)?;
        ctx.state.turn.lands_played_this_turn += 1;
        ctx.state.reset_passes();
        Ok(())
    }

    fn cast_spell(
        &self,
        ctx: &mut TransitionContext,
        player_id: PlayerId,
        card_id: CardId,
        targets: &Targets,
    ) -> Result<()> {
        if !ctx.state.player(player_id)?.zones.hand.contains(card_id) {
            return TransitionContext::reject("Card not in hand");
        }

        let definition = ctx.state.definition_of(card_id)?;
        let Some(spell) = definition.spell.clone() else {
            return TransitionContext::reject(format!("{} cannot be cast", definition.name));
        };
        let mana_cost = definition.mana_cost;

        check_timing(&ctx.state, player_id, spell.timing)?;
        self.rules
            .validate_targets(&ctx.state, spell.targeting.as_ref(), player_id, targets)?;

        self.rules.payment.pay(&mut ctx.state, player_id, &mana_cost)?;
        ctx.state.move_card(card_id, Zone::Hand, Zone::Stack)?;

        let stack_object = push_spell(ctx, player_id, card_id, spell, targets.clone());
        ctx.emit(GameEvent::SpellCast {
            player: player_id,
            card: card_id,
            stack_object,
        });
        ctx.state.reset_passes();
        Ok(())
    }

    fn activate_ability(
        &self,
        ctx: &mut TransitionContext,
        player_id: PlayerId,
        card_id: CardId,
        ability_index: usize,
        targets: &Targets,
    ) -> Result<()> {
        if !ctx.state.player(player_id)?.zones.battlefield.contains(card_id) {
            return TransitionContext::reject("Permanent is not on your battlefield");
        }
        if ctx.state.card(card_id)?.controller != player_id {
            return TransitionContext::reject("You do not control that permanent");
        }

        let ability = ctx
            .state
            .definition_of(card_id)?
            .activated_abilities
            .get(ability_index)
            .cloned()
            .ok_or_else(|| MtgError::invalid(format!("No activated ability at index {ability_index}")))?;

        if !ability.is_mana_ability() {
            check_timing(&ctx.state, player_id, ability.timing)?;
        }
        self.rules
            .validate_targets(&ctx.state, ability.targeting.as_ref(), player_id, targets)?;

        self.pay_costs(ctx, player_id, card_id, &ability)?;

        if ability.is_mana_ability() {
            ctx.emit(GameEvent::ManaAbilityActivated {
                player: player_id,
                card: card_id,
                ability_index,
            });
            let scope = EffectScope {
                controller: player_id,
                source: Some(card_id),
                targets: Targets::new(),
            };
            ctx.execute_effect(&ability.effect, &scope)?;
        } else {
            // The permanent stays where it is, so the stack object carries no source card
            let id: StackObjectId = ctx.state.next_id();
            ctx.state.stack.push(StackObject {
                id,
                controller: player_id,
                kind: StackObjectKind::Ability,
                source: None,
                targets: targets.clone(),
                effect: ability.effect,
            });
            ctx.emit(GameEvent::AbilityActivated {
                player: player_id,
                card: card_id,
                ability_index,
                stack_object: id,
            });
        }

        ctx.state.reset_passes();
        Ok(())
    }

    /// Pay each cost in the order the ability lists them
    fn pay_costs(
        &self,
        ctx: &mut TransitionContext,
        player_id: PlayerId,
        card_id: CardId,
        ability: &ActivatedAbility,
    ) -> Result<()> {
        for cost in &ability.costs {
            match cost {
                Cost::Tap => {
                    let card = ctx.state.card_mut(card_id)?;
                    if card.tapped {
                        return TransitionContext::reject("Permanent is already tapped");
                    }
                    card.tap();
                }
                Cost::Mana(mana) => self.rules.payment.pay(&mut ctx.state, player_id, mana)?,
                Cost::PayLife { amount } => {
                    let player = ctx.state.player_mut(player_id)?;
                    if player.life < *amount {
                        return TransitionContext::reject(format!("Cannot pay {amount} life"));
                    }
                    player.lose_life(*amount);
                }
                Cost::Sacrifice => {
                    if !ctx.state.is_on_battlefield(card_id) {
                        return TransitionContext::reject("Permanent was already sacrificed");
                    }
                    ctx.move_card(card_id, Zone::Battlefield, Zone::Graveyard)?;
                }
            }
        }
        Ok(())
    }

    fn tap_for_mana(&self, ctx: &mut TransitionContext, player_id: PlayerId, card_id: CardId) -> Result<()> {
        if !ctx.state.player(player_id)?.zones.battlefield.contains(card_id) {
            return TransitionContext::reject("Permanent is not on your battlefield");
        }
        let Some(color) = ctx.state.definition_of(card_id)?.tap_color else {
            return TransitionContext::reject("This permanent does not tap for mana");
        };

        let card = ctx.state.card_mut(card_id)?;
        if card.controller != player_id {
            return TransitionContext::reject("You do not control that permanent");
        }
        if card.tapped {
            return TransitionContext::reject("Permanent is already tapped");
        }
        card.tap();

        ctx.add_mana(player_id, color, 1)?;
        ctx.state.reset_passes();
        Ok(())
    }

    fn resolve_top_of_stack(&self, ctx: &mut TransitionContext) -> Result<()> {
        let Some(object) = ctx.state.stack.pop() else {
            return TransitionContext::reject("Stack is empty");
        };

        let scope = EffectScope {
            controller: object.controller,
            source: object.source,
            targets: object.targets.clone(),
        };
        ctx.execute_effect(&object.effect, &scope)?;

        if object.kind != StackObjectKind::EngineInternal {
            ctx.emit(GameEvent::SpellResolved {
                stack_object: object.id,
                controller: object.controller,
                source: object.source,
                kind: object.kind,
            });
        }

        // A resolved spell or ability puts its source card into the graveyard
        if let (StackObjectKind::Spell | StackObjectKind::Ability, Some(card_id)) =
            (object.kind, object.source)
        {
            let from = ctx.state.locate_card(card_id).map_or(Zone::Stack, |(_, zone)| zone);
            if from != Zone::Graveyard {
                ctx.move_card(card_id, from, Zone::Graveyard)?;
            }
        }

        ctx.state.reset_passes();
        Ok(())
    }

    fn advance_to_next_step(&self, ctx: &mut TransitionContext) -> Result<()> {
        let seating = ctx.state.seating();
        ctx.state.turn = TurnClock::advance(&ctx.state.turn, &seating)?;
        ctx.perform_turn_based_actions()?;
        ctx.state.reset_passes();
        Ok(())
    }
}

/// Sorcery timing needs the player's own main phase with an empty stack
fn check_timing(state: &GameState, player_id: PlayerId, timing: Timing) -> Result<()> {
    match timing {
        Timing::Instant => Ok(()),
        Timing::Sorcery if state.in_sorcery_window(player_id) => Ok(()),
        Timing::Sorcery => TransitionContext::reject(
            "Only possible in your main phase while the stack is empty",
        ),
    }
}

fn push_spell(
    ctx: &mut TransitionContext,
    player_id: PlayerId,
    card_id: CardId,
    spell: SpellAbility,
    targets: Targets,
) -> StackObjectId {
    let id = ctx.state.next_id();
    ctx.state.stack.push(StackObject {
        id,
        controller: player_id,
        kind: StackObjectKind::Spell,
        source: Some(card_id),
        targets,
        effect: spell.effect,
    });
    id
}
