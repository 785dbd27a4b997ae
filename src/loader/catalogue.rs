//! Card catalogue: named definition templates
//!
//! Definitions come from code rather than card files. Each template is
//! registered with a game when a deck that uses it is loaded.

use crate::core::{
    ActivatedAbility, CardDefinition, CardType, Color, Cost, Effect, ManaCost, SpellAbility, TargetKind,
    TargetRef, TargetRequirement,
};
use crate::{MtgError, Result};
use rustc_hash::FxHashMap;

/// Lookup table from card name to definition template
#[derive(Debug, Clone, Default)]
pub struct CardCatalogue {
    cards: FxHashMap<String, CardDefinition>,
}

impl CardCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in card pool
    pub fn standard() -> Self {
        let mut catalogue = Self::new();
        for (name, color) in [
            ("Plains", Color::White),
            ("Island", Color::Blue),
            ("Swamp", Color::Black),
            ("Mountain", Color::Red),
            ("Forest", Color::Green),
        ] {
            catalogue.insert(CardDefinition::basic_land(name, color));
        }

        catalogue.insert(
            CardDefinition::new("Lightning Bolt")
                .with_type(CardType::Instant)
                .with_cost(ManaCost::of(Color::Red, 1))
                .with_spell(
                    SpellAbility::instant(Effect::DealDamage { amount: 3 })
                        .targeting(TargetRequirement::single(TargetKind::AnyTarget)),
                ),
        );
        catalogue.insert(
            CardDefinition::new("Healing Salve")
                .with_type(CardType::Instant)
                .with_cost(ManaCost::of(Color::White, 1))
                .with_spell(SpellAbility::instant(Effect::GainLife { amount: 3 })),
        );
        catalogue.insert(
            CardDefinition::new("Divination")
                .with_type(CardType::Sorcery)
                .with_cost(ManaCost::generic(2).plus(Color::Blue, 1))
                .with_spell(SpellAbility::sorcery(Effect::DrawCards { count: 2 })),
        );
        catalogue.insert(
            CardDefinition::new("Sign in Blood")
                .with_type(CardType::Sorcery)
                .with_cost(ManaCost::of(Color::Black, 2))
                .with_spell(
                    SpellAbility::sorcery(Effect::custom(|ctx, scope| {
                        // Target player draws two cards and loses 2 life
                        for target in &scope.targets {
                            if let TargetRef::Player(player) = *target {
                                for _ in 0..2 {
                                    ctx.draw_card(player)?;
                                }
                                ctx.state.player_mut(player)?.lose_life(2);
                            }
                        }
                        Ok(())
                    }))
                    .targeting(TargetRequirement::single(TargetKind::Player)),
                ),
        );
        catalogue.insert(
            CardDefinition::new("Grizzly Bears")
                .with_type(CardType::Creature)
                .with_cost(ManaCost::generic(1).plus(Color::Green, 1))
                .with_stats(2, 2)
                .with_spell(SpellAbility::sorcery(Effect::None)),
        );
        catalogue.insert(
            CardDefinition::new("Llanowar Elves")
                .with_type(CardType::Creature)
                .with_cost(ManaCost::of(Color::Green, 1))
                .with_stats(1, 1)
                .with_spell(SpellAbility::sorcery(Effect::None))
                .with_ability(ActivatedAbility::mana(
                    vec![Cost::Tap],
                    Effect::AddMana {
                        color: Color::Green,
                        amount: 1,
                    },
                    "{T}: Add {G}.",
                )),
        );
        catalogue.insert(
            CardDefinition::new("Sol Ring")
                .with_type(CardType::Artifact)
                .with_cost(ManaCost::generic(1))
                .with_spell(SpellAbility::sorcery(Effect::None))
                .with_ability(ActivatedAbility::mana(
                    vec![Cost::Tap],
                    Effect::AddMana {
                        color: Color::Colorless,
                        amount: 2,
                    },
                    "{T}: Add {C}{C}.",
                )),
        );
        catalogue.insert(
            CardDefinition::new("Prodigal Pyromancer")
                .with_type(CardType::Creature)
                .with_cost(ManaCost::generic(2).plus(Color::Red, 1))
                .with_stats(1, 1)
                .with_spell(SpellAbility::sorcery(Effect::None))
                .with_ability(
                    ActivatedAbility::new(
                        vec![Cost::Tap],
                        Effect::DealDamage { amount: 1 },
                        "{T}: Prodigal Pyromancer deals 1 damage to any target.",
                    )
                    .targeting(TargetRequirement::single(TargetKind::AnyTarget)),
                ),
        );
        catalogue.insert(
            CardDefinition::new("Bottle Gnomes")
                .with_type(CardType::Artifact)
                .with_type(CardType::Creature)
                .with_cost(ManaCost::generic(3))
                .with_stats(1, 3)
                .with_spell(SpellAbility::sorcery(Effect::None))
                .with_ability(ActivatedAbility::new(
                    vec![Cost::Sacrifice],
                    Effect::GainLife { amount: 3 },
                    "Sacrifice Bottle Gnomes: You gain 3 life.",
                )),
        );
        catalogue
    }

    /// Add or replace a template (names match case-insensitively)
    pub fn insert(&mut self, definition: CardDefinition) {
        self.cards.insert(Self::key(definition.name.as_str()), definition);
    }

    pub fn get(&self, name: &str) -> Result<&CardDefinition> {
        self.cards
            .get(&Self::key(name))
            .ok_or_else(|| MtgError::UnknownCard(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&Self::key(name))
    }

    /// Card names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cards.values().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
