//! Card definitions (shared templates) and card instances (per-copy state)

use crate::core::{
    ActivatedAbility, CardDefId, CardId, CardName, Color, GameEntity, ManaCost, PlayerId,
    SpellAbility,
};
use smallvec::SmallVec;

/// Card types in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Planeswalker,
}

impl CardType {
    pub fn is_permanent(&self) -> bool {
        !matches!(self, CardType::Instant | CardType::Sorcery)
    }
}

/// Shared template for a card. Many instances (across players) may point at
/// the same definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDefinition {
    pub id: CardDefId,
    pub name: CardName,
    pub types: SmallVec<[CardType; 2]>,
    pub mana_cost: ManaCost,
    pub power: Option<i8>,
    pub toughness: Option<i8>,
    /// Present when the card can be cast from hand
    pub spell: Option<SpellAbility>,
    pub activated_abilities: Vec<ActivatedAbility>,
    /// Color added by the simplified tap-for-mana action (basic lands)
    pub tap_color: Option<Color>,
}

impl CardDefinition {
    /// A bare definition; the id is assigned when registered with a game
    pub fn new(name: impl Into<CardName>) -> Self {
        CardDefinition {
            id: CardDefId::new(0),
            name: name.into(),
            types: SmallVec::new(),
            mana_cost: ManaCost::new(),
            power: None,
            toughness: None,
            spell: None,
            activated_abilities: Vec::new(),
            tap_color: None,
        }
    }

    /// A basic land that taps for one mana of `color`
    pub fn basic_land(name: impl Into<CardName>, color: Color) -> Self {
        let mut def = Self::new(name).with_type(CardType::Land);
        def.tap_color = Some(color);
        def
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_stats(mut self, power: i8, toughness: i8) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    pub fn with_spell(mut self, spell: SpellAbility) -> Self {
        self.spell = Some(spell);
        self
    }

    pub fn with_ability(mut self, ability: ActivatedAbility) -> Self {
        self.activated_abilities.push(ability);
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    /// Resolving spells of this card stay on the battlefield
    pub fn is_permanent(&self) -> bool {
        !self.types.is_empty() && self.types.iter().all(CardType::is_permanent)
    }
}

/// A single physical copy of a card in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInstance {
    pub id: CardId,
    pub definition_id: CardDefId,
    /// Whose zones the card returns to (graveyard, hand)
    pub owner: PlayerId,
    pub controller: PlayerId,
    pub tapped: bool,
}

impl CardInstance {
    pub fn new(id: CardId, definition_id: CardDefId, owner: PlayerId) -> Self {
        CardInstance {
            id,
            definition_id,
            owner,
            controller: owner,
            tapped: false,
        }
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }
}

impl GameEntity<CardDefinition> for CardDefinition {
    fn id(&self) -> CardDefId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Effect;

    #[test]
    fn test_definition_builders() {
        let bears = CardDefinition::new("Grizzly Bears")
            .with_type(CardType::Creature)
            .with_cost(ManaCost::generic(1).plus(Color::Green, 1))
            .with_stats(2, 2)
            .with_spell(SpellAbility::sorcery(Effect::None));

        assert!(bears.is_creature());
        assert!(bears.is_permanent());
        assert!(!bears.is_land());
        assert_eq!(bears.mana_cost.cmc(), 2);
        assert_eq!(bears.toughness, Some(2));
    }

    #[test]
    fn test_instants_are_not_permanents() {
        let bolt = CardDefinition::new("Lightning Bolt").with_type(CardType::Instant);
        assert!(!bolt.is_permanent());

        let forest = CardDefinition::basic_land("Forest", Color::Green);
        assert!(forest.is_land());
        assert!(forest.is_permanent());
        assert_eq!(forest.tap_color, Some(Color::Green));
    }

    #[test]
    fn test_instance_tapping() {
        let mut card = CardInstance::new(CardId::new(5), CardDefId::new(1), PlayerId::new(0));
        assert_eq!(card.controller, card.owner);
        card.tap();
        assert!(card.tapped);
        card.untap();
        assert!(!card.tapped);
    }
}
