//! Card effects
//!
//! An effect is what a spell or ability does when it resolves (or, for mana
//! abilities, when it is activated). The built-in variants cover the common
//! cases; `Custom` wraps an arbitrary procedure supplied by the card catalogue.

use crate::core::{CardId, Color, PlayerId};
use crate::game::TransitionContext;
use crate::Result;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Target reference for effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Player(PlayerId),
    Permanent(CardId),
}

pub type Targets = SmallVec<[TargetRef; 2]>;

/// Who and what an effect is executing on behalf of
#[derive(Debug, Clone, PartialEq)]
pub struct EffectScope {
    pub controller: PlayerId,
    pub source: Option<CardId>,
    pub targets: Targets,
}

type EffectProcedure = dyn Fn(&mut TransitionContext, &EffectScope) -> Result<()> + Send + Sync;

/// A catalogue-supplied effect procedure
///
/// Compared by identity: two clones of the same procedure are equal, two
/// separately built procedures are not.
#[derive(Clone)]
pub struct EffectFn(Arc<EffectProcedure>);

impl EffectFn {
    pub fn new<F>(procedure: F) -> Self
    where
        F: Fn(&mut TransitionContext, &EffectScope) -> Result<()> + Send + Sync + 'static,
    {
        EffectFn(Arc::new(procedure))
    }

    pub fn call(&self, ctx: &mut TransitionContext, scope: &EffectScope) -> Result<()> {
        (self.0)(ctx, scope)
    }
}

impl PartialEq for EffectFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EffectFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EffectFn(..)")
    }
}

/// Basic card effects that can be executed
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Does nothing (creature and artifact spells just resolve onto the battlefield)
    None,

    /// Deal damage to each chosen target
    /// Example: "Lightning Bolt deals 3 damage to any target"
    DealDamage { amount: i32 },

    /// Controller gains life
    /// Example: "You gain 3 life"
    GainLife { amount: i32 },

    /// Controller draws cards
    /// Example: "Draw two cards"
    DrawCards { count: u8 },

    /// Add mana to the controller's pool
    /// Example: "{T}: Add {G}"
    AddMana { color: Color, amount: u8 },

    /// Catalogue-supplied procedure
    Custom(EffectFn),
}

impl Effect {
    pub fn custom<F>(procedure: F) -> Self
    where
        F: Fn(&mut TransitionContext, &EffectScope) -> Result<()> + Send + Sync + 'static,
    {
        Effect::Custom(EffectFn::new(procedure))
    }

    pub fn produces_mana(&self) -> bool {
        matches!(self, Effect::AddMana { .. })
    }
}
