//! The stack of spells and abilities awaiting resolution

use crate::core::{CardId, Effect, PlayerId, StackObjectId, Targets};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackObjectKind {
    Spell,
    Ability,
    /// Created by the engine itself, never by a player decision
    EngineInternal,
}

/// A deferred effect waiting on the stack
#[derive(Debug, Clone, PartialEq)]
pub struct StackObject {
    pub id: StackObjectId,
    pub controller: PlayerId,
    pub kind: StackObjectKind,
    pub source: Option<CardId>,
    pub targets: Targets,
    pub effect: Effect,
}

/// LIFO sequence of stack objects; the last element is the top
///
/// Only the top is ever inspected or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    objects: Vec<StackObject>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new top
    pub fn push(&mut self, object: StackObject) {
        self.objects.push(object);
    }

    pub fn peek(&self) -> Option<&StackObject> {
        self.objects.last()
    }

    pub fn pop(&mut self) -> Option<StackObject> {
        self.objects.pop()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate from the top down (resolution order)
    pub fn iter(&self) -> impl Iterator<Item = &StackObject> {
        self.objects.iter().rev()
    }
}
