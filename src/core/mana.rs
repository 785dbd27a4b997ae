//! Mana colors, costs and pools

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    /// WUBRG order followed by colorless; also the order generic costs are
    /// paid from
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
            Color::Colorless => write!(f, "C"),
        }
    }
}

/// One counter per color. Shared by costs and pools; counters and totals are
/// `u32` so a pool fed many `u8` additions never wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCounts {
    pub white: u32,
    pub blue: u32,
    pub black: u32,
    pub red: u32,
    pub green: u32,
    pub colorless: u32,
}

impl ColorCounts {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    pub fn get_mut(&mut self, color: Color) -> &mut u32 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        }
    }

    pub fn total(&self) -> u32 {
        Color::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

/// A mana cost: generic mana plus per-color requirements (e.g. "2RR")
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u8,
    pub colored: ColorCounts,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cost of `amount` generic mana
    pub fn generic(amount: u8) -> Self {
        ManaCost {
            generic: amount,
            ..Self::default()
        }
    }

    /// Cost of `amount` mana of one color
    pub fn of(color: Color, amount: u8) -> Self {
        Self::default().plus(color, amount)
    }

    /// Add a colored requirement
    pub fn plus(mut self, color: Color, amount: u8) -> Self {
        *self.colored.get_mut(color) += u32::from(amount);
        self
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        u32::from(self.generic) + self.colored.total()
    }

    pub fn is_free(&self) -> bool {
        self.cmc() == 0
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.colored.total() == 0 {
            write!(f, "{}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored.get(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

/// Mana pool for a player, one counter per color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    counts: ColorCounts,
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        let slot = self.counts.get_mut(color);
        *slot = slot.saturating_add(u32::from(amount));
    }

    pub fn amount(&self, color: Color) -> u32 {
        self.counts.get(color)
    }

    pub fn clear(&mut self) {
        self.counts = ColorCounts::default();
    }

    pub fn total(&self) -> u32 {
        self.counts.total()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Check if this pool covers the colored requirements and the overall total
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        Color::ALL
            .iter()
            .all(|&c| self.counts.get(c) >= cost.colored.get(c))
            && self.total() >= cost.cmc()
    }

    /// Pay a mana cost from this pool
    ///
    /// Colored requirements are paid first, then generic is paid from whatever
    /// remains in WUBRG order followed by colorless. On failure the pool is
    /// unchanged.
    pub fn pay_cost(&mut self, cost: &ManaCost) -> Result<(), String> {
        if !self.can_pay(cost) {
            return Err(format!(
                "Insufficient mana to pay cost {cost}. Pool has: {}W {}U {}B {}R {}G {}C",
                self.counts.white,
                self.counts.blue,
                self.counts.black,
                self.counts.red,
                self.counts.green,
                self.counts.colorless
            ));
        }

        for color in Color::ALL {
            *self.counts.get_mut(color) -= cost.colored.get(color);
        }

        let mut generic_remaining = u32::from(cost.generic);
        for color in Color::ALL {
            let slot = self.counts.get_mut(color);
            let used = generic_remaining.min(*slot);
            *slot -= used;
            generic_remaining -= used;
        }
        debug_assert_eq!(generic_remaining, 0, "Failed to pay generic cost");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_display() {
        let cost = ManaCost::generic(2).plus(Color::Red, 2);
        assert_eq!(cost.to_string(), "2RR");
        assert_eq!(cost.cmc(), 4);
        assert_eq!(ManaCost::new().to_string(), "0");
        assert!(ManaCost::new().is_free());
    }

    #[test]
    fn test_mana_pool() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 2);
        pool.add(Color::Blue, 1);

        assert_eq!(pool.amount(Color::Red), 2);
        assert_eq!(pool.amount(Color::Blue), 1);

        assert!(pool.can_pay(&ManaCost::generic(1).plus(Color::Red, 1)));
        assert!(pool.can_pay(&ManaCost::generic(2).plus(Color::Red, 1)));
        // Only 3 mana
        assert!(!pool.can_pay(&ManaCost::generic(3).plus(Color::Red, 1)));
        // Need 3 red, only have 2
        assert!(!pool.can_pay(&ManaCost::of(Color::Red, 3)));
    }

    #[test]
    fn test_pay_cost_with_generic() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 2);
        pool.add(Color::Blue, 1);

        // 1R: red for R, then blue comes first in WUBRG order for the generic
        pool.pay_cost(&ManaCost::generic(1).plus(Color::Red, 1)).unwrap();
        assert_eq!(pool.amount(Color::Red), 1);
        assert_eq!(pool.amount(Color::Blue), 0);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn test_pay_cost_insufficient_leaves_pool_unchanged() {
        let mut pool = ManaPool::new();
        pool.add(Color::Blue, 2);

        assert!(pool.pay_cost(&ManaCost::of(Color::Red, 2)).is_err());
        assert_eq!(pool.amount(Color::Blue), 2);
        assert_eq!(pool.amount(Color::Red), 0);
    }

    #[test]
    fn test_clear() {
        let mut pool = ManaPool::new();
        pool.add(Color::Green, 3);
        pool.add(Color::Colorless, 2);
        assert_eq!(pool.total(), 5);
        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_holds_more_than_u8_total() {
        let mut pool = ManaPool::new();
        pool.add(Color::Green, 200);
        pool.add(Color::Red, 100);
        pool.add(Color::Green, 200);

        assert!(!pool.is_empty());
        assert_eq!(pool.amount(Color::Green), 400);
        assert_eq!(pool.total(), 500);

        let big = ManaCost::generic(250).plus(Color::Red, 100).plus(Color::Green, 100);
        assert_eq!(big.cmc(), 450);
        assert!(pool.can_pay(&big));
        pool.pay_cost(&big).unwrap();
        assert_eq!(pool.total(), 50);
        assert_eq!(pool.amount(Color::Red), 0);
    }
}
