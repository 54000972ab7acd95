//! Wagon condition and draft animals.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    MAX_OXEN, MAX_WAGON_CONDITION, MIN_OXEN, OXEN_SPEED_MOD, STARTING_OXEN, WAGON_REPAIR_AMOUNT,
};
use crate::numbers::round_f64_to_u32;

/// Display bucket for wagon condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WagonCondition {
    Broken,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl WagonCondition {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Broken => "Broken",
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for WagonCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wagon {
    /// Structural condition in `[0, 100]`.
    #[serde(default = "Wagon::default_condition")]
    pub condition: i32,
    #[serde(default = "Wagon::default_oxen")]
    pub oxen: u32,
}

impl Default for Wagon {
    fn default() -> Self {
        Self {
            condition: Self::default_condition(),
            oxen: Self::default_oxen(),
        }
    }
}

impl Wagon {
    const fn default_condition() -> i32 {
        MAX_WAGON_CONDITION
    }

    const fn default_oxen() -> u32 {
        STARTING_OXEN
    }

    #[must_use]
    pub const fn new(condition: i32, oxen: u32) -> Self {
        Self { condition, oxen }
    }

    /// Reduce condition, clamping at zero. Negative amounts are ignored.
    pub fn damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.condition = self.condition.saturating_sub(amount).max(0);
    }

    /// Restore condition and return the amount actually restored.
    pub fn repair(&mut self, full: bool) -> i32 {
        let amount = if full {
            MAX_WAGON_CONDITION
        } else {
            WAGON_REPAIR_AMOUNT
        };
        let previous = self.condition;
        self.condition = self
            .condition
            .saturating_add(amount)
            .clamp(0, MAX_WAGON_CONDITION);
        self.condition - previous
    }

    /// Buy-side ox addition; refuses past the team limit.
    pub const fn add_oxen(&mut self) -> bool {
        if self.oxen >= MAX_OXEN {
            return false;
        }
        self.oxen += 1;
        true
    }

    /// Sell-side ox removal; never drops below one ox.
    pub const fn remove_oxen(&mut self) -> bool {
        if self.oxen <= MIN_OXEN {
            return false;
        }
        self.oxen -= 1;
        true
    }

    /// An ox dies or is stolen. May leave the wagon without a team.
    pub const fn lose_oxen(&mut self) -> bool {
        if self.oxen == 0 {
            return false;
        }
        self.oxen -= 1;
        true
    }

    /// Multiplier from the team size, zero without the minimum team.
    #[must_use]
    pub fn speed_modifier(&self) -> f64 {
        if self.oxen < MIN_OXEN {
            return 0.0;
        }
        f64::from(self.oxen - MIN_OXEN).mul_add(OXEN_SPEED_MOD, 1.0)
    }

    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.condition <= 0
    }

    #[must_use]
    pub const fn can_travel(&self) -> bool {
        !self.is_broken() && self.oxen >= MIN_OXEN
    }

    #[must_use]
    pub fn condition_percent(&self) -> u32 {
        round_f64_to_u32(f64::from(self.condition) / f64::from(MAX_WAGON_CONDITION) * 100.0)
    }

    #[must_use]
    pub fn condition_status(&self) -> WagonCondition {
        match self.condition_percent() {
            0 => WagonCondition::Broken,
            1..=25 => WagonCondition::Poor,
            26..=50 => WagonCondition::Fair,
            51..=75 => WagonCondition::Good,
            _ => WagonCondition::Excellent,
        }
    }
}
