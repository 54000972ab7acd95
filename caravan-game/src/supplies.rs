//! Consumable supply pools and the deltas applied to them.
use serde::{Deserialize, Serialize};

use crate::constants::{
    STARTING_AMMO, STARTING_FOOD, STARTING_MEDICINE, STARTING_MONEY, STARTING_PARTS,
    VALUE_AMMO_PER_ROUND, VALUE_FOOD_PER_LB, VALUE_MEDICINE_PER_DOSE, VALUE_PARTS_PER_SET,
};
use crate::numbers::usize_to_u32;
use crate::pacing::Rations;

/// Addressable supply pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    Food,
    Ammunition,
    Medicine,
    SpareParts,
    Money,
}

/// Five independent pools, each kept at or above zero by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplies {
    /// Pounds of food.
    pub food: u32,
    /// Rounds of ammunition.
    pub ammunition: u32,
    /// Doses of medicine.
    pub medicine: u32,
    /// Sets of spare wagon parts.
    pub spare_parts: u32,
    pub money: f64,
}

impl Default for Supplies {
    fn default() -> Self {
        Self {
            food: STARTING_FOOD,
            ammunition: STARTING_AMMO,
            medicine: STARTING_MEDICINE,
            spare_parts: STARTING_PARTS,
            money: STARTING_MONEY,
        }
    }
}

impl Supplies {
    /// Starting loadout with the given purse.
    #[must_use]
    pub fn with_money(money: f64) -> Self {
        Self {
            money: money.max(0.0),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            food: 0,
            ammunition: 0,
            medicine: 0,
            spare_parts: 0,
            money: 0.0,
        }
    }

    /// Deduct food if the full amount is on hand.
    pub const fn consume_food(&mut self, amount: u32) -> bool {
        if self.food < amount {
            return false;
        }
        self.food -= amount;
        true
    }

    /// Spend `amount` rounds if they are all on hand.
    pub const fn use_ammo(&mut self, amount: u32) -> bool {
        if self.ammunition < amount {
            return false;
        }
        self.ammunition -= amount;
        true
    }

    /// Spend one dose of medicine.
    pub const fn use_medicine(&mut self) -> bool {
        if self.medicine == 0 {
            return false;
        }
        self.medicine -= 1;
        true
    }

    /// Spend one set of spare parts.
    pub const fn use_parts(&mut self) -> bool {
        if self.spare_parts == 0 {
            return false;
        }
        self.spare_parts -= 1;
        true
    }

    pub fn spend_money(&mut self, amount: f64) -> bool {
        if amount < 0.0 || self.money < amount {
            return false;
        }
        self.money -= amount;
        true
    }

    pub fn add(&mut self, kind: SupplyKind, amount: u32) {
        match kind {
            SupplyKind::Food => self.food = self.food.saturating_add(amount),
            SupplyKind::Ammunition => self.ammunition = self.ammunition.saturating_add(amount),
            SupplyKind::Medicine => self.medicine = self.medicine.saturating_add(amount),
            SupplyKind::SpareParts => self.spare_parts = self.spare_parts.saturating_add(amount),
            SupplyKind::Money => self.money += f64::from(amount),
        }
    }

    #[must_use]
    pub fn has_enough(&self, kind: SupplyKind, amount: u32) -> bool {
        match kind {
            SupplyKind::Food => self.food >= amount,
            SupplyKind::Ammunition => self.ammunition >= amount,
            SupplyKind::Medicine => self.medicine >= amount,
            SupplyKind::SpareParts => self.spare_parts >= amount,
            SupplyKind::Money => self.money >= f64::from(amount),
        }
    }

    #[must_use]
    pub fn can_feed_party(&self, party_size: usize, rations: Rations) -> bool {
        self.food >= daily_food_need(party_size, rations)
    }

    /// Feed the party for one day and return the shortfall in pounds.
    pub fn feed_party(&mut self, party_size: usize, rations: Rations) -> u32 {
        let needed = daily_food_need(party_size, rations);
        if self.food >= needed {
            self.food -= needed;
            return 0;
        }
        let shortfall = needed - self.food;
        self.food = 0;
        shortfall
    }

    /// Trade value of everything carried, money included.
    #[must_use]
    pub fn supply_value(&self) -> f64 {
        f64::from(self.food).mul_add(
            VALUE_FOOD_PER_LB,
            f64::from(self.ammunition).mul_add(
                VALUE_AMMO_PER_ROUND,
                f64::from(self.medicine).mul_add(
                    VALUE_MEDICINE_PER_DOSE,
                    f64::from(self.spare_parts).mul_add(VALUE_PARTS_PER_SET, self.money),
                ),
            ),
        )
    }

    /// Apply a signed delta; every pool floors at zero.
    pub fn apply_delta(&mut self, delta: &SupplyDelta) {
        self.food = add_floored(self.food, delta.food.unwrap_or(0));
        self.ammunition = add_floored(self.ammunition, delta.ammunition.unwrap_or(0));
        self.medicine = add_floored(self.medicine, delta.medicine.unwrap_or(0));
        self.spare_parts = add_floored(self.spare_parts, delta.spare_parts.unwrap_or(0));
        self.money = (self.money + delta.money.unwrap_or(0.0)).max(0.0);
    }

    /// Subtract a loss record whose fields hold positive magnitudes.
    pub fn apply_loss(&mut self, lost: &SupplyDelta) {
        self.apply_delta(&lost.negated());
    }
}

/// Sparse supply change. Absent fields mean zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammunition: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spare_parts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<f64>,
}

impl SupplyDelta {
    #[must_use]
    pub fn food(amount: i64) -> Self {
        Self {
            food: Some(amount),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn money(amount: f64) -> Self {
        Self {
            money: Some(amount),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_ammunition(mut self, amount: i64) -> Self {
        self.ammunition = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_spare_parts(mut self, amount: i64) -> Self {
        self.spare_parts = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_medicine(mut self, amount: i64) -> Self {
        self.medicine = Some(amount);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.food.unwrap_or(0) == 0
            && self.ammunition.unwrap_or(0) == 0
            && self.medicine.unwrap_or(0) == 0
            && self.spare_parts.unwrap_or(0) == 0
            && self.money.unwrap_or(0.0).abs() < f64::EPSILON
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            food: self.food.map(|v| -v),
            ammunition: self.ammunition.map(|v| -v),
            medicine: self.medicine.map(|v| -v),
            spare_parts: self.spare_parts.map(|v| -v),
            money: self.money.map(|v| -v),
        }
    }
}

/// Pounds of food a party of `party_size` eats per day.
#[must_use]
pub fn daily_food_need(party_size: usize, rations: Rations) -> u32 {
    usize_to_u32(party_size).saturating_mul(rations.lbs_per_person())
}

/// Add a signed change to a pool, flooring at zero and saturating at the top.
#[must_use]
pub fn add_floored(current: u32, change: i64) -> u32 {
    let total = i64::from(current).saturating_add(change);
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spends_are_all_or_nothing() {
        let mut supplies = Supplies::empty();
        supplies.food = 5;
        assert!(!supplies.consume_food(6));
        assert_eq!(supplies.food, 5);
        assert!(supplies.consume_food(5));
        assert_eq!(supplies.food, 0);

        assert!(!supplies.use_medicine());
        assert!(!supplies.use_parts());
        assert!(!supplies.spend_money(0.01));
        assert_eq!(supplies, Supplies::empty());
    }

    #[test]
    fn clone_is_independent() {
        let original = Supplies::default();
        let mut copy = original.clone();
        assert_eq!(copy, original);
        copy.food = 1;
        copy.money = 0.0;
        assert_eq!(original.food, STARTING_FOOD);
        assert!((original.money - STARTING_MONEY).abs() < f64::EPSILON);
    }

    #[test]
    fn feeding_reports_shortfall() {
        let mut supplies = Supplies::empty();
        supplies.food = 7;
        assert!(!supplies.can_feed_party(4, Rations::Meager));
        assert_eq!(supplies.feed_party(4, Rations::Meager), 1);
        assert_eq!(supplies.food, 0);

        supplies.food = 20;
        assert_eq!(supplies.feed_party(5, Rations::Filling), 0);
        assert_eq!(supplies.food, 5);
    }

    #[test]
    fn ammo_is_spent_all_or_nothing() {
        let mut supplies = Supplies::empty();
        supplies.ammunition = 10;
        assert!(!supplies.use_ammo(11));
        assert_eq!(supplies.ammunition, 10);
        assert!(supplies.use_ammo(10));
        assert_eq!(supplies.ammunition, 0);
        assert!(supplies.use_ammo(0));
    }

    #[test]
    fn deltas_floor_every_pool() {
        let mut supplies = Supplies::default();
        let loss = SupplyDelta::food(1_000)
            .with_ammunition(3)
            .with_spare_parts(9);
        supplies.apply_loss(&loss);
        assert_eq!(supplies.food, 0);
        assert_eq!(supplies.ammunition, STARTING_AMMO - 3);
        assert_eq!(supplies.spare_parts, 0);

        supplies.apply_delta(&SupplyDelta::money(-10_000.0));
        assert!(supplies.money.abs() < f64::EPSILON);
        assert!(SupplyDelta::default().is_empty());
    }

    #[test]
    fn supply_value_weights_each_pool() {
        let supplies = Supplies {
            food: 100,
            ammunition: 50,
            medicine: 2,
            spare_parts: 1,
            money: 12.5,
        };
        let expected = 20.0 + 5.0 + 10.0 + 10.0 + 12.5;
        assert!((supplies.supply_value() - expected).abs() < 1e-9);
    }

    #[test]
    fn kinds_route_to_pools() {
        let mut supplies = Supplies::empty();
        supplies.add(SupplyKind::Money, 15);
        supplies.add(SupplyKind::Ammunition, 20);
        assert!(supplies.has_enough(SupplyKind::Money, 15));
        assert!(!supplies.has_enough(SupplyKind::Ammunition, 21));
        assert_eq!(daily_food_need(3, Rations::Bare), 3);
        assert_eq!(add_floored(u32::MAX, 5), u32::MAX);
    }
}
