//! River crossing strategies and the disasters they risk.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{
    CAULK_BASE_RISK, DROWNING_CHANCE, FERRY_COST_PER_DIFFICULTY, FERRY_MAX_COST, FORD_BASE_RISK,
    LOSS_FRACTION_CATASTROPHIC, LOSS_FRACTION_MAJOR, LOSS_FRACTION_MINOR, MIN_RIVER_DIFFICULTY,
    WAIT_DEFAULT_DAYS, WAIT_DIFFICULTY_REDUCTION,
};
use crate::numbers::{floor_f64_to_u32, round_f64_to_u32};
use crate::party::{MemberId, Party};
use crate::rng::RandomSource;
use crate::supplies::{Supplies, SupplyDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverMethod {
    Ford,
    Caulk,
    Ferry,
    Wait,
}

impl RiverMethod {
    pub const ALL: [Self; 4] = [Self::Ford, Self::Caulk, Self::Ferry, Self::Wait];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ford => "ford",
            Self::Caulk => "caulk",
            Self::Ferry => "ferry",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for RiverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    Catastrophic,
}

impl Severity {
    /// Ford thresholds: minor below 0.50, major below 0.85.
    fn for_ford(roll: f64) -> Self {
        Self::from_thresholds(roll, 0.5, 0.85)
    }

    /// Caulking fails more gently: minor below 0.60, major below 0.95.
    fn for_caulk(roll: f64) -> Self {
        Self::from_thresholds(roll, 0.6, 0.95)
    }

    fn from_thresholds(roll: f64, minor: f64, major: f64) -> Self {
        if roll < minor {
            Self::Minor
        } else if roll < major {
            Self::Major
        } else {
            Self::Catastrophic
        }
    }
}

/// Outcome of a crossing attempt. Losses hold positive magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverResult {
    pub method: RiverMethod,
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub supplies_lost: SupplyDelta,
    #[serde(default)]
    pub members_lost: SmallVec<[MemberId; 1]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl RiverResult {
    fn plain(method: RiverMethod, success: bool, message: impl Into<String>) -> Self {
        Self {
            method,
            success,
            message: message.into(),
            supplies_lost: SupplyDelta::default(),
            members_lost: SmallVec::new(),
            severity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitResult {
    pub new_difficulty: u8,
    pub days_lost: u8,
    pub message: String,
}

#[must_use]
pub fn ford_risk(difficulty: u8) -> f64 {
    (f64::from(difficulty) * FORD_BASE_RISK).min(1.0)
}

#[must_use]
pub fn caulk_risk(difficulty: u8) -> f64 {
    (f64::from(difficulty) * CAULK_BASE_RISK).min(1.0)
}

#[must_use]
pub fn ferry_cost(difficulty: u8) -> u32 {
    (u32::from(difficulty) * FERRY_COST_PER_DIFFICULTY).min(FERRY_MAX_COST)
}

#[must_use]
pub fn can_afford_ferry(money: f64, difficulty: u8) -> bool {
    money >= f64::from(ferry_cost(difficulty))
}

#[must_use]
pub const fn can_caulk(spare_parts: u32) -> bool {
    spare_parts >= 1
}

struct DisasterLoss {
    supplies_lost: SupplyDelta,
    members_lost: SmallVec<[MemberId; 1]>,
}

fn fraction_of(amount: u32, fraction: f64) -> i64 {
    i64::from(floor_f64_to_u32(f64::from(amount) * fraction))
}

fn disaster_loss(
    severity: Severity,
    supplies: &Supplies,
    party: &Party,
    rng: &mut impl RandomSource,
) -> DisasterLoss {
    let mut members_lost = SmallVec::new();
    let supplies_lost = match severity {
        Severity::Minor => SupplyDelta::food(fraction_of(supplies.food, LOSS_FRACTION_MINOR)),
        Severity::Major => SupplyDelta::food(fraction_of(supplies.food, LOSS_FRACTION_MAJOR))
            .with_ammunition(fraction_of(supplies.ammunition, LOSS_FRACTION_MAJOR)),
        Severity::Catastrophic => {
            if rng.next_f64() < DROWNING_CHANCE
                && let Some(victim) = party.random_alive(rng)
            {
                members_lost.push(victim);
            }
            SupplyDelta::food(fraction_of(supplies.food, LOSS_FRACTION_CATASTROPHIC))
                .with_ammunition(fraction_of(supplies.ammunition, LOSS_FRACTION_CATASTROPHIC))
                .with_spare_parts(fraction_of(
                    supplies.spare_parts,
                    LOSS_FRACTION_CATASTROPHIC,
                ))
        }
    };
    DisasterLoss {
        supplies_lost,
        members_lost,
    }
}

/// Drive the wagon through the water. Free, and the riskiest option.
pub fn ford(
    difficulty: u8,
    supplies: &Supplies,
    party: &Party,
    rng: &mut impl RandomSource,
) -> RiverResult {
    if rng.next_f64() > ford_risk(difficulty) {
        return RiverResult::plain(RiverMethod::Ford, true, "You successfully forded the river.");
    }

    let severity = Severity::for_ford(rng.next_f64());
    let loss = disaster_loss(severity, supplies, party, rng);
    let mut message = match severity {
        Severity::Minor => "The crossing was rough. You lost some supplies.".to_string(),
        Severity::Major => "The wagon nearly capsized! You lost significant supplies.".to_string(),
        Severity::Catastrophic => "Disaster! The wagon overturned in the river.".to_string(),
    };
    if !loss.members_lost.is_empty() {
        message.push_str(" Someone drowned.");
    }

    RiverResult {
        method: RiverMethod::Ford,
        success: false,
        message,
        supplies_lost: loss.supplies_lost,
        members_lost: loss.members_lost,
        severity: Some(severity),
    }
}

/// Seal the wagon bed and float it across. Always uses one spare part.
pub fn caulk_and_float(
    difficulty: u8,
    supplies: &Supplies,
    party: &Party,
    rng: &mut impl RandomSource,
) -> RiverResult {
    if !can_caulk(supplies.spare_parts) {
        return RiverResult::plain(
            RiverMethod::Caulk,
            false,
            "You need spare parts to caulk the wagon.",
        );
    }

    if rng.next_f64() > caulk_risk(difficulty) {
        let mut result = RiverResult::plain(
            RiverMethod::Caulk,
            true,
            "You successfully floated across the river.",
        );
        result.supplies_lost = SupplyDelta::default().with_spare_parts(1);
        return result;
    }

    let severity = Severity::for_caulk(rng.next_f64());
    let mut loss = disaster_loss(severity, supplies, party, rng);
    let parts_lost = loss.supplies_lost.spare_parts.unwrap_or(0) + 1;
    loss.supplies_lost.spare_parts = Some(parts_lost);

    let mut message = match severity {
        Severity::Minor => "The floating was unstable. You lost some supplies.".to_string(),
        Severity::Major => "The wagon took on water! You lost significant supplies.".to_string(),
        Severity::Catastrophic => "The wagon sank! You barely escaped.".to_string(),
    };
    if !loss.members_lost.is_empty() {
        message.push_str(" Someone drowned.");
    }

    RiverResult {
        method: RiverMethod::Caulk,
        success: false,
        message,
        supplies_lost: loss.supplies_lost,
        members_lost: loss.members_lost,
        severity: Some(severity),
    }
}

/// Pay the ferryman. Deterministic.
#[must_use]
pub fn take_ferry(difficulty: u8, money: f64) -> RiverResult {
    let cost = ferry_cost(difficulty);
    if !can_afford_ferry(money, difficulty) {
        return RiverResult::plain(
            RiverMethod::Ferry,
            false,
            format!("You need ${cost} for the ferry."),
        );
    }
    let mut result = RiverResult::plain(
        RiverMethod::Ferry,
        true,
        format!("You paid ${cost} and crossed safely on the ferry."),
    );
    result.supplies_lost = SupplyDelta::money(f64::from(cost));
    result
}

/// Wait for the river to calm. Never fails; difficulty floors at 1.
#[must_use]
pub fn wait(current_difficulty: u8, days_to_wait: u8) -> WaitResult {
    let headroom = current_difficulty.saturating_sub(MIN_RIVER_DIFFICULTY);
    let reduction = headroom.min(days_to_wait.saturating_mul(WAIT_DIFFICULTY_REDUCTION));
    let new_difficulty = current_difficulty
        .saturating_sub(reduction)
        .max(MIN_RIVER_DIFFICULTY);

    let message = if reduction > 0 {
        format!("After {days_to_wait} days, the river conditions improved.")
    } else {
        format!("After {days_to_wait} days, conditions are unchanged.")
    };

    WaitResult {
        new_difficulty,
        days_lost: days_to_wait,
        message,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingOption {
    pub available: bool,
    /// Risk as a whole percentage, when the method carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_lost: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingOptions {
    pub ford: CrossingOption,
    pub caulk: CrossingOption,
    pub ferry: CrossingOption,
    pub wait: CrossingOption,
}

/// Summary of every method at the given difficulty for the current supplies.
#[must_use]
pub fn crossing_options(difficulty: u8, supplies: &Supplies) -> CrossingOptions {
    let empty = CrossingOption {
        available: false,
        risk_percent: None,
        cost: None,
        days_lost: None,
    };
    CrossingOptions {
        ford: CrossingOption {
            available: true,
            risk_percent: Some(round_f64_to_u32(ford_risk(difficulty) * 100.0)),
            ..empty
        },
        caulk: CrossingOption {
            available: can_caulk(supplies.spare_parts),
            risk_percent: Some(round_f64_to_u32(caulk_risk(difficulty) * 100.0)),
            ..empty
        },
        ferry: CrossingOption {
            available: can_afford_ferry(supplies.money, difficulty),
            cost: Some(ferry_cost(difficulty)),
            ..empty
        },
        wait: CrossingOption {
            available: difficulty > MIN_RIVER_DIFFICULTY,
            days_lost: Some(WAIT_DEFAULT_DAYS),
            ..empty
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::MemberIds;
    use crate::rng::{FixedRoll, ScriptedRolls};

    fn party() -> Party {
        Party::from_names(&["Ada", "Bo", "Cy"], &mut MemberIds::new())
    }

    #[test]
    fn risk_curves_order_methods() {
        for difficulty in 1..=5 {
            let d = f64::from(difficulty);
            assert!((ford_risk(difficulty) - (d * 0.1).min(1.0)).abs() < 1e-9);
            assert!((caulk_risk(difficulty) - (d * 0.05).min(1.0)).abs() < 1e-9);
            assert!(caulk_risk(difficulty) < ford_risk(difficulty));
        }
        assert!((ford_risk(20) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ferry_cost_caps_at_twenty() {
        assert_eq!(ferry_cost(1), 5);
        assert_eq!(ferry_cost(3), 15);
        for difficulty in 4..=9 {
            assert_eq!(ferry_cost(difficulty), 20);
        }
        assert!(take_ferry(5, 19.99).message.contains("$20"));
        assert!(!take_ferry(5, 19.99).success);
        let paid = take_ferry(2, 50.0);
        assert!(paid.success);
        assert_eq!(paid.supplies_lost.money, Some(10.0));
    }

    #[test]
    fn ford_success_loses_nothing() {
        let result = ford(3, &Supplies::default(), &party(), &mut FixedRoll(0.5));
        assert!(result.success);
        assert!(result.supplies_lost.is_empty());
        assert!(result.members_lost.is_empty());
    }

    #[test]
    fn ford_failure_scales_by_severity() {
        let supplies = Supplies::default();
        let minor = ford(5, &supplies, &party(), &mut ScriptedRolls::new([0.1, 0.2], 0.9));
        assert_eq!(minor.severity, Some(Severity::Minor));
        assert_eq!(minor.supplies_lost, SupplyDelta::food(20));

        let major = ford(5, &supplies, &party(), &mut ScriptedRolls::new([0.1, 0.6], 0.9));
        assert_eq!(major.severity, Some(Severity::Major));
        assert_eq!(major.supplies_lost, SupplyDelta::food(50).with_ammunition(25));
    }

    #[test]
    fn catastrophic_ford_can_drown() {
        // risk, severity, drowning, victim pick
        let mut rng = ScriptedRolls::new([0.1, 0.9, 0.2, 0.5], 0.9);
        let result = ford(5, &Supplies::default(), &party(), &mut rng);
        assert_eq!(result.severity, Some(Severity::Catastrophic));
        assert_eq!(result.members_lost.as_slice(), &[1]);
        assert!(result.message.ends_with("Someone drowned."));
        assert_eq!(
            result.supplies_lost,
            SupplyDelta::food(100).with_ammunition(50).with_spare_parts(1)
        );

        let mut spared = ScriptedRolls::new([0.1, 0.9, 0.7], 0.9);
        assert!(ford(5, &Supplies::default(), &party(), &mut spared).members_lost.is_empty());
    }

    #[test]
    fn caulk_always_costs_a_part() {
        let mut no_parts = Supplies::default();
        no_parts.spare_parts = 0;
        let mut rng = ScriptedRolls::new([], 0.0);
        let refused = caulk_and_float(5, &no_parts, &party(), &mut rng);
        assert!(!refused.success);
        assert_eq!(rng.draws(), 0);

        let ok = caulk_and_float(5, &Supplies::default(), &party(), &mut FixedRoll(0.9));
        assert!(ok.success);
        assert_eq!(ok.supplies_lost.spare_parts, Some(1));

        let failed = caulk_and_float(
            5,
            &Supplies::default(),
            &party(),
            &mut ScriptedRolls::new([0.1, 0.55], 0.9),
        );
        assert_eq!(failed.severity, Some(Severity::Minor));
        assert_eq!(failed.supplies_lost.spare_parts, Some(1));
        assert_eq!(failed.supplies_lost.food, Some(20));
    }

    #[test]
    fn waiting_floors_difficulty() {
        let waited = wait(4, 3);
        assert_eq!(waited.new_difficulty, 1);
        assert_eq!(waited.days_lost, 3);
        let calm = wait(1, 3);
        assert_eq!(calm.new_difficulty, 1);
        assert!(calm.message.contains("unchanged"));
        assert_eq!(wait(5, 2).new_difficulty, 3);
    }

    #[test]
    fn options_reflect_supplies() {
        let mut supplies = Supplies::default();
        supplies.spare_parts = 0;
        supplies.money = 10.0;
        let options = crossing_options(4, &supplies);
        assert!(options.ford.available);
        assert_eq!(options.ford.risk_percent, Some(40));
        assert!(!options.caulk.available);
        assert!(!options.ferry.available);
        assert_eq!(options.ferry.cost, Some(20));
        assert!(options.wait.available);
        assert!(!crossing_options(1, &supplies).wait.available);
    }
}
