//! Hunting: trade ammunition for a chance at food.
use serde::{Deserialize, Serialize};

use crate::constants::{
    HUNTING_AMMO_BONUS, HUNTING_AMMO_BONUS_CAP, HUNTING_BASE_SUCCESS, HUNTING_EXCELLENT_FOOD,
    HUNTING_GOOD_FOOD, HUNTING_MAX_FOOD, HUNTING_MAX_SUCCESS, HUNTING_MIN_FOOD,
    HUNTING_RECOMMENDED_MAX, HUNTING_RECOMMENDED_MIN,
};
use crate::numbers::round_f64_to_u32;
use crate::rng::{RandomSource, uniform_u32};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntOutcome {
    /// Not enough ammunition, or nothing requested. No ammo spent.
    Blocked,
    /// Ammo spent, the animals escaped.
    Missed,
    Excellent,
    Good,
    Modest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntingResult {
    pub outcome: HuntOutcome,
    pub ammo_used: u32,
    pub food_gained: u32,
    pub message: String,
}

impl HuntingResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.food_gained > 0
    }
}

/// Success odds for a given ammunition spend.
///
/// Each round up to [`HUNTING_AMMO_BONUS_CAP`] adds [`HUNTING_AMMO_BONUS`];
/// past the cap extra rounds buy nothing, so the odds top out at 0.7 even
/// though [`HUNTING_MAX_SUCCESS`] is higher.
#[must_use]
pub fn calculate_success_chance(ammo_used: u32) -> f64 {
    let bonus = f64::from(ammo_used.min(HUNTING_AMMO_BONUS_CAP)) * HUNTING_AMMO_BONUS;
    (HUNTING_BASE_SUCCESS + bonus).min(HUNTING_MAX_SUCCESS)
}

/// Pounds brought back from a successful hunt, uniform in `[10, 100)`.
pub fn calculate_food_gained(rng: &mut impl RandomSource) -> u32 {
    uniform_u32(rng, HUNTING_MIN_FOOD, HUNTING_MAX_FOOD - HUNTING_MIN_FOOD)
}

#[must_use]
pub const fn can_hunt(ammunition: u32, ammo_to_use: u32) -> bool {
    ammo_to_use >= 1 && ammunition >= ammo_to_use
}

/// Resolve one hunting trip. Ammunition is spent whether or not the hunt
/// succeeds; only the caller applies it to the supplies.
pub fn hunt(ammo_to_use: u32, current_ammo: u32, rng: &mut impl RandomSource) -> HuntingResult {
    if !can_hunt(current_ammo, ammo_to_use) {
        return HuntingResult {
            outcome: HuntOutcome::Blocked,
            ammo_used: 0,
            food_gained: 0,
            message: "Not enough ammunition to hunt.".to_string(),
        };
    }

    let chance = calculate_success_chance(ammo_to_use);
    if rng.next_f64() > chance {
        return HuntingResult {
            outcome: HuntOutcome::Missed,
            ammo_used: ammo_to_use,
            food_gained: 0,
            message: "The hunt was unsuccessful. The animals escaped.".to_string(),
        };
    }

    let food_gained = calculate_food_gained(rng);
    let (outcome, message) = if food_gained >= HUNTING_EXCELLENT_FOOD {
        (
            HuntOutcome::Excellent,
            format!("Excellent hunt! You bagged {food_gained} pounds of meat."),
        )
    } else if food_gained >= HUNTING_GOOD_FOOD {
        (
            HuntOutcome::Good,
            format!("Good hunt! You brought back {food_gained} pounds of meat."),
        )
    } else {
        (
            HuntOutcome::Modest,
            format!("Modest hunt. You gathered {food_gained} pounds of meat."),
        )
    };

    HuntingResult {
        outcome,
        ammo_used: ammo_to_use,
        food_gained,
        message,
    }
}

/// Suggested spend: a tenth of the stock within `[5, 20]`, or everything
/// when five rounds or fewer remain.
#[must_use]
pub fn recommended_ammo(current_ammo: u32) -> u32 {
    if current_ammo <= HUNTING_RECOMMENDED_MIN {
        return current_ammo;
    }
    (current_ammo / 10).clamp(HUNTING_RECOMMENDED_MIN, HUNTING_RECOMMENDED_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntForecast {
    pub min_food: u32,
    pub max_food: u32,
    /// Success chance as a whole percentage.
    pub chance_percent: u32,
}

#[must_use]
pub fn expected_food(ammo_to_use: u32) -> HuntForecast {
    HuntForecast {
        min_food: HUNTING_MIN_FOOD,
        max_food: HUNTING_MAX_FOOD,
        chance_percent: round_f64_to_u32(calculate_success_chance(ammo_to_use) * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRoll, ScriptedRolls};

    #[test]
    fn success_chance_is_linear_until_cap() {
        for ammo in 0..=20 {
            let expected = 0.3 + 0.02 * f64::from(ammo);
            assert!((calculate_success_chance(ammo) - expected).abs() < 1e-9);
        }
        for ammo in [21, 40, 500] {
            assert!((calculate_success_chance(ammo) - 0.7).abs() < 1e-9);
        }
    }

    #[test]
    fn failed_hunt_still_spends_ammo() {
        let result = hunt(20, 100, &mut FixedRoll(0.99));
        assert_eq!(result.outcome, HuntOutcome::Missed);
        assert_eq!(result.ammo_used, 20);
        assert_eq!(result.food_gained, 0);
    }

    #[test]
    fn blocked_hunt_spends_nothing() {
        assert_eq!(hunt(30, 10, &mut FixedRoll(0.0)).ammo_used, 0);
        assert_eq!(hunt(0, 10, &mut FixedRoll(0.0)).outcome, HuntOutcome::Blocked);
    }

    #[test]
    fn success_tiers_follow_food() {
        let excellent = hunt(10, 50, &mut ScriptedRolls::new([0.1, 0.9], 0.0));
        assert_eq!(excellent.food_gained, 91);
        assert_eq!(excellent.outcome, HuntOutcome::Excellent);
        assert!(excellent.is_success());

        let good = hunt(10, 50, &mut ScriptedRolls::new([0.1, 0.5], 0.0));
        assert_eq!(good.food_gained, 55);
        assert_eq!(good.outcome, HuntOutcome::Good);

        let modest = hunt(10, 50, &mut ScriptedRolls::new([0.1, 0.0], 0.0));
        assert_eq!(modest.food_gained, 10);
        assert!(modest.message.starts_with("Modest hunt"));
    }

    #[test]
    fn recommendation_clamps() {
        assert_eq!(recommended_ammo(3), 3);
        assert_eq!(recommended_ammo(40), 5);
        assert_eq!(recommended_ammo(120), 12);
        assert_eq!(recommended_ammo(1000), 20);
        assert_eq!(expected_food(20).chance_percent, 70);
    }

    #[test]
    fn observed_success_rate_tracks_the_odds() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let trials = 4000_u32;
        let successes = (0..trials)
            .filter(|_| hunt(10, 100, &mut rng).is_success())
            .count();
        let observed = f64::from(u32::try_from(successes).unwrap()) / f64::from(trials);
        assert!((observed - calculate_success_chance(10)).abs() < 0.04, "{observed}");
    }
}
