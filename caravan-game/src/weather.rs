//! Seasonal weather draw and its travel and health effects.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::WEATHER_TRAVEL_BLOCKED;
use crate::rng::RandomSource;

/// Daily sky conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Storm,
    Snow,
    Blizzard,
}

/// Draw order for seasonal tables.
pub const WEATHER_ORDER: [Weather; 5] = [
    Weather::Clear,
    Weather::Rain,
    Weather::Storm,
    Weather::Snow,
    Weather::Blizzard,
];

impl Weather {
    /// Miles added to (or removed from) the day's pace speed.
    #[must_use]
    pub const fn travel_modifier(self) -> i32 {
        match self {
            Self::Clear => 0,
            Self::Rain => -5,
            Self::Storm => -10,
            Self::Snow => -15,
            Self::Blizzard => WEATHER_TRAVEL_BLOCKED,
        }
    }

    /// Health change for each living member on a travel day.
    #[must_use]
    pub const fn health_modifier(self) -> i32 {
        match self {
            Self::Clear | Self::Rain => 0,
            Self::Storm => -5,
            Self::Snow => -10,
            Self::Blizzard => -20,
        }
    }

    #[must_use]
    pub const fn effect(self) -> WeatherEffect {
        WeatherEffect {
            travel_mod: self.travel_modifier(),
            health_mod: self.health_modifier(),
        }
    }

    #[must_use]
    pub const fn prevents_travel(self) -> bool {
        self.travel_modifier() <= WEATHER_TRAVEL_BLOCKED
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Clear => "Clear skies",
            Self::Rain => "Light rain",
            Self::Storm => "Heavy storm",
            Self::Snow => "Snow",
            Self::Blizzard => "Blizzard - cannot travel",
        }
    }

    /// 0 (clear) through 4 (blizzard).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Rain => 1,
            Self::Storm => 2,
            Self::Snow => 3,
            Self::Blizzard => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Storm => "storm",
            Self::Snow => "snow",
            Self::Blizzard => "blizzard",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherEffect {
    pub travel_mod: i32,
    pub health_mod: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Bucket any month number into a season, wrapping outside 1 through 12.
    #[must_use]
    pub const fn from_month(month: i32) -> Self {
        match (month - 1).rem_euclid(12) + 1 {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }

    /// Probability of each weather type, in [`WEATHER_ORDER`].
    #[must_use]
    pub const fn weather_chances(self) -> [f64; 5] {
        match self {
            Self::Spring => [0.5, 0.35, 0.1, 0.05, 0.0],
            Self::Summer => [0.7, 0.2, 0.1, 0.0, 0.0],
            Self::Fall => [0.4, 0.35, 0.15, 0.1, 0.0],
            Self::Winter => [0.2, 0.1, 0.1, 0.4, 0.2],
        }
    }
}

/// Draw the day's weather for `month`.
pub fn generate_weather<R: RandomSource>(month: u8, rng: &mut R) -> Weather {
    let chances = Season::from_month(i32::from(month)).weather_chances();
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for (weather, chance) in WEATHER_ORDER.iter().zip(chances) {
        cumulative += chance;
        if roll < cumulative {
            return *weather;
        }
    }
    Weather::Clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRoll;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn seasons_wrap_any_month() {
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(13), Season::Winter);
        assert_eq!(Season::from_month(15), Season::Spring);
        assert_eq!(Season::from_month(0), Season::Winter);
    }

    #[test]
    fn seasonal_tables_sum_to_one() {
        for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
            let total: f64 = season.weather_chances().iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "{season:?} sums to {total}");
        }
    }

    #[test]
    fn draw_walks_table_in_order() {
        assert_eq!(generate_weather(4, &mut FixedRoll(0.0)), Weather::Clear);
        assert_eq!(generate_weather(4, &mut FixedRoll(0.6)), Weather::Rain);
        assert_eq!(generate_weather(4, &mut FixedRoll(0.9)), Weather::Storm);
        assert_eq!(generate_weather(4, &mut FixedRoll(0.97)), Weather::Snow);
        assert_eq!(generate_weather(1, &mut FixedRoll(0.85)), Weather::Blizzard);
        assert_eq!(generate_weather(7, &mut FixedRoll(1.0)), Weather::Clear);
    }

    #[test]
    fn blizzards_only_in_winter() {
        let mut rng = SmallRng::seed_from_u64(11);
        for month in 3..=11 {
            for _ in 0..200 {
                assert_ne!(generate_weather(month, &mut rng), Weather::Blizzard);
            }
        }
    }

    #[test]
    fn blizzard_blocks_travel() {
        assert!(Weather::Blizzard.prevents_travel());
        assert!(!Weather::Snow.prevents_travel());
        assert_eq!(Weather::Storm.effect(), WeatherEffect { travel_mod: -10, health_mod: -5 });
        assert_eq!(Weather::Snow.severity(), 3);
    }
}
