//! Pace and ration tiers chosen by the player.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    PACE_HEALTH_GRUELING, PACE_HEALTH_STEADY, PACE_HEALTH_STRENUOUS, PACE_SPEED_GRUELING,
    PACE_SPEED_STEADY, PACE_SPEED_STRENUOUS, RATION_HEALTH_BARE, RATION_HEALTH_FILLING,
    RATION_HEALTH_MEAGER, RATION_LBS_BARE, RATION_LBS_FILLING, RATION_LBS_MEAGER,
};

/// Daily travel speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    #[default]
    Steady,
    Strenuous,
    Grueling,
}

impl Pace {
    pub const ALL: [Self; 3] = [Self::Steady, Self::Strenuous, Self::Grueling];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Strenuous => "strenuous",
            Self::Grueling => "grueling",
        }
    }

    /// Base miles per day before weather, oxen, and wagon adjustments.
    #[must_use]
    pub const fn speed(self) -> i32 {
        match self {
            Self::Steady => PACE_SPEED_STEADY,
            Self::Strenuous => PACE_SPEED_STRENUOUS,
            Self::Grueling => PACE_SPEED_GRUELING,
        }
    }

    /// Health change applied to every living member once a week.
    #[must_use]
    pub const fn weekly_health_effect(self) -> i32 {
        match self {
            Self::Steady => PACE_HEALTH_STEADY,
            Self::Strenuous => PACE_HEALTH_STRENUOUS,
            Self::Grueling => PACE_HEALTH_GRUELING,
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steady" => Ok(Self::Steady),
            "strenuous" => Ok(Self::Strenuous),
            "grueling" => Ok(Self::Grueling),
            _ => Err(()),
        }
    }
}

/// Daily food allowance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rations {
    Bare,
    #[default]
    Meager,
    Filling,
}

impl Rations {
    pub const ALL: [Self; 3] = [Self::Bare, Self::Meager, Self::Filling];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bare => "bare",
            Self::Meager => "meager",
            Self::Filling => "filling",
        }
    }

    /// Pounds of food eaten per living member per day.
    #[must_use]
    pub const fn lbs_per_person(self) -> u32 {
        match self {
            Self::Bare => RATION_LBS_BARE,
            Self::Meager => RATION_LBS_MEAGER,
            Self::Filling => RATION_LBS_FILLING,
        }
    }

    #[must_use]
    pub const fn weekly_health_effect(self) -> i32 {
        match self {
            Self::Bare => RATION_HEALTH_BARE,
            Self::Meager => RATION_HEALTH_MEAGER,
            Self::Filling => RATION_HEALTH_FILLING,
        }
    }
}

impl fmt::Display for Rations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rations {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bare" => Ok(Self::Bare),
            "meager" => Ok(Self::Meager),
            "filling" => Ok(Self::Filling),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harder_pace_is_faster_and_costlier() {
        assert!(Pace::Grueling.speed() > Pace::Strenuous.speed());
        assert!(Pace::Strenuous.speed() > Pace::Steady.speed());
        assert!(Pace::Grueling.weekly_health_effect() < Pace::Steady.weekly_health_effect());
    }

    #[test]
    fn ration_tiers_parse_and_display() {
        for rations in Rations::ALL {
            assert_eq!(rations.to_string().parse::<Rations>(), Ok(rations));
        }
        assert_eq!("sprint".parse::<Pace>(), Err(()));
        assert_eq!(Rations::Filling.lbs_per_person(), 3);
        assert_eq!(Rations::default(), Rations::Meager);
    }
}
