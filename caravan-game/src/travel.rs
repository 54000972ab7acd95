//! Daily movement along the route.
use serde::Serialize;
use std::fmt;

use crate::constants::{
    MIN_OXEN, OXEN_SPEED_MOD, WAGON_BROKEN_SPEED_FACTOR, WAGON_DAMAGED_SPEED_FACTOR,
    WAGON_DAMAGED_THRESHOLD,
};
use crate::numbers::floor_f64_to_u32;
use crate::pacing::Pace;
use crate::party::Party;
use crate::route::{self, Location};
use crate::wagon::Wagon;
use crate::weather::Weather;

/// Days reported when the wagon cannot make progress.
pub const UNREACHABLE_DAYS: u32 = 999;

/// Miles covered in one day.
///
/// Pace sets the base speed and weather shifts it. Each ox beyond the first
/// scales the subtotal by [`OXEN_SPEED_MOD`]; a damaged wagon then slows to
/// 75% and a broken one to 50%.
#[must_use]
pub fn calculate_daily_distance(pace: Pace, weather: Weather, wagon: &Wagon) -> u32 {
    if weather.prevents_travel() {
        return 0;
    }
    let mut distance = f64::from(pace.speed() + weather.travel_modifier());

    if wagon.oxen > MIN_OXEN {
        let extra = f64::from(wagon.oxen - MIN_OXEN);
        distance += distance * extra * OXEN_SPEED_MOD;
    }

    if wagon.condition <= 0 {
        distance = (distance * WAGON_BROKEN_SPEED_FACTOR).floor();
    } else if wagon.condition < WAGON_DAMAGED_THRESHOLD {
        distance = (distance * WAGON_DAMAGED_SPEED_FACTOR).floor();
    }

    floor_f64_to_u32(distance)
}

/// One day of movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelDayResult {
    pub distance_traveled: u32,
    pub new_total_distance: u32,
    /// The next stop, if the day's movement reached it.
    pub reached_location: Option<&'static Location>,
    pub new_location_index: usize,
}

/// Move one day. At most one stop is reached per day, however far the wagon
/// overshoots it.
#[must_use]
pub fn travel_one_day(
    current_distance: u32,
    current_location_index: usize,
    pace: Pace,
    weather: Weather,
    wagon: &Wagon,
) -> TravelDayResult {
    let distance_traveled = calculate_daily_distance(pace, weather, wagon);
    let new_total_distance = current_distance.saturating_add(distance_traveled);

    let reached_location = route::next_location(current_location_index)
        .filter(|next| new_total_distance >= next.distance_from_start);
    let new_location_index = if reached_location.is_some() {
        current_location_index + 1
    } else {
        current_location_index
    };

    TravelDayResult {
        distance_traveled,
        new_total_distance,
        reached_location,
        new_location_index,
    }
}

/// Why travel is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelBlock {
    PartyDead,
    AtDestination,
    NoOxen,
    /// A river on the trail has not been crossed yet.
    RiverAhead,
}

impl TravelBlock {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PartyDead => "All party members have died.",
            Self::AtDestination => "You have reached your destination!",
            Self::NoOxen => "You have no oxen to pull the wagon.",
            Self::RiverAhead => "You must cross the river before continuing.",
        }
    }
}

impl fmt::Display for TravelBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelCheck {
    pub can_travel: bool,
    pub reason: Option<TravelBlock>,
}

impl TravelCheck {
    const fn allowed() -> Self {
        Self {
            can_travel: true,
            reason: None,
        }
    }

    const fn blocked(reason: TravelBlock) -> Self {
        Self {
            can_travel: false,
            reason: Some(reason),
        }
    }
}

/// Travel gate. An empty larder never blocks travel; starvation is handled
/// by the daily turn instead.
#[must_use]
pub fn can_continue(party: &Party, wagon: &Wagon, location_index: usize) -> TravelCheck {
    if !party.is_alive() {
        return TravelCheck::blocked(TravelBlock::PartyDead);
    }
    if route::is_destination(location_index) {
        return TravelCheck::blocked(TravelBlock::AtDestination);
    }
    if wagon.oxen == 0 {
        return TravelCheck::blocked(TravelBlock::NoOxen);
    }
    TravelCheck::allowed()
}

/// Miles left to the destination, never negative.
#[must_use]
pub fn distance_remaining(distance_traveled: u32) -> u32 {
    route::total_distance().saturating_sub(distance_traveled)
}

/// Whole days to the next stop under clear skies.
#[must_use]
pub fn estimate_days_to_next(
    location_index: usize,
    distance_traveled: u32,
    pace: Pace,
    wagon: &Wagon,
) -> u32 {
    let daily_rate = calculate_daily_distance(pace, Weather::Clear, wagon);
    if daily_rate == 0 {
        return UNREACHABLE_DAYS;
    }
    let distance = route::distance_to_next(location_index, distance_traveled);
    let Ok(distance) = u32::try_from(distance) else {
        return 0;
    };
    distance.div_ceil(daily_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::MemberIds;

    #[test]
    fn steady_clear_with_spare_ox() {
        assert_eq!(
            calculate_daily_distance(Pace::Steady, Weather::Clear, &Wagon::new(100, 2)),
            17
        );
        assert_eq!(
            calculate_daily_distance(Pace::Grueling, Weather::Clear, &Wagon::new(100, 1)),
            25
        );
    }

    #[test]
    fn blizzard_stops_the_wagon() {
        for pace in Pace::ALL {
            assert_eq!(
                calculate_daily_distance(pace, Weather::Blizzard, &Wagon::new(100, 4)),
                0
            );
        }
    }

    #[test]
    fn wagon_damage_slows_travel() {
        assert_eq!(
            calculate_daily_distance(Pace::Strenuous, Weather::Clear, &Wagon::new(49, 1)),
            15
        );
        assert_eq!(
            calculate_daily_distance(Pace::Strenuous, Weather::Clear, &Wagon::new(0, 1)),
            10
        );
        assert_eq!(
            calculate_daily_distance(Pace::Steady, Weather::Snow, &Wagon::new(0, 1)),
            0
        );
    }

    #[test]
    fn reaching_kansas_river_from_the_start() {
        let result = travel_one_day(100, 0, Pace::Steady, Weather::Clear, &Wagon::new(100, 2));
        assert_eq!(result.reached_location.map(|l| l.id), Some("kansas_river"));
        assert_eq!(result.new_location_index, 1);
        assert_eq!(result.new_total_distance, 117);
    }

    #[test]
    fn overshoot_reaches_only_one_stop() {
        let result = travel_one_day(540, 2, Pace::Grueling, Weather::Clear, &Wagon::new(100, 4));
        assert_eq!(result.new_location_index, 3);
        assert!(result.new_total_distance < 640);
        let stalled = travel_one_day(5, 0, Pace::Steady, Weather::Clear, &Wagon::new(100, 1));
        assert!(stalled.reached_location.is_none());
        assert_eq!(stalled.new_location_index, 0);
    }

    #[test]
    fn gate_checks_in_order() {
        let mut party = Party::from_names(&["Ada"], &mut MemberIds::new());
        assert!(can_continue(&party, &Wagon::default(), 0).can_travel);
        assert_eq!(
            can_continue(&party, &Wagon::new(100, 0), 0).reason,
            Some(TravelBlock::NoOxen)
        );
        assert_eq!(
            can_continue(&party, &Wagon::default(), 16).reason,
            Some(TravelBlock::AtDestination)
        );
        party.mark_dead(0);
        let check = can_continue(&party, &Wagon::default(), 16);
        assert!(!check.can_travel);
        assert!(check.reason.is_some_and(|r| r.message().contains("died")));
    }

    #[test]
    fn remaining_distance_never_negative() {
        assert_eq!(distance_remaining(0), 2000);
        assert_eq!(distance_remaining(2000), 0);
        assert_eq!(distance_remaining(3000), 0);
    }

    #[test]
    fn estimates_round_up() {
        assert_eq!(estimate_days_to_next(0, 0, Pace::Steady, &Wagon::new(100, 2)), 6);
        assert_eq!(estimate_days_to_next(0, 0, Pace::Steady, &Wagon::new(100, 1)), 7);
        assert_eq!(estimate_days_to_next(0, 200, Pace::Steady, &Wagon::default()), 0);
    }
}
