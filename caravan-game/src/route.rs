//! The fixed trail from Independence to Oregon City.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Start,
    Town,
    Landmark,
    River,
    Destination,
}

impl LocationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Town => "town",
            Self::Landmark => "landmark",
            Self::River => "river",
            Self::Destination => "destination",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable route node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: LocationKind,
    pub distance_from_start: u32,
    pub has_store: bool,
    /// Crossing difficulty 1 through 5, rivers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_difficulty: Option<u8>,
}

impl Location {
    const fn stop(
        id: &'static str,
        name: &'static str,
        kind: LocationKind,
        distance_from_start: u32,
        has_store: bool,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            distance_from_start,
            has_store,
            river_difficulty: None,
        }
    }

    const fn river(id: &'static str, name: &'static str, distance: u32, difficulty: u8) -> Self {
        Self {
            id,
            name,
            kind: LocationKind::River,
            distance_from_start: distance,
            has_store: false,
            river_difficulty: Some(difficulty),
        }
    }

    #[must_use]
    pub const fn is_river(&self) -> bool {
        matches!(self.kind, LocationKind::River)
    }
}

pub static ROUTE: [Location; 17] = [
    Location::stop("independence", "Independence", LocationKind::Start, 0, true),
    Location::river("kansas_river", "Kansas River Crossing", 102, 2),
    Location::stop("fort_kearny", "Fort Kearny", LocationKind::Landmark, 304, true),
    Location::stop("chimney_rock", "Chimney Rock", LocationKind::Landmark, 554, false),
    Location::stop("fort_laramie", "Fort Laramie", LocationKind::Town, 640, true),
    Location::stop(
        "independence_rock",
        "Independence Rock",
        LocationKind::Landmark,
        830,
        false,
    ),
    Location::stop("south_pass", "South Pass", LocationKind::Landmark, 932, false),
    Location::river("green_river", "Green River Crossing", 988, 3),
    Location::stop("fort_bridger", "Fort Bridger", LocationKind::Town, 1026, true),
    Location::stop("soda_springs", "Soda Springs", LocationKind::Landmark, 1160, false),
    Location::stop("fort_hall", "Fort Hall", LocationKind::Town, 1217, true),
    Location::river("snake_river", "Snake River Crossing", 1382, 4),
    Location::stop("fort_boise", "Fort Boise", LocationKind::Landmark, 1534, true),
    Location::stop("blue_mountains", "Blue Mountains", LocationKind::Landmark, 1700, false),
    Location::stop("the_dalles", "The Dalles", LocationKind::Town, 1838, true),
    Location::river("columbia_river", "Columbia River", 1900, 5),
    Location::stop(
        "oregon_city",
        "Oregon City",
        LocationKind::Destination,
        2000,
        true,
    ),
];

#[must_use]
pub fn location(index: usize) -> Option<&'static Location> {
    ROUTE.get(index)
}

#[must_use]
pub fn next_location(index: usize) -> Option<&'static Location> {
    index.checked_add(1).and_then(location)
}

/// Miles left to the next stop; negative once it has been passed.
#[must_use]
pub fn distance_to_next(index: usize, distance_traveled: u32) -> i64 {
    next_location(index).map_or(0, |next| {
        i64::from(next.distance_from_start) - i64::from(distance_traveled)
    })
}

#[must_use]
pub fn is_destination(index: usize) -> bool {
    location(index).is_some_and(|loc| loc.kind == LocationKind::Destination)
}

pub fn store_locations() -> impl Iterator<Item = &'static Location> {
    ROUTE.iter().filter(|loc| loc.has_store)
}

pub fn river_crossings() -> impl Iterator<Item = &'static Location> {
    ROUTE.iter().filter(|loc| loc.is_river())
}

#[must_use]
pub fn total_distance() -> u32 {
    ROUTE.last().map_or(0, |loc| loc.distance_from_start)
}

#[must_use]
pub fn find(id: &str) -> Option<(usize, &'static Location)> {
    ROUTE.iter().enumerate().find(|(_, loc)| loc.id == id)
}
