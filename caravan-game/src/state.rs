//! The game snapshot threaded through every transition.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::DateState;
use crate::difficulty::{Difficulty, DifficultySettings};
use crate::events::{EventIds, GameEvent};
use crate::pacing::{Pace, Rations};
use crate::party::{MemberIds, Party};
use crate::route::{self, Location};
use crate::supplies::Supplies;
use crate::travel::distance_remaining;
use crate::wagon::Wagon;
use crate::weather::Weather;

/// Screen state machine. `GameOver` and `Victory` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameScreen {
    #[default]
    Title,
    NameParty,
    Store,
    Traveling,
    Event,
    River,
    Hunting,
    Landmark,
    GameOver,
    Victory,
}

impl GameScreen {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::NameParty => "name_party",
            Self::Store => "store",
            Self::Traveling => "traveling",
            Self::Event => "event",
            Self::River => "river",
            Self::Hunting => "hunting",
            Self::Landmark => "landmark",
            Self::GameOver => "game_over",
            Self::Victory => "victory",
        }
    }
}

impl fmt::Display for GameScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full game snapshot. Transitions take `&GameData` and hand back a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub screen: GameScreen,
    pub difficulty: Difficulty,
    /// Tuning row copied at creation; never changes afterwards.
    pub settings: DifficultySettings,
    pub date: DateState,
    /// Trail days elapsed since departure, including days lost to events.
    #[serde(default)]
    pub days_elapsed: u32,
    pub distance_traveled: u32,
    pub location_index: usize,
    pub party: Party,
    pub supplies: Supplies,
    pub wagon: Wagon,
    pub pace: Pace,
    pub rations: Rations,
    pub weather: Weather,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_event: Option<GameEvent>,
    /// Difficulty of the river blocking the trail, until it is crossed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_crossing: Option<u8>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub member_ids: MemberIds,
    #[serde(default)]
    pub event_ids: EventIds,
}

impl Default for GameData {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl GameData {
    /// Title-screen state for a difficulty, with its starting purse.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        let settings = difficulty.preset();
        Self::with_settings(difficulty, settings)
    }

    /// Title-screen state using an explicit tuning row.
    #[must_use]
    pub fn with_settings(difficulty: Difficulty, settings: DifficultySettings) -> Self {
        Self {
            screen: GameScreen::Title,
            difficulty,
            settings,
            date: DateState::default(),
            days_elapsed: 0,
            distance_traveled: 0,
            location_index: 0,
            party: Party::default(),
            supplies: Supplies::with_money(settings.starting_money),
            wagon: Wagon::default(),
            pace: Pace::default(),
            rations: Rations::default(),
            weather: Weather::Clear,
            current_event: None,
            pending_crossing: None,
            messages: Vec::new(),
            member_ids: MemberIds::new(),
            event_ids: EventIds::new(),
        }
    }

    /// No one left alive. Also true before a party has been formed.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !self.party.is_alive()
    }

    /// At the destination with someone still standing.
    #[must_use]
    pub fn is_victory(&self) -> bool {
        route::is_destination(self.location_index) && self.party.is_alive()
    }

    #[must_use]
    pub fn current_location(&self) -> Option<&'static Location> {
        route::location(self.location_index)
    }

    #[must_use]
    pub fn remaining_distance(&self) -> u32 {
        distance_remaining(self.distance_traveled)
    }

    /// Survivors, for scoring.
    #[must_use]
    pub fn survivors(&self) -> usize {
        self.party.alive_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_on_title() {
        let state = GameData::new(Difficulty::Hard);
        assert_eq!(state.screen, GameScreen::Title);
        assert!((state.supplies.money - 300.0).abs() < f64::EPSILON);
        assert_eq!(state.current_location().map(|l| l.id), Some("independence"));
        assert_eq!(state.remaining_distance(), route::total_distance());
        assert!(!state.is_victory());
    }

    #[test]
    fn empty_party_counts_as_game_over() {
        let state = GameData::default();
        assert!(state.is_game_over());
        assert!(GameScreen::Victory.is_terminal());
        assert!(!GameScreen::River.is_terminal());
    }

    #[test]
    fn snapshot_survives_json() {
        let state = GameData::new(Difficulty::Easy);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameData = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}
