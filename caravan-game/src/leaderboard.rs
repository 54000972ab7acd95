//! Scoring and the top-ten board of finished journeys.
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    LEADERBOARD_MAX_ENTRIES, SCORE_ARRIVAL_BONUS, SCORE_PER_DAY_SAVED, SCORE_PER_SURVIVOR,
    SCORE_TIME_TARGET_DAYS,
};
use crate::numbers::usize_to_u32;
use crate::state::GameData;

/// Miles traveled, plus bonuses for arriving, for each survivor, and for
/// every day under the time target when the party arrived.
#[must_use]
pub fn calculate_score(
    survived: bool,
    party_survivors: u32,
    distance_traveled: u32,
    days_on_trail: u32,
) -> u32 {
    let mut score = distance_traveled;
    if survived {
        score = score.saturating_add(SCORE_ARRIVAL_BONUS);
    }
    score = score.saturating_add(party_survivors.saturating_mul(SCORE_PER_SURVIVOR));
    if survived && days_on_trail < SCORE_TIME_TARGET_DAYS {
        let days_saved = SCORE_TIME_TARGET_DAYS - days_on_trail;
        score = score.saturating_add(days_saved * SCORE_PER_DAY_SAVED);
    }
    score
}

/// Score a finished (or abandoned) game.
#[must_use]
pub fn final_score(state: &GameData) -> u32 {
    calculate_score(
        state.is_victory(),
        usize_to_u32(state.survivors()),
        state.distance_traveled,
        state.days_elapsed,
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub survived: bool,
    pub party_survivors: u32,
    pub distance_traveled: u32,
    /// Display date, as supplied by the caller.
    pub date: String,
}

impl LeaderboardEntry {
    /// Entry for a finished game, scored with [`final_score`].
    #[must_use]
    pub fn from_game(name: impl Into<String>, state: &GameData, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: final_score(state),
            survived: state.is_victory(),
            party_survivors: usize_to_u32(state.survivors()),
            distance_traveled: state.distance_traveled,
            date: date.into(),
        }
    }
}

/// Ranked entries, best first, never more than ten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Decode a stored board. Malformed data yields an empty board.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<LeaderboardEntry>>(json) {
            Ok(entries) => {
                let mut board = Self { entries };
                board.rank();
                board
            }
            Err(err) => {
                warn!("discarding malformed leaderboard data: {err}");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the entries cannot be encoded.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    fn rank(&mut self) {
        self.entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.party_survivors.cmp(&a.party_survivors))
        });
        self.entries.truncate(LEADERBOARD_MAX_ENTRIES);
    }

    /// Insert an entry and re-rank. Entries falling past tenth are dropped.
    pub fn add(&mut self, entry: LeaderboardEntry) -> &[LeaderboardEntry] {
        self.entries.push(entry);
        self.rank();
        &self.entries
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// 1-based position `score` would take, or `None` if the board is full
    /// and it would not beat anyone.
    #[must_use]
    pub fn would_rank(&self, score: u32) -> Option<usize> {
        let position = self.entries.iter().position(|entry| score > entry.score);
        match position {
            Some(index) => Some(index + 1),
            None if self.entries.len() < LEADERBOARD_MAX_ENTRIES => Some(self.entries.len() + 1),
            None => None,
        }
    }

    /// 1-based position of the first entry with exactly `score`.
    #[must_use]
    pub fn rank_of(&self, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.score == score)
            .map(|index| index + 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Durable key-value storage for the board's raw JSON.
/// Platform-specific implementations should provide this.
pub trait LeaderboardStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stored JSON, if any has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn load_raw(&self) -> Result<Option<String>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save_raw(&self, json: &str) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the stored board cannot be removed.
    fn clear(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum LeaderboardError<E>
where
    E: std::error::Error + 'static,
{
    #[error("leaderboard storage failed: {0}")]
    Storage(#[source] E),
    #[error("leaderboard could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read the board from `store`. Missing or malformed data is an empty board.
///
/// # Errors
///
/// Returns the store's error if it cannot be read.
pub fn load<S: LeaderboardStore>(store: &S) -> Result<Leaderboard, S::Error> {
    Ok(store
        .load_raw()?
        .map(|json| Leaderboard::from_json(&json))
        .unwrap_or_default())
}

/// Add `entry` to the stored board and save it back.
///
/// # Errors
///
/// Returns a storage error if the board cannot be read or written.
pub fn record<S: LeaderboardStore>(
    store: &S,
    entry: LeaderboardEntry,
) -> Result<Leaderboard, LeaderboardError<S::Error>> {
    let mut board = load(store).map_err(LeaderboardError::Storage)?;
    board.add(entry);
    let json = board.to_json()?;
    store.save_raw(&json).map_err(LeaderboardError::Storage)?;
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;

    fn entry(name: &str, score: u32, survivors: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            survived: survivors > 0,
            party_survivors: survivors,
            distance_traveled: 2000,
            date: "1848-09-01".to_string(),
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        raw: RefCell<Option<String>>,
    }

    impl LeaderboardStore for MemoryStore {
        type Error = Infallible;

        fn load_raw(&self) -> Result<Option<String>, Self::Error> {
            Ok(self.raw.borrow().clone())
        }

        fn save_raw(&self, json: &str) -> Result<(), Self::Error> {
            *self.raw.borrow_mut() = Some(json.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<(), Self::Error> {
            self.raw.borrow_mut().take();
            Ok(())
        }
    }

    #[test]
    fn score_formula() {
        assert_eq!(calculate_score(true, 5, 1000, 100), 3400);
        assert_eq!(calculate_score(false, 0, 640, 90), 640);
        assert_eq!(calculate_score(true, 1, 2000, 200), 3200);
    }

    #[test]
    fn board_sorts_and_caps() {
        let mut board = Leaderboard::default();
        for score in 0..12 {
            board.add(entry("p", score * 100, 1));
        }
        assert_eq!(board.len(), 10);
        assert_eq!(board.entries()[0].score, 1100);
        assert_eq!(board.entries()[9].score, 200);
        assert_eq!(board.top(3).len(), 3);
        assert_eq!(board.top(50).len(), 10);
    }

    #[test]
    fn ties_break_on_survivors() {
        let mut board = Leaderboard::default();
        board.add(entry("few", 500, 1));
        board.add(entry("many", 500, 4));
        assert_eq!(board.entries()[0].name, "many");
        assert_eq!(board.rank_of(500), Some(1));
        assert_eq!(board.rank_of(501), None);
    }

    #[test]
    fn would_rank_respects_capacity() {
        let mut board = Leaderboard::default();
        assert_eq!(board.would_rank(0), Some(1));
        for score in 1..=10 {
            board.add(entry("p", score * 10, 1));
        }
        assert_eq!(board.would_rank(55), Some(6));
        assert_eq!(board.would_rank(5), None);
    }

    #[test]
    fn malformed_json_is_an_empty_board() {
        assert!(Leaderboard::from_json("{oops").is_empty());
        assert!(Leaderboard::from_json(r#"{"score": 1}"#).is_empty());
    }

    #[test]
    fn store_round_trip() {
        let store = MemoryStore::default();
        assert!(load(&store).expect("load").is_empty());
        record(&store, entry("Ada", 900, 2)).expect("record");
        let board = record(&store, entry("Bo", 1200, 3)).expect("record");
        assert_eq!(board.entries()[0].name, "Bo");
        assert_eq!(load(&store).expect("load").len(), 2);

        store.save_raw("not json").expect("save");
        assert!(load(&store).expect("load").is_empty());
        store.clear().expect("clear");
        assert!(store.load_raw().expect("load").is_none());
    }
}
