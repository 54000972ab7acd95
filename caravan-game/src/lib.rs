//! Caravan Game Engine
//!
//! Deterministic turn simulation for a wagon-trail survival game: a party
//! travels a fixed route, spending supplies against weather, rivers, random
//! events, and wear on the wagon, until it arrives or perishes.
//! This crate has no UI or platform-specific dependencies.

pub mod calendar;
pub mod constants;
pub mod crossings;
pub mod difficulty;
pub mod events;
pub mod hunt;
pub mod journey;
pub mod leaderboard;
pub mod numbers;
pub mod pacing;
pub mod party;
pub mod rng;
pub mod route;
pub mod seed;
pub mod state;
pub mod store;
pub mod supplies;
pub mod travel;
pub mod wagon;
pub mod weather;

// Re-export commonly used types
pub use calendar::DateState;
pub use crossings::{RiverMethod, RiverResult, Severity, WaitResult, crossing_options};
pub use difficulty::{ConfigError, Difficulty, DifficultySettings, DifficultyTable};
pub use events::{EventChoice, EventKind, EventResult, GameEvent};
pub use hunt::{HuntOutcome, HuntingResult};
pub use journey::{RiverOutcome, TrailSession, TurnResult, advance_turn, apply_turn_result};
pub use leaderboard::{
    Leaderboard, LeaderboardEntry, LeaderboardError, LeaderboardStore, calculate_score,
    final_score,
};
pub use pacing::{Pace, Rations};
pub use party::{MemberId, MemberStatus, Party, PartyMember};
pub use rng::{FixedRoll, RandomSource, RngBundle, ScriptedRolls};
pub use route::{Location, LocationKind};
pub use seed::{
    ShareCode, decode_to_seed, encode_friendly, generate_code_from_entropy, parse_share_code,
};
pub use state::{GameData, GameScreen};
pub use store::StoreItem;
pub use supplies::{Supplies, SupplyDelta};
pub use travel::{TravelBlock, TravelDayResult};
pub use wagon::Wagon;
pub use weather::Weather;
