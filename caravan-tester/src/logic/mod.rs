pub mod batch;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod storage;

pub use batch::{BatchPlan, BatchReport, run_batch};
pub use policy::GameplayStrategy;
pub use seeds::resolve_seed_inputs;
pub use simulation::RunOutcome;
pub use storage::FileLeaderboard;
