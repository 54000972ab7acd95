use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use caravan_game::{Difficulty, DifficultyTable};

use crate::logic::policy::GameplayStrategy;
use crate::logic::seeds::SeedInfo;
use crate::logic::simulation::{RunOutcome, RunSummary, SimulationConfig, run_journey};

/// What to run: every seed at every difficulty with every strategy.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub difficulties: Vec<Difficulty>,
    pub table: DifficultyTable,
    pub strategies: Vec<GameplayStrategy>,
    pub iterations: usize,
    pub max_days: u32,
    /// Replay every run and compare final-state fingerprints.
    pub check_determinism: bool,
    pub verbose: bool,
}

/// Per difficulty and strategy roll-up.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub difficulty: Difficulty,
    pub strategy: GameplayStrategy,
    pub runs: usize,
    pub victory_rate: f64,
    pub perish_rate: f64,
    pub stall_rate: f64,
    pub mean_days: f64,
    pub std_days: f64,
    pub mean_miles: f64,
    pub std_miles: f64,
    pub mean_score: f64,
    pub best_score: u32,
    pub mean_survivors: f64,
    pub mean_crossing_failures: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub runs: Vec<RunSummary>,
    pub aggregates: Vec<Aggregate>,
    pub determinism_failures: Vec<String>,
}

impl BatchReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.determinism_failures.is_empty()
    }
}

/// Run the whole plan.
#[must_use]
pub fn run_batch(plan: &BatchPlan, seeds: &[SeedInfo]) -> BatchReport {
    let iterations = plan.iterations.max(1);
    let mut runs = Vec::new();
    let mut determinism_failures = Vec::new();

    for &difficulty in &plan.difficulties {
        for &strategy in &plan.strategies {
            for info in seeds.iter().filter(|s| s.matches_difficulty(difficulty)) {
                for iteration in 0..iterations {
                    let offset = u64::try_from(iteration).unwrap_or(0);
                    let seed = info.seed.wrapping_add(offset);
                    let config = SimulationConfig::new(difficulty, strategy, seed)
                        .with_settings(plan.table.settings(difficulty))
                        .with_max_days(plan.max_days);
                    let summary = run_journey(config);

                    if plan.check_determinism {
                        let replay = run_journey(config);
                        if replay.fingerprint != summary.fingerprint {
                            determinism_failures.push(format!(
                                "{} {} seed {} ({}): fingerprint {:016x} != {:016x}",
                                difficulty,
                                strategy,
                                seed,
                                summary.share_code,
                                summary.fingerprint,
                                replay.fingerprint
                            ));
                        }
                    }

                    if plan.verbose {
                        println!(
                            "  {} {} {} {} days:{} miles:{} score:{}",
                            outcome_badge(summary.outcome),
                            difficulty,
                            strategy,
                            summary.share_code.bright_white(),
                            summary.days,
                            summary.miles,
                            summary.score
                        );
                    }
                    runs.push(summary);
                }
            }
        }
    }

    let aggregates = aggregate_runs(&runs);
    BatchReport {
        generated_at: Utc::now().to_rfc3339(),
        runs,
        aggregates,
        determinism_failures,
    }
}

fn outcome_badge(outcome: RunOutcome) -> colored::ColoredString {
    match outcome {
        RunOutcome::Victory => "✅".green(),
        RunOutcome::Perished => "💀".red(),
        RunOutcome::Stalled => "⏸️".yellow(),
    }
}

#[must_use]
pub fn aggregate_runs(runs: &[RunSummary]) -> Vec<Aggregate> {
    let mut builders: BTreeMap<(Difficulty, GameplayStrategy), AggregateBuilder> =
        BTreeMap::new();
    for run in runs {
        builders
            .entry((run.difficulty, run.strategy))
            .or_default()
            .ingest(run);
    }
    builders
        .into_iter()
        .map(|((difficulty, strategy), builder)| builder.finish(difficulty, strategy))
        .collect()
}

#[derive(Debug, Default)]
struct AggregateBuilder {
    runs: u32,
    victories: u32,
    perished: u32,
    stalled: u32,
    days: RunningStats,
    miles: RunningStats,
    score_sum: f64,
    best_score: u32,
    survivor_sum: u32,
    crossing_failure_sum: u32,
}

impl AggregateBuilder {
    fn ingest(&mut self, run: &RunSummary) {
        self.runs += 1;
        match run.outcome {
            RunOutcome::Victory => self.victories += 1,
            RunOutcome::Perished => self.perished += 1,
            RunOutcome::Stalled => self.stalled += 1,
        }
        self.days.add(f64::from(run.days));
        self.miles.add(f64::from(run.miles));
        self.score_sum += f64::from(run.score);
        self.best_score = self.best_score.max(run.score);
        self.survivor_sum = self.survivor_sum.saturating_add(run.survivors);
        self.crossing_failure_sum = self
            .crossing_failure_sum
            .saturating_add(run.counters.crossing_failures);
    }

    fn finish(self, difficulty: Difficulty, strategy: GameplayStrategy) -> Aggregate {
        let denom = f64::from(self.runs.max(1));
        Aggregate {
            difficulty,
            strategy,
            runs: usize::try_from(self.runs).unwrap_or(usize::MAX),
            victory_rate: f64::from(self.victories) / denom,
            perish_rate: f64::from(self.perished) / denom,
            stall_rate: f64::from(self.stalled) / denom,
            mean_days: self.days.mean(),
            std_days: self.days.std_dev(),
            mean_miles: self.miles.mean(),
            std_miles: self.miles.std_dev(),
            mean_score: self.score_sum / denom,
            best_score: self.best_score,
            mean_survivors: f64::from(self.survivor_sum) / denom,
            mean_crossing_failures: f64::from(self.crossing_failure_sum) / denom,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / f64::from(self.count);
        self.m2 += delta * (value - self.mean);
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}
