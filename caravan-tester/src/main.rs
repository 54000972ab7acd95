mod logic;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use caravan_game::{Difficulty, DifficultyTable, LeaderboardEntry, leaderboard};
use logic::{
    BatchPlan, BatchReport, FileLeaderboard, GameplayStrategy, RunOutcome, resolve_seed_inputs,
    run_batch,
};

#[derive(Debug, Parser)]
#[command(name = "caravan-tester", version = "0.1.0")]
#[command(about = "Automated playthroughs and balance reports for the Caravan trail simulation")]
struct Args {
    /// Difficulties to run (comma-separated: easy,normal,hard or all)
    #[arg(long, default_value = "all")]
    difficulties: String,

    /// Player strategies to run (comma-separated: cautious,balanced,reckless or all)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// Seeds to run (comma-separated integers, share codes, or `all`)
    #[arg(long, default_value = "1848")]
    seeds: String,

    /// Consecutive seeds to run from each listed seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Days before a journey counts as stalled
    #[arg(long, default_value_t = 365)]
    max_days: u32,

    /// Replay every journey and compare final-state fingerprints
    #[arg(long)]
    check_determinism: bool,

    /// JSON difficulty table overriding the built-in presets
    #[arg(long)]
    difficulty_config: Option<PathBuf>,

    /// Record arrivals on the leaderboard stored at this path
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    announce_banner();

    let start_time = Instant::now();
    let plan = build_plan(&args)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    info!(
        "running {} seed(s) x {} difficulty(ies) x {} strategy(ies), {} iteration(s) each",
        seeds.len(),
        plan.difficulties.len(),
        plan.strategies.len(),
        plan.iterations
    );

    let report = run_batch(&plan, &seeds);

    if let Some(path) = &args.leaderboard {
        let recorded = record_arrivals(path, &report)?;
        println!(
            "🏆 Recorded {} arrival(s) on {}",
            recorded,
            path.display().to_string().bright_white()
        );
    }

    write_report(&args, &report, start_time)?;

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🎮 Caravan Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_difficulties(raw: &str) -> Result<Vec<Difficulty>> {
    let mut difficulties = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            difficulties.extend(Difficulty::ALL);
            continue;
        }
        let difficulty: Difficulty = token
            .parse()
            .map_err(|()| anyhow!("Unknown difficulty: {token}"))?;
        difficulties.push(difficulty);
    }
    difficulties.sort_unstable();
    difficulties.dedup();
    if difficulties.is_empty() {
        difficulties.push(Difficulty::Normal);
    }
    Ok(difficulties)
}

fn parse_strategies(raw: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        let strategy = GameplayStrategy::from_str(&token, true)
            .map_err(|_| anyhow!("Unknown strategy: {token}"))?;
        strategies.push(strategy);
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        strategies.push(GameplayStrategy::Balanced);
    }
    Ok(strategies)
}

fn load_table(path: Option<&Path>) -> Result<DifficultyTable> {
    let Some(path) = path else {
        return Ok(DifficultyTable::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    DifficultyTable::from_json(&json)
        .with_context(|| format!("invalid difficulty table in {}", path.display()))
}

fn build_plan(args: &Args) -> Result<BatchPlan> {
    Ok(BatchPlan {
        difficulties: parse_difficulties(&args.difficulties)?,
        table: load_table(args.difficulty_config.as_deref())?,
        strategies: parse_strategies(&args.strategies)?,
        iterations: args.iterations.max(1),
        max_days: args.max_days,
        check_determinism: args.check_determinism,
        verbose: args.verbose,
    })
}

/// Add every arrival to the leaderboard file. Returns how many were recorded.
fn record_arrivals(path: &Path, report: &BatchReport) -> Result<usize> {
    let store = FileLeaderboard::new(path);
    let date = Local::now().format("%Y-%m-%d").to_string();
    let mut recorded = 0;
    for run in report
        .runs
        .iter()
        .filter(|run| run.outcome == RunOutcome::Victory)
    {
        let name = format!("{} {}", run.strategy.label(), run.share_code);
        let entry = LeaderboardEntry::from_game(name, &run.final_state, date.clone());
        let board = leaderboard::record(&store, entry)
            .with_context(|| format!("failed to update {}", path.display()))?;
        if board.rank_of(run.score).is_none() {
            warn!("{} scored {} and did not place", run.share_code, run.score);
        }
        recorded += 1;
    }
    Ok(recorded)
}

fn write_report(args: &Args, report: &BatchReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, report)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, report)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, report)?,
        _ => {
            if report.runs.is_empty() {
                writeln!(&mut output_target, "No journeys matched the requested seeds.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    report,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        self.writer().flush()
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::seeds::SeedInfo;

    fn base_args() -> Args {
        Args {
            difficulties: "normal".to_string(),
            strategies: "balanced".to_string(),
            seeds: "1848".to_string(),
            iterations: 1,
            max_days: 365,
            check_determinism: false,
            difficulty_config: None,
            leaderboard: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "caravan-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(split_csv(" a, ,b,"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn difficulties_expand_and_dedup() {
        assert_eq!(parse_difficulties("all,hard").unwrap(), Difficulty::ALL.to_vec());
        assert_eq!(parse_difficulties("HARD").unwrap(), vec![Difficulty::Hard]);
        assert_eq!(parse_difficulties("").unwrap(), vec![Difficulty::Normal]);
        assert!(parse_difficulties("nightmare").is_err());
    }

    #[test]
    fn strategies_parse_case_insensitively() {
        assert_eq!(
            parse_strategies("Reckless,cautious").unwrap(),
            vec![GameplayStrategy::Cautious, GameplayStrategy::Reckless]
        );
        assert_eq!(parse_strategies("all").unwrap().len(), GameplayStrategy::ALL.len());
        assert!(parse_strategies("lucky").is_err());
    }

    #[test]
    fn missing_table_uses_presets() {
        let table = load_table(None).unwrap();
        assert_eq!(table, DifficultyTable::default());
        assert!(load_table(Some(&temp_path("absent-table"))).is_err());
    }

    #[test]
    fn invalid_table_is_rejected() {
        let path = temp_path("bad-table.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_table(Some(&path)).is_err());
    }

    #[test]
    fn build_plan_clamps_iterations() {
        let args = Args {
            iterations: 0,
            ..base_args()
        };
        let plan = build_plan(&args).unwrap();
        assert_eq!(plan.iterations, 1);
        assert_eq!(plan.strategies, vec![GameplayStrategy::Balanced]);
    }

    #[test]
    fn write_report_emits_csv() {
        let output = temp_path("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(output.clone()),
            ..base_args()
        };
        let plan = build_plan(&args).unwrap();
        let report = run_batch(&plan, &[SeedInfo::from_numeric(9)]);
        write_report(&args, &report, Instant::now()).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.starts_with("seed,code,difficulty"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn arrivals_land_on_the_leaderboard() {
        let args = Args {
            strategies: "cautious".to_string(),
            difficulties: "easy".to_string(),
            ..base_args()
        };
        let plan = build_plan(&args).unwrap();
        let seeds: Vec<SeedInfo> = (1..=4).map(SeedInfo::from_numeric).collect();
        let report = run_batch(&plan, &seeds);
        let arrivals = report
            .runs
            .iter()
            .filter(|run| run.outcome == RunOutcome::Victory)
            .count();

        let path = temp_path("board").join("leaderboard.json");
        let recorded = record_arrivals(&path, &report).unwrap();
        assert_eq!(recorded, arrivals);
        let board = leaderboard::load(&FileLeaderboard::new(&path)).unwrap();
        assert_eq!(board.len(), arrivals.min(10));
    }
}
