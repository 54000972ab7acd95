use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::batch::BatchReport;
use super::simulation::RunOutcome;

fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn generate_console_report(
    out: &mut impl Write,
    report: &BatchReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Journey Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Generated: {}", report.generated_at)?;
    writeln!(out, "Total runs: {}", report.runs.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in &report.aggregates {
        writeln!(
            out,
            "{} / {} ({} runs)",
            aggregate.difficulty.to_string().bold(),
            aggregate.strategy.label().bold(),
            aggregate.runs
        )?;
        writeln!(
            out,
            "   Arrived: {}  Perished: {}  Stalled: {}",
            pct(aggregate.victory_rate).green(),
            pct(aggregate.perish_rate).red(),
            pct(aggregate.stall_rate).yellow()
        )?;
        writeln!(
            out,
            "   Days: {:.1} ± {:.1}  Miles: {:.0} ± {:.0}",
            aggregate.mean_days, aggregate.std_days, aggregate.mean_miles, aggregate.std_miles
        )?;
        writeln!(
            out,
            "   Score: {:.0} mean, {} best  Survivors: {:.2}  Failed crossings: {:.2}",
            aggregate.mean_score,
            aggregate.best_score,
            aggregate.mean_survivors,
            aggregate.mean_crossing_failures
        )?;
        writeln!(out)?;
    }

    if let Some(best) = report.runs.iter().max_by_key(|run| run.score) {
        writeln!(out, "{}", "🏆 Best Run".bright_yellow().bold())?;
        writeln!(out, "{}", "==========".yellow())?;
        writeln!(
            out,
            "{} {} {}: {} points, {} survivors, {} days",
            best.share_code.green(),
            best.difficulty,
            best.strategy,
            best.score,
            best.survivors,
            best.days
        )?;
        writeln!(out)?;
    }

    if report.passed() {
        writeln!(out, "{}", "✅ Determinism checks passed".green())?;
    } else {
        writeln!(out, "{}", "❌ Determinism failures".red().bold())?;
        for failure in &report.determinism_failures {
            writeln!(out, "   • {}", failure.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut impl Write, report: &BatchReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut impl Write, report: &BatchReport) -> Result<()> {
    writeln!(out, "# Caravan Journey Results\n")?;
    writeln!(out, "_Generated {}_\n", report.generated_at)?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {}", report.runs.len())?;
    let victories = report
        .runs
        .iter()
        .filter(|run| run.outcome == RunOutcome::Victory)
        .count();
    writeln!(out, "- **Arrivals**: {victories}")?;
    writeln!(
        out,
        "- **Determinism**: {}\n",
        if report.passed() { "✅" } else { "❌" }
    )?;

    writeln!(out, "## By Difficulty and Strategy\n")?;
    writeln!(
        out,
        "| Difficulty | Strategy | Runs | Arrived | Perished | Stalled | Mean days | Mean score | Best |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|")?;
    for a in &report.aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.1} | {:.0} | {} |",
            a.difficulty,
            a.strategy,
            a.runs,
            pct(a.victory_rate),
            pct(a.perish_rate),
            pct(a.stall_rate),
            a.mean_days,
            a.mean_score,
            a.best_score
        )?;
    }

    if !report.determinism_failures.is_empty() {
        writeln!(out, "\n## Determinism Failures\n")?;
        for failure in &report.determinism_failures {
            writeln!(out, "- {failure}")?;
        }
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut impl Write, report: &BatchReport) -> Result<()> {
    writeln!(
        out,
        "seed,code,difficulty,strategy,outcome,days,miles,survivors,score,events,crossings,crossing_failures,hunts,rest_days,fingerprint"
    )?;
    for run in &report.runs {
        let c = &run.counters;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{:016x}",
            run.seed,
            run.share_code,
            run.difficulty,
            run.strategy.label(),
            run.outcome.label(),
            run.days,
            run.miles,
            run.survivors,
            run.score,
            c.events,
            c.crossings,
            c.crossing_failures,
            c.hunts,
            c.rest_days,
            run.fingerprint
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::batch::{BatchPlan, run_batch};
    use crate::logic::policy::GameplayStrategy;
    use crate::logic::seeds::SeedInfo;
    use caravan_game::{Difficulty, DifficultyTable};

    fn sample_report() -> BatchReport {
        let plan = BatchPlan {
            difficulties: vec![Difficulty::Easy],
            table: DifficultyTable::default(),
            strategies: vec![GameplayStrategy::Cautious],
            iterations: 1,
            max_days: 365,
            check_determinism: false,
            verbose: false,
        };
        run_batch(&plan, &[SeedInfo::from_numeric(3)])
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_a_row_per_run() {
        let report = sample_report();
        let csv = render(|out| generate_csv_report(out, &report));
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("seed,code,difficulty"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("3,EZ-"));
        assert!(row.contains(",easy,Cautious,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn json_report_parses() {
        let report = sample_report();
        let json = render(|out| generate_json_report(out, &report));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["runs"].as_array().unwrap().len(), 1);
        assert_eq!(value["aggregates"][0]["strategy"], "cautious");
    }

    #[test]
    fn markdown_and_console_mention_the_strategy() {
        let report = sample_report();
        let md = render(|out| generate_markdown_report(out, &report));
        assert!(md.contains("# Caravan Journey Results"));
        assert!(md.contains("| easy | Cautious | 1 |"));
        let console = render(|out| generate_console_report(out, &report, Duration::ZERO));
        assert!(console.contains("Journey Results Summary"));
        assert!(console.contains("Determinism checks passed"));
    }
}
