use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use guildlife_agent::DifficultyLevel;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::policy::RivalStrategy;
use super::simulation::MatchOutcome;

/// Per difficulty and rival roll-up across seeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupAggregate {
    pub difficulty: DifficultyLevel,
    pub rival: RivalStrategy,
    pub matches: usize,
    pub bot_leads: usize,
    pub mean_bot_progress: f32,
    pub mean_rival_progress: f32,
    pub mean_steps_per_week: f32,
    pub forced_turns: usize,
    pub detections: usize,
    pub violations: usize,
}

impl MatchupAggregate {
    #[must_use]
    pub fn lead_rate(&self) -> f32 {
        ratio(self.bot_leads, self.matches)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f32>, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f32>() / count as f32
    }
}

/// Group outcomes by matchup, preserving first-seen order.
#[must_use]
pub fn aggregate_outcomes(outcomes: &[MatchOutcome]) -> Vec<MatchupAggregate> {
    let mut keys: Vec<(DifficultyLevel, RivalStrategy)> = Vec::new();
    for outcome in outcomes {
        let key = (outcome.difficulty, outcome.rival);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|(difficulty, rival)| {
            let group: Vec<&MatchOutcome> = outcomes
                .iter()
                .filter(|o| o.difficulty == difficulty && o.rival == rival)
                .collect();
            let matches = group.len();
            let weeks: u32 = group.iter().map(|o| o.weeks_played).sum();
            let steps: usize = group.iter().map(|o| o.total_steps).sum();
            MatchupAggregate {
                difficulty,
                rival,
                matches,
                bot_leads: group.iter().filter(|o| o.bot_leads()).count(),
                mean_bot_progress: mean(group.iter().map(|o| o.bot_progress), matches),
                mean_rival_progress: mean(group.iter().map(|o| o.rival_progress), matches),
                mean_steps_per_week: ratio(steps, usize::try_from(weeks).unwrap_or(usize::MAX)),
                forced_turns: group.iter().map(|o| o.forced_turns).sum(),
                detections: group
                    .iter()
                    .filter(|o| o.detection_hit() == Some(true))
                    .count(),
                violations: group.iter().map(|o| o.violations.len()).sum(),
            }
        })
        .collect()
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    outcomes: &[MatchOutcome],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Match Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "========================".cyan())?;

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed()).count();
    writeln!(writer, "Total matches: {total}")?;
    writeln!(writer, "Passed: {}", passed.to_string().green())?;
    writeln!(writer, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for aggregate in aggregate_outcomes(outcomes) {
        let status = if aggregate.violations == 0 {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            writer,
            "{} {} vs {}",
            status,
            aggregate.difficulty.to_string().bold(),
            aggregate.rival.to_string().bold()
        )?;
        writeln!(
            writer,
            "   Bot leads: {}/{} ({:.0}%)",
            aggregate.bot_leads,
            aggregate.matches,
            aggregate.lead_rate() * 100.0
        )?;
        writeln!(
            writer,
            "   Progress: bot {:.2} / rival {:.2}",
            aggregate.mean_bot_progress, aggregate.mean_rival_progress
        )?;
        writeln!(
            writer,
            "   Steps/week: {:.1}, forced turns: {}, strategy detected: {}/{}",
            aggregate.mean_steps_per_week,
            aggregate.forced_turns,
            aggregate.detections,
            aggregate.matches
        )?;
    }

    let failures: Vec<&MatchOutcome> = outcomes.iter().filter(|o| !o.passed()).collect();
    if !failures.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", "Violations".bright_red().bold())?;
        for outcome in failures {
            for violation in &outcome.violations {
                writeln!(
                    writer,
                    "  • [{} vs {} seed {}] {}",
                    outcome.difficulty,
                    outcome.rival,
                    outcome.seed,
                    violation.red()
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    outcomes: &[MatchOutcome],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(outcomes)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    outcomes: &[MatchOutcome],
) -> Result<()> {
    writeln!(writer, "# Guild Life Opponent Match Results\n")?;
    writeln!(writer, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed()).count();
    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total matches**: {total}")?;
    writeln!(writer, "- **Passed**: {passed}")?;
    writeln!(writer, "- **Failed**: {}\n", total - passed)?;

    writeln!(writer, "## Matchups\n")?;
    writeln!(
        writer,
        "| Difficulty | Rival | Matches | Bot leads | Bot progress | Rival progress | Steps/week | Detected |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for aggregate in aggregate_outcomes(outcomes) {
        writeln!(
            writer,
            "| {} | {} | {} | {:.0}% | {:.2} | {:.2} | {:.1} | {}/{} |",
            aggregate.difficulty,
            aggregate.rival,
            aggregate.matches,
            aggregate.lead_rate() * 100.0,
            aggregate.mean_bot_progress,
            aggregate.mean_rival_progress,
            aggregate.mean_steps_per_week,
            aggregate.detections,
            aggregate.matches
        )?;
    }

    let failures: Vec<&MatchOutcome> = outcomes.iter().filter(|o| !o.passed()).collect();
    if !failures.is_empty() {
        writeln!(writer, "\n## Violations\n")?;
        for outcome in failures {
            for violation in &outcome.violations {
                writeln!(
                    writer,
                    "- {} vs {} seed {}: {violation}",
                    outcome.difficulty, outcome.rival, outcome.seed
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_csv_report<W: Write + ?Sized>(
    writer: &mut W,
    outcomes: &[MatchOutcome],
) -> Result<()> {
    writeln!(
        writer,
        "seed,difficulty,rival,weeks,bot_progress,rival_progress,bot_wealth,rival_wealth,bot_degrees,steps,rejections,forced_turns,detected,violations,digest"
    )?;
    for outcome in outcomes {
        let detected = outcome
            .detected
            .map_or_else(String::new, |label| label.label().to_string());
        writeln!(
            writer,
            "{},{},{},{},{:.4},{:.4},{},{},{},{},{},{},{},{},{}",
            outcome.seed,
            outcome.difficulty,
            outcome.rival,
            outcome.weeks_played,
            outcome.bot_progress,
            outcome.rival_progress,
            outcome.bot_wealth,
            outcome.rival_wealth,
            outcome.bot_degrees,
            outcome.total_steps,
            outcome.total_rejections,
            outcome.forced_turns,
            detected,
            outcome.violations.len(),
            outcome.digest
        )?;
    }
    Ok(())
}
