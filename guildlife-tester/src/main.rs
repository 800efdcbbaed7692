mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use guildlife_agent::DifficultyLevel;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{MatchConfig, MatchOutcome, RivalStrategy, resolve_seed_inputs, run_match};

#[derive(Debug, Parser)]
#[command(name = "guildlife-tester", version = "0.1.0")]
#[command(about = "Headless matches pitting the Guild Life opponent against scripted rivals")]
struct Args {
    /// Difficulty tiers to run (comma-separated: easy,medium,hard)
    #[arg(long, default_value = "easy,medium,hard")]
    difficulty: String,

    /// Rival archetypes to play against (comma-separated, or "all")
    #[arg(long, default_value = "scholar,grinder,adventurer,hedonist")]
    rivals: String,

    /// List the available rival archetypes and exit
    #[arg(long)]
    list_rivals: bool,

    /// Seeds to run (comma-separated integers or start..end ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Weeks per match
    #[arg(long, default_value_t = 20)]
    weeks: u32,

    /// Replay every match and fail on any divergence
    #[arg(long)]
    verify_replay: bool,

    /// Honour each difficulty's decision delay between steps
    #[arg(long)]
    paced: bool,

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
    init_logging(args.verbose);

    if maybe_list_rivals(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let difficulties = parse_difficulties(&args.difficulty)?;
    let rivals = parse_rivals(&args.rivals)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    let outcomes = run_matches(&args, &difficulties, &rivals, &seeds)?;
    write_reports(&args, &outcomes, start_time)?;

    if outcomes.iter().any(|outcome| !outcome.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    let _ = builder.try_init();
}

fn maybe_list_rivals(args: &Args) -> Result<bool> {
    if !args.list_rivals {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available rivals:")?;
    for strategy in RivalStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚔️  Guild Life Opponent Tester".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_difficulties(raw: &str) -> Result<Vec<DifficultyLevel>> {
    let mut levels = Vec::new();
    for token in split_csv(raw) {
        let level = DifficultyLevel::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(&token))
            .with_context(|| format!("unknown difficulty: {token}"))?;
        if !levels.contains(&level) {
            levels.push(level);
        }
    }
    if levels.is_empty() {
        bail!("no difficulty selected");
    }
    Ok(levels)
}

fn parse_rivals(raw: &str) -> Result<Vec<RivalStrategy>> {
    let mut rivals = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            for strategy in RivalStrategy::ALL {
                if !rivals.contains(&strategy) {
                    rivals.push(strategy);
                }
            }
            continue;
        }
        let strategy = RivalStrategy::from_key(&token)
            .with_context(|| format!("unknown rival: {token}"))?;
        if !rivals.contains(&strategy) {
            rivals.push(strategy);
        }
    }
    if rivals.is_empty() {
        bail!("no rival selected");
    }
    Ok(rivals)
}

fn run_matches(
    args: &Args,
    difficulties: &[DifficultyLevel],
    rivals: &[RivalStrategy],
    seeds: &[u64],
) -> Result<Vec<MatchOutcome>> {
    println!("{}", "🧠 Running Matches".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut outcomes = Vec::new();
    for &difficulty in difficulties {
        for &rival in rivals {
            for &seed in seeds {
                let config = MatchConfig::new(difficulty, rival, seed)
                    .with_weeks(args.weeks)
                    .paced(args.paced);
                let match_start = Instant::now();
                let mut outcome = run_match(config)?;
                if args.verify_replay {
                    let replay = run_match(config)?;
                    if replay.digest != outcome.digest {
                        outcome.violations.push(format!(
                            "replay diverged: {} != {}",
                            outcome.digest, replay.digest
                        ));
                    }
                }
                let status = if outcome.passed() {
                    "✅".green()
                } else {
                    "❌".red()
                };
                if args.verbose || !outcome.passed() {
                    println!(
                        "{status} [{difficulty} vs {rival} seed {seed}] bot {:.2} / rival {:.2} - {:?}",
                        outcome.bot_progress,
                        outcome.rival_progress,
                        match_start.elapsed()
                    );
                }
                outcomes.push(outcome);
            }
        }
    }
    Ok(outcomes)
}

fn write_reports(args: &Args, outcomes: &[MatchOutcome], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, outcomes)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, outcomes)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, outcomes)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                outcomes,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
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
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
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

    #[test]
    fn difficulty_tokens_are_case_insensitive_and_deduped() {
        let levels = parse_difficulties("Hard, easy,HARD").unwrap();
        assert_eq!(levels, vec![DifficultyLevel::Hard, DifficultyLevel::Easy]);
        assert!(parse_difficulties("nightmare").is_err());
        assert!(parse_difficulties(" , ").is_err());
    }

    #[test]
    fn rival_tokens_expand_all() {
        let rivals = parse_rivals("grinder,all").unwrap();
        assert_eq!(rivals.len(), RivalStrategy::ALL.len());
        assert_eq!(rivals[0], RivalStrategy::Grinder);
        assert!(parse_rivals("bard").is_err());
    }

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(split_csv(" a, ,b,"), vec!["a".to_string(), "b".to_string()]);
    }
}
