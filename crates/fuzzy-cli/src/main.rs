mod datetime;
mod obs;
mod ruleset;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fuzzy_engine::{
    add_time, delta_seconds, parse_duration, render_template, FuzzyOptions, RuleKind, TimeUnit,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "fuzzy")]
#[command(about = "Render fuzzy relative timestamps from rule sets", version, arg_required_else_help = true)]
#[command(
    after_help = "Examples:\n  fuzzy build --start 2013-10-21T15:00:00 --reference 2013-10-22T12:54:58 \\\n      --before 'T16H=%h hours ago' --before '1D=yesterday'\n  fuzzy build --rules rules.json --start 2026-01-01T09:00:00Z --timezone Europe/Paris\n  fuzzy parse P1Y2WT2M3S\n  fuzzy add --date 2013-01-01 --magnitude 2.5 --unit month\n  fuzzy render --seconds 7200 '%h hours ago'\n"
)]
struct Cli {
    /// Log filter, e.g. `debug` or `fuzzy_engine=trace` (FUZZY_LOG overrides).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the time from a start to a reference datetime.
    Build(BuildArgs),
    /// Parse duration notation and print its components as JSON.
    Parse {
        duration: String,
    },
    /// Add an amount of one unit to a datetime.
    Add {
        #[arg(long)]
        date: String,
        #[arg(long, allow_negative_numbers = true)]
        magnitude: f64,
        /// year, month, week, day, hour, minute or second.
        #[arg(long)]
        unit: TimeUnit,
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Fill a template's placeholders from a number of seconds.
    Render {
        #[arg(long, allow_negative_numbers = true)]
        seconds: i64,
        template: String,
    },
}

#[derive(Args)]
struct BuildArgs {
    #[arg(long)]
    start: String,
    /// Defaults to the current time in --timezone.
    #[arg(long)]
    reference: Option<String>,
    /// JSON rule file with optional "at", "before", "after" and "options" keys.
    #[arg(long)]
    rules: Option<PathBuf>,
    #[arg(long = "at", value_name = "DURATION=TEMPLATE")]
    at: Vec<String>,
    #[arg(long = "before", value_name = "DURATION=TEMPLATE")]
    before: Vec<String>,
    #[arg(long = "after", value_name = "DURATION=TEMPLATE")]
    after: Vec<String>,
    #[arg(long, default_value = "UTC")]
    timezone: String,
    /// strftime pattern used when no rule matches.
    #[arg(long)]
    fallback_format: Option<String>,
    /// Print which rule matched as JSON.
    #[arg(long, default_value_t = false)]
    explain: bool,
}

#[derive(Serialize)]
struct Explanation {
    kind: Option<RuleKind>,
    index: Option<usize>,
    delta_seconds: i64,
    text: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = obs::init_tracing(&cli.log_level).and_then(|()| run(cli.command)) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Build(args) => build(args),
        Command::Parse { duration } => {
            let parsed = parse_duration(&duration)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Command::Add {
            date,
            magnitude,
            unit,
            timezone,
        } => {
            let tz = datetime::parse_timezone(&timezone)?;
            let date = datetime::parse_datetime(&date, tz)?;
            let shifted = add_time(date, magnitude, unit)?;
            println!("{}", shifted.format(datetime::OUTPUT_FORMAT));
            Ok(())
        }
        Command::Render { seconds, template } => {
            println!("{}", render_template(seconds, &template));
            Ok(())
        }
    }
}

fn build(args: BuildArgs) -> Result<()> {
    let tz = datetime::parse_timezone(&args.timezone)?;
    let start = datetime::parse_datetime(&args.start, tz).context("invalid --start")?;
    let reference = match &args.reference {
        Some(raw) => datetime::parse_datetime(raw, tz).context("invalid --reference")?,
        None => datetime::now_in(tz),
    };

    let mut fuzzy = ruleset::load(args.rules.as_deref())?;
    ruleset::register_inline(&mut fuzzy, RuleKind::At, &args.at)?;
    ruleset::register_inline(&mut fuzzy, RuleKind::Before, &args.before)?;
    ruleset::register_inline(&mut fuzzy, RuleKind::After, &args.after)?;
    if let Some(fallback_format) = args.fallback_format {
        fuzzy.set_options(FuzzyOptions { fallback_format });
    }

    tracing::debug!(%start, %reference, "building fuzzy timestamp");

    if !args.explain {
        println!("{}", fuzzy.build(start, reference)?);
        return Ok(());
    }

    let explanation = match fuzzy.evaluate(start, reference)? {
        Some(matched) => Explanation {
            kind: Some(matched.kind),
            index: Some(matched.index),
            delta_seconds: matched.delta_seconds,
            text: matched.text,
        },
        None => Explanation {
            kind: None,
            index: None,
            delta_seconds: delta_seconds(start, reference),
            text: fuzzy.format_fallback(start)?,
        },
    };
    println!("{}", serde_json::to_string_pretty(&explanation)?);
    Ok(())
}
