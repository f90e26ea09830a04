// In app/src/main.rs

use std::path::PathBuf;

use analytics::filter::{Outcome, Session, TradeFilter, WeekdayFilter};
use analytics::scenario::ScenarioParams;
use analytics::{AnalyticsEngine, DdBasis};
use anyhow::{Context, Result};
use app_config::Settings;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use core_types::{Side, Symbol, TradeRecord};
use serde::Serialize;
use tracing_subscriber::prelude::*;

mod loader;
mod report;

use crate::report::Heatmaps;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Performance analytics for a trade journal export.")]
struct Cli {
    /// Directory holding base.toml and the per-environment overrides.
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    /// Overrides `analytics.dd_basis` ("capital" or "r").
    #[arg(long, global = true)]
    basis: Option<DdBasis>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TradeArgs {
    /// Path to the JSON trade export.
    #[arg(short, long)]
    trades: PathBuf,

    /// Only keep trades on this instrument (e.g., "USD/JPY").
    #[arg(long)]
    instrument: Option<String>,

    /// Only keep long or short trades.
    #[arg(long)]
    side: Option<Side>,

    /// Inclusive start date in YYYY-MM-DD format.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Inclusive end date in YYYY-MM-DD format.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only keep winning or losing trades ("win" or "loss").
    #[arg(long)]
    outcome: Option<Outcome>,

    /// "weekdays", "weekend", a day number (0 = Sunday) or a day name.
    #[arg(long)]
    weekday: Option<WeekdayFilter>,

    /// Trading session by hour: "asia", "london", "new-york" or "thin".
    #[arg(long)]
    session: Option<Session>,
}

impl TradeArgs {
    fn filter(&self) -> TradeFilter {
        TradeFilter {
            instrument: self.instrument.as_deref().map(Symbol::from),
            side: self.side,
            from: self.from,
            to: self.to,
            outcome: self.outcome,
            weekday: self.weekday,
            session: self.session,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full report: metrics, score, recommendation, risk profile, heatmaps and advice.
    Report {
        #[command(flatten)]
        trades: TradeArgs,

        /// Print a short text summary instead of JSON.
        #[arg(long)]
        summary: bool,
    },

    /// Re-prices the history under a hypothetical TP/SL policy.
    WhatIf {
        #[command(flatten)]
        trades: TradeArgs,

        /// Take-profit distance in multiples of R.
        #[arg(long)]
        ratio: Option<f64>,

        /// Simulate a trailing stop; `--trailing=false` turns it off.
        #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
        trailing: Option<bool>,

        /// Simulate a break-even stop; `--break-even=false` turns it off.
        #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
        break_even: Option<bool>,
    },

    /// Searches the TP/SL ratio grid for the best acceptable setting.
    Recommend {
        #[command(flatten)]
        trades: TradeArgs,
    },

    /// Instrument x time-slot and weekday x time-slot heatmaps.
    Heatmap {
        #[command(flatten)]
        trades: TradeArgs,
    },

    /// Equity curve, drawdown and losing-streak odds.
    Risk {
        #[command(flatten)]
        trades: TradeArgs,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let mut settings = app_config::load_settings_from(&cli.config_dir)
        .with_context(|| format!("Failed to load settings from {}", cli.config_dir.display()))?;
    if let Some(basis) = cli.basis {
        settings.analytics.dd_basis = basis;
    }

    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting trade journal");

    if let Some(cores) = settings.app.optimizer_cores {
        tracing::info!(cores, "Configuring Rayon thread pool.");
        rayon::ThreadPoolBuilder::new()
            .num_threads(cores)
            .build_global()
            .context("Failed to build Rayon thread pool")?;
    }

    let engine = AnalyticsEngine::new(settings.analytics.dd_basis, settings.analytics.initial_capital);

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Report { trades, summary } => {
            let trades = load(&trades, &settings)?;
            match report::build_report(&engine, &trades, &settings.heatmap.instruments) {
                Some(report) if summary => report::print_summary(&report),
                Some(report) => print_json(&report)?,
                None => print_empty()?,
            }
        }
        Commands::WhatIf {
            trades,
            ratio,
            trailing,
            break_even,
        } => {
            let trades = load(&trades, &settings)?;
            let params = ScenarioParams {
                ratio: ratio.unwrap_or(settings.scenario.ratio),
                trailing: trailing.unwrap_or(settings.scenario.trailing),
                break_even: break_even.unwrap_or(settings.scenario.break_even),
            };
            match analytics::metrics::compute(&trades) {
                Some(base) => print_json(&engine.what_if(&base, &params))?,
                None => print_empty()?,
            }
        }
        Commands::Recommend { trades } => {
            let trades = load(&trades, &settings)?;
            match analytics::metrics::compute(&trades) {
                Some(base) => {
                    let output = RecommendOutput {
                        candidates: engine.candidates(&base),
                        recommendation: engine.recommend(&base),
                    };
                    print_json(&output)?;
                }
                None => print_empty()?,
            }
        }
        Commands::Heatmap { trades } => {
            let trades = load(&trades, &settings)?;
            print_json(&Heatmaps::build(&trades, &settings.heatmap.instruments))?;
        }
        Commands::Risk { trades } => {
            let trades = load(&trades, &settings)?;
            print_json(&risk::RiskProfile::from_trades(&trades, engine.initial_capital()))?;
        }
    }

    tracing::info!("Trade journal has finished successfully.");
    Ok(())
}

#[derive(Serialize)]
struct RecommendOutput {
    candidates: Vec<analytics::optimizer::CandidateResult>,
    recommendation: Option<analytics::optimizer::Recommendation>,
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    // Logs go to stderr so stdout stays valid JSON.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn load(args: &TradeArgs, settings: &Settings) -> Result<Vec<TradeRecord>> {
    loader::load_trades(&args.trades, &settings.mapping, &args.filter())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_empty() -> Result<()> {
    tracing::warn!("No trades matched; nothing to analyze.");
    print_json(&serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn what_if_accepts_bare_switches() {
        let cli = Cli::try_parse_from([
            "journal", "what-if", "--trades", "t.json", "--trailing", "--break-even", "--ratio", "1.8",
        ])
        .unwrap();
        let Commands::WhatIf {
            ratio,
            trailing,
            break_even,
            ..
        } = cli.command
        else {
            panic!("expected what-if");
        };
        assert_eq!((ratio, trailing, break_even), (Some(1.8), Some(true), Some(true)));

        let cli = Cli::try_parse_from(["journal", "what-if", "--trades", "t.json", "--trailing=false"]).unwrap();
        let Commands::WhatIf {
            trailing, break_even, ..
        } = cli.command
        else {
            panic!("expected what-if");
        };
        assert_eq!((trailing, break_even), (Some(false), None));
    }

    #[test]
    fn filter_flags_reach_the_trade_filter() {
        let cli = Cli::try_parse_from([
            "journal", "report", "--trades", "t.json", "--outcome", "loss", "--weekday", "weekend",
            "--session", "london", "--side", "short",
        ])
        .unwrap();
        let Commands::Report { trades, .. } = cli.command else {
            panic!("expected report");
        };
        let filter = trades.filter();
        assert_eq!(filter.outcome, Some(Outcome::Loss));
        assert_eq!(filter.weekday, Some(WeekdayFilter::Weekend));
        assert_eq!(filter.session, Some(Session::London));
        assert_eq!(filter.side, Some(Side::Short));
        assert_eq!(filter.instrument, None);

        assert!(Cli::try_parse_from(["journal", "risk", "--trades", "t.json", "--session", "evening"]).is_err());
    }
}
