use anyhow::{Context, Result};
use chrono::{Local, Offset, Utc};
use clap::Parser;
use savings_predictor::cli::{Cli, Command, OutputFormat};
use savings_predictor::clock::{ManualClock, SystemClock};
use savings_predictor::config::Config;
use savings_predictor::entities::SharedEntityDirectory;
use savings_predictor::histogram::{
    HistogramSink, MetricsHistogramSink, RecordingHistogramSink, TeeHistogramSink,
};
use savings_predictor::navigation::NavigationBinding;
use savings_predictor::prefs::JsonFilePrefStore;
use savings_predictor::replay::{replay_log, Replayer};
use savings_predictor::savings::{BandwidthSavingsTracker, SAVINGS_HISTOGRAM_NAME};
use serde_json::json;
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const REPLAY_TAB_ID: u64 = 1;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool, log_filter: Option<&str>) {
    let filter = match (debug, log_filter) {
        (_, Some(directive)) => EnvFilter::new(directive),
        (true, None) => {
            EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
        }
        (false, None) => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) with command-line overrides applied
fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(state) = &args.state {
        config.state_path = state.clone();
    }
    if let Some(entities) = &args.entities {
        config.entities_path = Some(entities.clone());
    }
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn run_resolve(config: &Config, inputs: &[String], format: OutputFormat) -> Result<()> {
    let shared = SharedEntityDirectory::new(config.entity_source());
    let directory = shared.get();

    match format {
        OutputFormat::Text => {
            for input in inputs {
                println!("{}\t{}", input, directory.resolve(input).unwrap_or("-"));
            }
        }
        OutputFormat::Json => {
            let results: Vec<_> = inputs
                .iter()
                .map(|input| json!({"input": input, "entity": directory.resolve(input)}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    Ok(())
}

fn run_replay(
    config: &Config,
    events: &std::path::Path,
    off_the_record: bool,
    format: OutputFormat,
) -> Result<()> {
    let file = File::open(events)
        .with_context(|| format!("Failed to open event log: {}", events.display()))?;

    let skip = off_the_record && config.skip_off_the_record;
    let clock = ManualClock::with_offset(Utc::now(), Local::now().offset().fix());
    let sink = Rc::new(RecordingHistogramSink::new());
    let sinks: Vec<Rc<dyn HistogramSink>> = vec![Rc::new(MetricsHistogramSink), sink.clone()];
    let histograms = TeeHistogramSink::new(sinks);
    let prefs = JsonFilePrefStore::open(&config.state_path).into_shared();
    let tracker = Rc::new(RefCell::new(BandwidthSavingsTracker::new(
        prefs,
        Rc::new(histograms),
        Rc::new(clock.clone()),
    )));

    let directory = SharedEntityDirectory::new(config.entity_source()).get();
    let binding = NavigationBinding::new(REPLAY_TAB_ID, skip, directory, Rc::clone(&tracker));
    let summary = replay_log(BufReader::new(file), Replayer::new(binding, skip, clock))
        .with_context(|| format!("Failed to replay {}", events.display()))?;

    let tracker = tracker.borrow();
    let buckets: Vec<usize> = sink
        .samples()
        .iter()
        .filter(|s| s.name == SAVINGS_HISTOGRAM_NAME)
        .map(|s| s.sample)
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Events: {}", summary.events);
            for saving in &summary.recorded {
                let id = saving
                    .navigation_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string());
                println!("Navigation {}: {} bytes saved", id, saving.bytes);
            }
            println!("Recorded: {} bytes", summary.total_recorded());
            println!("Cumulative: {} bytes", tracker.total_saved_bytes());
            println!("Buckets reported: {:?}", buckets);
        }
        OutputFormat::Json => {
            let output = json!({
                "events": summary.events,
                "recorded": summary.recorded,
                "total_recorded": summary.total_recorded(),
                "cumulative_bytes": tracker.total_saved_bytes(),
                "buckets": buckets,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_status(config: &Config, format: OutputFormat) -> Result<()> {
    let prefs = JsonFilePrefStore::open(&config.state_path).into_shared();
    let tracker = BandwidthSavingsTracker::new(
        prefs,
        Rc::new(MetricsHistogramSink),
        Rc::new(SystemClock),
    );
    let aggregator = tracker.aggregator();

    match format {
        OutputFormat::Text => {
            println!("Cumulative: {} bytes", tracker.total_saved_bytes());
            println!("Last 7 days: {} bytes", aggregator.get_savings_total());
            println!("Bucket: {}", aggregator.current_bucket());
            for entry in aggregator.daily_savings() {
                println!(
                    "  {}  {} bytes",
                    entry.day.with_timezone(&Local).format("%Y-%m-%d"),
                    entry.saving
                );
            }
        }
        OutputFormat::Json => {
            let daily: Vec<_> = aggregator
                .daily_savings()
                .iter()
                .map(|entry| json!({"day": entry.day.to_rfc3339(), "saving": entry.saving}))
                .collect();
            let output = json!({
                "cumulative_bytes": tracker.total_saved_bytes(),
                "rolling_total_bytes": aggregator.get_savings_total(),
                "bucket": aggregator.current_bucket(),
                "daily": daily,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(&args)?;

    init_tracing(args.debug, config.log_filter.as_deref());

    match &args.command {
        Command::Resolve { inputs } => run_resolve(&config, inputs, args.format),
        Command::Replay {
            events,
            off_the_record,
        } => run_replay(&config, events, *off_the_record, args.format),
        Command::Status => run_status(&config, args.format),
    }
}
