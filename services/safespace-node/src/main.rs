use std::future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use safespace_core::{current_timestamp_ms, logging, RuntimeConfig, TimestampMs, TracingSink};
use safespace_domain::{load_profile, FileSettingsStore, MockProfileProvider, SettingsManager, SettingsStore};
use safespace_node::{App, Event, Now, Response};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

const CONFIG_SCHEMA_VERSION: u32 = 1;
const EVENT_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    name: &'static str,
    version: &'static str,
    config_schema_version: u32,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config: Option<PathBuf>,
    seed: Option<u64>,
    emergency: bool,
    json_logs: bool,
    version_json: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args_iter.next() else {
                    bail!("--config was provided without a path");
                };
                cli.config = Some(PathBuf::from(path));
            }
            "--seed" => {
                let Some(raw) = args_iter.next() else {
                    bail!("--seed was provided without a value");
                };
                cli.seed = Some(raw.parse().with_context(|| format!("invalid seed `{raw}`"))?);
            }
            "--emergency" => cli.emergency = true,
            "--json-logs" => cli.json_logs = true,
            "--version-json" => cli.version_json = true,
            other => bail!("unrecognised argument `{other}`"),
        }
    }
    Ok(cli)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    if cli.version_json {
        let handshake = NodeVersionHandshake {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            config_schema_version: CONFIG_SCHEMA_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let mut config = RuntimeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }
    config.json_logs |= cli.json_logs;

    logging::init_with(config.json_logs);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        settings = %config.settings_path.display(),
        "safespace-node starting"
    );

    let mut sink = TracingSink::new();
    let profile = load_profile(&MockProfileProvider::new(), config.profile_timeout(), &mut sink).await;
    let settings = SettingsManager::load(FileSettingsStore::new(&config.settings_path), &mut sink);
    let mut app = App::new(&config, profile, settings, sink, current_timestamp_ms());

    if cli.emergency {
        print_response(app.handle(Event::Input("panic".to_string()), Now::local()));
    }

    run(app, &config).await;
    Ok(())
}

async fn run<St: SettingsStore>(mut app: App<TracingSink, St>, config: &RuntimeConfig) {
    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

    let tickers = [
        spawn_ticker(tx.clone(), config.intervals.wearable(), Event::WearableTick),
        spawn_ticker(tx.clone(), config.intervals.score(), Event::ScoreTick),
        spawn_ticker(tx.clone(), config.intervals.timeout_check(), Event::TimeoutCheck),
    ];
    let reader = spawn_stdin_reader(tx);

    loop {
        let deadline = app.next_deadline();
        let event = tokio::select! {
            received = rx.recv() => match received {
                Some(event) => event,
                None => break,
            },
            _ = sleep_until_deadline(deadline) => Event::Deadline,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        };

        let response = app.handle(event, Now::local());
        let quit = response.quit;
        print_response(response);
        if quit {
            break;
        }
    }

    for ticker in tickers {
        ticker.abort();
    }
    reader.abort();
    info!(notifications = app.sink().emitted(), "safespace-node stopped");
}

fn print_response(response: Response) {
    for line in response.lines {
        println!("{line}");
    }
}

async fn sleep_until_deadline(deadline: Option<TimestampMs>) {
    match deadline {
        Some(due) => {
            let wait = due.saturating_sub(current_timestamp_ms());
            tokio::time::sleep_until(Instant::now() + Duration::from_millis(wait)).await;
        }
        None => future::pending::<()>().await,
    }
}

/// Periodic event source. The first tick is skipped so that timers start one
/// period after launch.
fn spawn_ticker(tx: mpsc::Sender<Event>, period: Duration, event: Event) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;
        loop {
            interval.tick().await;
            if tx.send(event.clone()).await.is_err() {
                break;
            }
        }
    })
}

fn spawn_stdin_reader(tx: mpsc::Sender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let event = match lines.next_line().await {
                Ok(Some(line)) => Event::Input(line),
                Ok(None) => Event::InputClosed,
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    Event::InputClosed
                }
            };
            let closed = event == Event::InputClosed;
            if tx.send(event).await.is_err() || closed {
                break;
            }
        }
    })
}
