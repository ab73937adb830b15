//! palmcheck: backend server and terminal tools for PalmCheck.
//!
//! Usage:
//!   palmcheck serve    [--bind 0.0.0.0:5000] [--db palmcheck.db] [--config palmcheck.json]
//!   palmcheck watch    [--view dashboard|yield|recap] [--url URL] [--interval-ms N]
//!                      [--date YYYY-MM-DD] [--params params.json]
//!   palmcheck feed     [--url URL] [--seed 42] [--count 20] [--interval-ms 500] [--device ID]
//!   palmcheck estimate [--url URL] [--params params.json]
//!
//! Every subcommand accepts --config FILE; flags override file values.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use palmcheck_core::{
    api,
    client::PalmClient,
    config::{load_params, AppConfig},
    estimate::EstimationParams,
    ingest::IngestionService,
    poller::Subscription,
    simulator::DeviceSimulator,
    store,
    views::{DashboardView, RecapView, ViewKind, YieldView},
};
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("serve");
    let config = AppConfig::load_or_default(find_arg(&args, "--config"))?;

    match command {
        "serve" => run_server(config, &args).await,
        "watch" => run_watch(config, &args).await,
        "feed" => run_feed(config, &args).await,
        "estimate" => run_estimate(config, &args).await,
        other => Err(anyhow!(
            "Unknown command '{other}' (expected serve, watch, feed or estimate)"
        )),
    }
}

async fn run_server(mut config: AppConfig, args: &[String]) -> Result<()> {
    if let Some(bind) = find_arg(args, "--bind") {
        config.bind_address = bind.to_string();
    }
    if let Some(db) = find_arg(args, "--db") {
        config.database = Some(db.to_string());
    }

    let store = store::open(config.database.as_deref())?;
    let ingestion = IngestionService::new(store)?
        .with_default_device_id(config.default_device_id.clone());

    api::serve(&config, Arc::new(ingestion)).await?;
    Ok(())
}

async fn run_watch(config: AppConfig, args: &[String]) -> Result<()> {
    let view_name = find_arg(args, "--view").unwrap_or("dashboard");
    let view = ViewKind::parse(view_name)
        .ok_or_else(|| anyhow!("Unknown view '{view_name}' (expected dashboard, yield or recap)"))?;

    let interval = match find_arg(args, "--interval-ms") {
        Some(ms) => Duration::from_millis(ms.parse()?),
        None => view.poll_interval(&config),
    };
    let params = params_from_args(&config, args)?;
    let date = match find_arg(args, "--date") {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };

    let client = PalmClient::new(server_url(&config, args))?;
    log::info!("Watching {} every {interval:?}", client.base_url());
    let mut subscription = Subscription::start(client, interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = subscription.changed() => {
                if !changed {
                    break;
                }
                let snapshot = subscription.latest();
                let observations = snapshot.observations.as_slice();

                // Clear the terminal and redraw from the top.
                print!("\x1B[2J\x1B[H");
                match view {
                    ViewKind::Dashboard => print!("{}", DashboardView::build(observations)),
                    ViewKind::Yield => print!("{}", YieldView::build(observations, &params)),
                    ViewKind::Recap => print!("{}", RecapView::build(observations, date)),
                }
                if let Some(at) = snapshot.fetched_at {
                    println!();
                    println!("  last updated: {}", at.format("%H:%M:%S"));
                }
            }
        }
    }

    subscription.stop().await;
    Ok(())
}

async fn run_feed(config: AppConfig, args: &[String]) -> Result<()> {
    let seed = parse_arg(args, "--seed", 42u64);
    let count = parse_arg(args, "--count", 20usize);
    let interval = Duration::from_millis(parse_arg(args, "--interval-ms", 500u64));

    let mut sim_config = config.simulator.clone();
    if let Some(device) = find_arg(args, "--device") {
        sim_config.device_id = Some(device.to_string());
    }

    let client = PalmClient::new(server_url(&config, args))?;
    let simulator = DeviceSimulator::new(seed, sim_config);

    println!("PalmCheck device simulator");
    println!("  server:    {}", client.base_url());
    println!("  seed:      {seed}");
    println!("  readings:  {count}");
    println!();

    let mut stored = 0usize;
    for input in simulator.take(count) {
        match client.post_observation(&input).await {
            Ok(obs) => {
                stored += 1;
                println!("  #{} {:<8} ({:.5}, {:.5})", obs.id, obs.status, obs.lat, obs.lng);
            }
            Err(e) => log::warn!("Post failed: {e}"),
        }
        tokio::time::sleep(interval).await;
    }

    println!();
    println!("  stored {stored}/{count} readings");
    Ok(())
}

async fn run_estimate(config: AppConfig, args: &[String]) -> Result<()> {
    let params = params_from_args(&config, args)?;
    let client = PalmClient::new(server_url(&config, args))?;
    let observations = client.list_observations().await?;
    print!("{}", YieldView::build(&observations, &params));
    Ok(())
}

fn params_from_args(config: &AppConfig, args: &[String]) -> Result<EstimationParams> {
    match find_arg(args, "--params") {
        Some(path) => load_params(path),
        None => Ok(config.params.clone()),
    }
}

fn server_url(config: &AppConfig, args: &[String]) -> String {
    find_arg(args, "--url")
        .map(str::to_string)
        .unwrap_or_else(|| config.server_url.clone())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
