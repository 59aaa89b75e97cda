use signal_dashboard::aggregator::Aggregator;
use signal_dashboard::config::Config;
use signal_dashboard::opportunity_engine::filter_opportunities;
use std::env;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::load();
    let query = env::args().nth(1).unwrap_or_default();
    let aggregator = Aggregator::from_config(&config)?;

    info!(
        refresh_secs = config.refresh_interval.as_secs(),
        query = %query,
        "Signal dashboard starting"
    );

    let mut ticker = interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut snapshot = aggregator.snapshot().await;
                snapshot.opportunities = filter_opportunities(&snapshot.opportunities, &query);

                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!(error = %e, "Failed to serialize snapshot"),
                }

                info!(
                    opportunities = snapshot.opportunities.len(),
                    quotes = snapshot.market_data.len(),
                    trends = snapshot.trends.len(),
                    alerts = snapshot.alerts.len(),
                    top_trend = snapshot.trends.first().map(|t| t.topic.as_str()).unwrap_or("-"),
                    "Refreshed"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
