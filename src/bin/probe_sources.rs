use signal_dashboard::aggregator::Aggregator;
use signal_dashboard::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();
    let aggregator = Aggregator::from_config(&config)?;

    println!("Probing sources...");
    let mut failures = 0;
    for (name, result) in aggregator.probe_sources().await {
        match result {
            Ok(count) => println!("✅ {}: {} items", name, count),
            Err(e) if e.is_soft_disable() => println!("⏸️  {}: disabled ({})", name, e),
            Err(e) => {
                failures += 1;
                println!("❌ {}: {}", name, e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} source(s) unreachable", failures).into());
    }
    Ok(())
}
