//! Static datasets served at the aggregator boundary when a query would otherwise be empty.

use crate::shared_types::{Alert, AlertKind, Opportunity, PriceQuote, RiskLevel, Trend};
use crate::trend_engine::fallback_news_trends;

fn opportunity(
    id: &str,
    title: &str,
    category: &str,
    score: u8,
    potential: &str,
    risk: RiskLevel,
    timing: &str,
    description: &str,
    tags: &[&str],
) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        score,
        potential: potential.to_string(),
        risk,
        timing: timing.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        url: None,
    }
}

pub fn opportunities() -> Vec<Opportunity> {
    vec![
        opportunity(
            "fallback-1",
            "Bitcoin Price Divergence",
            "Crypto Arbitrage",
            92,
            "+$2,400",
            RiskLevel::Medium,
            "Now",
            "BTC showing 4% price gap between exchanges",
            &["arbitrage", "crypto", "immediate"],
        ),
        opportunity(
            "fallback-2",
            "Polymarket: Trump Election Odds",
            "Prediction Market",
            88,
            "+15% ROI",
            RiskLevel::Low,
            "2 hours",
            "Market inefficiency detected in election probability",
            &["polymarket", "politics", "trending"],
        ),
        opportunity(
            "fallback-3",
            "Ethereum DeFi Volume Surge",
            "DeFi",
            85,
            "+$1,800",
            RiskLevel::Medium,
            "Now",
            "DeFi protocols showing 25% volume increase",
            &["defi", "ethereum", "trending"],
        ),
    ]
}

pub fn market_data() -> Vec<PriceQuote> {
    vec![
        PriceQuote::new("BTC", "Bitcoin", 43250.0, 2.4),
        PriceQuote::new("ETH", "Ethereum", 2890.0, 3.1),
        PriceQuote::new("SOL", "Solana", 98.40, -1.2),
        PriceQuote::new("NVDA", "NVIDIA", 620.0, 1.8),
        PriceQuote::new("USDC", "USD Coin", 1.00, 0.0),
    ]
}

pub fn trends() -> Vec<Trend> {
    fallback_news_trends()
}

pub fn alerts() -> Vec<Alert> {
    vec![
        Alert::new("BTC hit $44,000 resistance", "2m ago", AlertKind::Alert),
        Alert::new("New polymarket created", "15m ago", AlertKind::Info),
        Alert::new("Solana volume +200%", "1h ago", AlertKind::Success),
    ]
}
