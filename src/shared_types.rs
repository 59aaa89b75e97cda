use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change24h: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume24h: Option<f64>,
}

impl PriceQuote {
    pub fn new(symbol: &str, name: &str, price: f64, change24h: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change24h,
            market_cap: None,
            volume24h: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub category: String,
    pub score: u8, // always within 0..=100
    pub potential: String,
    pub risk: RiskLevel,
    pub timing: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrendSentiment {
    Positive,
    Neutral,
    Bullish,
    #[serde(rename = "Very Bullish")]
    VeryBullish,
    Bearish,
    Negative,
    Speculative,
}

impl fmt::Display for TrendSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendSentiment::Positive => "Positive",
            TrendSentiment::Neutral => "Neutral",
            TrendSentiment::Bullish => "Bullish",
            TrendSentiment::VeryBullish => "Very Bullish",
            TrendSentiment::Bearish => "Bearish",
            TrendSentiment::Negative => "Negative",
            TrendSentiment::Speculative => "Speculative",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub topic: String,
    pub growth: u32,
    pub source: String,
    pub sentiment: TrendSentiment,
}

impl Trend {
    pub fn new(topic: &str, growth: u32, source: &str, sentiment: TrendSentiment) -> Self {
        Self {
            topic: topic.to_string(),
            growth,
            source: source.to_string(),
            sentiment,
        }
    }

    /// Social-origin trends come from the Reddit scan (or the generic "Social" label).
    pub fn is_social(&self) -> bool {
        self.source == "Reddit" || self.source == "Social"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Alert,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub message: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(message: impl Into<String>, time: &str, kind: AlertKind) -> Self {
        Self {
            message: message.into(),
            time: time.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub sentiment: ArticleSentiment,
}

impl NewsArticle {
    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    /// Text scanned by keyword extraction and sentiment scoring.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// A binary prediction market with token prices expressed as probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMarket {
    pub id: String,
    pub question: String,
    pub yes_price: Decimal,
    pub no_price: Decimal,
    pub volume: Decimal,
    pub liquidity: Decimal,
    pub end_date: Option<DateTime<Utc>>,
    pub slug: Option<String>,
}

/// Accumulated mentions of one topic across a social scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMention {
    pub topic: String,
    pub score: i32,
    pub mentions: u32,
}

impl TopicMention {
    pub fn average_polarity(&self) -> f64 {
        if self.mentions == 0 {
            return 0.0;
        }
        self.score as f64 / self.mentions as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub opportunities: Vec<Opportunity>,
    pub market_data: Vec<PriceQuote>,
    pub trends: Vec<Trend>,
    pub alerts: Vec<Alert>,
}
