use crate::error::{SourceError, SourceResult};
use crate::feed::{check_status, Source};
use crate::shared_types::PredictionMarket;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

const MARKETS_QUERY: &str = r#"
  query {
    markets(orderBy: volume24h, orderDirection: desc, first: 20) {
      id
      question
      tokens {
        yes
        no
      }
      volume
      liquidity
      endDate
      slug
    }
  }
"#;

#[derive(Deserialize, Debug)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    errors: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct GraphQlData {
    #[serde(default)]
    markets: Vec<ApiMarket>,
}

#[derive(Deserialize, Debug)]
struct ApiTokens {
    yes: f64,
    no: f64,
}

#[derive(Deserialize, Debug)]
struct ApiMarket {
    id: String,
    question: String,
    tokens: ApiTokens,
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    liquidity: f64,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    slug: Option<String>,
}

fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

/// Parses the GraphQL response. A non-empty `errors` member fails the whole fetch.
pub fn parse_markets(body: &str) -> SourceResult<Vec<PredictionMarket>> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    if let Some(errors) = response.errors.filter(|e| !e.is_null()) {
        return Err(SourceError::payload(format!("GraphQL errors: {}", errors)));
    }

    let mut markets = Vec::new();
    for api_market in response.data.map(|d| d.markets).unwrap_or_default() {
        let (Some(yes_price), Some(no_price)) = (
            Decimal::from_f64(api_market.tokens.yes),
            Decimal::from_f64(api_market.tokens.no),
        ) else {
            tracing::debug!(market = %api_market.id, "Skipping market with non-numeric token prices");
            continue;
        };

        markets.push(PredictionMarket {
            id: api_market.id,
            question: api_market.question,
            yes_price,
            no_price,
            volume: Decimal::from_f64(api_market.volume).unwrap_or_default(),
            liquidity: Decimal::from_f64(api_market.liquidity).unwrap_or_default(),
            end_date: api_market.end_date.as_deref().and_then(parse_end_date),
            slug: api_market.slug.filter(|s| !s.is_empty()),
        });
    }

    Ok(markets)
}

/// Fixed markets whose end dates are relative to `now`.
pub fn fallback_markets(now: DateTime<Utc>) -> Vec<PredictionMarket> {
    let market = |id: &str, question: &str, yes: Decimal, no: Decimal, volume: Decimal, liquidity: Decimal, days: i64| {
        PredictionMarket {
            id: id.to_string(),
            question: question.to_string(),
            yes_price: yes,
            no_price: no,
            volume,
            liquidity,
            end_date: Some(now + Duration::days(days)),
            slug: None,
        }
    };

    vec![
        market(
            "fallback-1",
            "Will Bitcoin exceed $100,000 by end of 2025?",
            dec!(0.35),
            dec!(0.68),
            dec!(2500000),
            dec!(500000),
            90,
        ),
        market(
            "fallback-2",
            "Will Ethereum flip Bitcoin market cap by 2026?",
            dec!(0.12),
            dec!(0.91),
            dec!(850000),
            dec!(150000),
            180,
        ),
        market(
            "fallback-3",
            "Will Solana reach $200 in 2025?",
            dec!(0.42),
            dec!(0.61),
            dec!(1200000),
            dec!(300000),
            60,
        ),
    ]
}

pub struct PolymarketClient {
    http: reqwest::Client,
    graphql_url: String,
}

impl PolymarketClient {
    pub fn new(http: reqwest::Client, graphql_url: &str) -> Self {
        Self {
            http,
            graphql_url: graphql_url.to_string(),
        }
    }
}

#[async_trait]
impl Source<PredictionMarket> for PolymarketClient {
    fn name(&self) -> &'static str {
        "polymarket"
    }

    async fn fetch(&self) -> SourceResult<Vec<PredictionMarket>> {
        let response = self
            .http
            .post(&self.graphql_url)
            .json(&serde_json::json!({ "query": MARKETS_QUERY }))
            .send()
            .await?;
        let body = check_status(response, "Polymarket")?.text().await?;
        parse_markets(&body)
    }

    fn fallback(&self) -> Vec<PredictionMarket> {
        fallback_markets(Utc::now())
    }
}
