use crate::error::{SourceError, SourceResult};
use crate::feed::{check_status, Source};
use crate::shared_types::PriceQuote;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// CoinGecko ids requested on every fetch.
pub const COINS: &[&str] = &[
    "bitcoin", "ethereum", "solana", "binancecoin", "cardano", "ripple", "polkadot", "dogecoin",
];

const SYMBOL_MAP: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("binancecoin", "BNB"),
    ("cardano", "ADA"),
    ("ripple", "XRP"),
    ("polkadot", "DOT"),
    ("dogecoin", "DOGE"),
];

#[derive(Deserialize, Debug)]
struct ApiCoin {
    id: String,
    symbol: String,
    name: String,
    current_price: f64,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

pub fn display_symbol(id: &str, provider_symbol: &str) -> String {
    SYMBOL_MAP
        .iter()
        .find(|(coin, _)| *coin == id)
        .map(|(_, symbol)| symbol.to_string())
        .unwrap_or_else(|| provider_symbol.to_uppercase())
}

/// Parses a `/coins/markets` response body.
pub fn parse_quotes(body: &str) -> SourceResult<Vec<PriceQuote>> {
    let coins: Vec<ApiCoin> = serde_json::from_str(body)?;
    Ok(coins
        .into_iter()
        .map(|coin| PriceQuote {
            symbol: display_symbol(&coin.id, &coin.symbol),
            name: coin.name,
            price: coin.current_price,
            change24h: coin.price_change_percentage_24h.unwrap_or(0.0),
            market_cap: coin.market_cap,
            volume24h: coin.total_volume,
        })
        .collect())
}

pub fn fallback_quotes() -> Vec<PriceQuote> {
    vec![
        PriceQuote::new("BTC", "Bitcoin", 43250.0, 2.4),
        PriceQuote::new("ETH", "Ethereum", 2890.0, 3.1),
        PriceQuote::new("SOL", "Solana", 98.40, -1.2),
        PriceQuote::new("BNB", "Binance Coin", 320.0, 1.5),
        PriceQuote::new("USDC", "USD Coin", 1.00, 0.0),
    ]
}

pub struct CoinGeckoClient {
    http: reqwest::Client,
    api_base: String,
}

impl CoinGeckoClient {
    pub fn new(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn markets_url(&self) -> SourceResult<Url> {
        let mut url = Url::parse(&format!("{}/coins/markets", self.api_base))?;
        url.query_pairs_mut()
            .append_pair("vs_currency", "usd")
            .append_pair("ids", &COINS.join(","))
            .append_pair("order", "market_cap_desc")
            .append_pair("per_page", "20")
            .append_pair("page", "1")
            .append_pair("sparkline", "false")
            .append_pair("price_change_percentage", "24h");
        Ok(url)
    }
}

#[async_trait]
impl Source<PriceQuote> for CoinGeckoClient {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn fetch(&self) -> SourceResult<Vec<PriceQuote>> {
        let response = self.http.get(self.markets_url()?).send().await?;
        let body = check_status(response, "CoinGecko")?.text().await?;
        let quotes = parse_quotes(&body)?;
        if quotes.is_empty() {
            return Err(SourceError::payload("CoinGecko returned no coins"));
        }
        Ok(quotes)
    }

    fn fallback(&self) -> Vec<PriceQuote> {
        fallback_quotes()
    }
}
