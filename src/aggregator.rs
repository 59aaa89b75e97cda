use crate::alerts::derive_alerts;
use crate::cache::ResponseCache;
use crate::config::{CacheTtls, Config};
use crate::error::{Outcome, SourceResult};
use crate::fallback;
use crate::feed::{http_client, Feed, Source};
use crate::market_fetcher::PolymarketClient;
use crate::news_feed::GNewsClient;
use crate::opportunity_engine::{momentum_opportunities, prediction_opportunities};
use crate::price_feed::CoinGeckoClient;
use crate::scoring::{KeywordPolicy, ScoringPolicy};
use crate::shared_types::{
    Alert, DashboardSnapshot, NewsArticle, Opportunity, PredictionMarket, PriceQuote, TopicMention, Trend,
};
use crate::social_feed::RedditClient;
use crate::trend_engine::{merge_trends, news_trends, social_trends};
use chrono::Utc;
use std::sync::Arc;

pub const MAX_OPPORTUNITIES: usize = 12;
pub const MAX_TRENDS: usize = 8;
pub const MAX_ALERTS: usize = 4;

/// The four upstreams an aggregator reads from.
pub struct Sources {
    pub prices: Arc<dyn Source<PriceQuote>>,
    pub markets: Arc<dyn Source<PredictionMarket>>,
    pub news: Arc<dyn Source<NewsArticle>>,
    pub social: Arc<dyn Source<TopicMention>>,
}

impl Sources {
    /// HTTP clients for the public APIs named in `config`.
    pub fn live(config: &Config, policy: Arc<dyn ScoringPolicy>) -> SourceResult<Self> {
        let http = http_client(config)?;
        Ok(Self {
            prices: Arc::new(CoinGeckoClient::new(http.clone(), &config.coingecko_api_base)),
            markets: Arc::new(PolymarketClient::new(http.clone(), &config.polymarket_graphql_url)),
            news: Arc::new(GNewsClient::new(
                http.clone(),
                &config.gnews_api_base,
                config.gnews_api_key.clone(),
                policy.clone(),
            )),
            social: Arc::new(RedditClient::new(http, &config.reddit_api_base, policy)),
        })
    }
}

/// Response caches, one per source. Share a `Caches` between aggregators to share freshness windows.
#[derive(Clone)]
pub struct Caches {
    pub prices: Arc<ResponseCache<Vec<PriceQuote>>>,
    pub markets: Arc<ResponseCache<Vec<PredictionMarket>>>,
    pub news: Arc<ResponseCache<Vec<NewsArticle>>>,
    pub social: Arc<ResponseCache<Vec<TopicMention>>>,
}

impl Caches {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            prices: Arc::new(ResponseCache::new(ttls.prices)),
            markets: Arc::new(ResponseCache::new(ttls.markets)),
            news: Arc::new(ResponseCache::new(ttls.news)),
            social: Arc::new(ResponseCache::new(ttls.social)),
        }
    }
}

/// Stable sort by score, capped. Empty input yields the static set.
pub fn rank_opportunities(mut opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
    if opportunities.is_empty() {
        tracing::warn!("No opportunities derived, serving fallback set");
        return fallback::opportunities();
    }
    opportunities.sort_by(|a, b| b.score.cmp(&a.score));
    opportunities.truncate(MAX_OPPORTUNITIES);
    opportunities
}

/// Merge, stable sort by growth, capped. Empty input yields the static set.
pub fn rank_trends(trends: Vec<Trend>) -> Vec<Trend> {
    let mut merged = merge_trends(trends);
    if merged.is_empty() {
        tracing::warn!("No trends derived, serving fallback set");
        return fallback::trends();
    }
    merged.sort_by(|a, b| b.growth.cmp(&a.growth));
    merged.truncate(MAX_TRENDS);
    merged
}

pub fn finalize_alerts(mut alerts: Vec<Alert>) -> Vec<Alert> {
    if alerts.is_empty() {
        return fallback::alerts();
    }
    alerts.truncate(MAX_ALERTS);
    alerts
}

/// Fan-out/fan-in over the cached feeds. Cloning shares the feeds and their caches.
#[derive(Clone)]
pub struct Aggregator {
    prices: Arc<Feed<PriceQuote>>,
    markets: Arc<Feed<PredictionMarket>>,
    news: Arc<Feed<NewsArticle>>,
    social: Arc<Feed<TopicMention>>,
    policy: Arc<dyn ScoringPolicy>,
}

impl Aggregator {
    pub fn new(sources: Sources, ttls: CacheTtls, policy: Arc<dyn ScoringPolicy>) -> Self {
        Self::with_caches(sources, Caches::new(ttls), policy)
    }

    pub fn with_caches(sources: Sources, caches: Caches, policy: Arc<dyn ScoringPolicy>) -> Self {
        Self {
            prices: Arc::new(Feed::new(sources.prices, caches.prices)),
            markets: Arc::new(Feed::new(sources.markets, caches.markets)),
            news: Arc::new(Feed::new(sources.news, caches.news)),
            social: Arc::new(Feed::new(sources.social, caches.social)),
            policy,
        }
    }

    /// Live sources with the keyword scoring policy.
    pub fn from_config(config: &Config) -> SourceResult<Self> {
        let policy: Arc<dyn ScoringPolicy> = Arc::new(KeywordPolicy);
        let sources = Sources::live(config, policy.clone())?;
        Ok(Self::new(sources, config.cache_ttls, policy))
    }

    pub async fn all_opportunities(&self) -> Vec<Opportunity> {
        let now = Utc::now();
        let prices = self.prices.clone();
        let markets = self.markets.clone();

        let momentum = tokio::spawn(async move { momentum_opportunities(&prices.load().await, now) });
        let prediction = tokio::spawn(async move { prediction_opportunities(&markets.load().await, now) });
        let (momentum, prediction) = tokio::join!(momentum, prediction);

        let mut opportunities = Outcome::from_join(momentum).into_items("momentum");
        opportunities.extend(Outcome::from_join(prediction).into_items("prediction"));
        rank_opportunities(opportunities)
    }

    pub async fn market_data(&self) -> Vec<PriceQuote> {
        let quotes = self.prices.load().await;
        if quotes.is_empty() {
            tracing::warn!("Price feed returned nothing, serving fallback market data");
            return fallback::market_data();
        }
        quotes
    }

    pub async fn trending_topics(&self) -> Vec<Trend> {
        let (news, social) = (self.news.clone(), self.social.clone());
        let (news_policy, social_policy) = (self.policy.clone(), self.policy.clone());

        let from_news = tokio::spawn(async move { news_trends(&news.load().await, news_policy.as_ref()) });
        let from_social =
            tokio::spawn(async move { social_trends(&social.load().await, social_policy.as_ref()) });
        let (from_news, from_social) = tokio::join!(from_news, from_social);

        let mut trends = Outcome::from_join(from_news).into_items("news trends");
        trends.extend(Outcome::from_join(from_social).into_items("social trends"));
        rank_trends(trends)
    }

    pub async fn recent_alerts(&self) -> Vec<Alert> {
        let (opportunities, trends, news) =
            tokio::join!(self.all_opportunities(), self.trending_topics(), self.news.load());
        finalize_alerts(derive_alerts(&opportunities, &trends, &news))
    }

    /// One full aggregation pass; alerts are derived from this pass's own results.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let (opportunities, market_data, trends, news) = tokio::join!(
            self.all_opportunities(),
            self.market_data(),
            self.trending_topics(),
            self.news.load()
        );
        let alerts = finalize_alerts(derive_alerts(&opportunities, &trends, &news));

        DashboardSnapshot {
            opportunities,
            market_data,
            trends,
            alerts,
        }
    }

    /// Forces the next pass to go upstream for every source.
    pub async fn invalidate_caches(&self) {
        tokio::join!(
            self.prices.invalidate(),
            self.markets.invalidate(),
            self.news.invalidate(),
            self.social.invalidate()
        );
    }

    /// Fetches every source once, bypassing caches and fallbacks. Reports item counts.
    pub async fn probe_sources(&self) -> Vec<(&'static str, SourceResult<usize>)> {
        let (prices, markets, news, social) = tokio::join!(
            self.prices.probe(),
            self.markets.probe(),
            self.news.probe(),
            self.social.probe()
        );
        vec![
            (self.prices.name(), prices.map(|items| items.len())),
            (self.markets.name(), markets.map(|items| items.len())),
            (self.news.name(), news.map(|items| items.len())),
            (self.social.name(), social.map(|items| items.len())),
        ]
    }
}
