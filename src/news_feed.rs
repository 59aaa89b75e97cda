use crate::error::{SourceError, SourceResult};
use crate::feed::{check_status, Source};
use crate::normalization::excerpt;
use crate::scoring::ScoringPolicy;
use crate::shared_types::{ArticleSentiment, NewsArticle};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

const SEARCH_QUERY: &str = "cryptocurrency OR trading OR markets OR blockchain";

#[derive(Deserialize, Debug)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize, Debug)]
struct ApiSource {
    name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    title: String,
    description: Option<String>,
    #[serde(default)]
    url: String,
    source: ApiSource,
    #[serde(default)]
    published_at: String,
    content: Option<String>,
}

/// Parses a GNews search response, labelling each article with `policy`.
pub fn parse_articles(body: &str, policy: &dyn ScoringPolicy) -> SourceResult<Vec<NewsArticle>> {
    let response: GNewsResponse = serde_json::from_str(body)?;
    Ok(response
        .articles
        .into_iter()
        .map(|article| {
            let description = article
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| excerpt(article.content.as_deref().unwrap_or(""), 150));
            let sentiment = policy.article_sentiment(&format!("{} {}", article.title, description));
            NewsArticle {
                title: article.title,
                description,
                url: article.url,
                source: article.source.name,
                published_at: article.published_at,
                sentiment,
            }
        })
        .collect())
}

pub fn fallback_articles() -> Vec<NewsArticle> {
    let published_at = Utc::now().to_rfc3339();
    let article = |title: &str, description: &str, source: &str| NewsArticle {
        title: title.to_string(),
        description: description.to_string(),
        url: "#".to_string(),
        source: source.to_string(),
        published_at: published_at.clone(),
        sentiment: ArticleSentiment::Positive,
    };

    vec![
        article(
            "Bitcoin Surges Past Key Resistance Level",
            "Bitcoin breaks through major resistance as institutional demand increases.",
            "Crypto News",
        ),
        article(
            "Ethereum Layer 2 Solutions See Record Adoption",
            "Layer 2 scaling solutions achieve unprecedented transaction volumes.",
            "Blockchain Daily",
        ),
        article(
            "Polymarket Trading Volume Reaches New Heights",
            "Prediction market platform sees surge in activity amid election speculation.",
            "Market Watch",
        ),
    ]
}

pub struct GNewsClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    policy: Arc<dyn ScoringPolicy>,
}

impl GNewsClient {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        api_key: Option<String>,
        policy: Arc<dyn ScoringPolicy>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            policy,
        }
    }

    fn search_url(&self, api_key: &str) -> SourceResult<Url> {
        let mut url = Url::parse(&format!("{}/search", self.api_base))?;
        url.query_pairs_mut()
            .append_pair("q", SEARCH_QUERY)
            .append_pair("lang", "en")
            .append_pair("max", "10")
            .append_pair("apikey", api_key);
        Ok(url)
    }
}

#[async_trait]
impl Source<NewsArticle> for GNewsClient {
    fn name(&self) -> &'static str {
        "gnews"
    }

    async fn fetch(&self) -> SourceResult<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::Unconfigured("GNEWS_API_KEY".to_string()))?;

        let response = self.http.get(self.search_url(api_key)?).send().await?;
        let body = check_status(response, "GNews")?.text().await?;
        parse_articles(&body, self.policy.as_ref())
    }

    fn fallback(&self) -> Vec<NewsArticle> {
        fallback_articles()
    }
}
