use crate::error::{SourceError, SourceResult};
use crate::feed::{check_status, Source};
use crate::scoring::ScoringPolicy;
use crate::shared_types::TopicMention;
use crate::topic_classifier::TopicClassifier;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

pub const SUBREDDITS: &[&str] = &[
    "cryptocurrency",
    "bitcoin",
    "ethereum",
    "solana",
    "polymarket",
    "defi",
    "wallstreetbets",
    "stocks",
    "options",
];

#[derive(Deserialize, Debug)]
struct Listing {
    data: Option<ListingData>,
}

#[derive(Deserialize, Debug)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Deserialize, Debug)]
struct Child {
    data: Option<Post>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
}

pub fn parse_listing(body: &str) -> SourceResult<Vec<Post>> {
    let listing: Listing = serde_json::from_str(body)?;
    Ok(listing
        .data
        .map(|d| d.children.into_iter().filter_map(|c| c.data).collect())
        .unwrap_or_default())
}

/// Tallies mentions and polarity per topic, in first-seen order.
pub fn accumulate_mentions(posts: &[Post], policy: &dyn ScoringPolicy) -> Vec<TopicMention> {
    let mut tallies: Vec<TopicMention> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();

    for post in posts {
        let combined = format!("{} {}", post.title, post.selftext).to_lowercase();
        let topics = TopicClassifier::social_mentions(&combined);
        if topics.is_empty() {
            continue;
        }
        let polarity = policy.post_polarity(&combined);

        for topic in topics {
            let slot = *index.entry(topic).or_insert_with(|| {
                tallies.push(TopicMention {
                    topic: topic.to_string(),
                    score: 0,
                    mentions: 0,
                });
                tallies.len() - 1
            });
            tallies[slot].mentions += 1;
            tallies[slot].score += polarity;
        }
    }

    tallies
}

pub struct RedditClient {
    http: reqwest::Client,
    api_base: String,
    policy: Arc<dyn ScoringPolicy>,
}

impl RedditClient {
    pub fn new(http: reqwest::Client, api_base: &str, policy: Arc<dyn ScoringPolicy>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            policy,
        }
    }

    async fn hot_posts(&self, subreddit: &str) -> SourceResult<Vec<Post>> {
        let url = format!("{}/r/{}/hot.json?limit=25", self.api_base, subreddit);
        let response = self.http.get(&url).send().await?;
        let body = check_status(response, &format!("Reddit r/{}", subreddit))?
            .text()
            .await?;
        parse_listing(&body)
    }
}

#[async_trait]
impl Source<TopicMention> for RedditClient {
    fn name(&self) -> &'static str {
        "reddit"
    }

    async fn fetch(&self) -> SourceResult<Vec<TopicMention>> {
        let results = join_all(SUBREDDITS.iter().map(|sub| self.hot_posts(sub))).await;

        let mut posts = Vec::new();
        let mut failed = 0;
        for (sub, result) in SUBREDDITS.iter().zip(results) {
            match result {
                Ok(batch) => posts.extend(batch),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(subreddit = %sub, error = %e, "Skipping community");
                }
            }
        }

        if failed == SUBREDDITS.len() {
            return Err(SourceError::payload("every community listing failed"));
        }
        tracing::debug!(posts = posts.len(), failed, "Scanned community listings");

        Ok(accumulate_mentions(&posts, self.policy.as_ref()))
    }

    /// No mentions; the social trend producer substitutes its own static trends.
    fn fallback(&self) -> Vec<TopicMention> {
        Vec::new()
    }
}
