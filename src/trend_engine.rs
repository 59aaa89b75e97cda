use crate::normalization::capitalize_words;
use crate::scoring::ScoringPolicy;
use crate::shared_types::{ArticleSentiment, NewsArticle, TopicMention, Trend, TrendSentiment};
use crate::topic_classifier::TopicClassifier;
use std::collections::HashMap;

const NEWS_TOP_TOPICS: usize = 6;
const SOCIAL_RANKED_TOPICS: usize = 8;
const SOCIAL_KEPT_TOPICS: usize = 5;
const MIN_GROWTH: u32 = 100;

/// `max(100, base - index * 50)`.
fn rank_growth(base: u32, index: usize) -> u32 {
    let step = (index as u32).saturating_mul(50);
    base.saturating_sub(step).max(MIN_GROWTH)
}

pub fn fallback_news_trends() -> Vec<Trend> {
    vec![
        Trend::new("AI Regulation", 340, "News", TrendSentiment::Positive),
        Trend::new("Quantum Computing", 280, "Social", TrendSentiment::Neutral),
        Trend::new("Polymarket", 520, "Markets", TrendSentiment::Bullish),
        Trend::new("Solana DeFi", 410, "Tech", TrendSentiment::VeryBullish),
        Trend::new("Bitcoin ETF", 450, "Markets", TrendSentiment::Bullish),
        Trend::new("Space Mining", 190, "News", TrendSentiment::Speculative),
    ]
}

pub fn fallback_social_trends() -> Vec<Trend> {
    vec![
        Trend::new("Bitcoin", 450, "Reddit", TrendSentiment::Bullish),
        Trend::new("Ethereum", 380, "Reddit", TrendSentiment::VeryBullish),
        Trend::new("Solana", 520, "Reddit", TrendSentiment::Bullish),
        Trend::new("Polymarket", 290, "Reddit", TrendSentiment::Positive),
        Trend::new("DeFi", 340, "Reddit", TrendSentiment::Neutral),
    ]
}

/// Ranks vocabulary terms by how many articles mention them.
pub fn news_trends(articles: &[NewsArticle], policy: &dyn ScoringPolicy) -> Vec<Trend> {
    let mut topics: Vec<(&'static str, Vec<ArticleSentiment>)> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();

    for article in articles {
        for keyword in TopicClassifier::news_keywords(&article.text()) {
            let slot = *index.entry(keyword).or_insert_with(|| {
                topics.push((keyword, Vec::new()));
                topics.len() - 1
            });
            topics[slot].1.push(article.sentiment);
        }
    }

    // stable: equal counts keep first-seen order
    topics.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let trends: Vec<Trend> = topics
        .iter()
        .take(NEWS_TOP_TOPICS)
        .enumerate()
        .map(|(i, (topic, sentiments))| Trend {
            topic: capitalize_words(topic),
            growth: rank_growth(500, i),
            source: "News".to_string(),
            sentiment: policy.news_trend_sentiment(sentiments),
        })
        .collect();

    if trends.is_empty() {
        return fallback_news_trends();
    }
    trends
}

/// Ranks social topics by mention count.
pub fn social_trends(mentions: &[TopicMention], policy: &dyn ScoringPolicy) -> Vec<Trend> {
    let mut ranked: Vec<&TopicMention> = mentions.iter().filter(|m| m.mentions > 0).collect();
    ranked.sort_by(|a, b| b.mentions.cmp(&a.mentions));

    let trends: Vec<Trend> = ranked
        .into_iter()
        .take(SOCIAL_RANKED_TOPICS)
        .enumerate()
        .map(|(i, mention)| Trend {
            topic: mention.topic.to_uppercase(),
            growth: rank_growth(600, i),
            source: "Reddit".to_string(),
            sentiment: policy.social_trend_sentiment(mention.average_polarity()),
        })
        .collect();

    if trends.is_empty() {
        return fallback_social_trends();
    }
    trends.into_iter().take(SOCIAL_KEPT_TOPICS).collect()
}

/// Collapses trends sharing a case-insensitive topic, keeping first-seen order.
pub fn merge_trends(trends: impl IntoIterator<Item = Trend>) -> Vec<Trend> {
    let mut merged: Vec<Trend> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for trend in trends {
        let key = trend.topic.to_lowercase();
        match index.get(&key) {
            Some(&slot) => {
                let existing = &mut merged[slot];
                existing.growth = existing.growth.max(trend.growth);
                if (trend.is_social() || existing.is_social()) && !existing.source.contains("Reddit") {
                    existing.source.push_str("/Reddit");
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(trend);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::KeywordPolicy;

    fn article(title: &str, sentiment: ArticleSentiment) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: String::new(),
            url: "#".to_string(),
            source: "Wire".to_string(),
            published_at: "2026-10-19T00:00:00Z".to_string(),
            sentiment,
        }
    }

    fn mention(topic: &str, score: i32, mentions: u32) -> TopicMention {
        TopicMention {
            topic: topic.to_string(),
            score,
            mentions,
        }
    }

    #[test]
    fn test_news_ranking_by_article_count() {
        let articles = vec![
            article("Bitcoin holds firm", ArticleSentiment::Positive),
            article("Bitcoin whales accumulate", ArticleSentiment::Positive),
            article("Bitcoin hashrate record", ArticleSentiment::Neutral),
            article("Ethereum devs ship upgrade", ArticleSentiment::Positive),
        ];
        let trends = news_trends(&articles, &KeywordPolicy);
        assert_eq!(trends[0].topic, "Bitcoin");
        assert_eq!(trends[0].growth, 500);
        assert_eq!(trends[0].sentiment, TrendSentiment::Bullish);
        assert_eq!(trends[1].topic, "Ethereum");
        assert_eq!(trends[1].growth, 450);
        assert!(trends.iter().all(|t| t.source == "News"));
    }

    #[test]
    fn test_news_top_six_and_growth_floor() {
        let articles = vec![article(
            "Bitcoin Ethereum Solana DeFi NFT Polymarket Blockchain Regulation",
            ArticleSentiment::Neutral,
        )];
        let trends = news_trends(&articles, &KeywordPolicy);
        assert_eq!(trends.len(), 6);
        assert_eq!(
            trends.iter().map(|t| t.growth).collect::<Vec<_>>(),
            vec![500, 450, 400, 350, 300, 250]
        );
    }

    #[test]
    fn test_news_without_keywords_falls_back() {
        let articles = vec![article("Weather update", ArticleSentiment::Neutral)];
        assert_eq!(news_trends(&articles, &KeywordPolicy), fallback_news_trends());
    }

    #[test]
    fn test_social_very_bullish_example() {
        let trends = social_trends(&[mention("Bitcoin", 3, 5)], &KeywordPolicy);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].topic, "BITCOIN");
        assert_eq!(trends[0].growth, 600);
        assert_eq!(trends[0].sentiment, TrendSentiment::VeryBullish);
        assert_eq!(trends[0].source, "Reddit");
    }

    #[test]
    fn test_social_ranking_keeps_five() {
        let mentions: Vec<TopicMention> = (1..=9)
            .map(|n| mention(&format!("T{}", n), 0, n))
            .collect();
        let trends = social_trends(&mentions, &KeywordPolicy);
        assert_eq!(trends.len(), 5);
        assert_eq!(trends[0].topic, "T9");
        assert_eq!(
            trends.iter().map(|t| t.growth).collect::<Vec<_>>(),
            vec![600, 550, 500, 450, 400]
        );
    }

    #[test]
    fn test_social_empty_falls_back() {
        assert_eq!(social_trends(&[], &KeywordPolicy), fallback_social_trends());
    }

    #[test]
    fn test_rank_growth_floor() {
        assert_eq!(rank_growth(500, 7), 150);
        assert_eq!(rank_growth(500, 8), 100);
        assert_eq!(rank_growth(500, 20), 100);
    }

    #[test]
    fn test_merge_case_insensitive_with_reddit_suffix() {
        let merged = merge_trends(vec![
            Trend::new("Bitcoin", 500, "News", TrendSentiment::Bullish),
            Trend::new("Ethereum", 450, "News", TrendSentiment::Positive),
            Trend::new("BITCOIN", 600, "Reddit", TrendSentiment::VeryBullish),
            Trend::new("bitcoin", 100, "Reddit", TrendSentiment::Neutral),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].topic, "Bitcoin");
        assert_eq!(merged[0].growth, 600);
        assert_eq!(merged[0].source, "News/Reddit");
        assert_eq!(merged[0].sentiment, TrendSentiment::Bullish);
        assert_eq!(merged[1].source, "News");
    }

    #[test]
    fn test_merge_non_social_collision_keeps_source() {
        let merged = merge_trends(vec![
            Trend::new("Polymarket", 520, "Markets", TrendSentiment::Bullish),
            Trend::new("polymarket", 300, "News", TrendSentiment::Neutral),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].growth, 520);
        assert_eq!(merged[0].source, "Markets");
    }

    #[test]
    fn test_merge_social_survivor_stays_single_suffix() {
        let merged = merge_trends(vec![
            Trend::new("Solana", 520, "Reddit", TrendSentiment::Bullish),
            Trend::new("SOLANA", 300, "News", TrendSentiment::Neutral),
        ]);
        assert_eq!(merged[0].source, "Reddit");
    }
}
