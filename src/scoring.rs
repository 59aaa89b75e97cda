//! Sentiment heuristics behind a replaceable policy.
//!
//! The aggregation and merge code only talks to [`ScoringPolicy`]; the
//! keyword-counting rules below are the default implementation.

use crate::shared_types::{ArticleSentiment, TrendSentiment};

pub trait ScoringPolicy: Send + Sync {
    /// Coarse label for a news article's title and description.
    fn article_sentiment(&self, text: &str) -> ArticleSentiment;

    /// Signed vote (+1, 0, -1) of a social post.
    fn post_polarity(&self, text: &str) -> i32;

    /// Trend label from the sentiments of the articles mentioning a topic.
    fn news_trend_sentiment(&self, sentiments: &[ArticleSentiment]) -> TrendSentiment;

    /// Trend label from the average polarity per mention of a social topic.
    fn social_trend_sentiment(&self, average_polarity: f64) -> TrendSentiment;
}

const NEWS_POSITIVE: &[&str] = &[
    "surge", "rally", "gain", "bullish", "growth", "rise", "soar", "breakthrough", "success",
    "profit",
];

const NEWS_NEGATIVE: &[&str] = &[
    "crash", "fall", "bearish", "decline", "drop", "loss", "risk", "fear", "concern", "warn",
];

const SOCIAL_POSITIVE: &[&str] = &[
    "moon", "pump", "bullish", "buy", "hold", "hodl", "rocket", "gain", "profit", "surge",
    "rally", "breakout", "upgrade", "adoption", "growth", "win", "amazing", "great", "excellent",
    "strong",
];

const SOCIAL_NEGATIVE: &[&str] = &[
    "dump", "bearish", "sell", "crash", "collapse", "scam", "loss", "fall", "drop", "decline",
    "fear", "panic", "concern", "risk", "bad", "terrible", "weak", "avoid", "warning",
];

/// Counts how many words of `words` occur in `text` as substrings.
fn count_hits(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPolicy;

impl ScoringPolicy for KeywordPolicy {
    fn article_sentiment(&self, text: &str) -> ArticleSentiment {
        let lower = text.to_lowercase();
        let positive = count_hits(&lower, NEWS_POSITIVE);
        let negative = count_hits(&lower, NEWS_NEGATIVE);
        if positive > negative {
            ArticleSentiment::Positive
        } else if negative > positive {
            ArticleSentiment::Negative
        } else {
            ArticleSentiment::Neutral
        }
    }

    fn post_polarity(&self, text: &str) -> i32 {
        let lower = text.to_lowercase();
        let positive = count_hits(&lower, SOCIAL_POSITIVE);
        let negative = count_hits(&lower, SOCIAL_NEGATIVE);
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
        }
    }

    // Checked in this order; the 80% branches are shadowed by the 60% ones.
    fn news_trend_sentiment(&self, sentiments: &[ArticleSentiment]) -> TrendSentiment {
        if sentiments.is_empty() {
            return TrendSentiment::Neutral;
        }
        let total = sentiments.len() as f64;
        let positive = sentiments.iter().filter(|s| **s == ArticleSentiment::Positive).count();
        let negative = sentiments.iter().filter(|s| **s == ArticleSentiment::Negative).count();

        if positive as f64 > total * 0.6 {
            return TrendSentiment::Bullish;
        }
        if positive as f64 > total * 0.8 {
            return TrendSentiment::VeryBullish;
        }
        if negative as f64 > total * 0.6 {
            return TrendSentiment::Bearish;
        }
        if negative as f64 > total * 0.8 {
            return TrendSentiment::Negative;
        }
        if positive > negative {
            return TrendSentiment::Positive;
        }
        TrendSentiment::Neutral
    }

    fn social_trend_sentiment(&self, average_polarity: f64) -> TrendSentiment {
        if average_polarity > 0.4 {
            TrendSentiment::VeryBullish
        } else if average_polarity > 0.2 {
            TrendSentiment::Bullish
        } else if average_polarity > 0.0 {
            TrendSentiment::Positive
        } else if average_polarity < -0.4 {
            TrendSentiment::Bearish
        } else if average_polarity < -0.2 {
            TrendSentiment::Negative
        } else {
            TrendSentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::shared_types::ArticleSentiment::{Negative as Neg, Neutral as Neu, Positive as Pos};

    #[rstest]
    #[case("Bitcoin Surges Past Key Resistance Level", Pos)]
    #[case("Markets crash as fear spreads", Neg)]
    #[case("Rally fades on regulation concern", Neu)]
    #[case("Quiet day for exchanges", Neu)]
    fn test_article_sentiment(#[case] text: &str, #[case] expected: ArticleSentiment) {
        assert_eq!(KeywordPolicy.article_sentiment(text), expected);
    }

    #[rstest]
    #[case("btc to the moon, hodl", 1)]
    #[case("sell now before the dump", -1)]
    #[case("buy or sell?", 0)]
    fn test_post_polarity(#[case] text: &str, #[case] expected: i32) {
        assert_eq!(KeywordPolicy.post_polarity(text), expected);
    }

    #[rstest]
    #[case(&[Pos, Pos, Pos, Pos, Pos], TrendSentiment::Bullish)]
    #[case(&[Pos, Pos, Neu], TrendSentiment::Bullish)]
    #[case(&[Neg, Neg, Neg], TrendSentiment::Bearish)]
    #[case(&[Pos, Neu, Neg, Pos], TrendSentiment::Positive)]
    #[case(&[Pos, Neg], TrendSentiment::Neutral)]
    #[case(&[Pos, Pos, Neg, Neu, Neu], TrendSentiment::Positive)]
    fn test_news_trend_sentiment(#[case] input: &[ArticleSentiment], #[case] expected: TrendSentiment) {
        assert_eq!(KeywordPolicy.news_trend_sentiment(input), expected);
    }

    #[test]
    fn test_news_trend_sentiment_without_articles() {
        assert_eq!(KeywordPolicy.news_trend_sentiment(&[]), TrendSentiment::Neutral);
    }

    #[rstest]
    #[case(0.6, TrendSentiment::VeryBullish)]
    #[case(0.3, TrendSentiment::Bullish)]
    #[case(0.2, TrendSentiment::Positive)]
    #[case(0.0, TrendSentiment::Neutral)]
    #[case(-0.2, TrendSentiment::Neutral)]
    #[case(-0.3, TrendSentiment::Negative)]
    #[case(-0.5, TrendSentiment::Bearish)]
    fn test_social_trend_sentiment(#[case] avg: f64, #[case] expected: TrendSentiment) {
        assert_eq!(KeywordPolicy.social_trend_sentiment(avg), expected);
    }
}
