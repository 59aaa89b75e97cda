use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketTopic {
    Politics,
    Crypto,
    Eth,
    Sports,
    Economics,
    Geopolitics,
    Trending,
}

impl MarketTopic {
    pub fn tag(&self) -> &'static str {
        match self {
            MarketTopic::Politics => "politics",
            MarketTopic::Crypto => "crypto",
            MarketTopic::Eth => "eth",
            MarketTopic::Sports => "sports",
            MarketTopic::Economics => "economics",
            MarketTopic::Geopolitics => "geopolitics",
            MarketTopic::Trending => "trending",
        }
    }
}

/// Checked in order; the first group with a keyword in the question wins.
const MARKET_TOPIC_GROUPS: &[(MarketTopic, &[&str])] = &[
    (MarketTopic::Politics, &["trump", "election", "president"]),
    (MarketTopic::Crypto, &["bitcoin", "btc", "crypto"]),
    (MarketTopic::Eth, &["ethereum", "eth"]),
    (MarketTopic::Sports, &["sport", "game", "win"]),
    (MarketTopic::Economics, &["economy", "inflation", "fed"]),
    (MarketTopic::Geopolitics, &["war", "conflict"]),
];

/// Vocabulary scanned in news text, in ranking tie-break order.
pub const NEWS_TERMS: &[&str] = &[
    "Bitcoin", "BTC", "Ethereum", "ETH", "Solana", "SOL",
    "DeFi", "NFT", "AI", "Polymarket", "Crypto", "Blockchain",
    "Trading", "Market", "Volatility", "Regulation", "Adoption",
    "Innovation", "Technology", "Quantum", "Space", "Mining",
];

lazy_static! {
    static ref SOCIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\bbtc\b|\bbitcoin\b").unwrap(), "Bitcoin"),
        (Regex::new(r"(?i)\beth\b|\bethereum\b").unwrap(), "Ethereum"),
        (Regex::new(r"(?i)\bsol\b|\bsolana\b").unwrap(), "Solana"),
        (Regex::new(r"(?i)\bbnb\b|\bbinance\b").unwrap(), "BNB"),
        (Regex::new(r"(?i)\bada\b|\bcardano\b").unwrap(), "Cardano"),
        (Regex::new(r"(?i)\bxrp\b|\bripple\b").unwrap(), "XRP"),
        (Regex::new(r"(?i)\bdot\b|\bpolkadot\b").unwrap(), "Polkadot"),
        (Regex::new(r"(?i)\bdoge\b|\bdogecoin\b").unwrap(), "Dogecoin"),
        (Regex::new(r"(?i)\bdefi\b").unwrap(), "DeFi"),
        (Regex::new(r"(?i)\bnft\b").unwrap(), "NFT"),
        (Regex::new(r"(?i)\bpolymarket\b").unwrap(), "Polymarket"),
    ];
}

pub struct TopicClassifier;

impl TopicClassifier {
    pub fn classify_question(question: &str) -> MarketTopic {
        let q = question.to_lowercase();
        MARKET_TOPIC_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| q.contains(k)))
            .map(|(topic, _)| *topic)
            .unwrap_or(MarketTopic::Trending)
    }

    /// Vocabulary terms present in `text` (case-insensitive substring), each at most once.
    pub fn news_keywords(text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        NEWS_TERMS
            .iter()
            .copied()
            .filter(|term| lower.contains(&term.to_lowercase()))
            .collect()
    }

    /// Topics mentioned in a social post, each at most once.
    pub fn social_mentions(text: &str) -> Vec<&'static str> {
        SOCIAL_PATTERNS
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Will Trump win the 2028 election?", MarketTopic::Politics)]
    #[case("Will Bitcoin exceed $100,000 by end of 2025?", MarketTopic::Crypto)]
    #[case("Will Ethereum flip Bitcoin market cap by 2026?", MarketTopic::Crypto)]
    #[case("ETH above 5k in June?", MarketTopic::Eth)]
    #[case("Who will win the Super Bowl?", MarketTopic::Sports)]
    #[case("Will the Fed cut rates?", MarketTopic::Economics)]
    #[case("Ceasefire in the conflict by March?", MarketTopic::Geopolitics)]
    #[case("Will it snow in Miami?", MarketTopic::Trending)]
    fn test_classify_question(#[case] question: &str, #[case] expected: MarketTopic) {
        assert_eq!(TopicClassifier::classify_question(question), expected);
    }

    #[test]
    fn test_news_keywords_case_insensitive_and_unique() {
        let found = TopicClassifier::news_keywords("bitcoin and BITCOIN rally as DeFi grows");
        assert_eq!(found, vec!["Bitcoin", "DeFi"]);
    }

    #[test]
    fn test_news_keywords_substring_matches() {
        // "ethereum" contains "eth", both terms count.
        let found = TopicClassifier::news_keywords("Ethereum upgrade");
        assert_eq!(found, vec!["Ethereum", "ETH"]);
    }

    #[test]
    fn test_social_mentions_word_boundaries() {
        let found = TopicClassifier::social_mentions("btc to the moon, sol too. dotcom bubble?");
        assert_eq!(found, vec!["Bitcoin", "Solana"]);
        assert_eq!(TopicClassifier::social_mentions("eth gas fees"), vec!["Ethereum"]);
        assert!(TopicClassifier::social_mentions("nothing here").is_empty());
    }
}
