use crate::normalization::{format_thousands, truncate_with_ellipsis};
use crate::shared_types::{Opportunity, PredictionMarket, PriceQuote, RiskLevel};
use crate::topic_classifier::TopicClassifier;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Prediction-market opportunities emitted per pass.
pub const MAX_PREDICTION_OPPORTUNITIES: usize = 5;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const HOUR_MS: i64 = 60 * 60 * 1000;

fn clamp_score(raw: i64, cap: i64) -> u8 {
    raw.min(cap).clamp(0, 100) as u8
}

enum RiskRule {
    /// Medium, escalating to High when the move exceeds the bound.
    EscalateAbove(f64),
    Always(RiskLevel),
}

/// Per-asset momentum trigger.
struct MomentumRule {
    symbol: &'static str,
    /// Use |change| for the trigger, score and potential.
    absolute: bool,
    threshold: f64,
    base: i64,
    cap: i64,
    potential_multiplier: f64,
    risk: RiskRule,
    title: &'static str,
    blurb: &'static str,
    tags: &'static [&'static str],
}

const MOMENTUM_RULES: &[MomentumRule] = &[
    MomentumRule {
        symbol: "BTC",
        absolute: false,
        threshold: 2.0,
        base: 70,
        cap: 90,
        potential_multiplier: 10.0,
        risk: RiskRule::EscalateAbove(5.0),
        title: "Bitcoin Price Momentum",
        blurb: "BTC showing strong momentum with",
        tags: &["crypto", "momentum", "btc"],
    },
    MomentumRule {
        symbol: "ETH",
        absolute: false,
        threshold: 2.0,
        base: 65,
        cap: 85,
        potential_multiplier: 8.0,
        risk: RiskRule::EscalateAbove(5.0),
        title: "Ethereum Price Action",
        blurb: "ETH gaining traction with",
        tags: &["crypto", "momentum", "eth"],
    },
    MomentumRule {
        symbol: "SOL",
        absolute: true,
        threshold: 3.0,
        base: 60,
        cap: 80,
        potential_multiplier: 12.0,
        risk: RiskRule::Always(RiskLevel::High),
        title: "Solana Volatility Play",
        blurb: "SOL showing high volatility at",
        tags: &["solana", "volatility", "high-risk"],
    },
];

impl MomentumRule {
    fn evaluate(&self, quote: &PriceQuote, id: String) -> Option<Opportunity> {
        let magnitude = if self.absolute { quote.change24h.abs() } else { quote.change24h };
        if !(magnitude > self.threshold) {
            return None;
        }

        let score = clamp_score(self.base + (magnitude * 2.0).floor() as i64, self.cap);
        let risk = match self.risk {
            RiskRule::EscalateAbove(bound) if quote.change24h > bound => RiskLevel::High,
            RiskRule::EscalateAbove(_) => RiskLevel::Medium,
            RiskRule::Always(level) => level,
        };

        Some(Opportunity {
            id,
            title: self.title.to_string(),
            category: "Crypto Trading".to_string(),
            score,
            potential: format!("+{}% potential", (magnitude * self.potential_multiplier).round() as i64),
            risk,
            timing: "Now".to_string(),
            description: format!("{} {:.1}% 24h change", self.blurb, quote.change24h),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            url: None,
        })
    }
}

/// Momentum opportunities for the watched assets present in `quotes`.
pub fn momentum_opportunities(quotes: &[PriceQuote], now: DateTime<Utc>) -> Vec<Opportunity> {
    let stamp = now.timestamp_millis();
    MOMENTUM_RULES
        .iter()
        .enumerate()
        .filter_map(|(i, rule)| {
            let quote = quotes.iter().find(|q| q.symbol == rule.symbol)?;
            rule.evaluate(quote, format!("momentum-{}-{}", stamp, i + 1))
        })
        .collect()
}

/// Risk bucket for a yes/no spread in cents.
pub fn risk_from_spread(spread: Decimal) -> RiskLevel {
    if spread < dec!(5) {
        RiskLevel::Low
    } else if spread > dec!(40) {
        RiskLevel::VeryHigh
    } else if spread > dec!(30) {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

pub fn prediction_score(volume: Decimal) -> u8 {
    let bonus = (volume / dec!(10000)).floor().to_i64().unwrap_or(i64::MAX);
    clamp_score(60i64.saturating_add(bonus), 95)
}

/// Display horizon until a market closes. A missing or unparseable end date reads as "Now".
pub fn time_until(end_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(end) = end_date else {
        return "Now".to_string();
    };
    let diff_ms = (end - now).num_milliseconds();
    let days = diff_ms.div_euclid(DAY_MS);
    let hours = (diff_ms % DAY_MS).div_euclid(HOUR_MS);

    if days > 30 {
        "Ongoing".to_string()
    } else if days > 0 {
        format!("{} days", days)
    } else if hours > 0 {
        format!("{} hours", hours)
    } else {
        "Now".to_string()
    }
}

/// Rounds half away from zero before display; `{:.N}` alone rounds half to even.
fn display_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn prediction_opportunity(market: &PredictionMarket, now: DateTime<Utc>) -> Opportunity {
    let yes_cents = market.yes_price * dec!(100);
    let no_cents = market.no_price * dec!(100);
    let spread = (yes_cents - no_cents).abs();
    let topic = TopicClassifier::classify_question(&market.question);
    let link = market.slug.as_deref().unwrap_or(&market.id);

    Opportunity {
        id: format!("poly-{}", market.id),
        title: truncate_with_ellipsis(&market.question, 60),
        category: "Prediction Market".to_string(),
        score: prediction_score(market.volume),
        potential: format!("Yes: {:.1}¢ / No: {:.1}¢", display_dp(yes_cents, 1), display_dp(no_cents, 1)),
        risk: risk_from_spread(spread),
        timing: time_until(market.end_date, now),
        description: format!(
            "Market with ${} volume. Current odds: Yes {:.0}%",
            format_thousands(market.volume),
            display_dp(yes_cents, 0)
        ),
        tags: vec!["polymarket".to_string(), "prediction".to_string(), topic.tag().to_string()],
        url: Some(format!("https://polymarket.com/event/{}", link)),
    }
}

/// Spread-based opportunities for the first markets in provider order.
pub fn prediction_opportunities(markets: &[PredictionMarket], now: DateTime<Utc>) -> Vec<Opportunity> {
    markets
        .iter()
        .take(MAX_PREDICTION_OPPORTUNITIES)
        .map(|m| prediction_opportunity(m, now))
        .collect()
}

/// Case-insensitive match on title, category or any tag. An empty query keeps everything.
pub fn filter_opportunities(opportunities: &[Opportunity], query: &str) -> Vec<Opportunity> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return opportunities.to_vec();
    }
    opportunities
        .iter()
        .filter(|o| {
            o.title.to_lowercase().contains(&needle)
                || o.category.to_lowercase().contains(&needle)
                || o.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn market(id: &str, question: &str, yes: Decimal, no: Decimal, volume: Decimal) -> PredictionMarket {
        PredictionMarket {
            id: id.to_string(),
            question: question.to_string(),
            yes_price: yes,
            no_price: no,
            volume,
            liquidity: dec!(0),
            end_date: Some(now() + Duration::days(10)),
            slug: None,
        }
    }

    #[test]
    fn test_btc_momentum() {
        let quotes = vec![PriceQuote::new("BTC", "Bitcoin", 64000.0, 3.0)];
        let opps = momentum_opportunities(&quotes, now());
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].score, 76);
        assert_eq!(opps[0].risk, RiskLevel::Medium);
        assert_eq!(opps[0].potential, "+30% potential");
        assert_eq!(opps[0].description, "BTC showing strong momentum with 3.0% 24h change");
    }

    #[rstest]
    #[case("BTC", 2.0, None)]
    #[case("BTC", 6.0, Some((82, RiskLevel::High)))]
    #[case("BTC", 15.0, Some((90, RiskLevel::High)))]
    #[case("BTC", -4.0, None)]
    #[case("ETH", 3.1, Some((71, RiskLevel::Medium)))]
    #[case("ETH", 12.0, Some((85, RiskLevel::High)))]
    #[case("SOL", -1.2, None)]
    #[case("SOL", -3.5, Some((67, RiskLevel::High)))]
    #[case("SOL", 30.0, Some((80, RiskLevel::High)))]
    fn test_momentum_rules(#[case] symbol: &str, #[case] change: f64, #[case] expected: Option<(u8, RiskLevel)>) {
        let quotes = vec![PriceQuote::new(symbol, symbol, 1.0, change)];
        let got = momentum_opportunities(&quotes, now())
            .first()
            .map(|o| (o.score, o.risk));
        assert_eq!(got, expected);
    }

    #[test]
    fn test_sol_potential_uses_absolute_change() {
        let quotes = vec![PriceQuote::new("SOL", "Solana", 90.0, -3.5)];
        let opps = momentum_opportunities(&quotes, now());
        assert_eq!(opps[0].potential, "+42% potential");
        assert_eq!(opps[0].tags, vec!["solana", "volatility", "high-risk"]);
    }

    #[test]
    fn test_momentum_ids_unique() {
        let quotes = vec![
            PriceQuote::new("BTC", "Bitcoin", 1.0, 4.0),
            PriceQuote::new("ETH", "Ethereum", 1.0, 4.0),
            PriceQuote::new("SOL", "Solana", 1.0, 4.0),
        ];
        let opps = momentum_opportunities(&quotes, now());
        assert_eq!(opps.len(), 3);
        assert_ne!(opps[0].id, opps[1].id);
        assert_ne!(opps[1].id, opps[2].id);
    }

    #[rstest]
    #[case(dec!(4.9), RiskLevel::Low)]
    #[case(dec!(5.0), RiskLevel::Medium)]
    #[case(dec!(29.9), RiskLevel::Medium)]
    #[case(dec!(30), RiskLevel::Medium)]
    #[case(dec!(30.1), RiskLevel::High)]
    #[case(dec!(35), RiskLevel::High)]
    #[case(dec!(40), RiskLevel::High)]
    #[case(dec!(40.1), RiskLevel::VeryHigh)]
    fn test_risk_from_spread(#[case] spread: Decimal, #[case] expected: RiskLevel) {
        assert_eq!(risk_from_spread(spread), expected);
    }

    #[rstest]
    #[case(dec!(0), 60)]
    #[case(dec!(99999), 69)]
    #[case(dec!(250000), 85)]
    #[case(dec!(2500000), 95)]
    #[case(dec!(-50000), 55)]
    fn test_prediction_score(#[case] volume: Decimal, #[case] expected: u8) {
        assert_eq!(prediction_score(volume), expected);
    }

    #[rstest]
    #[case(Some(Duration::days(90)), "Ongoing")]
    #[case(Some(Duration::days(31)), "Ongoing")]
    #[case(Some(Duration::days(12) + Duration::hours(3)), "12 days")]
    #[case(Some(Duration::hours(5) + Duration::minutes(30)), "5 hours")]
    #[case(Some(Duration::minutes(20)), "Now")]
    #[case(Some(Duration::hours(-3)), "Now")]
    #[case(None, "Now")]
    fn test_time_until(#[case] offset: Option<Duration>, #[case] expected: &str) {
        let end = offset.map(|d| now() + d);
        assert_eq!(time_until(end, now()), expected);
    }

    #[test]
    fn test_prediction_opportunity_fields() {
        let m = market(
            "m1",
            "Will Bitcoin exceed $100,000 by end of 2025 and stay there through the whole year?",
            dec!(0.35),
            dec!(0.68),
            dec!(2500000),
        );
        let opps = prediction_opportunities(&[m], now());
        let o = &opps[0];
        assert_eq!(o.id, "poly-m1");
        assert_eq!(o.title.chars().count(), 63);
        assert!(o.title.ends_with("..."));
        assert_eq!(o.score, 95);
        assert_eq!(o.risk, RiskLevel::High);
        assert_eq!(o.potential, "Yes: 35.0¢ / No: 68.0¢");
        assert_eq!(o.timing, "10 days");
        assert_eq!(o.description, "Market with $2,500,000 volume. Current odds: Yes 35%");
        assert_eq!(o.tags, vec!["polymarket", "prediction", "crypto"]);
        assert_eq!(o.url.as_deref(), Some("https://polymarket.com/event/m1"));
    }

    #[test]
    fn test_prediction_opportunities_capped_and_slug_url() {
        let mut markets: Vec<PredictionMarket> = (0..8)
            .map(|i| market(&format!("m{}", i), "Will it snow?", dec!(0.5), dec!(0.5), dec!(10000)))
            .collect();
        markets[0].slug = Some("snow".to_string());
        let opps = prediction_opportunities(&markets, now());
        assert_eq!(opps.len(), MAX_PREDICTION_OPPORTUNITIES);
        assert_eq!(opps[0].url.as_deref(), Some("https://polymarket.com/event/snow"));
        assert_eq!(opps[0].risk, RiskLevel::Low);
        assert_eq!(opps[0].tags[2], "trending");
    }

    #[rstest]
    #[case(dec!(0.625), dec!(0.375), "Yes: 62.5¢ / No: 37.5¢", "Current odds: Yes 63%")]
    #[case(dec!(0.00625), dec!(0.99375), "Yes: 0.7¢ / No: 99.4¢", "Current odds: Yes 1%")]
    #[case(dec!(0.345), dec!(0.655), "Yes: 34.5¢ / No: 65.5¢", "Current odds: Yes 35%")]
    fn test_prediction_odds_round_half_up(
        #[case] yes: Decimal,
        #[case] no: Decimal,
        #[case] potential: &str,
        #[case] odds: &str,
    ) {
        let opps = prediction_opportunities(&[market("r", "Will it rain?", yes, no, dec!(1000))], now());
        assert_eq!(opps[0].potential, potential);
        assert!(opps[0].description.ends_with(odds), "{}", opps[0].description);
    }

    #[test]
    fn test_filter_opportunities() {
        let quotes = vec![
            PriceQuote::new("BTC", "Bitcoin", 1.0, 4.0),
            PriceQuote::new("SOL", "Solana", 1.0, 4.0),
        ];
        let opps = momentum_opportunities(&quotes, now());
        assert_eq!(filter_opportunities(&opps, "").len(), 2);
        assert_eq!(filter_opportunities(&opps, "HIGH-RISK").len(), 1);
        assert_eq!(filter_opportunities(&opps, "crypto trading").len(), 2);
        assert!(filter_opportunities(&opps, "forex").is_empty());
    }
}
