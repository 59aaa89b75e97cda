use crate::normalization::excerpt;
use crate::shared_types::{Alert, AlertKind, ArticleSentiment, NewsArticle, Opportunity, Trend};

pub const HIGH_SCORE_THRESHOLD: u8 = 90;
pub const TRENDING_GROWTH_THRESHOLD: u32 = 400;
const HEADLINE_CHARS: usize = 50;

/// Most recently published article; ties and unparseable dates keep the earlier entry.
pub fn freshest_article(articles: &[NewsArticle]) -> Option<&NewsArticle> {
    let mut best: Option<&NewsArticle> = None;
    for article in articles {
        match best {
            None => best = Some(article),
            Some(current) => {
                if let (Some(candidate), Some(held)) = (article.published(), current.published()) {
                    if candidate > held {
                        best = Some(article);
                    }
                } else if current.published().is_none() && article.published().is_some() {
                    best = Some(article);
                }
            }
        }
    }
    best
}

/// Alerts triggered by one snapshot. `trends` is expected ranked by growth.
pub fn derive_alerts(opportunities: &[Opportunity], trends: &[Trend], news: &[NewsArticle]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(top) = opportunities.iter().find(|o| o.score >= HIGH_SCORE_THRESHOLD) {
        alerts.push(Alert::new(
            format!("High score opportunity: {}", top.title),
            "Just now",
            AlertKind::Alert,
        ));
    }

    if let Some(top) = trends.first() {
        if top.growth > TRENDING_GROWTH_THRESHOLD {
            alerts.push(Alert::new(
                format!("{} trending +{}%", top.topic, top.growth),
                "15m ago",
                AlertKind::Info,
            ));
        }
    }

    if let Some(article) = freshest_article(news) {
        if article.sentiment == ArticleSentiment::Positive {
            alerts.push(Alert::new(excerpt(&article.title, HEADLINE_CHARS), "1h ago", AlertKind::Success));
        }
    }

    alerts
}
