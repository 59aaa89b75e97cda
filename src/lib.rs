pub mod aggregator;
pub mod alerts;
pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod market_fetcher;
pub mod news_feed;
pub mod normalization;
pub mod opportunity_engine;
pub mod price_feed;
pub mod scoring;
pub mod shared_types;
pub mod social_feed;
pub mod topic_classifier;
pub mod trend_engine;
