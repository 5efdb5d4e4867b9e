use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod feed;
pub mod normalize;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use feed::{
    CategoryFeed, CategoryRef, FeedIndex, FeedMetadata, FeedProduct, FlatFeed, IndexEntry,
    IndexMetadata, FEED_FORMAT_CATEGORY, FEED_FORMAT_FLAT,
};
pub use normalize::{build_feed_product, ProductSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
