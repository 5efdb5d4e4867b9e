use std::path::PathBuf;

/// Resolved runtime configuration for a feed-generation run.
///
/// Built from environment variables by [`crate::config::load_app_config`];
/// CLI flags may override individual fields after loading.
#[derive(Clone)]
pub struct AppConfig {
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Base URL for product links and image URLs, without a trailing slash.
    pub base_url: String,
    /// Directory receiving `categories/*.json` and `index.json`.
    pub output_dir: PathBuf,
    /// Explicit output path for the flat feed; defaults to
    /// `<output_dir>/feed.json` when unset.
    pub output_file: Option<PathBuf>,
    /// Optional cap on the number of product rows per query.
    pub row_limit: Option<u32>,
    pub db_max_retries: u32,
    pub db_retry_backoff_base_secs: u64,
}

impl AppConfig {
    /// Path the flat feed is written to.
    #[must_use]
    pub fn flat_feed_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join("feed.json"))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_host", &self.db_host)
            .field("db_user", &self.db_user)
            .field("db_password", &"[redacted]")
            .field("db_name", &self.db_name)
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .field("output_file", &self.output_file)
            .field("row_limit", &self.row_limit)
            .field("db_max_retries", &self.db_max_retries)
            .field(
                "db_retry_backoff_base_secs",
                &self.db_retry_backoff_base_secs,
            )
            .finish()
    }
}
