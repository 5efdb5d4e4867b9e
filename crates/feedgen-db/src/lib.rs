use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use std::time::Duration;
use thiserror::Error;

const ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database not reachable within {attempts} connection attempts: {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
    #[error("attribute dictionary mismatch: {0}")]
    AttributeDictionary(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection settings for the catalog database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("database", &self.database)
            .finish()
    }
}

impl From<&feedgen_core::AppConfig> for DbConfig {
    fn from(config: &feedgen_core::AppConfig) -> Self {
        Self {
            host: config.db_host.clone(),
            user: config.db_user.clone(),
            password: config.db_password.clone(),
            database: config.db_name.clone(),
        }
    }
}

/// Open a connection to the catalog database.
///
/// The pool is capped at a single connection: a feed run is one linear
/// pipeline and owns exactly one session for its duration.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Connect to the catalog database, retrying while the server comes up.
///
/// Each attempt connects and pings; transient failures back off
/// exponentially (see [`retry::retry_with_backoff`]) up to `max_retries`
/// additional attempts.
///
/// # Errors
///
/// Returns [`DbError::Unavailable`] once the retry budget is exhausted or a
/// non-retriable connection error occurs.
pub async fn wait_for_database(
    config: &DbConfig,
    max_retries: u32,
    backoff_base_secs: u64,
) -> Result<MySqlPool, DbError> {
    let result = retry::retry_with_backoff(
        max_retries,
        backoff_base_secs.saturating_mul(1_000),
        || async move {
            let pool = connect(config).await.map_err(DbError::from)?;
            ping(&pool).await.map_err(DbError::from)?;
            Ok(pool)
        },
    )
    .await;

    result.map_err(|err| match err {
        DbError::Sqlx(source) => DbError::Unavailable {
            attempts: max_retries.saturating_add(1),
            source,
        },
        other => other,
    })
}

pub mod attributes;
pub mod categories;
pub mod inspect;
pub mod products;
pub mod retry;

pub use attributes::{
    validate_attribute_dictionary, ProductAttribute, CATEGORY_ENTITY_TYPE_ID,
    CATEGORY_NAME_ATTRIBUTE_ID, DEFAULT_STORE_ID, PRODUCT_ENTITY_TYPE_ID,
};
pub use categories::{list_categories, CategoryRow};
pub use inspect::{find_product, list_attribute_values, AttributeValueRow, ProductIdentity};
pub use products::{list_products, ProductRow};
