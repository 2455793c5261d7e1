//! `SQLite` connection pool setup and schema bootstrap.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use inventory_app::change_feed::ChangeFeed;
use inventory_app::config::LiveQueryConfig;
use inventory_app::gateway::ItemGateway;
use inventory_app::repository::OfflineItemsRepository;

use crate::config::DatabaseConfig;
use crate::error::StorageError;
use crate::item_store::SqliteItemStore;

const CREATE_ITEMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        quantity INTEGER NOT NULL
    )
";

/// Holds the `SQLite` connection pool and the change feed shared by every
/// repository built over it.
pub struct Database {
    pool: SqlitePool,
    feed: ChangeFeed,
    live_query: LiveQueryConfig,
}

impl Database {
    /// Connect to the database and make sure the `items` table exists.
    ///
    /// In-memory databases live only as long as their connection, so they
    /// are pinned to a single connection that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or table creation fails.
    pub(crate) async fn initialize(
        config: &DatabaseConfig,
        live_query: LiveQueryConfig,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let in_memory = is_in_memory(&config.url);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::query(CREATE_ITEMS_TABLE).execute(&pool).await?;

        tracing::info!(url = %config.url, in_memory, "item database ready");
        Ok(Self {
            pool,
            feed: ChangeFeed::new(live_query.feed_capacity),
            live_query,
        })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Build the `SQLite`-backed item store.
    #[must_use]
    pub fn item_store(&self) -> SqliteItemStore {
        SqliteItemStore::new(self.pool.clone())
    }

    /// Build an items repository over this database.
    ///
    /// Every repository from the same [`Database`] publishes on one feed, so
    /// observers see writes made through any of them.
    #[must_use]
    pub fn items_repository(&self) -> OfflineItemsRepository<SqliteItemStore> {
        let gateway = ItemGateway::from_parts(
            Arc::new(self.item_store()),
            self.feed.clone(),
            self.live_query.observer_buffer,
        );
        OfflineItemsRepository::from_gateway(gateway)
    }

    /// Close every pooled connection. Later queries fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
