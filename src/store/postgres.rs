//! Relational item store on a directly reachable PostgreSQL server.
//!
//! The pool is created lazily: the first lookup of a process opens the
//! connection, later invocations of the same process reuse it.

use crate::config::PostgresConfig;
use crate::store::{Item, ItemStore, UNKNOWN_NAME};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub const SELECT_ITEM_NAME: &str = "SELECT name FROM items WHERE id = $1";

#[derive(Clone, Debug)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    /// Creates the store without connecting yet.
    pub fn connect_lazy(config: &PostgresConfig) -> PostgresItemStore {
        tracing::info!(
            "Setting up PostgreSQL for database '{}' on {}:{}....",
            config.database,
            config.host,
            config.port
        );

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(connect_options(config));

        PostgresItemStore::new(pool)
    }

    pub fn new(pool: PgPool) -> PostgresItemStore {
        PostgresItemStore { pool }
    }
}

fn connect_options(config: &PostgresConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(SELECT_ITEM_NAME)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to query '{}' in table 'items'", id))?;

        Ok(row.map(|(name,)| Item::new(id, name.unwrap_or_else(|| UNKNOWN_NAME.to_string()))))
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
