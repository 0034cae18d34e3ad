//! Item lookup against a pluggable store.
//!
//! All backends implement [`ItemStore`], a single read by id. The handler turns
//! the result of that read into a [`LookupOutcome`]; the stores themselves
//! never swallow errors.
//!
//! | Backend | Module | Feature |
//! |---------|--------|---------|
//! | DynamoDB `GetItem` | [`dynamodb`] | `aws_dynamodb` |
//! | Aurora via the RDS Data API | [`rds_data`] | `aws_rds_data` |
//! | PostgreSQL via `sqlx` | [`postgres`] | `postgres` |
//! | In-process map | [`memory`] | – |

use crate::config::{Backend, StoreConfig};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[cfg(feature = "aws_dynamodb")]
pub mod dynamodb;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "aws_rds_data")]
pub mod rds_data;

/// Name reported for items stored without one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A record which can be greeted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    #[serde(default = "unknown_name")]
    pub name: String,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Performs exactly one key based read.
///
/// Returns `Ok(None)` if no record with the given id exists. Any failure of the
/// underlying client is passed on as error.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>>;

    /// Short name of the backend, used in logs.
    fn kind(&self) -> &'static str;
}

/// The normalized result of a single lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Found(Item),
    NotFound,
    AdapterError(String),
}

impl From<anyhow::Result<Option<Item>>> for LookupOutcome {
    fn from(result: anyhow::Result<Option<Item>>) -> Self {
        match result {
            Ok(Some(item)) => LookupOutcome::Found(item),
            Ok(None) => LookupOutcome::NotFound,
            Err(err) => LookupOutcome::AdapterError(format!("{:#}", err)),
        }
    }
}

impl Display for LookupOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupOutcome::Found(_) => write!(f, "found"),
            LookupOutcome::NotFound => write!(f, "not found"),
            LookupOutcome::AdapterError(_) => write!(f, "error"),
        }
    }
}

/// Stands in for a store which could not be set up.
///
/// Every lookup fails with the reason, so that the misconfiguration surfaces as
/// a 500 response instead of a crashed cold start.
pub struct UnconfiguredStore {
    reason: String,
}

impl UnconfiguredStore {
    pub fn new(reason: impl Into<String>) -> Self {
        UnconfiguredStore {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ItemStore for UnconfiguredStore {
    async fn find_item(&self, _id: &str) -> anyhow::Result<Option<Item>> {
        Err(anyhow!("{}", self.reason))
    }

    fn kind(&self) -> &'static str {
        "unconfigured"
    }
}

/// Creates the store described by the given configuration.
pub async fn from_config(config: StoreConfig) -> anyhow::Result<Arc<dyn ItemStore>> {
    match config {
        StoreConfig::Memory { items } => {
            let store = memory::InMemoryItemStore::from_items(items);
            if store.is_empty() {
                tracing::warn!("The memory item store is empty, every lookup yields 404");
            } else {
                tracing::info!("Seeded the memory item store with {} items", store.len());
            }

            Ok(Arc::new(store))
        }

        #[cfg(feature = "aws_dynamodb")]
        StoreConfig::DynamoDb { table } => {
            Ok(Arc::new(dynamodb::DynamoItemStore::from_env(table).await))
        }

        #[cfg(feature = "aws_rds_data")]
        StoreConfig::RdsData(config) => Ok(Arc::new(rds_data::DataApiItemStore::from_env(config).await)),

        #[cfg(feature = "postgres")]
        StoreConfig::Postgres(config) => Ok(Arc::new(postgres::PostgresItemStore::connect_lazy(&config))),

        #[allow(unreachable_patterns)]
        other => anyhow::bail!(
            "The item backend {:?} is not available in this build",
            other.backend()
        ),
    }
}

/// Reads the configuration and builds the store once per process.
///
/// Never fails: if the configuration is incomplete or the backend cannot be
/// built, an [`UnconfiguredStore`] carrying the reason is returned.
pub async fn from_env(default_backend: Backend) -> Arc<dyn ItemStore> {
    let store = match StoreConfig::from_env(default_backend) {
        Ok(config) => from_config(config).await,
        Err(err) => Err(err),
    };

    match store {
        Ok(store) => {
            tracing::info!("Using the '{}' item store", store.kind());
            store
        }
        Err(err) => {
            tracing::error!("Item store is not configured: {:#}", err);
            Arc::new(UnconfiguredStore::new(format!("{:#}", err)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_reflects_the_lookup_result() {
        assert_eq!(
            LookupOutcome::from(Ok(Some(Item::new("7", "Ada")))),
            LookupOutcome::Found(Item::new("7", "Ada"))
        );
        assert_eq!(LookupOutcome::from(Ok(None)), LookupOutcome::NotFound);

        let err = Err(anyhow!("timeout").context("Failed to query table"));
        assert_eq!(
            LookupOutcome::from(err),
            LookupOutcome::AdapterError("Failed to query table: timeout".to_string())
        );
    }

    #[test]
    fn items_without_name_are_unknown() {
        let item: Item = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(item, Item::new("7", "Unknown"));
    }

    #[tokio::test]
    async fn unconfigured_store_fails_every_lookup() {
        let store = UnconfiguredStore::new("ITEMS_TABLE: can not be found in the environment");

        let err = store.find_item("7").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "ITEMS_TABLE: can not be found in the environment"
        );
    }

    #[tokio::test]
    async fn builds_memory_stores() {
        let store = from_config(StoreConfig::Memory {
            items: vec![Item::new("7", "Ada")],
        })
        .await
        .unwrap();

        assert_eq!(store.kind(), "memory");
        assert_eq!(store.find_item("7").await.unwrap(), Some(Item::new("7", "Ada")));
    }

    #[cfg(not(feature = "aws_dynamodb"))]
    #[tokio::test]
    async fn reports_backends_missing_from_the_build() {
        let result = from_config(StoreConfig::DynamoDb {
            table: "items".to_string(),
        })
        .await;

        assert!(result.is_err());
    }
}
