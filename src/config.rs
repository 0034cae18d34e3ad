//! Store configuration read from the process environment.
//!
//! # Environment Variables
//!
//! | Variable | Description | Required for |
//! |----------|-------------|--------------|
//! | `ITEMS_BACKEND` | `dynamodb`, `rds-data`, `postgres` or `memory` | (defaults per binary) |
//! | `ITEMS_TABLE` | DynamoDB table holding the items | `dynamodb` |
//! | `DB_CLUSTER_ARN` | ARN of the Aurora cluster | `rds-data` |
//! | `DB_SECRET_ARN` | ARN of the secret with the database credentials | `rds-data` |
//! | `DB_NAME` | Database name | `rds-data`, `postgres` |
//! | `DB_HOST` | Database host | `postgres` |
//! | `DB_PORT` | Database port (default `5432`) | `postgres` |
//! | `DB_USER` | Database user | `postgres` |
//! | `DB_PASSWORD` | Database password | `postgres` |
//! | `ITEMS_SEED` | JSON array of `{"id", "name"}` objects | `memory` (optional) |
//!
//! The configuration is read once during a cold start. Reading it never
//! aborts the process, see [`crate::store::from_env`].

use crate::store::Item;
use anyhow::{Context, bail};
use std::env;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;

pub const ENV_ITEMS_BACKEND: &str = "ITEMS_BACKEND";
pub const ENV_ITEMS_TABLE: &str = "ITEMS_TABLE";
pub const ENV_DB_CLUSTER_ARN: &str = "DB_CLUSTER_ARN";
pub const ENV_DB_SECRET_ARN: &str = "DB_SECRET_ARN";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_ITEMS_SEED: &str = "ITEMS_SEED";

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// The kind of store answering item lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    DynamoDb,
    RdsData,
    Postgres,
    Memory,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(Backend::DynamoDb),
            "rds-data" | "rds_data" | "data-api" => Ok(Backend::RdsData),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            other => bail!(
                "Unknown {}: '{}' (expected dynamodb, rds-data, postgres or memory)",
                ENV_ITEMS_BACKEND,
                other
            ),
        }
    }
}

/// Target of the RDS Data API.
#[derive(Clone, Debug, PartialEq)]
pub struct DataApiConfig {
    pub cluster_arn: String,
    pub secret_arn: String,
    pub database: String,
}

/// Connection parameters of a PostgreSQL server.
#[derive(Clone, PartialEq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Debug for PostgresConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Fully resolved configuration of the item store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreConfig {
    DynamoDb { table: String },
    RdsData(DataApiConfig),
    Postgres(PostgresConfig),
    Memory { items: Vec<Item> },
}

impl StoreConfig {
    /// Reads the configuration from the process environment.
    ///
    /// `default_backend` applies if `ITEMS_BACKEND` is not set.
    pub fn from_env(default_backend: Backend) -> anyhow::Result<StoreConfig> {
        Self::from_lookup(default_backend, |name| env::var(name).ok())
    }

    /// Reads the configuration using the given variable lookup.
    pub fn from_lookup<F>(default_backend: Backend, lookup: F) -> anyhow::Result<StoreConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> anyhow::Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{}: can not be found in the environment", name))
        };

        let backend = match lookup(ENV_ITEMS_BACKEND).filter(|value| !value.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => default_backend,
        };

        match backend {
            Backend::DynamoDb => Ok(StoreConfig::DynamoDb {
                table: require(ENV_ITEMS_TABLE)?,
            }),
            Backend::RdsData => Ok(StoreConfig::RdsData(DataApiConfig {
                cluster_arn: require(ENV_DB_CLUSTER_ARN)?,
                secret_arn: require(ENV_DB_SECRET_ARN)?,
                database: require(ENV_DB_NAME)?,
            })),
            Backend::Postgres => {
                let port = match lookup(ENV_DB_PORT) {
                    Some(port) => port
                        .trim()
                        .parse()
                        .with_context(|| format!("{}: '{}' is not a valid port", ENV_DB_PORT, port))?,
                    None => DEFAULT_POSTGRES_PORT,
                };

                Ok(StoreConfig::Postgres(PostgresConfig {
                    host: require(ENV_DB_HOST)?,
                    port,
                    database: require(ENV_DB_NAME)?,
                    user: require(ENV_DB_USER)?,
                    password: require(ENV_DB_PASSWORD)?,
                }))
            }
            Backend::Memory => {
                let items = match lookup(ENV_ITEMS_SEED) {
                    Some(seed) => serde_json::from_str(&seed)
                        .with_context(|| format!("{}: invalid item list", ENV_ITEMS_SEED))?,
                    None => Vec::new(),
                };

                Ok(StoreConfig::Memory { items })
            }
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            StoreConfig::DynamoDb { .. } => Backend::DynamoDb,
            StoreConfig::RdsData(_) => Backend::RdsData,
            StoreConfig::Postgres(_) => Backend::Postgres,
            StoreConfig::Memory { .. } => Backend::Memory,
        }
    }
}
