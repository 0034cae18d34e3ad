//! Relational item store on Aurora, queried through the RDS Data API.
//!
//! No connection is held by the function: every lookup is one HTTPS call
//! executing a parameterized statement with the credentials of
//! `DB_SECRET_ARN`.

use crate::config::DataApiConfig;
use crate::store::{Item, ItemStore, UNKNOWN_NAME};
use anyhow::{Context, bail};
use async_trait::async_trait;
use aws_sdk_rdsdata::Client;
use aws_sdk_rdsdata::types::{Field, SqlParameter};

pub const SELECT_ITEM_NAME: &str = "SELECT name FROM items WHERE id = :id";

#[derive(Clone, Debug)]
pub struct DataApiItemStore {
    client: Client,
    config: DataApiConfig,
}

impl DataApiItemStore {
    /// Creates a store using the default AWS credential chain.
    pub async fn from_env(config: DataApiConfig) -> DataApiItemStore {
        tracing::info!(
            "Setting up RDS Data API for database '{}' on '{}'....",
            config.database,
            config.cluster_arn
        );
        let aws_config = aws_config::load_from_env().await;

        DataApiItemStore::new(Client::new(&aws_config), config)
    }

    pub fn new(client: Client, config: DataApiConfig) -> DataApiItemStore {
        DataApiItemStore { client, config }
    }
}

#[async_trait]
impl ItemStore for DataApiItemStore {
    async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>> {
        let output = self
            .client
            .execute_statement()
            .resource_arn(&self.config.cluster_arn)
            .secret_arn(&self.config.secret_arn)
            .database(&self.config.database)
            .sql(SELECT_ITEM_NAME)
            .parameters(
                SqlParameter::builder()
                    .name("id")
                    .value(Field::StringValue(id.to_string()))
                    .build(),
            )
            .send()
            .await
            .with_context(|| {
                format!("Failed to query '{}' in database '{}'", id, self.config.database)
            })?;

        item_from_records(id, output.records())
    }

    fn kind(&self) -> &'static str {
        "rds-data"
    }
}

/// Maps the records of [`SELECT_ITEM_NAME`] to an item.
///
/// Only the first record is considered. A `NULL` name yields [`UNKNOWN_NAME`].
pub fn item_from_records(id: &str, records: &[Vec<Field>]) -> anyhow::Result<Option<Item>> {
    let Some(record) = records.first() else {
        return Ok(None);
    };

    let name = match record.first() {
        Some(Field::StringValue(name)) => name.clone(),
        Some(Field::IsNull(_)) => UNKNOWN_NAME.to_string(),
        Some(other) => bail!("Unexpected value for column 'name': {:?}", other),
        None => bail!("The query result does not contain the column 'name'"),
    };

    Ok(Some(Item::new(id, name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_records_means_not_found() {
        assert_eq!(item_from_records("42", &[]).unwrap(), None);
    }

    #[test]
    fn reads_the_name_of_the_first_record() {
        let records = vec![
            vec![Field::StringValue("Ada".to_string())],
            vec![Field::StringValue("Grace".to_string())],
        ];

        assert_eq!(
            item_from_records("7", &records).unwrap(),
            Some(Item::new("7", "Ada"))
        );
    }

    #[test]
    fn null_names_are_unknown() {
        let records = vec![vec![Field::IsNull(true)]];

        assert_eq!(
            item_from_records("7", &records).unwrap(),
            Some(Item::new("7", "Unknown"))
        );
    }

    #[test]
    fn unexpected_columns_are_errors() {
        assert!(item_from_records("7", &[vec![Field::LongValue(7)]]).is_err());
        assert!(item_from_records("7", &[vec![]]).is_err());
    }
}
