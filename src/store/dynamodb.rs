//! Key-value item store on DynamoDB.
//!
//! Items live in the table named by `ITEMS_TABLE` and are addressed by the
//! string partition key `id`. A lookup is a single `GetItem`.

use crate::store::{Item, ItemStore};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// Name of the partition key attribute.
pub const KEY_ATTRIBUTE: &str = "id";

#[derive(Clone, Debug)]
pub struct DynamoItemStore {
    client: Client,
    table: String,
}

impl DynamoItemStore {
    /// Creates a store using the default AWS credential chain.
    pub async fn from_env(table: String) -> DynamoItemStore {
        tracing::info!("Setting up DynamoDB for table '{}'....", table);
        let config = aws_config::load_from_env().await;

        DynamoItemStore::new(Client::new(&config), table)
    }

    pub fn new(client: Client, table: String) -> DynamoItemStore {
        DynamoItemStore { client, table }
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(KEY_ATTRIBUTE, AttributeValue::S(id.to_string()))
            .send()
            .await
            .with_context(|| {
                format!("Failed to read '{}' from DynamoDB table '{}'", id, self.table)
            })?;

        deserialize_item(output.item)
    }

    fn kind(&self) -> &'static str {
        "dynamodb"
    }
}

/// Deserializes the attributes returned by `GetItem` into an [`Item`].
pub fn deserialize_item(
    values: Option<HashMap<String, AttributeValue>>,
) -> anyhow::Result<Option<Item>> {
    if let Some(values) = values {
        Ok(Some(
            serde_dynamo::aws_sdk_dynamodb_1::from_item(values)
                .context("Failed to deserialize DynamoDB item")?,
        ))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(values: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        values
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn missing_items_are_none() {
        assert_eq!(deserialize_item(None).unwrap(), None);
    }

    #[test]
    fn deserializes_items_and_ignores_extra_attributes() {
        let values = attributes(&[
            ("id", AttributeValue::S("7".to_string())),
            ("name", AttributeValue::S("Mrs. Doubtfire".to_string())),
            ("createdAt", AttributeValue::N("1700000000".to_string())),
        ]);

        assert_eq!(
            deserialize_item(Some(values)).unwrap(),
            Some(Item::new("7", "Mrs. Doubtfire"))
        );
    }

    #[test]
    fn items_without_name_are_unknown() {
        let values = attributes(&[("id", AttributeValue::S("7".to_string()))]);

        assert_eq!(
            deserialize_item(Some(values)).unwrap(),
            Some(Item::new("7", "Unknown"))
        );
    }

    #[test]
    fn malformed_items_are_errors() {
        let values = attributes(&[("name", AttributeValue::S("Ada".to_string()))]);
        assert!(deserialize_item(Some(values)).is_err());
    }
}
