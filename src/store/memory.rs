//! An [`ItemStore`] backed by a map, for local runs and tests.

use crate::store::{Item, ItemStore};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct InMemoryItemStore {
    items: HashMap<String, Item>,
}

impl InMemoryItemStore {
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        InMemoryItemStore {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>> {
        Ok(self.items.get(id).cloned())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_items_by_id() {
        let store = InMemoryItemStore::from_items([Item::new("7", "Ada"), Item::new("8", "Grace")]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_item("8").await.unwrap(), Some(Item::new("8", "Grace")));
        assert_eq!(store.find_item("42").await.unwrap(), None);
    }

    #[tokio::test]
    async fn later_items_replace_earlier_ones() {
        let store = InMemoryItemStore::from_items([Item::new("7", "Ada"), Item::new("7", "Lovelace")]);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_item("7").await.unwrap(),
            Some(Item::new("7", "Lovelace"))
        );
    }

    #[test]
    fn default_store_is_empty() {
        assert!(InMemoryItemStore::default().is_empty());
    }
}
