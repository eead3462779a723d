//! Playlist ordering for signage slideshows.

use reqwest::Method;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::KsisClient;
use crate::api::id_value;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::Keyed;

/// One row of a submitted ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceEntry<Id> {
    pub id: Id,
    /// 1-based position.
    pub sequence: u32,
}

/// An ordered list of items the user rearranges before saving.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist<T> {
    items: Vec<T>,
}

impl<T: Keyed> Playlist<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Moves the item at `from` so that it ends up at `to`, shifting the
    /// items between.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::PositionOutOfRange { index, len });
            }
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Current order as 1-based sequence numbers.
    pub fn sequence(&self) -> Vec<SequenceEntry<T::Id>> {
        self.items
            .iter()
            .zip(1..)
            .map(|(item, sequence)| SequenceEntry {
                id: item.id(),
                sequence,
            })
            .collect()
    }

    /// Request body: `[{"<id_field>": id, "sequence": n}, ...]`.
    pub fn to_body(&self, id_field: &str) -> Value {
        Value::Array(
            self.sequence()
                .into_iter()
                .map(|entry| {
                    let mut row = Map::new();
                    row.insert(id_field.to_string(), id_value(&entry.id.to_string()));
                    row.insert("sequence".to_string(), Value::from(entry.sequence));
                    Value::Object(row)
                })
                .collect(),
        )
    }

    /// Saves the order with `POST <endpoint>`.
    pub async fn submit(&self, client: &KsisClient, endpoint: &str, id_field: &str) -> Result<(), Error> {
        let url = client.endpoint_url(endpoint)?;
        let body = self.to_body(id_field);
        log::debug!("submitting order of {} item(s) to {}", self.items.len(), endpoint);
        client.request(Method::POST, url, Some(&body)).await?;
        Ok(())
    }
}
