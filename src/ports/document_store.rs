//! Document store port.
//!
//! The storefront keeps everything in a managed document database
//! (collections of JSON documents with live listeners). This port is the
//! narrow slice of that API the payment core uses: create, set, update, get,
//! filtered/ordered queries and subscriptions.
//!
//! Writes accept `FieldValue`s so callers can ask for server-assigned
//! timestamps and array-union merges the way the managed store offers them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Pseudo-field that filters on the document id.
pub const DOCUMENT_ID_FIELD: &str = "__name__";

/// One value in a write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Store the value as-is.
    Value(Value),
    /// Replace with the store's clock at commit time (RFC 3339 string).
    ServerTimestamp,
    /// Add each element to the array field unless already present.
    ArrayUnion(Vec<Value>),
}

impl FieldValue {
    pub fn value(value: impl Into<Value>) -> Self {
        FieldValue::Value(value.into())
    }
}

/// Field writes keyed by field name.
pub type FieldWrites = BTreeMap<String, FieldValue>;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Deserializes the fields, exposing the document id as `id`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            StoreError::Serialization(format!("document '{}': {}", self.id, e))
        })
    }
}

/// Sort direction for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on a field (or on `DOCUMENT_ID_FIELD`).
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Filters are ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Live query results. Each item is the full result set after a change.
/// Dropping the stream unsubscribes.
pub type DocumentStream = BoxStream<'static, Result<Vec<Document>, StoreError>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document with a store-assigned id.
    async fn create(&self, collection: &str, fields: FieldWrites) -> Result<String, StoreError>;

    /// Creates the document or merges `fields` into it.
    async fn set(&self, collection: &str, id: &str, fields: FieldWrites) -> Result<(), StoreError>;

    /// Merges `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the document does not exist
    async fn update(&self, collection: &str, id: &str, fields: FieldWrites)
        -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Streams the result set of `query`, starting with the current one.
    async fn subscribe(&self, collection: &str, query: Query)
        -> Result<DocumentStream, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn document_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn DocumentStore) {}
    }

    #[test]
    fn into_typed_exposes_document_id() {
        #[derive(Deserialize)]
        struct Named {
            id: String,
            name: String,
        }

        let doc = Document {
            id: "abc".to_string(),
            fields: json!({ "name": "Lisbon" }).as_object().unwrap().clone(),
        };
        let named: Named = doc.into_typed().unwrap();
        assert_eq!(named.id, "abc");
        assert_eq!(named.name, "Lisbon");
    }

    #[test]
    fn into_typed_reports_bad_shape() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            count: u32,
        }

        let doc = Document {
            id: "x".to_string(),
            fields: Map::new(),
        };
        let err = doc.into_typed::<Needs>().unwrap_err();
        assert!(matches!(err, StoreError::Serialization(msg) if msg.contains("document 'x'")));
    }

    #[test]
    fn query_builder_collects_clauses() {
        let query = Query::new()
            .where_eq("userId", "user-1")
            .order_by("createdAt", Direction::Descending)
            .limit(5);
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].value, json!("user-1"));
        assert_eq!(query.order_by.unwrap().direction, Direction::Descending);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn plain_values_convert_into_field_values() {
        assert_eq!(FieldValue::value("pending"), FieldValue::Value(json!("pending")));
    }
}
