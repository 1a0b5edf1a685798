//! In-memory document store.
//!
//! Behaves like the managed store for everything the payment core relies
//! on: store-assigned ids, server timestamps, array-union, equality filters,
//! ordering and live subscriptions that emit the current result set first
//! and again after every write to the collection.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    Direction, Document, DocumentStore, DocumentStream, FieldValue, FieldWrites, Query,
    StoreError, DOCUMENT_ID_FIELD,
};

type Snapshot = Result<Vec<Document>, StoreError>;

#[derive(Debug, Clone)]
struct StoredDocument {
    fields: Map<String, Value>,
    /// Insertion order, for stable ordering of equal sort keys.
    seq: u64,
}

struct Subscriber {
    collection: String,
    query: Query,
    sender: mpsc::UnboundedSender<Snapshot>,
}

#[derive(Default)]
struct State {
    collections: HashMap<String, HashMap<String, StoredDocument>>,
    subscribers: Vec<Subscriber>,
    unavailable: HashSet<String>,
    next_seq: u64,
}

impl State {
    fn ensure_writable(&self, collection: &str) -> Result<(), StoreError> {
        if self.unavailable.contains(collection) {
            return Err(StoreError::Unavailable(format!(
                "collection '{}' is offline",
                collection
            )));
        }
        Ok(())
    }

    fn run_query(&self, collection: &str, query: &Query) -> Vec<Document> {
        let Some(docs) = self.collections.get(collection) else {
            return Vec::new();
        };

        let mut matches: Vec<(&String, &StoredDocument)> = docs
            .iter()
            .filter(|(id, doc)| {
                query.filters.iter().all(|filter| {
                    if filter.field == DOCUMENT_ID_FIELD {
                        filter.value.as_str() == Some(id.as_str())
                    } else {
                        doc.fields.get(&filter.field) == Some(&filter.value)
                    }
                })
            })
            .collect();

        match &query.order_by {
            Some(order) => matches.sort_by(|(_, a), (_, b)| {
                let by_field = compare_values(a.fields.get(&order.field), b.fields.get(&order.field))
                    .then_with(|| a.seq.cmp(&b.seq));
                match order.direction {
                    Direction::Ascending => by_field,
                    Direction::Descending => by_field.reverse(),
                }
            }),
            None => matches.sort_by_key(|(_, doc)| doc.seq),
        }

        matches
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|(id, doc)| Document {
                id: id.clone(),
                fields: doc.fields.clone(),
            })
            .collect()
    }

    fn notify(&mut self, collection: &str) {
        let snapshots: Vec<Option<Vec<Document>>> = self
            .subscribers
            .iter()
            .map(|sub| (sub.collection == collection).then(|| self.run_query(collection, &sub.query)))
            .collect();

        let mut index = 0;
        self.subscribers.retain(|sub| {
            let snapshot = snapshots[index].clone();
            index += 1;
            match snapshot {
                Some(docs) => sub.sender.unbounded_send(Ok(docs)).is_ok(),
                None => !sub.sender.is_closed(),
            }
        });
    }
}

/// Thread-safe in-memory document store.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write to `collection` fail with `Unavailable` (or heals it).
    pub async fn set_unavailable(&self, collection: &str, unavailable: bool) {
        let mut state = self.state.write().await;
        if unavailable {
            state.unavailable.insert(collection.to_string());
        } else {
            state.unavailable.remove(collection);
        }
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Number of live subscriptions.
    pub async fn subscriber_count(&self) -> usize {
        let mut state = self.state.write().await;
        state.subscribers.retain(|sub| !sub.sender.is_closed());
        state.subscribers.len()
    }
}

fn apply_writes(target: &mut Map<String, Value>, writes: FieldWrites, now: &str) {
    for (field, write) in writes {
        match write {
            FieldValue::Value(value) => {
                target.insert(field, value);
            }
            FieldValue::ServerTimestamp => {
                target.insert(field, Value::String(now.to_string()));
            }
            FieldValue::ArrayUnion(elements) => {
                let entry = target
                    .entry(field)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !entry.is_array() {
                    *entry = Value::Array(Vec::new());
                }
                if let Value::Array(existing) = entry {
                    for element in elements {
                        if !existing.contains(&element) {
                            existing.push(element);
                        }
                    }
                }
            }
        }
    }
}

/// Orders JSON values the way the store orders a field: missing first, then
/// numbers, then strings. Strings that are both RFC 3339 compare as instants.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (Timestamp::parse_rfc3339(x), Timestamp::parse_rfc3339(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Number(_)), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Number(_))) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, fields: FieldWrites) -> Result<String, StoreError> {
        let mut state = self.state.write().await;
        state.ensure_writable(collection)?;

        let id = Uuid::new_v4().to_string();
        let mut doc = Map::new();
        apply_writes(&mut doc, fields, &Timestamp::now().to_rfc3339());
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), StoredDocument { fields: doc, seq });

        state.notify(collection);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: FieldWrites) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_writable(collection)?;

        let seq = state.next_seq;
        let docs = state.collections.entry(collection.to_string()).or_default();
        let inserted = !docs.contains_key(id);
        let doc = docs.entry(id.to_string()).or_insert_with(|| StoredDocument {
            fields: Map::new(),
            seq,
        });
        apply_writes(&mut doc.fields, fields, &Timestamp::now().to_rfc3339());
        if inserted {
            state.next_seq += 1;
        }

        state.notify(collection);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: FieldWrites,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_writable(collection)?;

        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        apply_writes(&mut doc.fields, fields, &Timestamp::now().to_rfc3339());

        state.notify(collection);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| Document {
                id: id.to_string(),
                fields: doc.fields.clone(),
            }))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(self.state.read().await.run_query(collection, query))
    }

    async fn subscribe(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<DocumentStream, StoreError> {
        let (sender, receiver) = mpsc::unbounded();
        let mut state = self.state.write().await;

        let initial = state.run_query(collection, &query);
        // The receiver is alive, so the first send cannot fail.
        let _ = sender.unbounded_send(Ok(initial));
        state.subscribers.push(Subscriber {
            collection: collection.to_string(),
            query,
            sender,
        });

        Ok(receiver.boxed())
    }
}
