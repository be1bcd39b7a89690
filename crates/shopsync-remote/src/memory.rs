//! # In-Memory Backend
//!
//! An in-process implementation of [`RemoteBackend`] for the test suite and
//! for demo/seed tooling.
//!
//! ## Behavior Parity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mirrors the real service closely enough that store tests are honest:  │
//! │                                                                         │
//! │  • assigns string ids (uuid v4) and stamps created_at/updated_at       │
//! │  • assigns sequential product_id for the products collection           │
//! │  • stamps sale_date / payment_date / last_updated like the real        │
//! │    service's column defaults                                           │
//! │  • update/delete of an absent id answer NotFound                       │
//! │  • list returns newest-first (create prepends)                         │
//! │                                                                         │
//! │  Failure injection: `fail_next(err)` makes exactly the NEXT call       │
//! │  fail, which is how the rollback guarantees are exercised.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::{Collection, RemoteBackend};
use crate::error::{RemoteError, RemoteResult};

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory remote entity service.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Records per collection, newest first.
    state: RwLock<HashMap<Collection, Vec<Value>>>,

    /// Single-shot injected failure, consumed by the next call.
    fail_next: Mutex<Option<RemoteError>>,

    /// Sequential legacy ids for the products collection.
    next_product_id: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            state: RwLock::new(HashMap::new()),
            fail_next: Mutex::new(None),
            next_product_id: AtomicI64::new(1),
        }
    }

    /// Pre-loads a collection with records, bypassing create stamping.
    ///
    /// Seeded products with a `product_id` advance the sequence so later
    /// creates never collide.
    pub async fn seed(&self, collection: Collection, records: Vec<Value>) {
        if collection == Collection::Products {
            let max_seen = records
                .iter()
                .filter_map(|r| r.get("product_id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0);
            self.next_product_id
                .fetch_max(max_seen + 1, Ordering::SeqCst);
        }
        self.state.write().await.insert(collection, records);
    }

    /// Makes exactly the next call fail with the given error.
    pub fn fail_next(&self, error: RemoteError) {
        *self.fail_next.lock().expect("fail_next lock poisoned") = Some(error);
    }

    /// Current record count in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.state
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    fn take_failure(&self) -> Option<RemoteError> {
        self.fail_next.lock().expect("fail_next lock poisoned").take()
    }
}

/// Reads a record's id as a string (ids may be numeric in legacy rows).
fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Sets `key` only when the record doesn't already carry it.
fn default_field(record: &mut Value, key: &str, value: Value) {
    if record.get(key).is_none() {
        record[key] = value;
    }
}

// =============================================================================
// RemoteBackend Implementation
// =============================================================================

impl RemoteBackend for MemoryBackend {
    async fn list(&self, collection: Collection) -> RemoteResult<Vec<Value>> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self
            .state
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn create(&self, collection: Collection, draft: Value) -> RemoteResult<Value> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        if !draft.is_object() {
            return Err(RemoteError::Validation(
                "create payload must be an object".into(),
            ));
        }

        let mut record = draft;
        let now = json!(Utc::now().to_rfc3339());

        default_field(&mut record, "id", json!(Uuid::new_v4().to_string()));
        default_field(&mut record, "created_at", now.clone());
        default_field(&mut record, "updated_at", now.clone());

        // Column defaults the real service applies per table
        match collection {
            Collection::Products => {
                if record.get("product_id").and_then(Value::as_i64).is_none() {
                    let assigned = self.next_product_id.fetch_add(1, Ordering::SeqCst);
                    record["product_id"] = json!(assigned);
                }
            }
            Collection::Sales => default_field(&mut record, "sale_date", now),
            Collection::Payments => default_field(&mut record, "payment_date", now),
            Collection::Inventory => default_field(&mut record, "last_updated", now),
            _ => {}
        }

        let mut state = self.state.write().await;
        state
            .entry(collection)
            .or_default()
            .insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> RemoteResult<Value> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.write().await;
        let records = state.entry(collection).or_default();
        let record = records
            .iter_mut()
            .find(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| RemoteError::not_found(collection.as_str(), id))?;

        if let Value::Object(fields) = patch {
            for (key, value) in fields {
                record[key.as_str()] = value;
            }
        } else {
            return Err(RemoteError::Validation(
                "update payload must be an object".into(),
            ));
        }

        let now = json!(Utc::now().to_rfc3339());
        record["updated_at"] = now.clone();
        if collection == Collection::Inventory {
            default_field(record, "last_updated", now);
        }

        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.write().await;
        let records = state.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| record_id(r).as_deref() != Some(id));

        if records.len() == before {
            return Err(RemoteError::not_found(collection.as_str(), id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
