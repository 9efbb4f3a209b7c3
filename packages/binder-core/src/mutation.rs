//! Read-modify-write operations over a [`StateStore`].
//!
//! Every operation loads the full document, applies a whole batch to that one
//! copy, and saves it once. Items that cannot apply are logged and skipped;
//! only store failures fail the call.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::{StateStore, StoreError};
use crate::types::{CardRecord, State};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCard {
    pub card_id: String,
    pub name: String,
    pub image_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_identity: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPrice {
    pub card_id: String,
    pub store_id: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub price: f64,
}

/// Prices arrive from form inputs, so numeric strings are coerced.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let price = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("price is not numeric: {:?}", s)))?,
    };
    // A non-finite price would be written as `null` and poison the document.
    if !price.is_finite() {
        return Err(serde::de::Error::custom(format!("price is not finite: {}", price)));
    }
    Ok(price)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    DuplicateCard,
    UnknownCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub card_id: String,
    pub reason: SkipReason,
}

/// Post-mutation document plus the items that did not apply.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: State,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Concurrent cycles may interleave; the last save wins.
    #[default]
    Unguarded,
    /// One load-mutate-save cycle at a time.
    Serialized,
}

pub struct MutationApi<S> {
    store: S,
    cycle_lock: Option<Mutex<()>>,
}

impl<S: StateStore> MutationApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_mode(store, ConcurrencyMode::Unguarded)
    }

    pub fn with_mode(store: S, mode: ConcurrencyMode) -> Self {
        let cycle_lock = match mode {
            ConcurrencyMode::Unguarded => None,
            ConcurrencyMode::Serialized => Some(Mutex::new(())),
        };
        Self { store, cycle_lock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_state(&self) -> Result<State, StoreError> {
        self.store.load()
    }

    /// Insert cards whose id is not yet present. Existing records are never
    /// overwritten.
    pub fn add_cards(&self, items: &[AddCard]) -> Result<Outcome, StoreError> {
        self.cycle(|state| {
            let mut skipped = Vec::new();
            for item in items {
                if state.cards.contains_key(&item.card_id) {
                    log::warn!(
                        target: "binder.mutation.add_cards",
                        "Card already present in state, skipping: {} ({})",
                        item.card_id,
                        item.name
                    );
                    skipped.push(Skipped {
                        card_id: item.card_id.clone(),
                        reason: SkipReason::DuplicateCard,
                    });
                    continue;
                }
                let mut record = CardRecord::new(item.name.clone(), item.image_uri.clone());
                record.color_identity = item.color_identity.clone().unwrap_or_default();
                state.cards.insert(item.card_id.clone(), record);
            }
            skipped
        })
    }

    /// Set or overwrite per-store prices on existing cards. Never creates cards.
    pub fn set_prices(&self, items: &[SetPrice]) -> Result<Outcome, StoreError> {
        self.cycle(|state| {
            let mut skipped = Vec::new();
            for item in items {
                match state.cards.get_mut(&item.card_id) {
                    Some(card) => {
                        card.prices.insert(item.store_id.clone(), item.price);
                    }
                    None => {
                        log::warn!(
                            target: "binder.mutation.set_prices",
                            "Card not found, skipping price for store {}: {}",
                            item.store_id,
                            item.card_id
                        );
                        skipped.push(Skipped {
                            card_id: item.card_id.clone(),
                            reason: SkipReason::UnknownCard,
                        });
                    }
                }
            }
            skipped
        })
    }

    fn cycle<F>(&self, apply: F) -> Result<Outcome, StoreError>
    where
        F: FnOnce(&mut State) -> Vec<Skipped>,
    {
        let _guard = self
            .cycle_lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(|e| e.into_inner()));

        let mut state = self.store.load()?;
        let skipped = apply(&mut state);
        // Saved even when nothing applied.
        self.store.save(&state)?;
        Ok(Outcome { state, skipped })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Expected an object or an array of objects, got {0}")]
    BatchShape(&'static str),

    #[error("Invalid item {index}: {message}")]
    Item { index: usize, message: String },
}

/// Items of a one-or-many request body, split into the ones that decoded and
/// the ones that did not.
#[derive(Debug)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub rejected: Vec<ValidationError>,
}

/// Decode a body that is either a single object or an array of objects.
/// Each element decodes on its own so one malformed item does not sink the
/// rest of the batch.
pub fn parse_batch<T: DeserializeOwned>(body: serde_json::Value) -> Result<Batch<T>, ValidationError> {
    let values = match body {
        serde_json::Value::Array(values) => values,
        serde_json::Value::Object(_) => vec![body],
        serde_json::Value::Null => return Err(ValidationError::BatchShape("null")),
        serde_json::Value::Bool(_) => return Err(ValidationError::BatchShape("a boolean")),
        serde_json::Value::Number(_) => return Err(ValidationError::BatchShape("a number")),
        serde_json::Value::String(_) => return Err(ValidationError::BatchShape("a string")),
    };

    let mut batch = Batch {
        items: Vec::with_capacity(values.len()),
        rejected: Vec::new(),
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(item) => batch.items.push(item),
            Err(e) => {
                let err = ValidationError::Item {
                    index,
                    message: e.to_string(),
                };
                log::warn!(target: "binder.mutation", "{}", err);
                batch.rejected.push(err);
            }
        }
    }
    Ok(batch)
}
