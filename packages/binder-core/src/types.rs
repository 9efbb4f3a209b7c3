use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Root of the persisted document.
///
/// `store_ids` only populates the store picker. The keys of each card's
/// `prices` map are what actually record which stores price a card, and
/// they may name stores missing from `store_ids`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default)]
    pub store_ids: Vec<String>,
    #[serde(default)]
    pub cards: BTreeMap<String, CardRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub name: String,
    pub image_uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_identity: Vec<String>,
    #[serde(default, deserialize_with = "prices_skipping_null")]
    pub prices: BTreeMap<String, f64>,
}

/// Documents written by older clients can hold `null` where a price failed to
/// parse. Such entries mean "no price" and are dropped on load.
fn prices_skipping_null<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(store_id, price)| {
            if price.is_none() {
                log::warn!(target: "binder.store", "Dropping null price for store {}", store_id);
            }
            price.map(|p| (store_id, p))
        })
        .collect())
}

/// Color tag -> sort bucket. Anything not in this table with a single tag
/// sorts with the colorless cards.
const COLOR_BUCKETS: [(&str, u8); 5] = [("W", 0), ("U", 1), ("B", 2), ("R", 3), ("G", 4)];
pub const MULTICOLOR_BUCKET: u8 = 5;
pub const COLORLESS_BUCKET: u8 = 6;

impl CardRecord {
    pub fn new(name: impl Into<String>, image_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_uri: image_uri.into(),
            color_identity: Vec::new(),
            prices: BTreeMap::new(),
        }
    }

    pub fn color_bucket(&self) -> u8 {
        match self.color_identity.as_slice() {
            [] => COLORLESS_BUCKET,
            [single] => COLOR_BUCKETS
                .iter()
                .find(|(tag, _)| *tag == single.as_str())
                .map(|(_, bucket)| *bucket)
                .unwrap_or(COLORLESS_BUCKET),
            _ => MULTICOLOR_BUCKET,
        }
    }

    /// Highest price across all stores. On a tie the store that sorts first wins.
    pub fn best_price(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (store_id, price) in &self.prices {
            match best {
                Some((_, current)) if *price <= current => {}
                _ => best = Some((store_id.as_str(), *price)),
            }
        }
        best
    }
}

impl State {
    /// Case-insensitive lookup by display name.
    pub fn has_card_named(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.cards.values().any(|c| c.name.to_lowercase() == needle)
    }
}
