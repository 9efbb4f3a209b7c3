//! External card catalog: types, wire format and the lookup trait.
//! The HTTP client lives in the backend crate.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Fixed filter prepended to every name search: paper, non-foil, typical
/// printings, one result per card, most expensive first.
pub const SEARCH_FILTER: &str = "unique:cards sort:usd game:paper not:foil not:atypical";

/// Build the catalog query for a free-text search.
pub fn search_query(text: &str) -> String {
    format!("({}) && ({})", SEARCH_FILTER, text.trim())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub id: String,
    pub name: String,
    pub image_uri: String,
    #[serde(default)]
    pub color_identity: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Card not found in catalog: {0}")]
    NotFound(String),

    #[error("Catalog request failed: {0}")]
    Http(String),

    #[error("Catalog returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed catalog response: {0}")]
    Malformed(String),
}

/// Card lookup against the catalog.
pub trait Catalog: Send + Sync {
    /// Ranked search, at most `limit` results. No match is an empty list.
    fn search(
        &self,
        text: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CatalogCard>, CatalogError>> + Send;

    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<CatalogCard, CatalogError>> + Send;

    /// Top-ranked result for a free-text name.
    fn search_by_name(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<CatalogCard>, CatalogError>> + Send {
        async move { Ok(self.search(text, 1).await?.into_iter().next()) }
    }
}

// ── Wire format ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImageUris {
    pub png: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CardFace {
    pub image_uris: Option<ImageUris>,
}

/// A card object as the catalog returns it.
#[derive(Debug, Deserialize)]
pub struct WireCard {
    pub id: String,
    pub name: String,
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
    #[serde(default)]
    pub color_identity: Vec<String>,
}

/// A search result page.
#[derive(Debug, Deserialize)]
pub struct WireList {
    #[serde(default)]
    pub data: Vec<WireCard>,
}

/// Error body, e.g. `{"object":"error","code":"not_found",...}`.
#[derive(Debug, Default, Deserialize)]
pub struct WireError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub details: String,
}

impl TryFrom<WireCard> for CatalogCard {
    type Error = CatalogError;

    /// Multi-faced cards carry their art on the first face.
    fn try_from(card: WireCard) -> Result<Self, Self::Error> {
        let image_uri = card
            .image_uris
            .and_then(|uris| uris.png)
            .or_else(|| {
                card.card_faces
                    .into_iter()
                    .next()
                    .and_then(|face| face.image_uris)
                    .and_then(|uris| uris.png)
            })
            .ok_or_else(|| CatalogError::Malformed(format!("no image for card {}", card.id)))?;
        Ok(Self {
            id: card.id,
            name: card.name,
            image_uri,
            color_identity: card.color_identity,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_embeds_filter() {
        assert_eq!(
            search_query(" bolt "),
            "(unique:cards sort:usd game:paper not:foil not:atypical) && (bolt)"
        );
    }

    #[test]
    fn test_decode_single_faced_card() {
        let raw = r#"{
            "id": "abc", "name": "Lightning Bolt",
            "image_uris": { "png": "https://img/bolt.png", "small": "s" },
            "color_identity": ["R"]
        }"#;
        let wire: WireCard = serde_json::from_str(raw).unwrap();
        let card = CatalogCard::try_from(wire).unwrap();
        assert_eq!(card.image_uri, "https://img/bolt.png");
        assert_eq!(card.color_identity, vec!["R"]);
    }

    #[test]
    fn test_decode_falls_back_to_first_face() {
        let raw = r#"{
            "id": "dfc", "name": "Delver of Secrets // Insectile Aberration",
            "card_faces": [
                { "image_uris": { "png": "https://img/front.png" } },
                { "image_uris": { "png": "https://img/back.png" } }
            ]
        }"#;
        let wire: WireCard = serde_json::from_str(raw).unwrap();
        let card = CatalogCard::try_from(wire).unwrap();
        assert_eq!(card.image_uri, "https://img/front.png");
        assert!(card.color_identity.is_empty());
    }

    #[test]
    fn test_decode_without_image_is_malformed() {
        let wire: WireCard = serde_json::from_str(r#"{ "id": "x", "name": "Blank" }"#).unwrap();
        assert!(matches!(CatalogCard::try_from(wire), Err(CatalogError::Malformed(_))));
    }
}
