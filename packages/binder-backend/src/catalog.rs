/// HTTP client for the Scryfall card catalog.
use std::time::Duration;

use binder_core::catalog::{search_query, Catalog, CatalogCard, CatalogError, WireCard, WireError, WireList};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::StatusCode;

const USER_AGENT: &str = concat!("binder-backend/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, CatalogError> {
        self.http
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))
    }

    async fn error_body(response: reqwest::Response) -> WireError {
        response.json::<WireError>().await.unwrap_or_default()
    }
}

impl Catalog for ScryfallClient {
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<CatalogCard>, CatalogError> {
        let query = search_query(text);
        let url = format!(
            "{}/cards/search?q={}",
            self.base_url,
            utf8_percent_encode(&query, NON_ALPHANUMERIC)
        );
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            if status == StatusCode::NOT_FOUND || body.code == "not_found" {
                return Ok(Vec::new());
            }
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: body.details,
            });
        }

        let list: WireList = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let cards = list
            .data
            .into_iter()
            .filter_map(|wire| match CatalogCard::try_from(wire) {
                Ok(card) => Some(card),
                Err(e) => {
                    log::warn!(target: "binder.catalog", "Dropping search result: {}", e);
                    None
                }
            })
            .take(limit)
            .collect();
        Ok(cards)
    }

    async fn get_by_id(&self, id: &str) -> Result<CatalogCard, CatalogError> {
        let url = format!(
            "{}/cards/{}",
            self.base_url,
            utf8_percent_encode(id, NON_ALPHANUMERIC)
        );
        let response = self.get(url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: body.details,
            });
        }

        let wire: WireCard = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        CatalogCard::try_from(wire)
    }
}
