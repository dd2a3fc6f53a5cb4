//! HTTP client for the bet catalog service
//!
//! `GET {base_url}/bets?ids=1,2,3` answers with a JSON array of bets.

use super::BetLookup;
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::models::{Bet, BetId};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeSet;
use url::Url;

pub struct HttpBetCatalog {
    client: Client,
    bets_url: Url,
}

impl HttpBetCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid catalog URL: {}", e)))?;
        let bets_url = Self::bets_url(base)?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, bets_url })
    }

    fn bets_url(mut base: Url) -> Result<Url> {
        // Keep any path prefix on the base URL
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("bets")
            .map_err(|e| Error::Config(format!("Invalid catalog URL: {}", e)))
    }

    fn ids_param(ids: &BTreeSet<BetId>) -> String {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl BetLookup for HttpBetCatalog {
    async fn find_bets_by_ids(&self, ids: &BTreeSet<BetId>) -> Result<Vec<Bet>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = Self::ids_param(ids);
        tracing::debug!(url = %self.bets_url, %ids, "fetching bets from catalog");

        let response = self
            .client
            .get(self.bets_url.clone())
            .query(&[("ids", ids.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Catalog(format!(
                "Catalog answered {} for ids [{}]",
                status, ids
            )));
        }

        response
            .json::<Vec<Bet>>()
            .await
            .map_err(|e| Error::Catalog(format!("Malformed catalog response: {}", e)))
    }
}
