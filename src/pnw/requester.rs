//! HTTP client for the Politics and War API.
//!
//! This module provides the [`Gateway`] trait every command handler talks to,
//! and [`PnwRequester`], its implementation over the v1 JSON API.

use async_trait::async_trait;
use log::{debug, info};
use mockall::automock;
use reqwest::Client;
use serde_json::Value;

use crate::pnw::{
    GatewayError,
    counters::select_counters,
    response_structs::{AllianceMembersResponse, NationResponse, upstream_failure},
    structs::{Nation, Warchest},
    warchest::required_warchest,
};

/// Data access for the game.
///
/// Handlers only see this trait, which keeps them testable against
/// `MockGateway`.
#[automock]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetches a nation by its identifier.
    async fn find_nation(&self, nation_id: u64) -> Result<Nation, GatewayError>;
    /// Lists allied nations able to counter `aggressor`, best first.
    async fn counter_targets(&self, aggressor: &Nation) -> Result<Vec<Nation>, GatewayError>;
    /// Computes the recommended warchest for `city_count` cities.
    async fn find_warchest(&self, city_count: u32) -> Result<Warchest, GatewayError>;
    /// Link to a nation page.
    fn nation_url(&self, nation_id: u64) -> String;
    /// Link to a war timeline page.
    fn war_url(&self, war_id: u64) -> String;
}

/// [`Gateway`] backed by the Politics and War v1 API.
pub struct PnwRequester {
    /// Base url of the game
    url: String,
    /// API key, sent as the `key` query parameter
    api_key: String,
    /// Alliance whose members are offered as counters
    alliance_id: u64,
    /// Maximum number of counters returned
    counter_limit: usize,
    /// HTTP client
    client: Client,
}

impl PnwRequester {
    /// Create a new [PnwRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the game, without trailing slash.
    /// * `api_key` - The API key used for every request.
    /// * `alliance_id` - The alliance counters are picked from.
    /// * `counter_limit` - How many counters [`Gateway::counter_targets`] returns at most.
    pub fn new(url: &str, api_key: &str, alliance_id: u64, counter_limit: usize) -> Self {
        PnwRequester {
            url: url.to_string(),
            api_key: api_key.to_string(),
            alliance_id,
            counter_limit,
            client: Client::new(),
        }
    }

    /// GETs `url` and returns the JSON body.
    ///
    /// The API key is added here so it never ends up in a log line. For the
    /// same reason the request URL is stripped from transport errors.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, GatewayError> {
        debug!("request {}?{:?}", url, query);

        let body: Value = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        debug!("response from {} -> {}", url, body);

        Ok(body)
    }
}

#[async_trait]
impl Gateway for PnwRequester {
    /// Request `/api/nation/id={id}/`.
    ///
    /// The API answers `200` with `{"success": false, ...}` on failure. An
    /// unknown nation is mapped to [`GatewayError::NotFound`], any other
    /// failure (bad key, rate limit) to [`GatewayError::Rejected`].
    async fn find_nation(&self, nation_id: u64) -> Result<Nation, GatewayError> {
        info!("request nation {}", nation_id);
        let url = format!("{}/api/nation/id={}/", self.url, nation_id);

        let body = self.get_json(&url, &[]).await?;
        if let Some(message) = upstream_failure(&body) {
            debug!("nation {} lookup failed: {}", nation_id, message);
            if is_unknown_nation(&message) {
                return Err(GatewayError::NotFound(nation_id));
            }
            return Err(GatewayError::Rejected(message));
        }

        let response: NationResponse = serde_json::from_value(body)?;
        Ok(response.into())
    }

    /// Request `/api/alliance-members/?allianceid={id}` and keep the members
    /// able to counter `aggressor`.
    async fn counter_targets(&self, aggressor: &Nation) -> Result<Vec<Nation>, GatewayError> {
        info!(
            "request counters in alliance {} against [{}]",
            self.alliance_id, aggressor
        );
        let url = format!("{}/api/alliance-members/", self.url);

        let body = self
            .get_json(&url, &[("allianceid", self.alliance_id.to_string())])
            .await?;
        if let Some(message) = upstream_failure(&body) {
            return Err(GatewayError::Rejected(message));
        }

        let response: AllianceMembersResponse = serde_json::from_value(body)?;
        let members = response.nations.into_iter().map(Nation::from).collect();

        Ok(select_counters(aggressor, members, self.counter_limit))
    }

    async fn find_warchest(&self, city_count: u32) -> Result<Warchest, GatewayError> {
        Ok(required_warchest(city_count))
    }

    fn nation_url(&self, nation_id: u64) -> String {
        format!("{}/nation/id={}", self.url, nation_id)
    }

    fn war_url(&self, war_id: u64) -> String {
        format!("{}/nation/war/timeline/war={}", self.url, war_id)
    }
}

/// Whether an upstream error message means the nation doesn't exist.
fn is_unknown_nation(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("doesn't exist")
        || message.contains("does not exist")
        || message.contains("not found")
}
