//! Blocking client for the Tranzy open-data API.
//!
//! Every request carries `Accept: application/json`, the `X-API-KEY` header and
//! an `X-Agency-Id` header selecting the agency. Non-success statuses are
//! reported as [`Error::UpstreamStatus`].

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{TransitConfig, API_KEY_ENV};
use crate::error::{Error, Result};
use crate::model::{Route, ShapePoint, Stop, Trip};
use crate::source::TransitSource;

const API_KEY_HEADER: &str = "X-API-KEY";
const AGENCY_HEADER: &str = "X-Agency-Id";

/// Live [`TransitSource`] backed by the Tranzy HTTP API.
#[derive(Debug, Clone)]
pub struct TranzyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TranzyClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`Error::MissingApiKey`] when no key is configured.
    pub fn new(config: &TransitConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(Error::MissingApiKey { env: API_KEY_ENV })?;
        Self::with_key(&config.base_url, api_key, config.timeout)
    }

    pub fn with_key(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn get<T: DeserializeOwned>(
        &self,
        agency_id: &str,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(resource);
        debug!(url = %url, agency_id, ?query, "requesting transit data");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .header(AGENCY_HEADER, agency_id)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<T>()?)
    }
}

impl TransitSource for TranzyClient {
    fn name(&self) -> &'static str {
        "tranzy"
    }

    fn stops(&self, agency_id: &str) -> Result<Vec<Stop>> {
        self.get(agency_id, "stops", &[])
    }

    fn trips(&self, agency_id: &str) -> Result<Vec<Trip>> {
        self.get(agency_id, "trips", &[])
    }

    fn shape(&self, agency_id: &str, shape_id: &str) -> Result<Vec<ShapePoint>> {
        self.get(agency_id, "shapes", &[("shape_id", shape_id)])
    }

    fn route(&self, agency_id: &str, route_id: &str) -> Result<Option<Route>> {
        let routes: Vec<Route> = self.get(agency_id, "routes", &[("route_id", route_id)])?;
        Ok(routes.into_iter().find(|route| route.route_id == route_id))
    }
}

fn user_agent() -> String {
    format!("tranzit-lib/{}", env!("CARGO_PKG_VERSION"))
}
