//! Geolocation lookups over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::types::GeoApiResponse;
use crate::config::GEO_FIELDS;
use crate::error_handling::LookupError;
use crate::models::GeoRecord;
use crate::retry::RetryPolicy;

/// Geolocation adapter seam.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Looks up `ip`.
    ///
    /// A provider-reported failure comes back as `LookupError::Provider`; the
    /// caller turns any error into the all-unknown record.
    async fn geolocate(&self, ip: &str) -> Result<GeoRecord, LookupError>;
}

/// Client for an ip-api.com compatible service.
pub struct IpApiClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    retry: RetryPolicy,
}

impl IpApiClient {
    pub fn new(client: Arc<reqwest::Client>, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn url(&self, ip: &str) -> String {
        format!("{}/json/{}", self.base_url, ip)
    }

    /// One request. Non-2xx statuses are transport failures so they get retried.
    async fn fetch(&self, ip: &str) -> Result<GeoApiResponse, LookupError> {
        let response = self
            .client
            .get(self.url(ip))
            .query(&[("fields", GEO_FIELDS)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!("HTTP status {status}")));
        }

        response
            .json::<GeoApiResponse>()
            .await
            .map_err(|e| LookupError::Provider(format!("malformed geolocation answer: {e}")))
    }
}

#[async_trait]
impl GeoLocator for IpApiClient {
    async fn geolocate(&self, ip: &str) -> Result<GeoRecord, LookupError> {
        let answer = self
            .retry
            .run(|| self.fetch(ip), |e: &LookupError| {
                let retry = e.is_retriable(&[]);
                if retry {
                    debug!("Geolocation of {} failed, retrying: {}", ip, e);
                }
                retry
            })
            .await?;

        if !answer.is_success() {
            let reason = answer.message.unwrap_or_else(|| answer.status.clone());
            return Err(LookupError::Provider(reason));
        }
        Ok(answer.into_record())
    }
}
