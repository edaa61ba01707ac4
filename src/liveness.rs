//! HTTP liveness probe.
//!
//! A target is live when a plain GET over HTTP or HTTPS ends (after
//! redirects) in a 200 response. Both schemes are tried concurrently and the
//! first one that answers wins.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{select_ok, BoxFuture, FutureExt};
use log::debug;
use reqwest::StatusCode;

use crate::error_handling::LookupError;
use crate::models::Scheme;

/// Liveness adapter seam.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Scheme that answered with a 200, or `None` when neither did.
    async fn probe(&self, host: &str) -> Option<Scheme>;
}

/// Probe backed by a shared `reqwest` client.
///
/// The request timeout is the client's own (see `init_probe_client`).
pub struct HttpProbe {
    client: Arc<reqwest::Client>,
}

impl HttpProbe {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    async fn check(&self, scheme: Scheme, host: &str) -> Result<Scheme, LookupError> {
        let url = format!("{}://{}/", scheme, host);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            Ok(scheme)
        } else {
            Err(LookupError::Provider(format!("{url} answered {status}")))
        }
    }
}

#[async_trait]
impl LivenessProbe for HttpProbe {
    async fn probe(&self, host: &str) -> Option<Scheme> {
        let attempts: Vec<BoxFuture<'_, Result<Scheme, LookupError>>> = vec![
            self.check(Scheme::Http, host).boxed(),
            self.check(Scheme::Https, host).boxed(),
        ];
        match select_ok(attempts).await {
            Ok((scheme, _pending)) => {
                debug!("{} is live over {}", host, scheme);
                Some(scheme)
            }
            Err(e) => {
                debug!("{} is not live: {}", host, e);
                None
            }
        }
    }
}
