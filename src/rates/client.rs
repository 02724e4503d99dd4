use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::rates::snapshot::RateSnapshot;

pub type DynRateSourceClient = Arc<dyn RateSourceClient + Send + Sync>;

/// A client for the external rate feed.
#[async_trait]
pub trait RateSourceClient {
    /// Fetch the current rate snapshot.
    ///
    /// A transport failure, timeout, non-2xx response, or malformed body
    /// fails the call. Errors propagate to the caller unmodified; there is
    /// no retry and no fallback value.
    async fn fetch_snapshot(&self) -> anyhow::Result<RateSnapshot>;
}

/// A [`RateSourceClient`] backed by an HTTP endpoint serving the feed's
/// JSON shape.
pub struct HttpRateSourceClient {
    http_client: reqwest::Client,
    url: String,
}

impl HttpRateSourceClient {
    pub fn new(
        url: String,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;

        Ok(Self { http_client, url })
    }
}

#[async_trait]
impl RateSourceClient for HttpRateSourceClient {
    async fn fetch_snapshot(&self) -> anyhow::Result<RateSnapshot> {
        debug!(url = %self.url, "Fetching rate snapshot.");

        let snapshot = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Received rate snapshot from the upstream source.");

        Ok(snapshot)
    }
}
