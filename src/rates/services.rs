use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::{
    rates::{
        client::DynRateSourceClient,
        snapshot::RateSnapshot,
        transform::{self, NormalizedResponse},
    },
    repos::currencies::DynCurrencyRepo,
};

#[derive(Debug, Error)]
pub enum RatesError {
    /// The upstream rate source could not be reached or returned an
    /// unusable response.
    #[error("failed to fetch a snapshot from the upstream rate source")]
    Upstream(#[source] anyhow::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct RateService {
    rate_source: DynRateSourceClient,
    currency_repo: DynCurrencyRepo,
}

impl RateService {
    pub fn new(rate_source: DynRateSourceClient, currency_repo: DynCurrencyRepo) -> Self {
        Self {
            rate_source,
            currency_repo,
        }
    }

    /// Fetch the upstream snapshot without reshaping it.
    pub async fn original_snapshot(&self) -> Result<RateSnapshot, RatesError> {
        self.rate_source
            .fetch_snapshot()
            .await
            .map_err(RatesError::Upstream)
    }

    /// Fetch the upstream snapshot and merge it with the stored display
    /// names of the active currencies.
    pub async fn normalized_response(&self) -> Result<NormalizedResponse, RatesError> {
        let snapshot = self.original_snapshot().await?;

        let currencies = self.currency_repo.find_all_active().await?;
        debug!(
            currency_count = currencies.len(),
            "Building display name lookup for merge."
        );
        let display_names: HashMap<String, String> = currencies
            .into_iter()
            .map(|currency| (currency.code, currency.display_name))
            .collect();

        Ok(transform::merge(&snapshot, &display_names))
    }
}
