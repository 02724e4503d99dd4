use chrono::Utc;
use semval::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    currencies::domain::{CurrencyFields, CurrencyPatch, PatchField},
    models::currencies::Currency,
    repos::currencies::DynCurrencyRepo,
};

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The operation targeted a code with no matching record, or no active
    /// record for operations restricted to active ones.
    #[error("{0}")]
    NotFound(String),
    /// A create targeted a code with an existing active record.
    #[error("{0}")]
    AlreadyExists(String),
    /// A request field failed validation.
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Lifecycle operations for currency records.
///
/// Each record moves between three states keyed by its code: absent, active,
/// and inactive. Records are soft deleted by clearing the active flag and
/// are never physically removed, so a code stays unique across both states.
#[derive(Clone)]
pub struct CurrencyService {
    currency_repo: DynCurrencyRepo,
}

impl CurrencyService {
    pub fn new(currency_repo: DynCurrencyRepo) -> Self {
        Self { currency_repo }
    }

    pub async fn find_all_active(&self) -> Result<Vec<Currency>, LifecycleError> {
        Ok(self.currency_repo.find_all_active().await?)
    }

    pub async fn find_active_by_code(&self, code: &str) -> Result<Currency, LifecycleError> {
        self.get_active_or_not_found(code).await
    }

    pub async fn search_active_by_display_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<Currency>, LifecycleError> {
        Ok(self
            .currency_repo
            .search_active_by_display_name(fragment)
            .await?)
    }

    /// Create a currency, or reactivate and overwrite a soft-deleted one.
    pub async fn create(&self, fields: CurrencyFields) -> Result<Currency, LifecycleError> {
        if let Err(context) = fields.validate() {
            return Err(invalid_fields(context));
        }

        match self.currency_repo.find_by_code(&fields.code).await? {
            Some(existing) if existing.is_active => {
                warn!(code = %fields.code, "Attempted to create a currency that already exists.");

                Err(LifecycleError::AlreadyExists(format!(
                    "Currency with code '{}' already exists.",
                    fields.code
                )))
            }
            Some(existing) => {
                info!(code = %fields.code, "Reactivating inactive currency on create.");

                let reactivated = Currency {
                    display_name: fields.display_name,
                    symbol: fields.symbol,
                    is_active: true,
                    updated_at: Utc::now(),
                    ..existing
                };

                Ok(self.currency_repo.save(reactivated).await?)
            }
            None => {
                info!(code = %fields.code, "Creating new currency.");

                let now = Utc::now();
                let currency = Currency {
                    code: fields.code,
                    display_name: fields.display_name,
                    symbol: fields.symbol,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };

                Ok(self.currency_repo.save(currency).await?)
            }
        }
    }

    /// Fully replace the writable fields of an active currency.
    pub async fn replace(
        &self,
        code: &str,
        fields: CurrencyFields,
    ) -> Result<Currency, LifecycleError> {
        if code != fields.code {
            return Err(LifecycleError::InvalidArgument(format!(
                "Path code '{}' does not match request body code '{}'.",
                code, fields.code
            )));
        }

        if let Err(context) = fields.validate() {
            return Err(invalid_fields(context));
        }

        let existing = self.get_active_or_not_found(code).await?;

        // A full replacement overwrites both fields regardless of whether
        // the provided values differ from the stored ones.
        let replaced = Currency {
            display_name: fields.display_name,
            symbol: fields.symbol,
            updated_at: Utc::now(),
            ..existing
        };

        Ok(self.currency_repo.save(replaced).await?)
    }

    /// Apply a tri-state patch to an active currency.
    ///
    /// Both fields are validated before either is applied. An empty patch
    /// returns the stored record unchanged.
    pub async fn partial_update(
        &self,
        code: &str,
        patch: CurrencyPatch,
    ) -> Result<Currency, LifecycleError> {
        if let Err(context) = patch.validate() {
            return Err(invalid_patch(context));
        }

        let mut currency = self.get_active_or_not_found(code).await?;

        if patch.is_empty() {
            debug!(%code, "Received empty patch; leaving currency untouched.");

            return Ok(currency);
        }

        match patch.display_name {
            PatchField::Unset => {}
            // Rejected by validation above.
            PatchField::Null => unreachable!("null display name passed validation"),
            PatchField::Value(display_name) => currency.display_name = display_name,
        }

        match patch.symbol {
            PatchField::Unset => {}
            PatchField::Null => currency.symbol = None,
            PatchField::Value(symbol) => currency.symbol = Some(symbol),
        }

        currency.updated_at = Utc::now();

        Ok(self.currency_repo.save(currency).await?)
    }

    /// Soft delete an active currency by clearing its active flag.
    pub async fn soft_delete(&self, code: &str) -> Result<(), LifecycleError> {
        let mut currency = self.get_active_or_not_found(code).await?;

        currency.is_active = false;
        currency.updated_at = Utc::now();

        self.currency_repo.save(currency).await?;

        info!(%code, "Soft-deleted currency.");

        Ok(())
    }

    /// Reactivate a soft-deleted currency.
    ///
    /// Reactivating an already active currency is a no-op that returns the
    /// stored record unchanged.
    pub async fn reactivate(&self, code: &str) -> Result<Currency, LifecycleError> {
        let currency = self
            .currency_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| {
                LifecycleError::NotFound(format!(
                    "Cannot reactivate. Currency not found with code: {code}"
                ))
            })?;

        if currency.is_active {
            warn!(%code, "Attempted to reactivate an already active currency. No action taken.");

            return Ok(currency);
        }

        let reactivated = Currency {
            is_active: true,
            updated_at: Utc::now(),
            ..currency
        };

        let saved = self.currency_repo.save(reactivated).await?;

        info!(%code, "Reactivated currency.");

        Ok(saved)
    }

    async fn get_active_or_not_found(&self, code: &str) -> Result<Currency, LifecycleError> {
        self.currency_repo
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| {
                LifecycleError::NotFound(format!("Active currency not found with code: {code}"))
            })
    }
}

fn invalid_fields(
    context: ValidationContext<crate::currencies::domain::CurrencyInvalidity>,
) -> LifecycleError {
    let message = context
        .into_iter()
        .next()
        .map(|invalidity| invalidity.message())
        .unwrap_or("Invalid request.");

    LifecycleError::InvalidArgument(message.to_owned())
}

fn invalid_patch(
    context: ValidationContext<crate::currencies::domain::PatchInvalidity>,
) -> LifecycleError {
    let message = context
        .into_iter()
        .next()
        .map(|invalidity| invalidity.message())
        .unwrap_or("Invalid request.");

    LifecycleError::InvalidArgument(message.to_owned())
}

#[cfg(test)]
mod test {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::repos::currencies::CurrencyRepo;

    /// An in-memory stand-in for the Postgres-backed repository.
    #[derive(Default)]
    struct InMemoryCurrencyRepo {
        currencies: Mutex<HashMap<String, Currency>>,
    }

    #[async_trait]
    impl CurrencyRepo for InMemoryCurrencyRepo {
        async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<Currency>> {
            Ok(self.currencies.lock().unwrap().get(code).cloned())
        }

        async fn find_active_by_code(&self, code: &str) -> anyhow::Result<Option<Currency>> {
            Ok(self
                .currencies
                .lock()
                .unwrap()
                .get(code)
                .filter(|currency| currency.is_active)
                .cloned())
        }

        async fn find_all_active(&self) -> anyhow::Result<Vec<Currency>> {
            let mut currencies = self
                .currencies
                .lock()
                .unwrap()
                .values()
                .filter(|currency| currency.is_active)
                .cloned()
                .collect::<Vec<_>>();
            currencies.sort_by(|a, b| a.code.cmp(&b.code));

            Ok(currencies)
        }

        async fn search_active_by_display_name(
            &self,
            fragment: &str,
        ) -> anyhow::Result<Vec<Currency>> {
            let mut currencies = self
                .currencies
                .lock()
                .unwrap()
                .values()
                .filter(|currency| {
                    currency.is_active && currency.display_name.contains(fragment)
                })
                .cloned()
                .collect::<Vec<_>>();
            currencies.sort_by(|a, b| a.code.cmp(&b.code));

            Ok(currencies)
        }

        async fn save(&self, currency: Currency) -> anyhow::Result<Currency> {
            self.currencies
                .lock()
                .unwrap()
                .insert(currency.code.clone(), currency.clone());

            Ok(currency)
        }
    }

    fn service_with_repo() -> (CurrencyService, Arc<InMemoryCurrencyRepo>) {
        let repo = Arc::new(InMemoryCurrencyRepo::default());
        let service = CurrencyService::new(repo.clone());

        (service, repo)
    }

    fn us_dollar() -> CurrencyFields {
        CurrencyFields {
            code: "USD".to_owned(),
            display_name: "US Dollar".to_owned(),
            symbol: Some("$".to_owned()),
        }
    }

    #[tokio::test]
    async fn create_fresh_code() {
        let (service, _) = service_with_repo();

        let created = service
            .create(us_dollar())
            .await
            .expect("creating a fresh code should succeed");

        assert_eq!("USD", created.code);
        assert_eq!("US Dollar", created.display_name);
        assert_eq!(Some("$".to_owned()), created.symbol);
        assert!(created.is_active);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn create_duplicate_active_code() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let error = service
            .create(us_dollar())
            .await
            .expect_err("duplicate active code should be rejected");

        assert!(matches!(error, LifecycleError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn create_reactivates_inactive_code() {
        let (service, _) = service_with_repo();
        let original = service.create(us_dollar()).await.expect("setup create");
        service.soft_delete("USD").await.expect("setup soft delete");

        let replacement = CurrencyFields {
            code: "USD".to_owned(),
            display_name: "United States Dollar".to_owned(),
            symbol: None,
        };
        let recreated = service
            .create(replacement)
            .await
            .expect("create on an inactive code should reactivate it");

        assert!(recreated.is_active);
        assert_eq!("United States Dollar", recreated.display_name);
        assert_eq!(None, recreated.symbol);
        // The original creation time survives the reactivation.
        assert_eq!(original.created_at, recreated.created_at);
    }

    #[tokio::test]
    async fn create_invalid_fields() {
        let (service, repo) = service_with_repo();

        let error = service
            .create(CurrencyFields {
                code: "US".to_owned(),
                display_name: "US Dollar".to_owned(),
                symbol: None,
            })
            .await
            .expect_err("short code should be rejected");

        assert!(matches!(error, LifecycleError::InvalidArgument(_)));
        assert!(repo.currencies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_overwrites_all_fields() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let replaced = service
            .replace(
                "USD",
                CurrencyFields {
                    code: "USD".to_owned(),
                    display_name: "United States Dollar".to_owned(),
                    symbol: None,
                },
            )
            .await
            .expect("replacing an active currency should succeed");

        assert_eq!("United States Dollar", replaced.display_name);
        assert_eq!(None, replaced.symbol);
    }

    #[tokio::test]
    async fn replace_path_body_code_mismatch() {
        let (service, repo) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let error = service
            .replace(
                "EUR",
                CurrencyFields {
                    code: "USD".to_owned(),
                    display_name: "US Dollar".to_owned(),
                    symbol: None,
                },
            )
            .await
            .expect_err("mismatched codes should be rejected");

        assert!(matches!(error, LifecycleError::InvalidArgument(_)));
        // The store must not be touched on a mismatch.
        let stored = repo.currencies.lock().unwrap().get("USD").cloned().unwrap();
        assert_eq!(Some("$".to_owned()), stored.symbol);
    }

    #[tokio::test]
    async fn replace_inactive_is_not_found() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");
        service.soft_delete("USD").await.expect("setup soft delete");

        let error = service
            .replace("USD", us_dollar())
            .await
            .expect_err("replacing an inactive currency should fail");

        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_update_clears_symbol_with_explicit_null() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let patched = service
            .partial_update(
                "USD",
                CurrencyPatch {
                    symbol: PatchField::Null,
                    ..Default::default()
                },
            )
            .await
            .expect("clearing the symbol should succeed");

        assert_eq!(None, patched.symbol);
        assert_eq!("US Dollar", patched.display_name);
    }

    #[tokio::test]
    async fn partial_update_empty_patch_is_a_noop() {
        let (service, _) = service_with_repo();
        let created = service.create(us_dollar()).await.expect("setup create");

        let patched = service
            .partial_update("USD", CurrencyPatch::default())
            .await
            .expect("an empty patch should succeed");

        assert_eq!(created, patched);
    }

    #[tokio::test]
    async fn partial_update_sets_display_name() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let patched = service
            .partial_update(
                "USD",
                CurrencyPatch {
                    display_name: PatchField::Value("Greenback".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .expect("setting the display name should succeed");

        assert_eq!("Greenback", patched.display_name);
        assert_eq!(Some("$".to_owned()), patched.symbol);
    }

    #[tokio::test]
    async fn partial_update_validates_before_mutating() {
        let (service, repo) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let error = service
            .partial_update(
                "USD",
                CurrencyPatch {
                    display_name: PatchField::Value("   ".to_owned()),
                    symbol: PatchField::Value("US$".to_owned()),
                },
            )
            .await
            .expect_err("a blank display name should be rejected");

        assert!(matches!(error, LifecycleError::InvalidArgument(_)));
        // Neither field may be applied when any field fails validation.
        let stored = repo.currencies.lock().unwrap().get("USD").cloned().unwrap();
        assert_eq!("US Dollar", stored.display_name);
        assert_eq!(Some("$".to_owned()), stored.symbol);
    }

    #[tokio::test]
    async fn partial_update_null_display_name_is_rejected() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let error = service
            .partial_update(
                "USD",
                CurrencyPatch {
                    display_name: PatchField::Null,
                    ..Default::default()
                },
            )
            .await
            .expect_err("a null display name should be rejected");

        assert!(matches!(error, LifecycleError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn soft_delete_active_currency() {
        let (service, repo) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        service
            .soft_delete("USD")
            .await
            .expect("soft delete of an active currency should succeed");

        let stored = repo.currencies.lock().unwrap().get("USD").cloned().unwrap();
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn soft_delete_inactive_is_not_found() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");
        service.soft_delete("USD").await.expect("setup soft delete");

        let error = service
            .soft_delete("USD")
            .await
            .expect_err("repeated soft delete should fail");

        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn soft_delete_absent_is_not_found() {
        let (service, _) = service_with_repo();

        let error = service
            .soft_delete("USD")
            .await
            .expect_err("soft delete of an absent code should fail");

        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn reactivate_inactive_currency() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");
        service.soft_delete("USD").await.expect("setup soft delete");

        let reactivated = service
            .reactivate("USD")
            .await
            .expect("reactivating an inactive currency should succeed");

        assert!(reactivated.is_active);
    }

    #[tokio::test]
    async fn reactivate_active_currency_is_idempotent() {
        let (service, _) = service_with_repo();
        let created = service.create(us_dollar()).await.expect("setup create");

        let reactivated = service
            .reactivate("USD")
            .await
            .expect("reactivating an active currency should be a no-op");

        assert_eq!(created, reactivated);
        assert_eq!(created.updated_at, reactivated.updated_at);
    }

    #[tokio::test]
    async fn reactivate_absent_is_not_found() {
        let (service, _) = service_with_repo();

        let error = service
            .reactivate("USD")
            .await
            .expect_err("reactivating an absent code should fail");

        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn reads_exclude_inactive_records() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");
        service
            .create(CurrencyFields {
                code: "EUR".to_owned(),
                display_name: "Euro".to_owned(),
                symbol: Some("€".to_owned()),
            })
            .await
            .expect("setup create");
        service.soft_delete("EUR").await.expect("setup soft delete");

        let active = service.find_all_active().await.expect("list active");
        assert_eq!(1, active.len());
        assert_eq!("USD", active[0].code);

        let error = service
            .find_active_by_code("EUR")
            .await
            .expect_err("inactive currency should not be readable");
        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn search_is_case_sensitive() {
        let (service, _) = service_with_repo();
        service.create(us_dollar()).await.expect("setup create");

        let matches = service
            .search_active_by_display_name("Dollar")
            .await
            .expect("search");
        assert_eq!(1, matches.len());

        let no_matches = service
            .search_active_by_display_name("dollar")
            .await
            .expect("search");
        assert!(no_matches.is_empty());
    }
}
