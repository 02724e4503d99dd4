use std::sync::Arc;

use async_trait::async_trait;

use crate::{database::PostgresConnection, models};

pub type DynCurrencyRepo = Arc<dyn CurrencyRepo + Send + Sync>;

/// Storage operations for currency reference records.
///
/// Every read except [`CurrencyRepo::find_by_code`] operates over active
/// records only; soft-deleted records are invisible to them.
#[async_trait]
pub trait CurrencyRepo {
    /// Find a record by its code regardless of its active state.
    async fn find_by_code(&self, code: &str)
        -> anyhow::Result<Option<models::currencies::Currency>>;

    /// Find an active record by its code.
    async fn find_active_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<models::currencies::Currency>>;

    /// List all active records, ordered by code.
    async fn find_all_active(&self) -> anyhow::Result<Vec<models::currencies::Currency>>;

    /// List active records whose display name contains `fragment`.
    ///
    /// The containment match is case-sensitive.
    async fn search_active_by_display_name(
        &self,
        fragment: &str,
    ) -> anyhow::Result<Vec<models::currencies::Currency>>;

    /// Insert the record, or overwrite the stored record with the same code.
    async fn save(
        &self,
        currency: models::currencies::Currency,
    ) -> anyhow::Result<models::currencies::Currency>;
}

const CURRENCY_COLUMNS: &str = "code, display_name, symbol, is_active, created_at, updated_at";

#[async_trait]
impl CurrencyRepo for PostgresConnection {
    async fn find_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<models::currencies::Currency>> {
        let currency = sqlx::query_as::<_, models::currencies::Currency>(&format!(
            "SELECT {CURRENCY_COLUMNS} FROM currency WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&**self)
        .await?;

        Ok(currency)
    }

    async fn find_active_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<models::currencies::Currency>> {
        let currency = sqlx::query_as::<_, models::currencies::Currency>(&format!(
            "SELECT {CURRENCY_COLUMNS} FROM currency WHERE code = $1 AND is_active"
        ))
        .bind(code)
        .fetch_optional(&**self)
        .await?;

        Ok(currency)
    }

    async fn find_all_active(&self) -> anyhow::Result<Vec<models::currencies::Currency>> {
        let currencies = sqlx::query_as::<_, models::currencies::Currency>(&format!(
            "SELECT {CURRENCY_COLUMNS} FROM currency WHERE is_active ORDER BY code"
        ))
        .fetch_all(&**self)
        .await?;

        Ok(currencies)
    }

    async fn search_active_by_display_name(
        &self,
        fragment: &str,
    ) -> anyhow::Result<Vec<models::currencies::Currency>> {
        // POSITION is a plain case-sensitive containment match, and unlike
        // LIKE it does not treat '%' or '_' in the fragment as wildcards.
        let currencies = sqlx::query_as::<_, models::currencies::Currency>(&format!(
            r#"
            SELECT {CURRENCY_COLUMNS}
            FROM currency
            WHERE is_active AND POSITION($1 IN display_name) > 0
            ORDER BY code
            "#
        ))
        .bind(fragment)
        .fetch_all(&**self)
        .await?;

        Ok(currencies)
    }

    async fn save(
        &self,
        currency: models::currencies::Currency,
    ) -> anyhow::Result<models::currencies::Currency> {
        let saved = sqlx::query_as::<_, models::currencies::Currency>(&format!(
            r#"
            INSERT INTO currency (code, display_name, symbol, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (code) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                symbol = EXCLUDED.symbol,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            RETURNING {CURRENCY_COLUMNS}
            "#
        ))
        .bind(currency.code)
        .bind(currency.display_name)
        .bind(currency.symbol)
        .bind(currency.is_active)
        .bind(currency.created_at)
        .bind(currency.updated_at)
        .fetch_one(&**self)
        .await?;

        Ok(saved)
    }
}
