use chrono::{DateTime, Utc};

/// A currency reference record as persisted in a repository.
///
/// Records are never physically deleted. `is_active` acts as a soft-delete
/// flag, and `code` stays unique across active and inactive records.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Currency {
    pub code: String,
    pub display_name: String,
    pub symbol: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
