use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    currencies::domain::{CurrencyFields, CurrencyPatch, PatchField},
    models,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub display_name: String,
    pub symbol: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&models::currencies::Currency> for Currency {
    fn from(currency: &models::currencies::Currency) -> Self {
        Self {
            code: currency.code.clone(),
            display_name: currency.display_name.clone(),
            symbol: currency.symbol.clone(),
            active: currency.is_active,
            created_at: currency.created_at,
            updated_at: currency.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    pub code: String,
    pub display_name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl From<NewCurrency> for CurrencyFields {
    fn from(rep: NewCurrency) -> Self {
        Self {
            code: rep.code,
            display_name: rep.display_name,
            symbol: rep.symbol,
        }
    }
}

/// A partial-update request body.
///
/// Absent fields deserialize to [`PatchField::Unset`], which is why both
/// fields carry a serde default instead of being plain options.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCurrency {
    #[serde(default)]
    pub display_name: PatchField<String>,
    #[serde(default)]
    pub symbol: PatchField<String>,
}

impl From<UpdateCurrency> for CurrencyPatch {
    fn from(rep: UpdateCurrency) -> Self {
        Self {
            display_name: rep.display_name,
            symbol: rep.symbol,
        }
    }
}
