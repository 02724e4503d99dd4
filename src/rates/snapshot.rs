use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One fetched copy of the external rate feed at a point in time.
///
/// The `bpi` mapping is keyed by currency code. The upstream feed decides
/// which codes appear, so the key set is open and must not be modeled as a
/// fixed set of named fields. Every field is optional because the feed is
/// proxied as-is and reshaping has explicit fallbacks for missing data.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RateSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(rename = "chartName", skip_serializing_if = "Option::is_none")]
    pub chart_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<SnapshotTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpi: Option<HashMap<String, RateEntry>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SnapshotTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(rename = "updatedISO", skip_serializing_if = "Option::is_none")]
    pub updated_iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updateduk: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RateEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "rate_float", skip_serializing_if = "Option::is_none")]
    pub rate_float: Option<f64>,
}

impl RateSnapshot {
    /// Iterate the snapshot's rate entries that carry both a code and a
    /// float rate.
    ///
    /// Entries missing either field are absent from the iterated set rather
    /// than being defaulted. Iteration order follows the underlying mapping
    /// and is not sorted.
    pub fn priced_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.bpi.iter().flat_map(|bpi| {
            bpi.values().filter_map(|entry| {
                Some((entry.code.as_deref()?, entry.rate_float?))
            })
        })
    }

    pub fn updated_iso(&self) -> Option<&str> {
        self.time.as_ref()?.updated_iso.as_deref()
    }
}
