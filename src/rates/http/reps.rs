use serde::Serialize;

use crate::rates::transform;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub formatted_update_time: String,
    pub entries: Vec<NormalizedRateEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRateEntry {
    pub code: String,
    pub display_name: String,
    pub rate: f64,
}

impl From<&transform::NormalizedResponse> for NormalizedResponse {
    fn from(normalized: &transform::NormalizedResponse) -> Self {
        Self {
            formatted_update_time: normalized.formatted_update_time.clone(),
            entries: normalized
                .entries
                .iter()
                .map(NormalizedRateEntry::from)
                .collect(),
        }
    }
}

impl From<&transform::NormalizedRateEntry> for NormalizedRateEntry {
    fn from(entry: &transform::NormalizedRateEntry) -> Self {
        Self {
            code: entry.code.clone(),
            display_name: entry.display_name.clone(),
            rate: entry.rate,
        }
    }
}
