use std::collections::HashMap;

use chrono::DateTime;
use tracing::{error, warn};

use crate::rates::snapshot::RateSnapshot;

/// Marker emitted when a display name or the update time is unavailable.
pub const UNAVAILABLE: &str = "N/A";

const OUTPUT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRateEntry {
    pub code: String,
    pub display_name: String,
    pub rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedResponse {
    pub formatted_update_time: String,
    pub entries: Vec<NormalizedRateEntry>,
}

/// Merge a rate snapshot with locally stored display names into the
/// normalized response shape.
///
/// This is a pure function of its inputs. Every priced entry in the snapshot
/// produces exactly one output entry; codes without a display name in
/// `display_names` fall back to [`UNAVAILABLE`] instead of being dropped.
pub fn merge(
    snapshot: &RateSnapshot,
    display_names: &HashMap<String, String>,
) -> NormalizedResponse {
    let formatted_update_time = match snapshot.updated_iso() {
        Some(updated_iso) => format_update_time(updated_iso),
        None => {
            warn!("Rate snapshot is missing its update time.");

            UNAVAILABLE.to_owned()
        }
    };

    let entries = snapshot
        .priced_entries()
        .map(|(code, rate)| {
            let display_name = match display_names.get(code) {
                Some(name) => name.clone(),
                None => {
                    warn!(%code, "No display name stored for currency code.");

                    UNAVAILABLE.to_owned()
                }
            };

            NormalizedRateEntry {
                code: code.to_owned(),
                display_name,
                rate,
            }
        })
        .collect();

    NormalizedResponse {
        formatted_update_time,
        entries,
    }
}

/// Reformat an ISO-8601 timestamp to the fixed display pattern, keeping the
/// timestamp's embedded offset.
///
/// An unparseable timestamp is echoed back unchanged. Degrading to the raw
/// string keeps the rest of the response usable when the upstream feed
/// changes its time format.
fn format_update_time(updated_iso: &str) -> String {
    match DateTime::parse_from_rfc3339(updated_iso) {
        Ok(parsed) => parsed.format(OUTPUT_TIME_FORMAT).to_string(),
        Err(parse_error) => {
            error!(
                %updated_iso,
                ?parse_error,
                "Failed to parse snapshot update time. Returning the original string."
            );

            updated_iso.to_owned()
        }
    }
}
