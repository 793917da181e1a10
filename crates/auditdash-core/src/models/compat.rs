//! Upgrades for older run document shapes
//!
//! Older service builds wrote `processingTime` where the canonical schema uses
//! `processingTimeMs`, and some omitted `imageSummaries` entirely. Current
//! builds write `"imageSummaries": null` for text-only runs; that is normalized
//! to an empty list without being reported as legacy. The upgrade
//! runs on the raw JSON at the data-access boundary so the typed models only
//! ever see the canonical shape.

use serde_json::Value;
use tracing::{debug, warn};

const LEGACY_PROCESSING_TIME: &str = "processingTime";
const PROCESSING_TIME_MS: &str = "processingTimeMs";

/// Collections whose elements carry a per-element processing time
const TIMED_COLLECTIONS: [&str; 3] = ["entrySummaries", "imageSummaries", "webContentSummaries"];

/// What the upgrade had to change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompatReport {
    /// Elements whose legacy processing-time key was renamed
    pub upgraded_fields: usize,
    /// Legacy keys dropped because the canonical key was also present
    pub dropped_fields: usize,
    /// Collections that were missing and filled in as empty
    pub filled_collections: usize,
    /// Collections that were `null` and replaced with an empty list
    pub null_collections: usize,
}

impl CompatReport {
    /// No legacy shapes were found. A `null` collection does not count.
    pub fn is_clean(&self) -> bool {
        self.upgraded_fields == 0 && self.dropped_fields == 0 && self.filled_collections == 0
    }
}

/// Rewrite a run document in place to the canonical schema.
///
/// Non-object documents are left untouched; typed decoding reports them.
pub fn upgrade_run_document(doc: &mut Value) -> CompatReport {
    let mut report = CompatReport::default();
    let Some(obj) = doc.as_object_mut() else {
        return report;
    };

    for collection in TIMED_COLLECTIONS {
        let Some(Value::Array(elements)) = obj.get_mut(collection) else {
            continue;
        };
        for element in elements.iter_mut().filter_map(Value::as_object_mut) {
            let Some(legacy) = element.remove(LEGACY_PROCESSING_TIME) else {
                continue;
            };
            if element.contains_key(PROCESSING_TIME_MS) {
                report.dropped_fields += 1;
            } else {
                element.insert(PROCESSING_TIME_MS.to_string(), legacy);
                report.upgraded_fields += 1;
            }
        }
    }

    match obj.get("imageSummaries").map(Value::is_null) {
        None => {
            obj.insert("imageSummaries".to_string(), Value::Array(Vec::new()));
            report.filled_collections += 1;
        }
        Some(true) => {
            obj.insert("imageSummaries".to_string(), Value::Array(Vec::new()));
            report.null_collections += 1;
            debug!("Run document has null imageSummaries; treating as empty");
        }
        Some(false) => {}
    }

    if !report.is_clean() {
        warn!(
            upgraded = report.upgraded_fields,
            dropped = report.dropped_fields,
            filled = report.filled_collections,
            "Run document used the legacy schema; upgraded to processingTimeMs"
        );
    }

    report
}
