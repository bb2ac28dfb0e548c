//! Removal of orphaned record directories and stale temp files.
//!
//! An orphan is a directory without an `info` document, left behind by a
//! create or delete that was interrupted between its two steps. Orphans are
//! invisible to listing and lookups, but they hold on to their name until a
//! create reclaims it. Sweeping removes them all at once, along with temp
//! files abandoned by interrupted writes inside live records.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{DataStore, UnitState};
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Orphaned directories removed.
    pub removed_units: usize,
    /// Stale temp files removed, from orphans and live records alike.
    pub removed_temp_files: usize,
    /// Orphans that could not be removed, e.g. because they hold files the
    /// store does not own.
    pub skipped: Vec<String>,
}

pub fn run<S: DataStore>(store: &S) -> Result<CmdResult> {
    let mut report = SweepReport::default();

    for key in store.keys()? {
        let _guard = store.lock_name(&key);
        // Re-check under the lock: a create may have completed meanwhile.
        match store.unit_state(&key)? {
            UnitState::Absent => continue,
            UnitState::Present => {
                match store.clear_stale_files(&key) {
                    Ok(n) => report.removed_temp_files += n,
                    Err(e) => warn!("cannot clear temp files in {}: {}", key, e),
                }
                continue;
            }
            UnitState::Orphaned => {}
        }
        match store.reclaim_unit(&key) {
            Ok(temp_files) => {
                report.removed_units += 1;
                report.removed_temp_files += temp_files;
            }
            Err(e) => {
                warn!("leaving orphaned {} in place: {}", key, e);
                report.skipped.push(key);
            }
        }
    }

    let mut result = CmdResult::default();
    let nothing_found =
        report.removed_units == 0 && report.removed_temp_files == 0 && report.skipped.is_empty();
    if nothing_found {
        result.add_message(CmdMessage::info("No orphaned directories found"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Removed {} orphaned director{}",
            report.removed_units,
            if report.removed_units == 1 { "y" } else { "ies" }
        )));
    }
    for key in &report.skipped {
        result.add_message(CmdMessage::warning(format!(
            "Could not remove orphaned directory {}",
            key
        )));
    }
    result.sweep = Some(report);
    Ok(result)
}
