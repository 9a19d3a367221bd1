//! Rollback/Restore Normalizer (RN), §4.2.
//!
//! Turns a `RollbackMetadata` or `RestoreMetadata` into two uniform maps —
//! `partition -> deleted filenames` and `partition -> appended filename sizes`
//! — applying the skip rules that decide whether an instant's rollback
//! should touch the index at all.

use std::collections::BTreeMap;

use micromegas_tracing::prelude::*;

use crate::capabilities::Timeline;
use crate::error::{Error, Result};
use crate::path_util::strip_partition_prefix;
use crate::types::{RestoreMetadata, RollbackMetadata};

/// The output of normalizing one or more rollbacks: per-partition deletions
/// and per-partition appended log files, ready for [`crate::files_index`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizedChanges {
    pub deleted_files: BTreeMap<String, Vec<String>>,
    pub appended_files: BTreeMap<String, BTreeMap<String, i64>>,
}

impl NormalizedChanges {
    fn merge_deleted(&mut self, partition: String, filename: String) {
        let entry = self.deleted_files.entry(partition).or_default();
        if !entry.contains(&filename) {
            entry.push(filename);
        }
    }

    fn merge_appended(&mut self, partition: String, filename: String, size: i64) {
        let entry = self.appended_files.entry(partition).or_default();
        entry
            .entry(filename)
            .and_modify(|existing| *existing = (*existing).max(size))
            .or_insert(size);
    }
}

fn has_log_appends(rollback: &RollbackMetadata) -> bool {
    rollback
        .partition_to_rollback_stats
        .values()
        .any(|stat| stat.rollback_log_files.values().any(|&size| size > 0))
}

/// Applies the skip rules of §4.2 to a single rollback and, unless skipped,
/// folds its effect into `changes`.
fn fold_rollback(
    timeline: &dyn Timeline,
    rollback: &RollbackMetadata,
    last_sync_ts: Option<&str>,
    changes: &mut NormalizedChanges,
) -> Result<()> {
    let instant_to_rollback = rollback.commits_rolled_back.first().ok_or_else(|| {
        Error::MalformedAction(
            "rollback metadata has an empty commits_rolled_back list".to_string(),
        )
    })?;
    let has_appends = has_log_appends(rollback);

    // Case A: the metadata table hasn't caught up to this instant yet.
    if let Some(last_sync) = last_sync_ts {
        if instant_to_rollback.as_str() > last_sync {
            if !has_appends {
                debug!("skipping rollback of {instant_to_rollback}: ahead of last sync, no log appends");
                return Ok(());
            }
            return fold_partition_stats(rollback, changes);
        }
    }

    // Case B: the instant predates the index entirely, or was simply never synced.
    if timeline.is_before_start(instant_to_rollback) {
        return Err(Error::ArchivedDependency {
            instant: instant_to_rollback.clone(),
        });
    }
    if !timeline.contains(instant_to_rollback) && !has_appends {
        debug!("skipping rollback of {instant_to_rollback}: never synced, no log appends");
        return Ok(());
    }
    fold_partition_stats(rollback, changes)
}

fn fold_partition_stats(rollback: &RollbackMetadata, changes: &mut NormalizedChanges) -> Result<()> {
    for (partition, stat) in &rollback.partition_to_rollback_stats {
        for path in stat.success_deletes.iter().chain(stat.failed_deletes.iter()) {
            let filename = strip_partition_prefix(partition, path);
            changes.merge_deleted(partition.clone(), filename);
        }
        for (path, size) in &stat.rollback_log_files {
            if *size <= 0 {
                continue;
            }
            let filename = strip_partition_prefix(partition, path);
            changes.merge_appended(partition.clone(), filename, *size);
        }
    }
    Ok(())
}

/// Normalizes a single rollback action.
pub fn normalize_rollback(
    timeline: &dyn Timeline,
    rollback: &RollbackMetadata,
    last_sync_ts: Option<&str>,
) -> Result<NormalizedChanges> {
    let mut changes = NormalizedChanges::default();
    fold_rollback(timeline, rollback, last_sync_ts, &mut changes)?;
    Ok(changes)
}

/// Normalizes a restore action: every inner rollback is folded through the
/// same procedure into one shared pair of maps.
pub fn normalize_restore(
    timeline: &dyn Timeline,
    restore: &RestoreMetadata,
    last_sync_ts: Option<&str>,
) -> Result<NormalizedChanges> {
    let mut changes = NormalizedChanges::default();
    for rollback in &restore.rollbacks {
        fold_rollback(timeline, rollback, last_sync_ts, &mut changes)?;
    }
    Ok(changes)
}

/// If the action being rolled back or restored was never synchronized to the
/// index (`was_synced = false`), the deletions it implies are moot — there is
/// nothing indexed to delete — but any log files it appended are still real
/// files on disk and must still be recorded.
pub fn adjust_for_sync_state(changes: &mut NormalizedChanges, was_synced: bool) {
    if !was_synced {
        changes.deleted_files.clear();
    }
}
