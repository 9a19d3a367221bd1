//! Files Index Builder (FIB), §4.3.

use std::collections::{BTreeMap, BTreeSet};

use micromegas_tracing::prelude::*;

use crate::error::{Error, Result};
use crate::path_util::strip_partition_prefix;
use crate::rollback_normalizer::NormalizedChanges;
use crate::types::{normalize_partition, CleanMetadata, CommitMetadata, MetadataRecord};

/// The single `PartitionList` record for a commit (one per commit, partition order not significant).
#[span_fn]
pub fn build_partition_list(commit: &CommitMetadata) -> MetadataRecord {
    let partitions: BTreeSet<String> = commit
        .partition_to_write_stats
        .keys()
        .map(|p| normalize_partition(p).to_string())
        .collect();
    MetadataRecord::PartitionList {
        partitions: partitions.into_iter().collect(),
    }
}

/// One `PartitionFiles(added)` record per partition touched by the commit,
/// with write stats folded by filename using `max(size)` (I2).
#[span_fn]
pub fn build_partition_files_from_commit(commit: &CommitMetadata) -> Vec<MetadataRecord> {
    commit
        .partition_to_write_stats
        .iter()
        .map(|(partition, write_stats)| {
            let mut files_added: BTreeMap<String, i64> = BTreeMap::new();
            for stat in write_stats {
                let filename = strip_partition_prefix(partition, &stat.file_path);
                files_added
                    .entry(filename)
                    .and_modify(|size| *size = (*size).max(stat.file_size_bytes))
                    .or_insert(stat.file_size_bytes);
            }
            MetadataRecord::PartitionFiles {
                partition: normalize_partition(partition).to_string(),
                files_added: Some(files_added),
                files_deleted: None,
            }
        })
        .collect()
}

/// One `PartitionFiles(deleted)` record per partition referenced by the clean action.
#[span_fn]
pub fn build_partition_files_from_clean(clean: &CleanMetadata) -> Vec<MetadataRecord> {
    clean
        .partition_to_deleted_paths
        .iter()
        .map(|(partition, paths)| {
            let files_deleted = paths
                .iter()
                .map(|path| strip_partition_prefix(partition, path))
                .collect();
            MetadataRecord::PartitionFiles {
                partition: normalize_partition(partition).to_string(),
                files_added: None,
                files_deleted: Some(files_deleted),
            }
        })
        .collect()
}

/// One merged `PartitionFiles(added, deleted)` record per partition present
/// in either map of a normalized rollback/restore. Enforces I3: a filename
/// cannot appear in both maps for the same partition.
#[span_fn]
pub fn build_partition_files_from_normalized(
    changes: &NormalizedChanges,
) -> Result<Vec<MetadataRecord>> {
    let mut partitions: BTreeSet<&String> = changes.deleted_files.keys().collect();
    partitions.extend(changes.appended_files.keys());

    partitions
        .into_iter()
        .map(|partition| {
            let deleted = changes.deleted_files.get(partition);
            let added = changes.appended_files.get(partition);

            if let (Some(deleted), Some(added)) = (deleted, added) {
                for filename in deleted {
                    if added.contains_key(filename) {
                        warn!(
                            "invariant I3 violated for partition {partition}: {filename} is both added and deleted"
                        );
                        return Err(Error::InvariantViolation {
                            partition: partition.clone(),
                            filename: filename.clone(),
                        });
                    }
                }
            }

            Ok(MetadataRecord::PartitionFiles {
                partition: partition.clone(),
                files_added: added.cloned(),
                files_deleted: deleted.cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WriteStat;

    fn write_stat(partition: &str, file_path: &str, size: i64) -> WriteStat {
        WriteStat {
            partition_path: partition.to_string(),
            file_path: file_path.to_string(),
            file_size_bytes: size,
            is_delta: false,
            record_stats: None,
        }
    }

    #[test]
    fn non_partitioned_commit_yields_sentinel_partition_list_and_files() {
        let mut partition_to_write_stats = BTreeMap::new();
        partition_to_write_stats.insert("".to_string(), vec![write_stat("", "/f1.parquet", 100)]);
        let commit = CommitMetadata {
            operation_kind: "insert".to_string(),
            writer_schema: None,
            partition_to_write_stats,
        };

        let list = build_partition_list(&commit);
        assert_eq!(
            list,
            MetadataRecord::PartitionList {
                partitions: vec!["__non_partitioned__".to_string()]
            }
        );

        let files = build_partition_files_from_commit(&commit);
        assert_eq!(files.len(), 1);
        match &files[0] {
            MetadataRecord::PartitionFiles {
                partition,
                files_added,
                files_deleted,
            } => {
                assert_eq!(partition, "__non_partitioned__");
                assert_eq!(files_added.as_ref().unwrap()["f1.parquet"], 100);
                assert!(files_deleted.is_none());
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn repeated_write_stats_for_same_file_keep_the_max_size() {
        let mut partition_to_write_stats = BTreeMap::new();
        partition_to_write_stats.insert(
            "P".to_string(),
            vec![
                write_stat("P", "P/f1.parquet", 100),
                write_stat("P", "P/f1.parquet", 90),
            ],
        );
        let commit = CommitMetadata {
            operation_kind: "insert".to_string(),
            writer_schema: None,
            partition_to_write_stats,
        };

        let files = build_partition_files_from_commit(&commit);
        match &files[0] {
            MetadataRecord::PartitionFiles { files_added, .. } => {
                assert_eq!(files_added.as_ref().unwrap()["f1.parquet"], 100);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn clean_emits_deletions_only() {
        let mut partition_to_deleted_paths = BTreeMap::new();
        partition_to_deleted_paths.insert(
            "P".to_string(),
            vec!["P/a.parquet".to_string(), "P/b.log".to_string()],
        );
        let clean = CleanMetadata {
            partition_to_deleted_paths,
        };

        let files = build_partition_files_from_clean(&clean);
        assert_eq!(files.len(), 1);
        match &files[0] {
            MetadataRecord::PartitionFiles {
                partition,
                files_added,
                files_deleted,
            } => {
                assert_eq!(partition, "P");
                assert!(files_added.is_none());
                assert_eq!(
                    files_deleted.as_ref().unwrap(),
                    &vec!["a.parquet".to_string(), "b.log".to_string()]
                );
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn overlapping_added_and_deleted_filename_is_an_invariant_violation() {
        let mut changes = NormalizedChanges::default();
        changes
            .deleted_files
            .insert("P".to_string(), vec!["f1.parquet".to_string()]);
        changes
            .appended_files
            .entry("P".to_string())
            .or_default()
            .insert("f1.parquet".to_string(), 10);

        let err = build_partition_files_from_normalized(&changes).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }
}
