//! Record Router (RR), §4.6.

use std::collections::BTreeMap;

use crate::hash::file_group_index;
use crate::types::{MetadataPartitionType, MetadataRecord};

/// The per-partition-type file-group counts an embedder configures when the
/// table is not bootstrapped (§4.6, §2.1 `IndexingConfig`). FILES is always
/// a single file group outside of bootstrap, so it has no configured count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileGroupCounts {
    pub bloom_filters: usize,
    pub column_stats: usize,
}

/// Records grouped first by [`MetadataPartitionType`], then by file-group index.
pub type RoutedRecords = BTreeMap<MetadataPartitionType, BTreeMap<usize, Vec<MetadataRecord>>>;

/// Resolves the file-group count for one partition type. A bootstrap in
/// progress (`existing_file_slices` set) overrides the configured counts
/// uniformly, including for FILES — the bootstrap count mirrors whatever
/// file-group layout the bootstrapped dataset already has on disk.
fn file_group_count(
    partition_type: MetadataPartitionType,
    counts: &FileGroupCounts,
    existing_file_slices: Option<usize>,
) -> usize {
    if let Some(existing) = existing_file_slices {
        return existing.max(1);
    }
    match partition_type {
        MetadataPartitionType::Files => 1,
        MetadataPartitionType::BloomFilters => counts.bloom_filters.max(1),
        MetadataPartitionType::ColumnStats => counts.column_stats.max(1),
    }
}

/// Routes one record to its `(partition_type, file_group)` destination (§4.6, I6).
pub fn route(
    record: &MetadataRecord,
    counts: &FileGroupCounts,
    existing_file_slices: Option<usize>,
) -> (MetadataPartitionType, usize) {
    let partition_type = record.partition_type();
    let num_groups = file_group_count(partition_type, counts, existing_file_slices);
    let group = file_group_index(&record.routing_key(), num_groups);
    (partition_type, group)
}

/// Routes a batch of records, grouping them by partition type and file group
/// in one pass. Group membership is stable across runs and platforms (I6);
/// order *within* a group is not meaningful (§5).
pub fn route_records(
    records: Vec<MetadataRecord>,
    counts: &FileGroupCounts,
    existing_file_slices: Option<usize>,
) -> RoutedRecords {
    let mut routed: RoutedRecords = BTreeMap::new();
    for record in records {
        let (partition_type, group) = route(&record, counts, existing_file_slices);
        routed.entry(partition_type).or_default().entry(group).or_default().push(record);
    }
    routed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> FileGroupCounts {
        FileGroupCounts {
            bloom_filters: 4,
            column_stats: 8,
        }
    }

    #[test]
    fn route_is_stable_across_repeated_calls() {
        let record = MetadataRecord::BloomFilterEntry {
            partition: "P".to_string(),
            filename: "x.parquet".to_string(),
            instant_ts: "t1".to_string(),
            type_code: "DYNAMIC_V0".to_string(),
            filter_bytes: vec![1, 2, 3],
            is_deleted: false,
        };
        let first = route(&record, &counts(), None);
        let second = route(&record, &counts(), None);
        assert_eq!(first, second);
        assert_eq!(first.0, MetadataPartitionType::BloomFilters);
        assert!(first.1 < 4);
    }

    #[test]
    fn files_partition_has_a_single_group_outside_bootstrap() {
        let record = MetadataRecord::PartitionList {
            partitions: vec!["P".to_string()],
        };
        let (partition_type, group) = route(&record, &counts(), None);
        assert_eq!(partition_type, MetadataPartitionType::Files);
        assert_eq!(group, 0);
    }

    #[test]
    fn bootstrap_overrides_configured_counts_for_every_partition_type() {
        let record = MetadataRecord::PartitionList {
            partitions: vec!["P".to_string()],
        };
        let (partition_type, group) = route(&record, &counts(), Some(3));
        assert_eq!(partition_type, MetadataPartitionType::Files);
        assert!(group < 3);
    }

    #[test]
    fn route_records_groups_by_partition_type_then_file_group() {
        let records = vec![
            MetadataRecord::PartitionList {
                partitions: vec!["P".to_string()],
            },
            MetadataRecord::ColumnStats {
                partition: "P".to_string(),
                filename: "x.parquet".to_string(),
                column: "a".to_string(),
                min: None,
                max: None,
                value_count: 0,
                null_count: 0,
                total_size: 0,
                total_uncompressed_size: 0,
                is_deleted: true,
            },
        ];
        let routed = route_records(records, &counts(), None);
        assert_eq!(routed.len(), 2);
        assert!(routed.contains_key(&MetadataPartitionType::Files));
        assert!(routed.contains_key(&MetadataPartitionType::ColumnStats));
    }
}
