use micromegas_metadata_index::action_reader::parse_commit_metadata;
use micromegas_metadata_index::files_index::{build_partition_files_from_commit, build_partition_list};
use micromegas_metadata_index::types::MetadataRecord;

// ============================================================================
// Scenario 1: commit, non-partitioned
// ============================================================================

#[test]
fn non_partitioned_commit_produces_sentinel_partition_and_single_file() {
    let json = br#"{
        "operation_kind": "insert",
        "partition_to_write_stats": {
            "": [{"partition_path": "", "file_path": "/f1.parquet", "file_size_bytes": 100}]
        }
    }"#;
    let commit = parse_commit_metadata(json).expect("valid commit");

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

// ============================================================================
// Scenario 2: commit, monotone size across repeated write stats
// ============================================================================

#[test]
fn repeated_write_stats_keep_the_maximum_observed_size() {
    let json = br#"{
        "operation_kind": "insert",
        "partition_to_write_stats": {
            "P": [
                {"partition_path": "P", "file_path": "P/f1.parquet", "file_size_bytes": 100},
                {"partition_path": "P", "file_path": "P/f1.parquet", "file_size_bytes": 90}
            ]
        }
    }"#;
    let commit = parse_commit_metadata(json).expect("valid commit");
    let files = build_partition_files_from_commit(&commit);

    match &files[0] {
        MetadataRecord::PartitionFiles { files_added, .. } => {
            assert_eq!(files_added.as_ref().unwrap()["f1.parquet"], 100);
        }
        other => panic!("unexpected record: {other:?}"),
    }
}
