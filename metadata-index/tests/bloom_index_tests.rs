use std::collections::BTreeMap;

use micromegas_metadata_index::action_reader::parse_clean_metadata;
use micromegas_metadata_index::bloom_index::build_deleted;
use micromegas_metadata_index::files_index::build_partition_files_from_clean;
use micromegas_metadata_index::types::MetadataRecord;

// ============================================================================
// Scenario 3: clean action deletes a base file and a log file
// ============================================================================

#[test]
fn clean_deletes_both_files_in_fib_but_bib_tombstones_only_the_base_file() {
    let json = br#"{
        "partition_to_deleted_paths": {
            "P": ["P/a.parquet", "P/b.log"]
        }
    }"#;
    let clean = parse_clean_metadata(json).expect("valid clean");

    let files = build_partition_files_from_clean(&clean);
    assert_eq!(files.len(), 1);
    let mut stripped_deleted: BTreeMap<String, Vec<String>> = BTreeMap::new();
    match &files[0] {
        MetadataRecord::PartitionFiles {
            partition,
            files_added,
            files_deleted,
        } => {
            assert_eq!(partition, "P");
            assert!(files_added.is_none());
            let files_deleted = files_deleted.as_ref().unwrap();
            assert_eq!(
                files_deleted,
                &vec!["a.parquet".to_string(), "b.log".to_string()]
            );
            stripped_deleted.insert(partition.clone(), files_deleted.clone());
        }
        other => panic!("unexpected record: {other:?}"),
    }

    // BIB keys its tombstones by the already-stripped filenames FIB derived,
    // not the raw paths from CleanMetadata (bloom_index::build_deleted does
    // not strip partition prefixes itself).
    let bloom_tombstones = build_deleted(&stripped_deleted, "t2");
    assert_eq!(bloom_tombstones.len(), 1);
    match &bloom_tombstones[0] {
        MetadataRecord::BloomFilterEntry { filename, is_deleted, .. } => {
            assert_eq!(filename, "a.parquet");
            assert!(is_deleted);
        }
        other => panic!("unexpected record: {other:?}"),
    }
}
