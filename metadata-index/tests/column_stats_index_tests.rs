use micromegas_metadata_index::column_stats_index::build_deleted;
use micromegas_metadata_index::types::MetadataRecord;
use std::collections::BTreeMap;

// ============================================================================
// Scenario 6: column stats tombstones on a deleted file
// ============================================================================

#[test]
fn deleted_file_yields_one_tombstone_per_indexed_column() {
    let mut deleted = BTreeMap::new();
    deleted.insert("P".to_string(), vec!["x.parquet".to_string()]);
    let columns = vec!["a".to_string(), "b".to_string()];

    let records = build_deleted(&deleted, &columns);
    assert_eq!(records.len(), 2);

    let mut seen_columns: Vec<&str> = Vec::new();
    for record in &records {
        match record {
            MetadataRecord::ColumnStats {
                partition,
                filename,
                column,
                min,
                max,
                value_count,
                null_count,
                is_deleted,
                ..
            } => {
                assert_eq!(partition, "P");
                assert_eq!(filename, "x.parquet");
                assert!(min.is_none());
                assert!(max.is_none());
                assert_eq!(*value_count, 0);
                assert_eq!(*null_count, 0);
                assert!(is_deleted);
                seen_columns.push(column);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }
    seen_columns.sort_unstable();
    assert_eq!(seen_columns, vec!["a", "b"]);
}
