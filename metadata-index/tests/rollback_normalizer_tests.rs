use micromegas_metadata_index::action_reader::parse_rollback_metadata;
use micromegas_metadata_index::capabilities::Timeline;
use micromegas_metadata_index::rollback_normalizer::normalize_rollback;

// ============================================================================
// Test double
// ============================================================================

struct FakeTimeline {
    synced: Vec<&'static str>,
    start: &'static str,
}

impl Timeline for FakeTimeline {
    fn contains(&self, timestamp: &str) -> bool {
        self.synced.contains(&timestamp)
    }
    fn is_before_start(&self, timestamp: &str) -> bool {
        timestamp < self.start
    }
}

// ============================================================================
// Scenario 4: rollback ahead of sync, no log appends
// ============================================================================

#[test]
fn rollback_ahead_of_sync_with_no_appends_yields_no_records() {
    let json = br#"{
        "commits_rolled_back": ["t7"],
        "partition_to_rollback_stats": {}
    }"#;
    let rollback = parse_rollback_metadata(json).expect("valid rollback");
    let timeline = FakeTimeline {
        synced: vec!["t1"],
        start: "t0",
    };

    let changes = normalize_rollback(&timeline, &rollback, Some("t5")).expect("not fatal");
    assert!(changes.deleted_files.is_empty());
    assert!(changes.appended_files.is_empty());
}

// ============================================================================
// Scenario 5: rollback ahead of sync, with log appends
// ============================================================================

#[test]
fn rollback_ahead_of_sync_with_log_appends_keeps_only_positive_sizes_and_no_deletes() {
    let json = br#"{
        "commits_rolled_back": ["t7"],
        "partition_to_rollback_stats": {
            "P": {
                "success_deletes": [],
                "failed_deletes": [],
                "rollback_log_files": {"P/L1": 10, "P/L2": 0}
            }
        }
    }"#;
    let rollback = parse_rollback_metadata(json).expect("valid rollback");
    let timeline = FakeTimeline {
        synced: vec!["t1"],
        start: "t0",
    };

    let changes = normalize_rollback(&timeline, &rollback, Some("t5")).expect("not fatal");
    assert!(changes.deleted_files.is_empty());
    assert_eq!(changes.appended_files["P"]["L1"], 10);
}
