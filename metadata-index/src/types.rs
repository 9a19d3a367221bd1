//! In-memory shapes produced by the action reader and consumed by the index builders.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The partition key used when a table has no partition columns.
///
/// All downstream keying goes through this sentinel rather than the empty
/// string, so that a `BTreeMap<String, _>` keyed by partition never has to
/// special-case `""`.
pub const NON_PARTITIONED_SENTINEL: &str = "__non_partitioned__";

/// Key carried by the single [`MetadataRecord::PartitionList`] record of a FILES batch.
pub const ALL_PARTITIONS_KEY: &str = "__all_partitions__";

/// Logical partition names of the metadata table.
pub const FILES_PARTITION_NAME: &str = "files";
pub const BLOOM_FILTERS_PARTITION_NAME: &str = "bloom_filters";
pub const COLUMN_STATS_PARTITION_NAME: &str = "column_stats";

/// Filename whose presence in a directory tags it as a partition during the
/// filesystem fallback walk ([`crate::fs_lister`]).
pub const PARTITION_MARKER_FILE: &str = ".partition_metadata";

/// Directory name the fallback walk never descends into, regardless of depth.
pub const METADATA_FOLDER_NAME: &str = ".table_metadata";

/// Maps an empty partition path to [`NON_PARTITIONED_SENTINEL`]; every other
/// path is returned unchanged. This is invariant I1.
pub fn normalize_partition(partition: &str) -> &str {
    if partition.is_empty() {
        NON_PARTITIONED_SENTINEL
    } else {
        partition
    }
}

/// Lifecycle state of an [`Instant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstantState {
    Requested,
    Inflight,
    Completed,
}

/// The kind of action an [`Instant`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Commit,
    DeltaCommit,
    Clean,
    Rollback,
    Restore,
}

/// A totally ordered token identifying an action on the timeline.
///
/// `timestamp` is a lexicographic string and is the ordering key the rest of
/// the pipeline relies on; `action_kind` and `state` only break ties between
/// instants that otherwise share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct Instant {
    pub timestamp: String,
    pub action_kind: ActionKind,
    pub state: InstantState,
}

impl Instant {
    pub fn completed(action_kind: ActionKind, timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            action_kind,
            state: InstantState::Completed,
        }
    }
}

impl std::fmt::Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:?}.{:?}", self.timestamp, self.action_kind, self.state)
    }
}

/// Precomputed per-column range carried by a delta write-stat, when the
/// writer already aggregated it (skips a columnar file open in [`crate::column_stats_index`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnRange {
    pub column: String,
    pub min: Option<String>,
    pub max: Option<String>,
    pub value_count: i64,
    pub null_count: i64,
    pub total_size: i64,
    pub total_uncompressed_size: i64,
}

/// One file touched by an instant, as reported by the writer.
///
/// `file_size_bytes` is **not** assumed final here: the same `(partition_path,
/// file_path)` pair may be reported more than once within a single commit
/// (append-then-append); [`crate::files_index`] folds repeats with `max` (I2).
#[derive(Debug, Clone, Deserialize)]
pub struct WriteStat {
    pub partition_path: String,
    pub file_path: String,
    pub file_size_bytes: i64,
    #[serde(default)]
    pub is_delta: bool,
    #[serde(default)]
    pub record_stats: Option<Vec<ColumnRange>>,
}

/// The write side of a commit or delta-commit action.
///
/// `writer_schema` is already resolved to its top-level field names by the
/// caller — parsing the wire schema (Avro/Parquet logical types) into field
/// names is the schema-conversion concern this crate deliberately stays out
/// of (§1).
#[derive(Debug, Clone, Deserialize)]
pub struct CommitMetadata {
    pub operation_kind: String,
    #[serde(default)]
    pub writer_schema: Option<Vec<String>>,
    pub partition_to_write_stats: BTreeMap<String, Vec<WriteStat>>,
}

/// The deletion side of a clean action.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanMetadata {
    pub partition_to_deleted_paths: BTreeMap<String, Vec<String>>,
}

/// One rollback's effect on a single partition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollbackPartitionStat {
    #[serde(default)]
    pub success_deletes: Vec<String>,
    #[serde(default)]
    pub failed_deletes: Vec<String>,
    #[serde(default)]
    pub rollback_log_files: BTreeMap<String, i64>,
}

/// A rollback action: the undo of one earlier instant.
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackMetadata {
    pub commits_rolled_back: Vec<String>,
    pub partition_to_rollback_stats: BTreeMap<String, RollbackPartitionStat>,
}

/// A restore action: an ordered sequence of rollbacks undone together.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreMetadata {
    pub rollbacks: Vec<RollbackMetadata>,
}

/// Tagged union over the four record shapes the metadata table indexes
/// (§3 `MetadataRecord`). `PartitionFiles` covers both "additions" and
/// "deletions" for FIB, matching the spec's single shape for that variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataRecord {
    PartitionList {
        partitions: Vec<String>,
    },
    PartitionFiles {
        partition: String,
        files_added: Option<BTreeMap<String, i64>>,
        files_deleted: Option<Vec<String>>,
    },
    BloomFilterEntry {
        partition: String,
        filename: String,
        instant_ts: String,
        type_code: String,
        filter_bytes: Vec<u8>,
        is_deleted: bool,
    },
    ColumnStats {
        partition: String,
        filename: String,
        column: String,
        min: Option<String>,
        max: Option<String>,
        value_count: i64,
        null_count: i64,
        total_size: i64,
        total_uncompressed_size: i64,
        is_deleted: bool,
    },
}

/// The physical partition of the metadata table a [`MetadataRecord`] is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataPartitionType {
    Files,
    BloomFilters,
    ColumnStats,
}

impl MetadataPartitionType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Files => FILES_PARTITION_NAME,
            Self::BloomFilters => BLOOM_FILTERS_PARTITION_NAME,
            Self::ColumnStats => COLUMN_STATS_PARTITION_NAME,
        }
    }
}

impl MetadataRecord {
    pub fn partition_type(&self) -> MetadataPartitionType {
        match self {
            Self::PartitionList { .. } | Self::PartitionFiles { .. } => {
                MetadataPartitionType::Files
            }
            Self::BloomFilterEntry { .. } => MetadataPartitionType::BloomFilters,
            Self::ColumnStats { .. } => MetadataPartitionType::ColumnStats,
        }
    }

    /// Routing key used by [`crate::router`] to hash this record into a file group (§4.6).
    pub fn routing_key(&self) -> String {
        match self {
            Self::PartitionList { .. } => ALL_PARTITIONS_KEY.to_string(),
            Self::PartitionFiles { partition, .. } => partition.clone(),
            Self::BloomFilterEntry {
                partition, filename, ..
            } => format!("{partition}\0{filename}"),
            Self::ColumnStats {
                partition,
                filename,
                column,
                ..
            } => format!("{partition}\0{filename}\0{column}"),
        }
    }
}
