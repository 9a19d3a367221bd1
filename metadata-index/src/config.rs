//! In-process configuration surface (§2.1).
//!
//! The core is a library with no CLI or environment surface (§1, §6), so its
//! tunables are a plain struct built by the embedding engine rather than a
//! file-based config loader.

use crate::router::FileGroupCounts;

/// Construction-time tunables for one table's indexing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Upper bound on fan-out for [`crate::bloom_index::build_added`] (§4.4).
    pub bloom_parallelism: usize,
    /// Upper bound on fan-out for [`crate::column_stats_index::build_added`] (§4.5).
    pub column_stats_parallelism: usize,
    /// Upper bound on fan-out per round of [`crate::fs_lister::list_partitions`] (§4.7).
    pub fs_listing_max_fanout: usize,
    /// Opts into the heuristic three-level "date-partitioned" short-circuit
    /// in the fallback lister (§4.7, §9). Off by default: callers must know
    /// their table actually partitions this way.
    pub bootstrap_date_partitioned: bool,
    /// Whether CIB indexes every top-level schema field or only the table's
    /// record-key columns (§4.5).
    pub index_all_columns: bool,
    /// Whether the engine's own metadata fields are added on top of the
    /// writer schema when `index_all_columns` is set (§4.5).
    pub populate_meta_fields: bool,
    /// File-group counts used when the table is not being bootstrapped (§4.6).
    pub file_group_counts: FileGroupCounts,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            bloom_parallelism: 8,
            column_stats_parallelism: 8,
            fs_listing_max_fanout: 1500,
            bootstrap_date_partitioned: false,
            index_all_columns: false,
            populate_meta_fields: false,
            file_group_counts: FileGroupCounts {
                bloom_filters: 4,
                column_stats: 4,
            },
        }
    }
}
