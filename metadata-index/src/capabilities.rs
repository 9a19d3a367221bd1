//! Traits the index builders consume but do not implement (§6).
//!
//! Real columnar readers, the timeline's own persistence, and the table's
//! physical filesystem all live outside this crate; it only needs the narrow
//! surface below. A caller wires these to whatever backs the actual table
//! (local disk, object storage, ...).

use crate::types::ColumnRange;

/// The embedded bloom filter of a base file, as read off disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilterPayload {
    pub type_code: String,
    pub bytes: Vec<u8>,
}

/// Opens base files to read what [`crate::bloom_index`] and
/// [`crate::column_stats_index`] need out of them. A single read-failure
/// must not be fatal to the builder — callers return
/// [`crate::Error::TransientIo`] and the builder logs and skips the record.
pub trait FileReader: Send + Sync {
    /// Reads the bloom filter embedded in the base file at `path`.
    /// `Ok(None)` means the file has no bloom filter, which is distinct from
    /// a read failure (`Err`).
    fn read_bloom_filter(&self, path: &str) -> anyhow::Result<Option<BloomFilterPayload>>;

    /// Reads the requested per-column ranges out of the file's footer.
    /// Implementations should return [`crate::Error::UnsupportedColumnStatsFormat`]
    /// (wrapped as `anyhow::Error`) for a non-columnar file.
    fn read_column_ranges(&self, path: &str, columns: &[String]) -> anyhow::Result<Vec<ColumnRange>>;
}

/// The subset of the action timeline the normalizer needs to decide whether
/// a rolled-back instant was ever synchronized to the index (§4.2).
///
/// Rollback records identify the instant they undo by timestamp alone (a
/// rollback can precede disambiguating the original action's kind or state),
/// so both methods key on the timestamp rather than a full `Instant`.
pub trait Timeline: Send + Sync {
    /// Whether a completed instant with this timestamp exists on the metadata timeline.
    fn contains(&self, timestamp: &str) -> bool;

    /// Whether `timestamp` predates the first instant the metadata timeline
    /// ever recorded (the timeline has been archived past it).
    fn is_before_start(&self, timestamp: &str) -> bool;
}

/// One entry returned by [`FileSystem::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub relative_path: String,
    pub is_dir: bool,
}

/// The table's physical storage, as needed by the bootstrap walk in [`crate::fs_lister`].
pub trait FileSystem: Send + Sync {
    fn list(&self, relative_path: &str) -> anyhow::Result<Vec<DirEntry>>;
    fn delete(&self, relative_path: &str, recursive: bool) -> anyhow::Result<()>;
}
