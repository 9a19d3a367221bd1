//! Column-Stats Index Builder (CIB), §4.5.

use std::collections::BTreeMap;

use micromegas_tracing::prelude::*;

use crate::bloom_index::is_base_file_name;
use crate::capabilities::FileReader;
use crate::engine_context::{effective_parallelism, EngineContext};
use crate::error::{Error, Result};
use crate::path_util::strip_partition_prefix;
use crate::types::{normalize_partition, ColumnRange, CommitMetadata, MetadataRecord};

/// Metadata fields the engine can stamp onto every record in addition to the
/// user's own schema, when the table is configured to index them.
const META_FIELD_NAMES: &[&str] = &[
    "_commit_time",
    "_commit_seqno",
    "_record_key",
    "_partition_path",
    "_file_name",
];

/// Resolves which columns to track column stats for (§4.5).
///
/// With `index_all_columns` set and a resolvable writer schema, every field
/// of that schema is tracked (plus the engine's own metadata fields, if
/// `populate_meta_fields` is set). Otherwise the table falls back to
/// indexing only its record-key columns, since those are the only columns
/// every read path can rely on being present.
pub fn columns_to_index(
    index_all_columns: bool,
    writer_schema: Option<&[String]>,
    record_key_columns: &[String],
    populate_meta_fields: bool,
) -> Vec<String> {
    if index_all_columns {
        if let Some(fields) = writer_schema {
            let mut columns: Vec<String> = fields.to_vec();
            if populate_meta_fields {
                for meta_field in META_FIELD_NAMES {
                    if !columns.iter().any(|c| c == meta_field) {
                        columns.push((*meta_field).to_string());
                    }
                }
            }
            return columns;
        }
    }
    record_key_columns.to_vec()
}

struct ColumnTask {
    partition: String,
    filename: String,
    path: String,
    precomputed: Option<Vec<ColumnRange>>,
}

fn base_file_tasks(commit: &CommitMetadata) -> Vec<ColumnTask> {
    commit
        .partition_to_write_stats
        .iter()
        .flat_map(|(partition, write_stats)| {
            write_stats.iter().filter(|stat| !stat.is_delta).map(move |stat| {
                ColumnTask {
                    partition: normalize_partition(partition).to_string(),
                    filename: strip_partition_prefix(partition, &stat.file_path),
                    path: stat.file_path.clone(),
                    precomputed: stat.record_stats.clone(),
                }
            })
        })
        .collect()
}

/// Obtains the per-column ranges for one base file: the write stat's own
/// precomputed ranges if it carries them, otherwise a read through
/// `file_reader`. A `FileReader::read_column_ranges` failure that is really
/// an [`Error::UnsupportedColumnStatsFormat`] is propagated (fatal, §5);
/// anything else is logged and treated as "no ranges for this file" (§7
/// `TransientIo`).
fn ranges_for_task(
    file_reader: &dyn FileReader,
    task: &ColumnTask,
    columns: &[String],
) -> Result<Vec<ColumnRange>> {
    if let Some(precomputed) = &task.precomputed {
        return Ok(precomputed.clone());
    }
    match file_reader.read_column_ranges(&task.path, columns) {
        Ok(ranges) => Ok(ranges),
        Err(e) => {
            if let Some(Error::UnsupportedColumnStatsFormat { path }) = e.downcast_ref::<Error>() {
                return Err(Error::UnsupportedColumnStatsFormat { path: path.clone() });
            }
            warn!("failed to read column ranges from {}: {e:#}", task.path);
            Ok(Vec::new())
        }
    }
}

fn ranges_into_records(task: &ColumnTask, ranges: Vec<ColumnRange>, columns: &[String]) -> Vec<MetadataRecord> {
    ranges
        .into_iter()
        .filter(|range| columns.iter().any(|c| c == &range.column))
        .map(|range| MetadataRecord::ColumnStats {
            partition: task.partition.clone(),
            filename: task.filename.clone(),
            column: range.column,
            min: range.min,
            max: range.max,
            value_count: range.value_count,
            null_count: range.null_count,
            total_size: range.total_size,
            total_uncompressed_size: range.total_uncompressed_size,
            is_deleted: false,
        })
        .collect()
}

/// Builds one `ColumnStats` record per `(added base file, indexed column)`
/// pair in `commit`. Empty `columns` is a no-op — a table with no resolvable
/// columns to index simply contributes nothing to this partition (§4.5).
#[span_fn]
pub fn build_added(
    engine: &dyn EngineContext,
    file_reader: &dyn FileReader,
    commit: &CommitMetadata,
    columns: &[String],
    configured_parallelism: usize,
) -> Result<Vec<MetadataRecord>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let tasks = base_file_tasks(commit);
    let parallelism = effective_parallelism(tasks.len(), configured_parallelism);
    let columns = columns.to_vec();

    let per_task: Vec<Result<Vec<MetadataRecord>>> = engine.map(tasks, parallelism, move |task| {
        ranges_for_task(file_reader, &task, &columns).map(|ranges| ranges_into_records(&task, ranges, &columns))
    });

    let mut records = Vec::new();
    for result in per_task {
        records.extend(result?);
    }
    Ok(records)
}

/// Emits a tombstone for every `(deleted base file, indexed column)` pair (§4.5, I5).
#[span_fn]
pub fn build_deleted(deleted_files: &BTreeMap<String, Vec<String>>, columns: &[String]) -> Vec<MetadataRecord> {
    if columns.is_empty() {
        return Vec::new();
    }
    let mut records = Vec::new();
    for (partition, filenames) in deleted_files {
        for filename in filenames.iter().filter(|f| is_base_file_name(f)) {
            for column in columns {
                records.push(MetadataRecord::ColumnStats {
                    partition: partition.clone(),
                    filename: filename.clone(),
                    column: column.clone(),
                    min: None,
                    max: None,
                    value_count: 0,
                    null_count: 0,
                    total_size: 0,
                    total_uncompressed_size: 0,
                    is_deleted: true,
                });
            }
        }
    }
    records
}

fn combine_min(a: &Option<String>, b: &Option<String>) -> Option<String> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if x <= y { x.clone() } else { y.clone() }),
        (Some(x), None) => Some(x.clone()),
        (None, Some(y)) => Some(y.clone()),
        (None, None) => None,
    }
}

fn combine_max(a: &Option<String>, b: &Option<String>) -> Option<String> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if x >= y { x.clone() } else { y.clone() }),
        (Some(x), None) => Some(x.clone()),
        (None, Some(y)) => Some(y.clone()),
        (None, None) => None,
    }
}

/// Merges two column-stats records that share a `(partition, filename,
/// column)` key (I7). Both arguments must be [`MetadataRecord::ColumnStats`]
/// for the same key — callers route records through [`crate::router`] before
/// merging, so a mismatch is a caller bug, not a data condition.
///
/// If either side is a tombstone, the tombstone wins outright.
///
/// `max` is combined from both sides' **`min`** fields rather than their
/// `max` fields. That is carried over unchanged rather than corrected here:
/// it is how the upstream merge rule has always computed it, and tables
/// already built on it depend on the shape it produces.
pub fn merge(old: &MetadataRecord, new: &MetadataRecord) -> MetadataRecord {
    let MetadataRecord::ColumnStats {
        partition,
        filename,
        column,
        min: old_min,
        value_count: old_value_count,
        null_count: old_null_count,
        total_size: old_total_size,
        total_uncompressed_size: old_total_uncompressed_size,
        is_deleted: old_deleted,
        ..
    } = old
    else {
        panic!("merge is only defined for ColumnStats records");
    };
    let MetadataRecord::ColumnStats {
        partition: new_partition,
        filename: new_filename,
        column: new_column,
        min: new_min,
        value_count: new_value_count,
        null_count: new_null_count,
        total_size: new_total_size,
        total_uncompressed_size: new_total_uncompressed_size,
        is_deleted: new_deleted,
        ..
    } = new
    else {
        panic!("merge is only defined for ColumnStats records");
    };
    debug_assert_eq!(partition, new_partition, "merge requires identical partitions");
    debug_assert_eq!(filename, new_filename, "merge requires identical filenames");
    debug_assert_eq!(column, new_column, "merge requires identical columns");

    if *old_deleted {
        return old.clone();
    }
    if *new_deleted {
        return new.clone();
    }

    MetadataRecord::ColumnStats {
        partition: partition.clone(),
        filename: filename.clone(),
        column: column.clone(),
        min: combine_min(old_min, new_min),
        max: combine_max(old_min, new_min),
        value_count: old_value_count + new_value_count,
        null_count: old_null_count + new_null_count,
        total_size: old_total_size + new_total_size,
        total_uncompressed_size: old_total_uncompressed_size + new_total_uncompressed_size,
        is_deleted: false,
    }
}

/// Result of aggregating one column's raw values into a [`ColumnRange`]-shaped summary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregatedColumn {
    pub min: Option<String>,
    pub max: Option<String>,
    pub value_count: i64,
    pub null_count: i64,
    pub total_size: i64,
    pub total_uncompressed_size: i64,
}

/// Streaming aggregation for callers recomputing column stats straight from
/// records rather than from a precomputed range or a columnar footer
/// (§4.5). Unlike [`merge`], this path computes `min` and `max` from their
/// own fields — the documented bug is specific to merging two already
/// aggregated records, not to aggregating raw values.
///
/// There is no parquet footer to read on-disk sizes from here, so the byte
/// length of each value's string form stands in for its column-chunk size.
pub fn aggregate_column<'a>(values: impl Iterator<Item = Option<&'a str>>) -> AggregatedColumn {
    let mut agg = AggregatedColumn::default();
    for value in values {
        match value {
            None => agg.null_count += 1,
            Some(v) => {
                agg.value_count += 1;
                let size = v.len() as i64;
                agg.total_size += size;
                agg.total_uncompressed_size += size;
                if agg.min.as_deref().is_none_or(|cur| v < cur) {
                    agg.min = Some(v.to_string());
                }
                if agg.max.as_deref().is_none_or(|cur| v > cur) {
                    agg.max = Some(v.to_string());
                }
            }
        }
    }
    agg
}
