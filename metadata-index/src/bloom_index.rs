//! Bloom-Filter Index Builder (BIB), §4.4.

use std::collections::BTreeMap;

use micromegas_tracing::prelude::*;

use crate::capabilities::FileReader;
use crate::engine_context::{effective_parallelism, EngineContext};
use crate::types::{normalize_partition, CommitMetadata, MetadataRecord};

/// Base files are distinguished from log/delta files by their extension (I4);
/// everything else is a delta write stat or a log file and is skipped here.
pub fn is_base_file_name(filename: &str) -> bool {
    filename.ends_with(".parquet") || filename.ends_with(".orc")
}

struct BloomTask {
    partition: String,
    filename: String,
    path: String,
}

fn base_file_tasks(commit: &CommitMetadata) -> Vec<BloomTask> {
    commit
        .partition_to_write_stats
        .iter()
        .flat_map(|(partition, write_stats)| {
            write_stats.iter().filter_map(move |stat| {
                if stat.is_delta || !is_base_file_name(&stat.file_path) {
                    return None;
                }
                let filename = crate::path_util::strip_partition_prefix(partition, &stat.file_path);
                Some(BloomTask {
                    partition: normalize_partition(partition).to_string(),
                    filename,
                    path: stat.file_path.clone(),
                })
            })
        })
        .collect()
}

/// Reads the bloom filter of every newly written base file in `commit` and
/// emits one `BloomFilterEntry` per successful read. A read failure is
/// logged and the file is simply absent from the output (§4.4, §7 `TransientIo`).
#[span_fn]
pub fn build_added(
    engine: &dyn EngineContext,
    file_reader: &dyn FileReader,
    commit: &CommitMetadata,
    instant_ts: &str,
    configured_parallelism: usize,
) -> Vec<MetadataRecord> {
    let tasks = base_file_tasks(commit);
    let parallelism = effective_parallelism(tasks.len(), configured_parallelism);
    let instant_ts = instant_ts.to_string();

    engine.flat_map(tasks, parallelism, move |task| {
        match file_reader.read_bloom_filter(&task.path) {
            Ok(Some(payload)) => vec![MetadataRecord::BloomFilterEntry {
                partition: task.partition,
                filename: task.filename,
                instant_ts: instant_ts.clone(),
                type_code: payload.type_code,
                filter_bytes: payload.bytes,
                is_deleted: false,
            }],
            Ok(None) => {
                debug!("no bloom filter embedded in {}", task.path);
                Vec::new()
            }
            Err(e) => {
                warn!("failed to read bloom filter from {}: {e:#}", task.path);
                Vec::new()
            }
        }
    })
}

/// Emits a tombstone for every deleted base file (§4.4, I5).
#[span_fn]
pub fn build_deleted(
    deleted_files: &BTreeMap<String, Vec<String>>,
    instant_ts: &str,
) -> Vec<MetadataRecord> {
    deleted_files
        .iter()
        .flat_map(|(partition, filenames)| {
            filenames
                .iter()
                .filter(|filename| is_base_file_name(filename))
                .map(|filename| MetadataRecord::BloomFilterEntry {
                    partition: partition.clone(),
                    filename: filename.clone(),
                    instant_ts: instant_ts.to_string(),
                    type_code: String::new(),
                    filter_bytes: Vec::new(),
                    is_deleted: true,
                })
        })
        .collect()
}
