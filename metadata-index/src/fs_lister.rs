//! FS Fallback Lister (FL), §4.7.
//!
//! Walks the table's base path to enumerate partitions when no indexed view
//! exists yet — used only to bootstrap a table that predates this index.

use micromegas_tracing::prelude::*;

use crate::capabilities::{DirEntry, FileSystem};
use crate::engine_context::{effective_parallelism, EngineContext};
use crate::types::{METADATA_FOLDER_NAME, PARTITION_MARKER_FILE};

fn list_dir(fs: &dyn FileSystem, dir: &str) -> Vec<DirEntry> {
    fs.list(dir).unwrap_or_else(|e| {
        warn!("failed to list {dir}: {e:#}");
        Vec::new()
    })
}

/// Enumerates the table's partitions by walking `base_path`.
///
/// `date_partitioned` opts into the heuristic three-level short-circuit
/// (§9): callers must know their table actually lays out partitions that
/// way, it is never inferred from the walk itself. Otherwise the walk is
/// unbounded and driven entirely by the partition marker file.
///
/// Each round hands the whole current worklist to `engine`, which collects
/// results into an owned `Vec` — the "safe for concurrent append" rule in
/// §4.7 is therefore satisfied by the engine context rather than by any
/// locking in this function.
#[span_fn]
pub fn list_partitions(
    engine: &dyn EngineContext,
    fs: &dyn FileSystem,
    max_fanout: usize,
    date_partitioned: bool,
) -> Vec<String> {
    if date_partitioned {
        list_date_partitioned(engine, fs, max_fanout)
    } else {
        list_marker_partitioned(engine, fs, max_fanout)
    }
}

fn list_date_partitioned(engine: &dyn EngineContext, fs: &dyn FileSystem, max_fanout: usize) -> Vec<String> {
    let mut worklist = vec![String::new()];
    for _ in 0..3 {
        if worklist.is_empty() {
            break;
        }
        let parallelism = effective_parallelism(worklist.len(), max_fanout);
        let listings = engine.map(worklist, parallelism, |dir| list_dir(fs, &dir));
        worklist = listings
            .into_iter()
            .flatten()
            .filter(|entry| entry.is_dir && entry.name != METADATA_FOLDER_NAME)
            .map(|entry| entry.relative_path)
            .collect();
    }
    worklist
}

fn list_marker_partitioned(engine: &dyn EngineContext, fs: &dyn FileSystem, max_fanout: usize) -> Vec<String> {
    let mut worklist = vec![String::new()];
    let mut partitions = Vec::new();

    while !worklist.is_empty() {
        let parallelism = effective_parallelism(worklist.len(), max_fanout);
        let listings = engine.map(worklist, parallelism, |dir| {
            let entries = list_dir(fs, &dir);
            (dir, entries)
        });

        let mut next_worklist = Vec::new();
        for (dir, entries) in listings {
            let has_marker = entries
                .iter()
                .any(|entry| !entry.is_dir && entry.name == PARTITION_MARKER_FILE);
            if has_marker {
                partitions.push(dir);
                continue;
            }
            for entry in entries {
                if entry.is_dir && entry.name != METADATA_FOLDER_NAME {
                    next_worklist.push(entry.relative_path);
                }
            }
        }
        worklist = next_worklist;
    }
    partitions
}
