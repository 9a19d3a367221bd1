//! Parses a single action blob into its in-memory shape (§4.1).
//!
//! Action files are JSON-encoded on the timeline; unknown fields are simply
//! not deserialized into the target struct, which gives us "unknown fields
//! preserved but ignored for indexing" for free rather than as something we
//! have to implement.

use micromegas_tracing::prelude::*;

use crate::error::{Error, Result};
use crate::types::{CleanMetadata, CommitMetadata, RestoreMetadata, RollbackMetadata};

#[span_fn]
pub fn parse_commit_metadata(bytes: &[u8]) -> Result<CommitMetadata> {
    let metadata: CommitMetadata = serde_json::from_slice(bytes)
        .map_err(|e| Error::MalformedAction(format!("commit metadata: {e}")))?;
    debug!(
        "parsed commit metadata: operation={} partitions={}",
        metadata.operation_kind,
        metadata.partition_to_write_stats.len()
    );
    Ok(metadata)
}

#[span_fn]
pub fn parse_clean_metadata(bytes: &[u8]) -> Result<CleanMetadata> {
    let metadata: CleanMetadata = serde_json::from_slice(bytes)
        .map_err(|e| Error::MalformedAction(format!("clean metadata: {e}")))?;
    debug!(
        "parsed clean metadata: partitions={}",
        metadata.partition_to_deleted_paths.len()
    );
    Ok(metadata)
}

#[span_fn]
pub fn parse_rollback_metadata(bytes: &[u8]) -> Result<RollbackMetadata> {
    let metadata: RollbackMetadata = serde_json::from_slice(bytes)
        .map_err(|e| Error::MalformedAction(format!("rollback metadata: {e}")))?;
    if metadata.commits_rolled_back.is_empty() {
        return Err(Error::MalformedAction(
            "rollback metadata has an empty commits_rolled_back list".to_string(),
        ));
    }
    debug!(
        "parsed rollback metadata: rolling back {:?}",
        metadata.commits_rolled_back
    );
    Ok(metadata)
}

#[span_fn]
pub fn parse_restore_metadata(bytes: &[u8]) -> Result<RestoreMetadata> {
    let metadata: RestoreMetadata = serde_json::from_slice(bytes)
        .map_err(|e| Error::MalformedAction(format!("restore metadata: {e}")))?;
    for rollback in &metadata.rollbacks {
        if rollback.commits_rolled_back.is_empty() {
            return Err(Error::MalformedAction(
                "restore metadata contains a rollback with an empty commits_rolled_back list"
                    .to_string(),
            ));
        }
    }
    debug!(
        "parsed restore metadata: {} inner rollbacks",
        metadata.rollbacks.len()
    );
    Ok(metadata)
}
