//! Metadata Table indexing for a transactional data-lake table format.
//!
//! Given a sequence of actions on a table's timeline — commits, cleans,
//! rollbacks, restores — this crate derives the indexed records describing
//! the table's files, per-file bloom filters, and per-file per-column
//! statistics. It is a pure transformation pipeline: every type here is
//! constructed from an action payload and consumed once by the builder that
//! needs it, with no ambient state and no I/O except through the capability
//! traits in [`capabilities`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use micromegas_metadata_index::action_reader::parse_commit_metadata;
//! use micromegas_metadata_index::files_index;
//! use micromegas_metadata_index::router::{route_records, FileGroupCounts};
//!
//! let commit = parse_commit_metadata(&action_bytes)?;
//! let mut records = vec![files_index::build_partition_list(&commit)];
//! records.extend(files_index::build_partition_files_from_commit(&commit));
//!
//! let counts = FileGroupCounts { bloom_filters: 4, column_stats: 4 };
//! let routed = route_records(records, &counts, None);
//! ```
//!
//! # Pipeline
//!
//! 1. [`action_reader`] parses one action blob into its in-memory shape.
//! 2. [`rollback_normalizer`] turns a rollback/restore into uniform
//!    added/deleted file maps, applying the skip rules that decide whether
//!    the index is even affected.
//! 3. [`files_index`], [`bloom_index`], and [`column_stats_index`] each
//!    derive their slice of the index from that normalized view, in
//!    parallel, through an [`engine_context::EngineContext`].
//! 4. [`router`] groups the resulting records by partition type and
//!    file-group for upsert into the metadata table.
//! 5. [`fs_lister`] is an independent, rarely-used path: a filesystem walk
//!    that bootstraps partition discovery when no indexed view exists yet.

pub mod action_reader;
pub mod bloom_index;
pub mod capabilities;
pub mod column_stats_index;
pub mod config;
pub mod engine_context;
pub mod error;
pub mod files_index;
pub mod fs_lister;
pub mod hash;
pub mod path_util;
pub mod rollback_normalizer;
pub mod router;
pub mod types;

pub use config::IndexingConfig;
pub use error::{Error, Result};
pub use types::MetadataRecord;
