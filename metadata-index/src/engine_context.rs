//! The data-parallel scheduling capability (§5, §9).
//!
//! Builders never spawn threads themselves; they go through an
//! [`EngineContext`] so the same code runs against a thread-pool-backed
//! engine in production and a trivial sequential one in tests.

use rayon::prelude::*;

/// Bounds requested fan-out by both the input size and the configured cap:
/// `max(1, min(inputs, configured))`, used throughout §4 to size per-stage parallelism.
pub fn effective_parallelism(inputs: usize, configured: usize) -> usize {
    inputs.min(configured.max(1)).max(1)
}

/// `parallelize/map/flat_map/union` from §5, collapsed into two collection
/// transforms plus `union` — `parallelize` in the spec just names the input
/// collection an engine is about to operate on, which in Rust is simply the
/// `Vec<T>` passed into `map`/`flat_map` below.
pub trait EngineContext: Send + Sync {
    /// The degree of parallelism this context can exploit, used by callers
    /// to size their own `configured` parallelism inputs.
    fn parallelism(&self) -> usize;

    fn map<T, R, F>(&self, items: Vec<T>, parallelism: usize, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;

    fn flat_map<T, R, F>(&self, items: Vec<T>, parallelism: usize, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Vec<R> + Send + Sync;

    /// Concatenates per-stage outputs; commutative, order is not meaningful (§5).
    fn union<T>(&self, collections: Vec<Vec<T>>) -> Vec<T>
    where
        T: Send,
    {
        collections.into_iter().flatten().collect()
    }
}

/// Thread-pool-backed engine built on rayon, sized once at construction and
/// reused for the lifetime of the embedding process.
pub struct ThreadPoolEngineContext {
    pool: rayon::ThreadPool,
}

impl ThreadPoolEngineContext {
    pub fn new(num_threads: usize) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .thread_name(|i| format!("metadata-index-{i}"))
            .build()?;
        Ok(Self { pool })
    }
}

impl EngineContext for ThreadPoolEngineContext {
    fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn map<T, R, F>(&self, items: Vec<T>, parallelism: usize, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        // `parallelism` already folded the caller's configured cap against
        // the input size (effective_parallelism); the shared pool further
        // bounds actual concurrency to its own thread count.
        let _ = parallelism;
        self.pool.install(|| items.into_par_iter().map(f).collect())
    }

    fn flat_map<T, R, F>(&self, items: Vec<T>, parallelism: usize, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Vec<R> + Send + Sync,
    {
        let _ = parallelism;
        self.pool
            .install(|| items.into_par_iter().flat_map(f).collect())
    }
}

/// Trivial, single-threaded engine for tests and for embedders that already
/// run inside their own scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialEngineContext;

impl EngineContext for SequentialEngineContext {
    fn parallelism(&self) -> usize {
        1
    }

    fn map<T, R, F>(&self, items: Vec<T>, _parallelism: usize, f: F) -> Vec<R>
    where
        F: Fn(T) -> R,
    {
        items.into_iter().map(f).collect()
    }

    fn flat_map<T, R, F>(&self, items: Vec<T>, _parallelism: usize, f: F) -> Vec<R>
    where
        F: Fn(T) -> Vec<R>,
    {
        items.into_iter().flat_map(f).collect()
    }
}
