//! Parallel processing utilities

use crate::error::Result;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Execute a function in parallel on a collection of items
///
/// Results come back in the order of `items`.
pub fn parallel_process<T, F, R>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    items.into_par_iter().map(f).collect()
}

/// Worker pool the scanner runs its waves on
///
/// A sequential pool runs everything on the calling thread.
pub struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Build a pool of `threads` workers, defaulting to the number of CPUs
    pub fn new(parallel: bool, threads: Option<usize>) -> Result<Self> {
        if !parallel {
            return Ok(Self::sequential());
        }

        let threads = threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("bundlegraph-scan-{}", i))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn sequential() -> Self {
        Self { pool: None }
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
    }

    /// Map `f` over `items`, keeping input order in the output
    pub fn map<T, F, R>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| parallel_process(items, f)),
            None => items.into_iter().map(f).collect(),
        }
    }
}
