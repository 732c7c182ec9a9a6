//! Explicitly owned worker pool
//!
//! The pool is built on first use and can be shut down and restarted. It is
//! owned by whoever drives the build; the merge engine never sees it.

use std::num::NonZeroUsize;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{MergeError, MergeResult};

#[derive(Debug)]
pub struct WorkerPool {
    threads: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// A pool of `threads` workers; 0 means available parallelism.
    pub fn new(threads: usize) -> Self {
        let threads = if threads == 0 {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            threads
        };
        Self { threads, pool: None }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }

    fn pool(&mut self) -> MergeResult<Arc<ThreadPool>> {
        if let Some(pool) = &self.pool {
            return Ok(Arc::clone(pool));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("resmerge-worker-{i}"))
            .build()
            .map_err(|e| MergeError::Io(std::io::Error::other(e)))?;
        debug!(threads = self.threads, "worker pool started");
        let pool = Arc::new(pool);
        self.pool = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Run `f` inside the pool, starting it if needed.
    pub fn install<F, R>(&mut self, f: F) -> MergeResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        Ok(self.pool()?.install(f))
    }

    /// Stop the workers. The next `install` starts a fresh pool.
    pub fn shutdown(&mut self) {
        if self.pool.take().is_some() {
            debug!("worker pool shut down");
        }
    }

    /// Replace the workers with a fresh pool.
    pub fn restart(&mut self) -> MergeResult<()> {
        self.shutdown();
        self.pool().map(|_| ())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
