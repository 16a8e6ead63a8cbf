use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The buffer does not split into whole rows.
    #[error("buffer of length {0} is not a whole number of rows of length {1}")]
    SizeMismatch(usize, usize),

    /// A [`CancelToken`] was triggered.
    #[error("cancelled")]
    Cancelled,
}

/// Controls how the rows of an operation are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Cooperative cancellation flag shared between a caller and running operations.
///
/// Clones share the same flag. Operations poll it once per row.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every operation observing this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs `op` once per row of `dst` under the given strategy.
///
/// `op` receives the row index and the row slice. Rows are disjoint, so no two
/// invocations touch the same element. The first error stops the remaining
/// rows; rows already written stay written. When `cancel` is triggered the
/// rows not yet started fail with [`ParallelError::Cancelled`].
///
/// # Arguments
///
/// * `dst` - The buffer to process, `row_len` elements per row.
/// * `row_len` - Number of elements in one row (width * channels).
/// * `strategy` - The execution strategy.
/// * `cancel` - Optional cancellation token.
/// * `op` - The per-row operation.
pub fn try_for_each_row<T, E, F>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Sync + Send,
{
    if row_len == 0 || dst.is_empty() {
        return Ok(());
    }
    if dst.len() % row_len != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_len).into());
    }

    let run_row = |(y, row): (usize, &mut [T])| -> Result<(), E> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(ParallelError::Cancelled.into());
        }
        op(y, row)
    };

    match strategy {
        ExecutionStrategy::Serial => dst
            .chunks_exact_mut(row_len)
            .enumerate()
            .try_for_each(run_row),
        ExecutionStrategy::ParallelRows => dst
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .try_for_each(run_row),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_len)
                    .enumerate()
                    .try_for_each(run_row)
            })
        }
    }
}
