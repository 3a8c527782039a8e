use std::ops::Range;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::core::OError;
use crate::random::RandomStream;

/// The worker pool of a parallel [`BatchExecution`].
#[derive(Debug, Clone)]
pub struct ParallelExecution {
    /// The number of workers.
    degree_of_parallelism: usize,
    /// The dedicated pool running the workers.
    pool: Arc<ThreadPool>,
}

/// How a batch operation fans a per-item function out over many items.
///
/// Whatever the strategy, item `i` always receives the stream `rng.fork(i)` forked from the
/// stream given to the batch, and no item sees the result of another item. A pure per-item
/// function therefore gives element-wise identical results with [`BatchExecution::Sequential`]
/// and with any degree of parallelism.
///
/// # Example
/// ```
///  use metarustic::execution::BatchExecution;
///  use metarustic::random::RandomStream;
///
///  let rng = RandomStream::from_seed(42);
///  let f = |i: usize, r: &mut RandomStream| i as f64 + r.next_double();
///  let sequential = BatchExecution::Sequential.generate(100, &rng, f);
///  let parallel = BatchExecution::parallel(4).unwrap().generate(100, &rng, f);
///  assert_eq!(sequential, parallel);
/// ```
#[derive(Debug, Clone, Default)]
pub enum BatchExecution {
    /// Process the items on the calling thread, in index order.
    #[default]
    Sequential,
    /// Split the indexes into contiguous ranges, one per worker.
    Parallel(ParallelExecution),
}

impl BatchExecution {
    /// Create a parallel execution. With one worker this returns
    /// [`BatchExecution::Sequential`]. This returns an error if `degree_of_parallelism` is `0`
    /// or the thread pool cannot be created.
    ///
    /// # Arguments
    ///
    /// * `degree_of_parallelism`: The number of workers.
    ///
    /// returns: `Result<BatchExecution, OError>`
    pub fn parallel(degree_of_parallelism: usize) -> Result<Self, OError> {
        if degree_of_parallelism < 1 {
            return Err(OError::InvalidConfiguration(
                "batch execution".to_string(),
                "The degree of parallelism must be at least 1".to_string(),
            ));
        }
        if degree_of_parallelism == 1 {
            return Ok(BatchExecution::Sequential);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(degree_of_parallelism)
            .thread_name(|i| format!("batch-worker-{i}"))
            .build()
            .map_err(|e| {
                OError::InvalidConfiguration(
                    "batch execution".to_string(),
                    format!("Cannot create the thread pool: {e}"),
                )
            })?;
        Ok(BatchExecution::Parallel(ParallelExecution {
            degree_of_parallelism,
            pool: Arc::new(pool),
        }))
    }

    /// The number of workers.
    pub fn degree_of_parallelism(&self) -> usize {
        match self {
            BatchExecution::Sequential => 1,
            BatchExecution::Parallel(p) => p.degree_of_parallelism,
        }
    }

    /// Produce `count` results where result `i` is `f(i, rng.fork(i))`.
    ///
    /// # Arguments
    ///
    /// * `count`: The number of items.
    /// * `rng`: The stream to fork the item streams from. This is not changed.
    /// * `f`: The per-item function.
    ///
    /// returns: `Vec<R>`
    pub fn generate<R, F>(&self, count: usize, rng: &RandomStream, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize, &mut RandomStream) -> R + Sync,
    {
        if count == 0 {
            return Vec::new();
        }

        let item = |i: usize| f(i, &mut rng.fork(i as u64));
        match self {
            BatchExecution::Sequential => (0..count).map(item).collect(),
            BatchExecution::Parallel(p) => {
                let ranges = partition(count, p.degree_of_parallelism);
                debug!(
                    "Running a batch of {count} items in {} ranges",
                    ranges.len()
                );
                let chunks: Vec<Vec<R>> = p.pool.install(|| {
                    ranges
                        .into_par_iter()
                        .map(|range| range.map(item).collect::<Vec<R>>())
                        .collect()
                });
                chunks.into_iter().flatten().collect()
            }
        }
    }

    /// Apply `f` to each item with its own forked stream. See [`BatchExecution::generate`].
    ///
    /// # Arguments
    ///
    /// * `items`: The items.
    /// * `rng`: The stream to fork the item streams from.
    /// * `f`: The per-item function.
    ///
    /// returns: `Vec<R>`
    pub fn map<I, R, F>(&self, items: &[I], rng: &RandomStream, f: F) -> Vec<R>
    where
        I: Sync,
        R: Send,
        F: Fn(&I, &mut RandomStream) -> R + Sync,
    {
        self.generate(items.len(), rng, |i, r| f(&items[i], r))
    }

    /// The fallible version of [`BatchExecution::generate`]. Every item runs to completion; if
    /// any item fails, the error of the item with the lowest index is returned.
    ///
    /// # Arguments
    ///
    /// * `count`: The number of items.
    /// * `rng`: The stream to fork the item streams from.
    /// * `f`: The per-item function.
    ///
    /// returns: `Result<Vec<R>, OError>`
    pub fn try_generate<R, F>(&self, count: usize, rng: &RandomStream, f: F) -> Result<Vec<R>, OError>
    where
        R: Send,
        F: Fn(usize, &mut RandomStream) -> Result<R, OError> + Sync,
    {
        self.generate(count, rng, f).into_iter().collect()
    }

    /// The fallible version of [`BatchExecution::map`].
    ///
    /// # Arguments
    ///
    /// * `items`: The items.
    /// * `rng`: The stream to fork the item streams from.
    /// * `f`: The per-item function.
    ///
    /// returns: `Result<Vec<R>, OError>`
    pub fn try_map<I, R, F>(&self, items: &[I], rng: &RandomStream, f: F) -> Result<Vec<R>, OError>
    where
        I: Sync,
        R: Send,
        F: Fn(&I, &mut RandomStream) -> Result<R, OError> + Sync,
    {
        self.map(items, rng, f).into_iter().collect()
    }
}

/// Split `0..count` into at most `parts` contiguous ranges of near-equal size.
///
/// # Arguments
///
/// * `count`: The number of items.
/// * `parts`: The maximum number of ranges.
///
/// returns: `Vec<Range<usize>>`
fn partition(count: usize, parts: usize) -> Vec<Range<usize>> {
    let chunk = count.div_ceil(parts.max(1));
    (0..count)
        .step_by(chunk.max(1))
        .map(|start| start..(start + chunk).min(count))
        .collect()
}
