//! # Concurrency
//!
//! The [`Executor`] runs a batch of independent tasks either inline on the calling
//! thread or on a rayon thread pool. Failures, including panics, are collected per
//! task; every task of the batch finishes before the first failure is reported.
//!
//! [`partition`] splits an index range into contiguous, near-equal slices; it is
//! shared by the concurrent evaluator and the concurrent statistics calculator.

use std::any::Any;
use std::fmt;
use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{GeneticError, Result, ResultExt};

/// Runs independent tasks inline or on a worker pool.
#[derive(Clone, Default)]
pub enum Executor {
    /// Run every task on the calling thread.
    #[default]
    Inline,
    /// Run on rayon's global thread pool.
    Global,
    /// Run on a dedicated pool.
    Pool(Arc<rayon::ThreadPool>),
}

impl Executor {
    /// Creates an executor backed by a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero or the pool cannot be built.
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(GeneticError::Configuration(
                "Worker pool needs at least one thread".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("genforge-worker-{}", index))
            .build()
            .context("Failed to build worker pool")?;
        Ok(Executor::Pool(Arc::new(pool)))
    }

    /// Number of tasks that may run at the same time.
    pub fn concurrency(&self) -> usize {
        match self {
            Executor::Inline => 1,
            Executor::Global => rayon::current_num_threads(),
            Executor::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Applies `task` to every item and returns the results in item order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing item (in item order). A panicking task
    /// is reported as `GeneticError::Evaluation`.
    pub fn try_map<I, T, Task>(&self, items: Vec<I>, task: Task) -> Result<Vec<T>>
    where
        I: Send,
        T: Send,
        Task: Fn(I) -> Result<T> + Send + Sync,
    {
        let run = |item: I| -> Result<T> {
            match catch_unwind(AssertUnwindSafe(|| task(item))) {
                Ok(result) => result,
                Err(payload) => Err(GeneticError::Evaluation(format!(
                    "Worker task panicked: {}",
                    panic_message(payload.as_ref())
                ))),
            }
        };

        let results: Vec<Result<T>> = match self {
            Executor::Inline => items.into_iter().map(run).collect(),
            Executor::Global => items.into_par_iter().map(run).collect(),
            Executor::Pool(pool) => pool.install(|| items.into_par_iter().map(run).collect()),
        };

        results.into_iter().collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executor::Inline => write!(f, "Executor::Inline"),
            Executor::Global => write!(f, "Executor::Global"),
            Executor::Pool(pool) => write!(f, "Executor::Pool({} threads)", pool.current_num_threads()),
        }
    }
}

/// Splits `0..n` into `k` contiguous slices.
///
/// The first `k - n % k` slices hold `n / k` items, the remaining ones `n / k + 1`.
/// `k` is clamped to `[1, n]`; an empty range yields no slices.
pub fn partition(n: usize, k: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);
    let size = n / k;
    let small = k - n % k;

    let mut slices = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let len = if i < small { size } else { size + 1 };
        slices.push(start..start + len);
        start += len;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_sizes() {
        let slices = partition(10, 3);
        assert_eq!(slices, vec![0..3, 3..6, 6..10]);

        let slices = partition(7, 7);
        assert!(slices.iter().all(|s| s.len() == 1));

        assert_eq!(partition(5, 1), vec![0..5]);
        assert_eq!(partition(3, 10).len(), 3);
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_partition_covers_range() {
        for n in 1..40 {
            for k in 1..=n {
                let slices = partition(n, k);
                assert_eq!(slices.len(), k);
                assert_eq!(slices.first().map(|s| s.start), Some(0));
                assert_eq!(slices.last().map(|s| s.end), Some(n));
                assert!(slices.windows(2).all(|w| w[0].end == w[1].start));
                let min = slices.iter().map(|s| s.len()).min().unwrap();
                let max = slices.iter().map(|s| s.len()).max().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn test_try_map_keeps_order() {
        let executor = Executor::with_threads(3).unwrap();
        let result = executor
            .try_map((0..50).collect(), |i: usize| Ok(i * 2))
            .unwrap();
        assert_eq!(result, (0..50).map(|i| i * 2).collect::<Vec<_>>());
        assert_eq!(executor.concurrency(), 3);
    }

    #[test]
    fn test_try_map_reports_panic_after_draining() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let finished = AtomicUsize::new(0);
        for executor in [Executor::Inline, Executor::with_threads(2).unwrap()] {
            finished.store(0, Ordering::SeqCst);
            let result = executor.try_map((0..8).collect(), |i: usize| {
                if i == 3 {
                    panic!("boom");
                }
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            });
            match result {
                Err(GeneticError::Evaluation(msg)) => assert!(msg.contains("boom")),
                other => panic!("unexpected result {:?}", other),
            }
            assert_eq!(finished.load(Ordering::SeqCst), 7);
        }
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        assert!(matches!(
            Executor::with_threads(0),
            Err(GeneticError::Configuration(_))
        ));
    }
}
