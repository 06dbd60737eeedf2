//! Chunked data-parallel iteration over an ordinal range
//!
//! This module provides the scheduling primitive the boundary-marking pass
//! fans out on: a fixed range of ordinals, distributed across worker threads
//! in fixed-size chunks claimed from a shared cursor. Chunking amortizes the
//! claim overhead when items are cheap while still balancing load when item
//! costs vary wildly (sequence lengths span orders of magnitude).
//!
//! No ordering is guaranteed between items; callers must be commutative
//! across the range. The join before returning is the only synchronization
//! point.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::Result;

/// Applies `op` to every ordinal in `start..end`, distributing across up to
/// `num_threads` workers in chunks of `chunk_size` ordinals
///
/// A concurrency degree of 1 runs inline on the calling thread with no
/// workers spawned; a degree of 0 resolves to the number of available CPUs.
/// If any application of `op` fails, workers stop claiming further chunks
/// and the first error observed is returned after all workers have joined;
/// in-flight chunks still run to completion.
pub fn parallel_for<F>(
    start: usize,
    end: usize,
    num_threads: usize,
    chunk_size: usize,
    op: F,
) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    if start >= end {
        return Ok(());
    }
    if num_threads == 1 {
        for i in start..end {
            op(i)?;
        }
        return Ok(());
    }

    // Calculate the number of threads to use
    let num_threads = if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads.min(num_cpus::get())
    };
    let chunk_size = chunk_size.max(1);

    let cursor = AtomicUsize::new(start);
    let failed = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(num_threads);
        for _ in 0..num_threads {
            handles.push(scope.spawn(|| -> Result<()> {
                loop {
                    if failed.load(Ordering::Relaxed) {
                        return Ok(());
                    }
                    let lo = cursor.fetch_add(chunk_size, Ordering::Relaxed);
                    if lo >= end {
                        return Ok(());
                    }
                    let hi = (lo + chunk_size).min(end);
                    for i in lo..hi {
                        if let Err(e) = op(i) {
                            failed.store(true, Ordering::Relaxed);
                            return Err(e);
                        }
                    }
                }
            }));
        }

        let mut first_err = None;
        for handle in handles {
            let result = handle.join().expect("Error joining worker thread");
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}
