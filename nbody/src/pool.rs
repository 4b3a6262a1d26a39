use rayon::{ThreadPool, ThreadPoolBuilder};

/// Fixed-size pool the parallel solvers fan their work out on.
///
/// The outer simulation loop stays single-threaded; parallel regions are
/// bulk-synchronous: split the work into blocks, spawn them on the pool, wait
/// for all of them, continue.
pub struct WorkerPool {
    pool: ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Self {
        assert!(threads > 0, "worker pool needs at least one thread");
        Self {
            pool: ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap(),
            threads,
        }
    }

    /// Pool sized to the host's logical CPU count.
    pub fn with_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(threads)
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    /// Run one invocation of `f` per prepared block and wait for all of them.
    ///
    /// Block preparation is the caller's business: [`block_ranges`] for index
    /// ranges, [`split_blocks_mut`] for slices. Each block moves into its own
    /// task, so blocks may carry exclusive references.
    pub fn parallel_blocks<T, I, F>(&self, blocks: I, f: F)
    where
        I: IntoIterator<Item = T> + Send,
        T: Send,
        F: Fn(T) + Sync,
    {
        self.pool.scope(|scope| {
            for block in blocks {
                let f = &f;
                scope.spawn(move |_| f(block));
            }
        });
    }
}

/// Split `[first, last)` into at most `n_blocks` contiguous ranges whose
/// lengths differ by at most one. Empty ranges are skipped.
pub fn block_ranges(
    first: usize,
    last: usize,
    n_blocks: usize,
) -> impl Iterator<Item = (usize, usize)> {
    assert!(n_blocks > 0, "cannot partition into zero blocks");
    let len = last.saturating_sub(first);
    let base = len / n_blocks;
    let extra = len % n_blocks;
    let mut start = first;
    (0..n_blocks).filter_map(move |i| {
        let size = base + usize::from(i < extra);
        if size == 0 {
            return None;
        }
        let range = (start, start + size);
        start += size;
        Some(range)
    })
}

/// Split a slice into the same balanced blocks as [`block_ranges`].
pub fn split_blocks_mut<T>(items: &mut [T], n_blocks: usize) -> Vec<&mut [T]> {
    let len = items.len();
    let mut rest = items;
    let mut blocks = Vec::new();
    for (first, last) in block_ranges(0, len, n_blocks) {
        let (block, tail) = rest.split_at_mut(last - first);
        blocks.push(block);
        rest = tail;
    }
    blocks
}
