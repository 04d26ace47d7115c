#![forbid(unsafe_code)]

use rayon::ThreadPool;
use std::sync::OnceLock;

/// Crate-local rayon pool for filter evaluation.
///
/// Rayon's global pool can fail to initialize under tight resource limits
/// and then panics on first use. Building our own pool keeps that failure
/// observable: when no pool can be built at any size, [`pool`] returns
/// `None` and callers run sequentially.
static FILTER_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

pub(crate) fn pool() -> Option<&'static ThreadPool> {
    FILTER_POOL
        .get_or_init(|| {
            let threads = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            let build = |n| rayon::ThreadPoolBuilder::new().num_threads(n).build();
            build(threads).or_else(|_| build(1)).ok()
        })
        .as_ref()
}
