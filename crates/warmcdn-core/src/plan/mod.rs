//! Dispatch plan construction: prefix filter, multi/single partition, batching.
//!
//! Turns the unordered bucket listing into a deterministic sequence of
//! prefetch requests: keys under the configured prefix are split into a
//! multi-prefetch group (extension match) and a single-prefetch group,
//! each sorted, mapped to CDN paths, and the multi group chunked into
//! bounded batches.

mod batch;

pub use batch::split_into_batches;

/// A storage key turned into a CDN path: leading `/` prepended.
pub fn prefetch_path(key: &str) -> String {
    format!("/{key}")
}

/// The complete, immutable output of classification and batching for one run.
///
/// `batches` are dispatched first (each possibly repeated), then `singles`,
/// in the order stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Multi-prefetch batches, each at most `max_batch` paths.
    pub batches: Vec<Vec<String>>,
    /// Paths dispatched one per request.
    pub singles: Vec<String>,
}

impl DispatchPlan {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.singles.is_empty()
    }

    /// Total number of paths across batches and singles.
    pub fn path_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum::<usize>() + self.singles.len()
    }
}

/// Builds the dispatch plan from a raw key listing.
///
/// Keys not under `prefix` are dropped (not an error: the bucket holds more
/// than the HLS tree). The retained keys are partitioned by extension suffix
/// (case-sensitive), each group sorted lexicographically so batch boundaries
/// are stable across runs, then mapped through [`prefetch_path`].
///
/// `extensions` must not contain an empty string; an empty suffix matches
/// every key (see `WarmerConfig::extension_list`).
pub fn build_plan(
    keys: &[String],
    prefix: &str,
    extensions: &[String],
    max_batch: usize,
) -> DispatchPlan {
    debug_assert!(max_batch > 0);
    debug_assert!(extensions.iter().all(|e| !e.is_empty()));

    let mut multi: Vec<&String> = Vec::new();
    let mut single: Vec<&String> = Vec::new();
    for key in keys.iter().filter(|k| k.starts_with(prefix)) {
        if extensions.iter().any(|ext| key.ends_with(ext.as_str())) {
            multi.push(key);
        } else {
            single.push(key);
        }
    }

    multi.sort_unstable();
    single.sort_unstable();

    let multi_paths: Vec<String> = multi.iter().map(|k| prefetch_path(k)).collect();
    let singles: Vec<String> = single.iter().map(|k| prefetch_path(k)).collect();

    DispatchPlan {
        batches: split_into_batches(multi_paths, max_batch),
        singles,
    }
}
