//! Pure chunking of the multi-prefetch path list.

/// Splits `paths` into consecutive, order-preserving batches of `size`.
///
/// The final batch holds the remainder (length in `[1, size]`). Empty input
/// produces zero batches. `size` must be > 0.
pub fn split_into_batches(paths: Vec<String>, size: usize) -> Vec<Vec<String>> {
    debug_assert!(size > 0);
    if paths.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(paths.len().div_ceil(size));
    let mut batch = Vec::with_capacity(size);
    for path in paths {
        batch.push(path);
        if batch.len() == size {
            out.push(std::mem::replace(&mut batch, Vec::with_capacity(size)));
        }
    }
    if !batch.is_empty() {
        out.push(batch);
    }
    out
}
