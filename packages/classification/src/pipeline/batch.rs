//! Batcher - partition pending items into fixed-size groups.

use std::collections::HashSet;

/// Partition the not-yet-classified items into ordered batches.
///
/// Items whose index is in `done` are skipped; the rest keep their source
/// order and are grouped into at most `batch_size` elements per batch. An
/// empty pending set yields zero batches.
pub fn pending_batches<'a, I>(
    items: &'a [I],
    done: &HashSet<usize>,
    batch_size: usize,
) -> Vec<Vec<(usize, &'a I)>> {
    let pending: Vec<(usize, &I)> = items
        .iter()
        .enumerate()
        .filter(|(idx, _)| !done.contains(idx))
        .collect();

    pending
        .chunks(batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
