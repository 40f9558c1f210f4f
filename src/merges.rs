//! The merge registry: the set of viewports that render and edit as one
//! cell.
//!
//! Plain linear scans — sheets carry few merges, so a spatial index would
//! buy nothing. The registry keeps one invariant: merges never overlap.

use crate::viewport::Viewport;

/// First merge containing the cell `(x, y)`, with its registry index.
pub fn find_merge_at(merges: &[Viewport], x: i64, y: i64) -> Option<(usize, Viewport)> {
    merges
        .iter()
        .enumerate()
        .find(|(_, m)| m.contains_cell(x, y))
        .map(|(i, m)| (i, *m))
}

/// True when `viewport` exactly matches a registered merge.
pub fn is_merged_region(merges: &[Viewport], viewport: &Viewport) -> bool {
    merges.iter().any(|m| m == viewport)
}

/// Remove the merge covering `(x, y)`, if any, and return it.
///
/// Removal swaps with the last entry; survivor order is not preserved and
/// callers must not rely on it beyond this registry's own scans.
pub fn unmerge_at(merges: &mut Vec<Viewport>, x: i64, y: i64) -> Option<Viewport> {
    let (index, _) = find_merge_at(merges, x, y)?;
    Some(merges.swap_remove(index))
}

/// Register `viewport` as a merge and return the viewport actually stored.
///
/// The incoming range first grows to cover every merge it touches, then the
/// merges the grown range contains are dropped and the grown range is
/// appended. A new merge that partially overlapped an existing one therefore
/// absorbs it instead of leaving two overlapping regions behind.
pub fn merge_viewport(merges: &mut Vec<Viewport>, viewport: Viewport) -> Viewport {
    let snapped = viewport.snap_to_merges(merges);
    merges.retain(|m| !snapped.contains(m));
    merges.push(snapped);
    snapped
}
