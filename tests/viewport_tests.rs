//! Viewport algebra and merge-snapping tests.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use proptest::prelude::*;
use sheetgrid::{GridError, Viewport};

#[test]
fn test_single_cell_viewport() {
    let cell = Viewport::cell(3, 7);
    assert!(cell.is_cell());
    assert_eq!((cell.width(), cell.height()), (1, 1));
    assert!(cell.contains_cell(3, 7));
    assert!(!cell.contains_cell(3, 8));
}

#[test]
fn test_containment_requires_all_four_bounds() {
    let outer = Viewport::new(1, 1, 5, 5);
    assert!(outer.contains(&Viewport::new(1, 1, 5, 5)));
    assert!(!outer.contains(&Viewport::new(0, 1, 5, 5)));
    assert!(!outer.contains(&Viewport::new(1, 0, 5, 5)));
    assert!(!outer.contains(&Viewport::new(1, 1, 6, 5)));
    assert!(!outer.contains(&Viewport::new(1, 1, 5, 6)));
}

#[test]
fn test_union_all_of_empty_input_is_invalid() {
    assert!(matches!(Viewport::union_all(&[]), Err(GridError::EmptyUnion)));
}

#[test]
fn test_union_all_single_input_is_identity() {
    let v = Viewport::new(2, 3, 4, 5);
    assert_eq!(Viewport::union_all(&[v]).unwrap(), v);
}

#[test]
fn test_snap_to_merges_noop_without_contact() {
    let merges = [Viewport::new(10, 10, 12, 12)];
    let v = Viewport::new(0, 0, 2, 2);
    assert_eq!(v.snap_to_merges(&merges), v);
}

#[test]
fn test_snap_absorbs_touched_merge() {
    let merges = [Viewport::new(1, 1, 4, 2)];
    let snapped = Viewport::cell(2, 2).snap_to_merges(&merges);
    assert_eq!(snapped, Viewport::new(1, 1, 4, 2));
}

fn arb_viewport(bound: i64) -> impl Strategy<Value = Viewport> {
    (0..bound, 0..bound, 0..bound, 0..bound)
        .prop_map(|(x1, y1, x2, y2)| Viewport::spanning(x1, y1, x2, y2))
}

proptest! {
    #[test]
    fn prop_snap_is_idempotent(
        v in arb_viewport(24),
        merges in proptest::collection::vec(arb_viewport(24), 0..8),
    ) {
        // Adversarial orderings included: merges arrive unsorted and may
        // even overlap each other.
        let once = v.snap_to_merges(&merges);
        prop_assert_eq!(once, once.snap_to_merges(&merges));
        prop_assert!(once.contains(&v));
    }

    #[test]
    fn prop_snap_covers_every_touched_merge(
        v in arb_viewport(24),
        merges in proptest::collection::vec(arb_viewport(24), 0..8),
    ) {
        let snapped = v.snap_to_merges(&merges);
        for merge in &merges {
            if merge.intersects(&snapped) {
                prop_assert!(snapped.contains(merge));
            }
        }
    }
}
