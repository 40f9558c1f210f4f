//! Viewport scroller tests.
//!
//! Absolute scroll conversion, wheel deltas with the force-move rule, and
//! last-page clamping.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{SheetBuilder, TEST_CANVAS};
use sheetgrid::scroll::{last_viewport, viewport_for_scroll, viewport_for_wheel};
use sheetgrid::{Action, ScrollAxis};

#[test]
fn test_scroll_zero_shows_origin() {
    let sheet = SheetBuilder::new().sheet();
    let viewport = viewport_for_scroll(sheet.state(), TEST_CANVAS, 0, 0);
    assert_eq!((viewport.x, viewport.y), (0, 0));
}

#[test]
fn test_scroll_lands_on_offset_cell() {
    let sheet = SheetBuilder::new().sheet();
    // 3 columns = 240px, plus 10px into the fourth.
    let viewport = viewport_for_scroll(sheet.state(), TEST_CANVAS, 250, 0);
    assert_eq!(viewport.x, 3);
}

#[test]
fn test_scroll_respects_row_overrides() {
    let sheet = SheetBuilder::new().row_height(0, 100).sheet();
    // Row 0 is 100px tall; offset 90 is still inside it.
    let viewport = viewport_for_scroll(sheet.state(), TEST_CANVAS, 0, 90);
    assert_eq!(viewport.y, 0);
    let viewport = viewport_for_scroll(sheet.state(), TEST_CANVAS, 0, 101);
    assert_eq!(viewport.y, 1);
}

#[test]
fn test_last_viewport_reaches_sheet_end() {
    let sheet = SheetBuilder::new().sheet();
    let last = last_viewport(sheet.state(), TEST_CANVAS);
    assert_eq!(last.x_end, 149);
    assert_eq!(last.y_end, 99);
    // The last page exactly fills the 400x220 body.
    assert_eq!(last.x, 145);
    assert_eq!(last.y, 89);
}

#[test]
fn test_wheel_small_delta_still_moves_one_row() {
    let sheet = SheetBuilder::new().sheet();
    // At the row 0 boundary with a delta smaller than one 20px row.
    let scrolled = viewport_for_wheel(sheet.state(), TEST_CANVAS, 0, 4, ScrollAxis::Vertical);
    assert_eq!(scrolled.viewport.y, 1);
    assert_eq!(scrolled.consumed, 20);
}

#[test]
fn test_wheel_small_negative_delta_moves_back_one_row() {
    let mut sheet = SheetBuilder::new().sheet();
    // Land on row 5 first (5 rows = 100px).
    sheet.apply_action(
        &Action::Scroll {
            scroll_left: 0,
            scroll_top: 101,
        },
        TEST_CANVAS,
    );
    assert_eq!(sheet.state().grid_viewport.y, 5);

    let scrolled = viewport_for_wheel(sheet.state(), TEST_CANVAS, 101, -4, ScrollAxis::Vertical);
    assert_eq!(scrolled.viewport.y, 4);
    assert_eq!(scrolled.consumed, 80);
}

#[test]
fn test_wheel_clamps_at_last_page_under_repeated_large_deltas() {
    let mut sheet = SheetBuilder::new().sheet();
    let last = last_viewport(sheet.state(), TEST_CANVAS);

    let mut offset = 0u64;
    for _ in 0..200 {
        let outcome = sheet
            .apply_action(
                &Action::Wheel {
                    offset,
                    delta: 500,
                    axis: ScrollAxis::Vertical,
                },
                TEST_CANVAS,
            )
            .scroll_sync
            .unwrap_or(offset);
        offset = outcome;
        assert!(sheet.state().grid_viewport.y <= last.y);
    }
    assert_eq!(sheet.state().grid_viewport.y, last.y);
    assert_eq!(sheet.state().grid_viewport.y_end, last.y_end);
}

#[test]
fn test_wheel_at_origin_does_not_underflow() {
    let sheet = SheetBuilder::new().sheet();
    let scrolled = viewport_for_wheel(sheet.state(), TEST_CANVAS, 0, -300, ScrollAxis::Vertical);
    assert_eq!(scrolled.viewport.y, 0);
    assert_eq!(scrolled.consumed, 0);
}

#[test]
fn test_horizontal_wheel_moves_columns() {
    let sheet = SheetBuilder::new().sheet();
    let scrolled = viewport_for_wheel(sheet.state(), TEST_CANVAS, 0, 10, ScrollAxis::Horizontal);
    assert_eq!(scrolled.viewport.x, 1);
    assert_eq!(scrolled.viewport.y, 0);
    assert_eq!(scrolled.consumed, 80);
}

#[test]
fn test_scroll_action_updates_grid_viewport_once() {
    let mut sheet = SheetBuilder::new().sheet();
    sheet.take_dirty();
    let outcome = sheet.apply_action(
        &Action::Scroll {
            scroll_left: 170,
            scroll_top: 0,
        },
        TEST_CANVAS,
    );
    assert!(outcome.committed);
    assert_eq!(sheet.state().grid_viewport.x, 2);
    assert!(sheet.take_dirty());

    // Same target again: nothing changes, nothing re-renders.
    let outcome = sheet.apply_action(
        &Action::Scroll {
            scroll_left: 170,
            scroll_top: 0,
        },
        TEST_CANVAS,
    );
    assert!(!outcome.committed);
    assert!(!sheet.take_dirty());
}
