//! Scroll input to visible viewport.
//!
//! Converts absolute scrollbar offsets and relative wheel deltas into the
//! grid viewport, clamped so the last page still fills the canvas. All
//! out-of-range input saturates silently; nothing here errors.

use crate::axis::SparseAxis;
use crate::state::SheetState;
use crate::viewport::Viewport;

/// Canvas pixel extent supplied by the host, header bands included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u64,
    pub height: u64,
}

impl CanvasSize {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    /// Extent of the scrollable body on one axis: canvas minus the
    /// opposing header band.
    fn grid_extent(&self, state: &SheetState, axis: ScrollAxis) -> u64 {
        match axis {
            ScrollAxis::Horizontal => self
                .width
                .saturating_sub(u64::from(state.cols.header_size())),
            ScrollAxis::Vertical => self
                .height
                .saturating_sub(u64::from(state.rows.header_size())),
        }
    }
}

/// Which axis a scroll gesture moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

/// Result of a wheel step: the new viewport plus the pixel offset of its
/// leading edge, for the host to sync its scrollbar to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelScroll {
    pub viewport: Viewport,
    pub consumed: u64,
}

/// Furthest-scrollable start index on one axis: walking backward from the
/// last index, the first position whose remaining cells would overflow the
/// extent.
fn last_start(axis: &SparseAxis, extent: u64) -> i64 {
    let mut index = axis.last_index();
    let mut accumulated: u64 = 0;
    while index >= 0 {
        let size = u64::from(axis.size_of(index));
        if accumulated + size > extent {
            break;
        }
        accumulated += size;
        index -= 1;
    }
    (index + 1).min(axis.last_index()).max(0)
}

/// The furthest-scrollable viewport: scrolling stops here instead of
/// running past the content into blank space.
pub fn last_viewport(state: &SheetState, canvas: CanvasSize) -> Viewport {
    let x = last_start(&state.cols, canvas.grid_extent(state, ScrollAxis::Horizontal));
    let y = last_start(&state.rows, canvas.grid_extent(state, ScrollAxis::Vertical));
    let x_end = state.cols.last_index().max(x);
    let y_end = state.rows.last_index().max(y);
    Viewport::new(x, y, x_end, y_end)
}

/// Viewport for an absolute scroll offset (scrollbar drag).
///
/// Finds the top-left index by advancing from 0, clamps it into
/// `[0, last_viewport]`, then advances by the visible extent to find the
/// bottom-right index.
pub fn viewport_for_scroll(
    state: &SheetState,
    canvas: CanvasSize,
    scroll_left: u64,
    scroll_top: u64,
) -> Viewport {
    let last = last_viewport(state, canvas);
    let (x, _) = state.cols.advance_by_pixels(0, scroll_left);
    let (y, _) = state.rows.advance_by_pixels(0, scroll_top);
    let x = x.clamp(0, last.x);
    let y = y.clamp(0, last.y);
    with_trailing_edges(state, canvas, x, y)
}

/// Viewport for a relative wheel delta.
///
/// `offset` is the host's current pixel offset on `axis`; the delta is
/// applied on top. Force move: when the shifted offset stays inside the
/// current leading cell, the index still steps by one in the delta's sign,
/// so wheel input never goes dead — except at the first and last page,
/// where it saturates.
pub fn viewport_for_wheel(
    state: &SheetState,
    canvas: CanvasSize,
    offset: u64,
    delta: i64,
    axis: ScrollAxis,
) -> WheelScroll {
    let last = last_viewport(state, canvas);
    let sparse = match axis {
        ScrollAxis::Horizontal => &state.cols,
        ScrollAxis::Vertical => &state.rows,
    };
    let (last_leading, current_leading) = match axis {
        ScrollAxis::Horizontal => (last.x, state.grid_viewport.x),
        ScrollAxis::Vertical => (last.y, state.grid_viewport.y),
    };

    let target = offset.saturating_add_signed(delta);
    let (mut leading, mut consumed) = sparse.advance_by_pixels(0, target);

    if leading == current_leading && delta != 0 {
        if delta > 0 && leading < last_leading {
            consumed += u64::from(sparse.size_of(leading));
            leading += 1;
        } else if delta < 0 && leading > 0 {
            leading -= 1;
            consumed = consumed.saturating_sub(u64::from(sparse.size_of(leading)));
        }
    }
    if leading > last_leading {
        leading = last_leading;
        consumed = sparse.pixel_distance(0, leading);
    }
    log::trace!("wheel {axis:?} delta {delta} -> leading {leading}");

    let (x, y) = match axis {
        ScrollAxis::Horizontal => (leading, state.grid_viewport.y),
        ScrollAxis::Vertical => (state.grid_viewport.x, leading),
    };
    let viewport = with_trailing_edges(state, canvas, x.clamp(0, last.x), y.clamp(0, last.y));
    WheelScroll { viewport, consumed }
}

/// Complete a viewport from its top-left index by advancing each axis
/// across the visible extent.
fn with_trailing_edges(state: &SheetState, canvas: CanvasSize, x: i64, y: i64) -> Viewport {
    let (x_end, _) = state
        .cols
        .advance_by_pixels(x, canvas.grid_extent(state, ScrollAxis::Horizontal));
    let (y_end, _) = state
        .rows
        .advance_by_pixels(y, canvas.grid_extent(state, ScrollAxis::Vertical));
    Viewport::new(x, y, x_end.max(x), y_end.max(y))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::SheetData;

    // Default data: 150 cols of 80px (header 60), 100 rows of 20px
    // (header 20).
    fn test_state() -> SheetState {
        SheetState::from_data(SheetData::default())
    }

    fn canvas() -> CanvasSize {
        // Body: 400px wide (5 cols), 220px tall (11 rows).
        CanvasSize::new(460, 240)
    }

    #[test]
    fn test_last_viewport_fills_canvas() {
        let state = test_state();
        let last = last_viewport(&state, canvas());
        // 5 cols of 80 fill 400px exactly; 11 rows of 20 fill 220px.
        assert_eq!(last.x, 145);
        assert_eq!(last.y, 89);
        assert_eq!(last.x_end, 149);
        assert_eq!(last.y_end, 99);
    }

    #[test]
    fn test_scroll_to_origin() {
        let state = test_state();
        let viewport = viewport_for_scroll(&state, canvas(), 0, 0);
        assert_eq!((viewport.x, viewport.y), (0, 0));
        // 400px body fits cols 0..=4 exactly; 220px fits rows 0..=10.
        assert_eq!(viewport.x_end, 4);
        assert_eq!(viewport.y_end, 10);
    }

    #[test]
    fn test_scroll_saturates_at_last_page() {
        let state = test_state();
        let viewport = viewport_for_scroll(&state, canvas(), u64::MAX / 2, u64::MAX / 2);
        let last = last_viewport(&state, canvas());
        assert_eq!((viewport.x, viewport.y), (last.x, last.y));
    }

    #[test]
    fn test_wheel_force_move_on_small_delta() {
        let state = test_state();
        // Offset 0 is exactly the row 0 boundary; a 5px delta would not
        // change the index on its own.
        let scrolled = viewport_for_wheel(&state, canvas(), 0, 5, ScrollAxis::Vertical);
        assert_eq!(scrolled.viewport.y, 1);
        assert_eq!(scrolled.consumed, 20);
    }

    #[test]
    fn test_wheel_back_at_origin_is_clamped() {
        let state = test_state();
        let scrolled = viewport_for_wheel(&state, canvas(), 0, -3, ScrollAxis::Vertical);
        assert_eq!(scrolled.viewport.y, 0);
        assert_eq!(scrolled.consumed, 0);
    }
}
