//! Iteration over the visible window.
//!
//! Renderers walk these to place grid lines, header labels, and cell text.
//! Offsets are pixels from the grid origin (the top-left of the scrollable
//! body, headers excluded).

use crate::state::SheetState;
use crate::types::{Cell, EMPTY_CELL};

/// One visible row or column slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSlot {
    pub index: i64,
    pub size: u32,
    /// Pixel offset of the slot's leading edge from the grid origin.
    pub offset: u64,
}

/// A non-empty cell inside the visible window, with its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCell<'a> {
    pub cell: &'a Cell,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub x_offset: u64,
    pub y_offset: u64,
}

/// Visible column slots, left to right.
pub fn visible_cols(state: &SheetState) -> impl Iterator<Item = AxisSlot> + '_ {
    let viewport = state.grid_viewport;
    let mut offset: u64 = 0;
    (viewport.x..=viewport.x_end).map(move |index| {
        let size = state.cols.size_of(index);
        let slot = AxisSlot {
            index,
            size,
            offset,
        };
        offset += u64::from(size);
        slot
    })
}

/// Visible row slots, top to bottom.
pub fn visible_rows(state: &SheetState) -> impl Iterator<Item = AxisSlot> + '_ {
    let viewport = state.grid_viewport;
    let mut offset: u64 = 0;
    (viewport.y..=viewport.y_end).map(move |index| {
        let size = state.rows.size_of(index);
        let slot = AxisSlot {
            index,
            size,
            offset,
        };
        offset += u64::from(size);
        slot
    })
}

/// Non-empty visible cells in row-major order. Offsets advance over empty
/// cells too, so geometry stays correct in sparse rows.
pub fn visible_cells(state: &SheetState) -> impl Iterator<Item = VisibleCell<'_>> {
    visible_rows(state).flat_map(move |row| {
        visible_cols(state).filter_map(move |col| {
            let cell = state.cell_at(col.index, row.index);
            if cell == &EMPTY_CELL {
                return None;
            }
            Some(VisibleCell {
                cell,
                x: col.index,
                y: row.index,
                width: col.size,
                height: row.size,
                x_offset: col.offset,
                y_offset: row.offset,
            })
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::state::{CellPatch, Operation, SheetState};
    use crate::types::SheetData;
    use crate::viewport::Viewport;

    fn state_with_viewport() -> SheetState {
        let mut state = SheetState::from_data(SheetData::default());
        state.grid_viewport = Viewport::new(0, 0, 3, 2);
        state.cols.set_size(1, 120);
        state
    }

    #[test]
    fn test_visible_cols_accumulate_offsets() {
        let state = state_with_viewport();
        let slots: Vec<AxisSlot> = visible_cols(&state).collect();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots.first().unwrap().offset, 0);
        // Default width 80, then the 120px override at index 1.
        assert_eq!(slots.get(1).unwrap().offset, 80);
        assert_eq!(slots.get(2).unwrap().offset, 200);
    }

    #[test]
    fn test_visible_cells_skip_empty_but_keep_geometry() {
        let mut state = state_with_viewport();
        state = crate::state::apply(
            &state,
            &Operation::UpdateCell {
                x: 2,
                y: 1,
                value: Some(CellPatch::text("only")),
            },
        );

        let cells: Vec<VisibleCell<'_>> = visible_cells(&state).collect();
        assert_eq!(cells.len(), 1);
        let cell = cells.first().unwrap();
        assert_eq!((cell.x, cell.y), (2, 1));
        // Offset counts the empty cells before it: 80 + 120.
        assert_eq!(cell.x_offset, 200);
        assert_eq!(cell.y_offset, 20);
    }
}
