//! Common test utilities and builders.
//!
//! Builds sheets with known geometry for the integration suites. The
//! default axes match `SheetData::default()`: 150 columns of 80px behind a
//! 60px row-label band, 100 rows of 20px behind a 20px column-label band.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use sheetgrid::state::Sheet;
use sheetgrid::{CanvasSize, Cell, SheetData, Viewport};

/// Canvas whose body is exactly 5 default columns by 11 default rows.
pub const TEST_CANVAS: CanvasSize = CanvasSize {
    width: 460,
    height: 240,
};

/// Fluent builder over the persisted sheet form.
pub struct SheetBuilder {
    data: SheetData,
}

impl Default for SheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self {
            data: SheetData::default(),
        }
    }

    pub fn cell(mut self, x: i64, y: i64, text: &str) -> Self {
        self.data
            .matrix
            .entry(y)
            .or_default()
            .insert(x, Cell::text(text));
        self
    }

    pub fn merge(mut self, x: i64, y: i64, x_end: i64, y_end: i64) -> Self {
        self.data.merges.push(Viewport::new(x, y, x_end, y_end));
        self
    }

    pub fn col_width(mut self, index: i64, width: u32) -> Self {
        self.data.cols.set_size(index, width);
        self
    }

    pub fn row_height(mut self, index: i64, height: u32) -> Self {
        self.data.rows.set_size(index, height);
        self
    }

    pub fn build(self) -> SheetData {
        self.data
    }

    pub fn sheet(self) -> Sheet {
        Sheet::new(self.data)
    }
}

/// Assert that a sheet's merge registry contains exactly this region.
pub fn assert_merge_exists(sheet: &Sheet, x: i64, y: i64, x_end: i64, y_end: i64) {
    let expected = Viewport::new(x, y, x_end, y_end);
    assert!(
        sheet.state().merges.contains(&expected),
        "expected merge {expected:?} in {:?}",
        sheet.state().merges
    );
}
