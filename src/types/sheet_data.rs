use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Cell;
use crate::axis::{SparseAxis, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
use crate::error::Result;
use crate::viewport::Viewport;

/// Default header sizes: the row-label band and the column-label band.
pub const DEFAULT_ROW_HEADER_WIDTH: u32 = 60;
pub const DEFAULT_COL_HEADER_HEIGHT: u32 = 20;

/// The sheet's durable, serializable form.
///
/// Everything else — selection, transient interaction flags, undo stacks —
/// is session-local and never persisted. The matrix is keyed row-first;
/// absent entries are empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub merges: Vec<Viewport>,
    pub matrix: BTreeMap<i64, BTreeMap<i64, Cell>>,
    pub cols: SparseAxis,
    pub rows: SparseAxis,
}

impl Default for SheetData {
    fn default() -> Self {
        Self {
            merges: Vec::new(),
            matrix: BTreeMap::new(),
            cols: SparseAxis::new(DEFAULT_COL_WIDTH, DEFAULT_ROW_HEADER_WIDTH, 150),
            rows: SparseAxis::new(DEFAULT_ROW_HEIGHT, DEFAULT_COL_HEADER_HEIGHT, 100),
        }
    }
}

impl SheetData {
    /// Encode to the persisted JSON layout.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the persisted JSON layout.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
