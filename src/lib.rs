//! sheetgrid - canvas spreadsheet grid engine
//!
//! The coordinate and state core of a canvas-rendered spreadsheet widget:
//! - Sparse per-index row/column sizing with O(overrides) pixel math
//! - Viewport algebra, merge regions, and merge-aware selection
//! - Scroll and wheel input to visible-range conversion
//! - Immutable-per-update sheet state with typed change events
//! - Transactional actions with snapshot-based undo/redo
//!
//! Drawing, pointer capture, and scrollbars are the host's concern; the
//! engine consumes pixel inputs and hands back state snapshots and pixel
//! geometry.
//!
//! # Usage
//!
//! ```
//! use sheetgrid::{Action, CanvasSize, CellPatch, SheetManager};
//!
//! let mut grid = SheetManager::new();
//! grid.bindings_mut().set_canvas_size(CanvasSize::new(800, 600));
//!
//! grid.dispatch_action(&Action::EditCell {
//!     x: 0,
//!     y: 0,
//!     value: Some(CellPatch::text("hello")),
//! })?;
//! assert!(grid.active_sheet().can_undo());
//!
//! let state = grid.active_sheet().state();
//! assert_eq!(state.cell_at(0, 0).text.as_deref(), Some("hello"));
//! # Ok::<(), sheetgrid::GridError>(())
//! ```

pub mod axis;
pub mod error;
pub mod hit_test;
pub mod history;
pub mod manager;
pub mod merges;
pub mod scroll;
pub mod state;
pub mod types;
pub mod viewport;

pub use axis::SparseAxis;
pub use error::{GridError, Result};
pub use history::{Action, ActionOutcome, History, Snapshot};
pub use manager::{HostBindings, SheetManager};
pub use scroll::{CanvasSize, ScrollAxis, WheelScroll};
pub use state::{
    CellPatch, InteractionTag, ListenerId, Operation, Sheet, SheetEvent, SheetEventKind,
    SheetState, SizeKey, StateField, StatePatch,
};
pub use types::{Cell, CellStyle, SheetData, EMPTY_CELL};
pub use viewport::Viewport;
