//! Sheet collection and host wiring.
//!
//! The manager owns every sheet, tracks the active one, and holds the
//! capabilities the host must provide. Capabilities are plain optional
//! fields — reading one before the host supplies it is a sequencing bug
//! and fails loudly at the call site instead of degrading silently.

use crate::error::{GridError, Result};
use crate::history::{Action, ActionOutcome};
use crate::scroll::CanvasSize;
use crate::state::Sheet;
use crate::types::SheetData;

/// Collaborator-supplied inputs, absent until the host wires them.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostBindings {
    canvas_size: Option<CanvasSize>,
}

impl HostBindings {
    /// Provide or refresh the canvas extent (on layout and resize).
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = Some(size);
    }

    /// The canvas extent, or `MissingCapability` when queried before the
    /// host's first layout pass.
    pub fn canvas_size(&self) -> Result<CanvasSize> {
        self.canvas_size
            .ok_or(GridError::MissingCapability("canvas_size"))
    }
}

/// All sheets of one document plus the active index.
pub struct SheetManager {
    sheets: Vec<Sheet>,
    active: usize,
    bindings: HostBindings,
    sheet_changed: bool,
}

impl Default for SheetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetManager {
    /// A manager with one default sheet.
    pub fn new() -> Self {
        Self::from_data(vec![SheetData::default()])
    }

    /// A manager over the given sheets; an empty list gets one default
    /// sheet so there is always an active sheet.
    pub fn from_data(datas: Vec<SheetData>) -> Self {
        let mut sheets: Vec<Sheet> = datas.into_iter().map(Sheet::new).collect();
        if sheets.is_empty() {
            sheets.push(Sheet::new(SheetData::default()));
        }
        Self {
            sheets,
            active: 0,
            bindings: HostBindings::default(),
            sheet_changed: false,
        }
    }

    pub fn bindings(&self) -> &HostBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut HostBindings {
        &mut self.bindings
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    // The constructor guarantees at least one sheet and set_active bounds
    // the index.
    #[allow(clippy::indexing_slicing)]
    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    #[allow(clippy::indexing_slicing)]
    pub fn active_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.active]
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Switch the active sheet.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(GridError::SheetIndex(index));
        }
        if index != self.active {
            self.active = index;
            self.sheet_changed = true;
        }
        Ok(())
    }

    /// Append a sheet; optionally make it active.
    pub fn add_sheet(&mut self, data: SheetData, activate: bool) -> usize {
        self.sheets.push(Sheet::new(data));
        let index = self.sheets.len() - 1;
        if activate {
            self.active = index;
            self.sheet_changed = true;
        }
        index
    }

    /// Drain the sheet-switch signal, analogous to `Sheet::take_dirty`.
    pub fn take_sheet_changed(&mut self) -> bool {
        std::mem::take(&mut self.sheet_changed)
    }

    /// Dispatch an action against the active sheet using the host-supplied
    /// canvas extent.
    pub fn dispatch_action(&mut self, action: &Action) -> Result<ActionOutcome> {
        let canvas = self.bindings.canvas_size()?;
        Ok(self.active_sheet_mut().apply_action(action, canvas))
    }
}
