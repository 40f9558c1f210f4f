//! Typed change events.
//!
//! Each applied operation emits exactly one event naming what changed.
//! There is no wildcard channel; the per-tick render signal is the sheet's
//! dirty flag, drained separately by the host.

use crate::state::SizeKey;

/// Which part of the sheet an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetEventKind {
    UpdateState,
    UpdateCells,
    UpdateColSize,
    UpdateRowSize,
}

/// A change descriptor delivered to subscribers after an operation applies.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    /// One or more state fields were patched or restored.
    UpdateState { fields: Vec<StateField> },
    /// A single cell entry was written or deleted.
    UpdateCells { x: i64, y: i64 },
    UpdateColSize { key: SizeKey, value: u32 },
    UpdateRowSize { key: SizeKey, value: u32 },
}

impl SheetEvent {
    pub fn kind(&self) -> SheetEventKind {
        match self {
            SheetEvent::UpdateState { .. } => SheetEventKind::UpdateState,
            SheetEvent::UpdateCells { .. } => SheetEventKind::UpdateCells,
            SheetEvent::UpdateColSize { .. } => SheetEventKind::UpdateColSize,
            SheetEvent::UpdateRowSize { .. } => SheetEventKind::UpdateRowSize,
        }
    }
}

/// Fields an `UpdateState` event may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    GridViewport,
    SelectedViewport,
    SelectedGroupViewport,
    Merges,
    ResizingCol,
    ResizingRow,
    ResizedSize,
    Tag,
    /// Axes and matrix content, reported by snapshot restores.
    Content,
}

/// Handle returned by `Sheet::on`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(pub(crate) u64);

pub(crate) type ListenerFn = Box<dyn FnMut(&SheetEvent)>;

pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) kind: SheetEventKind,
    pub(crate) callback: ListenerFn,
}
