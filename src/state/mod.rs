//! Authoritative sheet state and its mutation engine.
//!
//! Every mutation goes through [`apply`]: a pure function from the current
//! state and one [`Operation`] to the next state. [`Sheet`] owns the current
//! snapshot, swaps it atomically on dispatch, notifies typed-event
//! subscribers, and raises a dirty flag the host drains at most once per
//! tick. Readers holding a clone of a previous state see a consistent past
//! snapshot — operations never edit shared branches in place.

mod events;
mod iter;
mod tags;

pub use events::{ListenerId, SheetEvent, SheetEventKind, StateField};
pub use iter::{visible_cells, visible_cols, visible_rows, AxisSlot, VisibleCell};
pub use tags::InteractionTag;

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::axis::SparseAxis;
use crate::history::History;
use crate::types::{Cell, CellStyle, SheetData, EMPTY_CELL};
use crate::viewport::Viewport;

use events::{Listener, ListenerFn};

/// One row of the sparse matrix. Rows sit behind `Rc` so cloning a state
/// shares every bucket and a cell write copies only the row it touches.
pub type RowBucket = Rc<BTreeMap<i64, Cell>>;

/// The complete per-sheet state: one immutable snapshot per update.
#[derive(Debug, Clone)]
pub struct SheetState {
    pub cols: SparseAxis,
    pub rows: SparseAxis,
    pub matrix: BTreeMap<i64, RowBucket>,
    pub merges: Vec<Viewport>,
    /// Currently visible window. Derived from scroll input; not part of
    /// undo snapshots.
    pub grid_viewport: Viewport,
    /// Focused range, expanded to cover any merge it touches.
    pub selected_viewport: Viewport,
    /// Drag range; always contains `selected_viewport`.
    pub selected_group_viewport: Viewport,
    pub resizing_col: Option<i64>,
    pub resizing_row: Option<i64>,
    pub resized_size: Option<u32>,
    pub tag: InteractionTag,
}

impl SheetState {
    /// Build the initial state from persisted sheet data.
    pub fn from_data(data: SheetData) -> Self {
        let origin = Viewport::cell(0, 0);
        Self {
            cols: data.cols,
            rows: data.rows,
            matrix: data
                .matrix
                .into_iter()
                .map(|(row, bucket)| (row, Rc::new(bucket)))
                .collect(),
            merges: data.merges,
            grid_viewport: origin,
            selected_viewport: origin,
            selected_group_viewport: origin,
            resizing_col: None,
            resizing_row: None,
            resized_size: None,
            tag: InteractionTag::NOOP,
        }
    }

    /// Extract the durable form for persistence.
    pub fn to_data(&self) -> SheetData {
        SheetData {
            merges: self.merges.clone(),
            matrix: self
                .matrix
                .iter()
                .map(|(&row, bucket)| (row, bucket.as_ref().clone()))
                .collect(),
            cols: self.cols.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Cell at `(x, y)`; absent coordinates resolve to [`EMPTY_CELL`].
    /// Header coordinates (negative indices) are the renderer's concern and
    /// also read as empty here.
    pub fn cell_at(&self, x: i64, y: i64) -> &Cell {
        if x < 0 || y < 0 {
            return &EMPTY_CELL;
        }
        self.matrix
            .get(&y)
            .and_then(|bucket| bucket.get(&x))
            .unwrap_or(&EMPTY_CELL)
    }

    /// First non-empty cell inside `viewport`, scanning row-major.
    pub fn first_non_empty_cell_in(&self, viewport: &Viewport) -> &Cell {
        for y in viewport.y..=viewport.y_end {
            let Some(bucket) = self.matrix.get(&y) else {
                continue;
            };
            for x in viewport.x..=viewport.x_end {
                if let Some(cell) = bucket.get(&x) {
                    if cell != &EMPTY_CELL {
                        return cell;
                    }
                }
            }
        }
        &EMPTY_CELL
    }
}

/// Target of a size update: one index (`-1` for the header) or the shared
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKey {
    Index(i64),
    Default,
}

/// Shallow patch applied to an existing cell. `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPatch {
    pub text: Option<String>,
    pub style: Option<CellStyle>,
}

impl CellPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            style: None,
        }
    }
}

/// Shallow patch over the non-content state fields. `None` leaves a field
/// untouched; the double-`Option` transient fields distinguish "set to
/// nothing" from "leave alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub grid_viewport: Option<Viewport>,
    pub selected_viewport: Option<Viewport>,
    pub selected_group_viewport: Option<Viewport>,
    pub merges: Option<Vec<Viewport>>,
    pub resizing_col: Option<Option<i64>>,
    pub resizing_row: Option<Option<i64>>,
    pub resized_size: Option<Option<u32>>,
    pub tag: Option<InteractionTag>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Which fields this patch sets, for the change descriptor.
    pub fn fields(&self) -> Vec<StateField> {
        let mut fields = Vec::new();
        if self.grid_viewport.is_some() {
            fields.push(StateField::GridViewport);
        }
        if self.selected_viewport.is_some() {
            fields.push(StateField::SelectedViewport);
        }
        if self.selected_group_viewport.is_some() {
            fields.push(StateField::SelectedGroupViewport);
        }
        if self.merges.is_some() {
            fields.push(StateField::Merges);
        }
        if self.resizing_col.is_some() {
            fields.push(StateField::ResizingCol);
        }
        if self.resizing_row.is_some() {
            fields.push(StateField::ResizingRow);
        }
        if self.resized_size.is_some() {
            fields.push(StateField::ResizedSize);
        }
        if self.tag.is_some() {
            fields.push(StateField::Tag);
        }
        fields
    }
}

/// The closed set of sheet mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    UpdateState(StatePatch),
    /// `value: None` deletes the entry, reverting the cell to empty;
    /// otherwise the patch shallow-merges onto the existing entry.
    UpdateCell {
        x: i64,
        y: i64,
        value: Option<CellPatch>,
    },
    UpdateColSize { key: SizeKey, value: u32 },
    UpdateRowSize { key: SizeKey, value: u32 },
}

/// Apply one operation, producing the next state. Untouched branches are
/// shared with the input state.
pub fn apply(state: &SheetState, op: &Operation) -> SheetState {
    let mut next = state.clone();
    match op {
        Operation::UpdateState(patch) => {
            if let Some(v) = patch.grid_viewport {
                next.grid_viewport = v;
            }
            if let Some(v) = patch.selected_viewport {
                next.selected_viewport = v;
            }
            if let Some(v) = patch.selected_group_viewport {
                next.selected_group_viewport = v;
            }
            if let Some(merges) = &patch.merges {
                next.merges = merges.clone();
            }
            if let Some(v) = patch.resizing_col {
                next.resizing_col = v;
            }
            if let Some(v) = patch.resizing_row {
                next.resizing_row = v;
            }
            if let Some(v) = patch.resized_size {
                next.resized_size = v;
            }
            if let Some(tag) = patch.tag {
                next.tag = tag;
            }
            debug_assert!(
                next.selected_group_viewport
                    .contains(&next.selected_viewport),
                "selection group must contain the focused selection"
            );
        }
        Operation::UpdateCell { x, y, value } => match value {
            None => {
                if let Some(bucket) = next.matrix.get_mut(y) {
                    Rc::make_mut(bucket).remove(x);
                }
            }
            Some(patch) => {
                let bucket = next.matrix.entry(*y).or_default();
                let bucket = Rc::make_mut(bucket);
                let cell = bucket.entry(*x).or_default();
                if let Some(text) = &patch.text {
                    cell.text = Some(text.clone());
                }
                if let Some(style) = &patch.style {
                    cell.style = Some(style.clone());
                }
            }
        },
        Operation::UpdateColSize { key, value } => match key {
            SizeKey::Index(i) => next.cols.set_size(*i, *value),
            SizeKey::Default => next.cols.set_default_size(*value),
        },
        Operation::UpdateRowSize { key, value } => match key {
            SizeKey::Index(i) => next.rows.set_size(*i, *value),
            SizeKey::Default => next.rows.set_default_size(*value),
        },
    }
    next
}

/// One sheet: the current state plus the dispatch/notification machinery
/// and its undo history.
pub struct Sheet {
    state: SheetState,
    listeners: Vec<Listener>,
    next_listener: u64,
    pub(crate) history: History,
    dirty: bool,
}

impl Sheet {
    pub fn new(data: SheetData) -> Self {
        Self {
            state: SheetState::from_data(data),
            listeners: Vec::new(),
            next_listener: 0,
            history: History::default(),
            dirty: false,
        }
    }

    pub fn state(&self) -> &SheetState {
        &self.state
    }

    /// Replace the undo history bound (default 100 entries). Existing
    /// history is discarded, so call this at setup time.
    pub fn set_history_depth(&mut self, max_depth: usize) {
        self.history = History::with_max_depth(max_depth);
    }

    /// Apply one operation and notify subscribers.
    pub fn dispatch(&mut self, op: Operation) {
        log::trace!("dispatch {op:?}");
        self.state = apply(&self.state, &op);
        let event = match op {
            Operation::UpdateState(patch) => SheetEvent::UpdateState {
                fields: patch.fields(),
            },
            Operation::UpdateCell { x, y, .. } => SheetEvent::UpdateCells { x, y },
            Operation::UpdateColSize { key, value } => SheetEvent::UpdateColSize { key, value },
            Operation::UpdateRowSize { key, value } => SheetEvent::UpdateRowSize { key, value },
        };
        self.emit(&event);
        self.dirty = true;
    }

    /// Patch state fields; an empty patch is a no-op.
    pub fn set_state(&mut self, patch: StatePatch) {
        if patch.is_empty() {
            return;
        }
        self.dispatch(Operation::UpdateState(patch));
    }

    pub fn update_cell(&mut self, x: i64, y: i64, value: Option<CellPatch>) {
        self.dispatch(Operation::UpdateCell { x, y, value });
    }

    pub fn update_col_size(&mut self, key: SizeKey, value: u32) {
        self.dispatch(Operation::UpdateColSize { key, value });
    }

    pub fn update_row_size(&mut self, key: SizeKey, value: u32) {
        self.dispatch(Operation::UpdateRowSize { key, value });
    }

    /// Spread one cell's content across a merged rectangle: the origin keeps
    /// the text, the covered cells keep only the style, and an empty source
    /// clears every entry.
    pub fn update_cells_in_merge_rect(&mut self, rect: Viewport, cell: &Cell) {
        for y in rect.y..=rect.y_end {
            for x in rect.x..=rect.x_end {
                let value = if cell == &EMPTY_CELL {
                    None
                } else {
                    Some(CellPatch {
                        text: Some(if x == rect.x && y == rect.y {
                            cell.text.clone().unwrap_or_default()
                        } else {
                            String::new()
                        }),
                        style: cell.style.clone(),
                    })
                };
                self.update_cell(x, y, value);
            }
        }
    }

    /// Subscribe to one event kind. Events are delivered synchronously
    /// during dispatch.
    pub fn on(
        &mut self,
        kind: SheetEventKind,
        callback: impl FnMut(&SheetEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener {
            id,
            kind,
            callback: Box::new(callback) as ListenerFn,
        });
        id
    }

    pub fn off(&mut self, id: ListenerId) {
        self.listeners.retain(|l| l.id != id);
    }

    /// Drain the coalesced render signal. Returns true at most once per
    /// batch of dispatches, so hosts repaint once per tick no matter how
    /// many operations ran.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn emit(&mut self, event: &SheetEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            if listener.kind == event.kind() {
                (listener.callback)(event);
            }
        }
        self.listeners = listeners;
    }

    /// Replace content fields directly during a snapshot restore, bypassing
    /// the operation set. Emits a single `UpdateState` event naming every
    /// restored field.
    pub(crate) fn restore_content(
        &mut self,
        cols: SparseAxis,
        rows: SparseAxis,
        matrix: BTreeMap<i64, RowBucket>,
        merges: Vec<Viewport>,
        selected_viewport: Viewport,
        selected_group_viewport: Viewport,
    ) {
        self.state.cols = cols;
        self.state.rows = rows;
        self.state.matrix = matrix;
        self.state.merges = merges;
        self.state.selected_viewport = selected_viewport;
        self.state.selected_group_viewport = selected_group_viewport;
        self.emit(&SheetEvent::UpdateState {
            fields: vec![
                StateField::Content,
                StateField::Merges,
                StateField::SelectedViewport,
                StateField::SelectedGroupViewport,
            ],
        });
        self.dirty = true;
    }
}
