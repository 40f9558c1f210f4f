//! Actions and undo history.
//!
//! Input gestures arrive as one closed [`Action`] enum and run as atomic
//! transactions against the sheet. History-significant actions capture a
//! [`Snapshot`] pair around their effect; a snapshot holds only the durable
//! projection of state — restoring one can never resurrect a stale
//! "currently resizing" flag or move the scroll position.

use std::collections::{BTreeMap, VecDeque};

use crate::axis::SparseAxis;
use crate::hit_test::{
    col_size_after_resize, hit_col_resizer, hit_row_resizer, hit_selection_handle,
    pointer_to_cell, row_size_after_resize,
};
use crate::merges::{is_merged_region, merge_viewport, unmerge_at};
use crate::scroll::{viewport_for_scroll, viewport_for_wheel, CanvasSize, ScrollAxis};
use crate::state::{
    CellPatch, InteractionTag, RowBucket, Sheet, SheetState, SizeKey, StatePatch,
};
use crate::viewport::Viewport;

/// Default bound on the undo stack.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// The closed set of input gestures the engine accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Absolute scrollbar position in pixels.
    Scroll { scroll_left: u64, scroll_top: u64 },
    /// Relative wheel delta on one axis, on top of the host's current
    /// pixel offset.
    Wheel {
        offset: u64,
        delta: i64,
        axis: ScrollAxis,
    },
    /// Pointer pressed at canvas coordinates.
    PointerDown { px: i64, py: i64 },
    /// Pointer moved; a drag when the main button is held.
    PointerMove { px: i64, py: i64 },
    /// Pointer released: commits an in-flight resize.
    PointerUp,
    /// Edit one cell; `None` clears it.
    EditCell {
        x: i64,
        y: i64,
        value: Option<CellPatch>,
    },
    /// Merge the current selection group into one region.
    MergeSelection,
    /// Remove the merge covering a cell.
    UnmergeAt { x: i64, y: i64 },
    Undo,
    Redo,
}

impl Action {
    /// Whether this action records an undo snapshot pair when it reports a
    /// user-visible change.
    fn commits_history(&self) -> bool {
        matches!(
            self,
            Action::EditCell { .. }
                | Action::PointerUp
                | Action::MergeSelection
                | Action::UnmergeAt { .. }
        )
    }
}

/// What an applied action produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionOutcome {
    /// A user-visible change happened and, for history-significant
    /// actions, an undo pair was recorded.
    pub committed: bool,
    /// For wheel input: the pixel offset of the new leading edge, for the
    /// host to sync its scrollbar to.
    pub scroll_sync: Option<u64>,
}

/// The undo/redo-relevant projection of sheet state. Excludes the grid
/// viewport and every transient interaction field.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cols: SparseAxis,
    pub rows: SparseAxis,
    pub matrix: BTreeMap<i64, RowBucket>,
    pub merges: Vec<Viewport>,
    pub selected_viewport: Viewport,
    pub selected_group_viewport: Viewport,
}

impl Snapshot {
    pub fn capture(state: &SheetState) -> Self {
        Self {
            cols: state.cols.clone(),
            rows: state.rows.clone(),
            matrix: state.matrix.clone(),
            merges: state.merges.clone(),
            selected_viewport: state.selected_viewport,
            selected_group_viewport: state.selected_group_viewport,
        }
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    undo: Snapshot,
    redo: Snapshot,
}

/// Two-stack undo history with a bounded depth.
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record a committed change. New commits invalidate the redo branch.
    fn push(&mut self, undo: Snapshot, redo: Snapshot) {
        self.undo_stack.push_back(HistoryEntry { undo, redo });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    fn undo(&mut self) -> Option<Snapshot> {
        let entry = self.undo_stack.pop_back()?;
        let snapshot = entry.undo.clone();
        self.redo_stack.push(entry);
        Some(snapshot)
    }

    fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.redo_stack.pop()?;
        let snapshot = entry.redo.clone();
        self.undo_stack.push_back(entry);
        Some(snapshot)
    }
}

impl Sheet {
    /// Run one action as an atomic transaction.
    ///
    /// History-significant actions snapshot the state first; if the action
    /// reports a user-visible change, the before/after pair lands on the
    /// undo stack. Undo and redo on empty stacks are defined no-ops.
    pub fn apply_action(&mut self, action: &Action, canvas: CanvasSize) -> ActionOutcome {
        match action {
            Action::Undo => {
                self.undo();
                ActionOutcome::default()
            }
            Action::Redo => {
                self.redo();
                ActionOutcome::default()
            }
            _ => {
                let before = action
                    .commits_history()
                    .then(|| Snapshot::capture(self.state()));
                let outcome = self.perform(action, canvas);
                if outcome.committed {
                    if let Some(before) = before {
                        log::debug!("commit {action:?}");
                        let after = Snapshot::capture(self.state());
                        self.history.push(before, after);
                    }
                }
                outcome
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous committed snapshot, if any.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.restore(snapshot);
        }
    }

    /// Re-apply the last undone snapshot, if any.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.restore(snapshot);
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.restore_content(
            snapshot.cols,
            snapshot.rows,
            snapshot.matrix,
            snapshot.merges,
            snapshot.selected_viewport,
            snapshot.selected_group_viewport,
        );
    }

    fn perform(&mut self, action: &Action, canvas: CanvasSize) -> ActionOutcome {
        match action {
            Action::Scroll {
                scroll_left,
                scroll_top,
            } => {
                let viewport = viewport_for_scroll(self.state(), canvas, *scroll_left, *scroll_top);
                let changed = viewport != self.state().grid_viewport;
                if changed {
                    self.set_state(StatePatch {
                        grid_viewport: Some(viewport),
                        ..StatePatch::default()
                    });
                }
                ActionOutcome {
                    committed: changed,
                    scroll_sync: None,
                }
            }
            Action::Wheel {
                offset,
                delta,
                axis,
            } => {
                let scrolled = viewport_for_wheel(self.state(), canvas, *offset, *delta, *axis);
                let changed = scrolled.viewport != self.state().grid_viewport;
                if changed {
                    self.set_state(StatePatch {
                        grid_viewport: Some(scrolled.viewport),
                        ..StatePatch::default()
                    });
                }
                ActionOutcome {
                    committed: changed,
                    scroll_sync: Some(scrolled.consumed),
                }
            }
            Action::PointerDown { px, py } => {
                self.pointer_down(canvas, *px, *py);
                ActionOutcome::default()
            }
            Action::PointerMove { px, py } => {
                self.pointer_move(canvas, *px, *py);
                ActionOutcome::default()
            }
            Action::PointerUp => ActionOutcome {
                committed: self.pointer_up(),
                scroll_sync: None,
            },
            Action::EditCell { x, y, value } => {
                self.update_cell(*x, *y, value.clone());
                ActionOutcome {
                    committed: true,
                    scroll_sync: None,
                }
            }
            Action::MergeSelection => ActionOutcome {
                committed: self.merge_selection(),
                scroll_sync: None,
            },
            Action::UnmergeAt { x, y } => {
                let mut merges = self.state().merges.clone();
                let removed = unmerge_at(&mut merges, *x, *y).is_some();
                if removed {
                    self.set_state(StatePatch {
                        merges: Some(merges),
                        ..StatePatch::default()
                    });
                }
                ActionOutcome {
                    committed: removed,
                    scroll_sync: None,
                }
            }
            Action::Undo | Action::Redo => ActionOutcome::default(),
        }
    }

    fn pointer_down(&mut self, canvas: CanvasSize, px: i64, py: i64) {
        let state = self.state();
        let hit = pointer_to_cell(state, px, py);
        let on_handle = hit_selection_handle(state, canvas, px, py);
        let on_col_resize = hit_col_resizer(state, &hit, px);
        let on_row_resize = hit_row_resizer(state, &hit, py);
        let on_col_header = hit.y == -1 && hit.x >= 0;
        let on_row_header = hit.x == -1 && hit.y >= 0;

        let tag = self.state().tag.mark(if on_handle {
            InteractionTag::SERIE_BOX_PRESSED
        } else {
            InteractionTag::MAIN_BUTTON_PRESSED
        });
        self.set_state(StatePatch {
            tag: Some(tag),
            ..StatePatch::default()
        });
        if on_col_resize || on_row_resize || on_handle {
            return;
        }

        let state = self.state();
        let (mut group, mut selected) = if on_col_header {
            (
                Viewport::new(hit.x, 0, hit.x, state.rows.last_index().max(0)),
                Viewport::cell(hit.x, state.grid_viewport.y),
            )
        } else if on_row_header {
            (
                Viewport::new(0, hit.y, state.cols.last_index().max(0), hit.y),
                Viewport::cell(state.grid_viewport.x, hit.y),
            )
        } else {
            let cell = Viewport::cell(hit.x.max(0), hit.y.max(0));
            (cell, cell)
        };
        group = group.snap_to_merges(&state.merges);
        selected = selected.snap_to_merges(&state.merges);
        self.set_state(StatePatch {
            selected_viewport: Some(selected),
            selected_group_viewport: Some(group.union(&selected)),
            ..StatePatch::default()
        });
    }

    fn pointer_move(&mut self, canvas: CanvasSize, px: i64, py: i64) {
        let state = self.state();
        let dragging = state.tag.has(InteractionTag::MAIN_BUTTON_PRESSED);
        if dragging {
            if state.tag.has(InteractionTag::SERIE_BOX_PRESSED) {
                return;
            }
            if let Some(col) = state.resizing_col {
                let size = col_size_after_resize(state, canvas, col, Some(px));
                self.set_state(StatePatch {
                    resized_size: Some(Some(size)),
                    ..StatePatch::default()
                });
                return;
            }
            if let Some(row) = state.resizing_row {
                let size = row_size_after_resize(state, canvas, row, Some(py));
                self.set_state(StatePatch {
                    resized_size: Some(Some(size)),
                    ..StatePatch::default()
                });
                return;
            }
            let hit = pointer_to_cell(state, px, py);
            let hover = Viewport::cell(hit.x.max(0), hit.y.max(0));
            let group = hover
                .union(&state.selected_viewport)
                .snap_to_merges(&state.merges);
            if group != state.selected_group_viewport {
                self.set_state(StatePatch {
                    selected_group_viewport: Some(group),
                    ..StatePatch::default()
                });
            }
            return;
        }

        let hit = pointer_to_cell(state, px, py);
        if hit_col_resizer(state, &hit, px) {
            if state.resizing_col != Some(hit.x) {
                let size = col_size_after_resize(state, canvas, hit.x, None);
                self.set_state(StatePatch {
                    resizing_col: Some(Some(hit.x)),
                    resized_size: Some(Some(size)),
                    ..StatePatch::default()
                });
            }
            return;
        }
        if hit_row_resizer(state, &hit, py) {
            if state.resizing_row != Some(hit.y) {
                let size = row_size_after_resize(state, canvas, hit.y, None);
                self.set_state(StatePatch {
                    resizing_row: Some(Some(hit.y)),
                    resized_size: Some(Some(size)),
                    ..StatePatch::default()
                });
            }
            return;
        }
        if state.resizing_col.is_some() || state.resizing_row.is_some() {
            self.set_state(StatePatch {
                resizing_col: Some(None),
                resizing_row: Some(None),
                resized_size: Some(None),
                ..StatePatch::default()
            });
        }
    }

    /// Release: ends the gesture and commits an in-flight resize. Reports a
    /// change only when a size actually changed.
    fn pointer_up(&mut self) -> bool {
        let tag = self.state().tag.clear(InteractionTag::SERIE_BOX_PRESSED);
        self.set_state(StatePatch {
            tag: Some(tag),
            ..StatePatch::default()
        });

        let state = self.state();
        let (resizing_col, resizing_row, resized) =
            (state.resizing_col, state.resizing_row, state.resized_size);
        let Some(size) = resized else {
            return false;
        };

        let mut changed = false;
        if let Some(col) = resizing_col {
            if self.state().cols.size_of(col) != size {
                self.update_col_size(SizeKey::Index(col), size);
                changed = true;
            }
        }
        if let Some(row) = resizing_row {
            if self.state().rows.size_of(row) != size {
                self.update_row_size(SizeKey::Index(row), size);
                changed = true;
            }
        }
        if resizing_col.is_some() || resizing_row.is_some() {
            self.set_state(StatePatch {
                resizing_col: Some(None),
                resizing_row: Some(None),
                resized_size: Some(None),
                ..StatePatch::default()
            });
        }
        changed
    }

    fn merge_selection(&mut self) -> bool {
        let state = self.state();
        let target = state.selected_group_viewport;
        if target.is_cell() || is_merged_region(&state.merges, &target) {
            return false;
        }
        let mut merges = state.merges.clone();
        let stored = merge_viewport(&mut merges, target);
        let selected = state.selected_viewport.snap_to_merges(&merges);
        self.set_state(StatePatch {
            merges: Some(merges),
            selected_viewport: Some(selected),
            selected_group_viewport: Some(stored.union(&selected)),
            ..StatePatch::default()
        });
        true
    }
}
