//! Inclusive rectangular ranges of grid indices.
//!
//! One `Viewport` stands for a merge region, a selection, or the visible
//! window. Bounds are inclusive; a single cell has `x == x_end` and
//! `y == y_end`. Viewports are plain values — stored copies are never
//! mutated in place.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// An axis-aligned inclusive rectangle over grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
    pub x_end: i64,
    pub y_end: i64,
}

impl Viewport {
    /// A viewport from already-ordered bounds.
    pub fn new(x: i64, y: i64, x_end: i64, y_end: i64) -> Self {
        debug_assert!(x <= x_end && y <= y_end, "viewport bounds out of order");
        Self { x, y, x_end, y_end }
    }

    /// The single cell at `(x, y)`.
    pub fn cell(x: i64, y: i64) -> Self {
        Self::new(x, y, x, y)
    }

    /// A viewport spanning two corner cells given in any order.
    pub fn spanning(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            x_end: x1.max(x2),
            y_end: y1.max(y2),
        }
    }

    /// True when this is a single cell.
    pub fn is_cell(&self) -> bool {
        self.x == self.x_end && self.y == self.y_end
    }

    /// Number of columns covered.
    pub fn width(&self) -> i64 {
        self.x_end - self.x + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> i64 {
        self.y_end - self.y + 1
    }

    /// True iff `inner` lies entirely within `self`.
    pub fn contains(&self, inner: &Viewport) -> bool {
        self.x <= inner.x
            && self.x_end >= inner.x_end
            && self.y <= inner.y
            && self.y_end >= inner.y_end
    }

    /// True iff the cell `(x, y)` lies within `self`.
    pub fn contains_cell(&self, x: i64, y: i64) -> bool {
        x >= self.x && x <= self.x_end && y >= self.y && y <= self.y_end
    }

    /// Interval overlap on both axes.
    pub fn intersects(&self, other: &Viewport) -> bool {
        self.x <= other.x_end
            && self.x_end >= other.x
            && self.y <= other.y_end
            && self.y_end >= other.y
    }

    /// Smallest viewport covering both inputs.
    pub fn union(&self, other: &Viewport) -> Viewport {
        Viewport {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            x_end: self.x_end.max(other.x_end),
            y_end: self.y_end.max(other.y_end),
        }
    }

    /// Smallest viewport covering every input.
    pub fn union_all(viewports: &[Viewport]) -> Result<Viewport> {
        let (first, rest) = viewports.split_first().ok_or(GridError::EmptyUnion)?;
        Ok(rest.iter().fold(*first, |acc, v| acc.union(v)))
    }

    /// Grow until every merge the viewport touches is fully covered.
    ///
    /// Runs to a fixed point: absorbing one merge can bring the viewport
    /// into contact with another, so passes repeat until nothing grows.
    /// Idempotent, and independent of the order merges are stored in.
    pub fn snap_to_merges(mut self, merges: &[Viewport]) -> Viewport {
        loop {
            let mut grew = false;
            for merge in merges {
                if merge.intersects(&self) && !self.contains(merge) {
                    self = self.union(merge);
                    grew = true;
                }
            }
            if !grew {
                return self;
            }
        }
    }

}
