//! Sparse per-index sizes for one grid axis (rows or columns).
//!
//! An axis stores a default size plus overrides for the few indices that were
//! resized, so a sheet with a billion rows costs as much as its overrides.
//! Index `-1` addresses the fixed header band and is sized independently.
//! All pixel math is integer (`u32` sizes, `u64` cumulative distances); there
//! is no accumulation drift over repeated calls.

use std::collections::BTreeMap;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default column width in pixels.
pub const DEFAULT_COL_WIDTH: u32 = 80;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: u32 = 20;

/// Sparse mapping from grid index to pixel size for one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseAxis {
    default_size: u32,
    header_size: u32,
    length: i64,
    sizes: BTreeMap<i64, u32>,
}

impl SparseAxis {
    /// Create an axis of `length` indices, all at `default_size`, with the
    /// header band at `header_size`.
    pub fn new(default_size: u32, header_size: u32, length: i64) -> Self {
        debug_assert!(default_size > 0, "axis default size must be positive");
        debug_assert!(length >= 0, "axis length must be non-negative");
        Self {
            default_size: default_size.max(1),
            header_size,
            length: length.max(0),
            sizes: BTreeMap::new(),
        }
    }

    /// Number of indices on the axis (the header band is not counted).
    pub fn len(&self) -> i64 {
        self.length
    }

    /// True when the axis has no indices at all.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Last addressable index, or `-1` for an empty axis.
    pub fn last_index(&self) -> i64 {
        self.length - 1
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    /// Overridden indices in ascending order.
    pub fn overrides(&self) -> impl Iterator<Item = (i64, u32)> + '_ {
        self.sizes.iter().map(|(&i, &s)| (i, s))
    }

    /// Size of `index` in pixels. Overrides win, `-1` is always the header
    /// size, anything else falls back to the default.
    pub fn size_of(&self, index: i64) -> u32 {
        if index == -1 {
            return self.header_size;
        }
        self.sizes.get(&index).copied().unwrap_or(self.default_size)
    }

    /// Set one override, or the header size for index `-1`.
    pub fn set_size(&mut self, index: i64, size: u32) {
        if index == -1 {
            self.header_size = size;
            return;
        }
        debug_assert!(
            (0..self.length).contains(&index),
            "axis override out of range"
        );
        self.sizes.insert(index, size);
    }

    /// Replace the shared default size. Existing overrides keep their values.
    pub fn set_default_size(&mut self, size: u32) {
        debug_assert!(size > 0, "axis default size must be positive");
        self.default_size = size.max(1);
    }

    /// Total pixel span of `[start, end)`. Callers pass `start <= end`;
    /// order is not normalized here.
    ///
    /// Cost is bounded by the overrides inside the range, not the range
    /// length: the uniform span is one multiplication and the map range scan
    /// touches only overridden keys.
    pub fn pixel_distance(&self, start: i64, end: i64) -> u64 {
        debug_assert!(start <= end, "pixel_distance expects start <= end");
        debug_assert!(start >= 0, "pixel_distance operates on grid indices");
        let mut total = span(start, end) * u64::from(self.default_size);
        for (_, &size) in self.sizes.range(start..end) {
            total = total - u64::from(self.default_size) + u64::from(size);
        }
        total
    }

    /// Largest index whose cumulative span from `start` stays within
    /// `budget`, plus the pixels consumed to reach its leading edge.
    ///
    /// Walks the sorted overrides at or after `start`, then jumps the
    /// remaining budget in whole default-size steps, so uniform stretches
    /// cost O(1) regardless of how far the budget reaches. A budget smaller
    /// than the next cell returns `start` with nothing consumed; the result
    /// never passes the last index.
    pub fn advance_by_pixels(&self, start: i64, budget: u64) -> (i64, u64) {
        let default = u64::from(self.default_size);
        let mut index = start;
        let mut consumed: u64 = 0;
        let mut rest = budget;

        for (&key, &size) in self.sizes.range(start..) {
            let gap = span(index, key) * default;
            if rest < gap {
                break;
            }
            rest -= gap;
            consumed += gap;
            let size = u64::from(size);
            if rest <= size {
                return (key, consumed);
            }
            rest -= size;
            consumed += size;
            index = key + 1;
        }

        let steps = rest
            .div_ceil(default)
            .saturating_sub(1)
            .min(span(index, self.last_index()));
        consumed += steps * default;
        let end = offset_by(index, steps);
        if end > self.last_index() {
            // The walk ran through the final cell (an override at the last
            // index); settle on it instead of one past the end.
            let end = self.last_index().max(start);
            let consumed = if end > start {
                self.pixel_distance(start, end)
            } else {
                0
            };
            return (end, consumed);
        }
        (end, consumed)
    }
}

/// Non-negative index span as a pixel-count-safe width.
fn span(start: i64, end: i64) -> u64 {
    u64::try_from(end.saturating_sub(start)).unwrap_or(0)
}

fn offset_by(index: i64, steps: u64) -> i64 {
    index.saturating_add(i64::try_from(steps).unwrap_or(i64::MAX))
}

// The persisted axis shape keeps the header slot at key "-1" and overrides
// inline next to `defaultSize` and `length`:
// `{"defaultSize":80,"length":150,"-1":60,"5":120}`.
impl Serialize for SparseAxis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.sizes.len()))?;
        map.serialize_entry("defaultSize", &self.default_size)?;
        map.serialize_entry("length", &self.length)?;
        map.serialize_entry("-1", &self.header_size)?;
        for (index, size) in &self.sizes {
            map.serialize_entry(&index.to_string(), size)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SparseAxis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AxisVisitor;

        impl<'de> Visitor<'de> for AxisVisitor {
            type Value = SparseAxis;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an axis map with defaultSize, length and overrides")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SparseAxis, A::Error> {
                let mut default_size: Option<u32> = None;
                let mut length: Option<i64> = None;
                let mut header_size: Option<u32> = None;
                let mut sizes = BTreeMap::new();

                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "defaultSize" => default_size = Some(access.next_value()?),
                        "length" => length = Some(access.next_value()?),
                        "-1" => header_size = Some(access.next_value()?),
                        other => {
                            let index: i64 = other
                                .parse()
                                .map_err(|_| de::Error::custom("non-numeric axis key"))?;
                            sizes.insert(index, access.next_value()?);
                        }
                    }
                }

                let default_size =
                    default_size.ok_or_else(|| de::Error::missing_field("defaultSize"))?;
                let length = length.ok_or_else(|| de::Error::missing_field("length"))?;
                Ok(SparseAxis {
                    default_size: default_size.max(1),
                    header_size: header_size.unwrap_or(default_size),
                    length: length.max(0),
                    sizes,
                })
            }
        }

        deserializer.deserialize_map(AxisVisitor)
    }
}
