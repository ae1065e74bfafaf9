// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A uniform-extent approximation for very long lists.

use core::num::NonZeroUsize;

use crate::TrackSequence;

/// A [`TrackSequence`] where every segment shares one representative extent.
///
/// Items are grouped into segments of `items_per_segment` (one for a linear
/// list, the column count for a grid), so segment `s` starts at item
/// `s * items_per_segment`. No per-item information is consulted, which makes
/// every query O(1) regardless of list length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformTrack {
    items: usize,
    extent: u32,
    items_per_segment: NonZeroUsize,
}

impl UniformTrack {
    /// Creates a linear approximation of `items` items of `extent` each.
    #[must_use]
    pub const fn new(items: usize, extent: u32) -> Self {
        Self {
            items,
            extent,
            items_per_segment: NonZeroUsize::MIN,
        }
    }

    /// Creates a grid approximation with `columns` items per row.
    #[must_use]
    pub const fn with_columns(items: usize, extent: u32, columns: NonZeroUsize) -> Self {
        Self {
            items,
            extent,
            items_per_segment: columns,
        }
    }

    /// Number of segments needed for `items` items.
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.items.div_ceil(self.items_per_segment.get())
    }
}

impl TrackSequence for UniformTrack {
    fn segment_count(&mut self) -> usize {
        self.segments()
    }

    fn total_extent(&mut self) -> u64 {
        u64::from(self.extent) * self.segments() as u64
    }

    fn extent_of(&mut self, _segment: usize) -> u64 {
        u64::from(self.extent)
    }

    fn offset_of(&mut self, segment: usize) -> u64 {
        u64::from(self.extent) * segment as u64
    }

    fn segment_at_offset(&mut self, offset: u64) -> usize {
        let count = self.segments();
        if count == 0 || self.extent == 0 {
            return 0;
        }
        let segment = offset / u64::from(self.extent);
        usize::try_from(segment).map_or(count - 1, |segment| segment.min(count - 1))
    }

    fn segment_of_item(&mut self, item: usize) -> usize {
        item / self.items_per_segment.get()
    }

    fn first_item_of(&mut self, segment: usize) -> usize {
        segment
            .saturating_mul(self.items_per_segment.get())
            .min(self.items.saturating_sub(1))
    }
}
