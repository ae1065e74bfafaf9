// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The segment sequence that track arithmetic runs over.

use crate::ItemExtentTable;

/// A 1D sequence of segments laid end to end along the scroll axis.
///
/// A segment is a single item in a linear list and a whole row in a grid. The
/// flat [`ItemExtentTable`], the grid [`RowCursor`](crate::RowCursor), and the
/// approximate [`UniformTrack`](crate::UniformTrack) all implement this trait,
/// so range, offset, and scroll-target arithmetic is written once.
///
/// Methods that logically consult prefix sums take `&mut self` so implementations
/// are free to maintain internal caches without exposing interior mutability at
/// the call site.
pub trait TrackSequence {
    /// Number of segments.
    fn segment_count(&mut self) -> usize;

    /// Total extent of every segment.
    fn total_extent(&mut self) -> u64;

    /// Extent of `segment`.
    fn extent_of(&mut self, segment: usize) -> u64;

    /// Sum of the extents strictly before `segment`.
    ///
    /// Implementations must guarantee `offset_of(0) == 0` and
    /// `offset_of(i + 1) == offset_of(i) + extent_of(i)`.
    fn offset_of(&mut self, segment: usize) -> u64;

    /// Returns the last segment whose start is at or before `offset`, clamped
    /// into `0..segment_count()`.
    fn segment_at_offset(&mut self, offset: u64) -> usize;

    /// Segment that contains item `item`.
    fn segment_of_item(&mut self, item: usize) -> usize;

    /// First item placed in `segment`.
    fn first_item_of(&mut self, segment: usize) -> usize;
}

/// Where a content offset lands in a [`TrackSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackTarget {
    /// Segment containing the offset.
    pub segment: usize,
    /// First item of that segment, suitable for index-based host scrolling.
    pub item: usize,
    /// Distance from the segment's start to the offset.
    pub residual: u64,
}

/// Resolves a content offset (track offset minus leading padding) to a target.
///
/// Offsets at or past the end of the content resolve to the last segment with
/// a residual equal to its extent. Returns `None` for an empty sequence.
pub fn locate<M: TrackSequence + ?Sized>(model: &mut M, offset: u64) -> Option<TrackTarget> {
    let count = model.segment_count();
    if count == 0 {
        return None;
    }
    let last = count - 1;
    let (segment, residual) = if offset >= model.total_extent() {
        (last, model.extent_of(last))
    } else {
        let segment = model.segment_at_offset(offset).min(last);
        (segment, offset - model.offset_of(segment))
    };
    Some(TrackTarget {
        segment,
        item: model.first_item_of(segment),
        residual,
    })
}

impl TrackSequence for ItemExtentTable {
    fn segment_count(&mut self) -> usize {
        self.len()
    }

    fn total_extent(&mut self) -> u64 {
        self.total()
    }

    fn extent_of(&mut self, segment: usize) -> u64 {
        u64::from(self.get(segment))
    }

    fn offset_of(&mut self, segment: usize) -> u64 {
        Self::offset_of(self, segment)
    }

    fn segment_at_offset(&mut self, offset: u64) -> usize {
        self.index_at_offset(offset)
    }

    fn segment_of_item(&mut self, item: usize) -> usize {
        item
    }

    fn first_item_of(&mut self, segment: usize) -> usize {
        segment
    }
}
