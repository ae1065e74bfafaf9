// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory list host for unit tests.
//!
//! Items are laid out top to bottom starting with `first` at `top`; an item is
//! visible while its top edge is above the viewport bottom.

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::{ListHost, MeasurementSource};

/// A scroll request issued by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scroll {
    ToIndex(usize, i64),
    By(i64),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TestHost {
    pub(crate) extents: Vec<u32>,
    /// Grid spans; empty means every item spans one column.
    pub(crate) spans: Vec<usize>,
    pub(crate) viewport: u32,
    pub(crate) first: usize,
    pub(crate) top: i32,
    pub(crate) visible: Option<RangeInclusive<usize>>,
    pub(crate) scrolls: Vec<Scroll>,
    pub(crate) force_measured: usize,
}

impl TestHost {
    pub(crate) fn new(extents: &[u32], viewport: u32) -> Self {
        let mut host = Self {
            extents: extents.to_vec(),
            viewport,
            ..Self::default()
        };
        host.relayout();
        host
    }

    fn relayout(&mut self) {
        if self.first >= self.extents.len() {
            self.first = self.extents.len().saturating_sub(1);
        }
        let mut pos = i64::from(self.top);
        let mut last = None;
        for index in self.first..self.extents.len() {
            if pos >= i64::from(self.viewport) {
                break;
            }
            last = Some(index);
            pos += i64::from(self.extents[index]);
        }
        self.visible = last.map(|last| self.first..=last);
    }

    /// Puts `first` at `top` pixels relative to the viewport top.
    pub(crate) fn scroll_to(&mut self, first: usize, top: i32) {
        self.first = first;
        self.top = top;
        self.relayout();
    }

    /// Scrolls so the viewport top sits `pixels` below the start of content.
    pub(crate) fn scroll_to_pixel(&mut self, pixels: u32) {
        let mut start = 0_u32;
        for (index, &extent) in self.extents.iter().enumerate() {
            if pixels < start + extent {
                self.scroll_to(index, -((pixels - start) as i32));
                return;
            }
            start += extent;
        }
        self.scroll_to(self.extents.len().saturating_sub(1), 0);
    }

    /// Overrides the visible window without laying out, as a grid host would.
    pub(crate) fn set_visible(&mut self, visible: RangeInclusive<usize>, top: i32) {
        self.first = *visible.start();
        self.top = top;
        self.visible = Some(visible);
    }

    fn content_offset(&self) -> i64 {
        let before: u64 = self.extents[..self.first].iter().map(|&e| u64::from(e)).sum();
        before as i64 - i64::from(self.top)
    }

    pub(crate) fn insert(&mut self, index: usize, extent: u32) {
        self.extents.insert(index, extent);
        self.relayout();
    }

    pub(crate) fn remove(&mut self, start: usize, count: usize) {
        self.extents.drain(start..start + count);
        self.relayout();
    }

    pub(crate) fn move_item(&mut self, from: usize, to: usize) {
        let extent = self.extents.remove(from);
        self.extents.insert(to, extent);
        self.relayout();
    }

    pub(crate) fn change(&mut self, index: usize, extent: u32) {
        self.extents[index] = extent;
        self.relayout();
    }

    pub(crate) fn replace(&mut self, extents: &[u32]) {
        self.extents = extents.to_vec();
        self.first = 0;
        self.top = 0;
        self.relayout();
    }
}

impl MeasurementSource for TestHost {
    fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.visible.clone()
    }

    fn measured_extent(&self, index: usize) -> Option<u32> {
        self.visible
            .as_ref()
            .filter(|visible| visible.contains(&index))
            .and_then(|_| self.extents.get(index).copied())
    }

    fn force_measure(&mut self, index: usize) -> u32 {
        self.force_measured += 1;
        self.extents[index]
    }
}

impl ListHost for TestHost {
    fn item_count(&self) -> usize {
        self.extents.len()
    }

    fn first_visible_top(&self) -> i32 {
        self.top
    }

    fn span_of(&self, index: usize) -> usize {
        self.spans.get(index).copied().unwrap_or(1)
    }

    fn scroll_to_index_with_offset(&mut self, index: usize, offset: i64) {
        self.scrolls.push(Scroll::ToIndex(index, offset));
        let top = i32::try_from(offset).unwrap_or(i32::MIN);
        self.scroll_to(index, top);
    }

    fn scroll_by_pixels(&mut self, delta: i64) {
        self.scrolls.push(Scroll::By(delta));
        let target = (self.content_offset() + delta).max(0);
        self.scroll_to_pixel(u32::try_from(target).unwrap_or(u32::MAX));
    }
}
