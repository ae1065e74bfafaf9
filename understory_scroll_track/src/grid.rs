// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reinterprets the flat extent sequence as grid rows.
//!
//! In a grid, the scroll axis operates over *rows* while the backing data is a
//! flat sequence of items. Each item consumes a number of column units (its
//! *span*); items are packed greedily left to right, and a row closes as soon
//! as the next item would exceed the column count. A row's extent is the
//! largest extent among its members.
//!
//! Rows are never cached across list changes: a content update can change an
//! item's span. A [`RowCursor`] packs lazily and memoizes row prefix sums for
//! the duration of one query burst only, then gets dropped.

use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::{ItemExtentTable, TrackSequence};

/// Column units consumed by each item of a grid.
pub trait SpanLookup {
    /// Span of `index`, in `1..=columns`.
    fn span_of(&self, index: usize) -> usize;
}

impl<F: Fn(usize) -> usize> SpanLookup for F {
    fn span_of(&self, index: usize) -> usize {
        self(index)
    }
}

/// One packed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// First item in the row.
    pub first: usize,
    /// Number of items in the row.
    pub len: usize,
    /// Largest extent among the row's items.
    pub extent: u32,
}

/// Packs items into rows for a fixed column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridChunker {
    columns: NonZeroUsize,
}

impl GridChunker {
    /// Creates a chunker for `columns` columns.
    #[must_use]
    pub const fn new(columns: NonZeroUsize) -> Self {
        Self { columns }
    }

    /// Starts a query burst over `table`, reading spans fresh from `spans`.
    #[must_use]
    pub fn rows<'a, S: SpanLookup>(
        &self,
        table: &'a ItemExtentTable,
        spans: S,
    ) -> RowCursor<'a, S> {
        RowCursor {
            table,
            spans,
            columns: self.columns.get(),
            rows: Vec::new(),
            used: 0,
            packed: 0,
            prefix: alloc::vec![0],
        }
    }
}

/// Lazily packed rows for one query burst.
///
/// Packing and prefix sums only ever extend; repeated queries with increasing
/// indices reuse the work done so far.
#[derive(Debug)]
pub struct RowCursor<'a, S> {
    table: &'a ItemExtentTable,
    spans: S,
    columns: usize,
    rows: Vec<Row>,
    /// Column units used by the last row.
    used: usize,
    /// Number of items assigned to rows.
    packed: usize,
    /// `prefix[r]` is the total extent of rows `0..r`.
    prefix: Vec<u64>,
}

impl<S: SpanLookup> RowCursor<'_, S> {
    /// Returns the complete rows that hold the first `n` items.
    ///
    /// The final row is packed to completion even when it holds items at or past `n`.
    pub fn rows_up_to(&mut self, n: usize) -> &[Row] {
        let n = n.min(self.table.len());
        self.pack_through(n);
        if n < self.table.len() {
            self.close_last_row();
        }
        let count = if n == 0 {
            0
        } else {
            self.row_index_of(n - 1) + 1
        };
        &self.rows[..count]
    }

    fn span(&self, index: usize) -> usize {
        let span = self.spans.span_of(index);
        assert!(
            (1..=self.columns).contains(&span),
            "span of item {index} is {span}; expected 1..={}",
            self.columns
        );
        span
    }

    fn fits(&self, span: usize) -> bool {
        !self.rows.is_empty() && self.used + span <= self.columns
    }

    fn pack_one(&mut self) {
        let index = self.packed;
        let span = self.span(index);
        let extent = self.table.get(index);
        match self.rows.last_mut() {
            Some(row) if self.used + span <= self.columns => {
                row.len += 1;
                row.extent = row.extent.max(extent);
                self.used += span;
            }
            _ => {
                self.rows.push(Row {
                    first: index,
                    len: 1,
                    extent,
                });
                self.used = span;
            }
        }
        self.packed += 1;
    }

    fn pack_through(&mut self, n: usize) {
        while self.packed < n {
            self.pack_one();
        }
    }

    fn pack_all(&mut self) {
        self.pack_through(self.table.len());
    }

    /// Keeps packing until the next item would open a new row.
    fn close_last_row(&mut self) {
        while self.packed < self.table.len() && self.fits(self.span(self.packed)) {
            self.pack_one();
        }
    }

    /// Packs until row `row` exists and every row before it is closed.
    fn ensure_row(&mut self, row: usize) {
        while self.rows.len() <= row && self.packed < self.table.len() {
            self.pack_one();
        }
    }

    fn row_index_of(&self, item: usize) -> usize {
        self.rows
            .partition_point(|row| row.first <= item)
            .saturating_sub(1)
    }

    /// Total extent of rows `0..row`; those rows must already be closed.
    fn prefix_through(&mut self, row: usize) -> u64 {
        while self.prefix.len() <= row {
            let r = self.prefix.len() - 1;
            let next = self.prefix[r] + u64::from(self.rows[r].extent);
            self.prefix.push(next);
        }
        self.prefix[row]
    }
}

impl<S: SpanLookup> TrackSequence for RowCursor<'_, S> {
    fn segment_count(&mut self) -> usize {
        self.pack_all();
        self.rows.len()
    }

    fn total_extent(&mut self) -> u64 {
        let count = self.segment_count();
        self.prefix_through(count)
    }

    fn extent_of(&mut self, segment: usize) -> u64 {
        self.ensure_row(segment + 1);
        self.rows.get(segment).map_or(0, |row| u64::from(row.extent))
    }

    fn offset_of(&mut self, segment: usize) -> u64 {
        self.ensure_row(segment);
        let segment = segment.min(self.rows.len());
        self.prefix_through(segment)
    }

    fn segment_at_offset(&mut self, offset: u64) -> usize {
        let count = self.segment_count();
        if count == 0 {
            return 0;
        }
        self.prefix_through(count);
        // `prefix[r]` is the start of row `r`; the trailing entry is the end of content.
        self.prefix[..count]
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    fn segment_of_item(&mut self, item: usize) -> usize {
        self.pack_through(item.saturating_add(1).min(self.table.len()));
        self.row_index_of(item)
    }

    fn first_item_of(&mut self, segment: usize) -> usize {
        self.ensure_row(segment);
        let last = self.rows.len().saturating_sub(1);
        self.rows.get(segment.min(last)).map_or(0, |row| row.first)
    }
}
