// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item extents with determined flags and a lazily-maintained prefix-sum cache.

use alloc::vec::Vec;
use core::iter;
use core::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    extent: u32,
    determined: bool,
}

/// Ordered per-item extents for a virtualized list, kept in lockstep with the host's items.
///
/// Every entry is either *determined* (a real measurement) or *undetermined* (an
/// estimate waiting for the item to scroll into view). The flag travels with its
/// entry through [`insert`](Self::insert), [`remove_at`](Self::remove_at), and
/// [`move_item`](Self::move_item), so index bookkeeping for pending measurements
/// never has to be shifted by hand.
///
/// Range sums are served from a prefix-sum cache that is invalidated from the
/// lowest edited index and recomputed on demand. Methods that consult the cache
/// take `&mut self`.
///
/// Out-of-range indices are programming errors and panic, matching `Vec`.
#[derive(Clone, Default, Debug)]
pub struct ItemExtentTable {
    entries: Vec<Entry>,
    prefix_starts: Vec<u64>,
    dirty_from: Option<usize>,
    undetermined: usize,
}

impl ItemExtentTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries still holding an estimate.
    #[must_use]
    pub const fn undetermined_count(&self) -> usize {
        self.undetermined
    }

    /// Returns `true` if at least one entry holds a real measurement.
    #[must_use]
    pub fn has_determined(&self) -> bool {
        self.undetermined < self.entries.len()
    }

    /// Extent of `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> u32 {
        self.entry(index).extent
    }

    /// Returns `true` if the extent of `index` is a real measurement.
    #[must_use]
    pub fn is_determined(&self, index: usize) -> bool {
        self.entry(index).determined
    }

    /// Returns the first determined extent, scanning from the start.
    #[must_use]
    pub fn first_determined(&self) -> Option<u32> {
        if !self.has_determined() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.determined)
            .map(|entry| entry.extent)
    }

    /// Iterates over `(extent, determined)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.entries.iter().map(|entry| (entry.extent, entry.determined))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.prefix_starts.clear();
        self.dirty_from = None;
        self.undetermined = 0;
    }

    /// Appends a measured (determined) extent.
    pub fn push_measured(&mut self, extent: u32) {
        self.push(Entry {
            extent,
            determined: true,
        });
    }

    /// Appends an estimated (undetermined) extent.
    pub fn push_estimated(&mut self, extent: u32) {
        self.push(Entry {
            extent,
            determined: false,
        });
    }

    /// Stores a real measurement for `index` and marks it determined.
    pub fn set(&mut self, index: usize, extent: u32) {
        self.replace(
            index,
            Entry {
                extent,
                determined: true,
            },
        );
    }

    /// Stores an estimate for `index` and marks it undetermined.
    pub fn set_estimated(&mut self, index: usize, extent: u32) {
        self.replace(
            index,
            Entry {
                extent,
                determined: false,
            },
        );
    }

    /// Marks `index` undetermined, keeping its current extent as a carry-over estimate.
    pub fn invalidate(&mut self, index: usize) {
        let extent = self.get(index);
        self.set_estimated(index, extent);
    }

    /// Inserts an undetermined entry at `index`, shifting later entries up.
    pub fn insert(&mut self, index: usize, extent: u32) {
        self.insert_run(index, 1, extent);
    }

    /// Inserts `count` undetermined entries of `extent` starting at `index`.
    pub fn insert_run(&mut self, index: usize, count: usize, extent: u32) {
        assert!(
            index <= self.entries.len(),
            "insert index {index} out of bounds for table of {}",
            self.entries.len()
        );
        let entry = Entry {
            extent,
            determined: false,
        };
        self.entries
            .splice(index..index, iter::repeat_n(entry, count));
        self.undetermined += count;
        self.structure_changed(index);
    }

    /// Removes the entry at `index` and returns its extent.
    pub fn remove_at(&mut self, index: usize) -> u32 {
        self.check_index(index);
        let entry = self.entries.remove(index);
        if !entry.determined {
            self.undetermined -= 1;
        }
        self.structure_changed(index);
        entry.extent
    }

    /// Removes the entries in `range`.
    pub fn remove_range(&mut self, range: Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.entries.len(),
            "remove range {range:?} out of bounds for table of {}",
            self.entries.len()
        );
        let start = range.start;
        let removed = self
            .entries
            .drain(range)
            .filter(|entry| !entry.determined)
            .count();
        self.undetermined -= removed;
        self.structure_changed(start);
    }

    /// Moves one entry from `from` to `to`, as a removal followed by an insertion.
    ///
    /// Entries strictly between the two positions shift by one slot toward `from`.
    pub fn move_item(&mut self, from: usize, to: usize) {
        self.check_index(from);
        self.check_index(to);
        if from == to {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.mark_dirty(from.min(to));
    }

    /// Sum of the extents in `from..to`.
    pub fn query(&mut self, from: usize, to: usize) -> u64 {
        assert!(
            from <= to && to <= self.entries.len(),
            "query range {from}..{to} out of bounds for table of {}",
            self.entries.len()
        );
        self.offset_of(to) - self.offset_of(from)
    }

    /// Sum of every extent.
    pub fn total(&mut self) -> u64 {
        self.offset_of(self.entries.len())
    }

    /// Sum of the extents strictly before `index`; `index` may equal `len()`.
    pub fn offset_of(&mut self, index: usize) -> u64 {
        let len = self.entries.len();
        assert!(
            index <= len,
            "offset index {index} out of bounds for table of {len}"
        );
        if index == 0 {
            return 0;
        }
        let last = index - 1;
        self.ensure_prefix_through(last);
        self.prefix_starts[last] + u64::from(self.entries[last].extent)
    }

    /// Returns the last index whose start is at or before `offset`.
    ///
    /// Equivalently, the first index whose end lies past `offset`, provided
    /// `offset` is below [`total`](Self::total). Returns `0` for an empty table.
    pub fn index_at_offset(&mut self, offset: u64) -> usize {
        let len = self.entries.len();
        if len == 0 {
            return 0;
        }
        self.ensure_prefix_through(len - 1);
        self.prefix_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    fn entry(&self, index: usize) -> Entry {
        self.check_index(index);
        self.entries[index]
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.entries.len(),
            "index {index} out of bounds for table of {}",
            self.entries.len()
        );
    }

    fn push(&mut self, entry: Entry) {
        let index = self.entries.len();
        if !entry.determined {
            self.undetermined += 1;
        }
        self.entries.push(entry);
        self.structure_changed(index);
    }

    fn replace(&mut self, index: usize, entry: Entry) {
        let old = self.entry(index);
        match (old.determined, entry.determined) {
            (true, false) => self.undetermined += 1,
            (false, true) => self.undetermined -= 1,
            _ => {}
        }
        self.entries[index] = entry;
        if old.extent != entry.extent {
            self.mark_dirty(index);
        }
    }

    fn structure_changed(&mut self, index: usize) {
        self.prefix_starts.resize(self.entries.len(), 0);
        self.mark_dirty(index);
    }

    fn mark_dirty(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        self.dirty_from = Some(self.dirty_from.map_or(index, |dirty| dirty.min(index)));
    }

    fn ensure_prefix_through(&mut self, through: usize) {
        let len = self.entries.len();
        let dirty_from = match self.dirty_from {
            Some(d) if d <= through => d,
            _ => return,
        };

        let mut pos = if dirty_from == 0 {
            0
        } else {
            self.prefix_starts[dirty_from - 1] + u64::from(self.entries[dirty_from - 1].extent)
        };

        for i in dirty_from..=through {
            self.prefix_starts[i] = pos;
            pos += u64::from(self.entries[i].extent);
        }

        self.dirty_from = if through + 1 >= len {
            None
        } else {
            Some(through + 1)
        };
    }
}
