// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// A list change whose indices do not fit the table it was applied to.
///
/// The table is left untouched when this is returned. Clamping instead would
/// silently desynchronize the table from the host's item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Insertion start lies past the end of the table.
    #[error("cannot insert {count} item(s) at {start}: table holds {len} entries")]
    InsertOutOfRange {
        /// First inserted index.
        start: usize,
        /// Number of inserted items.
        count: usize,
        /// Table length before the insertion.
        len: usize,
    },
    /// A removed or changed range extends past the end of the table.
    #[error("range of {count} item(s) starting at {start} exceeds table of {len} entries")]
    RangeOutOfBounds {
        /// First index of the range.
        start: usize,
        /// Number of items in the range.
        count: usize,
        /// Table length.
        len: usize,
    },
    /// A move endpoint is not an existing index.
    #[error("cannot move item {from} to {to}: table holds {len} entries")]
    MoveOutOfRange {
        /// Source index.
        from: usize,
        /// Destination index.
        to: usize,
        /// Table length.
        len: usize,
    },
}
