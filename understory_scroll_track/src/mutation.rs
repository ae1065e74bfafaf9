// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mirrors the host's structural change events into an [`ItemExtentTable`].
//!
//! Every event the host emits must be followed by a matching table edit, even
//! when the true extent of an item is unknown; an estimate substitutes. Events
//! are validated against the table before anything is touched.

use crate::measure::{fill_estimates, measure_visible};
use crate::{EstimationStrategy, ItemExtentTable, MeasurementSource, MutationError};

/// A structural change reported by the host list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// Anything may have changed; the table must be rebuilt.
    DatasetChanged,
    /// `count` items were inserted starting at `start`.
    RangeInserted {
        /// First inserted index.
        start: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items were removed starting at `start`.
    RangeRemoved {
        /// First removed index.
        start: usize,
        /// Number of removed items.
        count: usize,
    },
    /// The content of `count` items starting at `start` changed; their size may have too.
    RangeChanged {
        /// First changed index.
        start: usize,
        /// Number of changed items.
        count: usize,
    },
    /// A single item moved from `from` to `to`.
    RangeMoved {
        /// Source index.
        from: usize,
        /// Destination index.
        to: usize,
    },
}

/// What the caller has to do after [`apply`] succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The table was edited in place and matches the host again.
    Edited,
    /// The change cannot be expressed as an edit; rebuild before the next read.
    RebuildRequested,
}

impl ListChange {
    /// Checks this change against a table of `len` entries.
    ///
    /// # Errors
    ///
    /// Returns the [`MutationError`] describing the first index that does not fit.
    pub fn validate(self, len: usize) -> Result<(), MutationError> {
        let in_bounds =
            |start: usize, count: usize| start.checked_add(count).is_some_and(|end| end <= len);
        match self {
            Self::DatasetChanged => Ok(()),
            Self::RangeInserted { start, count }
                if start > len || start.checked_add(count).is_none() =>
            {
                Err(MutationError::InsertOutOfRange { start, count, len })
            }
            Self::RangeInserted { .. } => Ok(()),
            Self::RangeRemoved { start, count } | Self::RangeChanged { start, count } => {
                if in_bounds(start, count) {
                    Ok(())
                } else {
                    Err(MutationError::RangeOutOfBounds { start, count, len })
                }
            }
            Self::RangeMoved { from, to } => {
                if from < len && to < len {
                    Ok(())
                } else {
                    Err(MutationError::MoveOutOfRange { from, to, len })
                }
            }
        }
    }
}

/// Applies `change` to `table`.
///
/// - Inserted items are measured when they are visible and estimated otherwise.
/// - Removed entries are dropped along with any pending measurement state.
/// - Changed entries become undetermined and keep their old extent as an estimate.
/// - A moved entry keeps its extent and determined flag; the entries in between
///   shift one slot toward the move's origin.
/// - [`ListChange::DatasetChanged`] does not touch the table and reports
///   [`ChangeOutcome::RebuildRequested`].
pub fn apply<S, E>(
    table: &mut ItemExtentTable,
    change: ListChange,
    source: &S,
    estimator: &E,
    default_extent: u32,
) -> Result<ChangeOutcome, MutationError>
where
    S: MeasurementSource + ?Sized,
    E: EstimationStrategy + ?Sized,
{
    change.validate(table.len())?;
    tracing::trace!(?change, len = table.len(), "applying list change");

    match change {
        ListChange::DatasetChanged => return Ok(ChangeOutcome::RebuildRequested),
        ListChange::RangeInserted { start, count } => {
            table.insert_run(start, count, 0);
            let visible = source.visible_range();
            for index in start..start + count {
                if let Some(extent) = measure_visible(source, visible.as_ref(), index) {
                    table.set(index, extent);
                }
            }
            fill_estimates(
                table,
                estimator,
                visible.as_ref(),
                default_extent,
                start..start + count,
            );
        }
        ListChange::RangeRemoved { start, count } => table.remove_range(start..start + count),
        ListChange::RangeChanged { start, count } => {
            for index in start..start + count {
                table.invalidate(index);
            }
        }
        ListChange::RangeMoved { from, to } => table.move_item(from, to),
    }
    Ok(ChangeOutcome::Edited)
}
