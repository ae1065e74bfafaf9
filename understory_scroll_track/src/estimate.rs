// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pluggable guesses for the extents of items that have not been measured.

use core::fmt;
use core::ops::RangeInclusive;

use crate::ItemExtentTable;

/// Read-only view handed to an [`EstimationStrategy`].
#[derive(Debug, Clone)]
pub struct EstimateContext<'a> {
    /// The table being estimated into. Undetermined entries hold guesses.
    pub table: &'a ItemExtentTable,
    /// The host's visible window, if anything is laid out.
    pub visible: Option<RangeInclusive<usize>>,
}

impl<'a> EstimateContext<'a> {
    /// Creates a context over `table` with the host's `visible` window.
    #[must_use]
    pub fn new(table: &'a ItemExtentTable, visible: Option<RangeInclusive<usize>>) -> Self {
        Self { table, visible }
    }

    /// Visible indices that also exist in the table.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let len = self.table.len();
        self.visible
            .clone()
            .into_iter()
            .flatten()
            .take_while(move |&index| index < len)
    }

    /// First determined extent in table order.
    #[must_use]
    pub fn first_determined(&self) -> Option<u32> {
        self.table.first_determined()
    }
}

/// Guesses extents for undetermined, currently invisible items.
///
/// A guess may be wrong; it is replaced by a real measurement once the item
/// becomes visible. Returning `None` means "no idea", and the caller falls back
/// to the configured default extent.
pub trait EstimationStrategy {
    /// Estimate the extent of `index`, or a representative extent when `index` is `None`.
    fn estimate(&self, cx: &EstimateContext<'_>, index: Option<usize>) -> Option<u32>;
}

/// The default strategy: every item looks like the first measured one in table order.
///
/// This is a good proxy when content is visually homogeneous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstDetermined;

impl EstimationStrategy for FirstDetermined {
    fn estimate(&self, cx: &EstimateContext<'_>, _index: Option<usize>) -> Option<u32> {
        cx.first_determined()
    }
}

/// Estimates an item from a visible, measured item of the same kind.
///
/// `classify` maps an index to a kind, for example "section header" versus
/// "row". When no visible item of the same kind has been measured, or when a
/// representative extent is requested, this falls back to [`FirstDetermined`].
pub struct ClassifiedEstimate<F> {
    classify: F,
}

impl<F> ClassifiedEstimate<F> {
    /// Creates a strategy around an index classification function.
    pub const fn new(classify: F) -> Self {
        Self { classify }
    }
}

impl<F> fmt::Debug for ClassifiedEstimate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifiedEstimate").finish_non_exhaustive()
    }
}

impl<F, K> EstimationStrategy for ClassifiedEstimate<F>
where
    F: Fn(usize) -> K,
    K: PartialEq,
{
    fn estimate(&self, cx: &EstimateContext<'_>, index: Option<usize>) -> Option<u32> {
        if let Some(index) = index {
            let kind = (self.classify)(index);
            let same_kind = cx
                .visible_indices()
                .filter(|&i| cx.table.is_determined(i))
                .find(|&i| (self.classify)(i) == kind);
            if let Some(i) = same_kind {
                return Some(cx.table.get(i));
            }
        }
        cx.first_determined()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassifiedEstimate, EstimateContext, EstimationStrategy, FirstDetermined};
    use crate::ItemExtentTable;

    fn sample() -> ItemExtentTable {
        // Headers at multiples of four are 20 tall, rows are 60 tall.
        let mut table = ItemExtentTable::new();
        table.push_estimated(0);
        table.push_measured(60);
        table.push_estimated(0);
        table.push_estimated(0);
        table.push_measured(20);
        table.push_measured(60);
        table
    }

    #[test]
    fn first_determined_scans_from_the_start() {
        let table = sample();
        // An earlier measurement wins over the visible one.
        let cx = EstimateContext::new(&table, Some(4..=4));
        assert_eq!(FirstDetermined.estimate(&cx, Some(2)), Some(60));

        let cx = EstimateContext::new(&table, None);
        assert_eq!(FirstDetermined.estimate(&cx, Some(0)), Some(60));
    }

    #[test]
    fn empty_table_has_no_guess() {
        let table = ItemExtentTable::new();
        let cx = EstimateContext::new(&table, Some(0..=3));
        assert_eq!(FirstDetermined.estimate(&cx, None), None);
    }

    #[test]
    fn classified_estimate_matches_kind() {
        let table = sample();
        let strategy = ClassifiedEstimate::new(|i: usize| i % 4 == 0);
        let cx = EstimateContext::new(&table, Some(1..=5));

        assert_eq!(strategy.estimate(&cx, Some(8)), Some(20));
        assert_eq!(strategy.estimate(&cx, Some(9)), Some(60));
        // Representative guesses ignore kinds.
        assert_eq!(strategy.estimate(&cx, None), Some(60));
    }

    #[test]
    fn classified_estimate_falls_back_without_visible_match() {
        let table = sample();
        let strategy = ClassifiedEstimate::new(|i: usize| i % 4 == 0);
        let cx = EstimateContext::new(&table, Some(1..=2));
        assert_eq!(strategy.estimate(&cx, Some(8)), Some(60));
    }

    #[test]
    fn visible_window_is_clamped_to_table() {
        let table = sample();
        let cx = EstimateContext::new(&table, Some(4..=40));
        assert_eq!(cx.visible_indices().count(), 2);
    }
}
