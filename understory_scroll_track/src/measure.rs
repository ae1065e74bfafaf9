// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Real measurements: full rebuilds and the per-draw refresh of visible items.
//!
//! A virtualized list only has views for the items in its visible window, so
//! the table is filled from three sources:
//!
//! - [`MeasurementSource::measured_extent`] for laid-out, visible items (cheap),
//! - [`MeasurementSource::force_measure`] for any item (expensive; one throwaway
//!   layout pass per call),
//! - an [`EstimationStrategy`] for everything else.
//!
//! [`refresh_visible`] runs once per draw pass and replaces estimates with real
//! measurements as items scroll into view, so precision converges through
//! ordinary scrolling.

use core::ops::RangeInclusive;

use crate::{EstimateContext, EstimationStrategy, ItemExtentTable};

/// Host capability for measuring items.
pub trait MeasurementSource {
    /// Inclusive range of item indices currently laid out in the viewport, if any.
    fn visible_range(&self) -> Option<RangeInclusive<usize>>;

    /// Measured extent of a laid-out item.
    ///
    /// Only meaningful within [`visible_range`](Self::visible_range). Returns
    /// `None` when the item has no laid-out view.
    fn measured_extent(&self, index: usize) -> Option<u32>;

    /// Measures any item by laying out a throwaway view and discarding it.
    ///
    /// This performs a real layout pass per call.
    fn force_measure(&mut self, index: usize) -> u32;
}

/// Zero means the view was not fully laid out yet; keep the estimate.
fn usable(extent: u32) -> Option<u32> {
    (extent > 0).then_some(extent)
}

/// Measures `index` if it is visible and reports a usable extent.
pub(crate) fn measure_visible<S: MeasurementSource + ?Sized>(
    source: &S,
    visible: Option<&RangeInclusive<usize>>,
    index: usize,
) -> Option<u32> {
    visible
        .filter(|range| range.contains(&index))
        .and_then(|_| source.measured_extent(index))
        .and_then(usable)
}

/// Replaces every undetermined entry with a guess from `estimator`.
pub(crate) fn fill_estimates<E: EstimationStrategy + ?Sized>(
    table: &mut ItemExtentTable,
    estimator: &E,
    visible: Option<&RangeInclusive<usize>>,
    default_extent: u32,
    indices: impl Iterator<Item = usize>,
) {
    for index in indices {
        if table.is_determined(index) {
            continue;
        }
        let guess = {
            let cx = EstimateContext::new(table, visible.cloned());
            estimator.estimate(&cx, Some(index))
        };
        table.set_estimated(index, guess.unwrap_or(default_extent));
    }
}

/// Discards `table` and rebuilds it for `item_count` items.
///
/// With `force_measure_all`, every item is measured through
/// [`MeasurementSource::force_measure`]; this costs one layout pass per item and
/// belongs at attach time for modest lists. Otherwise only visible items are
/// measured and the rest are estimated and left undetermined.
pub fn rebuild<S, E>(
    table: &mut ItemExtentTable,
    source: &mut S,
    estimator: &E,
    item_count: usize,
    default_extent: u32,
    force_measure_all: bool,
) where
    S: MeasurementSource + ?Sized,
    E: EstimationStrategy + ?Sized,
{
    table.clear();
    let visible = source.visible_range();
    for index in 0..item_count {
        let measured = if force_measure_all {
            usable(source.force_measure(index))
        } else {
            measure_visible(source, visible.as_ref(), index)
        };
        match measured {
            Some(extent) => table.push_measured(extent),
            None => table.push_estimated(0),
        }
    }
    fill_estimates(table, estimator, visible.as_ref(), default_extent, 0..item_count);

    tracing::debug!(
        item_count,
        forced = force_measure_all,
        undetermined = table.undetermined_count(),
        "rebuilt item extent table"
    );
}

/// Replaces estimates for visible items with real measurements.
///
/// Returns how many entries became determined. Calling this twice without an
/// intervening scroll changes nothing the second time.
pub fn refresh_visible<S: MeasurementSource + ?Sized>(
    table: &mut ItemExtentTable,
    source: &S,
) -> usize {
    if table.undetermined_count() == 0 {
        return 0;
    }
    let Some(visible) = source.visible_range() else {
        return 0;
    };
    let mut replaced = 0;
    for index in visible {
        if index >= table.len() {
            break;
        }
        if table.is_determined(index) {
            continue;
        }
        if let Some(extent) = source.measured_extent(index).and_then(usable) {
            table.set(index, extent);
            replaced += 1;
        }
    }
    if replaced > 0 {
        tracing::trace!(
            replaced,
            remaining = table.undetermined_count(),
            "refreshed visible extents"
        );
    }
    replaced
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{rebuild, refresh_visible};
    use crate::test_host::TestHost;
    use crate::{FirstDetermined, ItemExtentTable};

    fn snapshot(table: &ItemExtentTable) -> Vec<(u32, bool)> {
        table.iter().collect()
    }

    #[test]
    fn forced_rebuild_measures_everything() {
        let mut host = TestHost::new(&[10, 20, 30, 40], 25);
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 4, 0, true);

        assert_eq!(snapshot(&table), [(10, true), (20, true), (30, true), (40, true)]);
        assert_eq!(host.force_measured, 4);
    }

    #[test]
    fn lazy_rebuild_estimates_invisible_items() {
        let mut host = TestHost::new(&[10, 20, 30, 40], 25);
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 4, 0, false);

        // Items 0 and 1 are visible in a 25px viewport.
        assert_eq!(snapshot(&table), [(10, true), (20, true), (10, false), (10, false)]);
        assert_eq!(host.force_measured, 0);
    }

    #[test]
    fn lazy_rebuild_without_layout_uses_default() {
        let mut host = TestHost::new(&[10, 20], 25);
        host.visible = None;
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 2, 16, false);
        assert_eq!(snapshot(&table), [(16, false), (16, false)]);
    }

    #[test]
    fn zero_sized_measurements_stay_undetermined() {
        let mut host = TestHost::new(&[0, 20, 30], 100);
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 3, 0, true);
        assert_eq!(snapshot(&table), [(20, false), (20, true), (30, true)]);
    }

    #[test]
    fn refresh_converges_while_scrolling() {
        let mut host = TestHost::new(&[10, 20, 30, 40], 25);
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 4, 0, false);
        assert_eq!(table.undetermined_count(), 2);

        host.scroll_to(2, 0);
        assert_eq!(refresh_visible(&mut table, &host), 1);
        assert_eq!(table.get(2), 30);
        assert_eq!(table.undetermined_count(), 1);

        host.scroll_to(3, 0);
        assert_eq!(refresh_visible(&mut table, &host), 1);
        assert_eq!(table.undetermined_count(), 0);
        assert_eq!(table.total(), 100);
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut host = TestHost::new(&[10, 20, 30, 40], 25);
        let mut table = ItemExtentTable::new();
        rebuild(&mut table, &mut host, &FirstDetermined, 4, 0, false);
        host.scroll_to(2, -5);

        refresh_visible(&mut table, &host);
        let first = snapshot(&table);
        assert_eq!(refresh_visible(&mut table, &host), 0);
        assert_eq!(snapshot(&table), first);
    }
}
