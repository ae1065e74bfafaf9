// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host virtualization collaborator.

use crate::MeasurementSource;

/// The list widget whose scroll position is being mapped.
///
/// The host is the sole source of truth for item count and order. It owns
/// view creation, recycling, and layout; this crate only reads measurements
/// and issues scroll requests through this trait.
///
/// All calls happen on the host's UI thread from within its own mutation
/// notification or draw callbacks.
pub trait ListHost: MeasurementSource {
    /// Current number of items.
    fn item_count(&self) -> usize;

    /// Position of the first visible item's top edge relative to the viewport
    /// top, in pixels. Typically `<= 0` once the list has scrolled.
    fn first_visible_top(&self) -> i32;

    /// Column units consumed by `index` in a grid layout.
    ///
    /// Only consulted in grid mode. Must lie in `1..=columns`.
    fn span_of(&self, index: usize) -> usize {
        let _ = index;
        1
    }

    /// Scrolls so that the top edge of `index` sits `offset` pixels below the
    /// viewport top. Negative offsets push it above the viewport top.
    fn scroll_to_index_with_offset(&mut self, index: usize, offset: i64);

    /// Scrolls by a relative pixel delta; positive values move toward the end.
    fn scroll_by_pixels(&mut self, delta: i64);
}
