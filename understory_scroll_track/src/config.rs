// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for a [`TrackMapper`](crate::TrackMapper).

use core::num::NonZeroUsize;

/// How items are arranged along the scroll axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One item per segment.
    #[default]
    Linear,
    /// Items packed into rows of `columns` column units.
    Grid {
        /// Column units per row.
        columns: NonZeroUsize,
    },
}

/// Settings for the uniform-extent fallback used on very long lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproximateConfig {
    /// Segment count (items, or rows in a grid) above which the fallback engages.
    pub cutoff: usize,
    /// Largest track delta, in pixels, handled by a relative pixel scroll
    /// rather than an index jump.
    pub pixel_scroll_limit: u64,
}

impl ApproximateConfig {
    /// Default segment count above which the fallback engages.
    pub const DEFAULT_CUTOFF: usize = 300;
    /// Default pixel scroll limit.
    pub const DEFAULT_PIXEL_SCROLL_LIMIT: u64 = 2048;

    /// Sets the segment count above which the fallback engages.
    #[must_use]
    pub const fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Sets the largest delta handled by pixel scrolling.
    #[must_use]
    pub const fn with_pixel_scroll_limit(mut self, limit: u64) -> Self {
        self.pixel_scroll_limit = limit;
        self
    }
}

impl Default for ApproximateConfig {
    fn default() -> Self {
        Self {
            cutoff: Self::DEFAULT_CUTOFF,
            pixel_scroll_limit: Self::DEFAULT_PIXEL_SCROLL_LIMIT,
        }
    }
}

/// Configuration for a [`TrackMapper`](crate::TrackMapper).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackConfig {
    /// Padding before the first item, in pixels.
    pub leading_padding: u32,
    /// Padding after the last item, in pixels.
    pub trailing_padding: u32,
    /// Measure every item with a throwaway view on (re)build instead of
    /// estimating invisible ones. Costs one layout pass per item.
    pub force_measure_all: bool,
    /// Extent used for estimates before anything has been measured.
    pub default_extent: u32,
    /// Item arrangement.
    pub layout: Layout,
    /// Opt-in uniform-extent fallback for very long lists.
    pub approximate: Option<ApproximateConfig>,
}

impl TrackConfig {
    /// Sets leading and trailing padding.
    #[must_use]
    pub const fn with_padding(mut self, leading: u32, trailing: u32) -> Self {
        self.leading_padding = leading;
        self.trailing_padding = trailing;
        self
    }

    /// Enables or disables forced measurement on (re)build.
    #[must_use]
    pub const fn with_force_measure_all(mut self, force: bool) -> Self {
        self.force_measure_all = force;
        self
    }

    /// Sets the extent used before any measurement exists.
    #[must_use]
    pub const fn with_default_extent(mut self, extent: u32) -> Self {
        self.default_extent = extent;
        self
    }

    /// Switches to a grid of `columns` column units per row.
    #[must_use]
    pub const fn with_grid(mut self, columns: NonZeroUsize) -> Self {
        self.layout = Layout::Grid { columns };
        self
    }

    /// Opts into the uniform-extent fallback.
    #[must_use]
    pub const fn with_approximate(mut self, approximate: ApproximateConfig) -> Self {
        self.approximate = Some(approximate);
        self
    }
}
