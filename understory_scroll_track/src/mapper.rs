// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A controller that maps between fast-scroll track offsets and viewport anchors.

use crate::model::{self, TrackTarget};
use crate::mutation::{self, ChangeOutcome, ListChange};
use crate::{
    EstimateContext, EstimationStrategy, FirstDetermined, GridChunker, ItemExtentTable, Layout,
    ListHost, MutationError, TrackConfig, TrackSequence, UniformTrack, measure,
};

/// Lifecycle of a [`TrackMapper`]'s table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Attached but not built. The first read or draw builds the table,
    /// measuring every item if [`TrackConfig::force_measure_all`] is set.
    Uninitialized,
    /// A dataset change was reported; the table is rebuilt before the next read.
    RebuildPending,
    /// The table mirrors the host and is edited in place by changes and draws.
    Steady,
}

/// Bidirectional mapping between a fast-scroll track and a virtualized list.
///
/// The track is an abstract 1D coordinate space covering
/// `leading_padding + content + trailing_padding`. This type:
/// - owns an [`ItemExtentTable`] kept in lockstep with the host through
///   [`on_change`](Self::on_change),
/// - converges estimates to real measurements in [`on_draw`](Self::on_draw),
/// - answers [`track_range`](Self::track_range) and
///   [`track_offset`](Self::track_offset) for the scroll handle,
/// - turns a handle position back into an index-plus-offset scroll with
///   [`scroll_to_track_offset`](Self::scroll_to_track_offset).
///
/// In grid mode the same table is read as rows (see [`GridChunker`]). With an
/// [`ApproximateConfig`](crate::ApproximateConfig), lists longer than the cutoff
/// switch to a uniform-extent approximation (see [`UniformTrack`]).
///
/// It does *not* know about any widget system; the host is reached only
/// through [`ListHost`], passed into each call.
#[derive(Debug)]
pub struct TrackMapper<E = FirstDetermined> {
    config: TrackConfig,
    estimator: E,
    table: ItemExtentTable,
    phase: Phase,
}

impl TrackMapper {
    /// Creates a mapper that estimates unmeasured items from the first measured one.
    #[must_use]
    pub fn new(config: TrackConfig) -> Self {
        Self::with_estimator(config, FirstDetermined)
    }
}

impl<E: EstimationStrategy> TrackMapper<E> {
    /// Creates a mapper with a custom [`EstimationStrategy`].
    #[must_use]
    pub fn with_estimator(config: TrackConfig, estimator: E) -> Self {
        Self {
            config,
            estimator,
            table: ItemExtentTable::new(),
            phase: Phase::Uninitialized,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Updates leading and trailing padding.
    pub fn set_padding(&mut self, leading: u32, trailing: u32) {
        self.config.leading_padding = leading;
        self.config.trailing_padding = trailing;
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the extent table.
    #[must_use]
    pub const fn table(&self) -> &ItemExtentTable {
        &self.table
    }

    /// Drops all extents and returns to [`Phase::Uninitialized`], as on a fresh attach.
    pub fn reset(&mut self) {
        self.table.clear();
        self.phase = Phase::Uninitialized;
    }

    /// Mirrors a structural change reported by the host.
    ///
    /// Must be called for every change, in order, from the host's change
    /// notification. Changes reported while a rebuild is pending are ignored,
    /// since the rebuild reads the host's current shape.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] if the change's indices do not fit the table.
    /// The table is left untouched.
    pub fn on_change<H: ListHost + ?Sized>(
        &mut self,
        host: &H,
        change: ListChange,
    ) -> Result<(), MutationError> {
        if self.phase != Phase::Steady {
            tracing::trace!(?change, phase = ?self.phase, "rebuild pending; ignoring list change");
            return Ok(());
        }
        let outcome = mutation::apply(
            &mut self.table,
            change,
            host,
            &self.estimator,
            self.config.default_extent,
        )
        .inspect_err(|err| tracing::warn!(%err, ?change, "rejected list change"))?;
        if outcome == ChangeOutcome::RebuildRequested {
            self.phase = Phase::RebuildPending;
        }
        Ok(())
    }

    /// Per-draw synchronization point.
    ///
    /// Builds the table if needed, re-syncs it when it has fallen out of step
    /// with the host's item count, re-derives every estimate once the first real
    /// measurement is available, and otherwise refreshes visible estimates.
    pub fn on_draw<H: ListHost + ?Sized>(&mut self, host: &mut H) {
        if self.phase != Phase::Steady {
            self.sync(host);
            return;
        }
        let count = host.item_count();
        if self.table.len() != count {
            tracing::warn!(
                table = self.table.len(),
                host = count,
                "extent table out of step with host; rebuilding"
            );
            self.rebuild(host, false);
        } else if count > 0 && !self.table.has_determined() {
            self.rebuild(host, self.config.force_measure_all);
        } else {
            measure::refresh_visible(&mut self.table, &*host);
        }
    }

    /// Replaces estimates for visible items with real measurements.
    ///
    /// Returns how many entries became determined.
    pub fn refresh_visible<H: ListHost + ?Sized>(&mut self, host: &H) -> usize {
        measure::refresh_visible(&mut self.table, host)
    }

    /// Rebuilds the table from the host immediately.
    ///
    /// With `force_measure_all`, every item is measured through
    /// [`MeasurementSource::force_measure`](crate::MeasurementSource::force_measure).
    pub fn rebuild<H: ListHost + ?Sized>(&mut self, host: &mut H, force_measure_all: bool) {
        let count = host.item_count();
        measure::rebuild(
            &mut self.table,
            host,
            &self.estimator,
            count,
            self.config.default_extent,
            force_measure_all,
        );
        self.phase = Phase::Steady;
    }

    /// Returns `true` if the uniform-extent approximation is in effect.
    pub fn is_approximate<H: ListHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.sync(host);
        self.approximate_extent(&*host).is_some()
    }

    /// Total track length: padding plus the extent of every item or row.
    pub fn track_range<H: ListHost + ?Sized>(&mut self, host: &mut H) -> u64 {
        self.sync(host);
        let padding =
            u64::from(self.config.leading_padding) + u64::from(self.config.trailing_padding);
        padding + self.with_sequence(&*host, |seq| seq.total_extent())
    }

    /// Current track offset of the viewport top, or `0` if nothing is visible.
    pub fn track_offset<H: ListHost + ?Sized>(&mut self, host: &mut H) -> u64 {
        self.sync(host);
        let Some(visible) = host.visible_range() else {
            return 0;
        };
        let first = *visible.start();
        if first >= self.table.len() {
            return 0;
        }
        let before = self.with_sequence(&*host, |seq| {
            let segment = seq.segment_of_item(first);
            seq.offset_of(segment)
        });
        let offset = i64::from(self.config.leading_padding)
            .saturating_sub(i64::from(host.first_visible_top()))
            .saturating_add(signed(before));
        u64::try_from(offset).unwrap_or(0)
    }

    /// Resolves a track offset to the item and intra-item offset to scroll to.
    ///
    /// Offsets at `0` resolve to the start of the first item; offsets at or past
    /// [`track_range`](Self::track_range) resolve to the end of the last item or
    /// row. Returns `None` for an empty list.
    pub fn locate<H: ListHost + ?Sized>(&mut self, host: &mut H, offset: u64) -> Option<TrackTarget> {
        self.sync(host);
        if self.table.is_empty() {
            return None;
        }
        if offset == 0 {
            return Some(TrackTarget {
                segment: 0,
                item: 0,
                residual: 0,
            });
        }
        let range = self.track_range(host);
        let content_offset = if offset >= range {
            u64::MAX
        } else {
            offset.saturating_sub(u64::from(self.config.leading_padding))
        };
        self.with_sequence(&*host, |seq| model::locate(seq, content_offset))
    }

    /// Scrolls the host so that its viewport top lands on track offset `offset`.
    ///
    /// In approximate mode, deltas up to
    /// [`ApproximateConfig::pixel_scroll_limit`](crate::ApproximateConfig::pixel_scroll_limit)
    /// become a relative pixel scroll; larger ones jump by index. Does nothing
    /// for an empty list.
    pub fn scroll_to_track_offset<H: ListHost + ?Sized>(&mut self, host: &mut H, offset: u64) {
        self.sync(host);
        if self.table.is_empty() {
            return;
        }
        if let Some(limit) = self.pixel_scroll_limit(&*host) {
            let current = self.track_offset(host);
            let delta = signed(offset).saturating_sub(signed(current));
            if delta.unsigned_abs() <= limit {
                host.scroll_by_pixels(delta);
                return;
            }
            tracing::debug!(delta, limit, "approximate track jump");
        }
        if let Some(target) = self.locate(host, offset) {
            host.scroll_to_index_with_offset(target.item, -signed(target.residual));
        }
    }

    fn sync<H: ListHost + ?Sized>(&mut self, host: &mut H) {
        if self.phase != Phase::Steady {
            self.rebuild(host, self.config.force_measure_all);
        }
    }

    /// Representative extent if the list is long enough for the approximation.
    fn approximate_extent<H: ListHost + ?Sized>(&self, host: &H) -> Option<u32> {
        let approximate = self.config.approximate?;
        let items = self.table.len();
        let segments = match self.config.layout {
            Layout::Linear => items,
            Layout::Grid { columns } => items.div_ceil(columns.get()),
        };
        if segments <= approximate.cutoff {
            return None;
        }
        let cx = EstimateContext::new(&self.table, host.visible_range());
        Some(
            self.estimator
                .estimate(&cx, None)
                .unwrap_or(self.config.default_extent),
        )
    }

    fn pixel_scroll_limit<H: ListHost + ?Sized>(&self, host: &H) -> Option<u64> {
        let approximate = self.config.approximate?;
        self.approximate_extent(host)
            .map(|_| approximate.pixel_scroll_limit)
    }

    /// Runs `f` over the segment sequence for the current layout and precision.
    fn with_sequence<H, R>(&mut self, host: &H, f: impl FnOnce(&mut dyn TrackSequence) -> R) -> R
    where
        H: ListHost + ?Sized,
    {
        if let Some(extent) = self.approximate_extent(host) {
            let items = self.table.len();
            let mut track = match self.config.layout {
                Layout::Linear => UniformTrack::new(items, extent),
                Layout::Grid { columns } => UniformTrack::with_columns(items, extent, columns),
            };
            return f(&mut track);
        }
        match self.config.layout {
            Layout::Linear => f(&mut self.table),
            Layout::Grid { columns } => {
                let mut rows =
                    GridChunker::new(columns).rows(&self.table, |index: usize| host.span_of(index));
                f(&mut rows)
            }
        }
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
