// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_track --heading-base-level=0

//! Understory Scroll Track: fast-scroll mapping over virtualized lists.
//!
//! A virtualized list only lays out the items in its viewport, so it has no
//! idea how long its content is. Item extents are heterogeneous (headers,
//! multi-line text, images) and discovered lazily as items scroll into view.
//! This crate keeps a per-item extent table in lockstep with the host list and
//! answers the two questions a fast-scroll handle asks:
//!
//! - how long is the track and where on it is the viewport top
//!   ([`TrackMapper::track_range`], [`TrackMapper::track_offset`]), and
//! - which item and intra-item offset correspond to a dragged handle
//!   position ([`TrackMapper::scroll_to_track_offset`]).
//!
//! The core concepts are:
//!
//! - [`ItemExtentTable`]: per-item extents plus a lazily maintained prefix-sum
//!   cache, with a determined/estimated flag per entry.
//! - [`MeasurementSource`] and [`ListHost`]: the host capabilities the mapper
//!   reads measurements from and issues scroll requests to.
//! - [`EstimationStrategy`]: pluggable guesses for unmeasured items
//!   ([`FirstDetermined`], [`ClassifiedEstimate`]).
//! - [`ListChange`] and [`apply`]: structural change events mirrored into the
//!   table, validated up front.
//! - [`TrackSequence`]: the segment view the track is measured in. The table is
//!   one (one segment per item), [`GridChunker`] packs it into grid rows, and
//!   [`UniformTrack`] approximates very long lists with a single extent.
//! - [`TrackMapper`]: the controller tying everything together.
//!
//! This crate deliberately does **not** know about widgets or any particular UI
//! framework. Host frameworks are responsible for:
//!
//! - Forwarding every structural change to [`TrackMapper::on_change`], in order.
//! - Calling [`TrackMapper::on_draw`] once per draw pass so estimates converge
//!   to measurements.
//! - Rendering the scroll handle from `track_offset / track_range`.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::ops::RangeInclusive;
//! use understory_scroll_track::{ListHost, MeasurementSource, TrackConfig, TrackMapper};
//!
//! /// Ten items of 50px, with items 0..=2 laid out.
//! struct Host {
//!     first: usize,
//!     top: i32,
//! }
//!
//! impl MeasurementSource for Host {
//!     fn visible_range(&self) -> Option<RangeInclusive<usize>> {
//!         Some(self.first..=(self.first + 2).min(9))
//!     }
//!     fn measured_extent(&self, _index: usize) -> Option<u32> {
//!         Some(50)
//!     }
//!     fn force_measure(&mut self, _index: usize) -> u32 {
//!         50
//!     }
//! }
//!
//! impl ListHost for Host {
//!     fn item_count(&self) -> usize {
//!         10
//!     }
//!     fn first_visible_top(&self) -> i32 {
//!         self.top
//!     }
//!     fn scroll_to_index_with_offset(&mut self, index: usize, offset: i64) {
//!         self.first = index;
//!         self.top = offset as i32;
//!     }
//!     fn scroll_by_pixels(&mut self, _delta: i64) {}
//! }
//!
//! let mut host = Host { first: 0, top: 0 };
//! let mut mapper = TrackMapper::new(TrackConfig::default().with_padding(8, 8));
//! mapper.on_draw(&mut host);
//!
//! assert_eq!(mapper.track_range(&mut host), 516);
//!
//! // Drag the handle to 133px: 125px into content is 25px into item 2.
//! mapper.scroll_to_track_offset(&mut host, 133);
//! assert_eq!((host.first, host.top), (2, -25));
//! assert_eq!(mapper.track_offset(&mut host), 133);
//! ```
//!
//! ## Grids and very long lists
//!
//! [`TrackConfig::with_grid`] reads the table as rows of a fixed column count,
//! packing items by their [`ListHost::span_of`]. A row's extent is its tallest
//! member and a track position resolves to the first item of its row.
//!
//! [`TrackConfig::with_approximate`] opts into a uniform-extent fallback once
//! the list has more than [`ApproximateConfig::cutoff`] segments. Small handle
//! movements then scroll by pixels and large ones jump by index.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod estimate;
mod grid;
mod host;
mod mapper;
mod measure;
mod model;
mod mutation;
mod table;
mod uniform;

#[cfg(test)]
mod test_host;

pub use config::{ApproximateConfig, Layout, TrackConfig};
pub use error::MutationError;
pub use estimate::{ClassifiedEstimate, EstimateContext, EstimationStrategy, FirstDetermined};
pub use grid::{GridChunker, Row, RowCursor, SpanLookup};
pub use host::ListHost;
pub use mapper::{Phase, TrackMapper};
pub use measure::{MeasurementSource, rebuild, refresh_visible};
pub use model::{TrackSequence, TrackTarget, locate};
pub use mutation::{ChangeOutcome, ListChange, apply};
pub use table::ItemExtentTable;
pub use uniform::UniformTrack;
