// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_section_layout --heading-base-level=0

//! Understory Section Layout: incremental vertical stacking for sectioned lists.
//!
//! This crate is the geometry core of a variable-size list layout, of the kind
//! used for chat transcripts and feeds. It tracks item sizes, section
//! structure, and vertical offsets, and keeps them consistent through
//! insertions, removals, replacements, and re-measurement without redoing the
//! whole layout for every change.
//!
//! The core concepts are:
//!
//! - [`Item`]: a leaf record with a stable [`ItemId`], an [`ItemAlignment`],
//!   a cheap *preferred* size, and an optional *calculated* (measured) size
//!   that takes precedence once known.
//! - [`Section`]: an optional header, a run of body items, and an optional
//!   footer. It owns the stacking algorithm, both as a full pass
//!   ([`Section::assemble_layout`]) and as incremental single-record updates
//!   (the `set_and_assemble_*` family) that only restack what lies below the
//!   changed record.
//! - [`LayoutModel`]: a vertical stack of sections, with the same full and
//!   incremental paths one level up and an id → [`ItemPath`] map for routing
//!   measurements.
//! - [`LayoutContext`]: the read-only configuration (width, insets, spacing)
//!   passed into every operation that needs it. [`LayoutSettings`] is a
//!   plain-data implementation.
//!
//! Contract violations (out-of-bounds indices, replacing a record with one of
//! a different id) are returned as [`LayoutError`] in every build, and logged
//! through the `log` facade at `warn` level.
//!
//! This crate deliberately does **not** know about rendering, scrolling, or
//! any particular UI framework. Host frameworks are responsible for:
//!
//! - Measuring content and feeding the results back via
//!   [`Item::set_calculated_size`] / [`LayoutModel::apply_calculated_size`].
//! - Calling [`Item::reset_size`] (or [`LayoutModel::reset_sizes`]) when the
//!   available width changes, so content is re-measured without jumps.
//! - Turning frames into views, and deciding what is visible
//!   ([`LayoutModel::paths_in_range`] helps with the latter).
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_section_layout::{
//!     IdAllocator, Item, ItemAlignment, ItemConfiguration, LayoutModel, LayoutSettings, Section,
//! };
//!
//! let settings = LayoutSettings {
//!     visible_width: 375.0,
//!     inter_item_spacing: 8.0,
//!     ..LayoutSettings::default()
//! };
//! let mut ids = IdAllocator::new();
//!
//! // Three messages with rough height estimates.
//! let messages: Vec<Item> = [40.0, 60.0, 20.0]
//!     .into_iter()
//!     .map(|height| {
//!         Item::new(
//!             ids.next_item_id(),
//!             ItemConfiguration::new(ItemAlignment::Leading, Size::new(200.0, height)),
//!         )
//!     })
//!     .collect();
//! let first = messages[0].id();
//!
//! let section = Section::new(ids.next_section_id(), None, None, messages);
//! let mut model = LayoutModel::new(vec![section]);
//! model.assemble_layout(&settings);
//! assert_eq!(model.height(), 136.0);
//!
//! // The first message turned out taller once measured.
//! model
//!     .apply_calculated_size(first, Size::new(200.0, 52.0), &settings)
//!     .unwrap();
//! assert_eq!(model.height(), 148.0);
//! ```
//!
//! All offsets live in a caller-chosen vertical coordinate space (typically
//! logical pixels) and are expected to be finite. Incremental updates
//! accumulate offsets in the same order as a full pass, so they produce the
//! same values bit for bit, fractional sizes included.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod error;
mod id;
mod item;
mod model;
mod section;

pub use context::{LayoutContext, LayoutSettings};
pub use error::LayoutError;
pub use id::{IdAllocator, ItemId, SectionId};
pub use item::{Item, ItemAlignment, ItemConfiguration};
pub use model::{ItemPath, LayoutModel};
pub use section::{ItemKind, Section};
