// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-wide configuration consumed by sections and the layout model.

use kurbo::Insets;

/// Read-only view of the layout-wide configuration.
///
/// Sections never store a context. Every operation that needs width or
/// spacing takes `&impl LayoutContext` and re-reads it, so changes made by
/// the host between layout passes (rotation, dynamic type, window resize)
/// are always observed.
///
/// Hosts typically implement this on their layout controller. For simple
/// cases, [`LayoutSettings`] is a plain-data implementation.
pub trait LayoutContext {
    /// Width of the visible bounds, in the layout's coordinate space.
    fn visible_width(&self) -> f64;

    /// Additional insets applied to content. Only `x0` (left) and `x1`
    /// (right) affect the content width.
    fn additional_insets(&self) -> Insets;

    /// Vertical spacing between consecutive body items of a section.
    fn inter_item_spacing(&self) -> f64;

    /// Vertical spacing between consecutive sections of a
    /// [`LayoutModel`](crate::LayoutModel).
    fn inter_section_spacing(&self) -> f64 {
        0.0
    }

    /// Width available to content: the visible width minus the left and
    /// right insets, never negative.
    fn content_width(&self) -> f64 {
        let insets = self.additional_insets();
        (self.visible_width() - insets.x0 - insets.x1).max(0.0)
    }
}

/// Plain-data [`LayoutContext`].
///
/// ```rust
/// use kurbo::Insets;
/// use understory_section_layout::{LayoutContext, LayoutSettings};
///
/// let settings = LayoutSettings {
///     visible_width: 320.0,
///     additional_insets: Insets::new(16.0, 0.0, 16.0, 0.0),
///     inter_item_spacing: 8.0,
///     ..LayoutSettings::default()
/// };
/// assert_eq!(settings.content_width(), 288.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSettings {
    /// See [`LayoutContext::visible_width`].
    pub visible_width: f64,
    /// See [`LayoutContext::additional_insets`].
    pub additional_insets: Insets,
    /// See [`LayoutContext::inter_item_spacing`].
    pub inter_item_spacing: f64,
    /// See [`LayoutContext::inter_section_spacing`].
    pub inter_section_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            visible_width: 0.0,
            additional_insets: Insets::ZERO,
            inter_item_spacing: 0.0,
            inter_section_spacing: 0.0,
        }
    }
}

impl LayoutContext for LayoutSettings {
    fn visible_width(&self) -> f64 {
        self.visible_width
    }

    fn additional_insets(&self) -> Insets {
        self.additional_insets
    }

    fn inter_item_spacing(&self) -> f64 {
        self.inter_item_spacing
    }

    fn inter_section_spacing(&self) -> f64 {
        self.inter_section_spacing
    }
}
