// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf geometry records: [`Item`] and its creation-time configuration.

use kurbo::{Point, Rect, Size};

use crate::ItemId;

/// Horizontal placement of an item within the content width.
///
/// Alignment never affects vertical stacking; it is only consulted by
/// [`Item::aligned_frame`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemAlignment {
    /// Stretch to the full content width.
    #[default]
    FullWidth,
    /// Align to the leading (left) edge.
    Leading,
    /// Center within the content width.
    Center,
    /// Align to the trailing (right) edge.
    Trailing,
}

/// Creation-time configuration of an [`Item`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ItemConfiguration {
    /// Initial alignment.
    pub alignment: ItemAlignment,
    /// Estimated size used until a measurement is available.
    pub preferred_size: Size,
    /// Already-known measured size, if any.
    pub calculated_size: Option<Size>,
}

impl ItemConfiguration {
    /// Creates a configuration with no measured size.
    #[must_use]
    pub const fn new(alignment: ItemAlignment, preferred_size: Size) -> Self {
        Self {
            alignment,
            preferred_size,
            calculated_size: None,
        }
    }

    /// Sets the initial measured size.
    #[must_use]
    pub const fn with_calculated_size(mut self, size: Size) -> Self {
        self.calculated_size = Some(size);
        self
    }
}

/// A positioned record inside a [`Section`](crate::Section): a header, a
/// footer, or a body item.
///
/// Sizing is two-phase. An item starts with a cheap `preferred_size`
/// estimate; once the host has measured the real content it stores a
/// `calculated_size`, which then takes precedence. [`Item::reset_size`]
/// drops the measurement again while keeping the item's footprint.
///
/// `offset_y` is relative to the owning section and is only written by the
/// section's stacking algorithm.
///
/// ```rust
/// use kurbo::Size;
/// use understory_section_layout::{Item, ItemAlignment, ItemConfiguration, ItemId};
///
/// let mut item = Item::new(
///     ItemId::new(1),
///     ItemConfiguration::new(ItemAlignment::Leading, Size::new(100.0, 40.0)),
/// );
/// assert_eq!(item.size().height, 40.0);
/// assert!(!item.is_calculated_once());
///
/// item.set_calculated_size(Size::new(100.0, 52.0));
/// assert_eq!(item.size().height, 52.0);
///
/// // Invalidate for re-measurement without changing the footprint.
/// item.reset_size();
/// assert_eq!(item.calculated_size(), None);
/// assert_eq!(item.preferred_size().height, 52.0);
/// assert!(item.is_calculated_once());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    id: ItemId,
    alignment: ItemAlignment,
    preferred_size: Size,
    calculated_size: Option<Size>,
    calculated_once: bool,
    offset_y: f64,
}

impl Item {
    /// Creates an item at offset zero.
    #[must_use]
    pub fn new(id: ItemId, configuration: ItemConfiguration) -> Self {
        Self {
            id,
            alignment: configuration.alignment,
            preferred_size: configuration.preferred_size,
            calculated_size: configuration.calculated_size,
            calculated_once: configuration.calculated_size.is_some(),
            offset_y: 0.0,
        }
    }

    /// Returns the item's id.
    #[must_use]
    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the alignment.
    #[must_use]
    pub fn alignment(&self) -> ItemAlignment {
        self.alignment
    }

    /// Sets the alignment.
    pub fn set_alignment(&mut self, alignment: ItemAlignment) {
        self.alignment = alignment;
    }

    /// Returns the estimated size.
    #[must_use]
    pub fn preferred_size(&self) -> Size {
        self.preferred_size
    }

    /// Replaces the estimated size.
    ///
    /// Has no visible effect while a calculated size is present.
    pub fn set_preferred_size(&mut self, size: Size) {
        self.preferred_size = size;
    }

    /// Returns the measured size, if any.
    #[must_use]
    pub fn calculated_size(&self) -> Option<Size> {
        self.calculated_size
    }

    /// Stores a measured size. This marks the item as calculated at least once.
    pub fn set_calculated_size(&mut self, size: Size) {
        self.calculated_size = Some(size);
        self.calculated_once = true;
    }

    /// Returns `true` if the item has ever received a measured size, even if
    /// that measurement has since been reset.
    #[must_use]
    pub fn is_calculated_once(&self) -> bool {
        self.calculated_once
    }

    /// Returns the vertical offset from the start of the owning section.
    #[must_use]
    #[inline]
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub(crate) fn set_offset_y(&mut self, offset_y: f64) {
        self.offset_y = offset_y;
    }

    /// Effective size: the measured size if present, otherwise the estimate.
    #[must_use]
    #[inline]
    pub fn size(&self) -> Size {
        self.calculated_size.unwrap_or(self.preferred_size)
    }

    /// Effective height.
    #[must_use]
    #[inline]
    pub fn height(&self) -> f64 {
        self.size().height
    }

    /// Origin relative to the owning section.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(0.0, self.offset_y)
    }

    /// Frame relative to the owning section, with `x` fixed at zero.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Frame relative to the owning section, placed horizontally inside a
    /// content strip of `content_width` according to the alignment.
    ///
    /// [`ItemAlignment::FullWidth`] items are stretched to the full width.
    /// Other items keep their own width; an item wider than the content is
    /// pinned to the leading edge.
    #[must_use]
    pub fn aligned_frame(&self, content_width: f64) -> Rect {
        let size = self.size();
        let (x, width) = match self.alignment {
            ItemAlignment::FullWidth => (0.0, content_width),
            ItemAlignment::Leading => (0.0, size.width),
            ItemAlignment::Center => (((content_width - size.width) * 0.5).max(0.0), size.width),
            ItemAlignment::Trailing => ((content_width - size.width).max(0.0), size.width),
        };
        Rect::from_origin_size(
            Point::new(x, self.offset_y),
            Size::new(width, size.height),
        )
    }

    /// Drops the measured size so the item can be measured again, keeping its
    /// current footprint.
    ///
    /// The last measured size becomes the new estimate, so the item occupies
    /// the same space until the new measurement arrives. This is what keeps
    /// rotation and size-class changes free of visible jumps.
    ///
    /// Does nothing if there is no measured size.
    pub fn reset_size(&mut self) {
        let Some(calculated_size) = self.calculated_size.take() else {
            return;
        };
        self.preferred_size = calculated_size;
    }
}
