// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sections: an optional header, a run of body items, and an optional footer,
//! stacked vertically.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::{Item, LayoutContext, LayoutError, SectionId};

/// Which slot of a [`Section`] a record occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// The optional record stacked above the body items.
    Header,
    /// One of the body items.
    Body,
    /// The optional record stacked below the body items.
    Footer,
}

/// An ordered vertical stack of an optional header, body items, and an
/// optional footer.
///
/// The stacking rules are:
///
/// - the header sits at offset 0,
/// - the first body item starts flush at the bottom of the header,
/// - consecutive body items are separated by
///   [`LayoutContext::inter_item_spacing`],
/// - the footer sits flush at the bottom of the last body item (or of the
///   header when there are no body items).
///
/// Offsets can be brought in line with these rules in two ways:
///
/// - [`Section::assemble_layout`] walks every record once. Use it after
///   structural edits ([`insert`](Section::insert), [`remove`](Section::remove),
///   [`set_items`](Section::set_items), ...) or on first construction.
/// - The `set_and_assemble_*` family replaces a single record that is already
///   in place (for example after it was measured) and restacks only the
///   records below it. The result is the same as a full pass, bit for bit.
///
/// ```rust
/// use kurbo::Size;
/// use understory_section_layout::{
///     Item, ItemAlignment, ItemConfiguration, ItemId, LayoutSettings, Section, SectionId,
/// };
///
/// let item = |id, height| {
///     Item::new(
///         ItemId::new(id),
///         ItemConfiguration::new(ItemAlignment::FullWidth, Size::new(100.0, height)),
///     )
/// };
/// let settings = LayoutSettings {
///     visible_width: 100.0,
///     inter_item_spacing: 8.0,
///     ..LayoutSettings::default()
/// };
///
/// let mut section = Section::new(
///     SectionId::new(0),
///     None,
///     None,
///     vec![item(0, 40.0), item(1, 60.0), item(2, 20.0)],
/// );
/// section.assemble_layout(&settings);
/// let offsets: Vec<f64> = section.items().iter().map(|i| i.offset_y()).collect();
/// assert_eq!(offsets, [0.0, 48.0, 116.0]);
/// assert_eq!(section.height(), 136.0);
///
/// // The middle item was measured taller: only the tail moves.
/// let mut measured = section.items()[1].clone();
/// measured.set_calculated_size(Size::new(100.0, 90.0));
/// section.set_and_assemble_item(measured, 1, &settings).unwrap();
/// assert_eq!(section.items()[0].offset_y(), 0.0);
/// assert_eq!(section.items()[2].offset_y(), 146.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    id: SectionId,
    header: Option<Item>,
    footer: Option<Item>,
    items: Vec<Item>,
    offset_y: f64,
    additional_offset_y: f64,
}

impl Section {
    /// Creates a section.
    ///
    /// Offsets of the given records are taken as-is; call
    /// [`Section::assemble_layout`] before reading geometry.
    #[must_use]
    pub fn new(id: SectionId, header: Option<Item>, footer: Option<Item>, items: Vec<Item>) -> Self {
        Self {
            id,
            header,
            footer,
            items,
            offset_y: 0.0,
            additional_offset_y: 0.0,
        }
    }

    /// Returns the section's id.
    #[must_use]
    #[inline]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Returns the header, if any.
    #[must_use]
    pub fn header(&self) -> Option<&Item> {
        self.header.as_ref()
    }

    /// Returns the footer, if any.
    #[must_use]
    pub fn footer(&self) -> Option<&Item> {
        self.footer.as_ref()
    }

    /// Returns the body items in stacking order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of body items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no body items.
    ///
    /// A section with only a header or footer is still "empty" in this sense.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the record in the given slot.
    ///
    /// For [`ItemKind::Header`] and [`ItemKind::Footer`] the only valid index
    /// is `0`.
    #[must_use]
    pub fn item(&self, kind: ItemKind, index: usize) -> Option<&Item> {
        match kind {
            ItemKind::Header => self.header.as_ref().filter(|_| index == 0),
            ItemKind::Body => self.items.get(index),
            ItemKind::Footer => self.footer.as_ref().filter(|_| index == 0),
        }
    }

    /// Placement of the section inside its container.
    #[must_use]
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Sets the placement of the section inside its container.
    pub fn set_offset_y(&mut self, offset_y: f64) {
        self.offset_y = offset_y;
    }

    /// Secondary adjustment applied on top of [`Section::offset_y`].
    #[must_use]
    pub fn additional_offset_y(&self) -> f64 {
        self.additional_offset_y
    }

    /// Sets the secondary adjustment applied on top of [`Section::offset_y`].
    pub fn set_additional_offset_y(&mut self, additional_offset_y: f64) {
        self.additional_offset_y = additional_offset_y;
    }

    /// Origin of the section in its container's space.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(0.0, self.offset_y + self.additional_offset_y)
    }

    /// Tight height of the stacked content: the bottom of the footer, else
    /// of the last body item, else of the header, else zero.
    #[must_use]
    pub fn height(&self) -> f64 {
        if let Some(footer) = &self.footer {
            return footer.frame().max_y();
        }
        self.run_bottom()
    }

    /// Size of the section. The width is re-read from `ctx` on every call.
    #[must_use]
    pub fn size(&self, ctx: &impl LayoutContext) -> Size {
        Size::new(ctx.content_width(), self.height())
    }

    /// Frame of the section in its container's space.
    #[must_use]
    pub fn frame(&self, ctx: &impl LayoutContext) -> Rect {
        Rect::from_origin_size(self.origin(), self.size(ctx))
    }

    /// Recomputes every offset from scratch in one pass.
    pub fn assemble_layout(&mut self, ctx: &impl LayoutContext) {
        let spacing = ctx.inter_item_spacing();
        let mut offset_y = 0.0;

        if let Some(header) = &mut self.header {
            header.set_offset_y(0.0);
            offset_y = header.height();
        }

        for (index, item) in self.items.iter_mut().enumerate() {
            if index > 0 {
                offset_y += spacing;
            }
            item.set_offset_y(offset_y);
            offset_y += item.height();
        }

        if let Some(footer) = &mut self.footer {
            footer.set_offset_y(offset_y);
        }

        log::trace!(
            "assembled {} with {} items, height {}",
            self.id,
            self.items.len(),
            self.height()
        );
    }

    /// Replaces the header and restacks everything below it.
    ///
    /// If there was a header, `header` must carry the same id. If there was
    /// none, this inserts one and pushes everything down by its height.
    pub fn set_and_assemble_header(
        &mut self,
        mut header: Item,
        ctx: &impl LayoutContext,
    ) -> Result<(), LayoutError> {
        let old_height = match &self.header {
            Some(old) => {
                check_identity(ItemKind::Header, old, &header)?;
                Some(old.height())
            }
            None => None,
        };
        header.set_offset_y(0.0);
        let changed = old_height != Some(header.height());
        self.header = Some(header);
        if changed {
            self.restack_from(0, ctx);
        }
        Ok(())
    }

    /// Replaces the body item at `index` and restacks the items after it and
    /// the footer.
    ///
    /// `item` must carry the same id as the record it replaces. Items before
    /// `index` are never touched. The work done is proportional to the
    /// number of items after `index`.
    pub fn set_and_assemble_item(
        &mut self,
        mut item: Item,
        index: usize,
        ctx: &impl LayoutContext,
    ) -> Result<(), LayoutError> {
        let len = self.items.len();
        let old = self
            .items
            .get(index)
            .ok_or_else(|| LayoutError::IndexOutOfBounds { index, len }.reported())?;
        check_identity(ItemKind::Body, old, &item)?;

        let changed = item.height() != old.height();
        item.set_offset_y(old.offset_y());
        self.items[index] = item;
        if changed {
            self.restack_from(index + 1, ctx);
        }
        Ok(())
    }

    /// Replaces the footer.
    ///
    /// If there was a footer, `footer` must carry the same id and takes over
    /// its offset. Otherwise the footer is placed at the bottom of the
    /// content. Nothing is stacked below a footer, so nothing else moves.
    pub fn set_and_assemble_footer(&mut self, mut footer: Item) -> Result<(), LayoutError> {
        let offset_y = match &self.footer {
            Some(old) => {
                check_identity(ItemKind::Footer, old, &footer)?;
                old.offset_y()
            }
            None => self.run_bottom(),
        };
        footer.set_offset_y(offset_y);
        self.footer = Some(footer);
        Ok(())
    }

    /// Replaces the header without touching any offsets.
    pub fn set_header(&mut self, header: Option<Item>) {
        self.header = header;
    }

    /// Replaces the body items without touching any offsets.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Replaces the footer without touching any offsets.
    pub fn set_footer(&mut self, footer: Option<Item>) {
        self.footer = footer;
    }

    /// Inserts a body item at `index` (`0..=len`). Offsets are not updated.
    pub fn insert(&mut self, item: Item, index: usize) -> Result<(), LayoutError> {
        let len = self.items.len();
        if index > len {
            return Err(LayoutError::IndexOutOfBounds { index, len }.reported());
        }
        self.items.insert(index, item);
        Ok(())
    }

    /// Replaces the body item at `index` (`0..len`) and returns the old one.
    /// Offsets are not updated and ids are not checked.
    pub fn replace(&mut self, item: Item, index: usize) -> Result<Item, LayoutError> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, item)),
            None => Err(LayoutError::IndexOutOfBounds { index, len }.reported()),
        }
    }

    /// Removes and returns the body item at `index` (`0..len`). Offsets are
    /// not updated.
    pub fn remove(&mut self, index: usize) -> Result<Item, LayoutError> {
        let len = self.items.len();
        if index >= len {
            return Err(LayoutError::IndexOutOfBounds { index, len }.reported());
        }
        Ok(self.items.remove(index))
    }

    /// Calls [`Item::reset_size`] on every record.
    ///
    /// Footprints are preserved, so offsets stay valid; the section is ready
    /// to receive fresh measurements.
    pub fn reset_sizes(&mut self) {
        self.header.iter_mut().for_each(Item::reset_size);
        self.items.iter_mut().for_each(Item::reset_size);
        self.footer.iter_mut().for_each(Item::reset_size);
    }

    /// Stores a measured size for the record in the given slot and applies it
    /// through the matching `set_and_assemble_*` entry point.
    pub fn apply_calculated_size(
        &mut self,
        kind: ItemKind,
        index: usize,
        size: Size,
        ctx: &impl LayoutContext,
    ) -> Result<(), LayoutError> {
        let Some(record) = self.item(kind, index) else {
            let len = match kind {
                ItemKind::Header => usize::from(self.header.is_some()),
                ItemKind::Body => self.items.len(),
                ItemKind::Footer => usize::from(self.footer.is_some()),
            };
            return Err(LayoutError::IndexOutOfBounds { index, len }.reported());
        };
        let mut record = record.clone();
        record.set_calculated_size(size);
        match kind {
            ItemKind::Header => self.set_and_assemble_header(record, ctx),
            ItemKind::Body => self.set_and_assemble_item(record, index, ctx),
            ItemKind::Footer => self.set_and_assemble_footer(record),
        }
    }

    /// Index of the body item covering the section-local offset `y`.
    ///
    /// Returns the last item whose top is at or above `y`, clamped to the
    /// first item, so offsets inside the header or in the spacing between
    /// items resolve to a neighbor. Returns `None` when there are no items.
    /// Assumes offsets are assembled.
    #[must_use]
    pub fn item_index_at_offset(&self, y: f64) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let after = self.items.partition_point(|item| item.offset_y() <= y);
        Some(after.saturating_sub(1))
    }

    /// Bottom of the header + body run, ignoring the footer.
    fn run_bottom(&self) -> f64 {
        match (self.items.last(), &self.header) {
            (Some(last), _) => last.frame().max_y(),
            (None, Some(header)) => header.frame().max_y(),
            (None, None) => 0.0,
        }
    }

    /// Re-places body items `start..` and the footer, continuing from the
    /// record above `start`.
    ///
    /// The running offset is accumulated in the same order as
    /// [`Section::assemble_layout`], so the result is bit-identical to a full
    /// pass as long as the records above `start` are assembled.
    fn restack_from(&mut self, start: usize, ctx: &impl LayoutContext) {
        let spacing = ctx.inter_item_spacing();
        let mut offset_y = match start.checked_sub(1).and_then(|i| self.items.get(i)) {
            Some(above) => above.offset_y() + above.height(),
            None => self.header.as_ref().map_or(0.0, Item::height),
        };

        if let Some(tail) = self.items.get_mut(start..) {
            for (index, item) in (start..).zip(tail) {
                if index > 0 {
                    offset_y += spacing;
                }
                item.set_offset_y(offset_y);
                offset_y += item.height();
            }
        }

        if let Some(footer) = &mut self.footer {
            footer.set_offset_y(offset_y);
        }
        log::trace!("restacked {} from item {start}", self.id);
    }
}

fn check_identity(kind: ItemKind, old: &Item, new: &Item) -> Result<(), LayoutError> {
    if old.id() == new.id() {
        Ok(())
    } else {
        Err(LayoutError::IdentityMismatch {
            kind,
            expected: old.id(),
            found: new.id(),
        }
        .reported())
    }
}
