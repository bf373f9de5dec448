// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A vertical stack of sections.
//!
//! [`LayoutModel`] stacks [`Section`]s the same way a section stacks its
//! items: each section starts at the bottom of the previous one, plus
//! [`LayoutContext::inter_section_spacing`]. When a single record inside a
//! section changes height, the section absorbs the change incrementally and
//! the model shifts only the sections after it.
//!
//! The model also keeps an id → path map so measurement results, which
//! usually arrive keyed by [`ItemId`], can be routed without a scan.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Rect, Size, Vec2};

use crate::{Item, ItemId, ItemKind, LayoutContext, LayoutError, Section, SectionId};

/// Position of a record inside a [`LayoutModel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemPath {
    /// Index of the section.
    pub section: usize,
    /// Slot within the section.
    pub kind: ItemKind,
    /// Index of the body item; always `0` for headers and footers.
    pub index: usize,
}

impl ItemPath {
    /// Path of a section's header.
    #[must_use]
    pub const fn header(section: usize) -> Self {
        Self {
            section,
            kind: ItemKind::Header,
            index: 0,
        }
    }

    /// Path of a body item.
    #[must_use]
    pub const fn body(section: usize, index: usize) -> Self {
        Self {
            section,
            kind: ItemKind::Body,
            index,
        }
    }

    /// Path of a section's footer.
    #[must_use]
    pub const fn footer(section: usize) -> Self {
        Self {
            section,
            kind: ItemKind::Footer,
            index: 0,
        }
    }
}

/// An ordered, vertically stacked sequence of [`Section`]s.
///
/// ```rust
/// use kurbo::Size;
/// use understory_section_layout::{
///     Item, ItemAlignment, ItemConfiguration, ItemId, ItemPath, LayoutModel, LayoutSettings,
///     Section, SectionId,
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
///     inter_item_spacing: 4.0,
///     ..LayoutSettings::default()
/// };
///
/// let mut model = LayoutModel::new(vec![
///     Section::new(SectionId::new(0), None, None, vec![item(0, 10.0), item(1, 10.0)]),
///     Section::new(SectionId::new(1), None, None, vec![item(2, 10.0)]),
/// ]);
/// model.assemble_layout(&settings);
/// assert_eq!(model.height(), 34.0);
///
/// // A measurement arrives for item 0: everything after it moves down.
/// model
///     .apply_calculated_size(ItemId::new(0), Size::new(100.0, 30.0), &settings)
///     .unwrap();
/// assert_eq!(model.sections()[1].offset_y(), 44.0);
/// assert_eq!(model.item_path(ItemId::new(2)), Some(ItemPath::body(1, 0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LayoutModel {
    sections: Vec<Section>,
    item_paths: HashMap<ItemId, ItemPath>,
    section_indices: HashMap<SectionId, usize>,
    paths_dirty: bool,
}

impl LayoutModel {
    /// Creates a model. Call [`LayoutModel::assemble_layout`] before reading
    /// geometry.
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            item_paths: HashMap::new(),
            section_indices: HashMap::new(),
            paths_dirty: true,
        }
    }

    /// Returns the sections in stacking order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the section at `index`.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Assembles every section and stacks them from offset zero.
    pub fn assemble_layout(&mut self, ctx: &impl LayoutContext) {
        let spacing = ctx.inter_section_spacing();
        let mut offset_y = 0.0;
        for (index, section) in self.sections.iter_mut().enumerate() {
            if index > 0 {
                offset_y += spacing;
            }
            section.assemble_layout(ctx);
            section.set_offset_y(offset_y);
            offset_y += section.height();
        }
        log::trace!(
            "assembled {} sections, height {offset_y}",
            self.sections.len()
        );
    }

    /// Bottom of the last section, ignoring additional offsets.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.sections
            .last()
            .map_or(0.0, |last| last.offset_y() + last.height())
    }

    /// Size of the whole content. The width is re-read from `ctx`.
    #[must_use]
    pub fn content_size(&self, ctx: &impl LayoutContext) -> Size {
        Size::new(ctx.content_width(), self.height())
    }

    /// Index of the section with the given id.
    pub fn section_index(&mut self, id: SectionId) -> Option<usize> {
        self.ensure_paths();
        self.section_indices.get(&id).copied()
    }

    /// Path of the record with the given id.
    pub fn item_path(&mut self, id: ItemId) -> Option<ItemPath> {
        self.ensure_paths();
        self.item_paths.get(&id).copied()
    }

    /// Returns the record at `path`.
    #[must_use]
    pub fn item(&self, path: ItemPath) -> Option<&Item> {
        self.sections.get(path.section)?.item(path.kind, path.index)
    }

    /// Frame of the record at `path` in content space.
    ///
    /// The frame is offset by the section origin and the left inset, and is
    /// placed horizontally according to the record's alignment.
    #[must_use]
    pub fn item_frame(&self, path: ItemPath, ctx: &impl LayoutContext) -> Option<Rect> {
        let section = self.sections.get(path.section)?;
        let record = section.item(path.kind, path.index)?;
        let offset = Vec2::new(ctx.additional_insets().x0, section.origin().y);
        Some(record.aligned_frame(ctx.content_width()) + offset)
    }

    /// Replaces the record at `path` with a record of the same id, and
    /// restacks every later record and section.
    ///
    /// A header or footer may also be inserted into an empty slot this way,
    /// as long as its id is not already used elsewhere in the model.
    pub fn set_and_assemble_item(
        &mut self,
        path: ItemPath,
        item: Item,
        ctx: &impl LayoutContext,
    ) -> Result<(), LayoutError> {
        self.check_slot_index(path)?;
        let inserts_id = match path.kind {
            ItemKind::Header | ItemKind::Footer => self
                .sections
                .get(path.section)
                .is_some_and(|section| section.item(path.kind, 0).is_none()),
            ItemKind::Body => false,
        };
        if inserts_id && self.item_path(item.id()).is_some() {
            return Err(LayoutError::DuplicateItem(item.id()).reported());
        }
        self.update_section(path.section, ctx, |section| match path.kind {
            ItemKind::Header => section.set_and_assemble_header(item, ctx),
            ItemKind::Body => section.set_and_assemble_item(item, path.index, ctx),
            ItemKind::Footer => section.set_and_assemble_footer(item),
        })?;
        if inserts_id {
            self.paths_dirty = true;
        }
        Ok(())
    }

    /// Stores a measured size for the record with the given id and restacks
    /// everything below it.
    pub fn apply_calculated_size(
        &mut self,
        id: ItemId,
        size: Size,
        ctx: &impl LayoutContext,
    ) -> Result<(), LayoutError> {
        let path = self
            .item_path(id)
            .ok_or_else(|| LayoutError::UnknownItem(id).reported())?;
        self.update_section(path.section, ctx, |section| {
            section.apply_calculated_size(path.kind, path.index, size, ctx)
        })
    }

    /// Runs `edit` on the section at `index`, reassembles that section, and
    /// restacks every later section.
    ///
    /// This is the path for structural edits inside one section (inserting,
    /// removing, or moving items) without reassembling the other sections.
    pub fn edit_section(
        &mut self,
        index: usize,
        ctx: &impl LayoutContext,
        edit: impl FnOnce(&mut Section),
    ) -> Result<(), LayoutError> {
        self.paths_dirty = true;
        self.update_section(index, ctx, |section| {
            edit(section);
            section.assemble_layout(ctx);
            Ok(())
        })
    }

    /// Inserts a section at `index` (`0..=len`). Offsets are not updated.
    pub fn insert_section(&mut self, section: Section, index: usize) -> Result<(), LayoutError> {
        let len = self.sections.len();
        if index > len {
            return Err(LayoutError::IndexOutOfBounds { index, len }.reported());
        }
        self.sections.insert(index, section);
        self.paths_dirty = true;
        Ok(())
    }

    /// Replaces the section at `index` (`0..len`) and returns the old one.
    /// Offsets are not updated.
    pub fn replace_section(&mut self, section: Section, index: usize) -> Result<Section, LayoutError> {
        let len = self.sections.len();
        let slot = self
            .sections
            .get_mut(index)
            .ok_or_else(|| LayoutError::IndexOutOfBounds { index, len }.reported())?;
        self.paths_dirty = true;
        Ok(core::mem::replace(slot, section))
    }

    /// Removes and returns the section at `index` (`0..len`). Offsets are not
    /// updated.
    pub fn remove_section(&mut self, index: usize) -> Result<Section, LayoutError> {
        let len = self.sections.len();
        if index >= len {
            return Err(LayoutError::IndexOutOfBounds { index, len }.reported());
        }
        self.paths_dirty = true;
        Ok(self.sections.remove(index))
    }

    /// Calls [`Section::reset_sizes`] on every section.
    pub fn reset_sizes(&mut self) {
        self.sections.iter_mut().for_each(Section::reset_sizes);
    }

    /// Paths of the records whose frames overlap `min_y..max_y`, in stacking
    /// order.
    ///
    /// Assumes the model is assembled, so sections and items are sorted by
    /// offset.
    #[must_use]
    pub fn paths_in_range(&self, min_y: f64, max_y: f64) -> Vec<ItemPath> {
        let overlaps = |top: f64, bottom: f64| top < max_y && bottom > min_y;
        let mut paths = Vec::new();

        let first = self
            .sections
            .partition_point(|section| section.origin().y + section.height() <= min_y);
        for (section_index, section) in self.sections.iter().enumerate().skip(first) {
            let base = section.origin().y;
            if base >= max_y {
                break;
            }
            let record_overlaps = |record: &Item| {
                let frame = record.frame();
                overlaps(base + frame.y0, base + frame.y1)
            };

            if section.header().is_some_and(record_overlaps) {
                paths.push(ItemPath::header(section_index));
            }
            if let Some(start) = section.item_index_at_offset(min_y - base) {
                for (index, item) in section.items().iter().enumerate().skip(start) {
                    if base + item.offset_y() >= max_y {
                        break;
                    }
                    if record_overlaps(item) {
                        paths.push(ItemPath::body(section_index, index));
                    }
                }
            }
            if section.footer().is_some_and(record_overlaps) {
                paths.push(ItemPath::footer(section_index));
            }
        }
        paths
    }

    fn check_slot_index(&self, path: ItemPath) -> Result<(), LayoutError> {
        match path.kind {
            ItemKind::Header | ItemKind::Footer if path.index != 0 => {
                Err(LayoutError::IndexOutOfBounds {
                    index: path.index,
                    len: 1,
                }
                .reported())
            }
            _ => Ok(()),
        }
    }

    /// Applies `update` to one section and, if its height changed, restacks
    /// the sections after it.
    fn update_section(
        &mut self,
        index: usize,
        ctx: &impl LayoutContext,
        update: impl FnOnce(&mut Section) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        let len = self.sections.len();
        let section = self
            .sections
            .get_mut(index)
            .ok_or_else(|| LayoutError::IndexOutOfBounds { index, len }.reported())?;
        let old_height = section.height();
        update(section)?;
        if section.height() != old_height {
            self.restack_sections_from(index + 1, ctx);
        }
        Ok(())
    }

    /// Re-places sections `start..`, accumulating offsets in the same order
    /// as [`LayoutModel::assemble_layout`].
    fn restack_sections_from(&mut self, start: usize, ctx: &impl LayoutContext) {
        let Some(above) = start.checked_sub(1).and_then(|i| self.sections.get(i)) else {
            return;
        };
        let spacing = ctx.inter_section_spacing();
        let mut offset_y = above.offset_y() + above.height();
        if let Some(tail) = self.sections.get_mut(start..) {
            for section in tail {
                offset_y += spacing;
                section.set_offset_y(offset_y);
                offset_y += section.height();
            }
        }
    }

    fn ensure_paths(&mut self) {
        if !self.paths_dirty {
            return;
        }
        self.item_paths.clear();
        self.section_indices.clear();
        for (section_index, section) in self.sections.iter().enumerate() {
            self.section_indices.insert(section.id(), section_index);
            if let Some(header) = section.header() {
                self.item_paths
                    .insert(header.id(), ItemPath::header(section_index));
            }
            for (index, item) in section.items().iter().enumerate() {
                self.item_paths
                    .insert(item.id(), ItemPath::body(section_index, index));
            }
            if let Some(footer) = section.footer() {
                self.item_paths
                    .insert(footer.id(), ItemPath::footer(section_index));
            }
        }
        self.paths_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Insets, Rect, Size};

    use super::{ItemPath, LayoutModel};
    use crate::{
        Item, ItemAlignment, ItemConfiguration, ItemId, LayoutError, LayoutSettings, Section,
        SectionId,
    };

    fn item(id: u64, height: f64) -> Item {
        Item::new(
            ItemId::new(id),
            ItemConfiguration::new(ItemAlignment::FullWidth, Size::new(100.0, height)),
        )
    }

    fn settings() -> LayoutSettings {
        LayoutSettings {
            visible_width: 120.0,
            additional_insets: Insets::new(10.0, 0.0, 10.0, 0.0),
            inter_item_spacing: 4.0,
            inter_section_spacing: 6.0,
        }
    }

    fn section_offsets(model: &LayoutModel) -> Vec<f64> {
        model.sections().iter().map(Section::offset_y).collect()
    }

    fn two_sections() -> LayoutModel {
        LayoutModel::new(vec![
            Section::new(
                SectionId::new(0),
                Some(item(100, 20.0)),
                None,
                vec![item(0, 10.0), item(1, 10.0)],
            ),
            Section::new(
                SectionId::new(1),
                None,
                Some(item(101, 5.0)),
                vec![item(2, 10.0)],
            ),
        ])
    }

    #[test]
    fn sections_stack_with_spacing() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        // Section 0: header 20 + 10 + 4 + 10 = 44.
        assert_eq!(section_offsets(&model), [0.0, 50.0]);
        assert_eq!(model.height(), 65.0);
        assert_eq!(model.content_size(&settings()), Size::new(100.0, 65.0));
    }

    #[test]
    fn measurement_shifts_later_sections_only() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        model
            .apply_calculated_size(ItemId::new(1), Size::new(100.0, 25.0), &settings())
            .unwrap();
        assert_eq!(section_offsets(&model), [0.0, 65.0]);

        let mut full = model.clone();
        full.assemble_layout(&settings());
        assert_eq!(full.sections(), model.sections());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut model = two_sections();
        assert_eq!(
            model.apply_calculated_size(ItemId::new(77), Size::ZERO, &settings()),
            Err(LayoutError::UnknownItem(ItemId::new(77)))
        );
        assert_eq!(model.section_index(SectionId::new(9)), None);
        assert_eq!(model.section_index(SectionId::new(1)), Some(1));
    }

    #[test]
    fn paths_follow_structural_edits() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        assert_eq!(model.item_path(ItemId::new(2)), Some(ItemPath::body(1, 0)));
        assert_eq!(model.item_path(ItemId::new(101)), Some(ItemPath::footer(1)));

        model
            .insert_section(
                Section::new(SectionId::new(2), None, None, vec![item(3, 10.0)]),
                0,
            )
            .unwrap();
        assert_eq!(model.item_path(ItemId::new(2)), Some(ItemPath::body(2, 0)));
        assert_eq!(model.item_path(ItemId::new(3)), Some(ItemPath::body(0, 0)));

        let removed = model.remove_section(1).unwrap();
        assert_eq!(removed.id(), SectionId::new(0));
        assert_eq!(model.item_path(ItemId::new(100)), None);
        assert_eq!(model.section_index(SectionId::new(1)), Some(1));

        assert_eq!(
            model.remove_section(5).map(|s| s.id()),
            Err(LayoutError::IndexOutOfBounds { index: 5, len: 2 })
        );
        assert!(
            model
                .insert_section(Section::new(SectionId::new(3), None, None, Vec::new()), 3)
                .is_err()
        );
    }

    #[test]
    fn edit_section_restacks_following_sections() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        model
            .edit_section(0, &settings(), |section| {
                section.remove(1).unwrap();
            })
            .unwrap();
        // Section 0 shrank by 14.
        assert_eq!(section_offsets(&model), [0.0, 36.0]);
        assert_eq!(model.item_path(ItemId::new(1)), None);

        let replaced = model
            .replace_section(Section::new(SectionId::new(5), None, None, Vec::new()), 1)
            .unwrap();
        assert_eq!(replaced.id(), SectionId::new(1));
        assert_eq!(model.section_index(SectionId::new(5)), Some(1));
    }

    #[test]
    fn inserting_header_registers_its_id() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        model
            .set_and_assemble_item(ItemPath::header(1), item(102, 8.0), &settings())
            .unwrap();
        assert_eq!(model.item_path(ItemId::new(102)), Some(ItemPath::header(1)));
        assert_eq!(
            model.set_and_assemble_item(
                ItemPath {
                    index: 1,
                    ..ItemPath::footer(1)
                },
                item(101, 8.0),
                &settings()
            ),
            Err(LayoutError::IndexOutOfBounds { index: 1, len: 1 })
        );
    }

    #[test]
    fn inserting_footer_registers_its_id() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        model
            .set_and_assemble_item(ItemPath::footer(0), item(103, 7.0), &settings())
            .unwrap();
        assert_eq!(model.item_path(ItemId::new(103)), Some(ItemPath::footer(0)));
        // Section 0 grew by the footer: 44 + 7, then spacing.
        assert_eq!(section_offsets(&model), [0.0, 57.0]);
    }

    #[test]
    fn inserting_header_or_footer_with_a_used_id_is_rejected() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        let before = model.sections().to_vec();

        // Item 2 is a body item of section 1.
        assert_eq!(
            model.set_and_assemble_item(ItemPath::footer(0), item(2, 7.0), &settings()),
            Err(LayoutError::DuplicateItem(ItemId::new(2)))
        );
        // Footer 101 belongs to section 1.
        assert_eq!(
            model.set_and_assemble_item(ItemPath::header(1), item(101, 7.0), &settings()),
            Err(LayoutError::DuplicateItem(ItemId::new(101)))
        );
        assert_eq!(model.sections(), before);
        assert_eq!(model.item_path(ItemId::new(2)), Some(ItemPath::body(1, 0)));
        assert_eq!(model.item_path(ItemId::new(101)), Some(ItemPath::footer(1)));

        // Updating an existing header in place is not an insertion.
        model
            .set_and_assemble_item(ItemPath::header(0), item(100, 12.0), &settings())
            .unwrap();
        assert_eq!(section_offsets(&model), [0.0, 42.0]);
    }

    #[test]
    fn fractional_measurements_restack_sections_exactly() {
        let settings = LayoutSettings {
            inter_item_spacing: 0.1,
            inter_section_spacing: 0.3,
            ..settings()
        };
        let mut model = LayoutModel::new(
            (0..6_u32)
                .map(|n| {
                    let first = u64::from(n) * 3;
                    Section::new(
                        SectionId::new(u64::from(n)),
                        None,
                        None,
                        (first..first + 3).map(|id| item(id, 1.0 / 3.0)).collect(),
                    )
                })
                .collect(),
        );
        model.assemble_layout(&settings);

        for id in 0..18_u32 {
            let height = 0.1 * f64::from(id + 1) + 1.0 / 3.0;
            let measured = Size::new(100.0, height);
            model
                .apply_calculated_size(ItemId::new(u64::from(id)), measured, &settings)
                .unwrap();
            let mut full = model.clone();
            full.assemble_layout(&settings);
            assert_eq!(model.sections(), full.sections(), "after measuring item {id}");
        }
    }

    #[test]
    fn item_frame_applies_inset_alignment_and_section_origin() {
        let mut model = LayoutModel::new(vec![
            Section::new(SectionId::new(0), None, None, vec![item(0, 10.0)]),
            Section::new(
                SectionId::new(1),
                None,
                None,
                vec![Item::new(
                    ItemId::new(1),
                    ItemConfiguration::new(ItemAlignment::Trailing, Size::new(40.0, 10.0)),
                )],
            ),
        ]);
        model.assemble_layout(&settings());
        assert_eq!(
            model.item_frame(ItemPath::body(0, 0), &settings()),
            Some(Rect::new(10.0, 0.0, 110.0, 10.0))
        );
        // Section 1 at 16; trailing item of width 40 inside 100 of content.
        assert_eq!(
            model.item_frame(ItemPath::body(1, 0), &settings()),
            Some(Rect::new(70.0, 16.0, 110.0, 26.0))
        );
        assert_eq!(model.item_frame(ItemPath::footer(0), &settings()), None);
    }

    #[test]
    fn paths_in_range_returns_overlapping_records() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        // Section 0: header 0..20, items 20..30 and 34..44. Section 1: item 50..60, footer 60..65.
        assert_eq!(
            model.paths_in_range(25.0, 55.0),
            [
                ItemPath::body(0, 0),
                ItemPath::body(0, 1),
                ItemPath::body(1, 0)
            ]
        );
        assert_eq!(
            model.paths_in_range(0.0, 1_000.0).len(),
            5,
            "whole range covers every record"
        );
        assert!(model.paths_in_range(30.0, 34.0).is_empty());
        assert_eq!(model.paths_in_range(62.0, 70.0), [ItemPath::footer(1)]);
    }

    #[test]
    fn reset_sizes_reaches_every_section() {
        let mut model = two_sections();
        model.assemble_layout(&settings());
        model
            .apply_calculated_size(ItemId::new(2), Size::new(100.0, 12.0), &settings())
            .unwrap();
        model.reset_sizes();
        let record = model.item(ItemPath::body(1, 0)).unwrap();
        assert_eq!(record.calculated_size(), None);
        assert_eq!(record.size().height, 12.0);
    }
}
