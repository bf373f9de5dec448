// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable identifiers for items and sections.

use core::fmt;

/// Identifier of an [`Item`](crate::Item).
///
/// An `ItemId` is assigned when the record is created and is never
/// reassigned. Replacing a record "in place" (for example after it has been
/// measured) must keep the same id; the `set_and_assemble_*` family of
/// [`Section`](crate::Section) checks this.
///
/// ```rust
/// use understory_section_layout::ItemId;
///
/// let id = ItemId::new(7);
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates an id from a raw value.
    #[must_use]
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemId").field(&self.0).finish()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

/// Identifier of a [`Section`](crate::Section).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(u64);

impl SectionId {
    /// Creates an id from a raw value.
    #[must_use]
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SectionId").field(&self.0).finish()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

/// Hands out fresh, never-repeating ids.
///
/// Item and section ids come from independent counters, so an `ItemId` and a
/// `SectionId` may share a raw value. Hosts that already have stable keys
/// (database rows, message ids) can skip the allocator and use
/// [`ItemId::new`] / [`SectionId::new`] directly.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next_item: u64,
    next_section: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_item: 0,
            next_section: 0,
        }
    }

    /// Returns a fresh item id.
    pub fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        id
    }

    /// Returns a fresh section id.
    pub fn next_section_id(&mut self) -> SectionId {
        let id = SectionId(self.next_section);
        self.next_section += 1;
        id
    }
}
