// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract-violation errors.

use core::fmt;

use crate::{ItemId, ItemKind};

/// A caller bug detected by a section or layout model operation.
///
/// These are never produced by ordinary data absence (nothing to reset, no
/// previous footer); those cases are silent no-ops. When an operation
/// returns an error it has left the records it was called on unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// An index was outside the valid range for the operation.
    ///
    /// `len` is the length of the sequence at the time of the call. Inserts
    /// accept `0..=len`; every other indexed operation accepts `0..len`.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the indexed sequence.
        len: usize,
    },
    /// A "same record" update was given a record with a different id than
    /// the one already at that position. This usually means the caller is
    /// working from a stale index.
    IdentityMismatch {
        /// Which slot was being updated.
        kind: ItemKind,
        /// Id of the record currently in the slot.
        expected: ItemId,
        /// Id of the record that was passed in.
        found: ItemId,
    },
    /// No record with this id exists in the layout model.
    UnknownItem(ItemId),
    /// A header or footer was inserted with an id that another record in
    /// the layout model already uses.
    DuplicateItem(ItemId),
}

impl LayoutError {
    /// Logs the violation and hands it back for returning.
    pub(crate) fn reported(self) -> Self {
        log::warn!("layout contract violation: {self}");
        self
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for length {len}")
            }
            Self::IdentityMismatch {
                kind,
                expected,
                found,
            } => write!(
                f,
                "{kind:?} update expected {expected} but was given {found}"
            ),
            Self::UnknownItem(id) => write!(f, "no record with {id}"),
            Self::DuplicateItem(id) => write!(f, "{id} is already in use"),
        }
    }
}

impl core::error::Error for LayoutError {}
