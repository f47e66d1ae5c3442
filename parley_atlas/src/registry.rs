// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded table of built fonts.

use alloc::vec::Vec;

use crate::Error;
use crate::error::ErrorKind;
use crate::record::FontRecord;

/// Fonts registered so far, looked up by cache key.
///
/// The table only grows; it is emptied as a whole by [`FontRegistry::clear`].
#[derive(Clone, Debug)]
pub struct FontRegistry {
    entries: Vec<FontRecord>,
    capacity: usize,
}

impl FontRegistry {
    /// Creates an empty registry holding at most `capacity` fonts.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Finds a font by key, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&FontRecord> {
        self.entries
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }

    /// Appends a font.
    ///
    /// Fails with [`ErrorKind::CapacityExceeded`] when the table is full,
    /// leaving the existing entries untouched.
    pub fn insert(&mut self, record: FontRecord) -> Result<&FontRecord, Error> {
        if self.is_full() {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                alloc::format!("cannot register {} beyond {} fonts", record.name, self.capacity),
            ));
        }
        self.entries.push(record);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Number of registered fonts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no font is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of fonts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if another insert would fail.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Registered fonts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FontRecord> + '_ {
        self.entries.iter()
    }

    /// Removes every font.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
