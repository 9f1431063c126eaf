//! Code to glyph lookup tables.

use std::{fmt, ops::RangeInclusive};

use crate::GlyphSet;

/// Codes that can be stored in a dense [`IndexingMode::Ascii`] table.
pub const ASCII_RANGE: RangeInclusive<u32> = 32..=126;

/// How the renderer turns a code into a glyph position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexingMode {
    /// Dense table addressed by `code - first_valid_index`.
    Ascii,
    /// One entry per glyph, addressed by the glyph's position.
    Sparse,
}

impl IndexingMode {
    /// Picks [`IndexingMode::Ascii`] when every code is printable ASCII.
    pub fn detect(codes: impl IntoIterator<Item = u32>) -> Self {
        if codes.into_iter().all(|code| ASCII_RANGE.contains(&code)) {
            IndexingMode::Ascii
        } else {
            IndexingMode::Sparse
        }
    }
}

impl fmt::Display for IndexingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // names of the runtime's indexing mode enumerators
        match self {
            IndexingMode::Ascii => f.write_str("ASCII"),
            IndexingMode::Sparse => f.write_str("UNICODE"),
        }
    }
}

/// Maps a table slot to a 1-based glyph position.
///
/// A zero entry marks a slot with no glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexTable {
    mode: IndexingMode,
    first_valid_index: u32,
    last_valid_index: u32,
    entries: Vec<u32>,
}

impl IndexTable {
    /// The entry stored in slots that have no glyph.
    pub const UNUSED: u32 = 0;

    pub fn new(glyphs: &GlyphSet) -> Self {
        let mode = IndexingMode::detect(glyphs.codes());
        let first_valid_index = glyphs.first_valid_index();
        let last_valid_index = glyphs.last_valid_index();
        let entries = match mode {
            IndexingMode::Ascii => {
                let mut entries =
                    vec![Self::UNUSED; (last_valid_index - first_valid_index) as usize + 1];
                for (position, code) in glyphs.codes().enumerate() {
                    entries[(code - first_valid_index) as usize] = position as u32 + 1;
                }
                entries
            }
            IndexingMode::Sparse => (1..=glyphs.len() as u32).collect(),
        };
        log::debug!("{mode} index table with {} entries", entries.len());
        Self {
            mode,
            first_valid_index,
            last_valid_index,
            entries,
        }
    }

    pub fn mode(&self) -> IndexingMode {
        self.mode
    }

    pub fn first_valid_index(&self) -> u32 {
        self.first_valid_index
    }

    pub fn last_valid_index(&self) -> u32 {
        self.last_valid_index
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the 0-based glyph position stored in `slot`, if any.
    pub fn resolve(&self, slot: usize) -> Option<usize> {
        match self.entries.get(slot)? {
            &Self::UNUSED => None,
            entry => Some(*entry as usize - 1),
        }
    }

    /// The slot that holds `code` in an [`IndexingMode::Ascii`] table.
    ///
    /// Sparse tables are addressed by position, so this is always `None`
    /// for them.
    pub fn ascii_slot(&self, code: u32) -> Option<usize> {
        match self.mode {
            IndexingMode::Ascii if code <= self.last_valid_index => {
                code.checked_sub(self.first_valid_index).map(|slot| slot as usize)
            }
            _ => None,
        }
    }
}
