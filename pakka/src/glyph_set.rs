//! The ordered collection of finished glyphs.

use crate::{pack, Bpp, Error, GlyphBuffer, GlyphMetadata};

/// Processed glyphs in request order, with their offsets into the packed
/// bitmap assigned.
#[derive(Clone, Debug)]
pub struct GlyphSet {
    bpp: Bpp,
    glyphs: Vec<GlyphBuffer>,
    first_valid_index: u32,
    last_valid_index: u32,
}

impl GlyphSet {
    /// Takes ownership of the finished glyphs and assigns each its
    /// `bitmap_index`: the number of packed bytes of every glyph before it.
    ///
    /// Offsets are non-decreasing. A glyph that packs to zero bytes (one
    /// that quantized to nothing or lost every row to pruning) shares its
    /// `bitmap_index` with the glyph after it; every other glyph starts
    /// strictly after its predecessor.
    pub fn new(bpp: Bpp, mut glyphs: Vec<GlyphBuffer>) -> Result<Self, Error> {
        let first_valid_index = glyphs
            .iter()
            .map(GlyphBuffer::code)
            .min()
            .ok_or(Error::EmptyCharacterList)?;
        let last_valid_index = glyphs
            .iter()
            .map(GlyphBuffer::code)
            .max()
            .unwrap_or(first_valid_index);
        let mut offset = 0;
        for glyph in &mut glyphs {
            debug_assert_eq!(glyph.bpp(), bpp);
            glyph.set_bitmap_index(offset);
            offset += glyph.packed_len();
        }
        log::debug!(
            "assembled {} glyphs, {offset} bytes of bitmap data",
            glyphs.len()
        );
        Ok(Self {
            bpp,
            glyphs,
            first_valid_index,
            last_valid_index,
        })
    }

    pub fn bpp(&self) -> Bpp {
        self.bpp
    }

    /// The smallest code in the set.
    pub fn first_valid_index(&self) -> u32 {
        self.first_valid_index
    }

    /// The largest code in the set.
    pub fn last_valid_index(&self) -> u32 {
        self.last_valid_index
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&GlyphBuffer> {
        self.glyphs.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphBuffer> + '_ {
        self.glyphs.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.glyphs.iter().map(GlyphBuffer::code)
    }

    /// The concatenated packed bytes of every glyph, in set order.
    pub fn bitmap(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.glyphs.iter().map(GlyphBuffer::packed_len).sum());
        for glyph in &self.glyphs {
            debug_assert_eq!(out.len(), glyph.bitmap_index());
            pack::pack_glyph(glyph, &mut out);
        }
        out
    }

    pub fn metadata(&self) -> Vec<GlyphMetadata> {
        self.glyphs.iter().map(GlyphBuffer::metadata).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(code: u32, bpp: Bpp, width: u32, height: u32) -> GlyphBuffer {
        let data = vec![bpp.max_level(); width as usize * height as usize];
        GlyphBuffer::new(code, bpp, width, height, data)
    }

    #[test]
    fn offsets_are_running_sums() {
        let glyphs = vec![
            filled(70, Bpp::Four, 4, 3),
            filled(65, Bpp::Four, 2, 5),
            filled(66, Bpp::Four, 6, 1),
        ];
        let set = GlyphSet::new(Bpp::Four, glyphs).unwrap();
        let offsets: Vec<_> = set.iter().map(GlyphBuffer::bitmap_index).collect();
        assert_eq!(offsets, [0, 6, 11]);
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(set.bitmap().len(), 14);
    }

    #[test]
    fn empty_glyph_shares_next_offset() {
        let glyphs = vec![
            filled(65, Bpp::Two, 4, 2),
            GlyphBuffer::new(66, Bpp::Two, 0, 0, Vec::new()),
            filled(67, Bpp::Two, 4, 1),
        ];
        let set = GlyphSet::new(Bpp::Two, glyphs).unwrap();
        let offsets: Vec<_> = set.iter().map(GlyphBuffer::bitmap_index).collect();
        assert_eq!(offsets, [0, 2, 2]);
        assert_eq!(set.bitmap().len(), 3);
    }

    #[test]
    fn valid_range_ignores_order() {
        let glyphs = vec![
            filled(70, Bpp::One, 8, 1),
            filled(65, Bpp::One, 8, 1),
            filled(66, Bpp::One, 8, 1),
        ];
        let set = GlyphSet::new(Bpp::One, glyphs).unwrap();
        assert_eq!(set.first_valid_index(), 65);
        assert_eq!(set.last_valid_index(), 70);
        assert_eq!(set.codes().collect::<Vec<_>>(), [70, 65, 66]);
    }

    #[test]
    fn bitmap_slices_match_metadata() {
        let glyphs = vec![filled(65, Bpp::Two, 4, 2), filled(66, Bpp::Two, 8, 1)];
        let set = GlyphSet::new(Bpp::Two, glyphs).unwrap();
        let bitmap = set.bitmap();
        for meta in set.metadata() {
            let len = Bpp::Two.bytes_per_row(meta.width) * meta.height as usize;
            let bytes = &bitmap[meta.bitmap_index..meta.bitmap_index + len];
            assert!(bytes.iter().all(|b| *b == 0xFF));
        }
    }

    #[test]
    fn empty_set_is_an_error() {
        assert!(matches!(
            GlyphSet::new(Bpp::One, Vec::new()),
            Err(Error::EmptyCharacterList)
        ));
    }
}
