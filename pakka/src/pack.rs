//! Serializing quantized glyphs into a packed bitstream.
//!
//! Each level is written as a `bpp` wide field, most significant bit first,
//! and fields are grouped into bytes. Every row starts on a byte boundary so
//! a renderer can address rows independently; when a row does not fill its
//! last byte the remaining low bits are zero.

use crate::{Bpp, GlyphBuffer};

/// Appends the packed rows of `glyph` to `out`.
///
/// Exactly [`GlyphBuffer::packed_len`] bytes are written.
pub fn pack_glyph(glyph: &GlyphBuffer, out: &mut Vec<u8>) {
    let bits = glyph.bpp().bits();
    out.reserve(glyph.packed_len());
    for row in glyph.rows() {
        let mut byte = 0u8;
        let mut filled = 0;
        for level in row {
            byte |= level << (8 - bits - filled);
            filled += bits;
            if filled == 8 {
                out.push(byte);
                byte = 0;
                filled = 0;
            }
        }
        if filled != 0 {
            out.push(byte);
        }
    }
}

/// Returns the packed rows of a single glyph.
pub fn packed_glyph(glyph: &GlyphBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(glyph.packed_len());
    pack_glyph(glyph, &mut out);
    out
}

/// Recovers the levels of a `width` x `height` glyph from its packed bytes.
///
/// Returns `None` if `bytes` is shorter than the packed glyph.
pub fn unpack(bytes: &[u8], bpp: Bpp, width: u32, height: u32) -> Option<Vec<u8>> {
    let bits = bpp.bits();
    let stride = bpp.bytes_per_row(width);
    let bytes = bytes.get(..stride * height as usize)?;
    let mut levels = Vec::with_capacity(width as usize * height as usize);
    if stride == 0 {
        return Some(levels);
    }
    for row in bytes.chunks_exact(stride) {
        levels.extend((0..width).map(|x| {
            let bit = x * bits;
            let byte = row[(bit / 8) as usize];
            (byte >> (8 - bits - bit % 8)) & bpp.max_level()
        }));
    }
    Some(levels)
}
