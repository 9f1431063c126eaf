//! A single glyph's quantized pixels and geometry.

use std::{fmt, ops::Range};

use crate::Bpp;

/// Intensity ramp used when dumping a glyph as ASCII art.
const ASCII_RAMP: &[u8; 8] = b" .-=+*#@";

/// One glyph's quantized pixel matrix.
///
/// Pixels are stored row-major, one intensity level per element, and
/// `data.len() == width * height` holds after every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBuffer {
    code: u32,
    bpp: Bpp,
    width: u32,
    height: u32,
    advance: i32,
    baseline_offset: i32,
    bitmap_index: usize,
    data: Vec<u8>,
}

/// The per-glyph record handed to the output formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetadata {
    pub code: u32,
    pub width: u32,
    pub height: u32,
    pub advance: i32,
    /// Distance from the shared ascent line down to the first stored row.
    pub baseline_offset: i32,
    /// Offset of the glyph's first byte in the packed bitmap.
    pub bitmap_index: usize,
}

impl GlyphBuffer {
    /// Creates a glyph from already quantized pixel levels.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not hold exactly `width * height` levels.
    pub fn new(code: u32, bpp: Bpp, width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize,
            "glyph {code} data does not match its {width}x{height} size"
        );
        debug_assert!(data.iter().all(|level| *level <= bpp.max_level()));
        Self {
            code,
            bpp,
            width,
            height,
            advance: 0,
            baseline_offset: 0,
            bitmap_index: 0,
            data,
        }
    }

    /// Creates a glyph by quantizing an 8-bit coverage matrix.
    pub fn from_coverage(code: u32, bpp: Bpp, width: u32, height: u32, coverage: &[u8]) -> Self {
        let data = coverage.iter().map(|sample| bpp.quantize(*sample)).collect();
        Self::new(code, bpp, width, height, data)
    }

    /// Sets the horizontal advance and the offset below the shared ascent line.
    pub fn with_metrics(mut self, advance: i32, baseline_offset: i32) -> Self {
        self.advance = advance;
        self.baseline_offset = baseline_offset;
        self
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn bpp(&self) -> Bpp {
        self.bpp
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn advance(&self) -> i32 {
        self.advance
    }

    pub fn baseline_offset(&self) -> i32 {
        self.baseline_offset
    }

    pub fn bitmap_index(&self) -> usize {
        self.bitmap_index
    }

    pub(crate) fn set_bitmap_index(&mut self, bitmap_index: usize) {
        self.bitmap_index = bitmap_index;
    }

    /// The quantized levels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the levels of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let width = self.width as usize;
        let start = y as usize * width;
        &self.data[start..start + width]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(|y| self.row(y))
    }

    /// Returns `true` if every stored level is zero.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|level| *level == 0)
    }

    /// Size in bytes of this glyph once packed.
    pub fn packed_len(&self) -> usize {
        self.bpp.bytes_per_row(self.width) * self.height as usize
    }

    pub fn metadata(&self) -> GlyphMetadata {
        GlyphMetadata {
            code: self.code,
            width: self.width,
            height: self.height,
            advance: self.advance,
            baseline_offset: self.baseline_offset,
            bitmap_index: self.bitmap_index,
        }
    }

    /// Removes empty rows and columns from every edge of the matrix.
    ///
    /// Leading rows go first, then trailing rows, leading columns and
    /// trailing columns. Each leading row removed moves the glyph one row
    /// further below the ascent line.
    ///
    /// A matrix that quantized to all zeros collapses to `0x0`.
    pub fn trim_zero_axes(&mut self) {
        self.trim_leading_zero_rows();
        self.trim_trailing_zero_rows();
        self.trim_zero_columns();
    }

    fn trim_leading_zero_rows(&mut self) {
        let count = self.rows().take_while(|row| is_zero(row)).count();
        self.data.drain(..count * self.width as usize);
        self.height -= count as u32;
        self.baseline_offset += count as i32;
    }

    fn trim_trailing_zero_rows(&mut self) {
        let count = (0..self.height)
            .rev()
            .take_while(|y| is_zero(self.row(*y)))
            .count();
        self.height -= count as u32;
        self.data.truncate(self.height as usize * self.width as usize);
    }

    fn trim_zero_columns(&mut self) {
        let leading = (0..self.width)
            .take_while(|x| self.column_is_zero(*x))
            .count() as u32;
        let trailing = (leading..self.width)
            .rev()
            .take_while(|x| self.column_is_zero(*x))
            .count() as u32;
        if leading == 0 && trailing == 0 {
            return;
        }
        let keep = leading as usize..(self.width - trailing) as usize;
        log::trace!(
            "glyph {}: dropping {leading} leading and {trailing} trailing columns",
            self.code
        );
        self.retain_columns(keep);
    }

    fn column_is_zero(&self, x: u32) -> bool {
        self.rows().all(|row| row[x as usize] == 0)
    }

    fn retain_columns(&mut self, keep: Range<usize>) {
        let mut data = Vec::with_capacity(keep.len() * self.height as usize);
        for row in self.rows() {
            data.extend_from_slice(&row[keep.clone()]);
        }
        self.width = keep.len() as u32;
        self.data = data;
    }

    /// Pads each row on the right so that a row fills whole bytes.
    ///
    /// Afterwards `width` is a multiple of [`Bpp::pixels_per_byte`]. Calling
    /// this on an aligned glyph does nothing.
    pub fn align_width(&mut self) {
        let aligned = self.width.next_multiple_of(self.bpp.pixels_per_byte());
        let padding = (aligned - self.width) as usize;
        if padding == 0 {
            return;
        }
        let mut data = Vec::with_capacity(aligned as usize * self.height as usize);
        for row in self.rows() {
            data.extend_from_slice(row);
            data.resize(data.len() + padding, 0);
        }
        self.width = aligned;
        self.data = data;
    }

    /// Drops every row whose summed intensity is below `threshold` of the
    /// largest sum a row of this width can have.
    ///
    /// A threshold of `0.0` keeps every row and `1.0` keeps only rows that
    /// are fully set. Rows are dropped wherever they are, not just at the
    /// edges, and `baseline_offset` is left as it is.
    pub fn prune_rows(&mut self, threshold: f64) {
        let row_max = self.width as u64 * self.bpp.max_level() as u64;
        if row_max == 0 {
            return;
        }
        let mut data = Vec::with_capacity(self.data.len());
        let mut dropped = 0;
        for row in self.rows() {
            let row_sum: u64 = row.iter().map(|level| *level as u64).sum();
            if (row_sum as f64 / row_max as f64) < threshold {
                dropped += 1;
            } else {
                data.extend_from_slice(row);
            }
        }
        if dropped > 0 {
            log::trace!("glyph {}: dropped {dropped} rows", self.code);
            self.height -= dropped;
            self.data = data;
        }
    }
}

fn is_zero(levels: &[u8]) -> bool {
    levels.iter().all(|level| *level == 0)
}

impl fmt::Display for GlyphBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bpp: {}", self.bpp)?;
        writeln!(f, "code: {}", self.code)?;
        writeln!(f, "width: {}", self.width)?;
        writeln!(f, "height: {}", self.height)?;
        writeln!(f, "advance: {}", self.advance)?;
        writeln!(f, "baseline_offset: {}", self.baseline_offset)?;
        writeln!(f, "bitmap_index: {}", self.bitmap_index)?;

        writeln!(f, "\nraw data:")?;
        let pad = (1u32 << self.bpp.bits()).to_string().len();
        for row in self.rows() {
            for (x, level) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{level:0pad$}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nASCII art:")?;
        for row in self.rows() {
            for level in row {
                let shade = match self.bpp {
                    Bpp::One => level * 7,
                    Bpp::Two => level * 2,
                    Bpp::Four => level / 2,
                    Bpp::Eight => level / 32,
                };
                write!(f, "{}", ASCII_RAMP[shade as usize] as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn glyph(bpp: Bpp, width: u32, height: u32, data: &[u8]) -> GlyphBuffer {
        GlyphBuffer::new(65, bpp, width, height, data.to_vec())
    }

    fn assert_consistent(glyph: &GlyphBuffer) {
        assert_eq!(
            glyph.data().len(),
            glyph.width() as usize * glyph.height() as usize
        );
    }

    #[test]
    fn trim_single_pixel() {
        let mut g = glyph(Bpp::Eight, 3, 3, &[0, 0, 0, 0, 5, 0, 0, 0, 0]).with_metrics(4, 2);
        g.trim_zero_axes();
        assert_eq!((g.width(), g.height()), (1, 1));
        assert_eq!(g.data(), &[5]);
        assert_eq!(g.baseline_offset(), 3);
        assert_eq!(g.advance(), 4);
    }

    #[test]
    fn trim_only_leading_rows_move_baseline() {
        #[rustfmt::skip]
        let data = [
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 1, 0, 0,
            0, 0, 1, 0,
            0, 0, 0, 0,
        ];
        let mut g = glyph(Bpp::One, 4, 5, &data);
        g.trim_zero_axes();
        assert_eq!((g.width(), g.height()), (2, 2));
        assert_eq!(g.data(), &[1, 0, 0, 1]);
        assert_eq!(g.baseline_offset(), 2);
        assert_consistent(&g);
    }

    #[test]
    fn trim_interior_empty_lines_survive() {
        #[rustfmt::skip]
        let data = [
            3, 0, 0, 2,
            0, 0, 0, 0,
            1, 0, 0, 1,
        ];
        let mut g = glyph(Bpp::Two, 4, 3, &data);
        let before = g.clone();
        g.trim_zero_axes();
        assert_eq!(g, before);
    }

    #[test]
    fn trim_is_idempotent() {
        #[rustfmt::skip]
        let data = [
            0, 0, 0, 0, 0,
            0, 0, 7, 0, 0,
            0, 3, 0, 9, 0,
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ];
        let mut once = glyph(Bpp::Four, 5, 5, &data);
        once.trim_zero_axes();
        let mut twice = once.clone();
        twice.trim_zero_axes();
        assert_eq!(once, twice);
        assert_eq!((once.width(), once.height()), (3, 2));
        assert_eq!(once.data(), &[0, 7, 0, 3, 0, 9]);
    }

    #[test]
    fn trim_removes_columns_in_every_row() {
        #[rustfmt::skip]
        let data = [
            0, 0, 1, 2, 0,
            0, 0, 3, 0, 0,
            0, 0, 0, 4, 0,
        ];
        let mut g = glyph(Bpp::Eight, 5, 3, &data);
        g.trim_zero_axes();
        assert_eq!((g.width(), g.height()), (2, 3));
        assert_eq!(g.data(), &[1, 2, 3, 0, 0, 4]);
        assert_eq!(g.baseline_offset(), 0);
    }

    #[test]
    fn trim_all_zero_collapses() {
        let mut g = glyph(Bpp::One, 3, 2, &[0; 6]);
        g.trim_zero_axes();
        assert_eq!((g.width(), g.height()), (0, 0));
        assert!(g.data().is_empty());
        assert_eq!(g.baseline_offset(), 2);
    }

    #[test]
    fn align_pads_right_edge() {
        let mut g = glyph(Bpp::One, 3, 2, &[1, 0, 1, 0, 1, 0]);
        g.align_width();
        assert_eq!(g.width(), 8);
        #[rustfmt::skip]
        assert_eq!(
            g.data(),
            &[
                1, 0, 1, 0, 0, 0, 0, 0,
                0, 1, 0, 0, 0, 0, 0, 0,
            ]
        );
        assert_consistent(&g);
    }

    #[test]
    fn align_postcondition_holds_for_every_depth() {
        for bpp in Bpp::ALL {
            for width in 0..10 {
                let mut g = glyph(bpp, width, 2, &vec![bpp.max_level(); width as usize * 2]);
                g.align_width();
                assert_eq!(g.width() % bpp.pixels_per_byte(), 0);
                assert!(g.width() >= width);
                assert!(g.width() < width + bpp.pixels_per_byte());
                assert_consistent(&g);
                let before = g.clone();
                g.align_width();
                assert_eq!(g, before);
            }
        }
    }

    #[test]
    fn prune_zero_threshold_keeps_everything() {
        let mut g = glyph(Bpp::Two, 2, 3, &[0, 0, 1, 0, 3, 3]);
        let before = g.clone();
        g.prune_rows(0.0);
        assert_eq!(g, before);
    }

    #[test]
    fn prune_full_threshold_keeps_full_rows() {
        let mut g = glyph(Bpp::Two, 2, 4, &[3, 3, 3, 2, 0, 0, 3, 3]);
        g.prune_rows(1.0);
        assert_eq!(g.height(), 2);
        assert_eq!(g.data(), &[3, 3, 3, 3]);
        assert_consistent(&g);
    }

    #[test]
    fn prune_uses_true_row_maximum() {
        // row maximum at bpp 4 and width 2 is 30
        let mut g = glyph(Bpp::Four, 2, 3, &[1, 0, 2, 0, 15, 15]).with_metrics(0, 5);
        g.prune_rows(0.1);
        assert_eq!(g.data(), &[15, 15]);
        assert_eq!(g.height(), 1);
        assert_eq!(g.baseline_offset(), 5);
    }

    #[test]
    fn prune_keeps_row_at_exact_threshold() {
        // 3 of 60 is exactly the default threshold
        let mut g = glyph(Bpp::Four, 4, 2, &[3, 0, 0, 0, 15, 15, 15, 15]);
        g.prune_rows(crate::DEFAULT_ROW_THRESHOLD);
        assert_eq!(g.height(), 2);
        assert_eq!(g.data(), &[3, 0, 0, 0, 15, 15, 15, 15]);

        g.prune_rows(0.051);
        assert_eq!(g.height(), 1);
        assert_eq!(g.data(), &[15, 15, 15, 15]);
    }

    #[test]
    fn prune_adjacent_rows() {
        let mut g = glyph(Bpp::One, 1, 5, &[0, 0, 1, 0, 1]);
        g.prune_rows(0.5);
        assert_eq!(g.data(), &[1, 1]);
        assert_eq!(g.height(), 2);
    }

    #[test]
    fn packed_len_rounds_rows_up() {
        assert_eq!(glyph(Bpp::One, 3, 2, &[0; 6]).packed_len(), 2);
        assert_eq!(glyph(Bpp::Four, 4, 3, &[0; 12]).packed_len(), 6);
        assert_eq!(glyph(Bpp::Eight, 0, 0, &[]).packed_len(), 0);
    }

    #[test]
    #[should_panic]
    fn new_rejects_mismatched_data() {
        glyph(Bpp::One, 3, 3, &[0; 8]);
    }

    #[test]
    fn display_dump() {
        let g = glyph(Bpp::Two, 2, 2, &[0, 3, 1, 2]).with_metrics(3, 1);
        let expected = "\
bpp: 2
code: 65
width: 2
height: 2
advance: 3
baseline_offset: 1
bitmap_index: 0

raw data:
0 3
1 2

ASCII art:
 #
-+
";
        assert_eq!(g.to_string(), expected);
    }
}
