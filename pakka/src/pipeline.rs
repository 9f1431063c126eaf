//! Per-glyph processing and assembly of the packed font.

use rayon::prelude::*;

use crate::{
    pack, Bpp, Error, GlyphBuffer, GlyphMetadata, GlyphSet, GlyphSource, IndexTable,
    IndexingMode, RasterizedGlyph,
};

/// Values shared by every glyph in one conversion run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunContext {
    pub bpp: Bpp,
    /// The tallest `bitmap_top` over all requested glyphs.
    pub max_ascent: i32,
    /// Fraction of a row's maximum intensity it needs to be kept.
    pub row_threshold: f64,
}

/// Quantizes one rasterized glyph and shrinks it to its content.
///
/// A glyph with no coverage at all (a space, say) keeps the size the
/// rasterizer reported and is not trimmed, aligned or pruned.
pub fn process_glyph(code: u32, raster: &RasterizedGlyph, ctx: &RunContext) -> GlyphBuffer {
    let mut glyph =
        GlyphBuffer::from_coverage(code, ctx.bpp, raster.width, raster.rows, &raster.coverage)
            .with_metrics(raster.advance, ctx.max_ascent - raster.bitmap_top);
    if raster.is_blank() {
        log::debug!("glyph {code} is blank, keeping {}x{}", raster.width, raster.rows);
        return glyph;
    }
    glyph.trim_zero_axes();
    glyph.align_width();
    glyph.prune_rows(ctx.row_threshold);
    log::debug!(
        "glyph {code}: {}x{} -> {}x{}, offset {}",
        raster.width,
        raster.rows,
        glyph.width(),
        glyph.height(),
        glyph.baseline_offset()
    );
    log::trace!("{glyph}");
    glyph
}

/// Rasterizes, processes and packs every requested code.
///
/// Glyphs are rasterized and processed in parallel; the result keeps the
/// order of `codes`.
pub fn convert(
    source: &impl GlyphSource,
    codes: &[u32],
    bpp: Bpp,
    row_threshold: f64,
) -> Result<PackedFont, Error> {
    if !(0.0..=1.0).contains(&row_threshold) {
        return Err(Error::InvalidThreshold(row_threshold));
    }
    if codes.is_empty() {
        return Err(Error::EmptyCharacterList);
    }
    let rasters = codes
        .par_iter()
        .map(|code| {
            source
                .rasterize(*code)
                .and_then(|raster| checked(*code, raster))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let max_ascent = rasters
        .iter()
        .map(|raster| raster.bitmap_top)
        .max()
        .unwrap_or_default();
    let ctx = RunContext {
        bpp,
        max_ascent,
        row_threshold,
    };
    log::info!(
        "processing {} glyphs at {bpp} bpp, max ascent {max_ascent}",
        codes.len()
    );
    let glyphs = codes
        .par_iter()
        .zip(rasters.par_iter())
        .map(|(code, raster)| process_glyph(*code, raster, &ctx))
        .collect();
    let glyphs = GlyphSet::new(bpp, glyphs)?;
    Ok(PackedFont::new(&glyphs))
}

fn checked(code: u32, raster: RasterizedGlyph) -> Result<RasterizedGlyph, Error> {
    let len = raster.coverage.len();
    if len != raster.width as usize * raster.rows as usize {
        return Err(Error::CoverageSize {
            code,
            len,
            width: raster.width,
            rows: raster.rows,
        });
    }
    Ok(raster)
}

/// Everything a renderer needs to draw the converted glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedFont {
    pub bpp: Bpp,
    /// Packed rows of every glyph, concatenated in set order.
    pub bitmap: Vec<u8>,
    /// One record per glyph, in set order.
    pub metadata: Vec<GlyphMetadata>,
    pub index: IndexTable,
}

/// A single glyph looked up in a [`PackedFont`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedGlyph<'a> {
    pub position: usize,
    pub metadata: &'a GlyphMetadata,
    pub data: &'a [u8],
}

impl PackedFont {
    pub fn new(glyphs: &GlyphSet) -> Self {
        Self {
            bpp: glyphs.bpp(),
            bitmap: glyphs.bitmap(),
            metadata: glyphs.metadata(),
            index: IndexTable::new(glyphs),
        }
    }

    pub fn mode(&self) -> IndexingMode {
        self.index.mode()
    }

    pub fn first_valid_index(&self) -> u32 {
        self.index.first_valid_index()
    }

    pub fn last_valid_index(&self) -> u32 {
        self.index.last_valid_index()
    }

    /// Finds the glyph for `code` the way the embedded renderer does.
    ///
    /// Ascii tables are addressed by `code - first_valid_index`; sparse
    /// tables by the glyph's position in the set.
    pub fn lookup(&self, code: u32) -> Option<PackedGlyph<'_>> {
        let slot = match self.index.mode() {
            IndexingMode::Ascii => self.index.ascii_slot(code)?,
            IndexingMode::Sparse => self.metadata.iter().position(|meta| meta.code == code)?,
        };
        let position = self.index.resolve(slot)?;
        let metadata = self.metadata.get(position)?;
        let len = self.bpp.bytes_per_row(metadata.width) * metadata.height as usize;
        let data = self
            .bitmap
            .get(metadata.bitmap_index..metadata.bitmap_index + len)?;
        Some(PackedGlyph {
            position,
            metadata,
            data,
        })
    }

    /// Unpacks the intensity levels of the glyph for `code`.
    pub fn levels(&self, code: u32) -> Option<Vec<u8>> {
        let glyph = self.lookup(code)?;
        pack::unpack(
            glyph.data,
            self.bpp,
            glyph.metadata.width,
            glyph.metadata.height,
        )
    }
}
