//! Packs rasterized glyphs into compact bitmap fonts for small devices.
//!
//! A font is converted in a few steps:
//!
//! 1. every requested code is rasterized into an 8-bit coverage bitmap by a
//!    [`GlyphSource`] (usually a [`FontRasterizer`]);
//! 2. coverage is quantized to the chosen [`Bpp`] and each [`GlyphBuffer`] is
//!    trimmed to its content, padded to whole bytes per row and stripped of
//!    rows too faint to matter;
//! 3. the finished glyphs form a [`GlyphSet`], which assigns each glyph its
//!    offset into the packed bitmap;
//! 4. an [`IndexTable`] maps codes to glyphs and the set is packed into a
//!    [`PackedFont`];
//! 5. the [`publish`] module renders the result as C source.
//!
//! ```no_run
//! # fn main() -> Result<(), pakka::Error> {
//! let data = std::fs::read("Mono.ttf").unwrap();
//! let rasterizer = pakka::FontRasterizer::new(&data, 0, 16)?;
//! let codes = pakka::parse_codes("32-126")?;
//! let font = pakka::convert(&rasterizer, &codes, pakka::Bpp::Four, 0.05)?;
//! println!("{} bytes of bitmap data", font.bitmap.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod bpp;
mod codes;
mod error;
mod glyph;
mod glyph_set;
mod index;
mod options;
pub mod pack;
mod pipeline;
pub mod publish;
mod raster;

use std::path::PathBuf;

pub use bpp::Bpp;
pub use codes::parse_codes;
pub use error::Error;
pub use glyph::{GlyphBuffer, GlyphMetadata};
pub use glyph_set::GlyphSet;
pub use index::{IndexTable, IndexingMode, ASCII_RANGE};
pub use options::{Options, DEFAULT_ROW_THRESHOLD};
pub use pipeline::{convert, process_glyph, PackedFont, PackedGlyph, RunContext};
pub use raster::{FontRasterizer, GlyphSource, RasterizedGlyph};

/// Converts the font described by `options` and writes the C header and
/// source into the output directory.
///
/// `command` is recorded in the generated files. Nothing is written unless
/// every glyph converts successfully. Returns the paths of the header and
/// the source.
pub fn run(options: &Options, command: &str) -> Result<(PathBuf, PathBuf), Error> {
    options.validate()?;
    log::info!("converting font\n{options}");
    let data = std::fs::read(&options.font).map_err(|source| Error::Io {
        path: options.font.clone(),
        source,
    })?;
    let rasterizer = FontRasterizer::new(&data, options.font_index, options.height)?;
    let font = convert(
        &rasterizer,
        &options.characters,
        options.bpp,
        options.row_threshold,
    )?;
    log::info!(
        "{} glyphs, {} bitmap bytes, {} lookup entries ({} indexing)",
        font.metadata.len(),
        font.bitmap.len(),
        font.index.len(),
        font.mode()
    );
    let info = publish::SourceInfo::new(options, command);
    publish::write_output(&options.output, &info, &font)
}
