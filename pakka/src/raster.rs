//! Turning font outlines into 8-bit coverage bitmaps.

use skrifa::{
    outline::{DrawSettings, OutlinePen},
    prelude::{LocationRef, Size},
    FontRef, GlyphId, MetadataProvider,
};
use zeno::{Command, Format, Mask, Origin, Vector};

use crate::Error;

/// A glyph as produced by the rasterizer, before quantization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Row-major 8-bit coverage, `width * rows` samples.
    pub coverage: Vec<u8>,
    pub width: u32,
    pub rows: u32,
    /// Horizontal advance in whole pixels.
    pub advance: i32,
    /// Distance from the baseline up to the top row of `coverage`.
    pub bitmap_top: i32,
}

impl RasterizedGlyph {
    /// Returns `true` if no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|sample| *sample == 0)
    }
}

/// Something that can produce a coverage bitmap for a character code.
///
/// Sources are shared between worker threads while a font is converted.
pub trait GlyphSource: Sync {
    fn rasterize(&self, code: u32) -> Result<RasterizedGlyph, Error>;
}

/// Rasterizes unhinted outlines from an OpenType font.
#[derive(Clone)]
pub struct FontRasterizer<'a> {
    font: FontRef<'a>,
    size: Size,
}

impl<'a> FontRasterizer<'a> {
    /// Loads face `index` of `data`, scaled to `ppem` pixels per em.
    pub fn new(data: &'a [u8], index: u32, ppem: u32) -> Result<Self, Error> {
        let font = FontRef::from_index(data, index)?;
        Ok(Self {
            font,
            size: Size::new(ppem as f32),
        })
    }

    fn glyph_id(&self, code: u32) -> GlyphId {
        self.font.charmap().map(code).unwrap_or_else(|| {
            log::warn!("font has no glyph for code {code}, using .notdef");
            GlyphId::NOTDEF
        })
    }
}

impl GlyphSource for FontRasterizer<'_> {
    fn rasterize(&self, code: u32) -> Result<RasterizedGlyph, Error> {
        let glyph_id = self.glyph_id(code);
        let advance = self
            .font
            .glyph_metrics(self.size, LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or_default()
            .round() as i32;
        let mut pen = ZenoPen::default();
        if let Some(outline) = self.font.outline_glyphs().get(glyph_id) {
            outline
                .draw(
                    DrawSettings::unhinted(self.size, LocationRef::default()),
                    &mut pen,
                )
                .map_err(|error| Error::Draw { code, error })?;
        }
        Ok(pen.rasterize(advance))
    }
}

/// Pen that records an outline as zeno path commands.
#[derive(Clone, Debug, Default)]
pub(crate) struct ZenoPen {
    commands: Vec<Command>,
}

impl ZenoPen {
    /// Renders the recorded outline into an alpha mask.
    ///
    /// Outline coordinates are in pixels with y pointing up, so the mask is
    /// placed with a bottom-left origin. Its `top` is then the bottom edge of
    /// the mask and the first row sits `height` rows above that.
    pub(crate) fn rasterize(&self, advance: i32) -> RasterizedGlyph {
        if self.commands.is_empty() {
            return RasterizedGlyph {
                advance,
                ..Default::default()
            };
        }
        let (coverage, placement) = Mask::new(&self.commands[..])
            .format(Format::Alpha)
            .origin(Origin::BottomLeft)
            .render();
        RasterizedGlyph {
            coverage,
            width: placement.width,
            rows: placement.height,
            advance,
            bitmap_top: placement.top + placement.height as i32,
        }
    }
}

impl OutlinePen for ZenoPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::MoveTo(Vector::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::LineTo(Vector::new(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.commands
            .push(Command::QuadTo(Vector::new(cx0, cy0), Vector::new(x, y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(Command::CurveTo(
            Vector::new(cx0, cy0),
            Vector::new(cx1, cy1),
            Vector::new(x, y),
        ));
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}
