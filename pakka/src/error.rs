//! Errors produced while converting a font.

use std::path::PathBuf;

use skrifa::{outline::DrawError, raw::ReadError};
use thiserror::Error;

/// Fatal conditions that abort a conversion run.
///
/// None of these are recovered from: a run either produces every output
/// artifact or nothing at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid bpp {0}, expected one of 1, 2, 4 or 8")]
    InvalidBpp(u8),

    #[error("No characters were requested")]
    EmptyCharacterList,

    #[error("Invalid character {0:?}, use a decimal number or a hex value")]
    InvalidCharacter(String),

    #[error("Invalid character range {start}-{end}")]
    InvalidCharacterRange { start: u32, end: u32 },

    #[error("Invalid row threshold {0}, expected a value between 0 and 1")]
    InvalidThreshold(f64),

    #[error("Invalid font name {0:?}, expected a C identifier")]
    InvalidName(String),

    #[error("Font file '{}' does not exist", .0.display())]
    FontNotFound(PathBuf),

    #[error("Error reading font data: {0}")]
    ReadFont(ReadError),

    #[error("Glyph for code {code} has {len} coverage samples, expected {width}x{rows}")]
    CoverageSize {
        code: u32,
        len: usize,
        width: u32,
        rows: u32,
    },

    #[error("Failed to draw glyph for code {code}: {error}")]
    Draw { code: u32, error: DrawError },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        Error::ReadFont(err)
    }
}
