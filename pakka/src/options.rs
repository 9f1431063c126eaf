//! Settings for a conversion run.

use std::{fmt, path::PathBuf};

use crate::{Bpp, Error};

/// Row threshold used when none is given.
pub const DEFAULT_ROW_THRESHOLD: f64 = 0.05;

/// Everything needed to convert one font.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Name of the generated font; becomes the prefix of every C symbol.
    pub name: String,
    pub bpp: Bpp,
    /// Pixels per em the font is rasterized at.
    pub height: u32,
    pub font: PathBuf,
    /// Face index within a font collection.
    pub font_index: u32,
    /// Requested codes in output order.
    pub characters: Vec<u32>,
    pub row_threshold: f64,
    /// Directory the generated files are written to.
    pub output: PathBuf,
}

impl Options {
    /// Checks the settings that can't be enforced by their types.
    pub fn validate(&self) -> Result<(), Error> {
        if !is_c_identifier(&self.name) {
            return Err(Error::InvalidName(self.name.clone()));
        }
        if !(0.0..=1.0).contains(&self.row_threshold) {
            return Err(Error::InvalidThreshold(self.row_threshold));
        }
        if self.characters.is_empty() {
            return Err(Error::EmptyCharacterList);
        }
        if !self.font.is_file() {
            return Err(Error::FontNotFound(self.font.clone()));
        }
        Ok(())
    }
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "bpp: {}", self.bpp)?;
        writeln!(f, "height: {}", self.height)?;
        writeln!(f, "font: {}", self.font.display())?;
        writeln!(f, "row threshold: {}", self.row_threshold)?;
        write!(f, "characters:")?;
        for (i, code) in self.characters.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{code}")?;
        }
        Ok(())
    }
}
