//! Pixel depth and coverage quantization.

use std::fmt;

use crate::Error;

/// Number of bits used to store a single pixel in the packed output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Bpp {
    One,
    Two,
    Four,
    #[default]
    Eight,
}

impl Bpp {
    /// Every supported depth, shallowest first.
    pub const ALL: [Bpp; 4] = [Bpp::One, Bpp::Two, Bpp::Four, Bpp::Eight];

    /// The number of bits per pixel.
    pub const fn bits(self) -> u32 {
        match self {
            Bpp::One => 1,
            Bpp::Two => 2,
            Bpp::Four => 4,
            Bpp::Eight => 8,
        }
    }

    /// The number of whole pixels stored in one output byte.
    pub const fn pixels_per_byte(self) -> u32 {
        8 / self.bits()
    }

    /// The largest intensity level a quantized pixel can hold.
    pub const fn max_level(self) -> u8 {
        ((1u16 << self.bits()) - 1) as u8
    }

    /// Maps an 8-bit coverage sample to an intensity level at this depth.
    ///
    /// This keeps the top `bits()` bits of the sample, so the result is
    /// always in `0..=max_level()`.
    #[inline]
    pub const fn quantize(self, coverage: u8) -> u8 {
        coverage >> (8 - self.bits())
    }

    /// The number of bytes needed to store one row of `width` pixels.
    ///
    /// Rows never share a byte; a partial trailing byte is zero padded.
    pub const fn bytes_per_row(self, width: u32) -> usize {
        (width as usize * self.bits() as usize).div_ceil(8)
    }
}

impl TryFrom<u8> for Bpp {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Bpp::One),
            2 => Ok(Bpp::Two),
            4 => Ok(Bpp::Four),
            8 => Ok(Bpp::Eight),
            other => Err(Error::InvalidBpp(other)),
        }
    }
}

impl fmt::Display for Bpp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}
