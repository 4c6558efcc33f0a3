//! Least-significant-bit text payload recovery.
//!
//! # Bit layout
//!
//! ```text
//! for row in 0..height            (top to bottom)
//!   for col in 0..width           (left to right)
//!     for channel in 0..3         (R, G, B; alpha ignored)
//!       bit = value & 1
//! ```
//!
//! Bits are grouped eight at a time, most significant first. A trailing group
//! shorter than eight bits is dropped. Each byte maps to the Latin-1 code
//! point with the same value (`0xE9` → `é`), never through platform text
//! decoding, so any encoder writing the same layout round-trips exactly.
//!
//! # Message boundary
//!
//! The payload ends at the first `0xFF 0xFF` byte pair (`ÿÿ`). The scan runs
//! on raw bytes *before* the printable filter; filtering first could merge or
//! split terminator bytes.
//!
//! # Plausibility filter
//!
//! Only printable Latin-1 characters survive:
//!
//! | Range | Kept |
//! |---|---|
//! | `0x20..=0x7E` | yes (space, ASCII letters/digits/punctuation) |
//! | `0x00..=0x1F`, `0x7F..=0x9F` | no (C0/C1 controls, DEL) |
//! | `0xA0` | no (no-break space) |
//! | `0xA1..=0xFF` except `0xAD` | yes |
//! | `0xAD` | no (soft hyphen) |
//!
//! Photographic noise routinely produces short printable fragments. A
//! non-empty result is a hint, not proof of an embedded message.
//!
//! # Memory
//!
//! Bits are packed straight into bytes as they are read, so auxiliary memory
//! is one byte per eight channel samples rather than one character per bit.

use image::{DynamicImage, ImageReader};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Channels sampled per pixel.
pub const CHANNELS_SAMPLED: usize = 3;

/// End-of-message marker, searched in the raw byte stream.
pub const TERMINATOR: [u8; 2] = [0xFF, 0xFF];

pub const NOT_FOUND_TEXT: &str = "No hidden information found.";

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Decode(#[from] image::ImageError),
    #[error("unsupported color type {0}")]
    UnsupportedColor(String),
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Decoded pixels narrowed to 8 bits, row-major, `channels` interleaved values per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap an interleaved buffer. Requires at least three channels.
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, StegoError> {
        if channels < CHANNELS_SAMPLED {
            return Err(StegoError::UnsupportedColor(format!(
                "{channels}-channel pixels"
            )));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(StegoError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Take the pixel data of a decoded image.
    ///
    /// RGB and RGBA are accepted at 8 or 16 bits per channel. 16-bit samples
    /// are narrowed to their high byte, so the LSB plane read is bit 8 of the
    /// original sample. Grayscale has no three color channels to sample and
    /// float images have no integer LSB plane.
    pub fn from_image(image: DynamicImage) -> Result<Self, StegoError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageRgb8(buf) => Self::new(width, height, 3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => Self::new(width, height, 4, buf.into_raw()),
            DynamicImage::ImageRgb16(buf) => {
                Self::new(width, height, 3, high_bytes(buf.into_raw()))
            }
            DynamicImage::ImageRgba16(buf) => {
                Self::new(width, height, 4, high_bytes(buf.into_raw()))
            }
            other => Err(StegoError::UnsupportedColor(format!("{:?}", other.color()))),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Raster-order pixels, each a slice of its channel values.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.channels)
    }

    /// Number of whole payload bytes the LSB plane can carry.
    pub fn capacity_bytes(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS_SAMPLED / 8
    }
}

fn high_bytes(samples: Vec<u16>) -> Vec<u8> {
    samples.into_iter().map(|v| (v >> 8) as u8).collect()
}

/// Pack the LSB plane into bytes, MSB first. Trailing partial byte dropped.
pub fn extract_lsb_bytes(grid: &PixelGrid) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(grid.capacity_bytes());
    let mut acc: u8 = 0;
    let mut filled = 0;
    for pixel in grid.pixels() {
        for &value in &pixel[..CHANNELS_SAMPLED] {
            acc = (acc << 1) | (value & 1);
            filled += 1;
            if filled == 8 {
                bytes.push(acc);
                acc = 0;
                filled = 0;
            }
        }
    }
    bytes
}

/// Bytes before the first terminator, or all bytes when there is none.
pub fn truncate_at_terminator(bytes: &[u8]) -> &[u8] {
    match bytes.windows(TERMINATOR.len()).position(|w| w == TERMINATOR) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Printable test for a Latin-1 byte. See the module table.
pub fn is_printable_latin1(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF)
}

/// Map bytes to Latin-1 characters, keeping only printable ones.
pub fn printable_latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .copied()
        .filter(|&b| is_printable_latin1(b))
        .map(char::from)
        .collect()
}

/// Full decode of a pixel grid. `None` when nothing printable precedes the
/// terminator.
pub fn decode(grid: &PixelGrid) -> Option<String> {
    let bytes = extract_lsb_bytes(grid);
    let message = printable_latin1(truncate_at_terminator(&bytes));
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Outcome of the steganography pipeline. Every variant is a terminal,
/// reportable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoReport {
    Hidden(String),
    NotFound,
    Error(String),
}

impl StegoReport {
    pub fn from_grid(grid: &PixelGrid) -> Self {
        match decode(grid) {
            Some(text) => StegoReport::Hidden(text),
            None => StegoReport::NotFound,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StegoReport::Error(_))
    }
}

impl fmt::Display for StegoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StegoReport::Hidden(text) => write!(f, "Hidden information: {text}"),
            StegoReport::NotFound => f.write_str(NOT_FOUND_TEXT),
            StegoReport::Error(message) => write!(f, "Error during analysis: {message}"),
        }
    }
}

/// Open and decode an image file into a [`PixelGrid`].
///
/// The format is sniffed from content, not the extension. The file is closed
/// when this returns, on success or failure.
pub fn load_grid(path: &Path) -> Result<PixelGrid, StegoError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    PixelGrid::from_image(image)
}

/// Run the steganography pipeline on a file. Never fails: decode problems
/// become [`StegoReport::Error`].
pub fn check_file(path: &Path) -> (StegoReport, Option<PixelGrid>) {
    match load_grid(path) {
        Ok(grid) => (StegoReport::from_grid(&grid), Some(grid)),
        Err(e) => {
            log::warn!("cannot decode {} for LSB analysis: {e}", path.display());
            (StegoReport::Error(e.to_string()), None)
        }
    }
}
