//! Shared test utilities for the image-checker test suite.
//!
//! Provides synthetic pixel grids, an LSB embedder that writes the same bit
//! layout the decoder reads, and a tiny TIFF writer for building JPEGs with
//! a known EXIF block.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut grid = rgb_grid(16, 16, 0x80);
//! embed_lsb(&mut grid, b"secret");
//!
//! let jpeg = jpeg_with_exif(&ExifFixture::camera_with_gps());
//! ```

use crate::stego::{CHANNELS_SAMPLED, PixelGrid, TERMINATOR};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

// =========================================================================
// Pixel grids
// =========================================================================

/// RGB grid with every channel set to `fill`.
pub fn rgb_grid(width: u32, height: u32, fill: u8) -> PixelGrid {
    let data = vec![fill; width as usize * height as usize * 3];
    PixelGrid::new(width, height, 3, data).unwrap()
}

/// RGB grid of deterministic pseudo-random bytes (LCG).
pub fn noise_grid(width: u32, height: u32, seed: u32) -> PixelGrid {
    let mut state = seed;
    let data = (0..width as usize * height as usize * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    PixelGrid::new(width, height, 3, data).unwrap()
}

/// Write `message` followed by the terminator into the LSB plane, MSB first,
/// raster order, first three channels of each pixel. Panics if it won't fit.
pub fn embed_lsb(grid: &mut PixelGrid, message: &[u8]) {
    let payload: Vec<u8> = message.iter().chain(TERMINATOR.iter()).copied().collect();
    let bits: Vec<u8> = payload
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect();
    assert!(
        payload.len() <= grid.capacity_bytes(),
        "payload of {} bytes exceeds capacity {}",
        payload.len(),
        grid.capacity_bytes()
    );

    let channels = grid.channels();
    let mut data = grid.as_raw().to_vec();
    let sample_positions = (0..data.len()).filter(|i| i % channels < CHANNELS_SAMPLED);
    for (pos, bit) in sample_positions.zip(bits) {
        data[pos] = (data[pos] & !1) | bit;
    }
    *grid = PixelGrid::new(grid.width(), grid.height(), channels, data).unwrap();
}

/// Save an RGB/RGBA grid as a lossless PNG.
pub fn save_png(grid: &PixelGrid, path: &Path) {
    let color = match grid.channels() {
        3 => image::ColorType::Rgb8,
        4 => image::ColorType::Rgba8,
        n => panic!("cannot save {n}-channel grid"),
    };
    image::save_buffer_with_format(
        path,
        grid.as_raw(),
        grid.width(),
        grid.height(),
        color,
        ImageFormat::Png,
    )
    .unwrap();
}

// =========================================================================
// JPEG / EXIF fixtures
// =========================================================================

/// A baseline JPEG with no metadata segments beyond JFIF.
pub fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([120, 80, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

/// Tag value for [`ExifFixture`].
#[derive(Debug, Clone)]
pub enum FixtureValue {
    Ascii(&'static str),
    Rational(Vec<(u32, u32)>),
    Long(u32),
    /// ASCII entry of `count` bytes whose value offset points past the end
    /// of the TIFF block.
    Dangling(u32),
}

/// Value offset written for [`FixtureValue::Dangling`].
const DANGLING_OFFSET: u32 = 0xFFFF_0000;

impl FixtureValue {
    /// `(TIFF type, count, payload bytes)`, little-endian.
    fn encode(&self) -> (u16, u32, Vec<u8>) {
        match self {
            FixtureValue::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            FixtureValue::Rational(values) => {
                let bytes = values
                    .iter()
                    .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
                    .collect();
                (5, values.len() as u32, bytes)
            }
            FixtureValue::Long(v) => (4, 1, v.to_le_bytes().to_vec()),
            FixtureValue::Dangling(count) => (2, *count, Vec::new()),
        }
    }
}

/// Tags for IFD0, the Exif sub-IFD, and the GPS sub-IFD.
#[derive(Debug, Clone, Default)]
pub struct ExifFixture {
    pub ifd0: Vec<(u16, FixtureValue)>,
    pub exif: Vec<(u16, FixtureValue)>,
    pub gps: Vec<(u16, FixtureValue)>,
}

impl ExifFixture {
    /// Canon camera, capture date, GPS at 40°26'46.33"S 79°58'56"W.
    pub fn camera_with_gps() -> Self {
        Self {
            ifd0: vec![
                (0x010F, FixtureValue::Ascii("Canon")),
                (0x0110, FixtureValue::Ascii("Canon EOS 5D")),
                (0x0131, FixtureValue::Ascii("Test Suite 1.0")),
            ],
            exif: vec![(0x9003, FixtureValue::Ascii("2021:06:01 12:30:00"))],
            gps: vec![
                (0x0001, FixtureValue::Ascii("S")),
                (0x0002, FixtureValue::Rational(vec![(40, 1), (26, 1), (4633, 100)])),
                (0x0003, FixtureValue::Ascii("W")),
                (0x0004, FixtureValue::Rational(vec![(79, 1), (58, 1), (56, 1)])),
            ],
        }
    }

    /// Camera identity only, no GPS sub-IFD.
    pub fn camera_only() -> Self {
        Self {
            gps: Vec::new(),
            ..Self::camera_with_gps()
        }
    }

    /// Serialize as a little-endian TIFF structure.
    pub fn to_tiff(&self) -> Vec<u8> {
        let mut out = b"II*\0".to_vec();
        out.extend(0u32.to_le_bytes());

        let mut ifd0 = self.ifd0.clone();
        if !self.exif.is_empty() {
            let offset = write_ifd(&mut out, &self.exif);
            ifd0.push((0x8769, FixtureValue::Long(offset)));
        }
        if !self.gps.is_empty() {
            let offset = write_ifd(&mut out, &self.gps);
            ifd0.push((0x8825, FixtureValue::Long(offset)));
        }
        ifd0.sort_by_key(|(tag, _)| *tag);
        let ifd0_offset = write_ifd(&mut out, &ifd0);
        out[4..8].copy_from_slice(&ifd0_offset.to_le_bytes());
        out
    }
}

/// Append one IFD plus its out-of-line data; returns the IFD offset.
fn write_ifd(out: &mut Vec<u8>, entries: &[(u16, FixtureValue)]) -> u32 {
    let start = out.len();
    let data_start = start + 2 + entries.len() * 12 + 4;
    let mut data = Vec::new();

    out.extend((entries.len() as u16).to_le_bytes());
    for (tag, value) in entries {
        let (kind, count, bytes) = value.encode();
        out.extend(tag.to_le_bytes());
        out.extend(kind.to_le_bytes());
        out.extend(count.to_le_bytes());
        if let FixtureValue::Dangling(_) = value {
            out.extend(DANGLING_OFFSET.to_le_bytes());
        } else if bytes.len() <= 4 {
            let mut inline = bytes;
            inline.resize(4, 0);
            out.extend(inline);
        } else {
            out.extend(((data_start + data.len()) as u32).to_le_bytes());
            data.extend(bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    out.extend(0u32.to_le_bytes());
    out.extend(data);
    start as u32
}

/// A decodable JPEG with `fixture` in an APP1 `Exif` segment right after SOI.
pub fn jpeg_with_exif(fixture: &ExifFixture) -> Vec<u8> {
    let plain = plain_jpeg(8, 8);
    let tiff = fixture.to_tiff();
    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut bytes = plain[..2].to_vec();
    bytes.extend([0xFF, 0xE1]);
    bytes.extend(segment_len.to_be_bytes());
    bytes.extend(b"Exif\0\0");
    bytes.extend(tiff);
    bytes.extend(&plain[2..]);
    bytes
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
