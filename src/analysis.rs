//! One analysis run: both pipelines over a single image file.
//!
//! ```text
//!              ┌─ metadata::read_tags ─┬─ metadata::summary_for → summary text
//! path ─ exists?                       └─ gps::extract          → Option<GeoCoordinate>
//!              └─ stego::check_file   ───────────────────────── → StegoReport
//! ```
//!
//! The only failure that escapes [`analyze`] is a missing input file, checked
//! before either pipeline starts. Everything else becomes text inside the
//! [`AnalysisResult`]: an unreadable EXIF block does not stop LSB decoding and
//! a corrupt pixel stream does not hide the camera tags.

use crate::gps::{self, GeoCoordinate};
use crate::metadata;
use crate::stego::{self, StegoReport};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pixel dimensions of a successfully decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub capacity_bytes: usize,
}

/// Combined output of both pipelines. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub metadata_summary: String,
    pub coordinates: Option<GeoCoordinate>,
    pub stego: StegoReport,
    pub image: Option<ImageInfo>,
}

impl AnalysisResult {
    /// The two-field record persisted to disk.
    pub fn record(&self) -> ResultRecord {
        ResultRecord {
            metadata: self.metadata_summary.clone(),
            steganography: self.stego.to_string(),
        }
    }
}

/// `{"metadata": ..., "steganography": ...}` on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub metadata: String,
    pub steganography: String,
}

impl ResultRecord {
    /// Four-space indented JSON. Non-ASCII text is written literally.
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn save(&self, path: &Path) -> Result<(), AnalysisError> {
        let json = self.to_json()?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Metadata pipeline only: summary and coordinates.
pub fn analyze_metadata(path: &Path) -> (String, Option<GeoCoordinate>) {
    let outcome = metadata::read_tags_from_path(path);
    if let Err(e) = &outcome {
        log::debug!("metadata unavailable for {}: {e}", path.display());
    }
    let summary = metadata::summary_for(&outcome);
    match outcome {
        Ok(tags) => (summary, gps::extract(&tags)),
        Err(_) => (summary, None),
    }
}

/// Steganography pipeline only.
pub fn analyze_stego(path: &Path) -> (StegoReport, Option<ImageInfo>) {
    let (report, grid) = stego::check_file(path);
    let info = grid.map(|g| ImageInfo {
        width: g.width(),
        height: g.height(),
        capacity_bytes: g.capacity_bytes(),
    });
    (report, info)
}

fn ensure_exists(path: &Path) -> Result<(), AnalysisError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AnalysisError::FileNotFound(path.to_path_buf()))
    }
}

/// Run both pipelines on `path`.
///
/// Fails only with [`AnalysisError::FileNotFound`]; nothing is read in that
/// case.
pub fn analyze(path: &Path) -> Result<AnalysisResult, AnalysisError> {
    ensure_exists(path)?;
    log::info!("analyzing {}", path.display());

    let (metadata_summary, coordinates) = analyze_metadata(path);
    let (stego, image) = analyze_stego(path);

    Ok(AnalysisResult {
        metadata_summary,
        coordinates,
        stego,
        image,
    })
}

/// [`analyze_metadata`] with the same existence check as [`analyze`].
pub fn analyze_metadata_only(
    path: &Path,
) -> Result<(String, Option<GeoCoordinate>), AnalysisError> {
    ensure_exists(path)?;
    Ok(analyze_metadata(path))
}

/// [`analyze_stego`] with the same existence check as [`analyze`].
pub fn analyze_stego_only(path: &Path) -> Result<(StegoReport, Option<ImageInfo>), AnalysisError> {
    ensure_exists(path)?;
    Ok(analyze_stego(path))
}
