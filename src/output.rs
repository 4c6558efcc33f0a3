//! CLI output formatting.
//!
//! Each report has a `format_*` function returning `Vec<String>` (pure, no
//! I/O, unit tested) and a `print_*` wrapper that writes the lines to stdout.
//!
//! # Output Format
//!
//! ## analyze
//!
//! ```text
//! Make: Canon
//! Model: Canon EOS 5D
//! DateTimeOriginal: 2021:06:01 12:30:00
//! GPSLatitude: [40, 26, 4633/100]
//! GPSLongitude: [79, 58, 56]
//! Software: No data
//!
//! Hidden information: meet at dawn
//!
//! Image: 640x480 (LSB capacity 115200 bytes)
//! Coordinates: -40.446203, -79.982222
//! Map: https://www.google.com/maps/search/?api=1&query=-40.446203,-79.982222
//! ```
//!
//! Without coordinates the last two lines collapse to
//! `No GPS coordinates found`.

use crate::analysis::{AnalysisResult, ImageInfo};
use crate::config::AnalyzerConfig;
use crate::gps::GeoCoordinate;
use crate::stego::StegoReport;

const NO_GPS: &str = "No GPS coordinates found";

/// `<lat>, <lon>` at a fixed number of decimal places.
pub fn format_coordinates(coord: &GeoCoordinate, precision: usize) -> String {
    format!(
        "{:.*}, {:.*}",
        precision, coord.latitude, precision, coord.longitude
    )
}

/// Map search link for a coordinate. Only meaningful when coordinates exist,
/// so there is no `Option` variant.
pub fn maps_url(coord: &GeoCoordinate, base_url: &str, precision: usize) -> String {
    format!(
        "{}{:.*},{:.*}",
        base_url, precision, coord.latitude, precision, coord.longitude
    )
}

fn gps_lines(coordinates: Option<&GeoCoordinate>, config: &AnalyzerConfig) -> Vec<String> {
    let precision = config.display.coordinate_precision;
    match coordinates {
        Some(coord) => vec![
            format!("Coordinates: {}", format_coordinates(coord, precision)),
            format!("Map: {}", maps_url(coord, &config.maps.base_url, precision)),
        ],
        None => vec![NO_GPS.to_string()],
    }
}

fn image_line(info: &ImageInfo) -> String {
    format!(
        "Image: {}x{} (LSB capacity {} bytes)",
        info.width, info.height, info.capacity_bytes
    )
}

/// Full report for `analyze`.
pub fn format_analysis(result: &AnalysisResult, config: &AnalyzerConfig) -> Vec<String> {
    let mut lines: Vec<String> = result.metadata_summary.lines().map(String::from).collect();
    lines.push(String::new());
    lines.push(result.stego.to_string());
    lines.push(String::new());
    if let Some(info) = &result.image {
        lines.push(image_line(info));
    }
    lines.extend(gps_lines(result.coordinates.as_ref(), config));
    lines
}

/// Report for `metadata`.
pub fn format_metadata(
    summary: &str,
    coordinates: Option<&GeoCoordinate>,
    config: &AnalyzerConfig,
) -> Vec<String> {
    let mut lines: Vec<String> = summary.lines().map(String::from).collect();
    lines.push(String::new());
    lines.extend(gps_lines(coordinates, config));
    lines
}

/// Report for `stego`.
pub fn format_stego(report: &StegoReport, image: Option<&ImageInfo>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(info) = image {
        lines.push(image_line(info));
    }
    lines.push(report.to_string());
    lines
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_analysis(result: &AnalysisResult, config: &AnalyzerConfig) {
    print_lines(&format_analysis(result, config));
}

pub fn print_metadata(
    summary: &str,
    coordinates: Option<&GeoCoordinate>,
    config: &AnalyzerConfig,
) {
    print_lines(&format_metadata(summary, coordinates, config));
}

pub fn print_stego(report: &StegoReport, image: Option<&ImageInfo>) {
    print_lines(&format_stego(report, image));
}
