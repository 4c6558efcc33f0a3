//! # image-checker
//!
//! Inspects a single still image for two independent signals:
//!
//! 1. **EXIF metadata**: camera make/model, capture time, editing software,
//!    and GPS position.
//! 2. **An LSB text payload**: bits hidden in the least-significant bit of
//!    each color channel.
//!
//! # Architecture: Two Independent Pipelines
//!
//! ```text
//! path ─┬─ metadata  →  TagMap  ─┬─ summary text
//!       │                        └─ gps → Option<GeoCoordinate>
//!       └─ image decode → PixelGrid → stego → StegoReport
//!                                              │
//!                            analysis::AnalysisResult
//! ```
//!
//! Neither pipeline can stop the other. A stripped or corrupt EXIF block
//! becomes a summary line, a pixel stream that won't decode becomes an
//! `Error during analysis: ...` report. Only a missing input file aborts the
//! run, and it does so before anything is read.
//!
//! Every stage is a plain function of its input with no shared state, so
//! analyzing several images concurrently needs no coordination.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | EXIF → [`metadata::TagMap`], fixed-order six-line summary |
//! | [`gps`] | Exact DMS rationals + hemisphere → signed decimal degrees |
//! | [`stego`] | LSB bit-plane extraction, `ÿÿ` terminator, Latin-1 printable filter |
//! | [`analysis`] | Runs both pipelines, assembles [`analysis::AnalysisResult`], JSON record |
//! | [`config`] | Optional `image-checker.toml` over stock defaults, validated |
//! | [`output`] | CLI report formatting, coordinate display, map links |
//!
//! # Design Decisions
//!
//! ## Delegated Parsing
//!
//! JPEG/PNG pixel decoding is the `image` crate's job and EXIF TIFF parsing
//! is `kamadak-exif`'s. This crate only interprets their output: which tags
//! matter, how DMS rationals become degrees, how LSBs become text.
//!
//! ## Absence Is a Value
//!
//! Missing GPS is `None`, never `(0.0, 0.0)`. "No EXIF at all" and "EXIF
//! without this tag" are distinct outcomes ([`metadata::MetadataError::NoMetadata`]
//! vs. a `No data` summary line). "Nothing hidden" is
//! [`stego::StegoReport::NotFound`], not an error.
//!
//! ## Bit-Exact Compatibility
//!
//! The LSB layout (raster order, R/G/B only, MSB-first bytes, Latin-1, `0xFF
//! 0xFF` terminator) is fixed so payloads written by other tools using the
//! same convention decode identically.

pub mod analysis;
pub mod config;
pub mod gps;
pub mod metadata;
pub mod output;
pub mod stego;

#[cfg(test)]
pub(crate) mod test_helpers;
