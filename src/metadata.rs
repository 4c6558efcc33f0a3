//! EXIF tag extraction and the fixed-order metadata summary.
//!
//! Binary parsing is delegated to `kamadak-exif`, which finds the EXIF TIFF
//! structure inside JPEG (APP1), PNG (`eXIf`), TIFF, and WebP containers.
//! This module flattens the primary-image fields into a [`TagMap`] keyed by
//! the standard EXIF tag name (`Make`, `GPSLatitude`, ...). Thumbnail (IFD1)
//! fields are skipped so keys stay unique.
//!
//! ## No metadata vs. missing tags
//!
//! These are different outcomes and callers must be able to tell them apart:
//!
//! - **No metadata**: the container has no EXIF block, the block has zero
//!   fields, or the block is malformed. [`read_tags`] returns
//!   `Err(MetadataError::...)` and the summary is a single explanatory line.
//! - **Missing tag**: EXIF exists but a tag of interest does not. The summary
//!   reports that tag as `No data` and still emits all six lines.
//!
//! ## Summary format
//!
//! ```text
//! Make: Canon
//! Model: Canon EOS 5D
//! DateTimeOriginal: 2021:06:01 12:30:00
//! GPSLatitude: [40, 26, 4633/100]
//! GPSLongitude: No data
//! Software: No data
//! ```
//!
//! Order follows [`SUMMARY_TAGS`] exactly, so output is diffable across runs.

use crate::gps::Rational;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use thiserror::Error;

/// Tags reported in the summary, in output order.
pub const SUMMARY_TAGS: [&str; 6] = [
    "Make",
    "Model",
    "DateTimeOriginal",
    "GPSLatitude",
    "GPSLongitude",
    "Software",
];

/// Summary text when the image carries no usable EXIF block.
pub const NO_METADATA: &str = "No metadata, perhaps data was changed";

const NO_DATA: &str = "No data";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("no EXIF metadata present")]
    NoMetadata,
    #[error("malformed EXIF block: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single tag value.
///
/// Rationals keep their exact numerator/denominator so the GPS converter can
/// defer floating point until the last step. Everything else is stored as
/// display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Rational(Vec<Rational>),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(text) => f.write_str(text),
            TagValue::Rational(values) if values.len() == 1 => write!(f, "{}", values[0]),
            TagValue::Rational(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Tag name → value, built once per image and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    tags: BTreeMap<String, TagValue>,
}

impl TagMap {
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
impl TagMap {
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.tags.iter()
    }
}

/// First occurrence of a key wins, matching how EXIF readers treat
/// duplicated tags within one IFD.
impl FromIterator<(String, TagValue)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        let mut tags = BTreeMap::new();
        for (name, value) in iter {
            tags.entry(name).or_insert(value);
        }
        Self { tags }
    }
}

/// Decode fixed-width EXIF ASCII: components are NUL-separated, trailing
/// padding is dropped.
fn ascii_text(components: &[Vec<u8>]) -> String {
    components
        .iter()
        .map(|c| String::from_utf8_lossy(c).trim_end_matches(['\0', ' ']).to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn tag_value(field: &exif::Field) -> TagValue {
    match &field.value {
        exif::Value::Rational(values) => TagValue::Rational(
            values
                .iter()
                .map(|r| Rational::new(r.num, r.denom))
                .collect(),
        ),
        exif::Value::Ascii(components) => TagValue::Text(ascii_text(components)),
        _ => TagValue::Text(field.display_value().to_string()),
    }
}

/// Flatten the primary-image fields of a parsed EXIF block.
pub fn tag_map_from_exif(exif: &exif::Exif) -> TagMap {
    exif.fields()
        .filter(|field| field.ifd_num == exif::In::PRIMARY)
        .map(|field| (field.tag.to_string(), tag_value(field)))
        .collect()
}

/// Parse EXIF tags from an image byte source.
///
/// Returns [`MetadataError::NoMetadata`] for an absent or empty block; an
/// empty map is never returned as success. A field whose value cannot be
/// read is skipped and the remaining fields are still returned.
pub fn read_tags<R: BufRead + Seek>(reader: &mut R) -> Result<TagMap, MetadataError> {
    let exif = match exif::Reader::new()
        .continue_on_error(true)
        .read_from_container(reader)
    {
        Ok(exif) => exif,
        Err(exif::Error::PartialResult(partial)) => {
            let (exif, skipped) = partial.into_inner();
            for e in &skipped {
                log::debug!("skipped unreadable EXIF field: {e}");
            }
            exif
        }
        Err(exif::Error::NotFound(_)) => return Err(MetadataError::NoMetadata),
        Err(exif::Error::Io(e)) => return Err(MetadataError::Io(e)),
        Err(e) => return Err(MetadataError::Malformed(e.to_string())),
    };
    let tags = tag_map_from_exif(&exif);
    if tags.is_empty() {
        return Err(MetadataError::NoMetadata);
    }
    log::debug!("read {} EXIF tags", tags.len());
    Ok(tags)
}

/// Open `path` read-only and parse its EXIF tags. The file handle is
/// released before this returns.
pub fn read_tags_from_path(path: &Path) -> Result<TagMap, MetadataError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_tags(&mut reader)
}

/// One `"<tag>: <value>"` or `"<tag>: No data"` line per [`SUMMARY_TAGS`]
/// entry, joined with newlines.
pub fn summarize(tags: &TagMap) -> String {
    SUMMARY_TAGS
        .iter()
        .map(|name| match tags.get(name) {
            Some(value) => format!("{name}: {value}"),
            None => format!("{name}: {NO_DATA}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary text for any outcome of [`read_tags`].
///
/// A malformed block keeps the parser's reason in parentheses so the
/// degradation is visible in the report.
pub fn summary_for(outcome: &Result<TagMap, MetadataError>) -> String {
    match outcome {
        Ok(tags) => summarize(tags),
        Err(MetadataError::NoMetadata) => NO_METADATA.to_string(),
        Err(e) => format!("{NO_METADATA} ({e})"),
    }
}
