//! GPS coordinate conversion from EXIF degree/minute/second rationals.
//!
//! EXIF stores each coordinate as two tags: a three-element RATIONAL array
//! (`GPSLatitude` / `GPSLongitude`) and a one-character ASCII reference
//! (`GPSLatitudeRef` / `GPSLongitudeRef`). Conversion:
//!
//! ```text
//! decimal = degrees + minutes / 60 + seconds / 3600
//! negate when the reference is S or W
//! ```
//!
//! Rationals stay as integer numerator/denominator pairs until the final
//! arithmetic step. Denominators like 100 or 10000 are common in camera
//! output and do not round-trip through binary floating point.
//!
//! Missing coordinates are `None` / `Err`, never `(0.0, 0.0)`. The
//! intersection of the equator and the prime meridian is a real place.

use crate::metadata::{TagMap, TagValue};
use serde::Serialize;
use thiserror::Error;

pub const TAG_LATITUDE: &str = "GPSLatitude";
pub const TAG_LATITUDE_REF: &str = "GPSLatitudeRef";
pub const TAG_LONGITUDE: &str = "GPSLongitude";
pub const TAG_LONGITUDE_REF: &str = "GPSLongitudeRef";

#[derive(Error, Debug, PartialEq)]
pub enum GpsError {
    #[error("missing GPS tag {0}")]
    MissingTag(&'static str),
    #[error("{0} is not a rational value")]
    NotRational(&'static str),
    #[error("{tag} has {count} rationals, expected 3")]
    WrongArity { tag: &'static str, count: usize },
    #[error("zero denominator in GPS rational")]
    ZeroDenominator,
    #[error("invalid hemisphere reference {0:?}")]
    InvalidHemisphere(String),
    #[error("hemisphere {hemisphere:?} cannot be used for {axis:?}")]
    AxisMismatch { hemisphere: Hemisphere, axis: Axis },
    #[error("{axis:?} {value} is outside the valid range")]
    OutOfRange { axis: Axis, value: f64 },
}

/// An unsigned EXIF RATIONAL, kept exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

impl Rational {
    pub fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Convert to `f64`. Fails on a zero denominator instead of producing
    /// `inf`/`NaN`.
    pub fn to_f64(self) -> Result<f64, GpsError> {
        if self.denom == 0 {
            return Err(GpsError::ZeroDenominator);
        }
        Ok(f64::from(self.num) / f64::from(self.denom))
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.denom)
        }
    }
}

/// Degrees, minutes, seconds of a single coordinate tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationalTriplet {
    pub degrees: Rational,
    pub minutes: Rational,
    pub seconds: Rational,
}

impl RationalTriplet {
    pub fn new(degrees: Rational, minutes: Rational, seconds: Rational) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Build from the rational array of a GPS tag. Exactly three elements.
    pub fn from_slice(tag: &'static str, values: &[Rational]) -> Result<Self, GpsError> {
        match values {
            [d, m, s] => Ok(Self::new(*d, *m, *s)),
            _ => Err(GpsError::WrongArity {
                tag,
                count: values.len(),
            }),
        }
    }

    /// Unsigned decimal degrees. Each rational becomes a float only here.
    pub fn to_decimal(&self) -> Result<f64, GpsError> {
        let degrees = self.degrees.to_f64()?;
        let minutes = self.minutes.to_f64()?;
        let seconds = self.seconds.to_f64()?;
        Ok(degrees + minutes / 60.0 + seconds / 3600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse an EXIF reference value. Only the exact single characters
    /// `N`, `S`, `E`, `W` are accepted (surrounding whitespace and NULs
    /// from fixed-width ASCII fields are ignored).
    pub fn parse(reference: &str) -> Result<Self, GpsError> {
        match reference.trim_matches(|c: char| c.is_whitespace() || c == '\0') {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            other => Err(GpsError::InvalidHemisphere(other.to_string())),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }

    fn is_negative(self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

/// Signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Convert one DMS triplet to signed decimal degrees for the given axis.
///
/// The hemisphere must belong to the axis: N/S for latitude, E/W for
/// longitude. Values beyond ±90 / ±180 are rejected, not clamped.
pub fn to_signed_decimal(
    triplet: &RationalTriplet,
    hemisphere: Hemisphere,
    axis: Axis,
) -> Result<f64, GpsError> {
    if hemisphere.axis() != axis {
        return Err(GpsError::AxisMismatch { hemisphere, axis });
    }
    let magnitude = triplet.to_decimal()?;
    if magnitude > axis.limit() {
        return Err(GpsError::OutOfRange {
            axis,
            value: magnitude,
        });
    }
    Ok(if hemisphere.is_negative() {
        -magnitude
    } else {
        magnitude
    })
}

/// Convert a full latitude/longitude pair.
pub fn convert(
    latitude: &RationalTriplet,
    latitude_ref: Hemisphere,
    longitude: &RationalTriplet,
    longitude_ref: Hemisphere,
) -> Result<GeoCoordinate, GpsError> {
    Ok(GeoCoordinate {
        latitude: to_signed_decimal(latitude, latitude_ref, Axis::Latitude)?,
        longitude: to_signed_decimal(longitude, longitude_ref, Axis::Longitude)?,
    })
}

fn triplet_tag(tags: &TagMap, tag: &'static str) -> Result<RationalTriplet, GpsError> {
    match tags.get(tag) {
        Some(TagValue::Rational(values)) => RationalTriplet::from_slice(tag, values),
        Some(TagValue::Text(_)) => Err(GpsError::NotRational(tag)),
        None => Err(GpsError::MissingTag(tag)),
    }
}

fn hemisphere_tag(tags: &TagMap, tag: &'static str) -> Result<Hemisphere, GpsError> {
    match tags.get(tag) {
        Some(TagValue::Text(text)) => Hemisphere::parse(text),
        Some(other) => Err(GpsError::InvalidHemisphere(other.to_string())),
        None => Err(GpsError::MissingTag(tag)),
    }
}

/// Read the four GPS tags out of a tag map and convert them.
///
/// All four tags are required; any absence or format problem is an error.
pub fn try_extract(tags: &TagMap) -> Result<GeoCoordinate, GpsError> {
    let latitude = triplet_tag(tags, TAG_LATITUDE)?;
    let latitude_ref = hemisphere_tag(tags, TAG_LATITUDE_REF)?;
    let longitude = triplet_tag(tags, TAG_LONGITUDE)?;
    let longitude_ref = hemisphere_tag(tags, TAG_LONGITUDE_REF)?;
    convert(&latitude, latitude_ref, &longitude, longitude_ref)
}

/// [`try_extract`] with absence as an ordinary outcome.
pub fn extract(tags: &TagMap) -> Option<GeoCoordinate> {
    match try_extract(tags) {
        Ok(coord) => Some(coord),
        Err(e) => {
            log::debug!("no usable GPS coordinates: {e}");
            None
        }
    }
}
