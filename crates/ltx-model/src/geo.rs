//! Postal codes and coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LtxError;

/// Length of a normalized US postal code.
pub const POSTAL_CODE_LEN: usize = 5;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A five digit, zero padded postal code.
///
/// Construction normalizes the raw extract value:
///
/// - surrounding whitespace is trimmed
/// - a ZIP+4 suffix (`02115-1234`) is dropped
/// - a numeric rendering (`2115.0`) loses its fractional part
/// - at most the first five characters are kept, and all must be digits
/// - shorter codes are left padded with zeros (`2115` becomes `02115`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalizes a raw value, returning `None` when it is empty or not numeric.
    pub fn normalize(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = LtxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || LtxError::InvalidPostalCode(raw.to_string());
        let trimmed = raw.trim();
        let base = trimmed.split('-').next().unwrap_or_default();
        let base = match base.split_once('.') {
            Some((whole, fraction)) if fraction.chars().all(|ch| ch == '0') => whole,
            Some(_) => return Err(invalid()),
            None => base,
        };
        let digits: String = base.chars().take(POSTAL_CODE_LEN).collect();
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }
        Ok(Self(format!("{digits:0>POSTAL_CODE_LEN$}")))
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
