//! GeoNames postal code gazetteer.
//!
//! The GeoNames `US.txt` dump is tab separated, without a header:
//!
//! | index | field |
//! |-------|-------|
//! | 0 | country code |
//! | 1 | postal code |
//! | 2 | place name |
//! | 3..=8 | admin names and codes |
//! | 9 | latitude |
//! | 10 | longitude |
//! | 11 | accuracy |
//!
//! A postal code listed more than once gets the mean of its coordinates.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use ltx_model::{GeoPoint, PostalCode};

use crate::error::{GeoError, Result};
use crate::lookup::PostalLookup;

const POSTAL_CODE_FIELD: usize = 1;
const LATITUDE_FIELD: usize = 9;
const LONGITUDE_FIELD: usize = 10;

/// In-memory postal code index.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    points: HashMap<PostalCode, GeoPoint>,
}

impl Gazetteer {
    /// A gazetteer that resolves nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (PostalCode, GeoPoint)>,
    {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Loads a GeoNames dump from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| GeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let gazetteer = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            postal_codes = gazetteer.len(),
            "loaded gazetteer"
        );
        Ok(gazetteer)
    }

    /// Parses a GeoNames dump.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut sums: HashMap<PostalCode, (f64, f64, u32)> = HashMap::new();
        let mut rejected = 0usize;
        for record in reader.records() {
            let record = record?;
            let parsed = record
                .get(POSTAL_CODE_FIELD)
                .and_then(PostalCode::normalize)
                .zip(parse_coordinate(record.get(LATITUDE_FIELD)))
                .zip(parse_coordinate(record.get(LONGITUDE_FIELD)));
            let Some(((code, lat), lon)) = parsed else {
                rejected += 1;
                continue;
            };
            let entry = sums.entry(code).or_insert((0.0, 0.0, 0));
            entry.0 += lat;
            entry.1 += lon;
            entry.2 += 1;
        }
        if rejected > 0 {
            debug!(rejected, "gazetteer rows without a usable code or coordinate");
        }

        let points = sums
            .into_iter()
            .map(|(code, (lat, lon, n))| {
                let n = f64::from(n);
                (code, GeoPoint::new(lat / n, lon / n))
            })
            .collect();
        Ok(Self { points })
    }

    pub fn get(&self, code: &PostalCode) -> Option<GeoPoint> {
        self.points.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PostalLookup for Gazetteer {
    fn lookup(&self, code: &PostalCode) -> Result<Option<GeoPoint>> {
        Ok(self.get(code))
    }
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
