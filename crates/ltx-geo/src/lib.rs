//! Postal code geocoding.
//!
//! A [`Geocoder`] wraps any [`PostalLookup`] and memoizes every answer,
//! misses included, for the lifetime of one pipeline run. The default lookup
//! is a GeoNames [`Gazetteer`] loaded from disk.
//!
//! Lookup failures are never fatal: the geocoder logs them and reports the
//! code as unresolved.

mod error;
mod gazetteer;
mod geocoder;
mod lookup;

pub use error::{GeoError, Result};
pub use gazetteer::Gazetteer;
pub use geocoder::{CoordinateResolver, GeocodeStats, Geocoder};
pub use lookup::PostalLookup;
