//! Memoizing coordinate resolver.

use std::collections::HashMap;

use tracing::{trace, warn};

use ltx_model::{GeoPoint, PostalCode};

use crate::lookup::PostalLookup;

/// Resolves postal codes to coordinates.
pub trait CoordinateResolver {
    /// Resolves an already normalized code.
    fn resolve_code(&mut self, code: &PostalCode) -> Option<GeoPoint>;

    /// Normalizes a raw extract value and resolves it.
    fn resolve(&mut self, raw: &str) -> Option<GeoPoint> {
        let code = PostalCode::normalize(raw)?;
        self.resolve_code(&code)
    }
}

/// Lookup counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeStats {
    /// Calls that reached the lookup service.
    pub lookups: usize,
    /// Calls answered from the cache.
    pub cache_hits: usize,
    /// Distinct codes the service could not resolve.
    pub unresolved: usize,
}

/// Caches every answer of the underlying lookup, misses included, for the
/// lifetime of the geocoder. One geocoder is built per pipeline run.
#[derive(Debug)]
pub struct Geocoder<L> {
    lookup: L,
    cache: HashMap<PostalCode, Option<GeoPoint>>,
    stats: GeocodeStats,
}

impl<L: PostalLookup> Geocoder<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: HashMap::new(),
            stats: GeocodeStats::default(),
        }
    }

    pub fn stats(&self) -> GeocodeStats {
        self.stats
    }
}

impl<L: PostalLookup> CoordinateResolver for Geocoder<L> {
    fn resolve_code(&mut self, code: &PostalCode) -> Option<GeoPoint> {
        if let Some(cached) = self.cache.get(code) {
            self.stats.cache_hits += 1;
            return *cached;
        }
        self.stats.lookups += 1;
        let point = match self.lookup.lookup(code) {
            Ok(point) => point.filter(GeoPoint::is_finite),
            Err(error) => {
                warn!(postal_code = %code, %error, "postal code lookup failed");
                None
            }
        };
        if point.is_none() {
            self.stats.unresolved += 1;
            trace!(postal_code = %code, "postal code unresolved");
        }
        self.cache.insert(code.clone(), point);
        point
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::{GeoError, Result};

    struct CountingLookup {
        calls: Cell<usize>,
    }

    impl PostalLookup for CountingLookup {
        fn lookup(&self, code: &PostalCode) -> Result<Option<GeoPoint>> {
            self.calls.set(self.calls.get() + 1);
            match code.as_str() {
                "02115" => Ok(Some(GeoPoint::new(42.34, -71.09))),
                "66666" => Err(GeoError::Lookup {
                    code: code.to_string(),
                    reason: "service unavailable".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    fn counting() -> CountingLookup {
        CountingLookup {
            calls: Cell::new(0),
        }
    }

    #[test]
    fn repeated_codes_hit_the_service_once() {
        let lookup = counting();
        let mut geocoder = Geocoder::new(&lookup);
        for raw in ["02115", "2115", "02115-0001", "2115.0"] {
            assert!(geocoder.resolve(raw).is_some());
        }
        assert_eq!(geocoder.stats().lookups, 1);
        assert_eq!(geocoder.stats().cache_hits, 3);
        assert_eq!(lookup.calls.get(), 1);
    }

    #[test]
    fn misses_are_cached_too() {
        let mut geocoder = Geocoder::new(counting());
        assert_eq!(geocoder.resolve("99999"), None);
        assert_eq!(geocoder.resolve("99999"), None);
        assert_eq!(geocoder.stats().lookups, 1);
        assert_eq!(geocoder.stats().unresolved, 1);
    }

    #[test]
    fn service_failure_is_unresolved() {
        let lookup = counting();
        let mut geocoder = Geocoder::new(&lookup);
        assert_eq!(geocoder.resolve("66666"), None);
        assert_eq!(geocoder.resolve("66666"), None);
        assert_eq!(lookup.calls.get(), 1);
    }

    #[test]
    fn unparseable_input_never_reaches_the_service() {
        let mut geocoder = Geocoder::new(counting());
        assert_eq!(geocoder.resolve(""), None);
        assert_eq!(geocoder.resolve("N/A"), None);
        assert_eq!(geocoder.stats().lookups, 0);
    }
}
