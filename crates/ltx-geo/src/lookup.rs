//! Lookup capability behind the geocoder.

use ltx_model::{GeoPoint, PostalCode};

use crate::error::Result;

/// A postal code lookup service.
///
/// `Ok(None)` means the service has no record of the code. `Err` means the
/// service failed to answer; the geocoder treats both as unresolved.
pub trait PostalLookup {
    fn lookup(&self, code: &PostalCode) -> Result<Option<GeoPoint>>;
}

impl<L: PostalLookup + ?Sized> PostalLookup for &L {
    fn lookup(&self, code: &PostalCode) -> Result<Option<GeoPoint>> {
        (**self).lookup(code)
    }
}
