//! Geographic position -> IANA time zone resolution.

use chrono_tz::Tz;
use lazy_static::lazy_static;
use tzf_rs::DefaultFinder;

/// Resolves the IANA time zone in effect at a geographic position.
///
/// Implementations must be deterministic in (latitude, longitude).
pub trait ZoneResolver: Send + Sync {
    /// Returns the zone, or a reason why none could be resolved.
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, String>;
}

// The boundary index is large; build it once per process.
lazy_static! {
    static ref BOUNDARY_FINDER: DefaultFinder = DefaultFinder::new();
}

/// Looks the zone up in the bundled time-zone boundary polygons.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeographicZoneResolver;

impl ZoneResolver for GeographicZoneResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, String> {
        let name = BOUNDARY_FINDER.get_tz_name(longitude, latitude);
        if name.is_empty() {
            return Err(format!("no time zone boundary contains ({latitude}, {longitude})"));
        }
        name.parse::<Tz>()
            .map_err(|e| format!("unrecognised zone identifier '{name}': {e}"))
    }
}

/// Always answers with the same zone.
#[derive(Debug, Clone, Copy)]
pub struct FixedZoneResolver(pub Tz);

impl ZoneResolver for FixedZoneResolver {
    fn resolve(&self, _latitude: f64, _longitude: f64) -> Result<Tz, String> {
        Ok(self.0)
    }
}

/// Never resolves; exercises the UTC fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnresolvableZone;

impl ZoneResolver for UnresolvableZone {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, String> {
        Err(format!("zone lookup disabled for ({latitude}, {longitude})"))
    }
}
