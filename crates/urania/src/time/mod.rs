pub mod julian;
pub mod normalizer;
pub mod sidereal;
pub mod zone;

pub use julian::{
    calendar_date, calendar_to_naive_date, centuries_since_j2000, is_calendar_date, julian_day,
    julian_day_from_datetime, julian_day_to_civil, naive_date_to_calendar, J2000_JD,
};
pub use normalizer::{BirthDateTime, NormalizedInstant, TimeNormalizer};
pub use sidereal::{greenwich_mean_sidereal_time, local_sidereal_time, mean_obliquity};
pub use zone::{FixedZoneResolver, GeographicZoneResolver, UnresolvableZone, ZoneResolver};
