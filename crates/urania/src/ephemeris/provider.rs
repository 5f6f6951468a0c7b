//! The position-provider capability and its shared failure policy.

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::ephemeris::types::{BodyPosition, CelestialBody};
use crate::error::{require_finite, ChartError, ChartWarning};

/// Positions computed for one Julian Day, with any bodies that had to be left out.
#[derive(Debug, Clone, Default)]
pub struct PositionSet {
    pub positions: BTreeMap<CelestialBody, BodyPosition>,
    pub warnings: Vec<ChartWarning>,
}

/// Source of geocentric ecliptic positions (mean equinox of date).
///
/// Implementations are pure in `(body, julian_day)` and safe to share across threads.
pub trait PositionProvider: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Position of a single body. The South Node never reaches this method;
    /// it is derived from the North Node.
    fn position(&self, body: CelestialBody, julian_day: f64) -> Result<BodyPosition, ChartError>;

    /// Positions for a set of bodies.
    ///
    /// A body that cannot be computed is omitted and reported as a warning,
    /// unless it is one of [`CelestialBody::ESSENTIAL`], which fails the call.
    fn positions(&self, julian_day: f64, bodies: &[CelestialBody]) -> Result<PositionSet, ChartError> {
        let julian_day = require_finite("julian_day", julian_day)?;
        let mut set = PositionSet::default();

        for &body in bodies {
            if body == CelestialBody::SouthNode {
                continue;
            }
            match self.position(body, julian_day) {
                Ok(pos) => {
                    set.positions.insert(body, pos);
                }
                Err(e) => omit_or_fail(&mut set, body, julian_day, e)?,
            }
        }

        if bodies.contains(&CelestialBody::SouthNode) {
            let north = match set.positions.get(&CelestialBody::NorthNode) {
                Some(node) => Ok(node.clone()),
                None => self.position(CelestialBody::NorthNode, julian_day),
            };
            match north {
                Ok(node) => {
                    set.positions
                        .insert(CelestialBody::SouthNode, node.opposite(CelestialBody::SouthNode));
                }
                Err(e) => omit_or_fail(&mut set, CelestialBody::SouthNode, julian_day, e)?,
            }
        }

        debug!(
            "{} backend placed {} of {} bodies at JD {}",
            self.name(),
            set.positions.len(),
            bodies.len(),
            julian_day
        );
        Ok(set)
    }
}

fn omit_or_fail(
    set: &mut PositionSet,
    body: CelestialBody,
    julian_day: f64,
    error: ChartError,
) -> Result<(), ChartError> {
    if body.is_essential() {
        return Err(match error {
            ChartError::MissingEssentialBody { .. } => error,
            other => ChartError::MissingEssentialBody {
                body,
                julian_day,
                message: other.to_string(),
            },
        });
    }
    warn!("Omitting {} at JD {}: {}", body, julian_day, error);
    set.warnings.push(ChartWarning::BodyOmitted {
        body,
        reason: error.to_string(),
    });
    Ok(())
}
