//! Brute-force combination search over the pattern table.

use log::debug;
use std::collections::BTreeMap;

use crate::angles::{separation, within_orb};
use crate::aspects::{AspectKind, AspectSettings};
use crate::ephemeris::{BodyPosition, CelestialBody};
use crate::patterns::catalog::{Edge, PatternDefinition, Rule, PATTERN_TABLE};
use crate::patterns::distribution::classify_distribution;
use crate::patterns::types::{Pattern, PatternSettings};

/// Pattern detector
#[derive(Debug, Clone)]
pub struct PatternDetector {
    orbs: BTreeMap<AspectKind, f64>,
    settings: PatternSettings,
}

impl PatternDetector {
    /// Pattern orbs take the pattern overrides first, then the aspect orbs.
    pub fn new(settings: &PatternSettings, aspect_settings: &AspectSettings) -> Self {
        let orbs = AspectKind::MAJOR
            .iter()
            .chain(AspectKind::MINOR.iter())
            .map(|&kind| {
                let orb = settings
                    .orbs
                    .get(&kind)
                    .copied()
                    .unwrap_or_else(|| aspect_settings.orb(kind));
                (kind, orb)
            })
            .collect();
        Self {
            orbs,
            settings: settings.clone(),
        }
    }

    pub fn orb(&self, kind: AspectKind) -> f64 {
        self.orbs.get(&kind).copied().unwrap_or_else(|| kind.default_orb())
    }

    /// Every pattern in `bodies`, in table order, deduplicated.
    ///
    /// `cusps` (twelve house cusps) only affects the Splash shape, which
    /// counts occupied houses when they are known and occupied signs otherwise.
    pub fn detect(&self, bodies: &[BodyPosition], cusps: Option<&[f64]>) -> Vec<Pattern> {
        let mut found: Vec<Pattern> = Vec::new();

        for definition in PATTERN_TABLE {
            let before = found.len();
            self.search(definition, bodies, &mut found);
            if found.len() > before {
                debug!("{}: {} instance(s)", definition.kind, found.len() - before);
            }
        }

        if self.settings.include_shapes {
            if let Some(shape) = classify_distribution(bodies, cusps, &self.settings.shapes) {
                found.push(shape);
            }
        }
        found
    }

    fn search(&self, definition: &PatternDefinition, bodies: &[BodyPosition], found: &mut Vec<Pattern>) {
        match definition.rule {
            Rule::Cluster { min, max } => {
                let orb = self.orb(AspectKind::Conjunction);
                for size in (min..=max).rev() {
                    for_each_combination(bodies.len(), size, |combo| {
                        let members: Vec<&BodyPosition> = combo.iter().map(|&i| &bodies[i]).collect();
                        let mutual = members.iter().enumerate().all(|(i, a)| {
                            members[i + 1..]
                                .iter()
                                .all(|b| separation(a.longitude, b.longitude) <= orb)
                        });
                        if mutual {
                            let ids = members.iter().map(|p| p.body).collect();
                            push_unique(found, Pattern::new(definition.kind, ids));
                        }
                    });
                }
            }
            Rule::Aspects { slots, edges } => {
                for_each_combination(bodies.len(), slots, |combo| {
                    let members: Vec<&BodyPosition> = combo.iter().map(|&i| &bodies[i]).collect();
                    if let Some(roles) = self.assign_roles(&members, edges) {
                        let ids = roles.iter().map(|&i| members[i].body).collect();
                        push_unique(found, Pattern::new(definition.kind, ids));
                    }
                });
            }
        }
    }

    /// First assignment of members to role slots satisfying every edge,
    /// filling slots in order and backtracking on failure.
    fn assign_roles(&self, members: &[&BodyPosition], edges: &[Edge]) -> Option<Vec<usize>> {
        let mut roles = Vec::with_capacity(members.len());
        let mut used = vec![false; members.len()];
        if self.fill_slot(members, edges, &mut roles, &mut used) {
            Some(roles)
        } else {
            None
        }
    }

    fn fill_slot(
        &self,
        members: &[&BodyPosition],
        edges: &[Edge],
        roles: &mut Vec<usize>,
        used: &mut [bool],
    ) -> bool {
        let slot = roles.len();
        if slot == members.len() {
            return true;
        }
        for candidate in 0..members.len() {
            if used[candidate] {
                continue;
            }
            roles.push(candidate);
            if self.edges_hold(members, edges, roles, slot) {
                used[candidate] = true;
                if self.fill_slot(members, edges, roles, used) {
                    return true;
                }
                used[candidate] = false;
            }
            roles.pop();
        }
        false
    }

    /// Check the edges whose later slot is `slot`, now that it is filled.
    fn edges_hold(&self, members: &[&BodyPosition], edges: &[Edge], roles: &[usize], slot: usize) -> bool {
        edges
            .iter()
            .filter(|Edge(a, b, _)| (*a).max(*b) == slot)
            .all(|&Edge(a, b, kinds)| {
                let lon_a = members[roles[a]].longitude;
                let lon_b = members[roles[b]].longitude;
                kinds
                    .iter()
                    .any(|&kind| within_orb(lon_a, lon_b, kind.angle(), self.orb(kind)))
            })
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(&PatternSettings::default(), &AspectSettings::default())
    }
}

/// Instances of the same pattern sharing all but at most one body are
/// duplicates; the first one found is kept.
pub fn is_duplicate(a: &Pattern, b: &Pattern) -> bool {
    if a.name != b.name {
        return false;
    }
    let shared = a.bodies.iter().filter(|body| b.bodies.contains(body)).count();
    shared + 1 >= a.bodies.len().min(b.bodies.len())
}

fn push_unique(found: &mut Vec<Pattern>, pattern: Pattern) {
    if !found.iter().any(|existing| is_duplicate(existing, &pattern)) {
        found.push(pattern);
    }
}

/// Visit every k-subset of `0..n` in lexicographic order.
fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        visit(&combo);
        let mut i = k;
        while i > 0 && combo[i - 1] == n - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        combo[i - 1] += 1;
        for j in i..k {
            combo[j] = combo[j - 1] + 1;
        }
    }
}

/// Convenience for callers holding a body map.
pub fn detect_patterns(
    positions: &BTreeMap<CelestialBody, BodyPosition>,
    cusps: Option<&[f64]>,
    detector: &PatternDetector,
) -> Vec<Pattern> {
    let bodies: Vec<BodyPosition> = positions.values().cloned().collect();
    detector.detect(&bodies, cusps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::types::PatternKind;

    fn bodies(lons: &[f64]) -> Vec<BodyPosition> {
        lons.iter()
            .zip(CelestialBody::ALL.iter())
            .map(|(&lon, &body)| BodyPosition::at_longitude(body, lon))
            .collect()
    }

    fn kinds(patterns: &[Pattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_combination_counts() {
        let mut count = 0;
        for_each_combination(12, 6, |_| count += 1);
        assert_eq!(count, 924);
        let mut seen = Vec::new();
        for_each_combination(4, 2, |c| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        for_each_combination(2, 3, |_| panic!("no 3-subsets of 2 items"));
    }

    #[test]
    fn test_roles_follow_slot_order() {
        // Apex listed first in the input, but T-Square puts it in slot C
        let found = PatternDetector::default().detect(&bodies(&[90.0, 0.0, 180.0]), None);
        assert_eq!(kinds(&found), vec![PatternKind::TSquare]);
        assert_eq!(
            found[0].bodies,
            vec![CelestialBody::Moon, CelestialBody::Mercury, CelestialBody::Sun]
        );
    }

    #[test]
    fn test_stellium_prefers_largest_cluster() {
        let found = PatternDetector::default().detect(&bodies(&[10.0, 12.0, 14.0, 16.0, 200.0]), None);
        let stelliums: Vec<&Pattern> = found
            .iter()
            .filter(|p| p.name == PatternKind::Stellium)
            .collect();
        assert_eq!(stelliums.len(), 1);
        assert_eq!(stelliums[0].arity(), 4);
    }

    #[test]
    fn test_duplicate_rule() {
        let a = Pattern::new(
            PatternKind::Stellium,
            vec![CelestialBody::Sun, CelestialBody::Moon, CelestialBody::Mars],
        );
        let b = Pattern::new(
            PatternKind::Stellium,
            vec![CelestialBody::Sun, CelestialBody::Moon, CelestialBody::Venus],
        );
        let c = Pattern::new(
            PatternKind::Stellium,
            vec![CelestialBody::Sun, CelestialBody::Venus, CelestialBody::Pluto],
        );
        let d = Pattern::new(PatternKind::GrandTrine, b.bodies.clone());
        assert!(is_duplicate(&a, &b));
        assert!(!is_duplicate(&a, &c));
        assert!(!is_duplicate(&b, &d));
    }

    #[test]
    fn test_pattern_orb_overrides_aspect_orb() {
        let mut settings = PatternSettings::default();
        settings.orbs.insert(AspectKind::Trine, 1.0);
        let detector = PatternDetector::new(&settings, &AspectSettings::default());
        let found = detector.detect(&bodies(&[0.0, 123.0, 240.0]), None);
        assert!(!kinds(&found).contains(&PatternKind::GrandTrine));
        let found = PatternDetector::default().detect(&bodies(&[0.0, 123.0, 240.0]), None);
        assert!(kinds(&found).contains(&PatternKind::GrandTrine));
    }

    #[test]
    fn test_body_map_matches_slice() {
        // Map order is catalog order, whatever order the bodies were inserted in
        let list = bodies(&[0.0, 120.0, 240.0, 180.0]);
        let map: BTreeMap<CelestialBody, BodyPosition> =
            list.iter().rev().map(|p| (p.body, p.clone())).collect();
        let detector = PatternDetector::default();
        assert_eq!(detect_patterns(&map, None, &detector), detector.detect(&list, None));
    }
}
