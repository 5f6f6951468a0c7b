//! Declarative pattern table.
//!
//! Each aspect pattern names its role slots (`A` = 0, `B` = 1, ...) and the
//! aspects required between them. Adding a pattern is a table entry; the
//! search in [`super::matcher`] is shared.

use crate::aspects::AspectKind;
use crate::patterns::types::PatternKind;

/// Required relation between two role slots: any one of the listed aspects.
#[derive(Debug, Clone, Copy)]
pub struct Edge(pub usize, pub usize, pub &'static [AspectKind]);

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Every pair within conjunction orb, tried from the largest size down.
    Cluster { min: usize, max: usize },
    /// Fixed number of role slots linked by edges.
    Aspects { slots: usize, edges: &'static [Edge] },
}

#[derive(Debug, Clone, Copy)]
pub struct PatternDefinition {
    pub kind: PatternKind,
    pub rule: Rule,
}

const CJ: &[AspectKind] = &[AspectKind::Conjunction];
const SX: &[AspectKind] = &[AspectKind::Sextile];
const SQ: &[AspectKind] = &[AspectKind::Square];
const TR: &[AspectKind] = &[AspectKind::Trine];
const OP: &[AspectKind] = &[AspectKind::Opposition];
const QX: &[AspectKind] = &[AspectKind::Quincunx];
const SESQ: &[AspectKind] = &[AspectKind::Sesquiquadrate];
const QN: &[AspectKind] = &[AspectKind::Quintile];
const SSX: &[AspectKind] = &[AspectKind::SemiSextile];
const SSQ: &[AspectKind] = &[AspectKind::Octile];
const BQ: &[AspectKind] = &[AspectKind::Biquintile];

const fn aspects(kind: PatternKind, slots: usize, edges: &'static [Edge]) -> PatternDefinition {
    PatternDefinition {
        kind,
        rule: Rule::Aspects { slots, edges },
    }
}

/// Search order; earlier entries win ties in deduplication and output order.
pub static PATTERN_TABLE: &[PatternDefinition] = &[
    PatternDefinition {
        kind: PatternKind::Stellium,
        rule: Rule::Cluster { min: 3, max: 6 },
    },
    aspects(
        PatternKind::GrandTrine,
        3,
        &[Edge(0, 1, TR), Edge(1, 2, TR), Edge(0, 2, TR)],
    ),
    aspects(
        PatternKind::TSquare,
        3,
        &[Edge(0, 1, OP), Edge(0, 2, SQ), Edge(1, 2, SQ)],
    ),
    aspects(
        PatternKind::Yod,
        3,
        &[Edge(0, 1, SX), Edge(0, 2, QX), Edge(1, 2, QX)],
    ),
    aspects(
        PatternKind::GrandCross,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, OP),
            Edge(0, 2, SQ),
            Edge(0, 3, SQ),
            Edge(1, 2, SQ),
            Edge(1, 3, SQ),
        ],
    ),
    aspects(
        PatternKind::Kite,
        4,
        &[
            Edge(0, 1, TR),
            Edge(1, 2, TR),
            Edge(0, 2, TR),
            Edge(3, 0, OP),
            Edge(3, 1, SX),
            Edge(3, 2, SX),
        ],
    ),
    aspects(
        PatternKind::MysticRectangle,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, OP),
            Edge(0, 2, SX),
            Edge(1, 3, SX),
            Edge(0, 3, TR),
            Edge(1, 2, TR),
        ],
    ),
    aspects(
        PatternKind::Arrow,
        4,
        &[
            Edge(0, 1, SX),
            Edge(0, 2, QX),
            Edge(1, 2, QX),
            Edge(0, 3, OP),
            Edge(1, 3, TR),
            Edge(2, 3, SSX),
        ],
    ),
    aspects(
        PatternKind::Arrowhead,
        3,
        &[Edge(0, 1, OP), Edge(0, 2, SSX), Edge(1, 2, QX)],
    ),
    aspects(
        PatternKind::Basket,
        5,
        &[
            Edge(0, 1, SX),
            Edge(1, 2, SX),
            Edge(2, 3, SX),
            Edge(0, 2, TR),
            Edge(1, 3, TR),
            Edge(0, 3, OP),
            Edge(0, 4, SQ),
            Edge(3, 4, SQ),
            Edge(1, 4, QX),
            Edge(2, 4, QX),
        ],
    ),
    aspects(
        PatternKind::BoomerangYod,
        4,
        &[
            Edge(0, 1, SX),
            Edge(0, 2, QX),
            Edge(1, 2, QX),
            Edge(3, 2, OP),
            Edge(3, 0, SSX),
            Edge(3, 1, SSX),
        ],
    ),
    aspects(
        PatternKind::Butterfly,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, TR),
            Edge(0, 2, SSX),
            Edge(0, 3, QX),
            Edge(1, 2, QX),
            Edge(1, 3, SSX),
        ],
    ),
    aspects(
        PatternKind::Castle,
        5,
        &[
            Edge(0, 1, OP),
            Edge(0, 2, SQ),
            Edge(1, 2, SQ),
            Edge(2, 3, TR),
            Edge(3, 4, TR),
            Edge(2, 4, TR),
        ],
    ),
    aspects(
        PatternKind::Cradle,
        4,
        &[
            Edge(0, 2, SX),
            Edge(2, 3, SX),
            Edge(3, 1, SX),
            Edge(0, 3, TR),
            Edge(2, 1, TR),
            Edge(0, 1, OP),
        ],
    ),
    aspects(
        PatternKind::Crossbow,
        4,
        &[
            Edge(0, 1, OP),
            Edge(0, 2, SQ),
            Edge(1, 2, SQ),
            Edge(0, 3, SSQ),
            Edge(2, 3, SSQ),
            Edge(1, 3, SESQ),
        ],
    ),
    aspects(
        PatternKind::Diamond,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, SQ),
            Edge(0, 2, SSQ),
            Edge(0, 3, SSQ),
            Edge(1, 2, SESQ),
            Edge(1, 3, SESQ),
        ],
    ),
    aspects(
        PatternKind::DoubleTSquare,
        5,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, OP),
            Edge(0, 2, CJ),
            Edge(1, 3, CJ),
            Edge(4, 0, SQ),
            Edge(4, 1, SQ),
            Edge(4, 2, SQ),
            Edge(4, 3, SQ),
        ],
    ),
    aspects(
        PatternKind::GrandQuintile,
        5,
        &[
            Edge(0, 1, QN),
            Edge(1, 2, QN),
            Edge(2, 3, QN),
            Edge(3, 4, QN),
            Edge(4, 0, QN),
            Edge(0, 2, BQ),
            Edge(0, 3, BQ),
            Edge(1, 3, BQ),
            Edge(1, 4, BQ),
            Edge(2, 4, BQ),
        ],
    ),
    aspects(
        PatternKind::GrandSextile,
        6,
        &[
            Edge(0, 1, SX),
            Edge(1, 2, SX),
            Edge(2, 3, SX),
            Edge(3, 4, SX),
            Edge(4, 5, SX),
            Edge(5, 0, SX),
            Edge(0, 3, OP),
            Edge(1, 4, OP),
            Edge(2, 5, OP),
        ],
    ),
    aspects(
        PatternKind::HammerOfThor,
        3,
        &[Edge(0, 1, SQ), Edge(0, 2, SESQ), Edge(1, 2, SESQ)],
    ),
    aspects(
        PatternKind::Hexagon,
        6,
        &[
            Edge(0, 1, SX),
            Edge(1, 2, SX),
            Edge(2, 3, SX),
            Edge(3, 4, SX),
            Edge(4, 5, SX),
            Edge(5, 0, SX),
        ],
    ),
    aspects(
        PatternKind::Hourglass,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, OP),
            Edge(0, 2, SSQ),
            Edge(1, 3, SSQ),
            Edge(0, 3, SESQ),
            Edge(1, 2, SESQ),
        ],
    ),
    aspects(
        PatternKind::Pentagram,
        5,
        &[
            Edge(0, 2, BQ),
            Edge(2, 4, BQ),
            Edge(4, 1, BQ),
            Edge(1, 3, BQ),
            Edge(3, 0, BQ),
        ],
    ),
    aspects(
        PatternKind::Rectangle,
        4,
        &[
            Edge(0, 1, OP),
            Edge(2, 3, OP),
            Edge(0, 2, SSX),
            Edge(1, 3, SSX),
            Edge(0, 3, QX),
            Edge(1, 2, QX),
        ],
    ),
    aspects(
        PatternKind::Rosetta,
        6,
        &[
            Edge(0, 1, OP),
            Edge(0, 2, SQ),
            Edge(1, 2, SQ),
            Edge(3, 4, OP),
            Edge(3, 5, SQ),
            Edge(4, 5, SQ),
            Edge(0, 3, TR),
            Edge(1, 4, TR),
            Edge(2, 5, TR),
        ],
    ),
    aspects(
        PatternKind::Shield,
        4,
        &[
            Edge(0, 1, SX),
            Edge(1, 2, SQ),
            Edge(2, 3, SQ),
            Edge(0, 3, TR),
            Edge(0, 2, QX),
            Edge(1, 3, OP),
        ],
    ),
    aspects(
        PatternKind::Star,
        5,
        &[
            Edge(0, 1, TR),
            Edge(1, 2, TR),
            Edge(0, 2, TR),
            Edge(3, 0, OP),
            Edge(3, 1, SX),
            Edge(3, 2, SX),
            Edge(4, 1, OP),
            Edge(4, 0, SX),
            Edge(4, 2, SX),
            Edge(3, 4, TR),
        ],
    ),
    aspects(
        PatternKind::StarOfDavid,
        6,
        &[
            Edge(0, 1, TR),
            Edge(1, 2, TR),
            Edge(0, 2, TR),
            Edge(3, 4, TR),
            Edge(4, 5, TR),
            Edge(3, 5, TR),
            Edge(0, 4, OP),
            Edge(1, 5, OP),
            Edge(2, 3, OP),
        ],
    ),
    aspects(
        PatternKind::Trapezoid,
        4,
        &[
            Edge(0, 1, SSX),
            Edge(1, 2, SX),
            Edge(2, 3, SSX),
            Edge(0, 2, SQ),
            Edge(1, 3, SQ),
            Edge(0, 3, TR),
        ],
    ),
    aspects(
        PatternKind::Wedge,
        3,
        &[Edge(0, 1, OP), Edge(0, 2, TR), Edge(1, 2, SX)],
    ),
];
