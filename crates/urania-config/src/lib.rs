use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use urania::aspects::AspectKind;
use urania::patterns::{PatternSettings, ShapeThresholds};
use urania::{CelestialBody, ChartOptions, HouseSystem};

/// Environment variable consulted when the config names no ephemeris path.
pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";

/// Which position backend the front-end should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EphemerisBackend {
    #[default]
    Analytic,
    Swiss,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EphemerisSettings {
    pub backend: EphemerisBackend,
    pub path: Option<PathBuf>,
}

/// Everything loaded from `chart.toml`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartConfig {
    pub options: ChartOptions,
    pub ephemeris: EphemerisSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChartToml {
    #[serde(default)]
    house_system: Option<String>,
    #[serde(default)]
    calculate_midpoints: bool,
    #[serde(default)]
    bodies: Option<Vec<String>>,
    #[serde(default)]
    tally_bodies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AspectsToml {
    #[serde(default)]
    include_minor: bool,
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternsToml {
    #[serde(default = "default_include_shapes")]
    include_shapes: bool,
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
    #[serde(default)]
    shapes: ShapeThresholds,
}

impl Default for PatternsToml {
    fn default() -> Self {
        Self {
            include_shapes: default_include_shapes(),
            orbs: BTreeMap::new(),
            shapes: ShapeThresholds::default(),
        }
    }
}

fn default_include_shapes() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootConfigToml {
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    aspects: AspectsToml,
    #[serde(default)]
    patterns: PatternsToml,
    #[serde(default)]
    ephemeris: EphemerisToml,
}

/// Try the usual relative locations of `configs/chart.toml`.
pub fn read_chart_toml_text() -> anyhow::Result<String> {
    let paths = ["configs/chart.toml", "../../configs/chart.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load chart.toml from {:?}", paths);
}

/// Load from an explicit file, or from the default locations when `path` is `None`.
pub fn load_chart_config(path: Option<&Path>) -> anyhow::Result<ChartConfig> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", p.display()))?,
        None => read_chart_toml_text()?,
    };
    parse_chart_config(&text)
}

pub fn parse_chart_config(text: &str) -> anyhow::Result<ChartConfig> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse chart.toml: {e}"))?;
    let RootConfigToml {
        chart,
        aspects,
        patterns,
        ephemeris,
    } = root;

    let defaults = ChartOptions::default();
    let house_system = match chart.house_system {
        Some(name) => name
            .parse::<HouseSystem>()
            .map_err(|e| anyhow::anyhow!("chart.house_system: {e}"))?,
        None => defaults.house_system,
    };
    let bodies = match chart.bodies {
        Some(names) => parse_bodies("chart.bodies", &names)?,
        None => defaults.bodies,
    };
    let tally_bodies = match chart.tally_bodies {
        Some(names) => parse_bodies("chart.tally_bodies", &names)?,
        None => defaults.tally_bodies,
    };
    validate_shapes(&patterns.shapes)?;

    let options = ChartOptions {
        house_system,
        include_minor_aspects: aspects.include_minor,
        calculate_midpoints: chart.calculate_midpoints,
        bodies,
        tally_bodies,
        orbs: parse_orbs("aspects.orbs", &aspects.orbs)?,
        patterns: PatternSettings {
            orbs: parse_orbs("patterns.orbs", &patterns.orbs)?,
            include_shapes: patterns.include_shapes,
            shapes: patterns.shapes,
        },
    };

    let backend = match ephemeris.backend.as_deref().map(str::trim) {
        None | Some("analytic") => EphemerisBackend::Analytic,
        Some("swiss") | Some("swisseph") => EphemerisBackend::Swiss,
        Some(other) => anyhow::bail!(
            "ephemeris.backend: unknown backend '{other}' (expected \"analytic\" or \"swiss\")"
        ),
    };

    Ok(ChartConfig {
        options,
        ephemeris: EphemerisSettings {
            backend,
            path: ephemeris.path,
        },
    })
}

/// Ephemeris data directory: the config value, else `SWISS_EPHEMERIS_PATH`.
pub fn resolve_ephemeris_path(settings: &EphemerisSettings) -> Option<PathBuf> {
    resolve_ephemeris_path_from(settings, std::env::var(EPHEMERIS_PATH_ENV).ok())
}

fn resolve_ephemeris_path_from(settings: &EphemerisSettings, env_value: Option<String>) -> Option<PathBuf> {
    settings
        .path
        .clone()
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
}

fn parse_bodies(field: &str, names: &[String]) -> anyhow::Result<Vec<CelestialBody>> {
    names
        .iter()
        .map(|name| {
            name.parse::<CelestialBody>()
                .map_err(|e| anyhow::anyhow!("{field}: {e}"))
        })
        .collect()
}

fn parse_orbs(field: &str, raw: &BTreeMap<String, f64>) -> anyhow::Result<BTreeMap<AspectKind, f64>> {
    let mut orbs = BTreeMap::new();
    for (name, &orb) in raw {
        let kind = name
            .parse::<AspectKind>()
            .map_err(|e| anyhow::anyhow!("{field}: {e}"))?;
        if !orb.is_finite() || orb < 0.0 {
            anyhow::bail!("{field}.{name}: orb must be a non-negative number of degrees, got {orb}");
        }
        orbs.insert(kind, orb);
    }
    Ok(orbs)
}

fn validate_shapes(shapes: &ShapeThresholds) -> anyhow::Result<()> {
    let arcs = [
        ("bundle_max_span", shapes.bundle_max_span),
        ("bowl_max_span", shapes.bowl_max_span),
        ("bucket_handle_gap", shapes.bucket_handle_gap),
        ("locomotive_min_gap", shapes.locomotive_min_gap),
        ("seesaw_min_gap", shapes.seesaw_min_gap),
    ];
    for (name, value) in arcs {
        if !(0.0..=360.0).contains(&value) {
            anyhow::bail!("patterns.shapes.{name}: must be between 0 and 360 degrees, got {value}");
        }
    }
    if shapes.splash_min_occupied > 12 {
        anyhow::bail!(
            "patterns.shapes.splash_min_occupied: at most 12 houses can be occupied, got {}",
            shapes.splash_min_occupied
        );
    }
    Ok(())
}
