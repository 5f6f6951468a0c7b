use anyhow::Context;
use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;
use clap::Parser;
use std::path::PathBuf;

use urania::time::{FixedZoneResolver, GeographicZoneResolver, ZoneResolver};
use urania::{
    AnalyticEphemeris, BirthDateTime, ChartEngine, ChartRequest, GeoLocation, HouseSystem,
    PositionProvider, TimeNormalizer,
};
use urania_config::{load_chart_config, resolve_ephemeris_path, EphemerisBackend};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute a birth chart and print it as JSON")]
struct Args {
    #[arg(help = "Birth date, YYYY-MM-DD (Julian calendar before 1582-10-15)")]
    date: String,

    #[arg(help = "Local birth time, HH:MM or HH:MM:SS")]
    time: String,

    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    #[arg(long, help = "Engine options file (default: configs/chart.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "IANA zone to use instead of the geographic lookup, e.g. Europe/Paris")]
    zone: Option<String>,

    #[arg(long, help = "Override the configured house system")]
    house_system: Option<HouseSystem>,

    #[arg(long, help = "Include minor aspects")]
    minor: bool,

    #[arg(long, help = "List the midpoint of every body pair")]
    midpoints: bool,

    #[arg(long, value_name = "N", help = "Print the summary with the N most significant aspects and patterns")]
    summary: Option<usize>,

    #[arg(long, help = "Pretty-print the JSON output")]
    pretty: bool,
}

/// Year, month and day as typed; the calendar check happens in the engine.
fn parse_date(text: &str) -> anyhow::Result<(i32, u32, u32)> {
    let parts: Vec<&str> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        anyhow::bail!("Invalid date '{text}' (expected YYYY-MM-DD)");
    };
    let invalid = || format!("Invalid date '{text}' (expected YYYY-MM-DD)");
    Ok((
        year.parse::<i32>().with_context(invalid)?,
        month.parse::<u32>().with_context(invalid)?,
        day.parse::<u32>().with_context(invalid)?,
    ))
}

fn parse_time(text: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .with_context(|| format!("Invalid time '{text}' (expected HH:MM or HH:MM:SS)"))
}

fn build_provider(backend: EphemerisBackend, path: Option<PathBuf>) -> anyhow::Result<Box<dyn PositionProvider>> {
    match backend {
        EphemerisBackend::Analytic => Ok(Box::new(AnalyticEphemeris::new())),
        #[cfg(feature = "swiss-ephemeris")]
        EphemerisBackend::Swiss => {
            let path = path.context("The swiss backend needs ephemeris.path or SWISS_EPHEMERIS_PATH")?;
            Ok(Box::new(urania::SwissEphemeris::new(path)?))
        }
        #[cfg(not(feature = "swiss-ephemeris"))]
        EphemerisBackend::Swiss => {
            let _ = path;
            anyhow::bail!("The swiss backend requires building with --features swiss-ephemeris")
        }
    }
}

fn build_resolver(zone: Option<&str>) -> anyhow::Result<Box<dyn ZoneResolver>> {
    match zone {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|e| anyhow::anyhow!("Unknown time zone '{name}': {e}"))?;
            Ok(Box::new(FixedZoneResolver(tz)))
        }
        None => Ok(Box::new(GeographicZoneResolver)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_chart_config(args.config.as_deref())?;
    let mut options = config.options;
    if let Some(system) = args.house_system {
        options.house_system = system;
    }
    options.include_minor_aspects |= args.minor;
    options.calculate_midpoints |= args.midpoints;

    let path = resolve_ephemeris_path(&config.ephemeris);
    let provider = build_provider(config.ephemeris.backend, path)?;
    log::info!("Using {} ephemeris backend", provider.name());

    let engine = ChartEngine::new(provider, TimeNormalizer::new(build_resolver(args.zone.as_deref())?));
    let (year, month, day) = parse_date(&args.date)?;
    let time = parse_time(&args.time)?;
    let request = ChartRequest {
        date_time: BirthDateTime::new(year, month, day, time.hour(), time.minute(), time.second()),
        location: GeoLocation {
            lat: args.lat,
            lon: args.lon,
        },
        options,
    };

    let chart = engine.calculate(&request).map_err(|e| {
        if e.is_validation() {
            anyhow::anyhow!("Invalid input: {e}")
        } else {
            anyhow::anyhow!("Chart calculation failed: {e}")
        }
    })?;
    for warning in &chart.warnings {
        log::warn!("{warning}");
    }

    let json = match args.summary {
        Some(n) if args.pretty => serde_json::to_string_pretty(&chart.summary(n))?,
        Some(n) => serde_json::to_string(&chart.summary(n))?,
        None if args.pretty => serde_json::to_string_pretty(&chart)?,
        None => serde_json::to_string(&chart)?,
    };
    println!("{}", json);
    Ok(())
}
