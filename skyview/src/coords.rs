//! Equatorial coordinates and the two text grammars users type them in.
//!
//! Decimal pairs (`"210.8 54.3"`, `"210.8,54.3"`, `"RA: 210.8 Dec: 54.3"`) and
//! sexagesimal pairs (`"14:03:12.5 +54:20:56"`) are accepted. Anything out of
//! range yields `None` so the caller can fall through to name resolution.

use std::fmt;
use std::sync::LazyLock;

use common::float_ext::FloatExt;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DECIMAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:ra\s*:?\s*)?([+-]?\d+(?:\.\d+)?)(?:\s*,\s*|\s+)(?:dec\s*:?\s*)?([+-]?\d+(?:\.\d+)?)\s*$",
    )
    .expect("decimal coordinate pattern")
});

static SEXAGESIMAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\d{1,2}):(\d{1,2}):(\d{1,2}(?:\.\d+)?)(?:\s*,\s*|\s+)([+-]?)(\d{1,2}):(\d{1,2}):(\d{1,2}(?:\.\d+)?)\s*$",
    )
    .expect("sexagesimal coordinate pattern")
});

/// A sky position in degrees: `ra` in [0, 360], `dec` in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

impl Equatorial {
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Both axes differ by strictly less than `tolerance` degrees.
    ///
    /// This is a per-axis box test, not an angular distance, and it does not
    /// wrap RA around 0/360.
    pub fn offset_within(&self, other: &Equatorial, tolerance: f64) -> bool {
        self.ra.within(other.ra, tolerance) && self.dec.within(other.dec, tolerance)
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=360.0).contains(&self.ra) && (-90.0..=90.0).contains(&self.dec)
    }

    /// `"RA 210.8000°, Dec 54.3000°"`, the form status lines use.
    pub fn format_decimal(&self) -> String {
        format!("RA {:.4}°, Dec {:.4}°", self.ra, self.dec)
    }
}

impl fmt::Display for Equatorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°, {}°", self.ra, self.dec)
    }
}

/// Parses free text as coordinates, trying the decimal grammar first.
pub fn parse_coordinates(input: &str) -> Option<Equatorial> {
    parse_decimal(input).or_else(|| parse_sexagesimal(input))
}

fn parse_decimal(input: &str) -> Option<Equatorial> {
    let caps = DECIMAL_PAIR.captures(input)?;
    let ra: f64 = caps[1].parse().ok()?;
    let dec: f64 = caps[2].parse().ok()?;

    let coords = Equatorial::new(ra, dec);
    coords.is_valid().then_some(coords)
}

fn parse_sexagesimal(input: &str) -> Option<Equatorial> {
    let caps = SEXAGESIMAL_PAIR.captures(input)?;

    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    if hours > 23 || minutes >= 60 || seconds >= 60.0 {
        return None;
    }

    let negative = &caps[4] == "-";
    let degrees: u32 = caps[5].parse().ok()?;
    let arcmin: u32 = caps[6].parse().ok()?;
    let arcsec: f64 = caps[7].parse().ok()?;
    if degrees > 90 || arcmin >= 60 || arcsec >= 60.0 {
        return None;
    }

    let ra = (hours as f64 + minutes as f64 / 60.0 + seconds / 3600.0) * 15.0;
    let magnitude = degrees as f64 + arcmin as f64 / 60.0 + arcsec / 3600.0;
    let dec = if negative { -magnitude } else { magnitude };

    let coords = Equatorial::new(ra, dec);
    coords.is_valid().then_some(coords)
}

/// Formats as `HH:MM:SS.ss ±DD:MM:SS.s`, the grammar [`parse_coordinates`] accepts.
///
/// Rounding carries into the next field, and RA wraps at 24h.
pub fn format_sexagesimal(coords: &Equatorial) -> String {
    const RA_UNITS_PER_DAY: i64 = 24 * 3600 * 100;

    let ra_units = ((coords.ra / 15.0) * 3600.0 * 100.0).round() as i64;
    let ra_units = ra_units.rem_euclid(RA_UNITS_PER_DAY);
    let hours = ra_units / (3600 * 100);
    let minutes = (ra_units / (60 * 100)) % 60;
    let centiseconds = ra_units % (60 * 100);

    let sign = if coords.dec < 0.0 { '-' } else { '+' };
    let dec_units = (coords.dec.abs() * 3600.0 * 10.0).round() as i64;
    let degrees = dec_units / (3600 * 10);
    let arcmin = (dec_units / (60 * 10)) % 60;
    let deciarcsec = dec_units % (60 * 10);

    format!(
        "{:02}:{:02}:{:02}.{:02} {}{:02}:{:02}:{:02}.{}",
        hours,
        minutes,
        centiseconds / 100,
        centiseconds % 100,
        sign,
        degrees,
        arcmin,
        deciarcsec / 10,
        deciarcsec % 10,
    )
}
