//! Coordinate Reference System descriptors.
//!
//! A resolved CRS always carries both an identifier code and a
//! proj-string; downstream warping only requires the proj-string, so an
//! unknown code is a degraded-but-valid state rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proj-string of the default geographic (lat/lon) CRS.
pub const DEFAULT_GEO_PROJ: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// EPSG code of the default geographic CRS.
pub const DEFAULT_GEO_EPSG: u32 = 4326;

/// CRS identifier code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// A standard EPSG code, e.g. 4326.
    Epsg(u32),
    /// A non-EPSG identifier copied verbatim from metadata or configuration.
    Named(String),
    /// No code could be determined; the proj-string is still authoritative.
    Unknown,
}

impl CrsCode {
    /// Parse an identifier like `"EPSG:4326"`, `"epsg:3857"` or a bare
    /// number. Anything else is kept as a named identifier.
    pub fn parse(s: &str) -> CrsCode {
        let trimmed = s.trim();
        if let Some(num) = trimmed
            .strip_prefix("EPSG:")
            .or_else(|| trimmed.strip_prefix("epsg:"))
            .or_else(|| trimmed.strip_prefix("Epsg:"))
        {
            if let Ok(code) = num.parse::<u32>() {
                return CrsCode::Epsg(code);
            }
        }
        if let Ok(code) = trimmed.parse::<u32>() {
            return CrsCode::Epsg(code);
        }
        if trimmed.is_empty() {
            return CrsCode::Unknown;
        }
        CrsCode::Named(trimmed.to_string())
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsCode::Epsg(code) => write!(f, "EPSG:{}", code),
            CrsCode::Named(name) => write!(f, "{}", name),
            CrsCode::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A resolved CRS: identifier code plus proj-string representation.
///
/// Invariant: after successful resolution both fields are populated and
/// self-consistent. An empty proj-string is legal only before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsDescriptor {
    pub code: CrsCode,
    pub proj_string: String,
}

impl CrsDescriptor {
    /// The default geographic lat/lon CRS.
    pub fn geographic() -> Self {
        Self {
            code: CrsCode::Epsg(DEFAULT_GEO_EPSG),
            proj_string: DEFAULT_GEO_PROJ.to_string(),
        }
    }

    /// Whether resolution has produced a usable proj-string.
    pub fn is_resolved(&self) -> bool {
        !self.proj_string.is_empty()
    }
}

impl Default for CrsDescriptor {
    fn default() -> Self {
        Self {
            code: CrsCode::Unknown,
            proj_string: String::new(),
        }
    }
}

/// Known (EPSG code, proj-string) pairs used for reverse lookup when a
/// dataset carries a derivable proj-string but no explicit code.
pub const KNOWN_PROJECTIONS: &[(u32, &str)] = &[
    (4326, DEFAULT_GEO_PROJ),
    (
        3857,
        "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +no_defs",
    ),
    (
        28992,
        "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +units=m +no_defs",
    ),
    (
        32661,
        "+proj=stere +lat_0=90 +lat_ts=90 +lon_0=0 +k=0.994 +x_0=2000000 +y_0=2000000 +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
    ),
    (
        3411,
        "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +a=6378273 +b=6356889.449 +units=m +no_defs",
    ),
    (
        3412,
        "+proj=stere +lat_0=-90 +lat_ts=-70 +lon_0=0 +k=1 +x_0=0 +y_0=0 +a=6378273 +b=6356889.449 +units=m +no_defs",
    ),
];

/// Reverse-lookup an EPSG code for a proj-string.
///
/// Comparison is on the set of `+key=value` tokens so parameter order does
/// not matter.
pub fn epsg_for_proj_string(proj_string: &str) -> Option<u32> {
    let tokens = proj_token_set(proj_string);
    KNOWN_PROJECTIONS
        .iter()
        .find(|(_, known)| proj_token_set(known) == tokens)
        .map(|(code, _)| *code)
}

fn proj_token_set(proj_string: &str) -> std::collections::BTreeSet<String> {
    proj_string
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}
