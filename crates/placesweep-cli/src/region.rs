//! Parsing of `--region` and `--point` arguments.
//!
//! A region is either inline (`lat,lng;lat,lng;...`) or a path to a JSON
//! file holding `[[lat, lng], ...]`.

use std::path::Path;

use anyhow::Context;
use placesweep_core::{LatLng, Region};

/// Resolve a `--region` argument: an existing file is read as JSON,
/// anything else is parsed inline.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the text is malformed, or
/// the vertices do not form a valid region.
pub(crate) fn load_region(arg: &str) -> anyhow::Result<Region> {
    let path = Path::new(arg);
    if path.is_file() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read region file {}", path.display()))?;
        return parse_region_json(&raw)
            .with_context(|| format!("invalid region file {}", path.display()));
    }
    parse_region_inline(arg)
}

/// Parse `lat,lng;lat,lng;...`. Empty segments (e.g. a trailing `;`) are
/// ignored.
pub(crate) fn parse_region_inline(raw: &str) -> anyhow::Result<Region> {
    let vertices = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_point)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Region::new(vertices)?)
}

pub(crate) fn parse_region_json(raw: &str) -> anyhow::Result<Region> {
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(raw).context("expected a JSON array of [lat, lng] pairs")?;
    let vertices = pairs
        .into_iter()
        .map(|[lat, lng]| LatLng::new(lat, lng))
        .collect();
    Ok(Region::new(vertices)?)
}

/// Parse a single `lat,lng` pair.
pub(crate) fn parse_point(raw: &str) -> anyhow::Result<LatLng> {
    let (lat, lng) = raw
        .split_once(',')
        .with_context(|| format!("expected `lat,lng`, got \"{raw}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in \"{raw}\""))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in \"{raw}\""))?;
    Ok(LatLng::new(lat, lng))
}
