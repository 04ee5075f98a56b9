//! Configuration and rounds bundled into the binary.

use mapguess_shared::{MapConfig, Point};
use serde::Deserialize;
use tracing::warn;

const MAP_CONFIG_JSON: &str = include_str!("../assets/map_config.json");
const ROUNDS_JSON: &str = include_str!("../assets/rounds.json");

/// One round: a photo to place and where it was taken on the map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSpec {
    pub title: String,
    pub photo_url: String,
    pub map_url: String,
    pub answer: Point,
    /// Seconds before the guess is placed at the pointer automatically.
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
}

/// Engine configuration, falling back to the defaults when the bundled file
/// does not validate.
pub fn map_config() -> MapConfig {
    MapConfig::from_json(MAP_CONFIG_JSON).unwrap_or_else(|e| {
        warn!(error = %e, "bundled map config rejected, using defaults");
        MapConfig::default()
    })
}

pub fn builtin_rounds() -> Vec<RoundSpec> {
    parse_rounds(ROUNDS_JSON).unwrap_or_else(|e| {
        warn!(error = %e, "bundled rounds could not be parsed");
        Vec::new()
    })
}

/// Parse a rounds list, dropping rounds that have no map to show.
pub fn parse_rounds(json: &str) -> serde_json::Result<Vec<RoundSpec>> {
    let rounds: Vec<RoundSpec> = serde_json::from_str(json)?;
    Ok(rounds
        .into_iter()
        .filter(|r| {
            let ok = !r.map_url.trim().is_empty();
            if !ok {
                warn!(title = %r.title, "skipping round without a map");
            }
            ok
        })
        .collect())
}
