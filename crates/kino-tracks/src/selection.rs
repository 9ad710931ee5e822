//! Initial track selection strategies
//!
//! When initial settings do not single out one track, the configured
//! [`SelectionMode`] narrows the candidates:
//! - Highest bitrate: largest top representation bandwidth, ties by range
//! - Widest range: most representations, ties by bitrate
//! - Highest efficiency: fewest bits per pixel (or per second for audio),
//!   ties by bitrate
//! - First track: registration order
//!
//! Remaining ties go to the first registered candidate.

use crate::{types::MediaInfo, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Narrowing step applied to candidate tracks
pub trait SelectionStrategy: Send + Sync {
    /// Keep the candidates this strategy prefers, in their original order
    fn narrow<'a>(&self, tracks: Vec<&'a MediaInfo>) -> Vec<&'a MediaInfo>;

    /// Get strategy name
    fn name(&self) -> &'static str;
}

/// Fallback strategy for initial track selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    #[default]
    HighestBitrate,
    HighestEfficiency,
    WidestRange,
    FirstTrack,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::HighestBitrate => "highestBitrate",
            SelectionMode::HighestEfficiency => "highestEfficiency",
            SelectionMode::WidestRange => "widestRange",
            SelectionMode::FirstTrack => "firstTrack",
        }
    }

    /// Strategies applied in order, primary first
    fn strategies(&self) -> Vec<Box<dyn SelectionStrategy>> {
        match self {
            SelectionMode::HighestBitrate => {
                vec![Box::new(HighestBitrate), Box::new(WidestRange)]
            }
            SelectionMode::HighestEfficiency => {
                vec![Box::new(HighestEfficiency), Box::new(HighestBitrate)]
            }
            SelectionMode::WidestRange => {
                vec![Box::new(WidestRange), Box::new(HighestBitrate)]
            }
            SelectionMode::FirstTrack => Vec::new(),
        }
    }

    /// Pick one track out of `tracks`
    #[instrument(skip(tracks), fields(candidates = tracks.len()))]
    pub fn select<'a>(&self, tracks: &'a [MediaInfo]) -> Option<&'a MediaInfo> {
        let mut candidates: Vec<&MediaInfo> = tracks.iter().collect();

        for strategy in self.strategies() {
            if candidates.len() <= 1 {
                break;
            }
            candidates = strategy.narrow(candidates);
            debug!(
                strategy = strategy.name(),
                remaining = candidates.len(),
                "Candidates narrowed"
            );
        }

        candidates.first().copied()
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highestBitrate" => Ok(SelectionMode::HighestBitrate),
            "highestEfficiency" => Ok(SelectionMode::HighestEfficiency),
            "widestRange" => Ok(SelectionMode::WidestRange),
            "firstTrack" => Ok(SelectionMode::FirstTrack),
            other => Err(Error::UnsupportedSelectionMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep every track whose score equals the best score
fn keep_best<'a, F>(tracks: Vec<&'a MediaInfo>, score: F) -> Vec<&'a MediaInfo>
where
    F: Fn(&MediaInfo) -> f64,
{
    let scored: Vec<(f64, &MediaInfo)> = tracks.into_iter().map(|t| (score(t), t)).collect();
    let best = scored
        .iter()
        .map(|(s, _)| *s)
        .fold(f64::NEG_INFINITY, f64::max);

    scored
        .into_iter()
        .filter(|(s, _)| *s == best)
        .map(|(_, t)| t)
        .collect()
}

/// Prefers the track whose best representation has the highest bandwidth
pub struct HighestBitrate;

impl SelectionStrategy for HighestBitrate {
    fn narrow<'a>(&self, tracks: Vec<&'a MediaInfo>) -> Vec<&'a MediaInfo> {
        keep_best(tracks, |t| t.max_bandwidth() as f64)
    }

    fn name(&self) -> &'static str {
        "highest_bitrate"
    }
}

/// Prefers the track offering the most representations
pub struct WidestRange;

impl SelectionStrategy for WidestRange {
    fn narrow<'a>(&self, tracks: Vec<&'a MediaInfo>) -> Vec<&'a MediaInfo> {
        keep_best(tracks, |t| t.representations.len() as f64)
    }

    fn name(&self) -> &'static str {
        "widest_range"
    }
}

/// Prefers the track with the cheapest representation per pixel.
///
/// Representations without dimensions are compared on bandwidth alone.
/// Tracks without representations rank last.
pub struct HighestEfficiency;

impl HighestEfficiency {
    fn cost(track: &MediaInfo) -> f64 {
        track
            .representations
            .iter()
            .map(|r| match r.pixels() {
                Some(pixels) => r.bandwidth as f64 / pixels as f64,
                None => r.bandwidth as f64,
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl SelectionStrategy for HighestEfficiency {
    fn narrow<'a>(&self, tracks: Vec<&'a MediaInfo>) -> Vec<&'a MediaInfo> {
        keep_best(tracks, |t| -Self::cost(t))
    }

    fn name(&self) -> &'static str {
        "highest_efficiency"
    }
}
