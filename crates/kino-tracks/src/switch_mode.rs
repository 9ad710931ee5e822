//! Track switch mode policy
//!
//! Decides how downstream buffer management treats media that was already
//! buffered for a track when a different track becomes current.

use crate::{types::MediaType, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Buffered-content handling on track change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchMode {
    /// Buffered media of the previous track is replaced right away
    #[default]
    AlwaysReplace,
    /// Buffered media is kept; only new segments use the new track
    NeverReplace,
}

impl SwitchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchMode::AlwaysReplace => "alwaysReplace",
            SwitchMode::NeverReplace => "neverReplace",
        }
    }

    /// Whether buffered media must be flushed on switch
    pub fn flushes_buffer(&self) -> bool {
        matches!(self, SwitchMode::AlwaysReplace)
    }
}

impl FromStr for SwitchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alwaysReplace" => Ok(SwitchMode::AlwaysReplace),
            "neverReplace" => Ok(SwitchMode::NeverReplace),
            other => Err(Error::UnsupportedSwitchMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for SwitchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type switch modes.
///
/// A type that was never configured reports no mode; notifications fall
/// back to [`SwitchMode::default`].
#[derive(Debug, Clone, Default)]
pub struct SwitchModePolicy {
    modes: HashMap<MediaType, SwitchMode>,
}

impl SwitchModePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy seeded from configured modes
    pub fn with_modes(modes: &HashMap<MediaType, SwitchMode>) -> Self {
        Self {
            modes: modes.clone(),
        }
    }

    /// Configure the mode for a type
    pub fn set(&mut self, media_type: MediaType, mode: SwitchMode) {
        debug!(media_type = %media_type, mode = %mode, "Switch mode set");
        self.modes.insert(media_type, mode);
    }

    /// Configure the mode for a type from its string form.
    ///
    /// Unsupported values are ignored and the previous mode kept.
    pub fn set_str(&mut self, media_type: MediaType, mode: &str) -> bool {
        match mode.parse() {
            Ok(mode) => {
                self.set(media_type, mode);
                true
            }
            Err(e) => {
                warn!(media_type = %media_type, error = %e, "Ignoring switch mode");
                false
            }
        }
    }

    /// Configured mode for a type
    pub fn get(&self, media_type: MediaType) -> Option<SwitchMode> {
        self.modes.get(&media_type).copied()
    }

    /// Mode applied to change notifications
    pub fn effective(&self, media_type: MediaType) -> SwitchMode {
        self.get(media_type).unwrap_or_default()
    }
}
