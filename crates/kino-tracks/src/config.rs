//! Media controller configuration

use crate::{
    selection::SelectionMode,
    settings::MediaSettings,
    switch_mode::SwitchMode,
    types::MediaType,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Media controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaControllerConfig {
    /// Fallback strategy when initial settings do not single out a track
    pub selection_mode_for_initial_track: SelectionMode,
    /// Switch modes configured up front; other types report none
    pub switch_modes: HashMap<MediaType, SwitchMode>,
    /// Initial settings applied on construction and reset
    pub initial_settings: HashMap<MediaType, MediaSettings>,
    /// Save the settings of each newly selected track to storage
    pub save_last_media_settings: bool,
    /// Also save text and fragmented-text selections
    pub save_text_settings: bool,
}

impl Default for MediaControllerConfig {
    fn default() -> Self {
        Self {
            selection_mode_for_initial_track: crate::DEFAULT_INIT_TRACK_SELECTION_MODE,
            switch_modes: HashMap::new(),
            initial_settings: HashMap::new(),
            save_last_media_settings: true,
            save_text_settings: true,
        }
    }
}

impl MediaControllerConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Whether selections of this type are written to storage
    pub fn saves_settings_for(&self, media_type: MediaType) -> bool {
        self.save_last_media_settings && (self.save_text_settings || !media_type.is_text())
    }
}
