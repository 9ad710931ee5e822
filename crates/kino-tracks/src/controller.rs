//! Media Controller - track selection for a streaming session
//!
//! Coordinates:
//! - Track registration per stream and media type
//! - Initial track resolution from settings and selection mode
//! - Track switches and change notification
//! - Saving the last selected settings

use crate::{
    config::MediaControllerConfig,
    equality,
    events::{EventBus, ListenerId, TrackChangedEvent},
    registry::TrackRegistry,
    selection::SelectionMode,
    settings::MediaSettings,
    storage::SettingsStorage,
    switch_mode::{SwitchMode, SwitchModePolicy},
    types::{self, MediaInfo, MediaType, StreamInfo},
    Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Track selection state for one playback session
pub struct MediaController {
    /// Controller configuration
    config: MediaControllerConfig,
    /// Registered tracks and current selections
    registry: TrackRegistry,
    /// Per-type switch modes
    switch_modes: SwitchModePolicy,
    /// Per-type initial settings
    initial_settings: HashMap<MediaType, MediaSettings>,
    /// Fallback strategy for initial selection
    selection_mode: SelectionMode,
    /// Saved settings collaborator
    storage: Option<Arc<dyn SettingsStorage>>,
    /// Change notification
    events: EventBus,
}

impl MediaController {
    /// Create a new media controller
    pub fn new(config: MediaControllerConfig) -> Self {
        Self {
            registry: TrackRegistry::new(),
            switch_modes: SwitchModePolicy::with_modes(&config.switch_modes),
            initial_settings: config.initial_settings.clone(),
            selection_mode: config.selection_mode_for_initial_track,
            storage: None,
            events: EventBus::new(),
            config,
        }
    }

    /// Attach a saved settings store
    pub fn with_storage(mut self, storage: Arc<dyn SettingsStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the saved settings store
    pub fn set_storage(&mut self, storage: Option<Arc<dyn SettingsStorage>>) {
        self.storage = storage;
    }

    /// Get configuration
    pub fn config(&self) -> &MediaControllerConfig {
        &self.config
    }

    /// Read access to the registry
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    /// Register a track discovered in the manifest
    pub fn add_track(&mut self, track: MediaInfo) -> Result<()> {
        self.registry.add_track(track)
    }

    /// Registered tracks of a type in a stream
    pub fn tracks_for(&self, media_type: MediaType, stream_info: &StreamInfo) -> &[MediaInfo] {
        self.registry.tracks_for(media_type, stream_info)
    }

    /// Current track of a type in a stream
    pub fn current_track_for(
        &self,
        media_type: MediaType,
        stream_info: &StreamInfo,
    ) -> Option<&MediaInfo> {
        self.registry.current_track_for(media_type, stream_info)
    }

    /// Whether `track` is current in its own bucket
    pub fn is_current_track(&self, track: &MediaInfo) -> bool {
        self.registry.is_current_track(track)
    }

    /// Drop every track of a stream, e.g. when a period leaves a live manifest
    pub fn remove_stream(&mut self, stream_info: &StreamInfo) -> bool {
        self.registry.remove_stream(&stream_info.id)
    }

    /// Identity comparison between two possibly-absent tracks
    pub fn is_tracks_equal(a: Option<&MediaInfo>, b: Option<&MediaInfo>) -> bool {
        equality::is_tracks_equal(a, b)
    }

    /// Whether a raw type string denotes a type with alternative tracks
    pub fn is_multi_track_supported_by_type(media_type: Option<&str>) -> bool {
        types::is_multi_track_supported_by_type(media_type)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Make `track` current in its bucket.
    ///
    /// Returns false without notifying when the track already is current.
    /// Otherwise listeners are notified before this returns.
    ///
    /// A track that was never registered is appended to its bucket, so
    /// `tracks_for` grows by one. A registered track with the same identity
    /// but a different payload is replaced by `track`.
    #[instrument(skip(self, track), fields(track_id = %track.id, media_type = %track.media_type))]
    pub fn set_track(&mut self, track: &MediaInfo) -> bool {
        if let Err(e) = track.validate() {
            warn!(error = %e, "Ignoring track switch");
            return false;
        }

        let old = self
            .registry
            .current_track_for(track.media_type, &track.stream_info)
            .cloned();

        if old.as_ref().is_some_and(|old| old.is_same_track(track)) {
            debug!("Track already current");
            return false;
        }

        if let Err(e) = self.registry.set_current(track) {
            warn!(error = %e, "Ignoring track switch");
            return false;
        }

        let switch_mode = self.switch_modes.effective(track.media_type);
        info!(
            stream_id = %track.stream_info.id,
            from = old.as_ref().map(|t| t.id.as_str()).unwrap_or("none"),
            to = %track.id,
            lang = track.lang.as_deref().unwrap_or(""),
            switch_mode = %switch_mode,
            "Current track changed"
        );

        self.events.emit(old, track.clone(), switch_mode);
        self.save_settings(track);

        true
    }

    /// Resolve the starting track of a type once its stream becomes active.
    ///
    /// Candidates matching the initial settings (or, failing those, the saved
    /// settings) are narrowed by the selection mode. When nothing matches the
    /// selection mode runs over every candidate.
    #[instrument(skip(self, stream_info), fields(stream_id = %stream_info.id))]
    pub fn check_initial_media_settings_for_type(
        &mut self,
        media_type: MediaType,
        stream_info: &StreamInfo,
    ) {
        if self.tracks_for(media_type, stream_info).is_empty() {
            debug!("No tracks to select from");
            return;
        }

        if !self.initial_settings.contains_key(&media_type) {
            if let Some(saved) = self.load_saved_settings(media_type) {
                self.initial_settings.insert(media_type, saved);
            }
        }

        let candidates = self.tracks_for(media_type, stream_info);
        let matching: Vec<MediaInfo> = match self.initial_settings.get(&media_type) {
            Some(settings) => candidates
                .iter()
                .filter(|t| settings.matches(t))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let selected = match matching.len() {
            0 => self.selection_mode.select(candidates).cloned(),
            1 => matching.into_iter().next(),
            _ => self.selection_mode.select(&matching).cloned(),
        };

        if let Some(track) = selected {
            info!(
                track_id = %track.id,
                selection_mode = %self.selection_mode,
                "Initial track resolved"
            );
            self.set_track(&track);
        }
    }

    fn load_saved_settings(&self, media_type: MediaType) -> Option<MediaSettings> {
        let storage = self.storage.as_ref()?;
        match storage.saved_media_settings(media_type) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(media_type = %media_type, error = %e, "Could not read saved settings");
                None
            }
        }
    }

    fn save_settings(&self, track: &MediaInfo) {
        if !self.config.saves_settings_for(track.media_type) {
            return;
        }
        let Some(storage) = self.storage.as_ref() else {
            return;
        };

        let settings = MediaSettings::from(track);
        if let Err(e) = storage.set_saved_media_settings(track.media_type, &settings) {
            warn!(media_type = %track.media_type, error = %e, "Could not save settings");
        }
    }

    // ---------------------------------------------------------------------
    // Switch mode
    // ---------------------------------------------------------------------

    /// Configured switch mode for a type
    pub fn switch_mode(&self, media_type: MediaType) -> Option<SwitchMode> {
        self.switch_modes.get(media_type)
    }

    /// Set the switch mode for a type
    pub fn set_switch_mode(&mut self, media_type: MediaType, mode: SwitchMode) {
        self.switch_modes.set(media_type, mode);
    }

    /// Set the switch mode from its string form; unsupported values are ignored
    pub fn set_switch_mode_str(&mut self, media_type: MediaType, mode: &str) {
        self.switch_modes.set_str(media_type, mode);
    }

    // ---------------------------------------------------------------------
    // Selection mode
    // ---------------------------------------------------------------------

    /// Current fallback strategy for initial selection
    pub fn selection_mode_for_initial_track(&self) -> SelectionMode {
        self.selection_mode
    }

    /// Set the fallback strategy for initial selection
    pub fn set_selection_mode_for_initial_track(&mut self, mode: SelectionMode) {
        debug!(mode = %mode, "Initial track selection mode set");
        self.selection_mode = mode;
    }

    /// Set the strategy from its string form; unsupported values are ignored
    pub fn set_selection_mode_for_initial_track_str(&mut self, mode: &str) {
        match mode.parse() {
            Ok(mode) => self.set_selection_mode_for_initial_track(mode),
            Err(e) => warn!(error = %e, "Ignoring initial track selection mode"),
        }
    }

    // ---------------------------------------------------------------------
    // Initial settings
    // ---------------------------------------------------------------------

    /// Initial settings for a type
    pub fn initial_settings(&self, media_type: MediaType) -> Option<&MediaSettings> {
        self.initial_settings.get(&media_type)
    }

    /// Set initial settings for a type. Absent type or value is a no-op.
    pub fn set_initial_settings(
        &mut self,
        media_type: Option<MediaType>,
        settings: Option<MediaSettings>,
    ) {
        let (Some(media_type), Some(settings)) = (media_type, settings) else {
            debug!("Initial settings without type or value ignored");
            return;
        };
        debug!(media_type = %media_type, settings = ?settings, "Initial settings set");
        self.initial_settings.insert(media_type, settings);
    }

    /// As [`set_initial_settings`](Self::set_initial_settings), for a raw
    /// type string; unrecognized types are ignored.
    pub fn set_initial_settings_str(
        &mut self,
        media_type: Option<&str>,
        settings: Option<MediaSettings>,
    ) {
        let parsed = media_type.and_then(MediaType::parse);
        if media_type.is_some() && parsed.is_none() {
            warn!(
                media_type = media_type.unwrap_or_default(),
                "Initial settings for unknown type ignored"
            );
            return;
        }
        self.set_initial_settings(parsed, settings);
    }

    // ---------------------------------------------------------------------
    // Notification
    // ---------------------------------------------------------------------

    /// Register a synchronous track change listener
    pub fn on_track_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TrackChangedEvent) + Send + 'static,
    {
        self.events.on(listener)
    }

    /// Unregister a listener
    pub fn off_track_changed(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Subscribe to track changes from an async task
    pub fn subscribe(&self) -> broadcast::Receiver<TrackChangedEvent> {
        self.events.subscribe()
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Clear tracks and restore settings and modes to their configured values.
    ///
    /// Listeners and the storage collaborator are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.registry.clear();
        self.initial_settings = self.config.initial_settings.clone();
        self.switch_modes = SwitchModePolicy::with_modes(&self.config.switch_modes);
        self.selection_mode = self.config.selection_mode_for_initial_track;
        info!("Media controller reset");
    }
}

impl Default for MediaController {
    fn default() -> Self {
        Self::new(MediaControllerConfig::default())
    }
}
