//! Persisted media settings
//!
//! The controller reads saved settings when no initial settings were given
//! for a type, and writes the settings of each newly selected track back.
//! Hosts provide the actual persistence (local storage, a settings file,
//! a user profile service) by implementing [`SettingsStorage`].

use crate::{settings::MediaSettings, types::MediaType, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Storage key for a type's saved settings
pub fn settings_key(media_type: MediaType) -> String {
    format!("kino_{}_settings", media_type.as_str())
}

/// Key-value access to saved media settings
pub trait SettingsStorage: Send + Sync {
    /// Saved settings for a type, if any
    fn saved_media_settings(&self, media_type: MediaType) -> Result<Option<MediaSettings>>;

    /// Persist settings for a type
    fn set_saved_media_settings(
        &self,
        media_type: MediaType,
        settings: &MediaSettings,
    ) -> Result<()>;
}

/// In-process storage keeping settings as serialized JSON strings.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value for a key
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    /// Store a raw value, as a host would when restoring a previous session
    pub fn set_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.into(), value.into());
            }
            Err(_) => warn!("Settings storage lock poisoned"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStorage for MemoryStorage {
    fn saved_media_settings(&self, media_type: MediaType) -> Result<Option<MediaSettings>> {
        let Some(raw) = self.get_raw(&settings_key(media_type)) else {
            return Ok(None);
        };
        let settings = serde_json::from_str(&raw)?;
        Ok(Some(settings))
    }

    fn set_saved_media_settings(
        &self,
        media_type: MediaType,
        settings: &MediaSettings,
    ) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        debug!(media_type = %media_type, settings = %raw, "Media settings saved");
        self.set_raw(settings_key(media_type), raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_keys() {
        assert_eq!(settings_key(MediaType::Audio), "kino_audio_settings");
        assert_eq!(settings_key(MediaType::FragmentedText), "kino_fragmentedText_settings");
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        assert!(storage.saved_media_settings(MediaType::Audio).unwrap().is_none());

        let settings = MediaSettings::new().with_lang("fr").with_role("main");
        storage
            .set_saved_media_settings(MediaType::Audio, &settings)
            .unwrap();

        assert_eq!(
            storage.saved_media_settings(MediaType::Audio).unwrap(),
            Some(settings)
        );
        assert!(storage.saved_media_settings(MediaType::Video).unwrap().is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_raw("kino_text_settings", r#"{"lang":"de"}"#);
        assert_eq!(
            other.saved_media_settings(MediaType::Text).unwrap(),
            Some(MediaSettings::new().with_lang("de"))
        );
    }

    #[test]
    fn test_corrupt_entry() {
        let storage = MemoryStorage::new();
        storage.set_raw("kino_audio_settings", "not json");
        assert!(matches!(
            storage.saved_media_settings(MediaType::Audio),
            Err(Error::Serialization(_))
        ));
    }
}
