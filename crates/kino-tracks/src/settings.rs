//! Media settings used to pick an initial track
//!
//! Settings are partial: any criterion left unset matches every track.

use crate::types::MediaInfo;
use serde::{Deserialize, Serialize};

/// Matching criteria for one media type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_channel_configuration: Option<Vec<String>>,
}

impl MediaSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_viewpoint(mut self, viewpoint: impl Into<String>) -> Self {
        self.viewpoint = Some(viewpoint.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.get_or_insert_with(Vec::new).push(role.into());
        self
    }

    pub fn with_accessibility(mut self, accessibility: impl Into<String>) -> Self {
        self.accessibility
            .get_or_insert_with(Vec::new)
            .push(accessibility.into());
        self
    }

    pub fn with_audio_channel_configuration(mut self, config: impl Into<String>) -> Self {
        self.audio_channel_configuration
            .get_or_insert_with(Vec::new)
            .push(config.into());
        self
    }

    /// No criterion set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `track` satisfies every criterion present
    pub fn matches(&self, track: &MediaInfo) -> bool {
        fn scalar(want: &Option<String>, have: &Option<String>) -> bool {
            want.as_ref().map_or(true, |w| have.as_ref() == Some(w))
        }
        fn list(want: &Option<Vec<String>>, have: &[String]) -> bool {
            want.as_ref()
                .map_or(true, |w| w.iter().all(|v| have.contains(v)))
        }

        scalar(&self.lang, &track.lang)
            && scalar(&self.viewpoint, &track.viewpoint)
            && list(&self.roles, &track.roles)
            && list(&self.accessibility, &track.accessibility)
            && list(&self.audio_channel_configuration, &track.audio_channel_configuration)
    }
}

impl From<&MediaInfo> for MediaSettings {
    /// Settings that would select this track again next session.
    ///
    /// Only the first role and accessibility value are kept; empty lists
    /// become wildcards.
    fn from(track: &MediaInfo) -> Self {
        fn first(values: &[String]) -> Option<Vec<String>> {
            values.first().map(|v| vec![v.clone()])
        }
        fn all(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        Self {
            lang: track.lang.clone(),
            viewpoint: track.viewpoint.clone(),
            roles: first(&track.roles),
            accessibility: first(&track.accessibility),
            audio_channel_configuration: all(&track.audio_channel_configuration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaType, StreamInfo};

    fn track() -> MediaInfo {
        MediaInfo::new("a1", MediaType::Audio, StreamInfo::new("p0"))
            .with_lang("fr")
            .with_viewpoint("viewpoint")
            .with_role("main")
            .with_role("dub")
            .with_audio_channel_configuration("2")
    }

    #[test]
    fn test_empty_settings_match_everything() {
        assert!(MediaSettings::new().is_empty());
        assert!(MediaSettings::new().matches(&track()));
    }

    #[test]
    fn test_scalar_criteria() {
        let settings = MediaSettings::new().with_lang("fr").with_viewpoint("viewpoint");
        assert!(settings.matches(&track()));

        let settings = MediaSettings::new().with_lang("en");
        assert!(!settings.matches(&track()));

        let settings = MediaSettings::new().with_viewpoint("other");
        assert!(!settings.matches(&track()));
    }

    #[test]
    fn test_list_criteria_require_containment() {
        assert!(MediaSettings::new().with_role("dub").matches(&track()));
        assert!(!MediaSettings::new().with_role("commentary").matches(&track()));
        assert!(!MediaSettings::new().with_accessibility("1").matches(&track()));
        assert!(MediaSettings::new()
            .with_audio_channel_configuration("2")
            .matches(&track()));
    }

    #[test]
    fn test_from_track() {
        let settings = MediaSettings::from(&track());
        assert_eq!(settings.lang.as_deref(), Some("fr"));
        assert_eq!(settings.roles, Some(vec!["main".to_string()]));
        assert_eq!(settings.accessibility, None);
        assert!(settings.matches(&track()));
    }

    #[test]
    fn test_serialization_skips_wildcards() {
        let json = serde_json::to_string(&MediaSettings::new().with_lang("fr")).unwrap();
        assert_eq!(json, r#"{"lang":"fr"}"#);

        let parsed: MediaSettings =
            serde_json::from_str(r#"{"lang":"fr","audioChannelConfiguration":["2"]}"#).unwrap();
        assert_eq!(parsed.audio_channel_configuration, Some(vec!["2".to_string()]));
    }
}
