//! Core types for Kino Tracks

use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Media types that can carry alternative tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    Audio,
    Video,
    Text,
    /// Text carried in ISOBMFF fragments rather than sidecar files
    FragmentedText,
}

impl MediaType {
    /// All media types, in registration order of the manifest processor
    pub const ALL: [MediaType; 4] = [
        MediaType::Video,
        MediaType::Audio,
        MediaType::Text,
        MediaType::FragmentedText,
    ];

    /// String form used in configuration and storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Text => "text",
            MediaType::FragmentedText => "fragmentedText",
        }
    }

    /// Parse a media type, returning `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<MediaType> {
        value.parse().ok()
    }

    /// Whether several tracks of this type may coexist in one stream.
    ///
    /// Every variant qualifies; the check is meaningful for the
    /// string form, see [`is_multi_track_supported_by_type`].
    pub fn is_multi_track_supported(&self) -> bool {
        matches!(
            self,
            MediaType::Audio | MediaType::Video | MediaType::Text | MediaType::FragmentedText
        )
    }

    /// Text-like types
    pub fn is_text(&self) -> bool {
        matches!(self, MediaType::Text | MediaType::FragmentedText)
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(MediaType::Audio),
            "video" => Ok(MediaType::Video),
            "text" => Ok(MediaType::Text),
            "fragmentedText" => Ok(MediaType::FragmentedText),
            other => Err(Error::UnknownMediaType(other.to_string())),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw type string coming from the manifest or the application.
///
/// Returns false for `None` and for any unrecognized value.
pub fn is_multi_track_supported_by_type(media_type: Option<&str>) -> bool {
    media_type
        .and_then(MediaType::parse)
        .map(|t| t.is_multi_track_supported())
        .unwrap_or(false)
}

/// Stream (period) that owns a set of track buckets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Period identifier, unique within the presentation
    pub id: String,
    /// Position of the period in the presentation
    pub index: u32,
    /// Period start in seconds
    pub start: f64,
    /// Period duration in seconds (unknown for open-ended live periods)
    pub duration: Option<f64>,
}

impl StreamInfo {
    /// Create stream info with just an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set period index
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Set period timing
    pub fn with_timing(mut self, start: f64, duration: Option<f64>) -> Self {
        self.start = start;
        self.duration = duration;
        self
    }
}

/// Encoded representation of a track.
///
/// Only read by initial track selection strategies; rate adaptation
/// between representations happens downstream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Representation {
    pub id: String,
    /// Bandwidth in bits per second
    pub bandwidth: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Representation {
    /// Audio or text representation
    pub fn new(id: impl Into<String>, bandwidth: u64) -> Self {
        Self {
            id: id.into(),
            bandwidth,
            width: None,
            height: None,
        }
    }

    /// Video representation
    pub fn video(id: impl Into<String>, bandwidth: u64, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            bandwidth,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Pixel count, when both dimensions are known and non-zero
    pub fn pixels(&self) -> Option<u64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(w as u64 * h as u64),
            _ => None,
        }
    }
}

/// A selectable media track (one adaptation set of a period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// Track identifier, unique within a (type, stream) bucket
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub stream_info: StreamInfo,
    /// BCP-47 language code
    pub lang: Option<String>,
    pub viewpoint: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub audio_channel_configuration: Vec<String>,
    /// Human-readable label
    pub label: Option<String>,
    pub codec: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub representations: Vec<Representation>,
}

impl MediaInfo {
    /// Create a track with no descriptive attributes
    pub fn new(id: impl Into<String>, media_type: MediaType, stream_info: StreamInfo) -> Self {
        Self {
            id: id.into(),
            media_type,
            stream_info,
            lang: None,
            viewpoint: None,
            roles: Vec::new(),
            accessibility: Vec::new(),
            audio_channel_configuration: Vec::new(),
            label: None,
            codec: None,
            mime_type: None,
            representations: Vec::new(),
        }
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
        self.roles.push(role.into());
        self
    }

    pub fn with_accessibility(mut self, accessibility: impl Into<String>) -> Self {
        self.accessibility.push(accessibility.into());
        self
    }

    pub fn with_audio_channel_configuration(mut self, config: impl Into<String>) -> Self {
        self.audio_channel_configuration.push(config.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representations.push(representation);
        self
    }

    /// Highest bandwidth across representations (0 when there are none)
    pub fn max_bandwidth(&self) -> u64 {
        self.representations
            .iter()
            .map(|r| r.bandwidth)
            .max()
            .unwrap_or(0)
    }

    /// Check the identity fields required for registration
    pub fn validate(&self) -> crate::Result<()> {
        if self.stream_info.id.is_empty() {
            return Err(Error::MissingStreamId);
        }
        Ok(())
    }
}
