//! Track identity comparison
//!
//! Two tracks are the same selectable track when their id, viewpoint,
//! language, roles, accessibility and audio channel configuration all match.
//! The owning stream, media type and representation payload are ignored.

use crate::types::MediaInfo;

impl MediaInfo {
    /// Compare identity fields with another track
    pub fn is_same_track(&self, other: &MediaInfo) -> bool {
        self.id == other.id
            && self.viewpoint == other.viewpoint
            && self.lang == other.lang
            && self.roles == other.roles
            && self.accessibility == other.accessibility
            && self.audio_channel_configuration == other.audio_channel_configuration
    }
}

/// Compare two possibly-absent tracks.
///
/// Two absent tracks are equal; an absent track never equals a present one.
pub fn is_tracks_equal(a: Option<&MediaInfo>, b: Option<&MediaInfo>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.is_same_track(b),
        _ => false,
    }
}
