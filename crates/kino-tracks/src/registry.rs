//! Track registry
//!
//! Holds, per stream and media type, the tracks discovered by manifest
//! processing and which of them is current. Lookups on streams or types
//! that were never registered behave as empty buckets.

use crate::{
    types::{MediaInfo, MediaType, StreamInfo},
    Result,
};
use std::collections::HashMap;
use tracing::debug;

/// Tracks of one media type within one stream
#[derive(Debug, Clone, Default)]
pub struct TrackBucket {
    /// Registered tracks in insertion order
    tracks: Vec<MediaInfo>,
    /// Index of the current track in `tracks`
    current: Option<usize>,
}

impl TrackBucket {
    /// Registered tracks in insertion order
    pub fn tracks(&self) -> &[MediaInfo] {
        &self.tracks
    }

    /// Current track, if one has been selected
    pub fn current(&self) -> Option<&MediaInfo> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Point `current` at `track`.
    ///
    /// An identical registered entry is reused. Otherwise the first entry
    /// with the same identity takes the payload of `track`, and a track
    /// with no registered counterpart is appended.
    fn select(&mut self, track: &MediaInfo) {
        let index = if let Some(index) = self.tracks.iter().position(|t| t == track) {
            index
        } else if let Some(index) = self.tracks.iter().position(|t| t.is_same_track(track)) {
            self.tracks[index] = track.clone();
            index
        } else {
            self.tracks.push(track.clone());
            self.tracks.len() - 1
        };
        self.current = Some(index);
    }
}

/// Registry of track buckets keyed by stream id and media type
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    streams: HashMap<String, HashMap<MediaType, TrackBucket>>,
}

impl TrackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track to its (type, stream) bucket.
    ///
    /// Duplicates are kept as distinct entries. The bucket's current track
    /// is left untouched.
    pub fn add_track(&mut self, track: MediaInfo) -> Result<()> {
        track.validate()?;

        debug!(
            track_id = %track.id,
            media_type = %track.media_type,
            stream_id = %track.stream_info.id,
            "Track registered"
        );

        self.streams
            .entry(track.stream_info.id.clone())
            .or_default()
            .entry(track.media_type)
            .or_default()
            .tracks
            .push(track);
        Ok(())
    }

    /// Bucket for a (type, stream) pair
    pub fn bucket(&self, media_type: MediaType, stream_info: &StreamInfo) -> Option<&TrackBucket> {
        self.streams
            .get(&stream_info.id)
            .and_then(|types| types.get(&media_type))
    }

    /// Registered tracks of a type in a stream, empty if none
    pub fn tracks_for(&self, media_type: MediaType, stream_info: &StreamInfo) -> &[MediaInfo] {
        self.bucket(media_type, stream_info)
            .map(TrackBucket::tracks)
            .unwrap_or(&[])
    }

    /// Current track of a type in a stream
    pub fn current_track_for(
        &self,
        media_type: MediaType,
        stream_info: &StreamInfo,
    ) -> Option<&MediaInfo> {
        self.bucket(media_type, stream_info)
            .and_then(TrackBucket::current)
    }

    /// Whether `track` is the current track of its own bucket
    pub fn is_current_track(&self, track: &MediaInfo) -> bool {
        self.current_track_for(track.media_type, &track.stream_info)
            .map(|current| current.is_same_track(track))
            .unwrap_or(false)
    }

    /// Make `track` current in its bucket
    pub(crate) fn set_current(&mut self, track: &MediaInfo) -> Result<()> {
        track.validate()?;
        self.streams
            .entry(track.stream_info.id.clone())
            .or_default()
            .entry(track.media_type)
            .or_default()
            .select(track);
        Ok(())
    }

    /// Ids of streams with at least one bucket
    pub fn stream_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Drop every bucket of a stream
    pub fn remove_stream(&mut self, stream_id: &str) -> bool {
        let removed = self.streams.remove(stream_id).is_some();
        if removed {
            debug!(stream_id, "Stream tracks removed");
        }
        removed
    }

    /// Drop all buckets
    pub fn clear(&mut self) {
        self.streams.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
