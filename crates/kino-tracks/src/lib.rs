//! Kino Tracks - Track Selection for Kino
//!
//! This crate decides which alternative track is current for every
//! media type of every stream (period) in a playback session:
//! - Track registry keyed by stream and media type
//! - Track identity comparison
//! - Initial track resolution from initial or saved settings
//! - Fallback selection strategies (bitrate, range, efficiency)
//! - Per-type switch modes for buffered media
//! - Ordered change notification
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Kino Tracks                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Track     │  │    Switch    │  │  Selection   │           │
//! │  │   Registry   │  │  Mode Policy │  │  Strategies  │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │    Media    │                              │
//! │                    │  Controller │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │         ┌─────────────────┼─────────────────┐                   │
//! │  ┌──────┴───────┐  ┌──────┴──────┐  ┌───────┴──────┐            │
//! │  │   Settings   │  │    Event    │  │    Config    │            │
//! │  │   Storage    │  │     Bus     │  │              │            │
//! │  └──────────────┘  └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod equality;
pub mod registry;
pub mod switch_mode;
pub mod settings;
pub mod selection;
pub mod storage;
pub mod events;
pub mod config;
pub mod controller;

pub use error::{Error, Result};
pub use types::*;
pub use equality::is_tracks_equal;
pub use registry::{TrackBucket, TrackRegistry};
pub use switch_mode::{SwitchMode, SwitchModePolicy};
pub use settings::MediaSettings;
pub use selection::{SelectionMode, SelectionStrategy};
pub use storage::{MemoryStorage, SettingsStorage};
pub use events::{EventBus, ListenerId, TrackChangedEvent};
pub use config::MediaControllerConfig;
pub use controller::MediaController;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default initial track selection mode
pub const DEFAULT_INIT_TRACK_SELECTION_MODE: SelectionMode = SelectionMode::HighestBitrate;

/// Initialize the track library
pub fn init() {
    tracing::info!(version = VERSION, "Kino Tracks initialized");
}
