//! Track change notification
//!
//! Every accepted track change produces one [`TrackChangedEvent`].
//! Callback listeners run synchronously, in registration order, before
//! `set_track` returns. The same event is published on a broadcast
//! channel for async consumers such as buffer controllers running on
//! their own task.

use crate::{switch_mode::SwitchMode, types::MediaInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Capacity of the async subscriber channel
const CHANNEL_CAPACITY: usize = 64;

/// Emitted when the current track of a (type, stream) bucket changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackChangedEvent {
    /// Unique event ID
    pub id: Uuid,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Sequence number, increasing across the bus lifetime
    pub sequence: u64,
    /// Previously current track
    pub old_media_info: Option<MediaInfo>,
    /// Newly current track
    pub new_media_info: MediaInfo,
    /// How buffered media of the old track should be handled
    pub switch_mode: SwitchMode,
}

/// Handle returned on listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TrackChangedEvent) + Send>;

/// Listener list plus broadcast channel
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    sequence: u64,
    tx: broadcast::Sender<TrackChangedEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            listeners: Vec::new(),
            next_listener: 0,
            sequence: 0,
            tx,
        }
    }

    /// Register a synchronous listener
    pub fn on<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TrackChangedEvent) + Send + 'static,
    {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Subscribe to events from an async context
    pub fn subscribe(&self) -> broadcast::Receiver<TrackChangedEvent> {
        self.tx.subscribe()
    }

    /// Build and deliver an event
    pub fn emit(
        &mut self,
        old_media_info: Option<MediaInfo>,
        new_media_info: MediaInfo,
        switch_mode: SwitchMode,
    ) -> TrackChangedEvent {
        self.sequence += 1;
        let event = TrackChangedEvent {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sequence: self.sequence,
            old_media_info,
            new_media_info,
            switch_mode,
        };

        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }

        // No async subscribers is fine
        let _ = self.tx.send(event.clone());

        debug!(
            event_id = %event.id,
            sequence = event.sequence,
            listeners = self.listeners.len(),
            "Track change emitted"
        );

        event
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}
