//! Integration tests for Kino Tracks

use kino_tracks::{
    is_tracks_equal, MediaController, MediaControllerConfig, MediaInfo, MediaSettings,
    MediaType, MemoryStorage, Representation, SelectionMode, SettingsStorage, StreamInfo,
    SwitchMode, TrackChangedEvent, DEFAULT_INIT_TRACK_SELECTION_MODE,
};
use std::sync::{Arc, Mutex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kino_tracks=debug")
        .with_test_writer()
        .try_init();
}

fn controller() -> MediaController {
    init_tracing();
    MediaController::new(MediaControllerConfig::default())
        .with_storage(Arc::new(MemoryStorage::new()))
}

fn stream_info() -> StreamInfo {
    StreamInfo::new("id")
}

fn audio_track(lang: &str) -> MediaInfo {
    MediaInfo::new("", MediaType::Audio, stream_info())
        .with_lang(lang)
        .with_viewpoint("viewpoint")
        .with_role("1")
        .with_accessibility("1")
        .with_audio_channel_configuration("1")
}

fn record_events(controller: &mut MediaController) -> Arc<Mutex<Vec<TrackChangedEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    controller.on_track_changed(move |e| sink.lock().unwrap().push(e.clone()));
    events
}

// =============================================================================
// Initial Settings Tests
// =============================================================================

#[test]
fn test_initial_settings_type_undefined() {
    let mut controller = controller();
    controller.set_initial_settings(None, Some(MediaSettings::new().with_lang("fr")));
    for t in MediaType::ALL {
        assert!(controller.initial_settings(t).is_none());
    }

    controller.set_initial_settings_str(None, Some(MediaSettings::new().with_lang("fr")));
    controller.set_initial_settings_str(Some("test"), Some(MediaSettings::new().with_lang("fr")));
    for t in MediaType::ALL {
        assert!(controller.initial_settings(t).is_none());
    }
}

#[test]
fn test_initial_settings_value_undefined() {
    let mut controller = controller();
    controller.set_initial_settings(Some(MediaType::Audio), None);
    assert!(controller.initial_settings(MediaType::Audio).is_none());

    // does not clear what is already there
    let settings = MediaSettings::new().with_lang("fr");
    controller.set_initial_settings(Some(MediaType::Audio), Some(settings.clone()));
    controller.set_initial_settings(Some(MediaType::Audio), None);
    assert_eq!(controller.initial_settings(MediaType::Audio), Some(&settings));
}

#[test]
fn test_set_and_get_initial_settings() {
    let mut controller = controller();
    let settings = MediaSettings::new().with_lang("fr").with_viewpoint("viewpoint");
    controller.set_initial_settings_str(Some("audio"), Some(settings.clone()));
    assert_eq!(controller.initial_settings(MediaType::Audio), Some(&settings));
    assert!(controller.initial_settings(MediaType::Video).is_none());
}

// =============================================================================
// Switch Mode Tests
// =============================================================================

#[test]
fn test_unsupported_switch_mode() {
    let mut controller = controller();
    assert!(controller.switch_mode(MediaType::Text).is_none());

    controller.set_switch_mode_str(MediaType::Text, "unsupported");
    assert!(controller.switch_mode(MediaType::Text).is_none());
}

#[test]
fn test_set_and_get_switch_mode() {
    let mut controller = controller();
    assert!(controller.switch_mode(MediaType::Text).is_none());

    controller.set_switch_mode_str(MediaType::Text, "alwaysReplace");
    assert_eq!(controller.switch_mode(MediaType::Text), Some(SwitchMode::AlwaysReplace));

    controller.set_switch_mode(MediaType::Text, SwitchMode::NeverReplace);
    controller.set_switch_mode_str(MediaType::Text, "unsupported");
    assert_eq!(controller.switch_mode(MediaType::Text), Some(SwitchMode::NeverReplace));
}

// =============================================================================
// Selection Mode Tests
// =============================================================================

#[test]
fn test_unsupported_selection_mode() {
    let mut controller = controller();
    assert_eq!(
        controller.selection_mode_for_initial_track(),
        DEFAULT_INIT_TRACK_SELECTION_MODE
    );

    controller.set_selection_mode_for_initial_track_str("unsupported");
    assert_eq!(
        controller.selection_mode_for_initial_track(),
        DEFAULT_INIT_TRACK_SELECTION_MODE
    );
}

#[test]
fn test_set_and_get_selection_mode() {
    let mut controller = controller();
    controller.set_selection_mode_for_initial_track_str("widestRange");
    assert_eq!(controller.selection_mode_for_initial_track(), SelectionMode::WidestRange);

    controller.set_selection_mode_for_initial_track_str("highestBitrate");
    assert_eq!(
        controller.selection_mode_for_initial_track(),
        SelectionMode::HighestBitrate
    );
}

// =============================================================================
// Multi Track Tests
// =============================================================================

#[test]
fn test_multi_track_not_supported() {
    assert!(!MediaController::is_multi_track_supported_by_type(None));
    assert!(!MediaController::is_multi_track_supported_by_type(Some("toto")));
}

#[test]
fn test_multi_track_supported() {
    for t in ["audio", "video", "text", "fragmentedText"] {
        assert!(MediaController::is_multi_track_supported_by_type(Some(t)));
    }
}

// =============================================================================
// Track Equality Tests
// =============================================================================

#[test]
fn test_tracks_not_equal() {
    let a = audio_track("lang");
    let b = MediaInfo { id: "id2".into(), ..a.clone() };
    assert!(!MediaController::is_tracks_equal(Some(&a), Some(&b)));
    assert!(!is_tracks_equal(Some(&b), Some(&a)));
}

#[test]
fn test_tracks_equal() {
    let a = audio_track("lang");
    let b = audio_track("lang");
    assert!(MediaController::is_tracks_equal(Some(&a), Some(&b)));
    assert!(is_tracks_equal(Some(&b), Some(&a)));
}

// =============================================================================
// Track Management Tests
// =============================================================================

#[test]
fn test_add_and_retrieve_track() {
    let mut controller = controller();
    let track = MediaInfo::new("", MediaType::Audio, stream_info());
    controller.add_track(track.clone()).unwrap();

    let tracks = controller.tracks_for(MediaType::Audio, &stream_info());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0], track);
    assert!(controller.current_track_for(MediaType::Audio, &stream_info()).is_none());
}

#[test]
fn test_add_and_set_current_track() {
    let mut controller = controller();
    let track = MediaInfo::new("", MediaType::Audio, stream_info());
    controller.add_track(track.clone()).unwrap();
    controller.set_track(&track);

    assert_eq!(
        controller.current_track_for(MediaType::Audio, &stream_info()),
        Some(&track)
    );
}

#[test]
fn test_check_current_track() {
    let mut controller = controller();
    let track = audio_track("fr");
    controller.add_track(track.clone()).unwrap();
    assert!(!controller.is_current_track(&track));

    controller.set_track(&track);
    assert!(controller.is_current_track(&track));
    assert!(!controller.is_current_track(&audio_track("en")));
}

#[test]
fn test_track_changed_event() {
    let mut controller = controller();
    let track1 = audio_track("fr");
    let track2 = audio_track("en");
    controller.add_track(track1.clone()).unwrap();
    controller.add_track(track2.clone()).unwrap();

    controller.set_track(&track1);
    assert_eq!(
        controller.current_track_for(MediaType::Audio, &stream_info()),
        Some(&track1)
    );

    let events = record_events(&mut controller);
    controller.set_track(&track2);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].old_media_info.as_ref(), Some(&track1));
    assert_eq!(events[0].new_media_info, track2);
    assert_eq!(events[0].switch_mode, SwitchMode::AlwaysReplace);
}

#[test]
fn test_set_same_track_emits_nothing() {
    let mut controller = controller();
    let track = audio_track("fr");
    controller.add_track(track.clone()).unwrap();
    controller.set_track(&track);

    let events = record_events(&mut controller);
    assert!(!controller.set_track(&track));
    assert!(!controller.set_track(&audio_track("fr").with_label("Français")));
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_events_follow_call_order() {
    let mut controller = controller();
    let events = record_events(&mut controller);

    for lang in ["fr", "en", "de", "fr"] {
        controller.set_track(&audio_track(lang));
    }

    let langs: Vec<_> = events
        .lock()
        .unwrap()
        .iter()
        .map(|e| e.new_media_info.lang.clone().unwrap_or_default())
        .collect();
    assert_eq!(langs, vec!["fr", "en", "de", "fr"]);
}

#[test]
fn test_buckets_are_independent() {
    let mut controller = controller();
    let period1 = StreamInfo::new("p1");
    let fr_p1 = MediaInfo { stream_info: period1.clone(), ..audio_track("fr") };

    controller.set_track(&audio_track("en"));
    controller.set_track(&fr_p1);

    assert_eq!(
        controller
            .current_track_for(MediaType::Audio, &stream_info())
            .and_then(|t| t.lang.as_deref()),
        Some("en")
    );
    assert!(controller.is_current_track(&fr_p1));
    assert!(controller.current_track_for(MediaType::Video, &period1).is_none());

    assert!(controller.remove_stream(&period1));
    assert!(controller.tracks_for(MediaType::Audio, &period1).is_empty());
}

// =============================================================================
// Initial Track Tests
// =============================================================================

#[test]
fn test_initial_media_settings_choose_initial_track() {
    let mut controller = controller();
    let track = audio_track("fr");
    controller.add_track(track.clone()).unwrap();
    controller.add_track(audio_track("en")).unwrap();

    assert!(controller.current_track_for(MediaType::Audio, &stream_info()).is_none());

    controller.set_initial_settings(
        Some(MediaType::Audio),
        Some(MediaSettings::new().with_lang("fr").with_viewpoint("viewpoint")),
    );
    controller.check_initial_media_settings_for_type(MediaType::Audio, &stream_info());

    assert_eq!(
        controller.current_track_for(MediaType::Audio, &stream_info()),
        Some(&track)
    );
}

#[test]
fn test_initial_selection_by_bitrate() {
    let mut controller = controller();
    let stream = stream_info();
    let low = MediaInfo::new("v-low", MediaType::Video, stream.clone())
        .with_representation(Representation::video("360p", 800_000, 640, 360))
        .with_representation(Representation::video("720p", 2_800_000, 1280, 720));
    let high = MediaInfo::new("v-high", MediaType::Video, stream.clone())
        .with_representation(Representation::video("1080p", 5_000_000, 1920, 1080));
    controller.add_track(low.clone()).unwrap();
    controller.add_track(high.clone()).unwrap();

    controller.check_initial_media_settings_for_type(MediaType::Video, &stream);
    assert_eq!(controller.current_track_for(MediaType::Video, &stream), Some(&high));

    controller.reset();
    controller.add_track(low.clone()).unwrap();
    controller.add_track(high).unwrap();
    controller.set_selection_mode_for_initial_track(SelectionMode::WidestRange);
    controller.check_initial_media_settings_for_type(MediaType::Video, &stream);
    assert_eq!(controller.current_track_for(MediaType::Video, &stream), Some(&low));
}

#[test]
fn test_initial_selection_does_not_override_existing_choice() {
    let mut controller = controller();
    let fr = audio_track("fr");
    controller.add_track(fr.clone()).unwrap();
    controller.add_track(audio_track("en")).unwrap();
    controller.set_initial_settings(
        Some(MediaType::Audio),
        Some(MediaSettings::new().with_lang("fr")),
    );

    let events = record_events(&mut controller);
    controller.check_initial_media_settings_for_type(MediaType::Audio, &stream_info());
    controller.check_initial_media_settings_for_type(MediaType::Audio, &stream_info());

    assert_eq!(events.lock().unwrap().len(), 1);
    assert!(controller.is_current_track(&fr));
}

#[test]
fn test_saved_settings_used_for_next_session() {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set_saved_media_settings(MediaType::Audio, &MediaSettings::new().with_lang("en"))
        .unwrap();

    let mut controller = MediaController::default().with_storage(storage.clone());
    controller.add_track(audio_track("fr")).unwrap();
    controller.add_track(audio_track("en")).unwrap();
    controller.check_initial_media_settings_for_type(MediaType::Audio, &stream_info());

    assert!(controller.is_current_track(&audio_track("en")));

    controller.set_track(&audio_track("fr"));
    let saved = storage.saved_media_settings(MediaType::Audio).unwrap();
    assert_eq!(saved.and_then(|s| s.lang), Some("fr".to_string()));
}

#[test]
fn test_corrupt_saved_settings_are_tolerated() {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    storage.set_raw("kino_audio_settings", "{not json");

    let mut controller = MediaController::default().with_storage(storage);
    controller.add_track(audio_track("fr")).unwrap();
    controller.check_initial_media_settings_for_type(MediaType::Audio, &stream_info());

    assert!(controller.is_current_track(&audio_track("fr")));
}

// =============================================================================
// Async Subscriber Tests
// =============================================================================

#[tokio::test]
async fn test_async_subscriber_receives_switch() {
    let mut controller = controller();
    let mut rx = controller.subscribe();

    controller.set_track(&audio_track("fr"));
    controller.set_track(&audio_track("en"));

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(first.old_media_info.is_none());
    assert_eq!(second.new_media_info.lang.as_deref(), Some("en"));
    assert!(second.sequence > first.sequence);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_reset_without_activity() {
    let mut controller = controller();
    controller.reset();
    assert!(controller.registry().is_empty());
}

#[test]
fn test_reset_clears_everything() {
    let mut controller = controller();
    controller.add_track(audio_track("fr")).unwrap();
    controller.set_track(&audio_track("fr"));
    controller.set_switch_mode(MediaType::Audio, SwitchMode::NeverReplace);
    controller.set_initial_settings(Some(MediaType::Audio), Some(MediaSettings::new()));

    controller.reset();

    assert!(controller.tracks_for(MediaType::Audio, &stream_info()).is_empty());
    assert!(controller.current_track_for(MediaType::Audio, &stream_info()).is_none());
    assert!(controller.switch_mode(MediaType::Audio).is_none());
    assert!(controller.initial_settings(MediaType::Audio).is_none());
}
