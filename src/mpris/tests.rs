use super::*;
use crate::catalog::{Prices, Track};
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        id: TrackId::from("beat-3f9a1c"),
        name: "Midnight Drive".to_string(),
        genre: "Trap".to_string(),
        bpm: Some(140),
        key: "C# minor".to_string(),
        mood: String::new(),
        cover: Some("covers/midnight.png".to_string()),
        audio: "audio/midnight.mp3".to_string(),
        prices: Prices::default(),
        plays: 0,
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    (
        MprisHandle {
            state: state.clone(),
        },
        state,
    )
}

#[test]
fn track_paths_are_sanitized_object_paths() {
    let path = track_object_path(&TrackId::from("beat-3f9a1c")).unwrap();
    assert_eq!(path.as_str(), "/org/mpris/MediaPlayer2/track/beat_3f9a1c");
    assert!(track_object_path(&TrackId::from("")).is_none());
}

#[test]
fn update_sets_and_clears_shared_state() {
    let (handle, state) = handle();
    let mut session = PlaybackSession::new(0.7);
    session.current_track = Some(make_track());
    session.play_state = PlayState::Playing;
    session.duration_seconds = 1.5;

    handle.update(
        &session,
        Some("file:///beats/audio/midnight.mp3".to_string()),
        Some("file:///beats/covers/midnight.png".to_string()),
    );
    {
        let s = state.lock().unwrap();
        assert_eq!(s.playback, PlayState::Playing);
        assert_eq!(s.title.as_deref(), Some("Midnight Drive"));
        assert_eq!(s.genre.as_deref(), Some("Trap"));
        assert_eq!(s.bpm, Some(140));
        assert_eq!(s.length_micros, Some(1_500_000));
        assert!(s.url.as_deref().unwrap().ends_with("midnight.mp3"));
        assert!((s.volume - 0.7).abs() < 1e-6);
        assert!(s.track_id.is_some());
    }

    handle.update(&PlaybackSession::new(0.7), None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.playback, PlayState::Stopped);
        assert_eq!(s.title, None);
        assert_eq!(s.genre, None);
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unknown_duration_has_no_length() {
    let (handle, state) = handle();
    let mut session = PlaybackSession::new(1.0);
    session.current_track = Some(make_track());
    handle.update(&session, None, None);
    assert_eq!(state.lock().unwrap().length_micros, None);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");
    state.lock().unwrap().playback = PlayState::Playing;
    assert_eq!(iface.playback_status(), "Playing");
    state.lock().unwrap().playback = PlayState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state) = handle();
    let mut session = PlaybackSession::new(1.0);
    session.current_track = Some(make_track());
    session.duration_seconds = 180.0;
    handle.update(
        &session,
        Some("file:///beats/audio/midnight.mp3".to_string()),
        Some("file:///beats/covers/midnight.png".to_string()),
    );

    let map = metadata_map(&state.lock().unwrap());
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:genre",
        "xesam:audioBPM",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let state = SharedState::default();
    assert!(metadata_map(&state).is_empty());
}

#[test]
fn method_calls_are_forwarded_as_commands() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let player = PlayerIface {
        tx: tx.clone(),
        state: Arc::new(Mutex::new(SharedState::default())),
    };
    let root = RootIface { tx };

    player.play();
    player.pause();
    player.play_pause();
    player.stop();
    root.quit();

    let cmds: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Quit,
        ]
    );
}
