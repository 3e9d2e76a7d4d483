//! MPRIS surface so desktop media keys and `playerctl` can drive playback.
//!
//! The D-Bus service runs on its own thread. Method calls are forwarded to the
//! runtime as [`ControlCmd`]s; properties read a snapshot the runtime refreshes
//! whenever the playback session changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::catalog::TrackId;
use crate::playback::{PlayState, PlaybackSession};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.beatstore";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayState,
    track_id: Option<OwnedObjectPath>,
    title: Option<String>,
    genre: Option<String>,
    bpm: Option<u32>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    volume: f64,
}

/// `/org/mpris/MediaPlayer2/track/<id>`, with characters D-Bus rejects
/// replaced by `_`.
fn track_object_path(id: &TrackId) -> Option<OwnedObjectPath> {
    let element: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if element.is_empty() {
        return None;
    }
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{element}"))
        .ok()
        .map(OwnedObjectPath::from)
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// Refresh the exported snapshot from `session`.
    ///
    /// `url` and `art_url` are the resolved locators of the current track.
    pub fn update(&self, session: &PlaybackSession, url: Option<String>, art_url: Option<String>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        s.playback = session.play_state;
        s.volume = f64::from(session.volume);
        match &session.current_track {
            Some(track) => {
                s.track_id = track_object_path(&track.id);
                s.title = Some(track.name.clone());
                s.genre = Some(track.genre.clone()).filter(|g| !g.trim().is_empty());
                s.bpm = track.bpm;
                s.url = url;
                s.art_url = art_url;
                s.length_micros = (session.duration_seconds > 0.0)
                    .then(|| (session.duration_seconds * 1_000_000.0) as i64);
            }
            None => {
                s.track_id = None;
                s.title = None;
                s.genre = None;
                s.bpm = None;
                s.url = None;
                s.art_url = None;
                s.length_micros = None;
            }
        }
    }
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

fn metadata_map(s: &SharedState) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();
    if let Some(path) = &s.track_id {
        insert(&mut map, "mpris:trackid", Value::from(path.clone().into_inner()));
    }
    if let Some(title) = &s.title {
        insert(&mut map, "xesam:title", Value::from(title.clone()));
    }
    if let Some(genre) = &s.genre {
        insert(&mut map, "xesam:genre", Value::from(vec![genre.clone()]));
    }
    if let Some(bpm) = s.bpm {
        insert(&mut map, "xesam:audioBPM", Value::from(bpm as i32));
    }
    if let Some(url) = &s.url {
        insert(&mut map, "xesam:url", Value::from(url.clone()));
    }
    if let Some(art) = &s.art_url {
        insert(&mut map, "mpris:artUrl", Value::from(art.clone()));
    }
    if let Some(len) = s.length_micros {
        insert(&mut map, "mpris:length", Value::from(len));
    }
    map
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "beatstore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        s.playback.label()
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        match self.state.lock() {
            Ok(s) => metadata_map(&s),
            Err(_) => HashMap::new(),
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            info!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
