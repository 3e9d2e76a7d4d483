use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use crate::catalog::AudioSource;
use crate::config::AudioSettings;
use crate::error::PlaybackError;

use super::engine::{MediaEngine, clamp_volume};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineMessage, LoadTicket};

/// The rodio-backed engine. All decoding and output happens on a dedicated
/// audio thread; this handle only sends commands to it.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    output_available: bool,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Engine events are delivered on `events`.
    pub fn new(events: Sender<EngineMessage>, audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<bool>(1);

        let audio_handle = spawn_audio_thread(rx, events, ready_tx, audio_settings);
        let output_available = ready_rx.recv().unwrap_or(false);
        info!(output_available, "audio engine started");

        Self {
            tx,
            output_available,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn output_available(&self) -> bool {
        self.output_available
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd).inspect_err(|e| {
            debug!(cmd = ?e.0, "audio thread is gone, command dropped");
        })
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaEngine for AudioPlayer {
    fn load(&mut self, ticket: LoadTicket, source: &AudioSource) {
        let _ = self.send(AudioCmd::Load {
            ticket,
            path: source.path.clone(),
        });
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if !self.output_available {
            return Err(PlaybackError::Rejected("no audio output device".into()));
        }
        self.send(AudioCmd::Play)
            .map_err(|_| PlaybackError::Rejected("audio engine has stopped".into()))
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn set_position(&mut self, seconds: f64) {
        let _ = self.send(AudioCmd::SetPosition(seconds));
    }

    fn set_volume(&mut self, level: f32) {
        let _ = self.send(AudioCmd::SetVolume(clamp_volume(level)));
    }
}
