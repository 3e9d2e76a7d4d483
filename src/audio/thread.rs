use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::config::AudioSettings;

use super::engine::{clamp_position, clamp_volume};
use super::sink::{create_sink_at, probe};
use super::types::{AudioCmd, EngineEvent, EngineMessage, LoadTicket};

/// The source currently owned by the audio thread.
struct Loaded {
    ticket: LoadTicket,
    path: PathBuf,
    duration: Duration,
    sink: Option<Sink>,
    /// Added to `Sink::get_pos` after the sink was rebuilt mid-track.
    base: Duration,
    playing: bool,
    ended: bool,
}

impl Loaded {
    fn emit(&self, events: &Sender<EngineMessage>, event: EngineEvent) {
        let _ = events.send(EngineMessage {
            ticket: self.ticket.clone(),
            event,
        });
    }

    fn position(&self) -> Duration {
        let raw = self.base + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos);
        if self.duration > Duration::ZERO {
            raw.min(self.duration)
        } else {
            raw
        }
    }

    fn rebuild_at(
        &mut self,
        stream: &OutputStream,
        at: Duration,
        volume: f32,
        events: &Sender<EngineMessage>,
    ) -> bool {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        match create_sink_at(stream, &self.path, at, volume) {
            Ok(sink) => {
                self.sink = Some(sink);
                self.base = at;
                true
            }
            Err(e) => {
                warn!(track = %self.ticket.track, error = %e, "failed to rebuild sink");
                self.playing = false;
                self.emit(events, EngineEvent::Error(e));
                false
            }
        }
    }

    fn play(&mut self, stream: Option<&OutputStream>, volume: f32, events: &Sender<EngineMessage>) {
        let Some(stream) = stream else {
            return;
        };
        let exhausted = self.sink.as_ref().is_none_or(Sink::empty);
        if self.ended || exhausted {
            if !self.rebuild_at(stream, Duration::ZERO, volume, events) {
                return;
            }
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.playing = true;
        self.ended = false;
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.playing = false;
    }

    fn seek(
        &mut self,
        stream: Option<&OutputStream>,
        seconds: f64,
        volume: f32,
        events: &Sender<EngineMessage>,
    ) {
        let target = clamp_position(seconds, self.duration.as_secs_f64());
        let at = Duration::from_secs_f64(target);

        let seeked = match self.sink.as_ref() {
            Some(sink) if !sink.empty() => match sink.try_seek(at) {
                Ok(()) => true,
                Err(e) => {
                    debug!(track = %self.ticket.track, error = ?e, "try_seek failed, rebuilding sink");
                    false
                }
            },
            _ => false,
        };

        if seeked {
            self.base = Duration::ZERO;
        } else if let Some(stream) = stream {
            if !self.rebuild_at(stream, at, volume, events) {
                return;
            }
            if self.playing {
                if let Some(sink) = self.sink.as_ref() {
                    sink.play();
                }
            }
        } else {
            self.base = at;
        }

        self.ended = false;
        self.emit(events, EngineEvent::TimeUpdate(target));
    }

    fn tick(&mut self, events: &Sender<EngineMessage>) {
        if !self.playing {
            return;
        }
        let finished = self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            self.playing = false;
            self.ended = true;
            debug!(track = %self.ticket.track, "track ended");
            self.emit(events, EngineEvent::Ended);
        } else {
            self.emit(events, EngineEvent::TimeUpdate(self.position().as_secs_f64()));
        }
    }

    fn stop(self) {
        if let Some(sink) = self.sink {
            sink.stop();
        }
    }
}

fn load(
    stream: Option<&OutputStream>,
    ticket: LoadTicket,
    path: PathBuf,
    volume: f32,
    events: &Sender<EngineMessage>,
) -> Option<Loaded> {
    let mut loaded = Loaded {
        ticket,
        path,
        duration: Duration::ZERO,
        sink: None,
        base: Duration::ZERO,
        playing: false,
        ended: false,
    };

    match probe(&loaded.path) {
        Ok(duration) => loaded.duration = duration,
        Err(e) => {
            warn!(track = %loaded.ticket.track, error = %e, "failed to load source");
            loaded.emit(events, EngineEvent::Error(e));
            return None;
        }
    }

    if loaded.duration > Duration::ZERO {
        loaded.emit(
            events,
            EngineEvent::MetadataLoaded(loaded.duration.as_secs_f64()),
        );
    }

    if let Some(stream) = stream {
        if !loaded.rebuild_at(stream, Duration::ZERO, volume, events) {
            return None;
        }
    }

    debug!(track = %loaded.ticket.track, seq = loaded.ticket.seq, "source loaded");
    Some(loaded)
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<EngineMessage>,
    ready: SyncSender<bool>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which corrupts the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = ?e, "no audio output device, playback disabled");
                None
            }
        };
        let _ = ready.send(stream.is_some());

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut volume = clamp_volume(audio_settings.initial_volume);
        let mut current: Option<Loaded> = None;

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Load { ticket, path }) => {
                    if let Some(old) = current.take() {
                        old.stop();
                    }
                    current = load(stream.as_ref(), ticket, path, volume, &events);
                }
                Ok(AudioCmd::Play) => {
                    if let Some(cur) = current.as_mut() {
                        cur.play(stream.as_ref(), volume, &events);
                    }
                }
                Ok(AudioCmd::Pause) => {
                    if let Some(cur) = current.as_mut() {
                        cur.pause();
                    }
                }
                Ok(AudioCmd::SetPosition(seconds)) => {
                    if let Some(cur) = current.as_mut() {
                        cur.seek(stream.as_ref(), seconds, volume, &events);
                    }
                }
                Ok(AudioCmd::SetVolume(level)) => {
                    volume = clamp_volume(level);
                    if let Some(sink) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                        sink.set_volume(volume);
                    }
                }
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(cur) = current.take() {
                        if let Some(sink) = cur.sink.as_ref() {
                            if cur.playing {
                                fade_out_sink(sink, volume, fade_out_ms);
                            }
                        }
                        cur.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(cur) = current.as_mut() {
                        cur.tick(&events);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
