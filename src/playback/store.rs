use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use crate::audio::{
    EngineEvent, EngineMessage, LoadTicket, MediaEngine, clamp_position, clamp_volume,
};
use crate::catalog::{AudioSource, PlayReporter, Track};

use super::drag::DragCoordinator;
use super::session::{PlayState, PlaybackSession};

/// The single writer of the [`PlaybackSession`].
///
/// Trigger sites call the operations below; engine observations are fed in
/// through [`PlaybackStore::handle_engine_event`] in the order they were
/// emitted. Every change is published to subscribers as a fresh snapshot.
pub struct PlaybackStore<E: MediaEngine> {
    engine: E,
    session: PlaybackSession,
    /// Ticket of the load the session currently reflects.
    ticket: Option<LoadTicket>,
    source: Option<AudioSource>,
    next_seq: u64,
    drag: DragCoordinator,
    reporter: Option<Box<dyn PlayReporter>>,
    /// The current selection has been counted as a play.
    reported: bool,
    /// Set by `Ended`; the next resume starts from 0 unless a seek
    /// happened in between.
    rewind_pending: bool,
    subscribers: Vec<Sender<PlaybackSession>>,
    revision: u64,
}

impl<E: MediaEngine> PlaybackStore<E> {
    pub fn new(mut engine: E, initial_volume: f32) -> Self {
        let volume = clamp_volume(initial_volume);
        engine.set_volume(volume);
        Self {
            engine,
            session: PlaybackSession::new(volume),
            ticket: None,
            source: None,
            next_seq: 0,
            drag: DragCoordinator::new(),
            reporter: None,
            reported: false,
            rewind_pending: false,
            subscribers: Vec::new(),
            revision: 0,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn PlayReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Bumped on every published change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Receive a snapshot now and after every subsequent change.
    pub fn subscribe(&mut self) -> Receiver<PlaybackSession> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.session.clone());
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self) {
        self.revision += 1;
        let snapshot = &self.session;
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    /// Play `track` from `source`, or toggle it if it is already selected.
    pub fn play_beat(&mut self, track: Track, source: &AudioSource) {
        if self.session.is_current(&track.id) {
            self.toggle_play_pause();
            return;
        }

        if self.drag.abort() {
            debug!("track changed mid-drag, gesture aborted");
        }
        debug!(track = %track.id, "selecting track");

        self.session.current_track = Some(track);
        self.session.is_seeking = false;
        self.reported = false;
        self.source = Some(source.clone());
        self.load_current();
        self.start_playing();
        self.publish();
    }

    fn load_current(&mut self) {
        let (Some(id), Some(source)) = (self.session.current_id().cloned(), self.source.clone())
        else {
            return;
        };

        self.next_seq += 1;
        let ticket = LoadTicket::new(self.next_seq, id);
        self.session.position_seconds = 0.0;
        self.session.duration_seconds = 0.0;
        self.session.last_error = None;
        self.rewind_pending = false;
        self.engine.load(ticket.clone(), &source);
        self.ticket = Some(ticket);
    }

    fn start_playing(&mut self) {
        match self.engine.play() {
            Ok(()) => {
                self.session.play_state = PlayState::Playing;
            }
            Err(e) => {
                warn!(error = %e, "play request rejected");
                self.session.play_state = PlayState::Paused;
                self.session.last_error = Some(e);
            }
        }
    }

    /// Count the current selection once, after the engine has shown it is
    /// actually advancing.
    fn report_if_started(&mut self) {
        if self.reported || self.session.play_state != PlayState::Playing {
            return;
        }
        self.reported = true;
        if let (Some(reporter), Some(track)) =
            (self.reporter.as_ref(), self.session.current_track.as_ref())
        {
            reporter.report_play(&track.id);
        }
    }

    /// Flip between playing and paused. From `Stopped` (after the track ended)
    /// this replays from the start, or from wherever a later seek put it;
    /// after a load failure it reloads first.
    pub fn toggle_play_pause(&mut self) {
        if self.session.current_track.is_none() {
            return;
        }

        match self.session.play_state {
            PlayState::Playing => {
                self.engine.pause();
                self.session.play_state = PlayState::Paused;
            }
            PlayState::Paused | PlayState::Stopped => {
                if self.session.last_error.is_some() {
                    debug!("retrying after playback error");
                    self.load_current();
                } else if self.rewind_pending {
                    self.engine.set_position(0.0);
                    self.session.position_seconds = 0.0;
                }
                self.rewind_pending = false;
                self.start_playing();
            }
        }
        self.publish();
    }

    /// Commit a position. Always ends any scrub gesture.
    pub fn seek(&mut self, seconds: f64) {
        self.drag.abort();
        self.session.is_seeking = false;

        if self.session.current_track.is_some() {
            let target = clamp_position(seconds, self.session.duration_seconds);
            self.engine.set_position(target);
            self.session.position_seconds = target;
            self.rewind_pending = false;
        }
        self.publish();
    }

    pub fn change_volume(&mut self, level: f32) {
        let level = clamp_volume(level);
        self.engine.set_volume(level);
        self.session.volume = level;
        self.publish();
    }

    /// Return to the initial session, keeping only the volume.
    pub fn stop_playback(&mut self) {
        self.engine.pause();
        self.drag.abort();
        self.ticket = None;
        self.source = None;
        self.reported = false;
        self.rewind_pending = false;
        self.session = PlaybackSession::new(self.session.volume);
        self.publish();
    }

    /// Apply one engine observation. Returns whether the session changed.
    pub fn handle_engine_event(&mut self, msg: EngineMessage) -> bool {
        let current = self.ticket.as_ref().is_some_and(|t| {
            *t == msg.ticket && self.session.is_current(&msg.ticket.track)
        });
        if !current {
            debug!(track = %msg.ticket.track, seq = msg.ticket.seq, "discarding stale engine event");
            return false;
        }

        match msg.event {
            EngineEvent::TimeUpdate(t) => {
                self.report_if_started();
                if self.session.is_seeking {
                    return false;
                }
                self.session.position_seconds = clamp_position(t, self.session.duration_seconds);
            }
            EngineEvent::MetadataLoaded(d) => {
                let d = if d.is_finite() { d.max(0.0) } else { 0.0 };
                self.session.duration_seconds = d;
                self.session.position_seconds = clamp_position(self.session.position_seconds, d);
            }
            EngineEvent::Ended => {
                debug!(track = %msg.ticket.track, "playback ended");
                self.report_if_started();
                self.session.position_seconds = 0.0;
                self.session.play_state = PlayState::Stopped;
                self.rewind_pending = true;
            }
            EngineEvent::Error(e) => {
                warn!(track = %msg.ticket.track, error = %e, "engine reported an error");
                self.session.play_state = PlayState::Paused;
                self.session.last_error = Some(e);
            }
        }
        self.publish();
        true
    }

    /// Begin a scrub gesture at the displayed position.
    pub fn on_drag_start(&mut self) {
        if self.session.current_track.is_none() {
            return;
        }
        let baseline = self.displayed_position();
        self.drag.start(self.next_seq, baseline);
        self.session.is_seeking = true;
        self.publish();
    }

    /// Move the scrub display value. The engine is not touched.
    pub fn on_drag_move(&mut self, candidate: f64) {
        let candidate = clamp_position(candidate, self.session.duration_seconds);
        self.drag.update(candidate);
    }

    /// Commit the gesture with a single seek, unless it was aborted.
    pub fn on_drag_end(&mut self, final_position: f64) {
        match self.drag.finish(self.next_seq, final_position) {
            Some(position) => self.seek(position),
            None => {
                if self.session.is_seeking {
                    self.session.is_seeking = false;
                    self.publish();
                }
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// The position a progress display should show right now.
    pub fn displayed_position(&self) -> f64 {
        match self.drag.value() {
            Some(v) if self.session.is_seeking => v,
            _ => self.session.position_seconds,
        }
    }
}
