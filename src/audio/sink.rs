//! Opening audio files and preparing `rodio` sinks for them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

type FileDecoder = Decoder<BufReader<File>>;

fn open_decoder(path: &Path) -> Result<FileDecoder, PlaybackError> {
    let file = File::open(path)
        .map_err(|e| PlaybackError::Load(format!("{}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::Decode(format!("{}: {e}", path.display())))
}

/// Open and decode `path` once, returning its duration.
///
/// The decoder's own estimate wins; container metadata is the fallback. An
/// unknown duration comes back as `Duration::ZERO`.
pub(super) fn probe(path: &Path) -> Result<Duration, PlaybackError> {
    let decoder = open_decoder(path)?;
    let duration = Source::total_duration(&decoder)
        .or_else(|| {
            lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration())
        })
        .unwrap_or(Duration::ZERO);
    Ok(duration)
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, PlaybackError> {
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
