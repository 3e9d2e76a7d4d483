use crate::catalog::{Catalog, file_url};
use crate::mpris::MprisHandle;
use crate::playback::PlaybackSession;

pub fn update_mpris(mpris: &MprisHandle, session: &PlaybackSession, catalog: &Catalog) {
    let (url, art_url) = match &session.current_track {
        Some(track) => (
            Some(catalog.audio_source(track).url()),
            catalog.cover_path(track).map(|p| file_url(&p)),
        ),
        None => (None, None),
    };
    mpris.update(session, url, art_url);
}
