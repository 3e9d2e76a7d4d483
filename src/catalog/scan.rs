//! Manifest-less catalogs: build tracks from the audio files under a directory.

use std::path::Path;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::{Prices, Track, TrackId};

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Parse a BPM tag value such as `"140"` or `"92.5"`.
fn parse_bpm(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value.round() as u32)
    } else {
        None
    }
}

/// Root-relative path with `/` separators, extension kept. Unique per file,
/// so `a/loop.mp3` and `b/loop.wav` never share an id.
fn relative_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub(super) fn scan(root: &Path, settings: &CatalogSettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);
    if let Some(d) = settings.max_depth {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let id = relative_id(root, path);
        let mut name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut genre = String::new();
        let mut bpm: Option<u32> = None;
        let mut key = String::new();

        if let Ok(tagged) = lofty::read_from_path(path) {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_empty(tag.get_string(&ItemKey::TrackTitle)) {
                    name = v;
                }
                if let Some(v) = non_empty(tag.get_string(&ItemKey::Genre)) {
                    genre = v;
                }
                bpm = tag
                    .get_string(&ItemKey::Bpm)
                    .or_else(|| tag.get_string(&ItemKey::IntegerBpm))
                    .and_then(parse_bpm);
                if let Some(v) = non_empty(tag.get_string(&ItemKey::InitialKey)) {
                    key = v;
                }
            }
        }

        tracks.push(Track {
            audio: id.clone(),
            id: TrackId::new(id),
            name,
            genre,
            bpm,
            key,
            mood: String::new(),
            cover: None,
            prices: Prices::default(),
            plays: 0,
        });
    }

    tracks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = CatalogSettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.zip"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn parse_bpm_rounds_and_rejects_garbage() {
        assert_eq!(parse_bpm("140"), Some(140));
        assert_eq!(parse_bpm(" 92.6 "), Some(93));
        assert_eq!(parse_bpm("fast"), None);
        assert_eq!(parse_bpm("0"), None);
    }

    #[test]
    fn scan_uses_relative_paths_as_ids_and_locators() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("audio")).unwrap();
        fs::write(dir.path().join("audio/b_beat.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("audio/a_beat.wav"), b"not a real wav").unwrap();
        fs::write(dir.path().join("cover.png"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &CatalogSettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::from("audio/a_beat.wav"));
        assert_eq!(tracks[0].name, "a_beat");
        assert_eq!(
            Path::new(&tracks[0].audio),
            Path::new("audio").join("a_beat.wav")
        );
        assert_eq!(tracks[1].id, TrackId::from("audio/b_beat.MP3"));
    }

    #[test]
    fn same_stem_files_get_distinct_ids() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/loop.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("b/loop.wav"), b"not real").unwrap();
        fs::write(dir.path().join("beat.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("beat.wav"), b"not real").unwrap();

        let tracks = scan(dir.path(), &CatalogSettings::default());
        assert_eq!(tracks.len(), 4);
        let mut ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a/loop.mp3", "b/loop.wav", "beat.mp3", "beat.wav"]);

        let catalog = crate::catalog::Catalog::from_tracks(dir.path(), tracks);
        let (_, source) = catalog.resolve(&TrackId::from("b/loop.wav")).unwrap();
        assert_eq!(source.path, dir.path().join("b").join("loop.wav"));
    }

    #[test]
    fn scan_skips_hidden_entries_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".draft.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("final.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &CatalogSettings::default());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "final");
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        let settings = CatalogSettings {
            max_depth: Some(2),
            ..CatalogSettings::default()
        };
        let names: Vec<String> = scan(dir.path(), &settings)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert!(names.contains(&"root".to_string()));
        assert!(names.contains(&"one".to_string()));
        assert!(!names.contains(&"two".to_string()));
    }
}
