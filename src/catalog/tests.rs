use super::*;
use std::fs;
use tempfile::tempdir;

const MANIFEST: &str = r#"
[[beats]]
id = "beat_3f9a1c"
name = "Midnight Drive"
genre = "Trap"
bpm = 140
key = "C# minor"
mood = "Dark"
audio = "audio/beat_3f9a1c.mp3"
cover = "covers/beat_3f9a1c.png"
prices = { basic = 29.0, premium = 79.0, exclusive = 299.0 }
plays = 12

[[beats]]
id = "beat_77d0e2"
name = "Sunday Soul"
audio = "audio/beat_77d0e2.mp3"
"#;

#[test]
fn load_prefers_manifest_over_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("catalog.toml"), MANIFEST).unwrap();
    fs::write(dir.path().join("stray.mp3"), b"not listed").unwrap();

    let catalog = Catalog::load(dir.path(), &CatalogSettings::default()).unwrap();
    assert_eq!(catalog.len(), 2);

    let first = catalog.get(&TrackId::from("beat_3f9a1c")).unwrap();
    assert_eq!(first.name, "Midnight Drive");
    assert_eq!(first.bpm, Some(140));
    assert_eq!(first.prices.exclusive, 299.0);
    assert_eq!(first.subtitle(), "Trap • 140 BPM • C# minor");

    let second = catalog.get(&TrackId::from("beat_77d0e2")).unwrap();
    assert_eq!(second.genre, "");
    assert_eq!(second.prices, Prices::default());
    assert!(catalog.get(&TrackId::from("stray")).is_none());
}

#[test]
fn load_scans_when_manifest_is_absent() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("loop_one.mp3"), b"not real").unwrap();

    let catalog = Catalog::load(dir.path(), &CatalogSettings::default()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.tracks()[0].id, TrackId::from("loop_one.mp3"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("catalog.toml"),
        r#"
[[beats]]
id = "dup"
name = "One"
audio = "a.mp3"

[[beats]]
id = "dup"
name = "Two"
audio = "b.mp3"
"#,
    )
    .unwrap();

    let err = Catalog::load(dir.path(), &CatalogSettings::default()).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "dup"));
}

#[test]
fn malformed_manifest_reports_its_path() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("catalog.toml"), "[[beats]]\nname = 3").unwrap();

    let err = Catalog::load(dir.path(), &CatalogSettings::default()).unwrap_err();
    match err {
        CatalogError::Manifest { path, .. } => assert!(path.ends_with("catalog.toml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resolve_returns_track_and_rooted_source() {
    let catalog = Catalog::from_tracks(
        "/srv/beats",
        vec![Track {
            id: TrackId::from("t1"),
            name: "T1".into(),
            genre: String::new(),
            bpm: None,
            key: String::new(),
            mood: String::new(),
            cover: Some("covers/t1.png".into()),
            audio: "audio/t1.mp3".into(),
            prices: Prices::default(),
            plays: 0,
        }],
    );

    let (track, source) = catalog.resolve(&TrackId::from("t1")).unwrap();
    assert_eq!(track.name, "T1");
    assert_eq!(source.path, PathBuf::from("/srv/beats/audio/t1.mp3"));
    assert_eq!(
        catalog.cover_path(&track),
        Some(PathBuf::from("/srv/beats/covers/t1.png"))
    );
    assert!(catalog.resolve(&TrackId::from("nope")).is_none());
}

#[test]
fn merge_play_counts_never_lowers_manifest_values() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("catalog.toml"), MANIFEST).unwrap();
    let mut catalog = Catalog::load(dir.path(), &CatalogSettings::default()).unwrap();

    let mut counts = BTreeMap::new();
    counts.insert(TrackId::from("beat_3f9a1c"), 3);
    counts.insert(TrackId::from("beat_77d0e2"), 5);
    catalog.merge_play_counts(&counts);

    assert_eq!(catalog.get(&TrackId::from("beat_3f9a1c")).unwrap().plays, 12);
    assert_eq!(catalog.get(&TrackId::from("beat_77d0e2")).unwrap().plays, 5);
}
