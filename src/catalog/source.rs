use std::path::{Path, PathBuf};

/// A concrete, engine-loadable audio location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub path: PathBuf,
}

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `file://` URL form, used for desktop metadata.
    pub fn url(&self) -> String {
        file_url(&self.path)
    }
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Resolve a manifest locator against the catalog root.
///
/// Accepts `file://` URLs, absolute paths and root-relative paths. A leading
/// `/` that does not exist on disk but does exist under the root is treated as
/// root-relative.
pub(super) fn resolve_locator(root: &Path, locator: &str) -> PathBuf {
    let trimmed = locator.trim();
    let raw = trimmed.strip_prefix("file://").unwrap_or(trimmed);
    let candidate = PathBuf::from(raw);

    if candidate.is_absolute() {
        if candidate.exists() {
            return candidate;
        }
        let rerooted = root.join(raw.trim_start_matches('/'));
        if rerooted.exists() {
            return rerooted;
        }
        return candidate;
    }

    root.join(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_locators_join_the_root() {
        assert_eq!(
            resolve_locator(Path::new("/srv/beats"), "audio/x.mp3"),
            PathBuf::from("/srv/beats/audio/x.mp3")
        );
    }

    #[test]
    fn file_urls_are_stripped() {
        assert_eq!(
            resolve_locator(Path::new("/srv/beats"), "file:///music/x.mp3"),
            PathBuf::from("/music/x.mp3")
        );
    }

    #[test]
    fn missing_absolute_paths_are_rerooted_when_present_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/x.mp3"), b"x").unwrap();

        assert_eq!(
            resolve_locator(dir.path(), "/audio/x.mp3"),
            dir.path().join("audio/x.mp3")
        );
    }

    #[test]
    fn url_uses_file_scheme() {
        assert_eq!(AudioSource::new("/a/b.mp3").url(), "file:///a/b.mp3");
    }
}
