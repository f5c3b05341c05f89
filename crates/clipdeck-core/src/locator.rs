//! Video locators and the references built from them.
//!
//! A [`Locator`] is the opaque string identifying where a video lives
//! (remote URL, local file, platform content handle). A
//! [`VideoReference`] wraps a locator together with optional display
//! metadata and is the unit the playlist manages. Two references are
//! the same entry exactly when their locators are equal.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of location a locator points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Remote address (`http` or `https`).
    Remote,
    /// Durable local file (`file` prefix or a bare path).
    File,
    /// Platform content handle (`content`).
    Content,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::File => write!(f, "file"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// Opaque string identifying a video's location.
///
/// Locators compare byte-for-byte; no normalization is applied. A
/// string without a recognizable scheme prefix is treated as a plain
/// file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Creates a locator from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Creates a locator for a local file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    /// The raw locator string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies the locator by its scheme prefix.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        match self.scheme_str() {
            Some("http" | "https") => Scheme::Remote,
            Some("content") => Scheme::Content,
            _ => Scheme::File,
        }
    }

    /// The raw scheme prefix, if the locator carries one.
    ///
    /// Single-letter prefixes are not treated as schemes so Windows
    /// drive paths stay plain file paths.
    #[must_use]
    pub fn scheme_str(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once(':')?;
        let mut chars = scheme.chars();
        let starts_alphabetic = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let rest_valid =
            chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
        if scheme.len() > 1 && starts_alphabetic && rest_valid {
            Some(scheme)
        } else {
            None
        }
    }

    /// Last non-empty path segment of the locator, if any.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        last_nonempty_segment(&self.0)
    }

    /// File system path for file locators; `None` for other schemes.
    #[must_use]
    pub fn to_path(&self) -> Option<PathBuf> {
        if self.scheme() != Scheme::File {
            return None;
        }
        let raw = self.0.strip_prefix("file://").unwrap_or(&self.0);
        Some(PathBuf::from(raw))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locator {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Locator {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Last non-empty `/`-separated segment of a raw string.
pub(crate) fn last_nonempty_segment(raw: &str) -> Option<&str> {
    raw.rsplit('/').find(|segment| !segment.is_empty())
}

/// A video the playlist knows about: a locator plus optional display
/// metadata supplied by the embedder.
///
/// Equality is by locator alone so the playlist's no-duplicates rule
/// ignores differing titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoReference {
    locator: Locator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplied_title: Option<String>,
}

impl VideoReference {
    /// Creates a reference with no supplied title.
    pub fn new(locator: impl Into<Locator>) -> Self {
        Self {
            locator: locator.into(),
            supplied_title: None,
        }
    }

    /// Attaches a title supplied by the embedder.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.supplied_title = Some(title.into());
        self
    }

    /// The locator identifying this video.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Title supplied by the embedder, if any.
    #[must_use]
    pub fn supplied_title(&self) -> Option<&str> {
        self.supplied_title.as_deref()
    }

    /// Builds the playable form handed to the player port.
    #[must_use]
    pub fn playable(&self) -> Playable {
        Playable {
            locator: self.locator.clone(),
            title: self.supplied_title.clone(),
        }
    }
}

impl PartialEq for VideoReference {
    fn eq(&self, other: &Self) -> bool {
        self.locator == other.locator
    }
}

impl Eq for VideoReference {}

/// Handle the player port activates. Carries the locator verbatim and
/// whatever title the reference supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playable {
    locator: Locator,
    title: Option<String>,
}

impl Playable {
    /// Creates a playable with no title.
    pub fn new(locator: impl Into<Locator>) -> Self {
        Self {
            locator: locator.into(),
            title: None,
        }
    }

    /// The locator this playable activates.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Title carried by the playable form, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn https_locator_is_remote() {
        let locator = Locator::new("https://example.com/videos/clip.mp4");
        assert_eq!(locator.scheme(), Scheme::Remote);
        assert_eq!(locator.scheme_str(), Some("https"));
    }

    #[test]
    fn content_locator_is_content() {
        let locator = Locator::new("content://media/external/video/42");
        assert_eq!(locator.scheme(), Scheme::Content);
    }

    #[test]
    fn bare_path_is_file() {
        let locator = Locator::new("/movies/Clipdeck/video_abc.mp4");
        assert_eq!(locator.scheme(), Scheme::File);
        assert_eq!(locator.scheme_str(), None);
    }

    #[test]
    fn windows_drive_is_not_a_scheme() {
        let locator = Locator::new("C:/movies/clip.mp4");
        assert_eq!(locator.scheme_str(), None);
        assert_eq!(locator.scheme(), Scheme::File);
    }

    #[test]
    fn last_segment_takes_the_tail() {
        let locator = Locator::new("https://example.com/a/b/clip.mp4");
        assert_eq!(locator.last_segment(), Some("clip.mp4"));
    }

    #[test]
    fn last_segment_skips_trailing_slash() {
        let locator = Locator::new("https://example.com/videos/");
        assert_eq!(locator.last_segment(), Some("videos"));
    }

    #[test]
    fn last_segment_without_slashes_is_the_whole_string() {
        let locator = Locator::new("clip.mp4");
        assert_eq!(locator.last_segment(), Some("clip.mp4"));
    }

    #[test]
    fn file_locator_round_trips_through_path() {
        let path = Path::new("/movies/Clipdeck/video_abc.mp4");
        let locator = Locator::from_path(path);
        assert_eq!(locator.as_str(), "file:///movies/Clipdeck/video_abc.mp4");
        assert_eq!(locator.to_path().unwrap(), path);
    }

    #[test]
    fn remote_locator_has_no_path() {
        let locator = Locator::new("https://example.com/clip.mp4");
        assert!(locator.to_path().is_none());
    }

    #[test]
    fn references_compare_by_locator_only() {
        let plain = VideoReference::new("https://example.com/clip.mp4");
        let titled = VideoReference::new("https://example.com/clip.mp4").with_title("My clip");
        assert_eq!(plain, titled);
    }

    #[test]
    fn references_with_different_locators_differ() {
        let a = VideoReference::new("https://example.com/a.mp4");
        let b = VideoReference::new("https://example.com/b.mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn playable_carries_locator_and_title() {
        let reference = VideoReference::new("https://example.com/clip.mp4").with_title("My clip");
        let playable = reference.playable();
        assert_eq!(playable.locator().as_str(), "https://example.com/clip.mp4");
        assert_eq!(playable.title(), Some("My clip"));
    }

    #[test]
    fn locator_serializes_transparently() {
        let locator = Locator::new("https://example.com/clip.mp4");
        let json = serde_json::to_string(&locator).unwrap();
        assert_eq!(json, "\"https://example.com/clip.mp4\"");
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, locator);
    }
}
