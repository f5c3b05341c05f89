//! Display-name resolution for video references.
//!
//! A playlist entry's visible name comes from an ordered chain of
//! resolvers, each consulted in turn until one produces a non-empty
//! name:
//!
//! 1. [`ContentIndexResolver`] - platform content index lookup, only
//!    for locators the index can resolve
//! 2. [`SuppliedTitleResolver`] - title the embedder attached to the
//!    reference
//! 3. [`PathSegmentResolver`] - last path segment of the locator
//!
//! If the whole chain comes up empty the name falls back to
//! [`UNKNOWN_NAME`], so a display name is never empty.

use std::sync::Arc;

use tracing::debug;

use crate::locator::{Locator, Scheme, VideoReference, last_nonempty_segment};

/// Name used when no resolver produces one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Single-row display-name lookup against the platform content index.
///
/// Implementations wrap whatever the host platform offers (a media
/// database, an extended-attribute store). Lookups are read-only and
/// must tolerate absent rows by returning `None`.
#[cfg_attr(test, mockall::automock)]
pub trait ContentIndex: Send + Sync {
    /// Display-name column for the locator's row, if the index has one.
    fn display_name(&self, locator: &Locator) -> Option<String>;
}

/// Content index that resolves nothing, for embedders without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContentIndex;

impl ContentIndex for NoContentIndex {
    fn display_name(&self, _locator: &Locator) -> Option<String> {
        None
    }
}

/// One strategy in the display-name fallback chain.
pub trait NameResolver: Send + Sync {
    /// Name for the reference, or `None` if this strategy cannot tell.
    fn resolve(&self, reference: &VideoReference) -> Option<String>;
}

/// Resolves names through the platform content index.
///
/// Only locators with the `content` scheme are sent to the index;
/// everything else is passed over without a query. The index value is
/// reduced to its last path segment.
pub struct ContentIndexResolver {
    index: Arc<dyn ContentIndex>,
}

impl ContentIndexResolver {
    /// Creates a resolver backed by the given index.
    pub fn new(index: Arc<dyn ContentIndex>) -> Self {
        Self { index }
    }
}

impl NameResolver for ContentIndexResolver {
    fn resolve(&self, reference: &VideoReference) -> Option<String> {
        if reference.locator().scheme() != Scheme::Content {
            return None;
        }
        let value = self.index.display_name(reference.locator())?;
        last_nonempty_segment(&value).map(str::to_string)
    }
}

/// Resolves names from the title the embedder supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppliedTitleResolver;

impl NameResolver for SuppliedTitleResolver {
    fn resolve(&self, reference: &VideoReference) -> Option<String> {
        reference
            .supplied_title()
            .filter(|title| !title.is_empty())
            .map(str::to_string)
    }
}

/// Resolves names from the locator's last path segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegmentResolver;

impl NameResolver for PathSegmentResolver {
    fn resolve(&self, reference: &VideoReference) -> Option<String> {
        reference.locator().last_segment().map(str::to_string)
    }
}

/// Ordered chain of name resolvers with an "Unknown" floor.
pub struct DisplayNameResolver {
    resolvers: Vec<Box<dyn NameResolver>>,
}

impl DisplayNameResolver {
    /// Creates a resolver from an explicit chain, consulted in order.
    #[must_use]
    pub fn new(resolvers: Vec<Box<dyn NameResolver>>) -> Self {
        Self { resolvers }
    }

    /// The full chain: content index, supplied title, path segment.
    #[must_use]
    pub fn with_content_index(index: Arc<dyn ContentIndex>) -> Self {
        Self::new(vec![
            Box::new(ContentIndexResolver::new(index)),
            Box::new(SuppliedTitleResolver),
            Box::new(PathSegmentResolver),
        ])
    }

    /// Display name for the reference. Never empty.
    #[must_use]
    pub fn resolve(&self, reference: &VideoReference) -> String {
        for resolver in &self.resolvers {
            if let Some(name) = resolver.resolve(reference) {
                if !name.is_empty() {
                    return name;
                }
            }
        }
        debug!(
            locator = %reference.locator(),
            "no resolver produced a display name, using fallback"
        );
        UNKNOWN_NAME.to_string()
    }
}

impl Default for DisplayNameResolver {
    /// Chain without a content index: supplied title, then path segment.
    fn default() -> Self {
        Self::new(vec![
            Box::new(SuppliedTitleResolver),
            Box::new(PathSegmentResolver),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn content_index_wins_over_title_and_segment() {
        let mut index = MockContentIndex::new();
        index
            .expect_display_name()
            .returning(|_| Some("Recordings/Morning ride.mp4".to_string()));
        let resolver = DisplayNameResolver::with_content_index(Arc::new(index));

        let reference =
            VideoReference::new("content://media/external/video/42").with_title("Attached title");
        assert_eq!(resolver.resolve(&reference), "Morning ride.mp4");
    }

    #[test]
    fn index_is_not_consulted_for_remote_locators() {
        // The mock has no expectations, so any call would fail the test.
        let index = MockContentIndex::new();
        let resolver = DisplayNameResolver::with_content_index(Arc::new(index));

        let reference = VideoReference::new("https://example.com/clip.mp4");
        assert_eq!(resolver.resolve(&reference), "clip.mp4");
    }

    #[test]
    fn supplied_title_beats_path_segment() {
        let resolver = DisplayNameResolver::default();
        let reference = VideoReference::new("https://example.com/clip.mp4").with_title("My clip");
        assert_eq!(resolver.resolve(&reference), "My clip");
    }

    #[test]
    fn path_segment_is_the_last_resort_before_unknown() {
        let resolver = DisplayNameResolver::default();
        let reference = VideoReference::new("https://example.com/videos/clip.mp4");
        assert_eq!(resolver.resolve(&reference), "clip.mp4");
    }

    #[test]
    fn empty_title_falls_through_to_segment() {
        let resolver = DisplayNameResolver::default();
        let reference = VideoReference::new("https://example.com/clip.mp4").with_title("");
        assert_eq!(resolver.resolve(&reference), "clip.mp4");
    }

    #[test]
    fn unresolvable_reference_is_unknown() {
        let resolver = DisplayNameResolver::default();
        let reference = VideoReference::new("");
        assert_eq!(resolver.resolve(&reference), UNKNOWN_NAME);
    }

    #[test]
    fn index_miss_falls_through_the_chain() {
        let mut index = MockContentIndex::new();
        index.expect_display_name().returning(|_| None);
        let resolver = DisplayNameResolver::with_content_index(Arc::new(index));

        let reference = VideoReference::new("content://media/external/video/42");
        // A bare content locator still has a last segment.
        assert_eq!(resolver.resolve(&reference), "42");
    }

    #[test]
    fn index_value_without_separator_is_used_whole() {
        let mut index = MockContentIndex::new();
        index
            .expect_display_name()
            .returning(|_| Some("holiday.mp4".to_string()));
        let resolver = DisplayNameResolver::with_content_index(Arc::new(index));

        let reference = VideoReference::new("content://media/external/video/7");
        assert_eq!(resolver.resolve(&reference), "holiday.mp4");
    }

    #[test]
    fn no_content_index_resolves_nothing() {
        let locator = Locator::new("content://media/external/video/42");
        assert!(NoContentIndex.display_name(&locator).is_none());
    }
}
