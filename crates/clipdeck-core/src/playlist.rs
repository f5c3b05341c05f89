//! Playlist control: the ordered video list and its player commands.
//!
//! [`PlaylistController`] owns the ordered, duplicate-free list of
//! [`VideoReference`]s, mirrors every mutation to the player port, and
//! persists the locator list through a snapshot store after each
//! change. The controller is the single owner of playlist state; the
//! player queue is written to, never read back.
//!
//! Misses are non-fatal. Adding a locator that is already present and
//! removing or playing one that is absent degrade to no-ops, reported
//! through the return value and a log line.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{Error, FileSystemError, PlaylistError, Result};
use crate::locator::{Locator, Playable, Scheme, VideoReference};
use crate::metadata::DisplayNameResolver;
use crate::player::PlayerPort;
use crate::store::SnapshotStore;

/// Remote demo clips offered to first-time users.
pub const SAMPLE_CLIPS: [&str; 5] = [
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerMeltdowns.mp4",
];

/// Ordered, duplicate-free playlist wired to a player port and a
/// snapshot store.
pub struct PlaylistController<P: PlayerPort, S: SnapshotStore> {
    entries: Vec<VideoReference>,
    player: P,
    store: S,
    resolver: DisplayNameResolver,
}

impl<P: PlayerPort, S: SnapshotStore> PlaylistController<P, S> {
    /// Creates an empty controller with the default name resolver.
    #[must_use]
    pub fn new(player: P, store: S) -> Self {
        Self::with_resolver(player, store, DisplayNameResolver::default())
    }

    /// Creates an empty controller with an explicit name resolver.
    #[must_use]
    pub fn with_resolver(player: P, store: S, resolver: DisplayNameResolver) -> Self {
        Self {
            entries: Vec::new(),
            player,
            store,
            resolver,
        }
    }

    /// Rebuilds the playlist from the persisted snapshot, replacing
    /// the in-memory list and the player queue. Duplicate locators in
    /// the snapshot are dropped. Returns how many entries were
    /// restored.
    pub fn restore(&mut self) -> Result<usize> {
        let locators = self.store.load()?;
        self.entries.clear();
        self.player.clear();
        for locator in locators {
            if self.entries.iter().any(|e| e.locator() == &locator) {
                continue;
            }
            let reference = VideoReference::new(locator);
            self.player.append(&reference.playable());
            self.entries.push(reference);
        }
        info!(count = self.entries.len(), "restored playlist from snapshot");
        Ok(self.entries.len())
    }

    /// Appends a reference to the end of the playlist.
    ///
    /// Persists the new list, then forwards an append to the player.
    /// Returns `false` without changing anything when the locator is
    /// already present.
    pub fn add_reference(&mut self, reference: VideoReference) -> Result<bool> {
        if self.contains(reference.locator()) {
            debug!(locator = %reference.locator(), "locator already in playlist, ignoring");
            return Ok(false);
        }
        let playable = reference.playable();
        self.entries.push(reference);
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        self.player.append(&playable);
        Ok(true)
    }

    /// Appends a bare locator with no supplied title.
    pub fn add_locator(&mut self, locator: impl Into<Locator>) -> Result<bool> {
        self.add_reference(VideoReference::new(locator))
    }

    /// Removes the entry with the given locator.
    ///
    /// Persists the shortened list, then tells the player to drop the
    /// queue item at the matching position. The position is matched by
    /// file name, the way a queue that only knows item names can be
    /// addressed. Returns `false` when the locator is not present.
    pub fn remove_reference(&mut self, locator: &Locator) -> Result<bool> {
        let Some(position) = self.entries.iter().position(|e| e.locator() == locator) else {
            warn!(%locator, "remove requested for a locator not in the playlist");
            return Ok(false);
        };
        let queue_position = self.queue_position(locator).unwrap_or(position);
        let removed = self.entries.remove(position);
        if let Err(e) = self.persist() {
            self.entries.insert(position, removed);
            return Err(e);
        }
        self.player.remove_at(queue_position);
        debug!(%locator, queue_position, "removed playlist entry");
        Ok(true)
    }

    /// Starts playback of the entry with the given locator.
    ///
    /// A locator that is not in the playlist is a no-op; playback
    /// state is left untouched and `false` is returned.
    pub fn play(&mut self, locator: &Locator) -> bool {
        let Some(entry) = self.entries.iter().find(|e| e.locator() == locator) else {
            debug!(%locator, "play requested for a locator not in the playlist");
            return false;
        };
        let playable = entry.playable();
        self.player.set_active(&playable);
        true
    }

    /// Plays a clip that is not part of the playlist, typically a
    /// just-finished capture still sitting in transient storage.
    pub fn preview(&mut self, locator: &Locator) {
        debug!(%locator, "previewing clip outside the playlist");
        self.player.set_active(&Playable::new(locator.clone()));
    }

    /// Pauses playback.
    pub fn pause(&mut self) {
        self.player.pause();
    }

    /// Resumes playback.
    pub fn resume(&mut self) {
        self.player.resume();
    }

    /// Empties the playlist and the player queue.
    pub fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        self.player.clear();
        info!("cleared playlist");
        Ok(())
    }

    /// Display name for a locator. Entries resolve with their supplied
    /// metadata; unknown locators still resolve through the fallback
    /// chain. Never empty.
    #[must_use]
    pub fn display_name(&self, locator: &Locator) -> String {
        if let Some(entry) = self.entries.iter().find(|e| e.locator() == locator) {
            self.resolver.resolve(entry)
        } else {
            self.resolver.resolve(&VideoReference::new(locator.clone()))
        }
    }

    /// Display names of all entries, in playlist order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| self.resolver.resolve(e))
            .collect()
    }

    /// Adds the built-in sample clips, skipping ones already present.
    /// Returns how many were added.
    pub fn seed_samples(&mut self) -> Result<usize> {
        let mut added = 0;
        for url in SAMPLE_CLIPS {
            if self.add_reference(VideoReference::new(url))? {
                added += 1;
            }
        }
        info!(added, "seeded sample clips");
        Ok(added)
    }

    /// Deletes a clip's file from disk and removes its entry.
    ///
    /// Only file locators are deletable; remote and content locators
    /// are rejected with [`PlaylistError::NotDeletable`] and no state
    /// changes. A file that is already gone still has its entry
    /// removed.
    pub fn delete_clip(&mut self, locator: &Locator) -> Result<()> {
        if locator.scheme() != Scheme::File {
            let scheme = locator.scheme_str().unwrap_or("remote").to_string();
            warn!(%locator, %scheme, "refusing to delete a non-file clip");
            return Err(Error::Playlist(PlaylistError::NotDeletable {
                locator: locator.as_str().to_string(),
                scheme,
            }));
        }

        let Some(path) = locator.to_path() else {
            return Err(Error::FileSystem(FileSystemError::InvalidPath {
                path: PathBuf::from(locator.as_str()),
            }));
        };
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                Error::FileSystem(FileSystemError::DeleteFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            })?;
            info!(path = %path.display(), "deleted clip file");
        } else {
            warn!(path = %path.display(), "clip file already gone, removing its entry only");
        }

        self.remove_reference(locator)?;
        Ok(())
    }

    /// Whether an entry with the given locator exists.
    #[must_use]
    pub fn contains(&self, locator: &Locator) -> bool {
        self.entries.iter().any(|e| e.locator() == locator)
    }

    /// Entries in playlist order.
    #[must_use]
    pub fn entries(&self) -> &[VideoReference] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the playlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The wired player port.
    #[must_use]
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Mutable access to the wired player port.
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Queue position of the first item whose file name matches the
    /// locator's. `None` when the locator has no file name.
    fn queue_position(&self, locator: &Locator) -> Option<usize> {
        let target = locator.last_segment()?;
        self.entries
            .iter()
            .position(|e| e.locator().last_segment() == Some(target))
    }

    fn persist(&self) -> Result<()> {
        let locators: Vec<Locator> = self.entries.iter().map(|e| e.locator().clone()).collect();
        self.store.replace(&locators)
    }
}
