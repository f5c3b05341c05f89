//! Player port: the seam between the playlist and the platform player.
//!
//! The playlist never talks to a concrete media player. It issues
//! commands through [`PlayerPort`] and the embedder wires the trait to
//! whatever queue-based player the platform offers. The port carries
//! no state the playlist relies on; the playlist's own entry list is
//! the source of truth and queue positions are mirrored from it.

use crate::locator::Playable;

/// Commands a queue-based platform player accepts.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerPort {
    /// Appends an item to the end of the player queue.
    fn append(&mut self, item: &Playable);

    /// Replaces the active item and starts playing it.
    fn set_active(&mut self, item: &Playable);

    /// Removes the queue item at `index`.
    fn remove_at(&mut self, index: usize);

    /// Drops every queued item.
    fn clear(&mut self);

    /// Pauses playback.
    fn pause(&mut self);

    /// Resumes playback.
    fn resume(&mut self);
}

/// Player that discards every command.
///
/// Useful for headless embedders and for driving the playlist in tests
/// where player interaction is irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

impl PlayerPort for NullPlayer {
    fn append(&mut self, _item: &Playable) {}

    fn set_active(&mut self, _item: &Playable) {}

    fn remove_at(&mut self, _index: usize) {}

    fn clear(&mut self) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;

    #[test]
    fn null_player_accepts_every_command() {
        let mut player = NullPlayer;
        let item = Playable::new(Locator::new("https://example.com/clip.mp4"));
        player.append(&item);
        player.set_active(&item);
        player.remove_at(0);
        player.clear();
        player.pause();
        player.resume();
    }
}
