// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::backend::MediaBackend;
use super::coordinator::PlaybackCoordinator;
use super::state::Track;

/// A play button bound to one episode.
///
/// Each episode entry on a page gets its own control, built from
/// [`EpisodeRecord::track`](crate::feed::EpisodeRecord::track); all of them
/// share the same coordinator, so starting one episode stops any other.
#[derive(Debug)]
pub struct EpisodeControl<'a, B> {
    coordinator: &'a PlaybackCoordinator<B>,
    track: Track,
}

impl<'a, B: MediaBackend> EpisodeControl<'a, B> {
    pub fn new(coordinator: &'a PlaybackCoordinator<B>, track: Track) -> Self {
        Self { coordinator, track }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// True only while this episode is the current one and playing
    pub fn playing(&self) -> bool {
        self.coordinator.is_playing(&self.track)
    }

    /// Start this episode, or pause/resume it if it is already current
    pub fn toggle(&self) -> bool {
        self.coordinator.toggle_track(&self.track)
    }

    /// Accessible label for the button in its current state
    pub fn label(&self) -> String {
        let action = if self.playing() { "Pause" } else { "Play" };
        format!("{} episode {}", action, self.track.title)
    }
}
