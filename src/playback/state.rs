// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use url::Url;

/// What the player needs to know about an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub src: Url,
    pub mime_type: String,
    /// Site-relative link to the episode page
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Unloaded,
    Paused,
    Playing,
}

/// Observable player state shared with every display subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub status: PlaybackStatus,
    /// Position in seconds
    pub current_time: f64,
    /// Length in seconds, 0 until the media reports it
    pub duration: f64,
    pub muted: bool,
    pub playback_rate: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            status: PlaybackStatus::Unloaded,
            current_time: 0.0,
            duration: 0.0,
            muted: false,
            playback_rate: 1.0,
        }
    }
}

impl PlaybackState {
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Whether `track` is the loaded track
    pub fn is_current(&self, track: &Track) -> bool {
        self.current.as_ref() == Some(track)
    }

    /// Fraction of the track played, in `[0, 1]`; 0 while the duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Clamp a position to the playable range of the current track
    pub(crate) fn clamp_position(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() {
            return self.current_time;
        }
        let seconds = seconds.max(0.0);
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }
}
