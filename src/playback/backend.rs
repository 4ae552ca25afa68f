// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

/// The media element the coordinator drives.
///
/// Implementations own decoding and output. Failures such as unplayable
/// media are theirs to surface; the coordinator only issues commands.
pub trait MediaBackend: Send {
    /// Replace the media source. Playback of the previous source stops.
    fn load(&mut self, src: &Url, mime_type: &str);

    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead to `seconds`
    fn seek(&mut self, seconds: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);
}

/// A backend that accepts every command and produces no output.
/// Useful for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl MediaBackend for NullBackend {
    fn load(&mut self, _src: &Url, _mime_type: &str) {}

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _seconds: f64) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn set_playback_rate(&mut self, _rate: f64) {}
}
