// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use super::backend::MediaBackend;
use super::state::{PlaybackState, PlaybackStatus, Track};

/// Owns the media backend and the observable playback state.
///
/// Every operation runs under one lock and publishes the new state before it
/// returns, so overlapping actions (rapid toggles from several controls) are
/// applied one at a time and each subscriber sees every committed change.
/// Operations that would not change anything are no-ops and notify nobody.
///
/// Subscribers must not hold a `borrow()` of their receiver across a call
/// into the coordinator.
#[derive(Debug)]
pub struct PlaybackCoordinator<B> {
    backend: Mutex<B>,
    state: watch::Sender<PlaybackState>,
}

impl<B: MediaBackend> PlaybackCoordinator<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(PlaybackState::default());
        Self {
            backend: Mutex::new(backend),
            state,
        }
    }

    /// Receive every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn is_current(&self, track: &Track) -> bool {
        self.state.borrow().is_current(track)
    }

    /// Whether `track` is loaded and playing
    pub fn is_playing(&self, track: &Track) -> bool {
        let state = self.state.borrow();
        state.is_current(track) && state.is_playing()
    }

    /// Make `track` current, stopping whatever was loaded before.
    ///
    /// The new track starts paused at position zero. Loading the track that
    /// is already current changes nothing.
    pub fn load(&self, track: Track) -> bool {
        self.apply(|state, backend| load_track(state, backend, track))
    }

    pub fn play(&self) -> bool {
        self.apply(play)
    }

    pub fn pause(&self) -> bool {
        self.apply(pause)
    }

    /// Flip between playing and paused; nothing happens while unloaded
    pub fn toggle(&self) -> bool {
        self.apply(|state, backend| match state.status {
            PlaybackStatus::Unloaded => false,
            PlaybackStatus::Paused => play(state, backend),
            PlaybackStatus::Playing => pause(state, backend),
        })
    }

    /// Toggle on behalf of a per-episode control.
    ///
    /// If `track` is not current it is loaded and started; otherwise this is
    /// a plain [`toggle`](Self::toggle).
    pub fn toggle_track(&self, track: &Track) -> bool {
        self.apply(|state, backend| {
            if state.is_current(track) {
                match state.status {
                    PlaybackStatus::Playing => pause(state, backend),
                    _ => play(state, backend),
                }
            } else {
                load_track(state, backend, track.clone());
                play(state, backend)
            }
        })
    }

    /// Move the playhead; the play/pause status is untouched
    pub fn seek(&self, seconds: f64) -> bool {
        self.apply(|state, backend| seek_to(state, backend, seconds))
    }

    /// Move the playhead relative to the current position
    pub fn seek_by(&self, delta: f64) -> bool {
        self.apply(|state, backend| {
            let target = state.current_time + delta;
            seek_to(state, backend, target)
        })
    }

    /// Change the playback speed. Rates must be finite and positive.
    pub fn set_playback_rate(&self, rate: f64) -> bool {
        self.apply(|state, backend| {
            if !rate.is_finite() || rate <= 0.0 || state.playback_rate == rate {
                return false;
            }
            backend.set_playback_rate(rate);
            state.playback_rate = rate;
            true
        })
    }

    pub fn toggle_mute(&self) -> bool {
        self.apply(|state, backend| {
            state.muted = !state.muted;
            backend.set_muted(state.muted);
            true
        })
    }

    /// Position reported by the media element while playing
    pub fn on_time_update(&self, seconds: f64) -> bool {
        self.apply(|state, _| {
            if !state.is_loaded() {
                return false;
            }
            let position = state.clamp_position(seconds);
            if position == state.current_time {
                return false;
            }
            state.current_time = position;
            true
        })
    }

    /// Duration reported once the media element knows it
    pub fn on_duration_change(&self, seconds: f64) -> bool {
        self.apply(|state, _| {
            if !state.is_loaded() || !seconds.is_finite() || seconds < 0.0 {
                return false;
            }
            state.duration = seconds;
            state.current_time = state.clamp_position(state.current_time);
            true
        })
    }

    /// The media element reached the end of the track
    pub fn on_ended(&self) -> bool {
        self.apply(|state, _| {
            if state.status != PlaybackStatus::Playing {
                return false;
            }
            state.status = PlaybackStatus::Paused;
            if state.duration > 0.0 {
                state.current_time = state.duration;
            }
            true
        })
    }

    fn lock_backend(&self) -> MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one operation against the backend and state, publishing if it changed anything
    fn apply(&self, op: impl FnOnce(&mut PlaybackState, &mut B) -> bool) -> bool {
        let mut backend = self.lock_backend();
        self.state.send_if_modified(|state| op(state, &mut *backend))
    }
}

fn load_track<B: MediaBackend>(state: &mut PlaybackState, backend: &mut B, track: Track) -> bool {
    if state.is_current(&track) {
        return false;
    }

    if state.is_playing() {
        backend.pause();
    }
    backend.load(&track.src, &track.mime_type);
    debug!(title = %track.title, src = %track.src, "loaded track");

    state.current = Some(track);
    state.status = PlaybackStatus::Paused;
    state.current_time = 0.0;
    state.duration = 0.0;
    true
}

fn play<B: MediaBackend>(state: &mut PlaybackState, backend: &mut B) -> bool {
    if state.status != PlaybackStatus::Paused {
        return false;
    }
    backend.play();
    state.status = PlaybackStatus::Playing;
    true
}

fn pause<B: MediaBackend>(state: &mut PlaybackState, backend: &mut B) -> bool {
    if state.status != PlaybackStatus::Playing {
        return false;
    }
    backend.pause();
    state.status = PlaybackStatus::Paused;
    true
}

fn seek_to<B: MediaBackend>(state: &mut PlaybackState, backend: &mut B, seconds: f64) -> bool {
    if !state.is_loaded() {
        return false;
    }
    let position = state.clamp_position(seconds);
    backend.seek(position);
    state.current_time = position;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use url::Url;

    use crate::playback::NullBackend;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(String),
        Play,
        Pause,
        Seek(f64),
        Muted(bool),
        Rate(f64),
    }

    /// Records every command it receives
    #[derive(Debug, Default, Clone)]
    struct RecordingBackend {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl MediaBackend for RecordingBackend {
        fn load(&mut self, src: &Url, _mime_type: &str) {
            self.push(Call::Load(src.to_string()));
        }

        fn play(&mut self) {
            self.push(Call::Play);
        }

        fn pause(&mut self) {
            self.push(Call::Pause);
        }

        fn seek(&mut self, seconds: f64) {
            self.push(Call::Seek(seconds));
        }

        fn set_muted(&mut self, muted: bool) {
            self.push(Call::Muted(muted));
        }

        fn set_playback_rate(&mut self, rate: f64) {
            self.push(Call::Rate(rate));
        }
    }

    fn track(n: u32) -> Track {
        Track {
            title: format!("{n}: Section {n}"),
            src: Url::parse(&format!("https://example.com/{n}.mp3")).unwrap(),
            mime_type: "audio/mpeg".to_string(),
            link: format!("/{n}"),
        }
    }

    fn recording() -> (PlaybackCoordinator<RecordingBackend>, RecordingBackend) {
        let backend = RecordingBackend::default();
        (PlaybackCoordinator::new(backend.clone()), backend)
    }

    #[test]
    fn loading_a_second_track_replaces_the_first_and_resets_position() {
        let player = PlaybackCoordinator::new(NullBackend);

        player.load(track(1));
        player.on_duration_change(300.0);
        player.seek(120.0);
        player.load(track(2));

        let state = player.state();
        assert_eq!(state.current, Some(track(2)));
        assert_eq!(state.current_time, 0.0);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.status, PlaybackStatus::Paused);
    }

    #[test]
    fn loading_while_playing_stops_previous_track() {
        let (player, backend) = recording();

        player.load(track(1));
        player.play();
        player.load(track(2));

        assert_eq!(
            backend.calls(),
            vec![
                Call::Load("https://example.com/1.mp3".into()),
                Call::Play,
                Call::Pause,
                Call::Load("https://example.com/2.mp3".into()),
            ]
        );
        assert!(!player.state().is_playing());
    }

    #[test]
    fn reloading_current_track_is_a_noop() {
        let (player, backend) = recording();

        player.load(track(1));
        player.play();
        player.on_time_update(12.0);

        assert!(!player.load(track(1)));
        assert_eq!(player.state().current_time, 12.0);
        assert!(player.state().is_playing());
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn toggle_without_track_stays_unloaded() {
        let (player, backend) = recording();

        assert!(!player.toggle());

        assert_eq!(player.state(), PlaybackState::default());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn load_play_toggle_ends_paused_on_same_track() {
        let player = PlaybackCoordinator::new(NullBackend);

        player.load(track(1));
        player.play();
        player.toggle();

        let state = player.state();
        assert_eq!(state.status, PlaybackStatus::Paused);
        assert_eq!(state.current, Some(track(1)));
    }

    #[test]
    fn toggle_alternates_between_playing_and_paused() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));

        player.toggle();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
        player.toggle();
        assert_eq!(player.state().status, PlaybackStatus::Paused);
        player.toggle();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
    }

    #[test]
    fn play_and_pause_are_idempotent() {
        let (player, backend) = recording();
        player.load(track(1));

        assert!(player.play());
        assert!(!player.play());
        assert!(player.pause());
        assert!(!player.pause());

        let commands: Vec<_> = backend.calls().into_iter().skip(1).collect();
        assert_eq!(commands, vec![Call::Play, Call::Pause]);
    }

    #[test]
    fn play_without_track_is_a_noop() {
        let player = PlaybackCoordinator::new(NullBackend);

        assert!(!player.play());
        assert_eq!(player.state().status, PlaybackStatus::Unloaded);
    }

    #[test]
    fn toggle_track_loads_and_starts_a_new_episode() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));
        player.play();
        player.on_time_update(50.0);

        player.toggle_track(&track(2));

        let state = player.state();
        assert_eq!(state.current, Some(track(2)));
        assert_eq!(state.current_time, 0.0);
        assert!(state.is_playing());
        assert!(player.is_playing(&track(2)));
        assert!(!player.is_playing(&track(1)));
    }

    #[test]
    fn toggle_track_on_current_episode_pauses_it() {
        let player = PlaybackCoordinator::new(NullBackend);

        player.toggle_track(&track(1));
        player.toggle_track(&track(1));

        assert!(player.is_current(&track(1)));
        assert!(!player.is_playing(&track(1)));
    }

    #[test]
    fn seek_changes_position_but_not_status() {
        let (player, backend) = recording();
        player.load(track(1));
        player.on_duration_change(600.0);
        player.play();

        player.seek(90.0);

        let state = player.state();
        assert_eq!(state.current_time, 90.0);
        assert!(state.is_playing());
        assert_eq!(backend.calls().last(), Some(&Call::Seek(90.0)));
    }

    #[test]
    fn seek_is_clamped_to_track_bounds() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));
        player.on_duration_change(100.0);

        player.seek(250.0);
        assert_eq!(player.state().current_time, 100.0);

        player.seek_by(-400.0);
        assert_eq!(player.state().current_time, 0.0);
    }

    #[test]
    fn seek_by_moves_relative_to_position() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));
        player.on_duration_change(100.0);
        player.on_time_update(40.0);

        player.seek_by(10.0);
        assert_eq!(player.state().current_time, 50.0);
        player.seek_by(-10.0);
        assert_eq!(player.state().current_time, 40.0);
    }

    #[test]
    fn seek_without_track_is_a_noop() {
        let player = PlaybackCoordinator::new(NullBackend);

        assert!(!player.seek(30.0));
        assert_eq!(player.state().current_time, 0.0);
    }

    #[test]
    fn playback_rate_rejects_invalid_values() {
        let (player, backend) = recording();

        assert!(!player.set_playback_rate(0.0));
        assert!(!player.set_playback_rate(-1.0));
        assert!(!player.set_playback_rate(f64::INFINITY));
        assert!(player.set_playback_rate(1.5));

        assert_eq!(player.state().playback_rate, 1.5);
        assert_eq!(backend.calls(), vec![Call::Rate(1.5)]);
    }

    #[test]
    fn toggle_mute_flips_muted() {
        let (player, backend) = recording();

        player.toggle_mute();
        assert!(player.state().muted);
        player.toggle_mute();
        assert!(!player.state().muted);

        assert_eq!(backend.calls(), vec![Call::Muted(true), Call::Muted(false)]);
    }

    #[test]
    fn media_events_are_ignored_while_unloaded() {
        let player = PlaybackCoordinator::new(NullBackend);

        assert!(!player.on_time_update(10.0));
        assert!(!player.on_duration_change(100.0));
        assert!(!player.on_ended());
        assert_eq!(player.state(), PlaybackState::default());
    }

    #[test]
    fn duration_change_clamps_position() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));
        player.on_time_update(80.0);

        player.on_duration_change(60.0);

        let state = player.state();
        assert_eq!(state.duration, 60.0);
        assert_eq!(state.current_time, 60.0);
    }

    #[test]
    fn ended_pauses_at_end_of_track() {
        let player = PlaybackCoordinator::new(NullBackend);
        player.load(track(1));
        player.on_duration_change(60.0);
        player.play();

        player.on_ended();

        let state = player.state();
        assert_eq!(state.status, PlaybackStatus::Paused);
        assert_eq!(state.current_time, 60.0);
        assert_eq!(state.current, Some(track(1)));
    }

    #[test]
    fn every_subscriber_observes_each_change() {
        let player = PlaybackCoordinator::new(NullBackend);
        let mut progress_bar = player.subscribe();
        let mut play_button = player.subscribe();

        player.load(track(1));

        assert!(progress_bar.has_changed().unwrap());
        assert!(play_button.has_changed().unwrap());
        assert_eq!(
            progress_bar.borrow_and_update().current,
            Some(track(1))
        );
        assert_eq!(play_button.borrow_and_update().current, Some(track(1)));

        player.toggle();

        assert!(progress_bar.borrow_and_update().is_playing());
        assert!(play_button.borrow_and_update().is_playing());
    }

    #[test]
    fn noop_operations_do_not_notify() {
        let player = PlaybackCoordinator::new(NullBackend);
        let mut rx = player.subscribe();

        player.toggle();
        player.seek(10.0);

        assert!(!rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), PlaybackState::default());
    }

    #[tokio::test]
    async fn subscriber_wakes_on_change_from_another_task() {
        let player = Arc::new(PlaybackCoordinator::new(NullBackend));
        let mut rx = player.subscribe();

        let handle = {
            let player = player.clone();
            tokio::spawn(async move {
                player.load(track(3));
                player.play();
            })
        };
        handle.await.unwrap();

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.current, Some(track(3)));
        assert!(state.is_playing());
    }

    #[tokio::test]
    async fn concurrent_toggles_are_serialized() {
        let player = Arc::new(PlaybackCoordinator::new(NullBackend));
        player.load(track(1));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let player = player.clone();
            handles.push(tokio::spawn(async move {
                player.toggle();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // An even number of toggles lands back where it started
        assert_eq!(player.state().status, PlaybackStatus::Paused);
    }
}
