//! Playback/queue controller.
//!
//! One `PlayerController` is created per session and shared by reference
//! (the root component keeps it in a `Signal`). It is the only code allowed
//! to touch the bound audio output: source, position, volume and play/pause
//! all go through here.

mod media;
mod queue;
mod state;

#[cfg(test)]
mod tests;

pub use media::*;
pub use queue::*;
pub use state::*;

use crate::api::{Song, DEFAULT_ARTWORK_QUALITY, DEFAULT_STREAM_QUALITY};
use crate::cast::{CastLink, CastMedia, CastSession};
use crate::settings::AppSettings;
use tracing::{debug, info, warn};

pub struct PlayerController {
    state: PlaybackState,
    queue: Queue,
    media: Option<Box<dyn MediaHandle>>,
    cast: CastLink,
    stream_quality: String,
    artwork_quality: String,
    pre_mute_volume: f64,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            state: PlaybackState::default(),
            queue: Queue::new(),
            media: None,
            cast: CastLink::default(),
            stream_quality: DEFAULT_STREAM_QUALITY.to_string(),
            artwork_quality: DEFAULT_ARTWORK_QUALITY.to_string(),
            pre_mute_volume: 1.0,
        }
    }
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut controller = Self {
            stream_quality: settings.stream_quality.clone(),
            artwork_quality: settings.artwork_quality.clone(),
            ..Self::default()
        };
        controller.state.volume = settings.volume;
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Song> {
        self.state.current.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.queue.current_index()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_connected()
    }

    /// Attaches the audio output. A track selected before binding is loaded now.
    pub fn bind_media(&mut self, mut handle: Box<dyn MediaHandle>) {
        handle.set_volume(self.state.volume);
        self.media = Some(handle);
        if self.state.current.is_some() {
            self.load_current();
        }
    }

    pub fn unbind_media(&mut self) -> Option<Box<dyn MediaHandle>> {
        self.media.take()
    }

    pub fn select_and_play(&mut self, track: Song, queue: Option<Vec<Song>>) {
        match queue {
            Some(tracks) if !tracks.is_empty() => {
                let index = tracks
                    .iter()
                    .position(|entry| entry.id == track.id)
                    .unwrap_or(0);
                self.queue.replace(tracks, index);
            }
            Some(_) => self.queue.replace(vec![track.clone()], 0),
            None => match self.queue.position_of(&track.id) {
                Some(index) => {
                    self.queue.set_index(index);
                }
                None => self.queue.replace(vec![track.clone()], 0),
            },
        }

        self.state.is_playing = true;
        self.set_current(track);
    }

    pub fn pause(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        self.state.is_playing = false;
        if matches!(
            self.state.status,
            PlaybackStatus::Playing | PlaybackStatus::Ready
        ) {
            self.state.status = PlaybackStatus::Paused;
        }
        self.output_pause();
    }

    pub fn resume(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        self.state.is_playing = true;
        if matches!(
            self.state.status,
            PlaybackStatus::Paused | PlaybackStatus::Ready | PlaybackStatus::Ended
        ) {
            self.state.status = PlaybackStatus::Playing;
        }
        self.output_play();
    }

    pub fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Advances one entry. Does nothing at the end of the queue.
    pub fn play_next(&mut self) {
        let Some(next) = self.queue.advance().cloned() else {
            return;
        };
        self.state.is_playing = true;
        self.set_current(next);
    }

    /// Steps back one entry. Does nothing at the start of the queue.
    pub fn play_previous(&mut self) {
        let Some(previous) = self.queue.retreat().cloned() else {
            return;
        };
        self.state.is_playing = true;
        self.set_current(previous);
    }

    pub fn skip_to(&mut self, index: usize) {
        if !self.queue.set_index(index) {
            return;
        }
        let Some(track) = self.queue.current().cloned() else {
            return;
        };
        self.state.is_playing = true;
        self.set_current(track);
    }

    pub fn add_to_queue(&mut self, track: Song) {
        self.queue.push(track);
    }

    pub fn remove_from_queue(&mut self, index: usize) {
        let Some(removal) = self.queue.remove(index) else {
            return;
        };
        debug!(track_id = %removal.track.id, index, "removed from queue");

        if removal.was_current {
            if let Some(track) = self.queue.current().cloned() {
                self.set_current(track);
            }
        }
    }

    /// Empties the queue. Whatever is loaded keeps playing until paused.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn seek(&mut self, time: f64) {
        let mut applied = false;
        if let Some(media) = self.media.as_mut() {
            media.set_position(time);
            applied = true;
        }
        if self.cast.is_connected() {
            self.cast.seek(time);
            applied = true;
        }
        if applied {
            self.state.position = time;
        }
    }

    /// Callers pass values in `[0, 1]`; no clamping happens here.
    pub fn set_volume(&mut self, volume: f64) {
        self.state.volume = volume;
        if let Some(media) = self.media.as_mut() {
            media.set_volume(volume);
        }
        self.cast.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) {
        if self.state.volume > 0.0 {
            self.pre_mute_volume = self.state.volume;
            self.set_volume(0.0);
        } else {
            let restored = if self.pre_mute_volume > 0.0 {
                self.pre_mute_volume
            } else {
                1.0
            };
            self.set_volume(restored);
        }
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.state.is_fullscreen = fullscreen;
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(position) => {
                if position.is_finite() {
                    self.state.position = position;
                }
            }
            MediaEvent::MetadataLoaded(duration) => {
                if duration.is_finite() {
                    self.state.duration = duration;
                }
                if self.state.current.is_some() {
                    self.state.status = if self.state.is_playing {
                        PlaybackStatus::Playing
                    } else {
                        PlaybackStatus::Ready
                    };
                }
            }
            MediaEvent::Ended => {
                if self.queue.has_next() {
                    self.play_next();
                } else {
                    self.state.is_playing = false;
                    self.state.status = PlaybackStatus::Ended;
                }
            }
            MediaEvent::Error(reason) => {
                let error = PlaybackError::LoadFailed {
                    track_id: self.state.current.as_ref().map(|track| track.id.clone()),
                    reason,
                };
                warn!("{error}");
                self.state.last_error = Some(error);
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.state.last_error = None;
    }

    /// Hands transport over to a receiver and loads the current track there.
    pub fn connect_cast(&mut self, session: Box<dyn CastSession>) {
        self.cast.connect(session);
        info!("cast session connected");

        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
        self.cast.set_volume(self.state.volume);
        if let Some(cast_media) = self.current_cast_media() {
            self.cast
                .load(&cast_media, self.state.position, self.state.is_playing);
        }
    }

    /// Drops the receiver and resumes locally from the last known position.
    pub fn disconnect_cast(&mut self) {
        if !self.cast.is_connected() {
            return;
        }
        self.cast.disconnect();
        info!("cast session ended");
        self.resume_locally();
    }

    /// Ends the receiver session from this side. The framework's later
    /// session-ended report finds nothing connected and is ignored.
    pub fn stop_casting(&mut self) {
        if !self.cast.is_connected() {
            return;
        }
        self.cast.stop();
        info!("cast session stopped");
        self.resume_locally();
    }

    fn resume_locally(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.set_position(self.state.position);
            if self.state.is_playing {
                media.play();
            }
        }
    }

    fn current_cast_media(&self) -> Option<CastMedia> {
        let track = self.state.current.as_ref()?;
        CastMedia::from_song(track, &self.stream_quality, &self.artwork_quality)
    }

    fn set_current(&mut self, track: Song) {
        self.state.current = Some(track);
        self.state.position = 0.0;
        self.state.duration = 0.0;
        self.state.last_error = None;
        self.load_current();
    }

    /// Points the output at the current track's stream.
    fn load_current(&mut self) {
        let Some(track) = self.state.current.as_ref() else {
            return;
        };

        let Some(url) = track.stream_url(&self.stream_quality).map(str::to_string) else {
            let error = PlaybackError::NoStreamVariant {
                track_id: track.id.clone(),
            };
            warn!("{error}");
            self.state.last_error = Some(error);
            self.state.status = PlaybackStatus::Idle;
            return;
        };

        debug!(track_id = %track.id, %url, "loading stream");
        self.state.status = PlaybackStatus::Loading;

        if self.cast.is_connected() {
            if let Some(cast_media) = self.current_cast_media() {
                self.cast.load(&cast_media, 0.0, self.state.is_playing);
            }
        }

        let casting = self.cast.is_connected();
        if let Some(media) = self.media.as_mut() {
            media.set_source(&url);
            if self.state.is_playing && !casting {
                media.play();
            }
        }
    }

    fn output_play(&mut self) {
        if self.cast.is_connected() {
            self.cast.play();
        } else if let Some(media) = self.media.as_mut() {
            media.play();
        }
    }

    fn output_pause(&mut self) {
        if self.cast.is_connected() {
            self.cast.pause();
        } else if let Some(media) = self.media.as_mut() {
            media.pause();
        }
    }
}
