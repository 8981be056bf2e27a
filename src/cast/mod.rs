//! Optional external receiver (Google Cast style).
//!
//! `CastLink` holds at most one live session. Every command is silently
//! dropped while nothing is connected.


use crate::api::Song;

pub const CAST_CONTENT_TYPE: &str = "audio/mpeg";

/// Load request payload for a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct CastMedia {
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    pub artist: String,
    pub album_name: String,
    pub artwork_url: Option<String>,
}

impl CastMedia {
    /// `None` when the song has no playable stream.
    pub fn from_song(song: &Song, stream_quality: &str, artwork_quality: &str) -> Option<Self> {
        let content_id = song.stream_url(stream_quality)?.to_string();
        Some(Self {
            content_id,
            content_type: CAST_CONTENT_TYPE.to_string(),
            title: song.name.clone(),
            artist: song.primary_artists.clone(),
            album_name: song.album.name.clone(),
            artwork_url: song.image_url(artwork_quality).map(str::to_string),
        })
    }
}

pub trait CastSession {
    fn load(&mut self, media: &CastMedia, start_time: f64, autoplay: bool);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    fn set_volume(&mut self, volume: f64);
    /// Ends the session on the receiver.
    fn stop(&mut self);
}

/// Session lifecycle as reported by the cast framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastSessionState {
    Started,
    Resumed,
    Ended,
    Other,
}

impl CastSessionState {
    pub fn from_framework(name: &str) -> Self {
        match name {
            "SESSION_STARTED" => Self::Started,
            "SESSION_RESUMED" => Self::Resumed,
            "SESSION_ENDED" => Self::Ended,
            _ => Self::Other,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::Resumed)
    }
}

#[derive(Default)]
pub struct CastLink {
    session: Option<Box<dyn CastSession>>,
}

impl std::fmt::Debug for CastLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastLink")
            .field("connected", &self.session.is_some())
            .finish()
    }
}

impl CastLink {
    pub fn connect(&mut self, session: Box<dyn CastSession>) {
        self.session = Some(session);
    }

    pub fn disconnect(&mut self) {
        self.session = None;
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn load(&mut self, media: &CastMedia, start_time: f64, autoplay: bool) {
        if let Some(session) = self.session.as_mut() {
            session.load(media, start_time, autoplay);
        }
    }

    pub fn play(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.pause();
        }
    }

    pub fn seek(&mut self, time: f64) {
        if let Some(session) = self.session.as_mut() {
            session.seek(time);
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        if let Some(session) = self.session.as_mut() {
            session.set_volume(volume);
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }
}
