use crate::api::Song;
use crate::utils::{format_time, progress_fraction};

/// Lifecycle of the selected track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing selected, or nothing loadable.
    #[default]
    Idle,
    /// Source assigned, duration not known yet.
    Loading,
    /// Metadata loaded while paused.
    Ready,
    Playing,
    Paused,
    /// Last track of the queue finished.
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    NoStreamVariant { track_id: String },
    LoadFailed { track_id: Option<String>, reason: String },
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStreamVariant { track_id } => {
                write!(f, "no stream variant for track {track_id}")
            }
            Self::LoadFailed {
                track_id: Some(track_id),
                reason,
            } => write!(f, "failed to load track {track_id}: {reason}"),
            Self::LoadFailed {
                track_id: None,
                reason,
            } => write!(f, "failed to load media: {reason}"),
        }
    }
}

impl std::error::Error for PlaybackError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current: Option<Song>,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub is_fullscreen: bool,
    pub status: PlaybackStatus,
    pub last_error: Option<PlaybackError>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_fullscreen: false,
            status: PlaybackStatus::Idle,
            last_error: None,
        }
    }
}

impl PlaybackState {
    pub fn elapsed_label(&self) -> String {
        format_time(self.position)
    }

    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }

    pub fn progress(&self) -> f64 {
        progress_fraction(self.position, self.duration)
    }

    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }
}
