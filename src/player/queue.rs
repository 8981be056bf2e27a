//! Linear play order plus a cursor into it.
//!
//! The cursor always points at an existing entry while the queue is
//! non-empty and is reset to 0 when the queue empties.

use crate::api::Song;

#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub track: Song,
    pub was_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Song>,
    index: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Song] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Song> {
        self.tracks.get(self.index)
    }

    pub fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == track_id)
    }

    /// Swaps in a new play order. Out-of-range indices fall back to 0.
    pub fn replace(&mut self, tracks: Vec<Song>, index: usize) {
        self.index = if index < tracks.len() { index } else { 0 };
        self.tracks = tracks;
    }

    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.tracks.len()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0 && !self.tracks.is_empty()
    }

    /// Moves forward one entry; stays put at the end.
    pub fn advance(&mut self) -> Option<&Song> {
        if !self.has_next() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// Moves back one entry; stays put at the start.
    pub fn retreat(&mut self) -> Option<&Song> {
        if !self.has_previous() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    pub fn push(&mut self, track: Song) {
        self.tracks.push(track);
    }

    pub fn remove(&mut self, index: usize) -> Option<Removal> {
        if index >= self.tracks.len() {
            return None;
        }

        let was_current = index == self.index;
        let track = self.tracks.remove(index);

        if self.tracks.is_empty() {
            self.index = 0;
        } else if was_current {
            self.index = self.index.min(self.tracks.len() - 1);
        } else if index < self.index {
            self.index -= 1;
        }

        Some(Removal { track, was_current })
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = 0;
    }
}
