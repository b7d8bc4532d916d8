use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub src: String,
}

impl Track {
    fn new(id: u32, title: &str, src: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            src: src.to_string(),
        }
    }
}

pub fn default_playlist() -> Vec<Track> {
    const BASE: &str = "https://msn8459.s3.eu-north-1.amazonaws.com/music";
    vec![
        Track::new(1, "song 1", &format!("{BASE}/song1.mp3")),
        Track::new(2, "Song 2", &format!("{BASE}/song2.mp3")),
        Track::new(3, "song 3", &format!("{BASE}/song3.mp3")),
        Track::new(4, "song 4", &format!("{BASE}/song4.mp3")),
    ]
}

/// Play state over a fixed, non-empty playlist. No audio is decoded here;
/// the host reports playback failures through [`Transport::start_failed`].
#[derive(Debug, Clone)]
pub struct Transport {
    tracks: Vec<Track>,
    current: usize,
    playing: bool,
}

impl Transport {
    /// `None` for an empty playlist
    pub fn new(tracks: Vec<Track>) -> Option<Self> {
        if tracks.is_empty() {
            return None;
        }
        Some(Self {
            tracks,
            current: 0,
            playing: false,
        })
    }

    pub fn current(&self) -> &Track {
        &self.tracks[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn play_pause(&mut self) {
        self.playing = !self.playing;
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.tracks.len();
    }

    pub fn previous(&mut self) {
        self.current = (self.current + self.tracks.len() - 1) % self.tracks.len();
    }

    /// Playback of the current track could not start
    pub fn start_failed(&mut self, reason: &str) {
        warn!("Could not play '{}': {}", self.current().title, reason);
        self.playing = false;
    }
}
