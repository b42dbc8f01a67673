use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Subtitle,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// One audio or subtitle stream of a media part, as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u64,
    pub kind: TrackKind,
    /// Stream index inside the container. Sidecar subtitles carry a negative index.
    pub index: i64,
    pub title: Option<String>,
    pub language_code: Option<String>,
    pub codec: Option<String>,
    pub audio_channel_layout: Option<String>,
    pub forced: bool,
    pub selected: bool,
}

impl Track {
    pub fn is_external(&self) -> bool {
        self.index < 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaPart {
    pub id: u64,
    pub audio_tracks: Vec<Track>,
    pub subtitle_tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    pub key: String,
    pub title: String,
    pub kind: String,
}

impl Library {
    pub fn is_show_library(&self) -> bool {
        self.kind == "show"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub rating_key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub rating_key: String,
    pub index: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub rating_key: String,
    pub show_title: String,
    pub season_number: u32,
    pub episode_number: u32,
    pub title: String,
    /// Files of the episode's first media item. Empty until the episode is loaded in full.
    pub parts: Vec<MediaPart>,
}
