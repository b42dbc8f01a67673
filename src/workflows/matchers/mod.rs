use crate::domain::catalog::StreamCatalog;
use crate::domain::models::Track;

/// Picks the track of another file that best corresponds to a template.
pub trait TrackMatcher {
    /// Returns `None` when no track shares the template's language.
    fn best_match<'a>(&self, catalog: &StreamCatalog<'a>) -> Option<&'a Track>;
}

/// Highest score seen so far. Only a strictly greater score replaces the leader.
struct Leader<'a> {
    best: Option<(u32, &'a Track)>,
}

impl<'a> Leader<'a> {
    fn new() -> Self {
        Self { best: None }
    }

    fn offer(&mut self, score: u32, track: &'a Track) {
        if self.best.map_or(true, |(leading, _)| score > leading) {
            self.best = Some((score, track));
        }
    }

    fn into_track(self) -> Option<&'a Track> {
        self.best.map(|(_, track)| track)
    }
}

fn same_title(candidate: &Track, title: Option<&str>) -> bool {
    matches!(candidate.title.as_deref(), Some(t) if !t.is_empty() && Some(t) == title)
}

pub mod audio;
pub mod subtitle;
