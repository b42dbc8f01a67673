use anyhow::Result;
use tracing::{info, warn};

use crate::domain::catalog::StreamCatalog;
use crate::domain::models::{Episode, MediaPart, Season, Track, TrackKind};
use crate::domain::template::{AudioTemplate, SubtitleTemplate};
use crate::infra::MediaServer;
use crate::workflows::display::{
    episode_label, no_match_message, reset_message, success_message,
};
use crate::workflows::matchers::TrackMatcher;

#[derive(Debug, Clone, PartialEq)]
pub enum SubtitleChoice {
    Unchanged,
    Disable,
    Match(SubtitleTemplate),
}

/// What to apply to every file of the chosen seasons.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub audio: Option<AudioTemplate>,
    pub subtitles: SubtitleChoice,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.subtitles == SubtitleChoice::Unchanged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied { kind: TrackKind, track_id: u64 },
    Cleared,
    NoMatch(TrackKind),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub episode: String,
    pub part_id: u64,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Episodes or seasons that could not be read from the server.
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.files
            .iter()
            .flat_map(|file| file.outcomes.iter())
            .filter(|outcome| predicate(outcome))
            .count()
    }

    /// Puts the reference file first so its outcomes are counted with the rest.
    pub fn record_reference(&mut self, reference: FileReport) {
        self.files.insert(0, reference);
    }

    /// Files where at least one track could not be matched or set.
    pub fn unresolved(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| {
            file.outcomes
                .iter()
                .any(|outcome| matches!(outcome, Outcome::NoMatch(_) | Outcome::Failed(_)))
        })
    }
}

fn record(result: Result<()>, on_success: Outcome, message: String) -> Outcome {
    match result {
        Ok(()) => {
            println!("{message}");
            on_success
        }
        Err(e) => {
            println!("Error: {message} failed: {e}");
            warn!("{message} failed: {e:#}");
            Outcome::Failed(e.to_string())
        }
    }
}

fn set_track(server: &dyn MediaServer, episode: &Episode, part: &MediaPart, track: &Track) -> Outcome {
    let result = match track.kind {
        TrackKind::Audio => server.set_active_audio_track(part, track),
        TrackKind::Subtitle => server.set_active_subtitle_track(part, track),
    };
    record(
        result,
        Outcome::Applied {
            kind: track.kind,
            track_id: track.id,
        },
        success_message(episode, track),
    )
}

fn clear_subtitles(server: &dyn MediaServer, episode: &Episode, part: &MediaPart) -> Outcome {
    record(
        server.clear_subtitle_track(part),
        Outcome::Cleared,
        reset_message(episode),
    )
}

/// Applies the tracks picked by hand on the reference file.
pub fn apply_reference(
    server: &dyn MediaServer,
    episode: &Episode,
    part: &MediaPart,
    audio: Option<&Track>,
    subtitles: Option<Option<&Track>>,
) -> FileReport {
    let mut outcomes = Vec::new();
    if let Some(track) = audio {
        outcomes.push(set_track(server, episode, part, track));
    }
    match subtitles {
        Some(Some(track)) => outcomes.push(set_track(server, episode, part, track)),
        Some(None) => outcomes.push(clear_subtitles(server, episode, part)),
        None => {}
    }
    FileReport {
        episode: episode_label(episode),
        part_id: part.id,
        outcomes,
    }
}

/// Matches and applies the selection on one file. A missing match is reported, not raised.
pub fn apply_to_part(
    server: &dyn MediaServer,
    episode: &Episode,
    part: &MediaPart,
    selection: &Selection,
) -> Vec<Outcome> {
    let catalog = StreamCatalog::from_part(part);
    let mut outcomes = Vec::new();

    if let Some(template) = &selection.audio {
        outcomes.push(match template.best_match(&catalog) {
            Some(track) => set_track(server, episode, part, track),
            None => {
                println!("{}", no_match_message(TrackKind::Audio, episode));
                Outcome::NoMatch(TrackKind::Audio)
            }
        });
    }

    match &selection.subtitles {
        SubtitleChoice::Unchanged => {}
        SubtitleChoice::Disable => outcomes.push(clear_subtitles(server, episode, part)),
        SubtitleChoice::Match(template) => {
            outcomes.push(match template.best_match(&catalog) {
                Some(track) => set_track(server, episode, part, track),
                None => {
                    println!("{}", no_match_message(TrackKind::Subtitle, episode));
                    Outcome::NoMatch(TrackKind::Subtitle)
                }
            });
        }
    }

    outcomes
}

/// Walks every file of every episode in `seasons`, in order, skipping the reference file.
pub fn apply_to_seasons(
    server: &dyn MediaServer,
    seasons: &[Season],
    reference_part_id: u64,
    selection: &Selection,
) -> BatchReport {
    let mut report = BatchReport::default();
    if selection.is_empty() {
        return report;
    }

    for season in seasons {
        let episodes = match server.episodes(season) {
            Ok(episodes) => episodes,
            Err(e) => {
                println!("Error: Could not list episodes of {}: {e}", season.title);
                report.skipped.push(season.title.clone());
                continue;
            }
        };

        for episode in episodes {
            let episode = match server.load_episode(&episode) {
                Ok(loaded) => loaded,
                Err(e) => {
                    let label = episode_label(&episode);
                    println!("Error: Could not load '{label}': {e}");
                    report.skipped.push(label);
                    continue;
                }
            };

            for part in &episode.parts {
                if part.id == reference_part_id {
                    continue;
                }
                let outcomes = apply_to_part(server, &episode, part, selection);
                report.files.push(FileReport {
                    episode: episode_label(&episode),
                    part_id: part.id,
                    outcomes,
                });
            }
        }
    }

    info!(
        files = report.files.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    report
}
