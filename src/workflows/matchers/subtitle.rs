use tracing::debug;

use super::{same_title, Leader, TrackMatcher};
use crate::domain::catalog::StreamCatalog;
use crate::domain::models::Track;
use crate::domain::template::{SubtitleLocation, SubtitleTemplate};

impl TrackMatcher for SubtitleTemplate {
    fn best_match<'a>(&self, catalog: &StreamCatalog<'a>) -> Option<&'a Track> {
        let mut leader = Leader::new();

        for (idx, candidate) in catalog.subtitle_tracks().iter().enumerate() {
            // Forced and full subtitles often share a title and language
            if same_title(candidate, self.title.as_deref())
                && candidate.language_code == self.language_code
                && candidate.forced == self.forced
            {
                debug!(track = candidate.id, "subtitle title, language and forced match");
                return Some(candidate);
            }

            if candidate.language_code != self.language_code {
                continue;
            }

            let score = [
                candidate.codec == self.codec,
                SubtitleLocation::of(candidate) == self.location,
                candidate.forced == self.forced,
                idx + 1 == self.subtitle_streams_index,
            ]
            .into_iter()
            .filter(|hit| *hit)
            .count() as u32;

            debug!(track = candidate.id, score, "scored subtitle candidate");
            leader.offer(score, candidate);
        }

        leader.into_track()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::tests::{example_part, subtitle};
    use crate::domain::models::MediaPart;

    fn part_with(subtitle_tracks: Vec<Track>) -> MediaPart {
        MediaPart {
            id: 3,
            audio_tracks: Vec::new(),
            subtitle_tracks,
        }
    }

    fn reference_template() -> SubtitleTemplate {
        let part = example_part();
        SubtitleTemplate::new(&part.subtitle_tracks[0], 1)
    }

    #[test]
    fn test_title_language_and_forced_match_wins() {
        let part = part_with(vec![
            subtitle(1, 2, Some("English"), "eng", "srt", false),
            subtitle(2, 3, Some("English [for Dothraki spoken parts]"), "eng", "pgs", false),
        ]);
        let catalog = StreamCatalog::from_part(&part);

        let matched = reference_template().best_match(&catalog).unwrap();
        assert_eq!(matched.id, 2);
    }

    #[test]
    fn test_title_match_with_different_forced_flag_is_only_scored() {
        let part = part_with(vec![
            subtitle(1, -1, Some("English [for Dothraki spoken parts]"), "eng", "pgs", true),
            subtitle(2, 3, None, "eng", "srt", false),
        ]);
        let catalog = StreamCatalog::from_part(&part);

        // Track 1 scores position only; track 2 scores codec, location and forced
        let matched = reference_template().best_match(&catalog).unwrap();
        assert_eq!(matched.id, 2);
    }

    #[test]
    fn test_full_score_beats_partial_scores() {
        let part = part_with(vec![
            subtitle(1, -1, Some("Signs"), "eng", "srt", false),
            subtitle(2, 4, Some("Full"), "eng", "srt", false),
            subtitle(3, 5, Some("SDH"), "eng", "srt", false),
        ]);
        let catalog = StreamCatalog::from_part(&part);

        let mut template = reference_template();
        template.subtitle_streams_index = 2;

        // Track 2 matches codec, location, forced and position
        let matched = template.best_match(&catalog).unwrap();
        assert_eq!(matched.id, 2);
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let part = part_with(vec![
            subtitle(1, 2, Some("A"), "eng", "ass", false),
            subtitle(2, 3, Some("B"), "eng", "ass", false),
        ]);
        let catalog = StreamCatalog::from_part(&part);

        let mut template = reference_template();
        template.subtitle_streams_index = 9;

        let matched = template.best_match(&catalog).unwrap();
        assert_eq!(matched.id, 1);
    }

    #[test]
    fn test_no_match_without_shared_language() {
        let part = part_with(vec![
            subtitle(1, 2, Some("Français"), "fra", "srt", false),
            subtitle(2, 3, Some("Español"), "spa", "srt", false),
        ]);
        let catalog = StreamCatalog::from_part(&part);

        assert!(reference_template().best_match(&catalog).is_none());
    }
}
