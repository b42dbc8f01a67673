use tracing::debug;

use super::{same_title, Leader, TrackMatcher};
use crate::domain::catalog::StreamCatalog;
use crate::domain::models::Track;
use crate::domain::template::AudioTemplate;

impl TrackMatcher for AudioTemplate {
    fn best_match<'a>(&self, catalog: &StreamCatalog<'a>) -> Option<&'a Track> {
        let mut leader = Leader::new();

        for (idx, candidate) in catalog.audio_tracks().iter().enumerate() {
            if same_title(candidate, self.title.as_deref())
                && candidate.language_code == self.language_code
            {
                debug!(track = candidate.id, "audio title and language match");
                return Some(candidate);
            }

            if candidate.language_code != self.language_code {
                continue;
            }

            let mut score = 0;
            if candidate.codec == self.codec
                && candidate.audio_channel_layout == self.audio_channel_layout
            {
                score += 1;
            }
            if idx + 1 == self.audio_streams_index {
                score += 1;
            }

            debug!(track = candidate.id, score, "scored audio candidate");
            leader.offer(score, candidate);
        }

        leader.into_track()
    }
}
