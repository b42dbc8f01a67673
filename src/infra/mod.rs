use anyhow::{anyhow, Result};

use crate::domain::models::{Episode, Library, MediaPart, Season, Show, Track};

pub mod plex;

/// Catalog and playback-settings operations the workflow needs from a media server.
pub trait MediaServer {
    fn libraries(&self) -> Result<Vec<Library>>;

    fn shows(&self, library: &Library) -> Result<Vec<Show>>;

    fn seasons(&self, show: &Show) -> Result<Vec<Season>>;

    /// Episodes of a season, without their track lists.
    fn episodes(&self, season: &Season) -> Result<Vec<Episode>>;

    /// Reloads an episode with the tracks of every part of its first media item.
    fn load_episode(&self, episode: &Episode) -> Result<Episode>;

    fn set_active_audio_track(&self, part: &MediaPart, track: &Track) -> Result<()>;

    fn set_active_subtitle_track(&self, part: &MediaPart, track: &Track) -> Result<()>;

    fn clear_subtitle_track(&self, part: &MediaPart) -> Result<()>;

    fn find_episode(&self, show: &Show, season_number: u32, episode_number: u32) -> Result<Episode> {
        let not_found = || {
            anyhow!(
                "S{season_number:02}E{episode_number:02} of '{}' is not in your library.",
                show.title
            )
        };

        let season = self
            .seasons(show)?
            .into_iter()
            .find(|season| season.index == season_number)
            .ok_or_else(not_found)?;
        let episode = self
            .episodes(&season)?
            .into_iter()
            .find(|episode| episode.episode_number == episode_number)
            .ok_or_else(not_found)?;

        self.load_episode(&episode)
    }
}
