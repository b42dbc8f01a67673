use std::fmt;

use crate::domain::catalog::StreamCatalog;
use crate::domain::models::{Track, TrackKind};
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleLocation {
    Internal,
    External,
}

impl SubtitleLocation {
    pub fn of(track: &Track) -> Self {
        if track.is_external() {
            SubtitleLocation::External
        } else {
            SubtitleLocation::Internal
        }
    }
}

impl fmt::Display for SubtitleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleLocation::Internal => write!(f, "Internal"),
            SubtitleLocation::External => write!(f, "External"),
        }
    }
}

/// Identifying attributes of the audio track picked on the reference episode.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTemplate {
    pub title: Option<String>,
    pub language_code: Option<String>,
    pub codec: Option<String>,
    pub audio_channel_layout: Option<String>,
    /// 1-based position of the source track among its file's audio tracks.
    pub audio_streams_index: usize,
}

impl AudioTemplate {
    pub fn new(track: &Track, audio_streams_index: usize) -> Self {
        Self {
            title: track.title.clone(),
            language_code: track.language_code.clone(),
            codec: track.codec.clone(),
            audio_channel_layout: track.audio_channel_layout.clone(),
            audio_streams_index,
        }
    }

    /// Builds the template from a combined catalog position, as typed by the user.
    pub fn from_position(catalog: &StreamCatalog, position: usize) -> Result<Self, CatalogError> {
        if !catalog.is_audio_position(position) {
            return Err(CatalogError::WrongKind {
                position,
                expected: TrackKind::Audio,
            });
        }
        let track = catalog.track_at(position)?;
        Ok(Self::new(track, position))
    }
}

/// Identifying attributes of the subtitle track picked on the reference episode.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTemplate {
    pub title: Option<String>,
    pub language_code: Option<String>,
    pub codec: Option<String>,
    pub forced: bool,
    pub location: SubtitleLocation,
    /// 1-based position of the source track among its file's subtitle tracks.
    pub subtitle_streams_index: usize,
}

impl SubtitleTemplate {
    pub fn new(track: &Track, subtitle_streams_index: usize) -> Self {
        Self {
            title: track.title.clone(),
            language_code: track.language_code.clone(),
            codec: track.codec.clone(),
            forced: track.forced,
            location: SubtitleLocation::of(track),
            subtitle_streams_index,
        }
    }

    pub fn from_position(catalog: &StreamCatalog, position: usize) -> Result<Self, CatalogError> {
        let subtitle_position =
            catalog
                .subtitle_position(position)
                .ok_or(CatalogError::WrongKind {
                    position,
                    expected: TrackKind::Subtitle,
                })?;
        let track = catalog.track_at(position)?;
        Ok(Self::new(track, subtitle_position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::tests::example_part;

    #[test]
    fn test_audio_template() {
        let part = example_part();
        let template = AudioTemplate::new(&part.audio_tracks[0], 1);

        assert_eq!(template.audio_channel_layout.as_deref(), Some("5.1(side)"));
        assert_eq!(template.audio_streams_index, 1);
        assert_eq!(template.codec.as_deref(), Some("ac3"));
        assert_eq!(template.language_code.as_deref(), Some("eng"));
        assert_eq!(
            template.title.as_deref(),
            Some("Dolby Digital-EX 5.1 @ 640 kbps")
        );
    }

    #[test]
    fn test_subtitle_template() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);
        let template = SubtitleTemplate::from_position(&catalog, 3).unwrap();

        assert_eq!(template.codec.as_deref(), Some("srt"));
        assert!(!template.forced);
        assert_eq!(template.language_code.as_deref(), Some("eng"));
        assert_eq!(template.location, SubtitleLocation::Internal);
        assert_eq!(template.subtitle_streams_index, 1);
        assert_eq!(
            template.title.as_deref(),
            Some("English [for Dothraki spoken parts]")
        );

        let external = SubtitleTemplate::from_position(&catalog, 5).unwrap();
        assert_eq!(external.location, SubtitleLocation::External);
        assert_eq!(external.subtitle_streams_index, 3);
    }

    #[test]
    fn test_templates_reject_wrong_kind_of_position() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);

        let err = AudioTemplate::from_position(&catalog, 3).unwrap_err();
        assert_eq!(
            err,
            CatalogError::WrongKind {
                position: 3,
                expected: TrackKind::Audio
            }
        );
        assert_eq!(err.to_string(), "Position 3 holds no audio track");
        assert_eq!(
            SubtitleTemplate::from_position(&catalog, 2).unwrap_err(),
            CatalogError::WrongKind {
                position: 2,
                expected: TrackKind::Subtitle
            }
        );
        assert_eq!(
            AudioTemplate::from_position(&catalog, 9)
                .unwrap_err()
                .to_string(),
            "Position 9 holds no audio track"
        );
        assert_eq!(
            AudioTemplate::from_position(&catalog, 2)
                .unwrap()
                .audio_streams_index,
            2
        );
    }
}
