use crate::domain::models::{MediaPart, Track};
use crate::error::CatalogError;

/// Audio and subtitle tracks of one media file with 1-based positional addressing.
///
/// Positions always refer to `audio ++ subtitles` in server order. The
/// internal/external split only affects how tracks are grouped when listed.
#[derive(Debug, Clone)]
pub struct StreamCatalog<'a> {
    audio_tracks: &'a [Track],
    subtitle_tracks: &'a [Track],
    internal_subs: Vec<&'a Track>,
    external_subs: Vec<&'a Track>,
}

impl<'a> StreamCatalog<'a> {
    pub fn new(audio_tracks: &'a [Track], subtitle_tracks: &'a [Track]) -> Self {
        let (internal_subs, external_subs) = subtitle_tracks
            .iter()
            .partition::<Vec<&Track>, _>(|track| !track.is_external());

        Self {
            audio_tracks,
            subtitle_tracks,
            internal_subs,
            external_subs,
        }
    }

    pub fn from_part(part: &'a MediaPart) -> Self {
        Self::new(&part.audio_tracks, &part.subtitle_tracks)
    }

    pub fn audio_tracks(&self) -> &'a [Track] {
        self.audio_tracks
    }

    pub fn subtitle_tracks(&self) -> &'a [Track] {
        self.subtitle_tracks
    }

    pub fn internal_subs(&self) -> &[&'a Track] {
        &self.internal_subs
    }

    pub fn external_subs(&self) -> &[&'a Track] {
        &self.external_subs
    }

    pub fn len(&self) -> usize {
        self.audio_tracks.len() + self.subtitle_tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn all_tracks(&self) -> impl Iterator<Item = &'a Track> {
        let (audio, subtitles) = (self.audio_tracks, self.subtitle_tracks);
        audio.iter().chain(subtitles.iter())
    }

    pub fn position_of(&self, track: &Track) -> Result<usize, CatalogError> {
        self.all_tracks()
            .position(|candidate| candidate.id == track.id)
            .map(|idx| idx + 1)
            .ok_or(CatalogError::NotFound { id: track.id })
    }

    pub fn track_at(&self, position: usize) -> Result<&'a Track, CatalogError> {
        let total = self.len();
        if position < 1 || position > total {
            return Err(CatalogError::OutOfRange { position, total });
        }

        let idx = position - 1;
        Ok(match self.audio_tracks.get(idx) {
            Some(track) => track,
            None => &self.subtitle_tracks[idx - self.audio_tracks.len()],
        })
    }

    pub fn is_audio_position(&self, position: usize) -> bool {
        position >= 1 && position <= self.audio_tracks.len()
    }

    pub fn is_subtitle_position(&self, position: usize) -> bool {
        position > self.audio_tracks.len() && position <= self.len()
    }

    /// Maps a combined position onto the 1-based position inside the subtitle list.
    pub fn subtitle_position(&self, position: usize) -> Option<usize> {
        self.is_subtitle_position(position)
            .then(|| position - self.audio_tracks.len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::models::TrackKind;

    pub(crate) fn audio(id: u64, title: &str, lang: &str, codec: &str, layout: &str) -> Track {
        Track {
            id,
            kind: TrackKind::Audio,
            index: id as i64,
            title: Some(title.to_string()).filter(|t| !t.is_empty()),
            language_code: Some(lang.to_string()),
            codec: Some(codec.to_string()),
            audio_channel_layout: Some(layout.to_string()),
            forced: false,
            selected: false,
        }
    }

    pub(crate) fn subtitle(
        id: u64,
        index: i64,
        title: Option<&str>,
        lang: &str,
        codec: &str,
        forced: bool,
    ) -> Track {
        Track {
            id,
            kind: TrackKind::Subtitle,
            index,
            title: title.map(str::to_string),
            language_code: Some(lang.to_string()),
            codec: Some(codec.to_string()),
            audio_channel_layout: None,
            forced,
            selected: false,
        }
    }

    /// Streams of "Game of Thrones S02E10": two audio tracks, two embedded and one sidecar subtitle.
    pub(crate) fn example_part() -> MediaPart {
        let mut first_audio = audio(
            101,
            "Dolby Digital-EX 5.1 @ 640 kbps",
            "eng",
            "ac3",
            "5.1(side)",
        );
        first_audio.selected = true;
        let mut first_sub = subtitle(
            201,
            3,
            Some("English [for Dothraki spoken parts]"),
            "eng",
            "srt",
            false,
        );
        first_sub.selected = true;

        MediaPart {
            id: 1,
            audio_tracks: vec![
                first_audio,
                audio(
                    102,
                    "Dolby TrueHD Atmos 7.1 @ 4382 kbps / 24-bit",
                    "eng",
                    "truehd",
                    "7.1",
                ),
            ],
            subtitle_tracks: vec![
                first_sub,
                subtitle(202, 4, None, "eng", "srt", false),
                subtitle(203, -1, None, "eng", "srt", false),
            ],
        }
    }

    #[test]
    fn test_example_catalog_positions() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.internal_subs().len(), 2);
        assert_eq!(catalog.external_subs().len(), 1);

        assert_eq!(catalog.position_of(&part.audio_tracks[0]), Ok(1));
        assert_eq!(catalog.position_of(&part.subtitle_tracks[0]), Ok(3));
        assert_eq!(catalog.position_of(&part.subtitle_tracks[2]), Ok(5));
        assert_eq!(catalog.track_at(1).unwrap().id, 101);
        assert_eq!(catalog.track_at(3).unwrap().id, 201);

        assert!(catalog.is_audio_position(1));
        assert!(!catalog.is_audio_position(3));
        assert!(catalog.is_subtitle_position(3));
        assert!(!catalog.is_subtitle_position(1));
        assert!(!catalog.is_subtitle_position(6));
    }

    #[test]
    fn test_position_round_trip() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);

        for position in 1..=catalog.len() {
            let track = catalog.track_at(position).unwrap();
            assert_eq!(catalog.position_of(track), Ok(position));
        }
    }

    #[test]
    fn test_position_predicates_partition_range() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);

        for position in 0..=catalog.len() + 2 {
            let in_range = position >= 1 && position <= catalog.len();
            let audio = catalog.is_audio_position(position);
            let subtitle = catalog.is_subtitle_position(position);
            assert!(!(audio && subtitle), "position {position} is both");
            assert_eq!(audio || subtitle, in_range, "position {position}");
        }
    }

    #[test]
    fn test_out_of_range_and_missing_track() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);

        assert_eq!(
            catalog.track_at(0),
            Err(CatalogError::OutOfRange {
                position: 0,
                total: 5
            })
        );
        assert!(catalog.track_at(6).is_err());

        let stranger = subtitle(999, 0, None, "eng", "srt", false);
        assert_eq!(
            catalog.position_of(&stranger),
            Err(CatalogError::NotFound { id: 999 })
        );
    }

    #[test]
    fn test_selection_order_ignores_internal_external_split() {
        let part = MediaPart {
            id: 7,
            audio_tracks: vec![audio(1, "Main", "eng", "aac", "stereo")],
            subtitle_tracks: vec![
                subtitle(10, -1, Some("Sidecar"), "eng", "srt", false),
                subtitle(11, 2, Some("Embedded"), "eng", "pgs", false),
            ],
        };
        let catalog = StreamCatalog::from_part(&part);

        // Selection positions follow server order
        assert_eq!(catalog.track_at(2).unwrap().id, 10);
        assert_eq!(catalog.track_at(3).unwrap().id, 11);
        assert_eq!(catalog.subtitle_position(3), Some(2));
        assert_eq!(catalog.subtitle_position(1), None);

        assert_eq!(catalog.internal_subs()[0].id, 11);
        assert_eq!(catalog.external_subs()[0].id, 10);
    }
}
