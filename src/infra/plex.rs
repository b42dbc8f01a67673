use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::MediaServer;
use crate::config::ServerConfig;
use crate::domain::models::{Episode, Library, MediaPart, Season, Show, Track, TrackKind};

const STREAM_TYPE_AUDIO: u8 = 2;
const STREAM_TYPE_SUBTITLE: u8 = 3;
const LIBTYPE_SHOW: u8 = 2;

/// Blocking client for the HTTP API of a Plex Media Server.
#[derive(Debug, Clone)]
pub struct PlexClient {
    base_url: String,
    token: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerIdentity {
    friendly_name: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataContainer {
    grandparent_title: Option<String>,
    parent_index: Option<u32>,
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataEntry {
    /// Absent on synthetic entries such as "All episodes".
    rating_key: Option<String>,
    title: String,
    index: Option<u32>,
    parent_index: Option<u32>,
    grandparent_title: Option<String>,
    #[serde(rename = "Media", default)]
    media: Vec<MediaEntry>,
}

#[derive(Debug, Deserialize)]
struct MediaEntry {
    #[serde(rename = "Part", default)]
    parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
struct PartEntry {
    id: u64,
    #[serde(rename = "Stream", default)]
    streams: Vec<StreamEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamEntry {
    id: u64,
    stream_type: u8,
    index: Option<i64>,
    title: Option<String>,
    language_code: Option<String>,
    codec: Option<String>,
    audio_channel_layout: Option<String>,
    #[serde(default)]
    forced: bool,
    #[serde(default)]
    selected: bool,
}

impl PlexClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        })
    }

    /// Name of the server, also used to check that the URL and token are valid.
    pub fn friendly_name(&self) -> Result<String> {
        let identity: ServerIdentity = self.get("/", &[])?;
        Ok(identity.friendly_name)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Plex-Token", self.token.as_str())
            .header("Accept", "application/json")
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .request(self.http.get(&url))
            .query(query)
            .send()
            .with_context(|| format!("No server found at {}", self.base_url))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            bail!("Invalid Plex token for {}", self.base_url);
        }
        if !status.is_success() {
            bail!("Plex request GET {path} failed: HTTP {status}");
        }

        let envelope: Envelope<T> = serde_json::from_str(&response.text()?)
            .with_context(|| format!("Unexpected response from GET {path}"))?;
        Ok(envelope.media_container)
    }

    fn put(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "PUT");

        let response = self.request(self.http.put(&url)).query(query).send()?;
        if !response.status().is_success() {
            bail!("Plex request PUT {path} failed: HTTP {}", response.status());
        }
        Ok(())
    }

    fn update_part(&self, part: &MediaPart, param: &str, stream_id: u64) -> Result<()> {
        self.put(
            &format!("/library/parts/{}", part.id),
            &[(param, stream_id.to_string()), ("allParts", "1".to_string())],
        )
    }
}

impl MediaServer for PlexClient {
    fn libraries(&self) -> Result<Vec<Library>> {
        let container: DirectoryContainer = self.get("/library/sections", &[])?;
        Ok(container
            .directories
            .into_iter()
            .map(|entry| Library {
                key: entry.key,
                title: entry.title,
                kind: entry.kind,
            })
            .collect())
    }

    fn shows(&self, library: &Library) -> Result<Vec<Show>> {
        let container: MetadataContainer = self.get(
            &format!("/library/sections/{}/all", library.key),
            &[("type", LIBTYPE_SHOW.to_string())],
        )?;
        Ok(container
            .metadata
            .into_iter()
            .filter_map(|entry| {
                Some(Show {
                    rating_key: entry.rating_key?,
                    title: entry.title,
                })
            })
            .collect())
    }

    fn seasons(&self, show: &Show) -> Result<Vec<Season>> {
        let container: MetadataContainer = self.get(
            &format!("/library/metadata/{}/children", show.rating_key),
            &[("excludeAllLeaves", "1".to_string())],
        )?;
        Ok(seasons_from(container))
    }

    fn episodes(&self, season: &Season) -> Result<Vec<Episode>> {
        let container: MetadataContainer = self.get(
            &format!("/library/metadata/{}/children", season.rating_key),
            &[],
        )?;
        Ok(episodes_from(container))
    }

    fn load_episode(&self, episode: &Episode) -> Result<Episode> {
        let container: MetadataContainer =
            self.get(&format!("/library/metadata/{}", episode.rating_key), &[])?;
        episodes_from(container)
            .into_iter()
            .next()
            .with_context(|| format!("Episode '{}' disappeared from the server", episode.title))
    }

    fn set_active_audio_track(&self, part: &MediaPart, track: &Track) -> Result<()> {
        self.update_part(part, "audioStreamID", track.id)
    }

    fn set_active_subtitle_track(&self, part: &MediaPart, track: &Track) -> Result<()> {
        self.update_part(part, "subtitleStreamID", track.id)
    }

    fn clear_subtitle_track(&self, part: &MediaPart) -> Result<()> {
        self.update_part(part, "subtitleStreamID", 0)
    }
}

fn seasons_from(container: MetadataContainer) -> Vec<Season> {
    container
        .metadata
        .into_iter()
        .filter_map(|entry| {
            Some(Season {
                rating_key: entry.rating_key?,
                index: entry.index.unwrap_or_default(),
                title: entry.title,
            })
        })
        .collect()
}

fn episodes_from(container: MetadataContainer) -> Vec<Episode> {
    let MetadataContainer {
        grandparent_title,
        parent_index,
        metadata,
    } = container;

    metadata
        .into_iter()
        .filter_map(|entry| {
            Some(Episode {
                rating_key: entry.rating_key?,
                show_title: entry
                    .grandparent_title
                    .or_else(|| grandparent_title.clone())
                    .unwrap_or_default(),
                season_number: entry.parent_index.or(parent_index).unwrap_or_default(),
                episode_number: entry.index.unwrap_or_default(),
                title: entry.title,
                parts: entry
                    .media
                    .into_iter()
                    .next()
                    .map(|media| media.parts.into_iter().map(part_from).collect())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn part_from(entry: PartEntry) -> MediaPart {
    let mut part = MediaPart {
        id: entry.id,
        audio_tracks: Vec::new(),
        subtitle_tracks: Vec::new(),
    };

    for stream in entry.streams {
        let kind = match stream.stream_type {
            STREAM_TYPE_AUDIO => TrackKind::Audio,
            STREAM_TYPE_SUBTITLE => TrackKind::Subtitle,
            _ => continue,
        };
        let track = Track {
            id: stream.id,
            kind,
            // Sidecar subtitles are reported without a container index
            index: stream.index.unwrap_or(-1),
            title: stream.title,
            language_code: stream.language_code,
            codec: stream.codec,
            audio_channel_layout: stream.audio_channel_layout,
            forced: stream.forced,
            selected: stream.selected,
        };
        match kind {
            TrackKind::Audio => part.audio_tracks.push(track),
            TrackKind::Subtitle => part.subtitle_tracks.push(track),
        }
    }

    part
}
