use crate::domain::catalog::StreamCatalog;
use crate::domain::models::{Episode, Track, TrackKind};
use crate::domain::template::{AudioTemplate, SubtitleTemplate};

const LEGEND: &str = "\n\t* = Currently enabled track.\n\n";

/// `S02E10 - Valar Morghulis`
pub fn episode_label(episode: &Episode) -> String {
    format!(
        "S{:02}E{:02} - {}",
        episode.season_number, episode.episode_number, episode.title
    )
}

/// Joins season numbers for a sentence: `2`, `2 and 5`, `1, 3, and 7`.
pub fn seasons_to_string(seasons: &[u32]) -> String {
    let mut text = String::new();
    for (i, season) in seasons.iter().enumerate() {
        if i > 0 {
            if seasons.len() > 2 {
                text.push(',');
            }
            text.push(' ');
            if i == seasons.len() - 1 {
                text.push_str("and ");
            }
        }
        text.push_str(&season.to_string());
    }
    text
}

pub fn plural_seasons(seasons: &[u32]) -> &'static str {
    if seasons.len() > 1 {
        "s"
    } else {
        ""
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn audio_line(position: usize, track: &Track) -> String {
    format!(
        "\t[{}{}] | Title: {} | Language: {} | Codec: {} | Channels: {}\n",
        position,
        if track.selected { "*" } else { "" },
        or_none(track.title.as_deref()),
        or_none(track.language_code.as_deref()),
        or_none(track.codec.as_deref()),
        or_none(track.audio_channel_layout.as_deref()),
    )
}

fn subtitle_line(position: usize, track: &Track) -> String {
    format!(
        "\t[{}{}] | Title: {} | Language: {} | Format: {} | Forced: {}\n",
        position,
        if track.selected { "*" } else { "" },
        or_none(track.title.as_deref()),
        or_none(track.language_code.as_deref()),
        or_none(track.codec.as_deref()),
        yes_no(track.forced),
    )
}

/// Lists every track of a file. Each track is labelled with the position used to select it.
pub fn render_streams(episode: &Episode, catalog: &StreamCatalog) -> String {
    let position = |track: &Track| catalog.position_of(track).unwrap_or_default();

    let mut out = format!(
        "\nAudio & subtitle settings for '{} {}':\n\nAudio:\n\n",
        episode.show_title,
        episode_label(episode)
    );
    for track in catalog.audio_tracks() {
        out.push_str(&audio_line(position(track), track));
    }
    out.push_str(LEGEND);

    if catalog.subtitle_tracks().is_empty() {
        return out;
    }

    let grouped = !catalog.internal_subs().is_empty() && !catalog.external_subs().is_empty();
    out.push_str("Subtitles:\n\n");
    if grouped {
        out.push_str("\tInternal:\n\n");
    }
    for &track in catalog.internal_subs() {
        out.push_str(&subtitle_line(position(track), track));
    }
    if grouped {
        out.push_str("\n\tExternal:\n\n");
    }
    for &track in catalog.external_subs() {
        out.push_str(&subtitle_line(position(track), track));
    }
    out.push_str(LEGEND);
    out
}

pub fn audio_template_line(template: &AudioTemplate) -> String {
    format!(
        "\tAudio | Title: {} | Language: {} | Codec: {} | Channels: {}",
        or_none(template.title.as_deref()),
        or_none(template.language_code.as_deref()),
        or_none(template.codec.as_deref()),
        or_none(template.audio_channel_layout.as_deref()),
    )
}

pub fn subtitle_template_line(template: Option<&SubtitleTemplate>) -> String {
    match template {
        Some(template) => format!(
            "\tSubtitles | Title: {} | Language: {} | Format: {} | Forced: {}",
            or_none(template.title.as_deref()),
            or_none(template.language_code.as_deref()),
            or_none(template.codec.as_deref()),
            yes_no(template.forced),
        ),
        None => "\tSubtitles | Disabled".to_string(),
    }
}

pub fn success_message(episode: &Episode, track: &Track) -> String {
    let descriptor = match (track.title.as_deref(), track.language_code.as_deref()) {
        (Some(title), _) if !title.is_empty() => format!("'{title}' "),
        (_, Some(language)) if !language.is_empty() => format!("'{language}' "),
        _ => String::new(),
    };
    format!(
        "Set {} {}for '{}'",
        track.kind,
        descriptor,
        episode_label(episode)
    )
}

pub fn reset_message(episode: &Episode) -> String {
    format!("Reset subtitles for '{}'", episode_label(episode))
}

pub fn no_match_message(kind: TrackKind, episode: &Episode) -> String {
    format!(
        "No {} matches found for '{}'",
        kind,
        episode_label(episode)
    )
}
