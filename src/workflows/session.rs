use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use super::batch::{
    apply_reference, apply_to_seasons, FileReport, Outcome, Selection, SubtitleChoice,
};
use super::display::{
    audio_template_line, plural_seasons, render_streams, seasons_to_string,
    subtitle_template_line,
};
use super::prompt::{
    ask_audio_position, ask_choice, ask_number, ask_seasons, ask_subtitle_position, ask_yes_no,
    find_title, parse_seasons, parse_sxxexx, Prompter,
};
use crate::config::{ConnectionSettings, ServerConfig};
use crate::domain::catalog::StreamCatalog;
use crate::domain::models::{Episode, Library, Season, Show};
use crate::domain::template::{AudioTemplate, SubtitleTemplate};
use crate::infra::plex::PlexClient;
use crate::infra::MediaServer;

/// Answers supplied up front on the command line. Only used for the first show.
#[derive(Debug, Clone, Default)]
pub struct Presets {
    pub library: Option<String>,
    pub show: Option<String>,
    pub seasons: Option<String>,
}

/// Connects to the server, asking for the URL and token until the server accepts them.
pub fn sign_in(settings: ConnectionSettings, prompter: &mut dyn Prompter) -> Result<PlexClient> {
    let mut settings = settings;
    loop {
        let config = match settings.server_config() {
            Some(config) => config,
            None => ServerConfig {
                url: prompter
                    .read_line("Input server URL [Ex. https://192.168.1.50:32400]: ")?
                    .trim()
                    .to_string(),
                token: prompter
                    .read_line("Input Plex access token: ")?
                    .trim()
                    .to_string(),
                verify_tls: settings.verify_tls,
            },
        };

        println!("Signing in...");
        let client = PlexClient::new(&config)?;
        match client.friendly_name() {
            Ok(name) => {
                println!("Signed into server '{name}'.");
                info!(url = %config.url, "signed in");
                return Ok(client);
            }
            Err(e) => {
                println!("Error: {e}");
                settings.url = None;
                settings.token = None;
            }
        }
    }
}

/// Runs show after show until the user is done.
pub fn run_session(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    presets: Presets,
    no_confirm: bool,
) -> Result<()> {
    let mut presets = presets;
    loop {
        let library = select_library(server, prompter, presets.library.as_deref())?;
        let show = select_show(server, prompter, &library, presets.show.as_deref())?;
        let seasons = select_seasons(server, prompter, &show, presets.seasons.as_deref())?;
        presets = Presets::default();

        let numbers: Vec<u32> = seasons.iter().map(|season| season.index).collect();
        println!(
            "Adjusting audio & subtitle settings for Season{} {} of '{}'.",
            plural_seasons(&numbers),
            seasons_to_string(&numbers),
            show.title
        );

        let reference = choose_reference_episode(server, prompter, &show, &seasons[0])?;
        adjust_show(server, prompter, &show, &seasons, &reference, no_confirm)?;

        if !ask_yes_no(prompter, "Operations complete! Modify another show? [y/n]: ")? {
            return Ok(());
        }
    }
}

fn select_library(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    preset: Option<&str>,
) -> Result<Library> {
    let mut libraries: Vec<Library> = server
        .libraries()?
        .into_iter()
        .filter(Library::is_show_library)
        .collect();
    let titles: Vec<String> = libraries.iter().map(|lib| lib.title.clone()).collect();

    let idx = match (preset, libraries.len()) {
        (_, 0) => bail!("No TV Show libraries linked to account."),
        (Some(title), _) => find_title(&titles, title)
            .with_context(|| format!("'{title}' is not a TV library."))?,
        (None, 1) => 0,
        (None, _) => ask_choice(
            prompter,
            &format!("Which library is the show in? [{}]: ", titles.join("|")),
            &titles,
        )?,
    };
    Ok(libraries.swap_remove(idx))
}

fn select_show(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    library: &Library,
    preset: Option<&str>,
) -> Result<Show> {
    let mut shows = server.shows(library)?;
    let titles: Vec<String> = shows.iter().map(|show| show.title.clone()).collect();

    if let Some(title) = preset {
        let idx = find_title(&titles, title)
            .with_context(|| format!("'{title}' is not in library '{}'.", library.title))?;
        return Ok(shows.swap_remove(idx));
    }

    let mut completions = titles.clone();
    completions.push("list".to_string());
    prompter.set_completions(completions);

    let idx = loop {
        let input = prompter.read_line("Which show should we adjust? (Type 'list' to see all shows): ")?;
        if input.trim().eq_ignore_ascii_case("list") {
            for title in &titles {
                println!("{title}");
            }
            continue;
        }
        match find_title(&titles, &input) {
            Some(idx) => break idx,
            None => println!(
                "Error: '{}' is not in library '{}'.",
                input.trim(),
                library.title
            ),
        }
    };

    prompter.set_completions(Vec::new());
    Ok(shows.swap_remove(idx))
}

fn select_seasons(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    show: &Show,
    preset: Option<&str>,
) -> Result<Vec<Season>> {
    let available = server.seasons(show)?;
    if available.is_empty() {
        bail!("'{}' has no seasons in your library.", show.title);
    }
    let indices: Vec<u32> = available.iter().map(|season| season.index).collect();

    let chosen = match preset {
        Some(input) => parse_seasons(input, &indices)
            .with_context(|| format!("Invalid seasons '{input}'"))?,
        None => ask_seasons(prompter, &show.title, &indices)?,
    };
    debug!(?chosen, "seasons selected");

    Ok(chosen
        .into_iter()
        .filter_map(|index| available.iter().find(|season| season.index == index).cloned())
        .collect())
}

fn choose_reference_episode(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    show: &Show,
    first_season: &Season,
) -> Result<Episode> {
    let first = server
        .episodes(first_season)?
        .into_iter()
        .next()
        .with_context(|| format!("{} of '{}' has no episodes.", first_season.title, show.title))?;
    let mut episode = server.load_episode(&first)?;
    print_episode(&episode)?;

    while ask_yes_no(prompter, "Display settings for another episode? [y/n]: ")? {
        let input = prompter.read_line("Season number (or SxxEyy): ")?;
        let (season_number, episode_number) = match parse_sxxexx(&input) {
            Some(reference) => reference,
            None => match input.trim().parse() {
                Ok(season_number) => {
                    let episode_number = ask_number(prompter, "Episode number: ")?;
                    match u32::try_from(episode_number) {
                        Ok(episode_number) => (season_number, episode_number),
                        Err(_) => {
                            println!("Error: '{episode_number}' is not an episode number.");
                            continue;
                        }
                    }
                }
                Err(_) => {
                    println!("Error: '{}' is not an integer.", input.trim());
                    continue;
                }
            },
        };

        match server.find_episode(show, season_number, episode_number) {
            Ok(found) => {
                episode = found;
                print_episode(&episode)?;
            }
            Err(e) => println!("{e}"),
        }
    }

    Ok(episode)
}

fn print_episode(episode: &Episode) -> Result<()> {
    let part = episode
        .parts
        .first()
        .with_context(|| format!("'{}' has no media files.", episode.title))?;
    print!("{}", render_streams(episode, &StreamCatalog::from_part(part)));
    Ok(())
}

fn adjust_show(
    server: &dyn MediaServer,
    prompter: &mut dyn Prompter,
    show: &Show,
    seasons: &[Season],
    episode: &Episode,
    no_confirm: bool,
) -> Result<()> {
    let part = episode
        .parts
        .first()
        .with_context(|| format!("'{}' has no media files.", episode.title))?;
    let catalog = StreamCatalog::from_part(part);
    if catalog.is_empty() {
        println!("'{}' has no audio or subtitle tracks.", episode.title);
        return Ok(());
    }

    let audio_position = if ask_yes_no(prompter, "Do you want to switch audio tracks? [y/n]: ")? {
        Some(ask_audio_position(prompter, &catalog)?)
    } else {
        None
    };
    let subtitle_position = if ask_yes_no(prompter, "Do you want to switch subtitle tracks? [y/n]: ")? {
        Some(ask_subtitle_position(prompter, &catalog)?)
    } else {
        None
    };

    let audio = audio_position
        .map(|position| AudioTemplate::from_position(&catalog, position))
        .transpose()?;
    let subtitles = match subtitle_position {
        None => SubtitleChoice::Unchanged,
        Some(None) => SubtitleChoice::Disable,
        Some(Some(position)) => {
            SubtitleChoice::Match(SubtitleTemplate::from_position(&catalog, position)?)
        }
    };
    let selection = Selection { audio, subtitles };
    if selection.is_empty() {
        return Ok(());
    }

    let numbers: Vec<u32> = seasons.iter().map(|season| season.index).collect();
    println!(
        "Matching Season{} {} of {} to the following tracks:\n",
        plural_seasons(&numbers),
        seasons_to_string(&numbers),
        show.title
    );
    if let Some(template) = &selection.audio {
        println!("{}", audio_template_line(template));
    }
    match &selection.subtitles {
        SubtitleChoice::Unchanged => {}
        SubtitleChoice::Disable => println!("{}", subtitle_template_line(None)),
        SubtitleChoice::Match(template) => println!("{}", subtitle_template_line(Some(template))),
    }
    if !no_confirm && !ask_yes_no(prompter, "\nProceed? [y/n]: ")? {
        return Ok(());
    }

    let audio_track = audio_position
        .map(|position| catalog.track_at(position))
        .transpose()?;
    let subtitle_track = match subtitle_position {
        Some(Some(position)) => Some(Some(catalog.track_at(position)?)),
        Some(None) => Some(None),
        None => None,
    };
    let reference = apply_reference(server, episode, part, audio_track, subtitle_track);

    let mut report = apply_to_seasons(server, seasons, part.id, &selection);
    report.record_reference(reference);
    let applied = report.count(|outcome| matches!(outcome, Outcome::Applied { .. } | Outcome::Cleared));
    let unmatched = report.count(|outcome| matches!(outcome, Outcome::NoMatch(_)));
    let failed = report.count(|outcome| matches!(outcome, Outcome::Failed(_)));
    info!(applied, unmatched, failed, skipped = report.skipped.len(), "show adjusted");

    println!("\nUpdated {applied} track setting(s) across {} file(s).", report.files.len());
    let unresolved: Vec<&FileReport> = report.unresolved().collect();
    if !unresolved.is_empty() {
        println!("Files to check by hand:");
        for file in unresolved {
            println!("\t{} (part {})", file.episode, file.part_id);
        }
    }
    for label in &report.skipped {
        println!("\tNot processed: {label}");
    }

    Ok(())
}
