use anyhow::{bail, Result};
use regex::Regex;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::sync::OnceLock;
use thiserror::Error;

use crate::domain::catalog::StreamCatalog;

/// Source of user answers. The workflow only talks to the terminal through this trait.
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Offers tab completion for the next prompts. Empty disables it.
    fn set_completions(&mut self, _options: Vec<String>) {}
}

/// Tab completion over a fixed list of titles, matched case-insensitively on the whole line.
#[derive(Default)]
pub struct TitleCompleter {
    options: Vec<String>,
}

impl Completer for TitleCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let typed = line[..pos].to_lowercase();
        let matches = self
            .options
            .iter()
            .filter(|option| option.to_lowercase().starts_with(&typed))
            .cloned()
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for TitleCompleter {
    type Hint = String;
}

impl Highlighter for TitleCompleter {}

impl Validator for TitleCompleter {}

impl Helper for TitleCompleter {}

pub struct LinePrompter {
    editor: Editor<TitleCompleter, DefaultHistory>,
}

impl LinePrompter {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(TitleCompleter::default()));
        Ok(Self { editor })
    }
}

impl Prompter for LinePrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) => {
                bail!("Interrupted");
            }
            Err(ReadlineError::Eof) => {
                bail!("EOF");
            }
            Err(err) => Err(err.into()),
        }
    }

    fn set_completions(&mut self, options: Vec<String>) {
        self.editor.set_helper(Some(TitleCompleter { options }));
    }
}

pub fn ask_yes_no(prompter: &mut dyn Prompter, prompt: &str) -> Result<bool> {
    loop {
        let input = prompter.read_line(prompt)?.trim().to_lowercase();
        match input.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Error: Invalid input"),
        }
    }
}

pub fn ask_number(prompter: &mut dyn Prompter, prompt: &str) -> Result<i64> {
    loop {
        let input = prompter.read_line(prompt)?;
        match input.trim().parse() {
            Ok(number) => return Ok(number),
            Err(_) => println!("Error: '{}' is not an integer.", input.trim()),
        }
    }
}

/// Asks until the answer matches one of `options` case-insensitively. Returns its index.
pub fn ask_choice(prompter: &mut dyn Prompter, prompt: &str, options: &[String]) -> Result<usize> {
    prompter.set_completions(options.to_vec());
    let choice = loop {
        let input = prompter.read_line(prompt)?;
        if let Some(idx) = find_title(options, &input) {
            break idx;
        }
        println!("Error: '{}' is not one of [{}].", input.trim(), options.join("|"));
    };
    prompter.set_completions(Vec::new());
    Ok(choice)
}

pub fn find_title(options: &[String], input: &str) -> Option<usize> {
    let wanted = input.trim().to_lowercase();
    options
        .iter()
        .position(|option| option.to_lowercase() == wanted)
}

/// Asks for the catalog position of an audio track.
pub fn ask_audio_position(prompter: &mut dyn Prompter, catalog: &StreamCatalog) -> Result<usize> {
    loop {
        let number = ask_number(
            prompter,
            "Choose the number for the audio track you'd like to switch to: ",
        )?;
        match usize::try_from(number) {
            Ok(position) if catalog.is_audio_position(position) => return Ok(position),
            _ => println!("Error: Number does not correspond to an audio track."),
        }
    }
}

/// Asks for the catalog position of a subtitle track. A blank answer (`None`) disables subtitles.
pub fn ask_subtitle_position(
    prompter: &mut dyn Prompter,
    catalog: &StreamCatalog,
) -> Result<Option<usize>> {
    loop {
        let input = prompter.read_line(
            "Choose the number for the subtitle track you'd like to switch to, or leave blank to disable subtitles: ",
        )?;
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        match input.parse::<usize>() {
            Ok(position) if catalog.is_subtitle_position(position) => return Ok(Some(position)),
            Ok(_) => println!("Error: Number does not correspond to a subtitle track."),
            Err(_) if input.parse::<i64>().is_ok() => {
                println!("Error: Number does not correspond to a subtitle track.")
            }
            Err(_) => println!("Error: '{input}' is not an integer."),
        }
    }
}

pub fn ask_seasons(
    prompter: &mut dyn Prompter,
    show_title: &str,
    available: &[u32],
) -> Result<Vec<u32>> {
    loop {
        let listing: Vec<String> = available.iter().map(u32::to_string).collect();
        println!(
            "You have the following seasons of '{show_title}': [{}]",
            listing.join("|")
        );
        let input = prompter.read_line(
            "Which season(s) should we adjust? [Comma-separated, 'all' for entire series]: ",
        )?;

        match parse_seasons(&input, available) {
            Ok(seasons) => return Ok(seasons),
            Err(SeasonError::NotANumber(value)) => {
                println!("Error: '{value}' is not an integer.")
            }
            Err(SeasonError::NotInLibrary(season)) => {
                println!("Error: Season {season} of '{show_title}' is not in your library.")
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeasonError {
    #[error("'{0}' is not an integer.")]
    NotANumber(String),

    #[error("Season {0} is not in your library.")]
    NotInLibrary(u32),
}

/// Parses a comma-separated season list (spaces ignored) or `all`, keeping the given order.
/// A season listed twice is kept once.
pub fn parse_seasons(input: &str, available: &[u32]) -> Result<Vec<u32>, SeasonError> {
    if input.trim() == "all" {
        return Ok(available.to_vec());
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut seasons = Vec::new();
    for value in compact.split(',') {
        let season: u32 = value
            .parse()
            .map_err(|_| SeasonError::NotANumber(value.to_string()))?;
        if !available.contains(&season) {
            return Err(SeasonError::NotInLibrary(season));
        }
        if !seasons.contains(&season) {
            seasons.push(season);
        }
    }
    Ok(seasons)
}

/// Parses an episode reference such as `S02E10`.
pub fn parse_sxxexx(input: &str) -> Option<(u32, u32)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^s(\d{1,3})e(\d{1,4})$").expect("episode reference pattern is valid")
    });
    let caps = re.captures(input.trim())?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::catalog::tests::example_part;
    use anyhow::anyhow;
    use std::collections::VecDeque;

    /// Replays canned answers in order.
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
            }
        }

        pub(crate) fn remaining(&self) -> usize {
            self.answers.len()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow!("no scripted answer for prompt {prompt:?}"))
        }
    }

    #[test]
    fn test_ask_number_retries_until_integer() {
        let mut prompter = ScriptedPrompter::new(&["7", "not_valid", "42"]);
        assert_eq!(ask_number(&mut prompter, "").unwrap(), 7);
        assert_eq!(ask_number(&mut prompter, "").unwrap(), 42);
    }

    #[test]
    fn test_ask_yes_no() {
        let mut prompter = ScriptedPrompter::new(&["y", "N", "not_valid", "yes"]);
        assert!(ask_yes_no(&mut prompter, "").unwrap());
        assert!(!ask_yes_no(&mut prompter, "").unwrap());
        assert!(ask_yes_no(&mut prompter, "").unwrap());
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_ask_choice_is_case_insensitive() {
        let options = vec!["TV Shows".to_string(), "Anime".to_string()];
        let mut prompter = ScriptedPrompter::new(&["tv shows", "invalid", "ANIME"]);
        assert_eq!(ask_choice(&mut prompter, "", &options).unwrap(), 0);
        assert_eq!(ask_choice(&mut prompter, "", &options).unwrap(), 1);
    }

    #[test]
    fn test_ask_audio_position_rejects_subtitles() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);
        let mut prompter = ScriptedPrompter::new(&["3", "5", "10", "-1", "1"]);

        assert_eq!(ask_audio_position(&mut prompter, &catalog).unwrap(), 1);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_ask_subtitle_position() {
        let part = example_part();
        let catalog = StreamCatalog::from_part(&part);
        let mut prompter = ScriptedPrompter::new(&["2", "6", "3", "5", ""]);

        assert_eq!(ask_subtitle_position(&mut prompter, &catalog).unwrap(), Some(3));
        assert_eq!(ask_subtitle_position(&mut prompter, &catalog).unwrap(), Some(5));
        assert_eq!(ask_subtitle_position(&mut prompter, &catalog).unwrap(), None);
    }

    #[test]
    fn test_parse_seasons() {
        let available = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            parse_seasons("1, 2invalid, 4", &available),
            Err(SeasonError::NotANumber("2invalid".to_string()))
        );
        assert_eq!(
            parse_seasons("3, 15", &available),
            Err(SeasonError::NotInLibrary(15))
        );
        assert_eq!(parse_seasons("2", &available), Ok(vec![2]));
        assert_eq!(parse_seasons("5, 3, 6", &available), Ok(vec![5, 3, 6]));
        assert_eq!(parse_seasons("all", &available), Ok(available.to_vec()));
        assert_eq!(parse_seasons("3, 1, 3,1", &available), Ok(vec![3, 1]));
    }

    #[test]
    fn test_ask_seasons_reprompts_on_invalid_lists() {
        let mut prompter = ScriptedPrompter::new(&["1, 2invalid, 4", "3, 15", "2"]);
        let seasons = ask_seasons(&mut prompter, "Game of Thrones", &[1, 2, 3]).unwrap();
        assert_eq!(seasons, vec![2]);
    }

    #[test]
    fn test_parse_sxxexx() {
        assert_eq!(parse_sxxexx("S02E10"), Some((2, 10)));
        assert_eq!(parse_sxxexx(" s1e3 "), Some((1, 3)));
        assert_eq!(parse_sxxexx("2x10"), None);
    }

    #[test]
    fn test_completer_matches_prefix() {
        let completer = TitleCompleter {
            options: vec!["Game of Thrones".to_string(), "Gilmore Girls".to_string()],
        };
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, matches) = completer.complete("game", 4, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["Game of Thrones".to_string()]);
    }
}
