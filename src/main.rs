mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod logging;
mod workflows;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use workflows::prompt::LinePrompter;
use workflows::session::{self, Presets};

fn main() {
    let cli = Cli::parse();
    logging::init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::load_settings(cli.overrides())?;
    let mut prompter = LinePrompter::new()?;

    let server = session::sign_in(settings, &mut prompter)?;

    let presets = Presets {
        library: cli.library,
        show: cli.show,
        seasons: cli.seasons,
    };
    session::run_session(&server, &mut prompter, presets, cli.no_confirm)
}
