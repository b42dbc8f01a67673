use clap::Parser;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "plex-track-matcher")]
#[command(
    about = "Pick audio and subtitle tracks on one episode and apply the closest match to a whole show on a Plex server"
)]
pub struct Cli {
    /// Plex server URL, e.g. https://192.168.1.50:32400
    #[arg(long)]
    pub url: Option<String>,

    /// Plex access token
    #[arg(long)]
    pub token: Option<String>,

    /// Verify the server's TLS certificate
    #[arg(long)]
    pub verify_tls: bool,

    /// TV library to use instead of prompting
    #[arg(long)]
    pub library: Option<String>,

    /// Show to adjust instead of prompting
    #[arg(long)]
    pub show: Option<String>,

    /// Seasons to adjust (comma-separated or "all") instead of prompting
    #[arg(long)]
    pub seasons: Option<String>,

    /// Skip the confirmation before tracks are changed
    #[arg(long)]
    pub no_confirm: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            token: self.token.clone(),
            verify_tls: self.verify_tls,
        }
    }
}
