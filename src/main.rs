use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tabled::Table;

use scrobblesync::{
    config::{self, Settings},
    error, info,
    lastfm::LastfmClient,
    management::TokenStore,
    server,
    spotify::{SpotifyClient, auth::SpotifyAuth},
    sync::{Scheduler, SyncOrchestrator},
    types::WindowTableRow,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the authorization routes and keep the playlists in sync
    Run(RunOptions),

    /// Show the configured windows and their playlists
    Windows,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Run a single pass after authorization, then exit
    #[clap(long)]
    pub once: bool,

    /// Override REFRESH_INTERVAL_MINUTES
    #[clap(long)]
    pub interval_minutes: Option<u64>,

    /// Do not try to open the authorization page in a browser
    #[clap(long)]
    pub no_browser: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match cli.command {
        Command::Run(opt) => {
            if let Some(minutes) = opt.interval_minutes {
                settings.refresh_interval = match config::refresh_interval(minutes) {
                    Ok(interval) => interval,
                    Err(e) => error!("Invalid --interval-minutes: {}", e),
                };
            }
            run(settings, opt).await
        }
        Command::Windows => {
            let rows: Vec<WindowTableRow> = settings
                .windows
                .iter()
                .map(|w| WindowTableRow {
                    window: w.key.clone(),
                    playlist: w.playlist_id.clone(),
                    limit: w.track_limit,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Command::Completions(_) => {}
    }
}

async fn run(settings: Settings, opt: RunOptions) {
    let tokens = TokenStore::new(SpotifyAuth::new(&settings));
    let spotify = Arc::new(SpotifyClient::new(&settings, tokens.clone()));
    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::new(tokens.clone()),
        Arc::new(LastfmClient::new(&settings)),
        spotify.clone(),
        spotify,
        settings.windows.clone(),
    ));

    let address = settings.server_address.clone();
    let server_tokens = tokens.clone();
    tokio::spawn(async move {
        if let Err(e) = server::start_api_server(&address, server_tokens).await {
            error!("HTTP server stopped: {}", e);
        }
    });

    let authorize_url = settings.authorize_url();
    info!("Authorize spotify at {}...", authorize_url);
    if !opt.no_browser && webbrowser::open(&authorize_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            authorize_url
        );
    }

    let scheduler = Scheduler::new(orchestrator, settings.refresh_interval);
    if opt.once {
        scheduler.run_once().await;
    } else {
        scheduler.spawn().join().await;
    }
}
