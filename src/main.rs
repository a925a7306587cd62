use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use albumroom::{
    albums::RankingMode,
    cli::{self, CoverSource},
    config, error,
    matching::DEFAULT_CUTOFF,
    spotify::tracks::MAX_TOP_TRACKS,
    types::{PkceToken, TimeRange},
    utils,
};
use tokio::sync::Mutex;

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
    /// Authorize with Spotify API
    Auth,

    /// Extract albums from your top tracks
    Top(TopOptions),

    /// Extract albums from a playlist
    Playlist(PlaylistOptions),

    /// List extracted playlists
    Playlists,

    /// Download album covers and write the image mapping
    Covers(CoversOptions),

    /// Reorder playlist albums into playlist sequence
    Reorder(ReorderOptions),

    /// Rename cover images to match playlist order
    Rename(NameOption),

    /// Add genres, moods and top tracks to the image mapping
    Enrich(EnrichOptions),

    /// Fix image paths by fuzzy matching against the albums directory
    Relink(RelinkOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// short_term, medium_term or long_term
    #[clap(long, default_value = "long_term", value_parser = utils::parse_time_range)]
    pub time_range: TimeRange,

    /// Number of top tracks to fetch (1 to 50)
    #[clap(long, default_value_t = MAX_TOP_TRACKS, value_parser = utils::parse_top_limit)]
    pub limit: u32,

    /// popularity or representation
    #[clap(long, default_value = "popularity", value_parser = utils::parse_ranking_mode)]
    pub rank_by: RankingMode,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Playlist URL, URI or ID
    pub source: String,

    /// Maximum number of playlist tracks to fetch
    #[clap(long)]
    pub limit: Option<usize>,

    /// popularity or representation
    #[clap(long, default_value = "representation", value_parser = utils::parse_ranking_mode)]
    pub rank_by: RankingMode,
}

#[derive(Parser, Debug, Clone)]
pub struct CoversOptions {
    /// Playlist name (default: the most recent extraction)
    #[clap(long, conflicts_with_all = ["all", "top"])]
    pub playlist: Option<String>,

    /// Download covers for every extracted playlist
    #[clap(long, conflicts_with = "top")]
    pub all: bool,

    /// Download covers for the top albums
    #[clap(long)]
    pub top: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ReorderOptions {
    /// Name used as file prefix, e.g. ROOM
    #[clap(long)]
    pub name: String,

    /// Albums JSON written by `playlist`
    #[clap(long)]
    pub input: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct NameOption {
    /// Name used as file prefix, e.g. ROOM
    #[clap(long)]
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EnrichOptions {
    /// Name used as file prefix, e.g. ROOM
    #[clap(long)]
    pub name: String,

    /// JSON object of genres, moods and top tracks keyed by album name
    #[clap(long)]
    pub catalog: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct RelinkOptions {
    /// Name used as file prefix, e.g. ROOM
    #[clap(long)]
    pub name: String,

    /// Minimum similarity (0.0 to 1.0) for a file to match
    #[clap(long, default_value_t = DEFAULT_CUTOFF)]
    pub cutoff: f64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Top(opt) => cli::top_albums(opt.time_range, opt.limit, opt.rank_by).await,
        Command::Playlist(opt) => cli::playlist(opt.source, opt.limit, opt.rank_by).await,
        Command::Playlists => cli::list_playlists().await,
        Command::Covers(opt) => {
            let source = match (opt.playlist, opt.all, opt.top) {
                (Some(name), _, _) => CoverSource::Playlist(name),
                (None, true, _) => CoverSource::AllPlaylists,
                (None, false, true) => CoverSource::TopAlbums,
                (None, false, false) => CoverSource::Latest,
            };
            cli::covers(source).await
        }
        Command::Reorder(opt) => cli::reorder(opt.name, opt.input).await,
        Command::Rename(opt) => cli::rename(opt.name).await,
        Command::Enrich(opt) => cli::enrich(opt.name, opt.catalog).await,
        Command::Relink(opt) => cli::relink(opt.name, opt.cutoff).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
