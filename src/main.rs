use std::{error::Error, io, path::Path, process, sync::Arc};

use clap::{command, Parser, Subcommand, ValueHint};
use log::{debug, error, info, warn, LevelFilter};

use spotify_streamer::{
    catalog::{Catalog, WebCatalog},
    config::Config,
    events::Event,
    index::RebuildPolicy,
    search::ArtistSearch,
    token::AccessToken,
    top_tracks::TopTracks,
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when built in release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Secrets file
    ///
    /// TOML file with an `access_token` for the catalog. When the file does
    /// not exist, requests are made without authentication.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("secrets.toml"))]
    secrets_file: String,

    /// Market to rank top tracks for
    ///
    /// Two-letter country code.
    #[arg(short, long, default_value_t = String::from(Config::DEFAULT_MARKET))]
    market: String,

    /// Maximum number of artists per search
    #[arg(short, long, default_value_t = Config::DEFAULT_SEARCH_LIMIT)]
    limit: u8,

    /// Only rebuild the track index when the first track changes
    #[arg(long, default_value_t = false)]
    legacy_rebuild: bool,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Search artists by name
    Search {
        query: String,

        /// Also list the top tracks of the artist at this position
        #[arg(short = 'n', long)]
        select: Option<usize>,
    },

    /// List the top tracks of an artist
    Tracks {
        /// Artist id, or an artist as JSON
        artist: String,
    },
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
        logger.filter_module("spotify_streamer", level);
    }

    logger.init();
}

/// Loads the access token, if there is a secrets file.
fn load_token(secrets_file: &str) -> Result<Option<AccessToken>, Box<dyn Error>> {
    if !Path::new(secrets_file).exists() {
        warn!("{secrets_file} not found, continuing without access token");
        return Ok(None);
    }

    Ok(Some(AccessToken::from_file(secrets_file)?))
}

fn config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = match load_token(&args.secrets_file)? {
        Some(token) => Config::with_token(token),
        None => Config::new(),
    };

    config.set_market(&args.market)?;
    config.search_limit = args.limit;
    if args.legacy_rebuild {
        config.rebuild_policy = RebuildPolicy::FirstId;
    }

    Ok(config)
}

async fn search(
    catalog: Arc<dyn Catalog>,
    query: &str,
    select: Option<usize>,
    policy: RebuildPolicy,
) -> Result<(), Box<dyn Error>> {
    let mut search = ArtistSearch::new(Arc::clone(&catalog));
    if !search.search(query) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "query must not be blank").into());
    }

    let event = tokio::select! {
        // Prioritize shutdown signals.
        biased;

        _ = tokio::signal::ctrl_c() => {
            info!("search cancelled");
            return Ok(());
        }

        Some(event) = search.next_event() => event,
    };

    if let Some(notice) = event.notice() {
        println!("{notice}");
        return Ok(());
    }

    for (position, artist) in search.artists().iter().enumerate() {
        println!("{position:>3}  {}  [{}]", artist.name, artist.id);
    }

    if let Some(position) = select {
        let selection = search.select(position)?;
        tracks(catalog.as_ref(), &selection, policy).await?;
    }

    Ok(())
}

async fn tracks(
    catalog: &dyn Catalog,
    artist: &str,
    policy: RebuildPolicy,
) -> Result<(), Box<dyn Error>> {
    // Accept a bare id as well as the JSON produced by a selection.
    let selection = if artist.trim_start().starts_with('{') {
        artist.to_owned()
    } else {
        serde_json::json!({ "id": artist, "name": artist }).to_string()
    };

    let mut screen = TopTracks::from_selection(&selection, policy)?;
    let event = screen.load(catalog).await?;
    if let Some(notice) = event.notice() {
        println!("{notice}");
        return Ok(());
    }

    debug_assert_eq!(event, Event::TracksFound);
    println!("Top tracks of {}:", screen.artist().name);
    for (position, track) in screen.index().ordered_tracks().iter().enumerate() {
        let preview = track
            .source()
            .map_or_else(|| String::from("(no preview)"), ToString::to_string);
        println!(
            "{position:>3}  {} - {}  [{}]  {}",
            track.artist(),
            track.title(),
            track.album(),
            preview
        );
    }

    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = config(&args)?;
    let catalog: Arc<dyn Catalog> = Arc::new(WebCatalog::new(&config)?);

    match args.command {
        Command::Search { query, select } => {
            search(catalog, &query, select, config.rebuild_policy).await
        }
        Command::Tracks { artist } => tracks(catalog.as_ref(), &artist, config.rebuild_policy).await,
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
