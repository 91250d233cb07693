/// Gecs - headless front-end for Gecs Player
use anyhow::Context;
use clap::{Parser, Subcommand};
use gecs_cli::{config::GecsConfig, HeadlessEngine, Session};
use gecs_core::{AlbumId, LibraryScanner, Track, TrackFetcher, TrackId};
use gecs_importer::{remove_track_file, DirectoryScanner, HelperFetcher, LibraryWatcher};
use gecs_playback::Player;
use gecs_storage::{albums, app_state, FolderPaths, JsonFileStore, StateStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "gecs=info,gecs_cli=info,gecs_playback=info,gecs_storage=info,gecs_importer=info";

#[derive(Parser)]
#[command(name = "gecs")]
#[command(about = "Gecs Player: local music library and playback", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./gecs.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Application folder, overrides the configured base_dir
    #[arg(long, global = true, env = "GECS_BASE_DIR")]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the music folder and list every track
    Scan {
        /// Print tracks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the persisted settings
    State,
    /// Set the persisted volume (0-100)
    Volume { level: u8 },
    /// Toggle persisted shuffle
    Shuffle,
    /// Cycle the persisted repeat mode (off, all, one)
    Repeat,
    /// Manage saved albums
    Albums {
        #[command(subcommand)]
        command: AlbumCommands,
    },
    /// Download a track into the music folder
    Fetch { url: String },
    /// Delete a track file from the music folder
    Delete { track_id: String },
    /// Watch the music folder and rescan on changes
    Watch,
    /// Interactive playback session on stdin
    Session {
        /// Do not watch the music folder during the session
        #[arg(long)]
        no_watch: bool,
    },
}

#[derive(Subcommand)]
enum AlbumCommands {
    /// List saved albums
    List,
    /// Create an album from track ids
    Create {
        name: String,
        /// Track ids, in playlist order
        #[arg(short, long = "track")]
        tracks: Vec<String>,
    },
    /// Rename an album
    Rename { id: String, name: String },
    /// Delete an album
    Delete { id: String },
}

/// Everything a command needs, resolved once at startup
struct App {
    config: GecsConfig,
    paths: FolderPaths,
    store: StateStore,
    scanner: Arc<DirectoryScanner>,
}

impl App {
    fn init(cli: &Cli, config: GecsConfig) -> anyhow::Result<Self> {
        let paths = config
            .folder_paths(cli.base_dir.as_deref())?
            .create()
            .context("Failed to create application folders")?;
        info!(base = %paths.base.display(), music = %paths.music.display(), "Using folders");

        let store = StateStore::new(Arc::new(JsonFileStore::new(&paths.base)));
        let scanner = Arc::new(DirectoryScanner::new(&paths.music));
        Ok(Self {
            config,
            paths,
            store,
            scanner,
        })
    }

    fn fetcher(&self) -> HelperFetcher {
        HelperFetcher::discover(self.config.helper_path.clone(), &self.paths.music)
    }

    fn player(&self) -> Player<HeadlessEngine> {
        Player::new(HeadlessEngine::new(), self.store.clone())
    }

    async fn library(&self) -> anyhow::Result<Vec<Track>> {
        Ok(self.scanner.scan().await?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GecsConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let fallback = config
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate()?;
    let app = App::init(&cli, config)?;

    match cli.command {
        Commands::Scan { json } => scan(&app, json).await?,
        Commands::State => {
            let state = app_state::get(&app.store).await;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Volume { level } => {
            let state = app_state::update(&app.store, |s| s.volume = level.min(100)).await?;
            println!("volume: {}%", state.volume);
        }
        Commands::Shuffle => {
            let state = app_state::update(&app.store, |s| s.shuffle = !s.shuffle).await?;
            println!("shuffle: {}", if state.shuffle { "on" } else { "off" });
        }
        Commands::Repeat => {
            let state =
                app_state::update(&app.store, |s| s.repeat_mode = s.repeat_mode.cycle()).await?;
            println!("repeat: {}", state.repeat_mode);
        }
        Commands::Albums { command } => manage_albums(&app, command).await?,
        Commands::Fetch { url } => fetch(&app, &url).await?,
        Commands::Delete { track_id } => delete(&app, &TrackId::new(track_id)).await?,
        Commands::Watch => watch(&app).await?,
        Commands::Session { no_watch } => session(&app, !no_watch).await?,
    }

    Ok(())
}

async fn scan(app: &App, json: bool) -> anyhow::Result<()> {
    let tracks = app.library().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
        return Ok(());
    }

    println!("{} tracks in {}", tracks.len(), app.paths.music.display());
    for track in &tracks {
        println!(
            "  {}  {} - {}  [{}]  {:.0}s",
            track.id, track.artist, track.title, track.album, track.duration
        );
    }
    Ok(())
}

async fn manage_albums(app: &App, command: AlbumCommands) -> anyhow::Result<()> {
    match command {
        AlbumCommands::List => {
            let all = albums::get_all(&app.store).await;
            println!("Albums:");
            for album in all {
                println!("  {} - {} ({} tracks)", album.id, album.name, album.tracks.len());
            }
        }
        AlbumCommands::Create { name, tracks } => {
            let library = app.library().await?;
            let mut picked = Vec::with_capacity(tracks.len());
            for id in tracks {
                let id = TrackId::new(id);
                let track = library
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .with_context(|| format!("Track {id} is not in the library"))?;
                picked.push(track);
            }
            let album = albums::create(&app.store, &name, picked).await?;
            println!("Created album {} ({})", album.name, album.id);
        }
        AlbumCommands::Rename { id, name } => {
            let album = albums::rename(&app.store, &AlbumId::new(id), &name).await?;
            println!("Renamed album {} to {}", album.id, album.name);
        }
        AlbumCommands::Delete { id } => {
            let id = AlbumId::new(id);
            albums::delete(&app.store, &id).await?;
            println!("Deleted album {id}");
        }
    }
    Ok(())
}

async fn fetch(app: &App, url: &str) -> anyhow::Result<()> {
    let outcome = app.fetcher().download(url).await;
    if !outcome.success {
        anyhow::bail!(
            "{}",
            outcome.error.unwrap_or_else(|| "Download failed".to_string())
        );
    }

    let name = outcome.title.or(outcome.filename).unwrap_or_default();
    println!("Downloaded {name}");
    let tracks = app.library().await?;
    println!("{} tracks in library", tracks.len());
    Ok(())
}

async fn delete(app: &App, id: &TrackId) -> anyhow::Result<()> {
    let library = app.library().await?;
    let track = library
        .iter()
        .find(|t| &t.id == id)
        .with_context(|| format!("Track {id} is not in the library"))?;
    remove_track_file(&app.paths.music, track)?;
    println!("Deleted {}", track.relative_path.display());
    Ok(())
}

async fn watch(app: &App) -> anyhow::Result<()> {
    let (watcher, mut changes) = LibraryWatcher::start(&app.paths.music, app.config.watch_debounce())?;
    let mut player = app.player();
    player.restore().await;
    player.rescan(app.scanner.as_ref()).await;
    println!(
        "Watching {} ({} tracks), Ctrl+C to stop",
        watcher.root().display(),
        player.library().len()
    );

    loop {
        tokio::select! {
            change = changes.recv() => {
                let Some(change) = change else {
                    warn!("Watcher stopped");
                    break;
                };
                info!(paths = change.paths.len(), "Library changed, rescanning");
                player.rescan(app.scanner.as_ref()).await;
                println!("{} tracks in library", player.library().len());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}

async fn session(app: &App, watch: bool) -> anyhow::Result<()> {
    let watcher = if watch {
        match LibraryWatcher::start(&app.paths.music, app.config.watch_debounce()) {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("File watching disabled: {}", e);
                None
            }
        }
    } else {
        None
    };
    let (_guard, changes) = match watcher {
        Some((guard, changes)) => (Some(guard), Some(changes)),
        None => (None, None),
    };

    let scanner: Arc<dyn LibraryScanner> = app.scanner.clone();
    let fetcher: Arc<dyn TrackFetcher> = Arc::new(app.fetcher());
    let mut session = Session::new(
        app.player(),
        app.store.clone(),
        scanner,
        fetcher,
        &app.paths.music,
    );

    let mut out = std::io::stdout();
    session.start(&mut out).await?;
    println!("Type 'help' for commands");
    session
        .run(BufReader::new(tokio::io::stdin()), changes, &mut out)
        .await?;
    Ok(())
}
