use anyhow::{Context, Result};
use clap::Parser;
use partyqueue::export::{export_playlist, PlaylistLibrary, Session};
use partyqueue::party::{AppendType, PartyController, PartySettings};
use partyqueue::playlist::{ItemState, PlaylistStore};
use partyqueue::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "partyqueue")]
#[command(about = "Keep a playlist filled from your music collection", long_about = None)]
struct Args {
    /// Path to Rhythmbox database (rhythmdb.xml)
    #[arg(
        short = 'd',
        long,
        default_value = "~/.local/share/rhythmbox/rhythmdb.xml"
    )]
    database: String,

    /// Path to Rhythmbox playlists (playlists.xml)
    #[arg(
        short = 'p',
        long,
        default_value = "~/.local/share/rhythmbox/playlists.xml"
    )]
    playlists: String,

    /// Scan a music directory instead of reading the Rhythmbox database
    #[arg(short = 'm', long)]
    music_dir: Option<String>,

    /// Settings file
    #[arg(short = 'c', long, default_value = "~/.config/partyqueue/config.toml")]
    config: String,

    /// Where the current playlist and saved playlists live
    #[arg(long, default_value = "~/.local/share/partyqueue")]
    session_dir: String,

    /// Append type for dynamic mode (random, suggestion, custom)
    #[arg(short = 't', long)]
    append_type: Option<String>,

    /// Rhythmbox playlist to use as the custom append list
    #[arg(long)]
    custom_playlist: Option<String>,

    /// Simulate playback moving forward this many tracks
    #[arg(short = 'n', long, default_value = "0")]
    advance: usize,

    /// Start with dynamic mode on, whatever was saved last time
    #[arg(long, conflicts_with = "no_party")]
    party: bool,

    /// Start with dynamic mode off, whatever was saved last time
    #[arg(long)]
    no_party: bool,

    /// Write the resulting playlist (.m3u or .xspf)
    #[arg(short = 'o', long)]
    export: Option<PathBuf>,

    /// Also save the resulting playlist under this name
    #[arg(long)]
    save_as: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("Party Queue");
    log::info!("===========");

    let config_path = expand(&args.config);
    let session_dir = expand(&args.session_dir);
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load settings from {:?}", config_path))?;

    // Load the collection
    let (collection, lists) = match &args.music_dir {
        Some(dir) => {
            log::info!("Scanning music directory...");
            (partyqueue::scan::scan_collection(&expand(dir))?, Vec::new())
        }
        None => {
            log::info!("Loading Rhythmbox library...");
            let playlists_path = expand(&args.playlists);
            partyqueue::rhythmbox::parse_library(
                &expand(&args.database),
                playlists_path.exists().then_some(playlists_path.as_path()),
            )?
        }
    };
    log::info!("Collection loaded: {} tracks", collection.track_count());

    // Settings requested on the command line go through the same
    // edit/apply path as interactive changes
    let mut controller = PartyController::new(config.party.clone());
    let mut settings = PartySettings::new(config.party.clone());
    if let Some(append_type) = &args.append_type {
        settings.pending_mut().append_type = append_type.parse::<AppendType>()?;
    }
    if let Some(name) = &args.custom_playlist {
        let list = lists
            .iter()
            .find(|l| l.name == *name)
            .with_context(|| format!("No Rhythmbox playlist named '{}'", name))?;
        log::info!("Custom list '{}' with {} tracks", list.name, list.track_ids.len());
        let pending = settings.pending_mut();
        pending.append_type = AppendType::Custom;
        pending.custom_list = list.track_ids.clone();
    }

    // Restore the previous session
    let mut store = PlaylistStore::new();
    let restored = Session::restore(
        &session_dir,
        &collection,
        &mut store,
        config.session.last_playing,
    )?;
    if restored > 0 {
        log::info!("Restored {} tracks from last session", restored);
    }

    settings.apply(&mut controller, &mut store, &collection);
    if config.session.party_on_start(args.party, args.no_party) {
        let appended = controller.enable(&mut store, &collection);
        log::info!("Dynamic mode on: {} tracks appended", appended);
    } else {
        log::info!("Dynamic mode off");
    }

    for _ in 0..args.advance {
        let next = store.active_row().map_or(0, |row| row + 1);
        if !store.row_exists(next) {
            log::info!("End of playlist reached");
            break;
        }
        controller.track_advanced(&mut store, &collection, next);
    }
    store.take_events();

    print_playlist(&store);

    if let Some(path) = &args.export {
        export_playlist(&store, path)?;
    }
    if let Some(name) = &args.save_as {
        let path = PlaylistLibrary::new(session_dir.join("playlists")).save(name, &store)?;
        log::info!("Playlist saved to {:?}", path);
    }

    // Persist for next time
    Session::save(&store, &session_dir)?;
    config.party = settings.applied().clone();
    config.session.party_mode = controller.is_active();
    config.session.last_playing = store.active_row();
    config.save(&config_path)?;

    log::info!("Session saved to {:?}", session_dir);
    Ok(())
}

fn print_playlist(store: &PlaylistStore) {
    log::info!(
        "Playlist: {} tracks, {} total",
        store.row_count(),
        format_length(store.total_length_ms())
    );
    for (row, item) in store.items().enumerate() {
        let marker = if store.active_row() == Some(row) {
            ">"
        } else if item.is_history_marked() {
            "~"
        } else if item.state() == ItemState::Played {
            "."
        } else {
            " "
        };
        let track = item.track();
        log::info!(
            "{} {:3}. {} - {} [{}]",
            marker,
            row + 1,
            track.artist,
            track.pretty_name(),
            track.duration_display()
        );
    }
}

fn format_length(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
