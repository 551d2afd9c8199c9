use std::{
    error::Error,
    path::PathBuf,
    process,
    sync::{Arc, Mutex},
};

use clap::{Parser, ValueHint};
use log::{debug, error, info, LevelFilter};

use wmpc::{
    config::Config, dispatcher::Dispatcher, library::Library, player::Player,
    protocol::Command, reconciler::Reconciler, store::Store, transport::Transport,
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
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Daemon host and port serving the websocket endpoint
    #[arg(value_hint = ValueHint::Hostname, default_value_t = String::from("localhost:8080"))]
    host: String,

    /// Connect over wss instead of ws
    #[arg(long, default_value_t = false)]
    secure: bool,

    /// Snapshot cache file for UI state such as expanded folders
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    cache_file: Option<PathBuf>,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
fn init_logger(args: &Args) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if args.quiet || args.verbose > 0 {
        let level = match args.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose`
                // is 0 by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

/// Main application loop: wires the views to the transport and runs until
/// interrupted. The connection task reconnects on its own; nothing here
/// needs to restart it.
async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = Config::for_host(args.host, args.secure);
    config.cache_path = args.cache_file;

    let store = Arc::new(Store::open(config.cache_path.clone()));
    let mut dispatcher = Dispatcher::new();
    let (transport, connector) = Transport::prepare(&config)?;

    // The headless stand-ins for the three views: the database browser,
    // the playlist, and the player transport.
    let library = Arc::new(Mutex::new(Library::new(store)));
    {
        let library = Arc::clone(&library);
        dispatcher.on_files(move |files| {
            info!("database: {} files", files.len());
            if let Ok(mut library) = library.lock() {
                library.replace(files.to_vec());
            }
        });
    }

    let reconciler = Arc::new(Mutex::new(Reconciler::new()));
    {
        let reconciler = Arc::clone(&reconciler);
        dispatcher.on_playlist(move |tracks| {
            info!("playlist: {} tracks", tracks.len());
            if let Ok(mut reconciler) = reconciler.lock() {
                reconciler.replace(tracks.to_vec());
            }
        });
    }

    let player = Player::attach(&mut dispatcher, transport.clone(), &config);
    {
        let player = player.clone();
        dispatcher.on_current_song(move |_| {
            if let Some(line) = player.now_playing() {
                info!("playing: {line}");
            }
        });
    }

    connector.spawn(dispatcher);

    // Initial state requests; queued until the connection opens.
    transport.send(Command::GetFiles);
    transport.send(Command::PlaylistInfo);
    transport.send(Command::Status);

    tokio::signal::ctrl_c().await?;
    info!("shutting down gracefully");
    Ok(())
}

/// Main entry point of the application.
#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    info!(
        "starting {}/{}; {BUILD_PROFILE}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
