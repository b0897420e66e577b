//! Binary entrypoint for the meshmap CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and an empty data directory
//! - `status` - summarize the node directory and persisted preferences
//! - `camera --node <id>` - derive and print the map view state for a node
//! - `waypoints` - list waypoints currently visible (expiry-filtered)
//! - `prefs get [key]` / `prefs set <key> <value>` - inspect or change persisted
//!   display preferences
//!
//! See the library crate docs for module-level details: `meshmap::`.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;

use meshmap::config::Config;
use meshmap::map::{
    run_fetch, CameraFraming, MapStyle, MapViewController, NoSceneProvider, NoopIdleTimer,
    SceneState,
};
use meshmap::prefs::{PreferenceStore, SledPreferenceStore, ALL_KEYS};
use meshmap::storage::Storage;

#[derive(Parser)]
#[command(name = "meshmap")]
#[command(about = "Node map view-state engine for mesh radio clients")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration and data directory
    Init,
    /// Show directory and preference status
    Status,
    /// Derive the map view state for a node
    Camera {
        /// Node id: decimal, `0x` hex, or `!` hex (e.g. !10a3f5e2)
        #[arg(short, long)]
        node: String,
    },
    /// List waypoints currently visible
    Waypoints,
    /// Inspect or change persisted display preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print one preference, or all of them
    Get { key: Option<String> },
    /// Set a preference (true/false for flags, a layer name for mapLayer)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            let config = Config::load(&cli.config).await?;
            Storage::new(&config.storage.data_dir).await?;
            println!("Wrote {} and created {}", cli.config, config.storage.data_dir);
        }
        Commands::Status => {
            let config = Config::load(&cli.config).await?;
            let storage = Storage::new(&config.storage.data_dir).await?;
            let prefs = SledPreferenceStore::open(config.prefs_db_path())?.load()?;
            println!("meshmap v{}", env!("CARGO_PKG_VERSION"));
            println!("Data dir:        {}", config.storage.data_dir);
            println!("Nodes:           {}", storage.node_count());
            println!("  with metadata: {}", storage.nodes_with_metadata());
            println!("Waypoints:       {}", storage.waypoint_count());
            println!("Map layer:       {}", prefs.map_layer);
        }
        Commands::Camera { node } => {
            let config = Config::load(&cli.config).await?;
            let storage = Storage::new(&config.storage.data_dir).await?;
            let prefs = SledPreferenceStore::open(config.prefs_db_path())?.load()?;
            let num = parse_node_id(&node)?;
            let record = storage
                .get_node(num)
                .cloned()
                .ok_or_else(|| anyhow!("node {:08x} not found in the directory", num))?;
            info!(
                "deriving view state for {} ({} points)",
                record.display_name(),
                record.position_count()
            );

            let mut view = MapViewController::new(prefs);
            let request = view.select_node(Some(record));
            let _ = view.activate(Arc::new(NoopIdleTimer));
            if let Some(request) = request {
                // The CLI has no platform scene provider; the fetch resolves to
                // no coverage and the affordance stays suppressed.
                let timeout = Duration::from_secs(config.map.scene_fetch_timeout_secs);
                let resolution = run_fetch(&NoSceneProvider, request, timeout).await;
                view.scene_resolved(resolution);
            }
            print_view_state(&view);
            view.deactivate();
        }
        Commands::Waypoints => {
            let config = Config::load(&cli.config).await?;
            let storage = Storage::new(&config.storage.data_dir).await?;
            let now = chrono::Utc::now();
            let visible = storage.visible_waypoints(now);
            if visible.is_empty() {
                println!("No visible waypoints");
            }
            for wp in visible {
                let expiry = wp
                    .expire
                    .map(|e| e.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:>8}  {:<24} ({:.5}, {:.5})  expires {}",
                    wp.id, wp.name, wp.coordinate.latitude, wp.coordinate.longitude, expiry
                );
            }
        }
        Commands::Prefs { action } => {
            let config = Config::load(&cli.config).await?;
            let store = SledPreferenceStore::open(config.prefs_db_path())?;
            match action {
                PrefsAction::Get { key } => {
                    let prefs = store.load()?;
                    match key {
                        Some(key) => println!("{}", prefs.get_by_key(&key)?),
                        None => {
                            for key in ALL_KEYS {
                                println!("{:<28} {}", key, prefs.get_by_key(key)?);
                            }
                        }
                    }
                }
                PrefsAction::Set { key, value } => {
                    let mut prefs = store.load()?;
                    prefs.set_by_key(&key, &value)?;
                    store.save(&prefs)?;
                    info!("preference updated: {} = {}", key, value);
                }
            }
        }
    }

    Ok(())
}

/// Parse a node id written as decimal, `0x`-prefixed hex, or Meshtastic-style
/// `!`-prefixed hex.
fn parse_node_id(raw: &str) -> Result<u32> {
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix('!')) {
        u32::from_str_radix(hex, 16)
    } else {
        raw.parse::<u32>()
    };
    parsed.map_err(|_| anyhow!("invalid node id: {}", raw))
}

fn print_view_state(view: &MapViewController) {
    match view.camera() {
        CameraFraming::Unavailable => println!("Camera:      unavailable (no positions)"),
        CameraFraming::FitAll => println!("Camera:      fit all positions"),
        CameraFraming::Centered {
            coordinate,
            distance,
            pitch,
            heading,
        } => println!(
            "Camera:      centered ({:.5}, {:.5}) distance {}m pitch {}° heading {}°",
            coordinate.latitude, coordinate.longitude, distance, pitch, heading
        ),
    }
    match view.style() {
        MapStyle::Standard {
            points_of_interest,
            traffic,
        } => println!("Style:       standard (poi={points_of_interest}, traffic={traffic})"),
        MapStyle::Hybrid {
            points_of_interest,
            traffic,
        } => println!("Style:       hybrid (poi={points_of_interest}, traffic={traffic})"),
        MapStyle::Imagery => println!("Style:       imagery"),
    }
    let look_around = match view.scene() {
        SceneState::Available(_) | SceneState::Showing(_) => "available",
        SceneState::Unavailable => "unavailable",
        SceneState::Idle | SceneState::Fetching => "pending",
    };
    println!("Look-around: {look_around}");
    println!(
        "Altitude:    {}",
        if view.altitude_offerable() {
            "offerable"
        } else {
            "not offerable"
        }
    );
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
                // If stdout is not a terminal the console copy is suppressed to
                // avoid duplicate lines when output is redirected.
                let is_tty = atty::is(atty::Stream::Stdout);

                builder.format(move |fmt, record| {
                    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                    let line = format!("{} [{}] {}", ts, record.level(), record.args());
                    if let Ok(mut guard) = write_mutex.lock() {
                        let _ = writeln!(guard, "{}", line);
                    }
                    if is_tty {
                        writeln!(fmt, "{}", line)
                    } else {
                        Ok(())
                    }
                });
            } else {
                builder.format(|fmt, record| {
                    writeln!(
                        fmt,
                        "{} [{}] {}",
                        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                        record.level(),
                        record.args()
                    )
                });
            }
        }
    }
    let _ = builder.try_init();
}
