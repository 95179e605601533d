//! Hamlet: a menu-driven town adventure for the terminal.
//!
//! Progress is autosaved before every screen to `<save-dir>/<name>_autosave.json`
//! and picked up again on the next launch:
//!
//! ```bash
//! cargo run -p hamlet -- --name "Thorin" --seed 42
//! ```
//!
//! Set `RUST_LOG=hamlet_core=debug` to trace the engine on stderr.

mod console;

use console::ConsoleTerminal;
use hamlet_core::persist::{auto_save_path, list_saves};
use hamlet_core::{GameConfig, GameSession, JsonSaveStore, SavedGame, SessionError, SessionSummary};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Where saves go when neither `--save-dir` nor `HAMLET_SAVE_DIR` is set.
const DEFAULT_SAVE_DIR: &str = "saves";

/// Everything the command line can set.
#[derive(Debug, Clone)]
struct LaunchOptions {
    config: GameConfig,
    save_dir: PathBuf,
    /// Ignore any existing autosave.
    fresh: bool,
    plain: bool,
    list: bool,
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    let options = parse_options_from_args(&args);
    if let Err(e) = run(options).await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(options: LaunchOptions) -> Result<(), Box<dyn std::error::Error>> {
    if options.list {
        return print_saves(&options.save_dir).await;
    }

    let save_path = auto_save_path(&options.save_dir, &options.config.player_name);
    let store = JsonSaveStore::new(&save_path);

    let saved = if !options.fresh && save_path.exists() {
        let saved = SavedGame::load_json(&save_path).await?;
        info!("Resuming {} from {}", saved.metadata.player_name, save_path.display());
        Some(saved)
    } else {
        None
    };

    let config = options.config;
    let plain = options.plain;
    let summary = tokio::task::spawn_blocking(move || -> Result<SessionSummary, SessionError> {
        let mut session = match saved {
            Some(saved) => {
                let mut state = saved.state;
                if !state.cursor.is_alive() {
                    println!("You come to, bruised but alive.");
                    state.cursor.revive();
                    state.player.hit_points.restore();
                }
                GameSession::resume(config, state, store)?
            }
            None => GameSession::new(config, store)?,
        };

        let mut terminal = ConsoleTerminal::new(plain);
        session.run(&mut terminal)
    })
    .await??;

    println!();
    println!(
        "Session over after {} turns, at {} ({:?}).",
        summary.turns, summary.location, summary.reason
    );
    println!("Progress saved to {}", save_path.display());
    Ok(())
}

async fn print_saves(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let saves = list_saves(dir).await?;
    if saves.is_empty() {
        println!("No saves in {}", dir.display());
        return Ok(());
    }

    for save in saves {
        let meta = save.metadata;
        println!(
            "{:<20} day {:<4} turn {:<6} at {}",
            meta.player_name, meta.day, meta.turn_count, meta.location
        );
    }
    Ok(())
}

/// Parse launch options from command line arguments.
fn parse_options_from_args(args: &[String]) -> LaunchOptions {
    let save_dir = std::env::var("HAMLET_SAVE_DIR").unwrap_or_else(|_| DEFAULT_SAVE_DIR.to_string());
    let mut options = LaunchOptions {
        config: GameConfig::new("Wanderer"),
        save_dir: PathBuf::from(save_dir),
        fresh: false,
        plain: false,
        list: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                if let Some(name) = args.get(i + 1) {
                    options.config.player_name = name.clone();
                    i += 1;
                }
            }
            "--save-dir" => {
                if let Some(dir) = args.get(i + 1) {
                    options.save_dir = PathBuf::from(dir);
                    i += 1;
                }
            }
            "--seed" => {
                if let Some(seed) = args.get(i + 1) {
                    options.config.seed = seed.parse().ok();
                    i += 1;
                }
            }
            "--new" => options.fresh = true,
            "--plain" => options.plain = true,
            "--list" => options.list = true,
            _ => {}
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Hamlet - a small town adventure");
    println!();
    println!("USAGE:");
    println!("  hamlet [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --name <NAME>       Character name (default: Wanderer)");
    println!("  --save-dir <DIR>    Save directory (default: $HAMLET_SAVE_DIR or ./saves)");
    println!("  --seed <N>          Seed every random roll");
    println!("  --new               Start over, ignoring any autosave");
    println!("  --plain             Do not clear the screen between turns");
    println!("  --list              List saved games and exit");
    println!();
    println!("IN GAME:");
    println!("  1-9                 Take a numbered action");
    println!("  <letter>            Walk to the location shown in brackets");
    println!("  R                   Return to where you came from");
    println!("  Q                   Quit (progress is already saved)");
    println!();
    println!("EXAMPLES:");
    println!("  hamlet                              # Continue as Wanderer");
    println!("  hamlet --name Thorin --new          # Fresh start as Thorin");
    println!("  hamlet --list --save-dir ~/hamlet   # Show saves in ~/hamlet");
}
