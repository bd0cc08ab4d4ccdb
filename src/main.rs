use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use autonauts_save::cli::commands::{self, RewriteRequest};
use autonauts_save::config::EditorConfig;
use autonauts_save::persistence::SaveOptions;
use autonauts_save::world::GameFlag;

#[derive(Parser)]
#[command(name = "autonauts-save")]
#[command(about = "Inspect and edit Autonauts world save files")]
#[command(version)]
struct Cli {
    /// Path to the editor configuration file
    #[arg(short, long, default_value = "autonauts-save.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show world settings, terrain distribution and object counts
    Summary {
        /// Save file to read
        file: PathBuf,
    },

    /// Show the terrain and entities on one tile
    Tile {
        /// Save file to read
        file: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        x: i32,

        #[arg(long, allow_negative_numbers = true)]
        y: i32,
    },

    /// Decode a save, change its options, and write it back
    Rewrite {
        /// Save file to read
        file: PathBuf,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Option flag to turn on (e.g. tutorial, bot-limit); repeatable
        #[arg(long)]
        enable: Vec<GameFlag>,

        /// Option flag to turn off; repeatable
        #[arg(long)]
        disable: Vec<GameFlag>,

        /// New world name
        #[arg(long)]
        name: Option<String>,
    },
}

fn init_tracing(config: &EditorConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match EditorConfig::load_or_default(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let result = match cli.command {
        Commands::Summary { file } => commands::summary(&file),

        Commands::Tile { file, x, y } => commands::inspect_tile(&file, x, y),

        Commands::Rewrite {
            file,
            output,
            enable,
            disable,
            name,
        } => {
            let request = RewriteRequest {
                output,
                enable,
                disable,
                name,
            };
            commands::rewrite(&file, &request, SaveOptions::from(&config))
                .map(|path| println!("World written to {}", path.display()))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
