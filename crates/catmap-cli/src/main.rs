#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;
mod store;
mod tui;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "catmap: category-assignment board",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, user config, and TTY.
    fn output_mode(&self) -> OutputMode {
        let mut format = self.format;
        if format.is_none()
            && let Some(configured) = config::load_user_config().output
        {
            format = match configured.as_str() {
                "json" => Some(OutputMode::Json),
                "text" => Some(OutputMode::Text),
                "pretty" => Some(OutputMode::Pretty),
                _ => None,
            };
        }
        output::resolve_output_mode(format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a catmap project",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    cm init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Import raw category names",
        after_help = "EXAMPLES:\n    # One name per line\n    cm import categories.txt\n\n    # From a pipe\n    cut -d, -f3 transactions.csv | cm import -"
    )]
    Import(cmd::import::ImportArgs),

    #[command(about = "Manage the target category catalog")]
    Target(cmd::target::TargetArgs),

    #[command(
        about = "Quick-assign raw categories to a target and save",
        after_help = "EXAMPLES:\n    cm assign \"Coffee Shops\" Bakeries --target Food"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(about = "Show mapping counts and unmapped categories")]
    Status(cmd::status::StatusArgs),

    #[command(about = "Open the interactive assignment board")]
    Board(cmd::board::BoardArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CATMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "catmap=debug,info"
        } else {
            "catmap=info,warn"
        })
    });

    let format = env::var("CATMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args, &project_root),
        Commands::Import(ref args) => cmd::import::run_import(args, output, &project_root),
        Commands::Target(ref args) => cmd::target::run_target(args, output, &project_root),
        Commands::Assign(ref args) => cmd::assign::run_assign(args, output, &project_root),
        Commands::Status(ref args) => cmd::status::run_status(args, output, &project_root),
        Commands::Board(ref args) => cmd::board::run_board(args, &project_root),
    }
}
