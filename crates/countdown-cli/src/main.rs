use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

#[derive(Parser)]
#[command(name = "countdown", version, about = "Countdown timer CLI")]
struct Cli {
    /// Log engine transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive countdown
    Run(commands::run::RunArgs),
    /// List configured presets
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the render frame for a given state
    Render(commands::render::RenderArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("countdown=debug,countdown_core=debug")
    } else {
        EnvFilter::try_from_env("COUNTDOWN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Render(args) => commands::render::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
