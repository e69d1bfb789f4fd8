use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{config, daemon, fetch};
use weekly_film_config::PathManager;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "weeklyfilm")]
#[command(about = "WeeklyFilm - upcoming film releases for your dashboard")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the refresh and rotation scheduler
    #[command(long_about = "Run WeeklyFilm as a long-lived process that refreshes the upcoming-film list on the configured interval and rotates the displayed film. Sends SIGHUP to reload the rotation interval from the configuration file.")]
    Daemon {
        /// API key (overrides the stored key and WEEKLYFILM_API_KEY)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        /// Rotation interval in seconds
        #[arg(long, value_name = "SECONDS")]
        scroll_interval: Option<u64>,

        /// Skip the refresh on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_refresh: bool,

        /// Write logs to the daily-rotated daemon log file instead of stderr
        #[arg(long, action = ArgAction::SetTrue)]
        log_to_file: bool,
    },
    /// Fetch the film list once and print it
    Fetch {
        /// API key (overrides the stored key and WEEKLYFILM_API_KEY)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },
    /// Manage configuration and the API key
    #[command(long_about = "Manage configuration and the stored API key. Running without a subcommand starts the interactive setup.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Update individual settings
    Set {
        /// API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Rotation interval in seconds (>= 1)
        #[arg(long)]
        scroll_interval: Option<u64>,

        /// Refresh interval in seconds (>= 1)
        #[arg(long)]
        refresh_interval: Option<u64>,

        /// Feed endpoint URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Interactive setup
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Daemon { log_to_file: true, .. } => Some(PathManager::default().daemon_log_file()),
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref()).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Daemon {
            api_key,
            scroll_interval,
            no_startup_refresh,
            log_to_file: _,
        } => daemon::run_daemon(api_key, scroll_interval, no_startup_refresh, &output).await,
        Commands::Fetch { api_key } => fetch::run_fetch(api_key, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Init);
            config::run_config(cmd, &output)
        }
    }
}
