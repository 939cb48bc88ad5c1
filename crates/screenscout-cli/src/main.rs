use clap::{ArgAction, Parser, Subcommand};
use media_scout_core::MediaFilter;
use media_scout_models::MediaType;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

use commands::{account, browse, clear, config, watched};

#[derive(Parser)]
#[command(name = "screenscout")]
#[command(about = "Screenscout - find movies and series you'll enjoy, and remember what you've watched")]
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

    /// Also write logs to this file (daily rotation)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies and series by title
    #[command(long_about = "Search both movie and series catalogs in parallel and show the merged results ranked by popularity. Searches by signed-in users feed the suggestions shown by 'trending'.")]
    Search {
        /// Search phrase
        query: String,

        /// Restrict results to one category
        #[arg(long, default_value = "all")]
        filter: MediaFilter,

        /// Maximum number of rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Browse the default listings (popular movies, top-rated series)
    #[command(long_about = "Show what to watch without a search phrase: popularity-sorted movies merged with the top-rated series chart. With --watched-only, shows full details for every title on your watched list instead.")]
    Discover {
        /// Restrict results to one category
        #[arg(long, default_value = "all")]
        filter: MediaFilter,

        /// Show only titles on your watched list (requires sign-in)
        #[arg(long, action = ArgAction::SetTrue)]
        watched_only: bool,

        /// Maximum number of rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show full details for one title
    Show {
        /// Media category: movie or tv
        media_type: MediaType,

        /// Title id within the metadata API
        id: u64,
    },
    /// Manage your watched list
    Watched {
        #[command(subcommand)]
        cmd: WatchedCommands,
    },
    /// Most searched titles, most-counted first
    Trending,
    /// Sign in with the user id resolved by your identity provider
    #[command(long_about = "Store the resolved user id locally so watched-list operations are scoped to it. The identity provider's own sign-in flow is outside this tool; pass the subject id it resolved.")]
    Login {
        /// Resolved user identifier
        user_id: String,
    },
    /// Sign out (clears the stored user id)
    Logout,
    /// Configure endpoints and credentials
    #[command(long_about = "Manage configuration and credentials. Use subcommands to set up the metadata API token or the document store. Running without a subcommand starts the interactive wizard.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Remove stored configuration or credentials
    Clear {
        /// Remove both config and credentials
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Remove the config file
        #[arg(long, action = ArgAction::SetTrue)]
        config: bool,

        /// Remove stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List the watched keys for the signed-in user
    List {
        /// Fetch full details for each title
        #[arg(long, action = ArgAction::SetTrue)]
        details: bool,
    },
    /// Flip the watched flag for one title
    Toggle {
        /// Media category: movie or tv
        media_type: MediaType,

        /// Title id within the metadata API
        id: u64,
    },
    /// Number of watched titles
    Count,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show credential values instead of masks
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Configure the metadata API token
    Tmdb {
        /// API read access token (if not provided, will prompt)
        #[arg(long)]
        token: Option<String>,
    },
    /// Configure the document store (endpoint, project, database, collections)
    Appwrite,
    /// Interactive configuration wizard
    Interactive,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Search { query, filter, limit } => {
            browse::run_search(&query, filter, limit, &output).await
        }
        Commands::Discover { filter, watched_only, limit } => {
            browse::run_discover(filter, watched_only, limit, &output).await
        }
        Commands::Show { media_type, id } => browse::run_show(media_type, id, &output).await,
        Commands::Watched { cmd } => match cmd {
            WatchedCommands::List { details } => watched::run_list(details, &output).await,
            WatchedCommands::Toggle { media_type, id } => {
                watched::run_toggle(media_type, id, &output).await
            }
            WatchedCommands::Count => watched::run_count(&output).await,
        },
        Commands::Trending => browse::run_trending(&output).await,
        Commands::Login { user_id } => account::run_login(&user_id, &output).await,
        Commands::Logout => account::run_logout(&output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Interactive);
            match cmd {
                ConfigCommands::Show { full } => config::run_show(full, &output),
                ConfigCommands::Tmdb { token } => config::run_tmdb(token, &output).await,
                ConfigCommands::Appwrite => config::run_appwrite(&output),
                ConfigCommands::Interactive => config::run_interactive(&output).await,
            }
        }
        Commands::Clear { all, config, credentials } => {
            clear::run_clear(all, config, credentials, &output)
        }
    };

    if let Err(e) = result {
        output.error(format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
