use clap::{CommandFactory, Parser, Subcommand};
use rewardledger_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::GlobalArgs;

#[derive(Parser)]
#[command(name = "rewardledger", version, about = "Earn points for habits, spend them on rewards")]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's completed tasks as one event
    Complete {
        /// Task IDs, space- or comma-separated (e.g. T1,T3)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Spend points on a reward
    Redeem {
        /// Reward ID
        id: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show points, streak and progress
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Zero all points and progress and delete the saved state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List the tasks and rewards of the active catalog
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// List built-in packs
    Packs,
    /// Interactive session
    Shell,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let fallback = Config::load_or_default().log.filter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let globals = &cli.globals;
    let result = match cli.command {
        Commands::Complete { ids, json } => commands::ledger::complete(globals, &ids, json),
        Commands::Redeem { id, json } => commands::ledger::redeem(globals, &id, json),
        Commands::Status { json } => commands::ledger::status(globals, json),
        Commands::Reset { yes } => commands::ledger::reset(globals, yes),
        Commands::Catalog { json } => commands::catalog::show(globals, json),
        Commands::Packs => commands::catalog::packs(),
        Commands::Shell => commands::shell::run(globals),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rewardledger", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
