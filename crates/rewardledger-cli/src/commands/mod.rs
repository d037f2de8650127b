pub mod catalog;
pub mod config;
pub mod ledger;
pub mod shell;

use std::path::PathBuf;

use clap::Args;
use rewardledger_core::{Catalog, Config, CoreError, JsonFileStore, Ledger};

/// Overrides shared by every ledger command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Built-in pack to use instead of the configured one
    #[arg(long, global = true, conflicts_with = "catalog")]
    pub pack: Option<String>,
    /// Custom TOML catalog file
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
    /// Ledger state file
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
}

/// Resolved configuration, catalog and state location for one run.
pub struct Session {
    pub config: Config,
    pub catalog: Catalog,
    pub state_path: PathBuf,
}

impl Session {
    pub fn open(globals: &GlobalArgs) -> Result<Self, CoreError> {
        let mut config = Config::load()?;
        if let Some(pack) = &globals.pack {
            config.pack = pack.clone();
            config.catalog_path = None;
        }
        if let Some(path) = &globals.catalog {
            config.catalog_path = Some(path.clone());
        }
        if let Some(path) = &globals.state {
            config.state_file = Some(path.clone());
        }

        let catalog = config.catalog()?;
        let state_path = config.state_path(&catalog)?;
        tracing::debug!(catalog = catalog.name(), state = %state_path.display(), "session opened");
        Ok(Self {
            config,
            catalog,
            state_path,
        })
    }

    pub fn ledger(&self) -> Result<Ledger<'_, JsonFileStore>, CoreError> {
        Ledger::open(&self.catalog, JsonFileStore::new(&self.state_path))
    }
}
