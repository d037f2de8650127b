//! # rewardledger Core Library
//!
//! This library provides the core business logic for rewardledger, a
//! single-user points ledger for self-reported habits. The `rewardledger`
//! CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Catalog**: immutable task and reward definitions, from a built-in
//!   pack or a TOML file
//! - **Ledger**: the state machine that credits completions, applies streak
//!   bonuses and redeems rewards
//! - **Storage**: JSON ledger state with atomic replace, and TOML-based
//!   configuration
//! - **Command**: the closed set of interactive commands
//!
//! ## Key Components
//!
//! - [`Ledger`]: Point ledger state machine
//! - [`Catalog`]: Task and reward definitions
//! - [`BonusTable`]: Streak bonus lookup
//! - [`JsonFileStore`]: Ledger state persistence
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod command;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod streak;

pub use catalog::{
    builtin_packs, find_pack, pack_ids, Catalog, Pack, RewardDefinition, TaskDefinition, TaskValue,
};
pub use command::{Command, ParseCommandError, Response};
pub use error::{CatalogError, ConfigError, CoreError, LedgerError, StorageError};
pub use ledger::{
    EarnedReport, Ledger, LedgerState, RedemptionReport, StatusReport, StreakStatus, TaskOutcome,
    TaskProgress,
};
pub use storage::{Config, JsonFileStore, MemoryStore, StateStore};
pub use streak::{BonusTable, BonusTier, StreakOutcome};
