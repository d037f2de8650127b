//! Results returned by ledger operations.
//!
//! Every report serializes to JSON so the CLI can print it verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{RewardId, TaskId};
use crate::error::LedgerError;
use crate::streak::StreakOutcome;

/// Per-ID result inside a completion batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Credited {
        id: TaskId,
        name: String,
        points: u64,
        /// New unit total, for incremental tasks only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        units_completed: Option<u32>,
    },
    Unknown {
        id: String,
    },
}

impl TaskOutcome {
    pub fn points(&self) -> u64 {
        match self {
            TaskOutcome::Credited { points, .. } => *points,
            TaskOutcome::Unknown { .. } => 0,
        }
    }

    pub fn error(&self) -> Option<LedgerError> {
        match self {
            TaskOutcome::Credited { .. } => None,
            TaskOutcome::Unknown { id } => Some(LedgerError::UnknownTask(id.clone())),
        }
    }
}

/// Result of one completion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedReport {
    pub outcomes: Vec<TaskOutcome>,
    /// Sum of credited task points, before any streak bonus.
    pub base_points: u64,
    /// `None` when the catalog has no streak task.
    pub streak: Option<StreakOutcome>,
    pub total_earned: u64,
    pub balance: u64,
    pub at: DateTime<Utc>,
}

impl EarnedReport {
    pub fn bonus(&self) -> u64 {
        self.streak.map(|s| s.bonus()).unwrap_or(0)
    }

    pub fn errors(&self) -> impl Iterator<Item = LedgerError> + '_ {
        self.outcomes.iter().filter_map(TaskOutcome::error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionReport {
    pub id: RewardId,
    pub description: String,
    pub cost: u64,
    pub balance: u64,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStatus {
    pub task_id: TaskId,
    pub count: u32,
    pub last_succeeded: bool,
    /// Bonus the next consecutive completion would earn.
    pub next_bonus: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub id: TaskId,
    pub name: String,
    pub units_completed: u32,
    pub points_per_unit: u64,
}

/// Read-only snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub catalog: String,
    pub points: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakStatus>,
    /// Incremental tasks only, in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub progress: Vec<TaskProgress>,
    /// Rewards whose cost is covered by the current balance.
    pub affordable: Vec<RewardId>,
}
