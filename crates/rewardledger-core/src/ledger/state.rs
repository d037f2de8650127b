use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{normalize_id, TaskId};
use crate::streak::StreakCounter;

/// Mutable ledger record, persisted whole after every mutation.
///
/// Loading goes through `StoredState`, which also accepts state files
/// written by earlier single-purpose trackers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredState")]
pub struct LedgerState {
    pub points: u64,
    pub streak_count: u32,
    pub last_streak_task_succeeded: bool,
    /// Units of progress per incremental task. Absent means zero.
    pub units_completed: BTreeMap<TaskId, u32>,
}

/// On-disk shape, current and legacy.
///
/// Legacy trackers wrote `total_points`, `streak_T1`, `last_T1_success`,
/// and per-chapter progress as `tasks.<id>.chapters_completed`.
#[derive(Deserialize)]
struct StoredState {
    #[serde(default, alias = "total_points")]
    points: u64,
    #[serde(default, alias = "streak_T1")]
    streak_count: u32,
    #[serde(default, alias = "last_T1_success")]
    last_streak_task_succeeded: bool,
    #[serde(default)]
    units_completed: BTreeMap<TaskId, u32>,
    #[serde(default)]
    tasks: BTreeMap<String, LegacyTaskProgress>,
}

#[derive(Deserialize)]
struct LegacyTaskProgress {
    #[serde(default)]
    chapters_completed: u32,
}

impl From<StoredState> for LedgerState {
    fn from(stored: StoredState) -> Self {
        let mut units_completed: BTreeMap<TaskId, u32> = stored
            .units_completed
            .into_iter()
            .map(|(id, units)| (normalize_id(&id), units))
            .collect();
        // Current-format counts win over legacy ones.
        for (id, task) in stored.tasks {
            if task.chapters_completed > 0 {
                units_completed
                    .entry(normalize_id(&id))
                    .or_insert(task.chapters_completed);
            }
        }

        Self {
            points: stored.points,
            streak_count: stored.streak_count,
            last_streak_task_succeeded: stored.last_streak_task_succeeded,
            units_completed,
        }
    }
}

impl LedgerState {
    pub fn units(&self, task_id: &str) -> u32 {
        self.units_completed.get(task_id).copied().unwrap_or(0)
    }

    pub(crate) fn streak(&self) -> StreakCounter {
        StreakCounter {
            count: self.streak_count,
            last_succeeded: self.last_streak_task_succeeded,
        }
    }

    pub(crate) fn set_streak(&mut self, counter: StreakCounter) {
        self.streak_count = counter.count;
        self.last_streak_task_succeeded = counter.last_succeeded;
    }
}
