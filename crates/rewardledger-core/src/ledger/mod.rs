//! Point ledger state machine.
//!
//! The ledger applies completion and redemption events to a
//! [`LedgerState`] and persists the result through a [`StateStore`].
//!
//! ## Write-then-acknowledge
//!
//! Every mutating operation builds the next state on a copy, saves it, and
//! only then swaps it in. If the save fails the operation returns the
//! storage error and the in-memory state is untouched, so the ledger never
//! reports a mutation that was not persisted.
//!
//! ## Usage
//!
//! ```ignore
//! let pack = find_pack("exercise").unwrap();
//! let mut ledger = Ledger::open(&pack.catalog, JsonFileStore::new(path))?;
//! let report = ledger.complete(["T1", "T3"])?;
//! ledger.redeem("R2")?;
//! ```

mod report;
mod state;

pub use report::{
    EarnedReport, RedemptionReport, StatusReport, StreakStatus, TaskOutcome, TaskProgress,
};
pub use state::LedgerState;

use chrono::Utc;

use crate::catalog::{normalize_id, Catalog};
use crate::command::{Command, Response};
use crate::error::{LedgerError, Result};
use crate::storage::StateStore;

/// Ledger bound to a catalog and a store.
pub struct Ledger<'c, S: StateStore> {
    catalog: &'c Catalog,
    store: S,
    state: LedgerState,
    /// Whether the store holds a record, i.e. nothing cleared it since the
    /// last successful write or load.
    persisted: bool,
}

impl<'c, S: StateStore> Ledger<'c, S> {
    /// Load the saved state from `store`, or start from zero.
    pub fn open(catalog: &'c Catalog, store: S) -> Result<Self> {
        let loaded = store.load()?;
        let persisted = loaded.is_some();
        let state = loaded.unwrap_or_default();
        tracing::debug!(catalog = catalog.name(), points = state.points, "ledger opened");
        Ok(Self {
            catalog,
            store,
            state,
            persisted,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn points(&self) -> u64 {
        self.state.points
    }

    /// Current balance, streak and per-task progress. Never writes.
    pub fn status(&self) -> StatusReport {
        let streak = self.catalog.streak_task().map(|task| StreakStatus {
            task_id: task.id.clone(),
            count: self.state.streak_count,
            last_succeeded: self.state.last_streak_task_succeeded,
            next_bonus: if self.state.last_streak_task_succeeded {
                self.catalog.bonus_table().next_bonus(self.state.streak_count)
            } else {
                self.catalog.bonus_table().bonus_for(1)
            },
        });

        let progress = self
            .catalog
            .tasks()
            .iter()
            .filter(|t| t.value.tracks_units())
            .map(|t| TaskProgress {
                id: t.id.clone(),
                name: t.name.clone(),
                units_completed: self.state.units(&t.id),
                points_per_unit: t.value.points_per_event(),
            })
            .collect();

        let affordable = self
            .catalog
            .rewards()
            .iter()
            .filter(|r| r.cost <= self.state.points)
            .map(|r| r.id.clone())
            .collect();

        StatusReport {
            catalog: self.catalog.name().to_string(),
            points: self.state.points,
            streak,
            progress,
            affordable,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Apply one completion event covering every ID in `task_ids`.
    ///
    /// IDs are normalised, blanks are skipped and repeats collapse to one.
    /// Unknown IDs are reported in the outcome list without aborting the
    /// batch. The event always counts for the streak, even if nothing in
    /// it was credited.
    pub fn complete<I, T>(&mut self, task_ids: I) -> Result<EarnedReport>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let catalog = self.catalog;
        let mut ids: Vec<String> = Vec::new();
        for raw in task_ids {
            let id = normalize_id(raw.as_ref());
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }

        let mut next = self.state.clone();
        let mut outcomes = Vec::with_capacity(ids.len());
        let mut base_points: u64 = 0;

        for id in ids {
            let Some(task) = catalog.task(&id) else {
                tracing::warn!(task = %id, "unknown task ID in batch");
                outcomes.push(TaskOutcome::Unknown { id });
                continue;
            };

            let points = task.value.points_per_event();
            let units_completed = if task.value.tracks_units() {
                let units = next.units_completed.entry(task.id.clone()).or_insert(0);
                *units = units.saturating_add(1);
                Some(*units)
            } else {
                None
            };

            base_points = base_points.saturating_add(points);
            outcomes.push(TaskOutcome::Credited {
                id: task.id.clone(),
                name: task.name.clone(),
                points,
                units_completed,
            });
        }

        let streak = catalog.streak_task().map(|task| {
            let completed = outcomes
                .iter()
                .any(|o| matches!(o, TaskOutcome::Credited { id, .. } if *id == task.id));
            let (counter, outcome) = next
                .streak()
                .advance(completed, catalog.bonus_table());
            next.set_streak(counter);
            outcome
        });

        let bonus = streak.map(|s| s.bonus()).unwrap_or(0);
        let total_earned = base_points.saturating_add(bonus);
        next.points = next.points.saturating_add(total_earned);

        self.commit(next)?;
        tracing::info!(
            earned = total_earned,
            bonus,
            balance = self.state.points,
            "completion recorded"
        );

        Ok(EarnedReport {
            outcomes,
            base_points,
            streak,
            total_earned,
            balance: self.state.points,
            at: Utc::now(),
        })
    }

    /// Single-task completion. Unlike a batch, an unknown ID is an error
    /// and nothing changes.
    pub fn complete_one(&mut self, task_id: &str) -> Result<EarnedReport> {
        if self.catalog.task(task_id).is_none() {
            return Err(LedgerError::UnknownTask(normalize_id(task_id)).into());
        }
        self.complete([task_id])
    }

    /// Spend points on a reward. Rejected, not clamped, when unaffordable.
    pub fn redeem(&mut self, reward_id: &str) -> Result<RedemptionReport> {
        let catalog = self.catalog;
        let reward = catalog
            .reward(reward_id)
            .ok_or_else(|| LedgerError::UnknownReward(normalize_id(reward_id)))?;

        if self.state.points < reward.cost {
            return Err(LedgerError::InsufficientPoints {
                cost: reward.cost,
                balance: self.state.points,
            }
            .into());
        }

        let mut next = self.state.clone();
        next.points -= reward.cost;
        self.commit(next)?;
        tracing::info!(reward = %reward.id, cost = reward.cost, balance = self.state.points, "reward redeemed");

        Ok(RedemptionReport {
            id: reward.id.clone(),
            description: reward.description.clone(),
            cost: reward.cost,
            balance: self.state.points,
            at: Utc::now(),
        })
    }

    /// Zero everything and delete the persisted record. Idempotent.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.state = LedgerState::default();
        self.persisted = false;
        tracing::info!("ledger reset");
        Ok(())
    }

    /// Write the current state again, e.g. at session end.
    ///
    /// Does nothing while the store holds no record, so a reset is not
    /// undone by the final flush.
    pub fn flush(&self) -> Result<()> {
        if !self.persisted {
            return Ok(());
        }
        self.store.save(&self.state)?;
        Ok(())
    }

    /// Apply a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::Complete(ids) => self.complete(ids).map(Response::Earned),
            Command::Redeem(id) => self.redeem(&id).map(Response::Redeemed),
            Command::Status => Ok(Response::Status(self.status())),
            Command::Reset => self.reset().map(|()| Response::Reset),
            Command::Exit => self.flush().map(|()| Response::Exit),
        }
    }

    fn commit(&mut self, next: LedgerState) -> Result<()> {
        self.store.save(&next)?;
        self.state = next;
        self.persisted = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_pack, RewardDefinition, TaskDefinition};
    use crate::error::CoreError;
    use crate::storage::MemoryStore;
    use crate::streak::{BonusTable, StreakOutcome};

    fn exercise() -> Catalog {
        find_pack("exercise").unwrap().catalog
    }

    fn study() -> Catalog {
        find_pack("study").unwrap().catalog
    }

    #[test]
    fn two_day_streak_example() {
        let catalog = exercise();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();

        let day1 = ledger.complete(["T1"]).unwrap();
        assert_eq!(day1.total_earned, 4);
        assert_eq!(day1.balance, 4);
        assert_eq!(ledger.state().streak_count, 1);

        let day2 = ledger.complete(["T1"]).unwrap();
        assert_eq!(day2.base_points, 4);
        assert_eq!(day2.bonus(), 2);
        assert_eq!(day2.total_earned, 6);
        assert_eq!(day2.balance, 10);
        assert_eq!(ledger.state().streak_count, 2);
        assert_eq!(store.saved().unwrap().points, 10);
    }

    #[test]
    fn unknown_id_in_batch_does_not_block_valid_ones() {
        let catalog = exercise();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();

        let report = ledger.complete(["T3", "T99"]).unwrap();
        assert_eq!(report.total_earned, 1);
        assert_eq!(report.outcomes.len(), 2);
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors, vec![LedgerError::UnknownTask("T99".into())]);
    }

    #[test]
    fn batch_ids_are_normalised_and_deduplicated() {
        let catalog = exercise();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();

        let report = ledger.complete([" t3", "T3", "", "t4 "]).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.base_points, 2);
    }

    #[test]
    fn event_without_streak_task_breaks_the_streak() {
        let catalog = exercise();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        ledger.complete(["T1"]).unwrap();
        ledger.complete(["T1"]).unwrap();

        let report = ledger.complete(["T2"]).unwrap();
        assert_eq!(report.streak, Some(StreakOutcome::Broken { previous: 2 }));
        assert_eq!(ledger.state().streak_count, 0);
        assert!(!ledger.state().last_streak_task_succeeded);

        let restart = ledger.complete(["T1"]).unwrap();
        assert_eq!(restart.bonus(), 0);
        assert_eq!(ledger.state().streak_count, 1);
    }

    #[test]
    fn catalog_without_streak_leaves_streak_fields_alone() {
        let catalog = find_pack("stocks").unwrap().catalog;
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        let report = ledger.complete(["T4"]).unwrap();
        assert!(report.streak.is_none());
        assert_eq!(report.total_earned, 10);
        assert_eq!(ledger.state().streak_count, 0);
    }

    #[test]
    fn per_unit_task_counts_chapters() {
        let catalog = study();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();

        ledger.complete_one("T6").unwrap();
        let report = ledger.complete_one("t6").unwrap();
        assert_eq!(
            report.outcomes,
            vec![TaskOutcome::Credited {
                id: "T6".into(),
                name: "Dynamics review and notes".into(),
                points: 18,
                units_completed: Some(2),
            }]
        );
        assert_eq!(ledger.points(), 36);
        assert_eq!(ledger.state().units("T6"), 2);
    }

    #[test]
    fn complete_one_rejects_unknown_without_writing() {
        let catalog = study();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();

        let err = ledger.complete_one("T42").unwrap_err();
        assert!(matches!(err, CoreError::Ledger(LedgerError::UnknownTask(id)) if id == "T42"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn redeem_subtracts_cost() {
        let catalog = exercise();
        let store = MemoryStore::with_state(LedgerState {
            points: 25,
            ..LedgerState::default()
        });
        let mut ledger = Ledger::open(&catalog, &store).unwrap();

        let report = ledger.redeem("r1").unwrap();
        assert_eq!(report.id, "R1");
        assert_eq!(report.cost, 20);
        assert_eq!(report.balance, 5);
        assert_eq!(store.saved().unwrap().points, 5);
    }

    #[test]
    fn insufficient_points_is_rejected_without_mutation() {
        let catalog = exercise();
        let store = MemoryStore::with_state(LedgerState {
            points: 11,
            ..LedgerState::default()
        });
        let mut ledger = Ledger::open(&catalog, &store).unwrap();

        let err = ledger.redeem("R2").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Ledger(LedgerError::InsufficientPoints { cost: 12, balance: 11 })
        ));
        assert_eq!(ledger.points(), 11);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn unknown_reward_is_rejected() {
        let catalog = exercise();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        assert!(matches!(
            ledger.redeem("R77"),
            Err(CoreError::Ledger(LedgerError::UnknownReward(_)))
        ));
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let catalog = exercise();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();
        ledger.complete(["T1"]).unwrap();

        store.set_fail_writes(true);
        assert!(matches!(
            ledger.complete(["T1", "T2"]),
            Err(CoreError::Storage(_))
        ));
        assert_eq!(ledger.points(), 4);
        assert_eq!(ledger.state().streak_count, 1);
        assert_eq!(store.saved().unwrap().points, 4);
    }

    #[test]
    fn status_reports_streak_progress_and_affordable_rewards() {
        let catalog = exercise();
        let store = MemoryStore::with_state(LedgerState {
            points: 20,
            streak_count: 3,
            last_streak_task_succeeded: true,
            ..LedgerState::default()
        });
        let ledger = Ledger::open(&catalog, &store).unwrap();

        let status = ledger.status();
        assert_eq!(status.points, 20);
        let streak = status.streak.unwrap();
        assert_eq!(streak.count, 3);
        assert_eq!(streak.next_bonus, 5);
        assert!(status.progress.is_empty());
        assert_eq!(status.affordable, vec!["R1".to_string(), "R2".to_string()]);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn status_lists_every_unit_task() {
        let catalog = study();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        ledger.complete_one("T9").unwrap();

        let status = ledger.status();
        assert!(status.streak.is_none());
        assert_eq!(status.progress.len(), 10);
        let t9 = status.progress.iter().find(|p| p.id == "T9").unwrap();
        assert_eq!(t9.units_completed, 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let catalog = study();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();
        ledger.complete_one("T1").unwrap();

        ledger.reset().unwrap();
        ledger.reset().unwrap();
        assert_eq!(ledger.state(), &LedgerState::default());
        assert!(store.saved().is_none());
    }

    #[test]
    fn exit_after_reset_leaves_no_record() {
        let catalog = exercise();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();
        ledger.complete(["T1"]).unwrap();
        let writes = store.writes();

        ledger.execute(Command::Reset).unwrap();
        assert!(matches!(ledger.execute(Command::Exit).unwrap(), Response::Exit));
        assert!(store.saved().is_none());
        assert_eq!(store.writes(), writes);

        ledger.complete(["T2"]).unwrap();
        ledger.flush().unwrap();
        assert_eq!(store.saved().unwrap().points, 2);
    }

    #[test]
    fn flush_rewrites_a_loaded_record() {
        let catalog = exercise();
        let store = MemoryStore::with_state(LedgerState {
            points: 7,
            ..LedgerState::default()
        });
        let ledger = Ledger::open(&catalog, &store).unwrap();
        ledger.flush().unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.saved().unwrap().points, 7);
    }

    #[test]
    fn custom_bonus_table_without_cycle_keeps_counting() {
        let catalog = Catalog::new(
            "custom",
            vec![TaskDefinition::fixed("RUN", "Run", 1)],
            vec![RewardDefinition::new("R1", "Tea", 1)],
        )
        .unwrap()
        .with_streak_task("RUN", BonusTable::empty())
        .unwrap();
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        for _ in 0..10 {
            ledger.complete(["RUN"]).unwrap();
        }
        assert_eq!(ledger.state().streak_count, 10);
        assert_eq!(ledger.points(), 10);
    }

    #[test]
    fn execute_dispatches_every_command() {
        let catalog = exercise();
        let store = MemoryStore::new();
        let mut ledger = Ledger::open(&catalog, &store).unwrap();

        let earned = ledger
            .execute(Command::Complete(vec!["T1".into(), "T2".into()]))
            .unwrap();
        assert!(matches!(earned, Response::Earned(r) if r.total_earned == 6));
        assert!(matches!(
            ledger.execute(Command::Status).unwrap(),
            Response::Status(s) if s.points == 6
        ));
        assert!(ledger.execute(Command::Redeem("R1".into())).is_err());
        assert!(matches!(ledger.execute(Command::Exit).unwrap(), Response::Exit));
        assert!(matches!(ledger.execute(Command::Reset).unwrap(), Response::Reset));
        assert_eq!(ledger.points(), 0);
    }
}
