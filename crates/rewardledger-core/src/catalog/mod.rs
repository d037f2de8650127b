//! Task and reward catalogs.
//!
//! A catalog is read-only configuration built once at startup: the tasks a
//! user may report, the rewards they may redeem, and optionally the one
//! task whose consecutive completion earns streak bonuses. Catalogs come
//! from a built-in [`packs`] entry or a user TOML file.

pub mod packs;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::streak::BonusTable;

pub use packs::{builtin_packs, find_pack, pack_ids, Pack};

pub type TaskId = String;
pub type RewardId = String;

/// Canonical form of a user-typed ID: trimmed and upper-cased.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// How a task converts into points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskValue {
    /// Flat award per completion.
    Fixed { points: u64 },
    /// Award per unit of progress; each completion is one unit.
    PerUnit { points_per_unit: u64 },
}

impl TaskValue {
    pub fn points_per_event(&self) -> u64 {
        match self {
            TaskValue::Fixed { points } => *points,
            TaskValue::PerUnit { points_per_unit } => *points_per_unit,
        }
    }

    pub fn tracks_units(&self) -> bool {
        matches!(self, TaskValue::PerUnit { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskId,
    pub name: String,
    pub value: TaskValue,
    /// Display-only effort hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f32>,
}

impl TaskDefinition {
    pub fn fixed(id: &str, name: &str, points: u64) -> Self {
        Self {
            id: normalize_id(id),
            name: name.to_string(),
            value: TaskValue::Fixed { points },
            difficulty: None,
        }
    }

    pub fn per_unit(id: &str, name: &str, points_per_unit: u64, difficulty: f32) -> Self {
        Self {
            id: normalize_id(id),
            name: name.to_string(),
            value: TaskValue::PerUnit { points_per_unit },
            difficulty: Some(difficulty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub id: RewardId,
    pub description: String,
    pub cost: u64,
}

impl RewardDefinition {
    pub fn new(id: &str, description: &str, cost: u64) -> Self {
        Self {
            id: normalize_id(id),
            description: description.to_string(),
            cost,
        }
    }
}

/// Immutable task and reward catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    name: String,
    tasks: Vec<TaskDefinition>,
    rewards: Vec<RewardDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    streak_task: Option<TaskId>,
    bonus: BonusTable,
}

impl Catalog {
    /// Build a catalog without a streak task.
    pub fn new(
        name: &str,
        tasks: Vec<TaskDefinition>,
        rewards: Vec<RewardDefinition>,
    ) -> Result<Self, CatalogError> {
        ensure_unique("task", tasks.iter().map(|t| t.id.as_str()))?;
        ensure_unique("reward", rewards.iter().map(|r| r.id.as_str()))?;
        Ok(Self {
            name: name.to_string(),
            tasks,
            rewards,
            streak_task: None,
            bonus: BonusTable::empty(),
        })
    }

    /// Designate `task_id` as the streak task, rewarded through `bonus`.
    pub fn with_streak_task(mut self, task_id: &str, bonus: BonusTable) -> Result<Self, CatalogError> {
        let id = normalize_id(task_id);
        if self.task(&id).is_none() {
            return Err(CatalogError::MissingStreakTask(id));
        }
        bonus.validate()?;
        self.streak_task = Some(id);
        self.bonus = bonus;
        Ok(self)
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        file.into_catalog()
    }

    /// Read and parse a TOML catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), tasks = catalog.tasks.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn rewards(&self) -> &[RewardDefinition] {
        &self.rewards
    }

    pub fn task(&self, id: &str) -> Option<&TaskDefinition> {
        let id = normalize_id(id);
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn reward(&self, id: &str) -> Option<&RewardDefinition> {
        let id = normalize_id(id);
        self.rewards.iter().find(|r| r.id == id)
    }

    pub fn streak_task(&self) -> Option<&TaskDefinition> {
        self.streak_task.as_deref().and_then(|id| self.task(id))
    }

    pub fn bonus_table(&self) -> &BonusTable {
        &self.bonus
    }

    pub fn has_unit_tasks(&self) -> bool {
        self.tasks.iter().any(|t| t.value.tracks_units())
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// On-disk TOML shape. A task sets exactly one of `points` or `points_per_unit`.

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default = "default_catalog_name")]
    name: String,
    #[serde(default)]
    streak_task: Option<String>,
    #[serde(default)]
    bonus: Option<BonusTable>,
    #[serde(default)]
    tasks: Vec<TaskEntry>,
    #[serde(default)]
    rewards: Vec<RewardEntry>,
}

#[derive(Deserialize)]
struct TaskEntry {
    id: String,
    name: String,
    #[serde(default)]
    points: Option<u64>,
    #[serde(default)]
    points_per_unit: Option<u64>,
    #[serde(default)]
    difficulty: Option<f32>,
}

#[derive(Deserialize)]
struct RewardEntry {
    id: String,
    description: String,
    cost: u64,
}

fn default_catalog_name() -> String {
    "custom".into()
}

impl CatalogFile {
    fn into_catalog(self) -> Result<Catalog, CatalogError> {
        let tasks = self
            .tasks
            .into_iter()
            .map(TaskEntry::into_definition)
            .collect::<Result<Vec<_>, _>>()?;
        let rewards = self
            .rewards
            .into_iter()
            .map(|r| RewardDefinition::new(&r.id, &r.description, r.cost))
            .collect();

        let catalog = Catalog::new(&self.name, tasks, rewards)?;
        match self.streak_task {
            Some(id) => catalog.with_streak_task(&id, self.bonus.unwrap_or_default()),
            None => Ok(catalog),
        }
    }
}

impl TaskEntry {
    fn into_definition(self) -> Result<TaskDefinition, CatalogError> {
        let value = match (self.points, self.points_per_unit) {
            (Some(points), None) => TaskValue::Fixed { points },
            (None, Some(points_per_unit)) => TaskValue::PerUnit { points_per_unit },
            _ => {
                return Err(CatalogError::InvalidTask(format!(
                    "task '{}' must set exactly one of points or points_per_unit",
                    self.id
                )))
            }
        };
        Ok(TaskDefinition {
            id: normalize_id(&self.id),
            name: self.name,
            value,
            difficulty: self.difficulty,
        })
    }
}
