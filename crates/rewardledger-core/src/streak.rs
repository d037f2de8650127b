//! Consecutive-completion streaks and the escalating bonus table.
//!
//! A catalog may designate one task as its streak task. Every completion
//! event either extends the streak (the task was part of the event) or
//! breaks it. Reaching a tier in the [`BonusTable`] awards extra points;
//! reaching the cycle length awards the last tier and starts over.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Bonus awarded when a streak reaches exactly `streak` consecutive events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTier {
    pub streak: u32,
    pub bonus: u64,
}

/// Lookup table from streak length to bonus points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTable {
    #[serde(default)]
    pub tiers: Vec<BonusTier>,
    /// Streak length at which the counter wraps back to zero.
    #[serde(default)]
    pub cycle_length: Option<u32>,
}

impl Default for BonusTable {
    /// 2→+2, 3→+3, 4→+5, 5→+7, 6→+9, 7→+12 then reset.
    fn default() -> Self {
        let tiers = [(2, 2), (3, 3), (4, 5), (5, 7), (6, 9), (7, 12)]
            .into_iter()
            .map(|(streak, bonus)| BonusTier { streak, bonus })
            .collect();
        Self {
            tiers,
            cycle_length: Some(7),
        }
    }
}

impl BonusTable {
    /// A table that never awards anything and never wraps.
    pub fn empty() -> Self {
        Self {
            tiers: Vec::new(),
            cycle_length: None,
        }
    }

    /// Bonus for reaching `count`, zero when no tier matches.
    pub fn bonus_for(&self, count: u32) -> u64 {
        self.tiers
            .iter()
            .find(|t| t.streak == count)
            .map(|t| t.bonus)
            .unwrap_or(0)
    }

    /// Bonus the next consecutive success would earn from `count`.
    pub fn next_bonus(&self, count: u32) -> u64 {
        self.bonus_for(count.saturating_add(1))
    }

    /// Check that tiers are strictly increasing and fit inside the cycle.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut previous = 0;
        for tier in &self.tiers {
            if tier.streak == 0 {
                return Err(CatalogError::InvalidBonusTable(
                    "tier streak must be at least 1".into(),
                ));
            }
            if tier.streak <= previous {
                return Err(CatalogError::InvalidBonusTable(format!(
                    "tier {} is not strictly after tier {previous}",
                    tier.streak
                )));
            }
            previous = tier.streak;
        }
        if let Some(cycle) = self.cycle_length {
            if cycle == 0 {
                return Err(CatalogError::InvalidBonusTable(
                    "cycle_length must be at least 1".into(),
                ));
            }
            if previous > cycle {
                return Err(CatalogError::InvalidBonusTable(format!(
                    "tier {previous} lies beyond cycle_length {cycle}"
                )));
            }
        }
        Ok(())
    }
}

/// The two persisted streak fields, viewed as one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCounter {
    pub count: u32,
    pub last_succeeded: bool,
}

/// What a single completion event did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreakOutcome {
    /// Streak task was completed; `reached` is the count before any wrap.
    Extended {
        reached: u32,
        bonus: u64,
        cycle_completed: bool,
    },
    /// Streak task was missing from the event.
    Broken { previous: u32 },
}

impl StreakOutcome {
    pub fn bonus(&self) -> u64 {
        match self {
            StreakOutcome::Extended { bonus, .. } => *bonus,
            StreakOutcome::Broken { .. } => 0,
        }
    }
}

impl StreakCounter {
    /// Apply one completion event.
    pub fn advance(self, completed: bool, table: &BonusTable) -> (StreakCounter, StreakOutcome) {
        if !completed {
            let next = StreakCounter {
                count: 0,
                last_succeeded: false,
            };
            return (
                next,
                StreakOutcome::Broken {
                    previous: self.count,
                },
            );
        }

        let reached = if self.last_succeeded {
            self.count.saturating_add(1)
        } else {
            1
        };
        let bonus = table.bonus_for(reached);
        let cycle_completed = table.cycle_length.is_some_and(|c| reached >= c);

        let next = StreakCounter {
            count: if cycle_completed { 0 } else { reached },
            last_succeeded: true,
        };
        (
            next,
            StreakOutcome::Extended {
                reached,
                bonus,
                cycle_completed,
            },
        )
    }
}
