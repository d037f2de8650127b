//! Built-in catalog packs.
//!
//! Each pack is a ready-made catalog for one kind of self-improvement
//! routine, selectable by ID from the configuration.

use super::{Catalog, RewardDefinition, TaskDefinition};
use crate::streak::BonusTable;

/// A named, ready-to-use catalog.
#[derive(Debug, Clone)]
pub struct Pack {
    /// Unique identifier (e.g., "exercise", "stocks", "study").
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// How points are earned in this pack.
    pub rationale: &'static str,
    pub catalog: Catalog,
}

/// Returns all built-in packs.
pub fn builtin_packs() -> Vec<Pack> {
    vec![exercise_pack(), stocks_pack(), study_pack()]
}

/// Find a built-in pack by ID.
pub fn find_pack(id: &str) -> Option<Pack> {
    let id = id.trim().to_lowercase();
    builtin_packs().into_iter().find(|p| p.id == id)
}

/// Get pack IDs for listing.
pub fn pack_ids() -> Vec<&'static str> {
    vec!["exercise", "stocks", "study"]
}

// Built-in tables are static, so a failure here is a programming error.
fn build(result: Result<Catalog, crate::error::CatalogError>) -> Catalog {
    match result {
        Ok(catalog) => catalog,
        Err(e) => panic!("built-in catalog is invalid: {e}"),
    }
}

/// Exercise Pack
///
/// Daily workout habit with a seven-day streak on the full routine.
fn exercise_pack() -> Pack {
    let tasks = vec![
        TaskDefinition::fixed("T1", "Full daily workout routine", 4),
        TaskDefinition::fixed("T2", "Half daily workout routine", 2),
        TaskDefinition::fixed("T3", "Stretch before and after the workout", 1),
        TaskDefinition::fixed("T4", "Stretch before bed", 1),
        TaskDefinition::fixed("T5", "Watch a workout technique video", 1),
        TaskDefinition::fixed("T6", "Watch a fashion video", 1),
        TaskDefinition::fixed("T7", "Rest day (ends the streak)", 0),
    ];
    let rewards = vec![
        RewardDefinition::new("R1", "Baskin-Robbins ice cream", 20),
        RewardDefinition::new("R2", "A drink of your choice", 12),
        RewardDefinition::new("R3", "One visit to a good restaurant", 40),
        RewardDefinition::new("R4", "An evening at a cocktail bar", 120),
        RewardDefinition::new("R5", "A massage", 280),
    ];
    let catalog = build(
        Catalog::new("exercise", tasks, rewards)
            .and_then(|c| c.with_streak_task("T1", BonusTable::default())),
    );

    Pack {
        id: "exercise",
        name: "Exercise",
        description: "Daily workout routine with streak bonuses",
        rationale: indoc::indoc! {"
            Report the day's completed tasks in one batch. Completing the
            full routine (T1) on consecutive days escalates the bonus:
            +2, +3, +5, +7, +9 and finally +12 on the seventh day, after
            which the streak starts over. Any day without T1 ends it.
        "},
        catalog,
    }
}

/// Stocks Pack
///
/// Market research habits, flat points per task, no streak.
fn stocks_pack() -> Pack {
    let tasks = vec![
        TaskDefinition::fixed("T1", "Watch a market analysis video (1h)", 2),
        TaskDefinition::fixed("T2", "Write the trading journal", 2),
        TaskDefinition::fixed("T3", "Analyse a company earnings release", 3),
        TaskDefinition::fixed("T4", "Analyse a company 10-K filing", 10),
        TaskDefinition::fixed("T5", "Publish an analysis blog post", 7),
        TaskDefinition::fixed("T6", "Analyse 13F filings", 5),
        TaskDefinition::fixed("T7", "Write the daily market close summary", 3),
        TaskDefinition::fixed("T8", "Weekly market summary and next week's watchlist", 7),
    ];
    let rewards = vec![
        RewardDefinition::new("R1", "Go to a restaurant", 30),
        RewardDefinition::new("R2", "Visit a massage shop", 70),
        RewardDefinition::new("R3", "Take a trip", 300),
    ];

    Pack {
        id: "stocks",
        name: "Stocks",
        description: "Investment research habits",
        rationale: indoc::indoc! {"
            One task per report, flat points by effort. Deep filings
            analysis is worth five times a market video.
        "},
        catalog: build(Catalog::new("stocks", tasks, rewards)),
    }
}

/// Study Pack
///
/// Chapter-based study with per-unit points scaled by subject difficulty.
fn study_pack() -> Pack {
    let tasks = vec![
        TaskDefinition::per_unit("T1", "Python fundamentals", 10, 2.0),
        TaskDefinition::per_unit("T2", "Thermodynamics review and assignments", 10, 2.0),
        TaskDefinition::per_unit("T3", "Engineering mathematics review and problems", 10, 2.0),
        TaskDefinition::per_unit("T4", "Machine design review", 15, 3.0),
        TaskDefinition::per_unit("T5", "Heat transfer review and notes", 15, 3.0),
        TaskDefinition::per_unit("T6", "Dynamics review and notes", 18, 3.5),
        TaskDefinition::per_unit("T7", "Research trend and engineering videos", 5, 1.0),
        TaskDefinition::per_unit("T8", "ROS fundamentals", 10, 2.0),
        TaskDefinition::per_unit("T9", "Finish a comic-style textbook", 60, 3.5),
        TaskDefinition::per_unit("T10", "Self-directed study", 120, 2.0),
    ];
    let rewards = vec![
        RewardDefinition::new("R1", "Drawing (30 min)", 10),
        RewardDefinition::new("R2", "Stretch break (10 min)", 5),
        RewardDefinition::new("R3", "Gaming (30 min)", 10),
        RewardDefinition::new("R4", "YouTube (30 min)", 10),
        RewardDefinition::new("R5", "Netflix (1 hour)", 15),
        RewardDefinition::new("R6", "PC cafe (2 hours)", 25),
        RewardDefinition::new("R7", "A film at the cinema", 30),
        RewardDefinition::new("R8", "Browse illustrations (30 min)", 5),
        RewardDefinition::new("R9", "Restaurant outing", 80),
        RewardDefinition::new("R10", "Course-meal restaurant", 180),
    ];

    Pack {
        id: "study",
        name: "Study",
        description: "Chapter-by-chapter study tracker",
        rationale: indoc::indoc! {"
            Each report completes one chapter of a subject and awards that
            subject's per-chapter points. Chapters completed are tracked per
            subject and survive restarts.
        "},
        catalog: build(Catalog::new("study", tasks, rewards)),
    }
}
