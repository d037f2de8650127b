//! Plain-text rendering of ledger reports.

use rewardledger_core::ledger::{EarnedReport, RedemptionReport, StatusReport, TaskOutcome};
use rewardledger_core::{Catalog, StreakOutcome, TaskValue};

/// Join rendered lines, each terminated by a newline.
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn earned(report: &EarnedReport, catalog: &Catalog) -> String {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        lines.push(match outcome {
            TaskOutcome::Credited {
                id,
                name,
                points,
                units_completed: Some(units),
            } => format!("+{points}P  {id} {name} ({units} done)"),
            TaskOutcome::Credited {
                id, name, points, ..
            } => format!("+{points}P  {id} {name}"),
            TaskOutcome::Unknown { id } => format!("unknown task ID: {id}"),
        });
    }

    if let (Some(streak), Some(task)) = (report.streak, catalog.streak_task()) {
        match streak {
            StreakOutcome::Extended {
                reached,
                bonus,
                cycle_completed,
            } => {
                if bonus > 0 {
                    lines.push(format!("{reached}-day streak on {}! +{bonus}P bonus", task.id));
                }
                if cycle_completed {
                    lines.push("full cycle complete, streak starts over".to_string());
                }
            }
            StreakOutcome::Broken { previous } if previous > 0 => {
                lines.push(format!("streak ended after {previous} day(s)"));
            }
            StreakOutcome::Broken { .. } => {}
        }
    }

    lines.push(format!("earned: +{}P", report.total_earned));
    lines.push(format!("balance: {}P", report.balance));
    block(lines)
}

pub fn redeemed(report: &RedemptionReport) -> String {
    format!(
        "redeemed {} ({}) for {}P\nbalance: {}P\n",
        report.id, report.description, report.cost, report.balance
    )
}

pub fn status(report: &StatusReport) -> String {
    let mut lines = vec![
        format!("catalog: {}", report.catalog),
        format!("points: {}P", report.points),
    ];

    if let Some(streak) = &report.streak {
        lines.push(format!(
            "streak on {}: {} (next completion +{}P)",
            streak.task_id, streak.count, streak.next_bonus
        ));
    }

    if !report.progress.is_empty() {
        lines.push("progress:".to_string());
        lines.extend(report.progress.iter().map(|task| {
            format!(
                "  {:<4} {:>3} x {}P  {}",
                task.id, task.units_completed, task.points_per_unit, task.name
            )
        }));
    }

    lines.push(if report.affordable.is_empty() {
        "affordable: none".to_string()
    } else {
        format!("affordable: {}", report.affordable.join(", "))
    });
    block(lines)
}

pub fn catalog(catalog: &Catalog) -> String {
    let mut lines = vec!["tasks:".to_string()];
    for task in catalog.tasks() {
        let value = match &task.value {
            TaskValue::Fixed { points } => format!("{points}P"),
            TaskValue::PerUnit { points_per_unit } => format!("{points_per_unit}P/unit"),
        };
        let marker = match catalog.streak_task() {
            Some(streak) if streak.id == task.id => " (streak)",
            _ => "",
        };
        let difficulty = match task.difficulty {
            Some(d) if catalog.has_unit_tasks() => format!(" [difficulty {d}]"),
            _ => String::new(),
        };
        lines.push(format!("  {:<4} {:>8}  {}{marker}{difficulty}", task.id, value, task.name));
    }

    lines.push("rewards:".to_string());
    for reward in catalog.rewards() {
        let cost = format!("{}P", reward.cost);
        lines.push(format!("  {:<4} {:>8}  {}", reward.id, cost, reward.description));
    }
    block(lines)
}
