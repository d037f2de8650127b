use std::error::Error;

use rewardledger_core::builtin_packs;

use super::{GlobalArgs, Session};
use crate::render;

pub fn show(globals: &GlobalArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session.catalog)?);
    } else {
        print!("{}", render::catalog(&session.catalog));
    }
    Ok(())
}

pub fn packs() -> Result<(), Box<dyn Error>> {
    for pack in builtin_packs() {
        let streak = pack
            .catalog
            .streak_task()
            .map(|t| format!(", streak on {}", t.id))
            .unwrap_or_default();
        println!(
            "{:<10} {}: {} ({} tasks, {} rewards{streak})",
            pack.id,
            pack.name,
            pack.description,
            pack.catalog.tasks().len(),
            pack.catalog.rewards().len(),
        );
        for line in pack.rationale.lines() {
            println!("           {line}");
        }
    }
    Ok(())
}
