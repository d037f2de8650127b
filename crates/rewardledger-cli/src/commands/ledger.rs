use std::error::Error;
use std::io::{self, BufRead, Write};

use rewardledger_core::{CoreError, JsonFileStore, StateStore};

use super::{GlobalArgs, Session};
use crate::render;

pub fn complete(globals: &GlobalArgs, ids: &[String], json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;
    let mut ledger = session.ledger()?;

    let ids = rewardledger_core::command::split_ids(ids.iter().map(String::as_str));
    let report = ledger.complete(&ids).inspect_err(|e| print_json_error(e, json))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::earned(&report, &session.catalog));
    }
    Ok(())
}

pub fn redeem(globals: &GlobalArgs, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;
    let mut ledger = session.ledger()?;
    let report = ledger.redeem(id).inspect_err(|e| print_json_error(e, json))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::redeemed(&report));
    }
    Ok(())
}

pub fn status(globals: &GlobalArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;
    let ledger = session.ledger()?;
    let report = ledger.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render::status(&report));
    if session.config.display.show_catalog_in_status {
        print!("\n{}", render::catalog(&session.catalog));
    }
    Ok(())
}

/// Deletes the state file without reading it, so an unreadable file can be
/// cleared too.
pub fn reset(globals: &GlobalArgs, yes: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;

    if !yes && !confirm("Reset all points and progress? [y/N] ")? {
        println!("reset cancelled");
        return Ok(());
    }

    JsonFileStore::new(&session.state_path).clear()?;
    tracing::info!(path = %session.state_path.display(), "ledger reset");
    println!("all points and progress cleared");
    Ok(())
}

/// Rejections still produce a JSON document on stdout under `--json`.
fn print_json_error(err: &CoreError, json: bool) {
    if let (true, CoreError::Ledger(e)) = (json, err) {
        let body = serde_json::json!({ "error": { "kind": e.kind(), "message": e.to_string() } });
        println!("{body}");
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
