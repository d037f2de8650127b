use std::error::Error;
use std::io::{self, BufRead, Write};

use rewardledger_core::{Catalog, Command, Ledger, Response, StateStore};

use super::{GlobalArgs, Session};
use crate::render;

const MENU: &str = "\
1) complete <IDs>   record completed tasks (e.g. 1 T1,T3)
2) status           show points and progress
3) redeem <ID>      spend points on a reward
4) reset            clear all points and progress
5) exit
";

pub fn run(globals: &GlobalArgs) -> Result<(), Box<dyn Error>> {
    let session = Session::open(globals)?;
    let mut ledger = session.ledger()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&mut ledger, stdin.lock(), stdout.lock())
}

/// Read commands line by line until `exit` or end of input.
pub fn run_loop<S, R, W>(ledger: &mut Ledger<'_, S>, input: R, mut out: W) -> Result<(), Box<dyn Error>>
where
    S: StateStore,
    R: BufRead,
    W: Write,
{
    let catalog = ledger.catalog();
    write!(out, "{}\n{MENU}", render::catalog(catalog))?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            ledger.execute(Command::Exit)?;
            writeln!(out)?;
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        match ledger.execute(command) {
            Ok(Response::Exit) => {
                writeln!(out, "bye")?;
                return Ok(());
            }
            Ok(response) => write!(out, "{}", render_response(&response, catalog))?,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
}

fn render_response(response: &Response, catalog: &Catalog) -> String {
    match response {
        Response::Earned(report) => render::earned(report, catalog),
        Response::Redeemed(report) => render::redeemed(report),
        Response::Status(report) => render::status(report),
        Response::Reset => "all points and progress cleared\n".to_string(),
        Response::Exit => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewardledger_core::{find_pack, MemoryStore};
    use std::io::Cursor;

    fn drive(store: &MemoryStore, script: &str) -> String {
        let catalog = find_pack("exercise").unwrap().catalog;
        let mut ledger = Ledger::open(&catalog, store).unwrap();
        let mut out = Vec::new();
        run_loop(&mut ledger, Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_menu_and_catalog() {
        let store = MemoryStore::new();
        let out = drive(&store, "exit\n");
        assert!(out.contains("tasks:"));
        assert!(out.contains("1) complete <IDs>"));
        assert!(out.ends_with("bye\n"));
    }

    #[test]
    fn menu_numbers_and_verbs_drive_the_ledger() {
        let store = MemoryStore::new();
        let out = drive(&store, "1 T1,T2\ncomplete T1\n2\n5\n");

        assert!(out.contains("earned: +6P"));
        assert!(out.contains("2-day streak on T1! +2P bonus"));
        assert!(out.contains("points: 12P"));
        assert_eq!(store.saved().unwrap().points, 12);
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let store = MemoryStore::new();
        let out = drive(&store, "fly\nredeem R1\n3\nstatus\nquit\n");

        assert!(out.contains("error: unknown command 'fly'"));
        assert!(out.contains("error: Insufficient points: 20P required, 0P available"));
        assert!(out.contains("error: 'redeem' needs at least one ID"));
        assert!(out.contains("points: 0P"));
        assert!(out.ends_with("bye\n"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let store = MemoryStore::new();
        let out = drive(&store, "done T3\n");
        assert!(out.contains("earned: +1P"));
        assert!(!out.contains("bye"));
        assert_eq!(store.saved().unwrap().points, 1);
    }

    #[test]
    fn reset_clears_state() {
        let store = MemoryStore::new();
        let out = drive(&store, "1 T1\n4\n2\nexit\n");
        assert!(out.contains("all points and progress cleared"));
        assert!(out.contains("points: 0P"));
        assert!(store.saved().is_none());
    }
}
