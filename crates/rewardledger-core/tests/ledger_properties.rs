//! Property tests for ledger invariants.

use proptest::prelude::*;
use rewardledger_core::{
    find_pack, CoreError, JsonFileStore, Ledger, LedgerError, LedgerState, MemoryStore,
    StateStore,
};

#[derive(Debug, Clone)]
enum Op {
    Complete(Vec<&'static str>),
    Redeem(&'static str),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let task_ids = prop::sample::subsequence(vec!["T1", "T2", "T3", "T4", "T5", "T6", "T7", "X9"], 0..4);
    let reward_ids = prop::sample::select(vec!["R1", "R2", "R3", "R4", "R5", "R0"]);
    prop_oneof![
        3 => task_ids.prop_map(Op::Complete),
        1 => reward_ids.prop_map(Op::Redeem),
    ]
}

fn state_strategy() -> impl Strategy<Value = LedgerState> {
    (
        any::<u64>(),
        any::<u32>(),
        any::<bool>(),
        prop::collection::btree_map("T[0-9]{1,2}", any::<u32>(), 0..6),
    )
        .prop_map(|(points, streak_count, last_streak_task_succeeded, units_completed)| {
            LedgerState {
                points,
                streak_count,
                last_streak_task_succeeded,
                units_completed,
            }
        })
}

proptest! {
    #[test]
    fn balance_is_earned_minus_spent(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let catalog = find_pack("exercise").unwrap().catalog;
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        let mut earned: u64 = 0;
        let mut spent: u64 = 0;

        for op in ops {
            match op {
                Op::Complete(ids) => {
                    let report = ledger.complete(ids).unwrap();
                    prop_assert_eq!(report.total_earned, report.base_points + report.bonus());
                    earned += report.total_earned;
                }
                Op::Redeem(id) => {
                    let before = ledger.points();
                    match ledger.redeem(id) {
                        Ok(report) => spent += report.cost,
                        Err(CoreError::Ledger(LedgerError::InsufficientPoints { cost, balance })) => {
                            prop_assert!(cost > balance);
                            prop_assert_eq!(ledger.points(), before);
                        }
                        Err(CoreError::Ledger(LedgerError::UnknownReward(_))) => {
                            prop_assert_eq!(ledger.points(), before);
                        }
                        Err(e) => return Err(TestCaseError::fail(e.to_string())),
                    }
                }
            }
            prop_assert_eq!(ledger.points(), earned - spent);
            prop_assert!(ledger.state().streak_count < 7);
        }
    }

    #[test]
    fn streak_bonus_matches_run_length(run in 1usize..=7) {
        let catalog = find_pack("exercise").unwrap().catalog;
        let mut ledger = Ledger::open(&catalog, MemoryStore::new()).unwrap();
        ledger.complete(["T2"]).unwrap();

        let mut last = 0;
        for _ in 0..run {
            last = ledger.complete(["T1"]).unwrap().bonus();
        }
        let expected = [0, 2, 3, 5, 7, 9, 12][run - 1];
        prop_assert_eq!(last, expected);
    }

    #[test]
    fn saved_state_round_trips(
        chapters in prop::collection::vec(prop::sample::select(vec!["T1", "T4", "T6", "T9", "T10"]), 0..30)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.json");
        let catalog = find_pack("study").unwrap().catalog;

        let mut ledger = Ledger::open(&catalog, JsonFileStore::new(&path)).unwrap();
        for id in chapters {
            ledger.complete_one(id).unwrap();
        }

        let reloaded = JsonFileStore::new(&path).load().unwrap().unwrap_or_default();
        prop_assert_eq!(&reloaded, ledger.state());
    }

    #[test]
    fn any_state_survives_a_file_round_trip(state in state_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        store.save(&state).unwrap();
        prop_assert_eq!(store.load().unwrap(), Some(state));
    }
}
