//! Copy-count invariant over arbitrary lend/return sequences.

use proptest::prelude::*;

use book_ledger::{LedgerConfig, LedgerError, NewBook, NotFoundReason, ReturnPolicy};

use crate::support::{ledger, ledger_with};

#[derive(Debug, Clone, Copy)]
enum Op {
    Lend,
    Return,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Lend), Just(Op::Return)]
}

proptest! {
    #[test]
    fn rejecting_ledger_keeps_counts_in_bounds(
        copies in 0i32..6,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let ledger = ledger_with(LedgerConfig::default().return_policy(ReturnPolicy::Reject));
        let id = ledger.add(NewBook::new("Book 1", "Author 1", copies)).unwrap().id();
        let mut expected = copies;

        for op in ops {
            match op {
                Op::Lend => match ledger.lend(id) {
                    Ok(book) => {
                        prop_assert!(expected > 0);
                        expected -= 1;
                        prop_assert_eq!(book.available_copies(), expected);
                    }
                    Err(err) => {
                        prop_assert_eq!(expected, 0);
                        prop_assert_eq!(err.not_found_reason(), Some(NotFoundReason::NoCopiesAvailable));
                    }
                },
                Op::Return => match ledger.return_book(id) {
                    Ok(book) => {
                        prop_assert!(expected < copies);
                        expected += 1;
                        prop_assert_eq!(book.available_copies(), expected);
                    }
                    Err(err) => {
                        prop_assert_eq!(expected, copies);
                        prop_assert!(matches!(err, LedgerError::AllCopiesReturned { .. }), "unexpected error: {}", err);
                    }
                },
            }

            let stored = ledger.get_by_id(id).unwrap().unwrap();
            prop_assert!(stored.available_copies() >= 0);
            prop_assert!(stored.available_copies() <= stored.copies());
            prop_assert_eq!(stored.available_copies(), expected);
        }
    }

    #[test]
    fn lend_never_goes_negative(
        available in 0i32..5,
        lends in 0usize..12,
    ) {
        let ledger = ledger();
        let id = ledger
            .add(NewBook::new("Book 1", "Author 1", 5).with_available_copies(available))
            .unwrap()
            .id();

        let successes = (0..lends).filter(|_| ledger.lend(id).is_ok()).count();

        prop_assert_eq!(successes, lends.min(available as usize));
        let stored = ledger.get_by_id(id).unwrap().unwrap();
        prop_assert_eq!(stored.available_copies() as usize, available as usize - successes);
    }

    #[test]
    fn add_round_trips_fields(
        title in "[A-Za-z][A-Za-z ]{0,20}",
        author in "[A-Za-z][A-Za-z .]{0,20}",
        copies in 0i32..1000,
    ) {
        let ledger = ledger();
        let added = ledger.add(NewBook::new(title.clone(), author.clone(), copies)).unwrap();
        let stored = ledger.get_by_id(added.id()).unwrap().unwrap();

        prop_assert_eq!(stored.title(), title.as_str());
        prop_assert_eq!(stored.author(), author.as_str());
        prop_assert_eq!(stored.copies(), copies);
        prop_assert_eq!(stored.available_copies(), copies);
    }
}
