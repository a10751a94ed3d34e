//! Lend and return transitions.

use book_ledger::{BookChanges, LedgerConfig, LedgerError, NotFoundReason, ReturnPolicy};

use crate::support::{both_modes, ledger, ledger_with, seed, UNKNOWN_ID};

#[test]
fn lend_decreases_available_copies() {
    let ledger = ledger();
    let book = seed(&ledger, 3, 3);

    let lent = ledger.lend(book.id()).unwrap();
    assert_eq!(lent.available_copies(), 2);

    let stored = ledger.get_by_id(book.id()).unwrap().unwrap();
    assert_eq!(stored.available_copies(), 2);
    assert_eq!(stored.copies(), 3);
}

#[test]
fn lend_until_empty_then_fails() {
    for config in both_modes() {
        let ledger = ledger_with(config);
        let book = seed(&ledger, 3, 3);

        assert_eq!(ledger.lend(book.id()).unwrap().available_copies(), 2);
        assert_eq!(ledger.lend(book.id()).unwrap().available_copies(), 1);
        assert_eq!(ledger.lend(book.id()).unwrap().available_copies(), 0);

        let err = ledger.lend(book.id()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.not_found_reason(),
            Some(NotFoundReason::NoCopiesAvailable)
        );
        assert_eq!(
            ledger.get_by_id(book.id()).unwrap().unwrap().available_copies(),
            0
        );
    }
}

#[test]
fn lend_with_zero_copies_is_not_found() {
    let ledger = ledger();
    let book = seed(&ledger, 0, 0);

    let err = ledger.lend(book.id()).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            reason: NotFoundReason::NoCopiesAvailable,
            ..
        }
    ));
}

#[test]
fn lend_unknown_id_is_not_found() {
    let err = ledger().lend(UNKNOWN_ID).unwrap_err();
    assert_eq!(err.not_found_reason(), Some(NotFoundReason::Missing));
}

#[test]
fn return_increases_available_copies() {
    for config in both_modes() {
        let ledger = ledger_with(config);
        let book = seed(&ledger, 3, 2);

        let returned = ledger.return_book(book.id()).unwrap();
        assert_eq!(returned.available_copies(), 3);
        assert_eq!(
            ledger.get_by_id(book.id()).unwrap().unwrap().available_copies(),
            3
        );
    }
}

#[test]
fn return_unknown_id_is_not_found() {
    let err = ledger().return_book(UNKNOWN_ID).unwrap_err();
    assert_eq!(err.not_found_reason(), Some(NotFoundReason::Missing));
}

#[test]
fn unchecked_return_allows_more_than_owned() {
    let ledger = ledger();
    let book = seed(&ledger, 3, 3);

    let returned = ledger.return_book(book.id()).unwrap();
    assert_eq!(returned.available_copies(), 4);
    assert_eq!(returned.lent_copies(), -1);
}

#[test]
fn over_returned_book_accepts_only_edits_that_fix_the_counts() {
    let ledger = ledger();
    let book = seed(&ledger, 3, 3);
    ledger.return_book(book.id()).unwrap();

    let err = ledger
        .update(book.id(), &BookChanges::new().title("Renamed"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)), "got {}", err);
    assert_eq!(ledger.get_by_id(book.id()).unwrap().unwrap().title(), "Book 1");

    let fixed = ledger
        .update(book.id(), &BookChanges::new().title("Renamed").available_copies(3))
        .unwrap();
    assert_eq!(fixed.title(), "Renamed");
    assert_eq!(fixed.available_copies(), 3);

    ledger.return_book(book.id()).unwrap();
    let grown = ledger
        .update(book.id(), &BookChanges::new().copies(4))
        .unwrap();
    assert_eq!(grown.copies(), 4);
    assert_eq!(grown.available_copies(), 4);
}

#[test]
fn rejecting_return_refuses_full_shelf() {
    let ledger = ledger_with(LedgerConfig::default().return_policy(ReturnPolicy::Reject));
    let book = seed(&ledger, 3, 2);

    assert_eq!(ledger.return_book(book.id()).unwrap().available_copies(), 3);

    let err = ledger.return_book(book.id()).unwrap_err();
    assert!(matches!(err, LedgerError::AllCopiesReturned { id } if id == book.id()));
    assert_eq!(
        ledger.get_by_id(book.id()).unwrap().unwrap().available_copies(),
        3
    );
}

#[test]
fn lend_then_return_restores_count() {
    let ledger = ledger();
    let book = seed(&ledger, 2, 2);

    ledger.lend(book.id()).unwrap();
    ledger.lend(book.id()).unwrap();
    ledger.return_book(book.id()).unwrap();
    let book = ledger.return_book(book.id()).unwrap();

    assert_eq!(book.available_copies(), 2);
}

#[test]
fn lending_after_delete_is_not_found() {
    let ledger = ledger();
    let book = seed(&ledger, 2, 2);
    ledger.delete(book.id()).unwrap();

    let err = ledger.lend(book.id()).unwrap_err();
    assert_eq!(err.not_found_reason(), Some(NotFoundReason::Missing));
}
