// 🔒 Shared Ledger - one ledger behind a reader/writer lock
//
// Writers are serialized, so issue/return on the same (book, member)
// pair can never interleave. Readers share the lock and always see a
// ledger between operations, never mid-transition.

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entities::{LoanRecord, ReturnOutcome};
use crate::error::Result;
use crate::ids::{BookId, MemberId};
use crate::ledger::Ledger;
use crate::views::{BookSummary, CatalogStats, LoanSummary, MemberView};

/// Cloneable handle to a ledger shared across threads
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        SharedLedger {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // Ledger operations return before mutating on every error path, so a
    // panic elsewhere cannot leave it half-updated; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read-only closure against a consistent view of the ledger
    pub fn with_ledger<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.read())
    }

    /// Owned copy of the whole ledger at this instant
    pub fn snapshot(&self) -> Ledger {
        self.read().clone()
    }

    pub fn register_book(&self, title: &str, author: &str, isbn: &str, copies: i64) -> Result<BookId> {
        self.write().register_book(title, author, isbn, copies)
    }

    pub fn register_member(&self, name: &str, email: &str) -> Result<MemberId> {
        self.write().register_member(name, email)
    }

    pub fn issue_book(&self, book_id: BookId, member_id: MemberId, now: DateTime<Utc>) -> Result<LoanRecord> {
        self.write().issue_book(book_id, member_id, now)
    }

    pub fn return_book(
        &self,
        book_id: BookId,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        self.write().return_book(book_id, member_id, now)
    }

    pub fn list_available_books(&self) -> Vec<BookSummary> {
        self.read().list_available_books()
    }

    pub fn list_all_books(&self) -> Vec<BookSummary> {
        self.read().list_all_books()
    }

    pub fn list_issued_books(&self, now: DateTime<Utc>) -> Vec<LoanSummary> {
        self.read().list_issued_books(now)
    }

    pub fn get_member_info(&self, member_id: MemberId, now: DateTime<Utc>) -> Result<MemberView> {
        self.read().get_member_info(member_id, now)
    }

    pub fn catalog_stats(&self) -> CatalogStats {
        self.read().catalog_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use chrono::TimeZone;
    use std::thread;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_concurrent_issue_never_oversubscribes() {
        let shared = SharedLedger::new(Ledger::new());
        let book = shared.register_book("Dune", "Herbert", "1", 3).unwrap();
        let members: Vec<MemberId> = (0..8)
            .map(|i| {
                shared
                    .register_member(&format!("member {i}"), &format!("m{i}@x.org"))
                    .unwrap()
            })
            .collect();

        let handles: Vec<_> = members
            .into_iter()
            .map(|member| {
                let shared = shared.clone();
                thread::spawn(move || shared.issue_book(book, member, t0()))
            })
            .collect();

        let results: Vec<Result<LoanRecord>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let issued = results.iter().filter(|r| r.is_ok()).count();
        let refused = results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::NoCopiesAvailable(_))))
            .count();
        assert_eq!(issued, 3);
        assert_eq!(refused, 5);

        shared.with_ledger(|ledger| ledger.verify_integrity()).unwrap();
        assert_eq!(shared.catalog_stats().copies_on_loan, 3);
    }

    #[test]
    fn test_concurrent_issue_and_return_pairs() {
        let shared = SharedLedger::new(Ledger::new());
        let book = shared.register_book("Dune", "Herbert", "1", 2).unwrap();
        let ada = shared.register_member("Ada", "a@x.org").unwrap();
        let grace = shared.register_member("Grace", "g@x.org").unwrap();

        let handles: Vec<_> = [ada, grace]
            .into_iter()
            .map(|member| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for round in 0..50 {
                        let now = t0() + chrono::Duration::days(round);
                        shared.issue_book(book, member, now).unwrap();
                        shared.return_book(book, member, now).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = shared.snapshot();
        snapshot.verify_integrity().unwrap();
        assert_eq!(snapshot.book(book).unwrap().available_copies(), 2);
        assert!(shared.list_issued_books(t0()).is_empty());
        assert_eq!(shared.list_available_books().len(), 1);
        assert_eq!(shared.list_all_books().len(), 1);
        assert_eq!(shared.get_member_info(ada, t0()).unwrap().total_fines, 0.0);
    }
}
