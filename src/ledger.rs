// 🏛️ Lending Ledger - catalog, members and the issue/return workflow
//
// The ledger is the only writer of books and members. Each operation
// validates everything that can fail before it mutates anything, so an
// Err always means "nothing changed".
//
// Cross-entity invariants held after every call:
// - every loan's member exists
// - a member lists a book iff that book holds a loan for the member
// - the ISBN index maps exactly the catalog's ISBNs to their books

use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::entities::{Book, LoanRecord, Member, ReturnOutcome};
use crate::error::{LedgerError, Result};
use crate::events::{EventLog, EventType, LedgerEvent};
use crate::ids::{BookId, IdAllocator, MemberId, FIRST_BOOK_ID, FIRST_MEMBER_ID};
use crate::normalize::{normalize_email, normalize_isbn, title_case};
use crate::views::{BookSummary, BorrowedBook, CatalogStats, LoanStatus, LoanSummary, MemberView};

#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
    /// ISBN → book, used to merge repeat registrations
    isbn_index: HashMap<String, BookId>,
    book_ids: IdAllocator,
    member_ids: IdAllocator,
    events: EventLog,
}

impl Ledger {
    /// Empty ledger with the default 14-day loan period and 1.00/day fine
    pub fn new() -> Self {
        Ledger {
            config: LedgerConfig::default(),
            books: HashMap::new(),
            members: HashMap::new(),
            isbn_index: HashMap::new(),
            book_ids: IdAllocator::starting_at(FIRST_BOOK_ID),
            member_ids: IdAllocator::starting_at(FIRST_MEMBER_ID),
            events: EventLog::new(),
        }
    }

    /// Empty ledger with caller-chosen loan period and fine rate
    pub fn with_config(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Ledger {
            config,
            ..Ledger::new()
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Add copies of a title to the catalog
    ///
    /// A known ISBN merges into the existing entry and returns its id;
    /// title and author of the repeat registration are not applied.
    pub fn register_book(
        &mut self,
        title: &str,
        author: &str,
        isbn: &str,
        copies: i64,
    ) -> Result<BookId> {
        let copies = u32::try_from(copies)
            .ok()
            .filter(|c| *c > 0)
            .ok_or(LedgerError::InvalidCopyCount { copies })
            .inspect_err(|e| debug!(error = %e, "book registration rejected"))?;

        let title = title_case(title);
        let author = title_case(author);
        let isbn = normalize_isbn(isbn);

        if let Some(&book_id) = self.isbn_index.get(&isbn) {
            let book = self.books.get_mut(&book_id).ok_or_else(|| {
                LedgerError::IntegrityViolation(format!("ISBN {isbn} indexes missing book {book_id}"))
            })?;
            book.add_copies(copies)?;

            info!(%book_id, %isbn, copies, total = book.total_copies(), "copies added to existing book");
            self.events.record(
                EventType::CopiesAdded,
                None,
                Some(book_id),
                None,
                json!({ "copies": copies, "total_copies": book.total_copies() }),
            );
            return Ok(book_id);
        }

        let book_id = BookId(self.book_ids.allocate());
        let book = Book::new(book_id, title, author, isbn.clone(), copies);

        info!(%book_id, %isbn, copies, title = %book.title, "book registered");
        self.events.record(
            EventType::BookRegistered,
            None,
            Some(book_id),
            None,
            json!({
                "title": book.title,
                "author": book.author,
                "isbn": book.isbn,
                "copies": copies,
            }),
        );
        self.books.insert(book_id, book);
        self.isbn_index.insert(isbn, book_id);

        Ok(book_id)
    }

    /// Register a new member; name is title-cased, email lower-cased
    pub fn register_member(&mut self, name: &str, email: &str) -> Result<MemberId> {
        let name = title_case(name);
        let email = normalize_email(email);

        if name.is_empty() || email.is_empty() {
            debug!("member registration rejected: empty name or email");
            return Err(LedgerError::InvalidMemberData);
        }

        let member_id = MemberId(self.member_ids.allocate());

        info!(%member_id, %name, "member registered");
        self.events.record(
            EventType::MemberRegistered,
            None,
            None,
            Some(member_id),
            json!({ "name": name, "email": email }),
        );
        self.members
            .insert(member_id, Member::new(member_id, name, email));

        Ok(member_id)
    }

    // ========================================================================
    // TRANSACTIONS
    // ========================================================================

    /// Lend a copy of `book_id` to `member_id`
    ///
    /// The book accepts or rejects the loan before the member is touched,
    /// so on error neither side has changed.
    pub fn issue_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<LoanRecord> {
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or(LedgerError::BookNotFound(book_id))?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(LedgerError::MemberNotFound(member_id))?;

        let record = book
            .issue(member_id, &member.name, now, &self.config)
            .inspect_err(|e| debug!(%book_id, %member_id, error = %e, "issue rejected"))?;
        member.record_borrow(book_id);

        info!(%book_id, %member_id, due_at = %record.due_at, "book issued");
        self.events.record(
            EventType::BookIssued,
            Some(now),
            Some(book_id),
            Some(member_id),
            json!({ "issued_at": record.issued_at, "due_at": record.due_at }),
        );

        Ok(record)
    }

    /// Take back a copy and charge any overdue fine to the member
    pub fn return_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or(LedgerError::BookNotFound(book_id))?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(LedgerError::MemberNotFound(member_id))?;

        let outcome = book
            .return_copy(member_id, now, &self.config)
            .inspect_err(|e| debug!(%book_id, %member_id, error = %e, "return rejected"))?;

        if !member.record_return(book_id) {
            warn!(%book_id, %member_id, "returned book was missing from member's borrowed list");
        }

        info!(
            %book_id,
            %member_id,
            days_borrowed = outcome.days_borrowed,
            overdue_days = outcome.overdue_days,
            "book returned"
        );
        self.events.record(
            EventType::BookReturned,
            Some(now),
            Some(book_id),
            Some(member_id),
            json!({
                "days_borrowed": outcome.days_borrowed,
                "is_overdue": outcome.is_overdue,
                "overdue_days": outcome.overdue_days,
            }),
        );

        if outcome.is_overdue {
            member.add_fine(outcome.fine);

            info!(%member_id, fine = outcome.fine, total = member.total_fines(), "fine assessed");
            self.events.record(
                EventType::FineAssessed,
                Some(now),
                Some(book_id),
                Some(member_id),
                json!({ "fine": outcome.fine, "total_fines": member.total_fines() }),
            );
        }

        Ok(outcome)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Titles with at least one copy on the shelf, by title then id
    pub fn list_available_books(&self) -> Vec<BookSummary> {
        self.sorted_books()
            .into_iter()
            .filter(|book| book.is_available())
            .map(BookSummary::from)
            .collect()
    }

    /// Every title in the catalog, by title then id
    pub fn list_all_books(&self) -> Vec<BookSummary> {
        self.sorted_books()
            .into_iter()
            .map(BookSummary::from)
            .collect()
    }

    /// Every active loan, earliest due first
    pub fn list_issued_books(&self, now: DateTime<Utc>) -> Vec<LoanSummary> {
        let mut issued: Vec<LoanSummary> = self
            .books
            .values()
            .flat_map(|book| book.loans().map(move |record| LoanSummary::new(book, record, now)))
            .collect();

        issued.sort_by(|a, b| {
            a.due_at
                .cmp(&b.due_at)
                .then(a.book_id.cmp(&b.book_id))
                .then(a.member_id.cmp(&b.member_id))
        });

        issued
    }

    /// Member details with each borrowed book resolved through the catalog
    ///
    /// A listed book without a matching loan is reported as
    /// `IntegrityViolation` rather than skipped.
    pub fn get_member_info(&self, member_id: MemberId, now: DateTime<Utc>) -> Result<MemberView> {
        let member = self
            .members
            .get(&member_id)
            .ok_or(LedgerError::MemberNotFound(member_id))?;

        let borrowed = member
            .borrowed()
            .iter()
            .map(|book_id| {
                let Some((book, record)) = self
                    .books
                    .get(book_id)
                    .and_then(|book| book.loan_for(member_id).map(|record| (book, record)))
                else {
                    warn!(%member_id, %book_id, "borrowed book has no matching loan record");
                    return Err(LedgerError::IntegrityViolation(format!(
                        "member {member_id} lists book {book_id} without an active loan"
                    )));
                };

                Ok(BorrowedBook {
                    book_id: *book_id,
                    title: book.title.clone(),
                    loan: record.clone(),
                    status: LoanStatus::of(record, now),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MemberView {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            total_fines: member.total_fines(),
            borrowed,
        })
    }

    /// Catalog-wide totals
    pub fn catalog_stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            titles: self.books.len(),
            members: self.members.len(),
            ..CatalogStats::default()
        };

        for book in self.books.values() {
            stats.total_copies += u64::from(book.total_copies());
            stats.available_copies += u64::from(book.available_copies());
            stats.copies_on_loan += u64::from(book.on_loan());
        }

        for member in self.members.values() {
            if member.borrowed_count() > 0 {
                stats.active_borrowers += 1;
            }
            stats.total_fines += member.total_fines();
        }

        stats
    }

    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.get(&book_id)
    }

    pub fn member(&self, member_id: MemberId) -> Option<&Member> {
        self.members.get(&member_id)
    }

    /// Look up a title by ISBN (surrounding whitespace ignored)
    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.isbn_index
            .get(&normalize_isbn(isbn))
            .and_then(|id| self.books.get(id))
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // ========================================================================
    // AUDIT TRAIL
    // ========================================================================

    pub fn events(&self) -> &[LedgerEvent] {
        self.events.all()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn events_for_book(&self, book_id: BookId) -> Vec<&LedgerEvent> {
        self.events.for_book(book_id)
    }

    pub fn events_for_member(&self, member_id: MemberId) -> Vec<&LedgerEvent> {
        self.events.for_member(member_id)
    }

    // ========================================================================
    // INTEGRITY
    // ========================================================================

    /// Check every cross-entity invariant, reporting the first violation
    pub fn verify_integrity(&self) -> Result<()> {
        let violation = |msg: String| -> Result<()> { Err(LedgerError::IntegrityViolation(msg)) };

        if self.isbn_index.len() != self.books.len() {
            return violation(format!(
                "ISBN index has {} entries for {} books",
                self.isbn_index.len(),
                self.books.len()
            ));
        }

        for (isbn, book_id) in &self.isbn_index {
            match self.books.get(book_id) {
                Some(book) if book.isbn == *isbn => {}
                _ => return violation(format!("ISBN {isbn} does not resolve to book {book_id}")),
            }
        }

        for (book_id, book) in &self.books {
            if book.id != *book_id || book_id.0 >= self.book_ids.peek() {
                return violation(format!("book {book_id} has an inconsistent identifier"));
            }

            let loans = book.loans().count();
            if book.available_copies() as usize + loans != book.total_copies() as usize {
                return violation(format!(
                    "book {book_id}: {} available + {loans} on loan != {} total",
                    book.available_copies(),
                    book.total_copies()
                ));
            }

            for record in book.loans() {
                let Some(member) = self.members.get(&record.member_id) else {
                    return violation(format!(
                        "book {book_id} is on loan to unknown member {}",
                        record.member_id
                    ));
                };
                if !member.has_borrowed(*book_id) {
                    return violation(format!(
                        "member {} holds book {book_id} but does not list it",
                        member.id
                    ));
                }
            }
        }

        for (member_id, member) in &self.members {
            if member.id != *member_id || member_id.0 >= self.member_ids.peek() {
                return violation(format!("member {member_id} has an inconsistent identifier"));
            }

            for (pos, book_id) in member.borrowed().iter().enumerate() {
                if member.borrowed()[..pos].contains(book_id) {
                    return violation(format!("member {member_id} lists book {book_id} twice"));
                }
                let held = self
                    .books
                    .get(book_id)
                    .and_then(|book| book.loan_for(*member_id))
                    .is_some();
                if !held {
                    return violation(format!(
                        "member {member_id} lists book {book_id} without an active loan"
                    ));
                }
            }
        }

        Ok(())
    }

    fn sorted_books(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        books
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
