// 📚 Book Entity - one title's copy inventory and its active loans
//
// Invariant: available_copies = total_copies - loans.len()
// Both fields change together inside a single &mut self call, so no
// caller can observe a decremented count without the matching loan.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::ids::{BookId, MemberId};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days in a span, rounded toward negative infinity
///
/// 13 days 23 hours is 13; minus 1 hour is -1.
pub fn whole_days(span: Duration) -> i64 {
    span.num_seconds().div_euclid(SECONDS_PER_DAY)
}

// ============================================================================
// LOAN RECORD
// ============================================================================

/// One active borrowing of a copy by a member
///
/// `member_name` is the member's name at issue time. It is a historical
/// snapshot and is not refreshed if the member record changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub member_id: MemberId,
    pub member_name: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl LoanRecord {
    /// Overdue means strictly past the due timestamp
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    /// Whole days until due; negative once overdue
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        whole_days(self.due_at - now)
    }
}

// ============================================================================
// RETURN OUTCOME
// ============================================================================

/// What a completed return computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnOutcome {
    pub days_borrowed: i64,
    pub is_overdue: bool,
    pub overdue_days: i64,
    pub fine: f64,
}

// ============================================================================
// BOOK ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Catalog identity, never reused
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
    total_copies: u32,
    available_copies: u32,
    /// Active loans keyed by borrower, at most one per member
    loans: BTreeMap<MemberId, LoanRecord>,
}

impl Book {
    /// Create a catalog entry with every copy on the shelf
    pub fn new(id: BookId, title: String, author: String, isbn: String, copies: u32) -> Self {
        Book {
            id,
            title,
            author,
            isbn,
            total_copies: copies,
            available_copies: copies,
            loans: BTreeMap::new(),
        }
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    /// Copies currently out on loan
    pub fn on_loan(&self) -> u32 {
        self.total_copies - self.available_copies
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Active loan held by a member, if any
    pub fn loan_for(&self, member_id: MemberId) -> Option<&LoanRecord> {
        self.loans.get(&member_id)
    }

    /// Active loans in member id order
    pub fn loans(&self) -> impl Iterator<Item = &LoanRecord> {
        self.loans.values()
    }

    /// Put more copies on the shelf (re-registration of a known ISBN)
    pub fn add_copies(&mut self, copies: u32) -> Result<()> {
        let overflow = || LedgerError::InvalidCopyCount {
            copies: i64::from(copies),
        };
        let total = self.total_copies.checked_add(copies).ok_or_else(overflow)?;
        let available = self.available_copies.checked_add(copies).ok_or_else(overflow)?;

        self.total_copies = total;
        self.available_copies = available;
        Ok(())
    }

    /// Lend one copy to a member
    ///
    /// Fails with `NoCopiesAvailable` when the shelf is empty, regardless of
    /// who asks, and with `AlreadyBorrowed` when the member already holds a
    /// copy of this title. A due date past the end of representable time is
    /// `DueDateOutOfRange`; nothing is changed on any error.
    pub fn issue(
        &mut self,
        member_id: MemberId,
        member_name: &str,
        now: DateTime<Utc>,
        config: &LedgerConfig,
    ) -> Result<LoanRecord> {
        if !self.is_available() {
            return Err(LedgerError::NoCopiesAvailable(self.id));
        }

        if self.loans.contains_key(&member_id) {
            return Err(LedgerError::AlreadyBorrowed {
                book_id: self.id,
                member_id,
            });
        }

        let due_at = config
            .loan_period()
            .and_then(|period| now.checked_add_signed(period))
            .ok_or(LedgerError::DueDateOutOfRange(self.id))?;

        let record = LoanRecord {
            member_id,
            member_name: member_name.to_string(),
            issued_at: now,
            due_at,
        };

        self.loans.insert(member_id, record.clone());
        self.available_copies -= 1;

        Ok(record)
    }

    /// Take back the copy a member holds and settle the loan
    pub fn return_copy(
        &mut self,
        member_id: MemberId,
        now: DateTime<Utc>,
        config: &LedgerConfig,
    ) -> Result<ReturnOutcome> {
        let record = self
            .loans
            .remove(&member_id)
            .ok_or(LedgerError::NotBorrowedByMember {
                book_id: self.id,
                member_id,
            })?;
        self.available_copies += 1;

        let is_overdue = record.is_overdue_at(now);
        let overdue_days = if is_overdue {
            whole_days(now - record.due_at)
        } else {
            0
        };

        Ok(ReturnOutcome {
            days_borrowed: whole_days(now - record.issued_at),
            is_overdue,
            overdue_days,
            fine: config.fine_for(overdue_days),
        })
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ID: {}] {} by {} ({}/{} available)",
            self.id, self.title, self.author, self.available_copies, self.total_copies
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
