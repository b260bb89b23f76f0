// 📋 Read models returned by ledger queries
//
// Plain owned snapshots: a caller can hold them after the ledger moves on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Book, LoanRecord};
use crate::ids::{BookId, MemberId};

// ============================================================================
// BOOK SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available_copies: u32,
    pub total_copies: u32,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        BookSummary {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            available_copies: book.available_copies(),
            total_copies: book.total_copies(),
        }
    }
}

impl fmt::Display for BookSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ID: {}] {} by {} ({}/{} available) ISBN {}",
            self.id, self.title, self.author, self.available_copies, self.total_copies, self.isbn
        )
    }
}

// ============================================================================
// LOAN STATUS
// ============================================================================

/// Due-date standing of a loan at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanStatus {
    /// Whole days until due, negative once overdue
    pub days_remaining: i64,
    pub is_overdue: bool,
}

impl LoanStatus {
    pub fn of(record: &LoanRecord, now: DateTime<Utc>) -> Self {
        LoanStatus {
            days_remaining: record.days_remaining(now),
            is_overdue: record.is_overdue_at(now),
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_overdue {
            write!(f, "OVERDUE ({} days)", self.days_remaining.abs())
        } else {
            write!(f, "Due in {} days", self.days_remaining)
        }
    }
}

// ============================================================================
// ISSUED BOOKS
// ============================================================================

/// One active loan, as listed in the issued-books report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub book_id: BookId,
    pub title: String,
    pub member_id: MemberId,
    /// Name captured when the loan was issued
    pub member_name: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub status: LoanStatus,
}

impl LoanSummary {
    pub fn new(book: &Book, record: &LoanRecord, now: DateTime<Utc>) -> Self {
        LoanSummary {
            book_id: book.id,
            title: book.title.clone(),
            member_id: record.member_id,
            member_name: record.member_name.clone(),
            issued_at: record.issued_at,
            due_at: record.due_at,
            status: LoanStatus::of(record, now),
        }
    }
}

impl fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (issued {}, due {}) {}",
            self.title,
            self.member_name,
            self.issued_at.format("%Y-%m-%d"),
            self.due_at.format("%Y-%m-%d"),
            self.status
        )
    }
}

// ============================================================================
// MEMBER VIEW
// ============================================================================

/// A book the member currently holds, resolved through the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedBook {
    pub book_id: BookId,
    pub title: String,
    /// The book's loan record for this member, name snapshot included
    pub loan: LoanRecord,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub total_fines: f64,
    /// In the member's borrow order
    pub borrowed: Vec<BorrowedBook>,
}

impl fmt::Display for MemberView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Member ID    : {}", self.id)?;
        writeln!(f, "Name         : {}", self.name)?;
        writeln!(f, "Email        : {}", self.email)?;
        writeln!(f, "Books Issued : {}", self.borrowed.len())?;
        write!(f, "Total Fines  : ${:.2}", self.total_fines)?;
        for book in &self.borrowed {
            write!(
                f,
                "\n  • {} (Due: {}) - {}",
                book.title,
                book.loan.due_at.format("%Y-%m-%d"),
                book.status
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// CATALOG STATS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub titles: usize,
    pub total_copies: u64,
    pub available_copies: u64,
    pub copies_on_loan: u64,
    pub members: usize,
    /// Members holding at least one book
    pub active_borrowers: usize,
    pub total_fines: f64,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Books: {} | Total Copies: {} | On Loan: {} | Members: {} | Fines: ${:.2}",
            self.titles, self.total_copies, self.copies_on_loan, self.members, self.total_fines
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn issued_book() -> (Book, LoanRecord) {
        let mut book = Book::new(
            BookId(4),
            "Dune".to_string(),
            "Frank Herbert".to_string(),
            "978-0441013593".to_string(),
            2,
        );
        let record = book
            .issue(MemberId(100), "Ada Lovelace", t0(), &LedgerConfig::default())
            .unwrap();
        (book, record)
    }

    #[test]
    fn test_book_summary_from_book() {
        let (book, _) = issued_book();
        let summary = BookSummary::from(&book);
        assert_eq!(summary.available_copies, 1);
        assert_eq!(summary.total_copies, 2);
        assert_eq!(
            summary.to_string(),
            "[ID: 4] Dune by Frank Herbert (1/2 available) ISBN 978-0441013593"
        );
    }

    #[test]
    fn test_loan_status_display() {
        let (_, record) = issued_book();

        let on_time = LoanStatus::of(&record, t0() + Duration::days(4));
        assert_eq!(on_time.to_string(), "Due in 10 days");

        let late = LoanStatus::of(&record, t0() + Duration::days(17));
        assert!(late.is_overdue);
        assert_eq!(late.to_string(), "OVERDUE (3 days)");
    }

    #[test]
    fn test_loan_summary() {
        let (book, record) = issued_book();
        let summary = LoanSummary::new(&book, &record, t0());
        assert_eq!(summary.book_id, BookId(4));
        assert_eq!(summary.member_name, "Ada Lovelace");
        assert_eq!(summary.status.days_remaining, 14);
        assert_eq!(
            summary.to_string(),
            "Dune - Ada Lovelace (issued 2024-03-01, due 2024-03-15) Due in 14 days"
        );
    }

    #[test]
    fn test_member_view_lists_borrowed_books() {
        let (book, record) = issued_book();
        let view = MemberView {
            id: MemberId(100),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            total_fines: 0.0,
            borrowed: vec![BorrowedBook {
                book_id: book.id,
                title: book.title.clone(),
                status: LoanStatus::of(&record, t0() + Duration::days(20)),
                loan: record,
            }],
        };

        let text = view.to_string();
        assert!(text.contains("Books Issued : 1"));
        assert!(text.contains("• Dune (Due: 2024-03-15) - OVERDUE (6 days)"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["borrowed"][0]["loan"]["member_name"], "Ada Lovelace");
    }

    #[test]
    fn test_member_view_serializes() {
        let view = MemberView {
            id: MemberId(100),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            total_fines: 2.5,
            borrowed: Vec::new(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 100);
        assert_eq!(json["total_fines"], 2.5);
        assert!(view.to_string().contains("Total Fines  : $2.50"));
    }
}
