// ⚠️ Ledger errors - every failure is a typed, recoverable result
//
// A failed operation never leaves a partial mutation behind.

use crate::ids::{BookId, MemberId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("number of copies must be positive (got {copies})")]
    InvalidCopyCount { copies: i64 },

    #[error("name and email cannot be empty")]
    InvalidMemberData,

    #[error("book {0} not found")]
    BookNotFound(BookId),

    #[error("member {0} not found")]
    MemberNotFound(MemberId),

    #[error("no copies of book {0} available")]
    NoCopiesAvailable(BookId),

    #[error("member {member_id} already has book {book_id}")]
    AlreadyBorrowed { book_id: BookId, member_id: MemberId },

    #[error("book {book_id} is not issued to member {member_id}")]
    NotBorrowedByMember { book_id: BookId, member_id: MemberId },

    #[error("due date for book {0} is out of range")]
    DueDateOutOfRange(BookId),

    #[error("invalid ledger configuration: {0}")]
    InvalidConfig(String),

    #[error("ledger integrity violated: {0}")]
    IntegrityViolation(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
