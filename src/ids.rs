// 🔑 Identifiers - numeric identity for books and members
//
// Identity is a number handed out by the ledger that owns it.
// Each ledger carries its own counters, so two ledgers never share state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier of a book title
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u64);

/// Identifier of a registered member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ID ALLOCATOR
// ============================================================================

/// First book identifier handed out by a fresh ledger
pub const FIRST_BOOK_ID: u64 = 1;

/// First member identifier handed out by a fresh ledger
pub const FIRST_MEMBER_ID: u64 = 100;

/// Monotonic identifier source owned by a ledger
///
/// Values are never reused. `peek` lets callers validate before
/// committing, so a rejected registration does not burn an identifier.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn starting_at(first: u64) -> Self {
        IdAllocator { next: first }
    }

    /// Next value that `allocate` will return
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hand out the next identifier
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
