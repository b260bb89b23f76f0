// 👤 Member Entity - identity, borrowed titles and accumulated fines
//
// The ledger keeps `borrowed` in lockstep with the loan records held by
// each book; this type only stores what it is told.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{BookId, MemberId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Stable identity, never reused
    pub id: MemberId,
    pub name: String,
    /// Lower-case, never empty
    pub email: String,
    /// Borrowed titles in borrow order
    borrowed: Vec<BookId>,
    /// Cumulative fines, never reduced by the ledger
    total_fines: f64,
}

impl Member {
    pub fn new(id: MemberId, name: String, email: String) -> Self {
        Member {
            id,
            name,
            email,
            borrowed: Vec::new(),
            total_fines: 0.0,
        }
    }

    pub fn borrowed(&self) -> &[BookId] {
        &self.borrowed
    }

    pub fn borrowed_count(&self) -> usize {
        self.borrowed.len()
    }

    pub fn has_borrowed(&self, book_id: BookId) -> bool {
        self.borrowed.contains(&book_id)
    }

    pub fn total_fines(&self) -> f64 {
        self.total_fines
    }

    /// Note a new loan. No duplicate check: the ledger only calls this
    /// after the book accepted the loan.
    pub fn record_borrow(&mut self, book_id: BookId) {
        self.borrowed.push(book_id);
    }

    /// Drop the first matching entry; false if the book was not listed
    pub fn record_return(&mut self, book_id: BookId) -> bool {
        match self.borrowed.iter().position(|id| *id == book_id) {
            Some(pos) => {
                self.borrowed.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Add to the fine total. `amount` must be non-negative; not checked here.
    pub fn add_fine(&mut self, amount: f64) {
        self.total_fines += amount;
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ID: {}] {} ({}) - Books: {}",
            self.id,
            self.name,
            self.email,
            self.borrowed.len()
        )
    }
}
