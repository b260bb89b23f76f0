// Entity Models
//
// Each entity has:
// - Stable numeric identity assigned by the ledger
// - Values that change only through ledger operations

pub mod book;
pub mod member;

pub use book::{Book, LoanRecord, ReturnOutcome};
pub use member::Member;
