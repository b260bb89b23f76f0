// Lending Ledger - Core Library
// Catalog, members and the issue/return workflow of a lending library.
// Presentation and storage belong to the caller; every time input is explicit.

pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod ledger;
pub mod normalize;
pub mod shared;
pub mod views;

// Re-export commonly used types
pub use config::{LedgerConfig, DEFAULT_DAILY_FINE_RATE, DEFAULT_LOAN_PERIOD_DAYS};
pub use entities::{Book, LoanRecord, Member, ReturnOutcome};
pub use error::{LedgerError, Result};
pub use events::{EventType, LedgerEvent};
pub use ids::{BookId, MemberId};
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use views::{BookSummary, BorrowedBook, CatalogStats, LoanStatus, LoanSummary, MemberView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
