// 📜 Audit Trail - every successful ledger mutation is an event
//
// Events are append-only. A rejected operation records nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookId, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    BookRegistered,
    CopiesAdded,
    MemberRegistered,
    BookIssued,
    BookReturned,
    FineAssessed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BookRegistered => "book_registered",
            EventType::CopiesAdded => "copies_added",
            EventType::MemberRegistered => "member_registered",
            EventType::BookIssued => "book_issued",
            EventType::BookReturned => "book_returned",
            EventType::FineAssessed => "fine_assessed",
        }
    }
}

/// One entry in the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub event_id: String,
    /// Position in the trail, starting at 1
    pub sequence: u64,
    /// Caller-supplied time for issue/return; registrations carry none
    pub occurred_at: Option<DateTime<Utc>>,
    pub event_type: EventType,
    pub book_id: Option<BookId>,
    pub member_id: Option<MemberId>,
    pub data: serde_json::Value,
}

/// Append-only event store owned by a ledger
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    /// Append an event and return its sequence number
    pub fn record(
        &mut self,
        event_type: EventType,
        occurred_at: Option<DateTime<Utc>>,
        book_id: Option<BookId>,
        member_id: Option<MemberId>,
        data: serde_json::Value,
    ) -> u64 {
        let sequence = self.events.len() as u64 + 1;
        self.events.push(LedgerEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            occurred_at,
            event_type,
            book_id,
            member_id,
            data,
        });

        sequence
    }

    pub fn all(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn for_book(&self, book_id: BookId) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.book_id == Some(book_id))
            .collect()
    }

    pub fn for_member(&self, member_id: MemberId) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.member_id == Some(member_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
