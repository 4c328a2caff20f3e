//! Realtime change feed types.
//!
//! The backend publishes insert/update/delete events per table; clients
//! subscribe with a table plus optional row filter and fold the events
//! into their local lists. Delivery is at-least-once and unordered; the
//! only reconciliation is last-write-wins replacement by row id, and a
//! mutation racing its own echo is resolved by the next authoritative
//! fetch.

use serde::{Deserialize, Serialize};

use super::types::{CompletionRow, HabitRow, RemoteError, Table};

/// A single row change, with the payload shape used by the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<R> {
    Insert(R),
    Update(R),
    Delete { id: String },
}

/// A change event on one of the replicated tables.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Habit(Change<HabitRow>),
    Completion(Change<CompletionRow>),
}

impl ChangeEvent {
    /// Parse a raw feed payload for `table`.
    ///
    /// Payloads carry `{"eventType": "INSERT"|"UPDATE"|"DELETE",
    /// "new": {...}, "old": {"id": ...}}`; anything else is an error.
    pub fn parse(table: Table, payload: &serde_json::Value) -> Result<Self, RemoteError> {
        let event_type = payload["eventType"].as_str().ok_or_else(|| {
            RemoteError::UnexpectedResponse("change payload missing eventType".to_string())
        })?;

        match event_type {
            "INSERT" | "UPDATE" => {
                let new = payload["new"].clone();
                match table {
                    Table::Habits => {
                        let row: HabitRow = serde_json::from_value(new)?;
                        Ok(ChangeEvent::Habit(if event_type == "INSERT" {
                            Change::Insert(row)
                        } else {
                            Change::Update(row)
                        }))
                    }
                    Table::Completions => {
                        let row: CompletionRow = serde_json::from_value(new)?;
                        Ok(ChangeEvent::Completion(if event_type == "INSERT" {
                            Change::Insert(row)
                        } else {
                            Change::Update(row)
                        }))
                    }
                }
            }
            "DELETE" => {
                let id = payload["old"]["id"].as_str().ok_or_else(|| {
                    RemoteError::UnexpectedResponse("delete payload missing old.id".to_string())
                })?;
                Ok(match table {
                    Table::Habits => ChangeEvent::Habit(Change::Delete { id: id.to_string() }),
                    Table::Completions => {
                        ChangeEvent::Completion(Change::Delete { id: id.to_string() })
                    }
                })
            }
            other => Err(RemoteError::UnexpectedResponse(format!(
                "unknown change eventType: {other}"
            ))),
        }
    }

    /// Table the event belongs to.
    pub fn table(&self) -> Table {
        match self {
            ChangeEvent::Habit(_) => Table::Habits,
            ChangeEvent::Completion(_) => Table::Completions,
        }
    }
}

/// Server-side row filter for a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowFilter {
    /// `user_id = eq.<id>`
    UserIdEq(String),
}

impl RowFilter {
    /// Render as the feed's filter expression.
    pub fn expression(&self) -> String {
        match self {
            RowFilter::UserIdEq(id) => format!("user_id=eq.{id}"),
        }
    }
}

/// Description of one change-feed subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub table: Table,
    pub filter: Option<RowFilter>,
}

impl Subscription {
    /// The per-user feed pair: habits filtered by owner, completions
    /// unfiltered (ownership is checked client-side against known habits).
    pub fn for_user(user_id: &str) -> Vec<Subscription> {
        vec![
            Subscription {
                table: Table::Habits,
                filter: Some(RowFilter::UserIdEq(user_id.to_string())),
            },
            Subscription {
                table: Table::Completions,
                filter: None,
            },
        ]
    }
}
