//! Task data structure.
//!
//! This module defines the core `Task` struct that represents a single work item
//! with its schedule, ownership, timing, and freeform annotation lists.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// A single unit of trackable work.
///
/// Tasks are created only through [`Registry::add`](crate::registry::Registry::add),
/// which assigns the id and the start timestamp. The three annotation lists are
/// append-only and keep insertion order.
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique, assigned by the registry, never reused.
    pub id: u64,
    pub description: String,
    pub is_completed: bool,
    pub due: NaiveDate,
    /// Conventionally 1 = low, 2 = medium, 3 = high.
    pub priority: u8,
    pub platform: String,
    pub assignee: String,
    /// Free-text label, e.g. "open" or "in-review".
    pub status: String,
    /// Set at creation.
    pub start_time: DateTime<Utc>,
    /// Set on completion.
    pub end_time: Option<DateTime<Utc>>,
    /// `end_time - start_time`; meaningful only once completed.
    pub total_time_spent: Option<Duration>,
    pub attachments: Vec<String>,
    pub comments: Vec<String>,
    pub test_cases: Vec<String>,
}
