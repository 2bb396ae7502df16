use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use std::collections::HashSet;

use crate::domain::models::resource::ResourceKind;

/// A calendar date an administrator has excluded from bookability
/// for one resource kind.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BlockedDate {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(date: NaiveDate, kind: ResourceKind, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            kind,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Read-only snapshot of the blocked calendar a reservation session
/// validates against. Captured at session start and refreshed right
/// before a payment order is created; advisory only, the database is
/// the authority at commit time.
#[derive(Debug, Clone, Default)]
pub struct BlockedDateSet {
    dates: HashSet<NaiveDate>,
}

impl BlockedDateSet {
    pub fn from_rows(rows: &[BlockedDate], kind: ResourceKind) -> Self {
        Self {
            dates: rows.iter().filter(|b| b.kind == kind).map(|b| b.date).collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out: Vec<NaiveDate> = self.dates.iter().copied().collect();
        out.sort();
        out
    }
}
