//! Legal deadlines and the case records they are derived from.
//!
//! A deadline exists in two forms behind one type: an `Explicit` record
//! created by a user action and persisted, or a `DerivedFromCase` record
//! materialized fresh on every read from the single "next deadline" field
//! of a case. The aggregator treats both uniformly through the
//! [`DeadlineSource`] tag, so new sources can be added without branching.

pub mod aggregator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{business_days, HolidayCalendar};
use crate::error::{CoreError, Result};

/// Lifecycle status of a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineStatus {
    Pending,
    Done,
    Overdue,
    Cancelled,
}

/// Where a deadline came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeadlineSource {
    /// Persisted record created by a user action.
    Explicit,
    /// Synthesized from a case's "next deadline" field; never persisted,
    /// read-only from this crate's viewpoint.
    DerivedFromCase { case_id: String },
}

/// A deadline requiring action by a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Business-day count the due date was derived from. Advisory only
    /// once `due_date` has been edited independently.
    pub business_day_count: i64,
    pub status: DeadlineStatus,
    pub owner_id: String,
    pub source: DeadlineSource,
}

impl Deadline {
    /// Create an explicit deadline, deriving `due_date` from the calculator.
    ///
    /// The calculator is the single source of truth for this derivation at
    /// creation time; use [`Deadline::with_due_date`] for the later manual
    /// override path.
    pub fn new_explicit(
        case_id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDate,
        business_day_count: i64,
        owner_id: impl Into<String>,
        calendar: &HolidayCalendar,
    ) -> Result<Self> {
        let due_date = business_days::advance(start_date, business_day_count, calendar)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.into(),
            title: title.into(),
            description: None,
            start_date,
            due_date,
            business_day_count,
            status: DeadlineStatus::Pending,
            owner_id: owner_id.into(),
            source: DeadlineSource::Explicit,
        })
    }

    /// Override the derived due date. `business_day_count` becomes advisory.
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Transition out of `Pending`. The only legal mutations of a persisted
    /// deadline are Pending -> Done/Overdue/Cancelled.
    pub fn transition(&mut self, next: DeadlineStatus) -> Result<()> {
        if self.status != DeadlineStatus::Pending || next == DeadlineStatus::Pending {
            return Err(CoreError::InvalidArgument {
                field: "status",
                message: format!("illegal transition {:?} -> {:?}", self.status, next),
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeadlineStatus::Pending
    }
}

/// Procedural phase of a case, as far as deadline synthesis cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasePhase {
    Active,
    Suspended,
    Archived,
    Closed,
}

impl CasePhase {
    /// Terminal phases never yield synthetic deadlines.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CasePhase::Archived | CasePhase::Closed)
    }
}

/// The slice of a case record the aggregator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: String,
    pub title: String,
    pub next_deadline: Option<NaiveDate>,
    pub phase: CasePhase,
    pub owner_id: String,
}
