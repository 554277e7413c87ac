//! Unified pending-deadline view.
//!
//! Merges two heterogeneous sources of "dates requiring action":
//! - explicit [`Deadline`] records, and
//! - one synthetic deadline per case whose `next_deadline` field is set.
//!
//! The result is a de-duplicated, urgency-classified snapshot for the UI
//! layer. Everything here is pure: `today` is threaded in by the caller,
//! never read from a clock.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{business_days, HolidayCalendar};
use crate::deadline::{CasePhase, CaseSummary, Deadline, DeadlineSource, DeadlineStatus};

/// Urgency policy, injected so threshold changes don't touch the algorithm.
#[derive(Debug, Clone)]
pub struct AggregatorPolicy {
    /// A pending deadline is urgent when the business days between today
    /// and its due date fall within `[0, urgency_window]`.
    pub urgency_window: i64,
}

impl Default for AggregatorPolicy {
    fn default() -> Self {
        Self { urgency_window: 2 }
    }
}

/// Aggregated snapshot of deadlines requiring attention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlineOverview {
    /// All deadlines in view, explicit and synthetic.
    pub total_count: usize,
    /// Deadlines still in `Pending` status.
    pub pending_count: usize,
    /// Pending deadlines due within the urgency window.
    pub urgent_count: usize,
    /// The urgent deadlines themselves. No ordering guarantee beyond
    /// every due date being `>= today`.
    pub urgent: Vec<Deadline>,
    /// Records excluded because their dates failed to parse.
    pub skipped_count: usize,
}

/// Merge explicit deadlines with per-case synthetic ones and classify
/// urgency as of `today`.
pub fn aggregate(
    explicit: &[Deadline],
    cases: &[CaseSummary],
    today: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &AggregatorPolicy,
) -> DeadlineOverview {
    let mut merged: Vec<Deadline> = explicit.to_vec();

    // De-duplication: an explicit deadline already covering a case's date
    // suppresses the synthetic one, so the same obligation is never
    // counted twice. Key is (case_id, due_date).
    let covered: HashSet<(&str, NaiveDate)> = explicit
        .iter()
        .map(|d| (d.case_id.as_str(), d.due_date))
        .collect();
    merged.extend(
        cases
            .iter()
            .filter_map(|case| synthesize(case, today, calendar))
            .filter(|synthetic| {
                !covered.contains(&(synthetic.case_id.as_str(), synthetic.due_date))
            }),
    );

    let pending_count = merged.iter().filter(|d| d.is_pending()).count();
    let urgent: Vec<Deadline> = merged
        .iter()
        .filter(|d| is_urgent(d, today, calendar, policy))
        .cloned()
        .collect();

    DeadlineOverview {
        total_count: merged.len(),
        pending_count,
        urgent_count: urgent.len(),
        urgent,
        skipped_count: 0,
    }
}

/// One synthetic pending deadline per non-terminal case with an upcoming
/// `next_deadline`. Dates strictly before `today` are dropped from the
/// view entirely rather than surfaced as overdue.
fn synthesize(case: &CaseSummary, today: NaiveDate, calendar: &HolidayCalendar) -> Option<Deadline> {
    if case.phase.is_terminal() {
        return None;
    }
    let due_date = case.next_deadline?;
    if due_date < today {
        return None;
    }

    Some(Deadline {
        id: uuid::Uuid::new_v4().to_string(),
        case_id: case.id.clone(),
        title: format!("Próximo prazo: {}", case.title),
        description: None,
        start_date: today,
        due_date,
        business_day_count: business_days::between(today, due_date, calendar),
        status: DeadlineStatus::Pending,
        owner_id: case.owner_id.clone(),
        source: DeadlineSource::DerivedFromCase {
            case_id: case.id.clone(),
        },
    })
}

fn is_urgent(
    deadline: &Deadline,
    today: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &AggregatorPolicy,
) -> bool {
    deadline.is_pending()
        && deadline.due_date >= today
        && business_days::between(today, deadline.due_date, calendar) <= policy.urgency_window
}

/// Raw deadline row as it arrives from the persistence collaborator,
/// dates still in string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDeadlineRecord {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: String,
    pub due_date: String,
    pub business_day_count: i64,
    pub status: DeadlineStatus,
    pub owner_id: String,
}

/// Raw case row, dates still in string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCaseRecord {
    pub id: String,
    pub title: String,
    pub next_deadline: Option<String>,
    pub phase: CasePhase,
    pub owner_id: String,
}

/// [`aggregate`] over raw rows. A record with an unparsable date is
/// excluded and counted in `skipped_count`; it never aborts the batch.
pub fn aggregate_raw(
    explicit: &[RawDeadlineRecord],
    cases: &[RawCaseRecord],
    today: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &AggregatorPolicy,
) -> DeadlineOverview {
    let mut skipped = 0;

    let parsed_deadlines: Vec<Deadline> = explicit
        .iter()
        .filter_map(|raw| match (parse_date(&raw.start_date), parse_date(&raw.due_date)) {
            (Some(start_date), Some(due_date)) => Some(Deadline {
                id: raw.id.clone(),
                case_id: raw.case_id.clone(),
                title: raw.title.clone(),
                description: raw.description.clone(),
                start_date,
                due_date,
                business_day_count: raw.business_day_count,
                status: raw.status,
                owner_id: raw.owner_id.clone(),
                source: DeadlineSource::Explicit,
            }),
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();

    let parsed_cases: Vec<CaseSummary> = cases
        .iter()
        .filter_map(|raw| {
            let next_deadline = match &raw.next_deadline {
                None => None,
                Some(s) => match parse_date(s) {
                    Some(d) => Some(d),
                    None => {
                        skipped += 1;
                        return None;
                    }
                },
            };
            Some(CaseSummary {
                id: raw.id.clone(),
                title: raw.title.clone(),
                next_deadline,
                phase: raw.phase,
                owner_id: raw.owner_id.clone(),
            })
        })
        .collect();

    let mut overview = aggregate(&parsed_deadlines, &parsed_cases, today, calendar, policy);
    overview.skipped_count = skipped;
    overview
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
