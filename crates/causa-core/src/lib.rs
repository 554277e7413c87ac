//! # Causa Core Library
//!
//! Core temporal and decision logic for the Causa law-office suite. The
//! surrounding application (record forms, dashboards, storage, the daily
//! monitoring job) is a thin layer over this library: it supplies holiday
//! calendars, deadline records, and tracked cases, and gets back computed
//! due dates, urgency classifications, and monitoring audit entries.
//!
//! ## Architecture
//!
//! - **Business-Day Calculator**: pure date arithmetic that skips weekends
//!   and forensic holidays
//! - **Deadline Aggregator**: merges explicit deadline records with
//!   per-case derived deadlines into one urgency-classified view
//! - **Eligibility Gate**: once-per-24h polling throttle per tracked case
//! - **Movement Classifier**: keyword relevance and categorization of raw
//!   case-movement text
//! - **Monitor Runner**: the check-claim-poll-log cycle over injected
//!   store, sink, and API collaborators
//!
//! All "now"/"today" values are threaded in explicitly; nothing in this
//! crate reads a clock, which keeps every decision replayable in tests.

pub mod calendar;
pub mod deadline;
pub mod error;
pub mod monitoring;

pub use calendar::business_days;
pub use calendar::{Holiday, HolidayCalendar};
pub use deadline::aggregator::{aggregate, aggregate_raw, AggregatorPolicy, DeadlineOverview};
pub use deadline::{CasePhase, CaseSummary, Deadline, DeadlineSource, DeadlineStatus};
pub use error::{ApiError, CoreError, StoreError};
pub use monitoring::classifier::{MovementCategory, MovementClassifier};
pub use monitoring::client::{MovementSource, TrackingApiClient};
pub use monitoring::gate::{is_due, GatePolicy};
pub use monitoring::runner::{CaseReport, CaseStore, CheckOutcome, LogSink, MonitorRunner};
pub use monitoring::{CaseMovement, LogKind, MonitoringLogEntry, TrackedCase};
