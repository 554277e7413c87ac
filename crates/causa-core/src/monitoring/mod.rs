//! Process-monitoring subsystem.
//!
//! Decides, per tracked case, whether the external case-tracking API may
//! be polled today and whether a returned movement is worth notifying the
//! owner about. The outer daily job (cron/edge, out of scope) iterates
//! cases and drives [`runner::MonitorRunner`]; everything here is either
//! pure or talks to collaborators through traits.

pub mod classifier;
pub mod client;
pub mod cnj;
pub mod gate;
pub mod runner;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A case enrolled in monitoring.
///
/// `last_checked_at` is the only field the monitoring subsystem ever
/// writes, exactly once per poll attempt. A failed API call still counts
/// as "checked" so a broken endpoint is not retried every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedCase {
    pub id: String,
    pub case_number: String,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub owner_id: String,
}

/// Outcome kind of a monitoring log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    /// A poll against the external API completed.
    QueryPerformed,
    /// A notification-worthy movement was found.
    UpdateFound,
    /// The external API call failed.
    ApiError,
}

/// Append-only audit entry: one per poll outcome, plus one per relevant
/// movement found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringLogEntry {
    pub id: String,
    pub case_id: String,
    pub case_number: String,
    pub kind: LogKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub owner_id: String,
}

impl MonitoringLogEntry {
    pub fn new(
        case: &TrackedCase,
        kind: LogKind,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case.id.clone(),
            case_number: case.case_number.clone(),
            kind,
            message: message.into(),
            timestamp,
            owner_id: case.owner_id.clone(),
        }
    }
}

/// A case movement as returned by the external API. Read-only; only
/// classified derivatives are ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMovement {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "data", default)]
    pub date: String,
    #[serde(rename = "tipo", default)]
    pub kind: Option<String>,
    #[serde(rename = "conteudo", default)]
    pub text: Option<String>,
    #[serde(rename = "fonte", default)]
    pub source: Option<String>,
}
