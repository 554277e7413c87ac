//! Per-case monitoring cycle: gate check, claim, poll, classify, log.
//!
//! Cases are independent units of work and may run on parallel workers,
//! but per case the check-claim-poll-writeback sequence must not race
//! another run of the same case. The claim is a compare-and-swap on
//! `last_checked_at` performed *before* the outbound call: two racers
//! cannot both poll, the 24h backoff holds even when the API call fails,
//! and no lock is held on unrelated cases while the call is in flight.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::monitoring::classifier::MovementClassifier;
use crate::monitoring::client::MovementSource;
use crate::monitoring::gate::{self, GatePolicy};
use crate::monitoring::{LogKind, MonitoringLogEntry, TrackedCase};

const MESSAGE_EXCERPT_CHARS: usize = 160;

/// Conditional writes to the tracked-case store. The runner never reads
/// its own writes back; fresh reads belong to the caller.
pub trait CaseStore: Send + Sync {
    /// Compare-and-swap on `last_checked_at`: set it to `now` only if the
    /// stored value still equals `expected`. Returns false when another
    /// worker claimed the case first.
    fn claim_check(
        &self,
        case_id: &str,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Append-only sink for monitoring log entries.
pub trait LogSink: Send + Sync {
    fn append(&self, entry: MonitoringLogEntry) -> Result<(), StoreError>;
}

impl<T: CaseStore + ?Sized> CaseStore for std::sync::Arc<T> {
    fn claim_check(
        &self,
        case_id: &str,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        (**self).claim_check(case_id, expected, now)
    }
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn append(&self, entry: MonitoringLogEntry) -> Result<(), StoreError> {
        (**self).append(entry)
    }
}

/// Result of one monitoring cycle for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Within the polling interval. Normal and silent; no log entry.
    Throttled,
    /// Another worker claimed this case first; no poll, no log entry.
    Lost,
    /// The API call failed. Logged, and the case still counts as checked.
    Failed,
    /// Poll completed; `updates` relevant movements were logged.
    Polled { updates: usize },
}

/// Report for one case within a batch run.
#[derive(Debug)]
pub struct CaseReport {
    pub case_id: String,
    pub outcome: Result<CheckOutcome, StoreError>,
}

/// Drives the monitoring cycle against injected collaborators.
pub struct MonitorRunner<S, C, L> {
    source: S,
    store: C,
    sink: L,
    gate: GatePolicy,
    classifier: MovementClassifier,
}

impl<S, C, L> MonitorRunner<S, C, L>
where
    S: MovementSource,
    C: CaseStore,
    L: LogSink,
{
    /// Create a runner with the default gate and classifier policies.
    pub fn new(source: S, store: C, sink: L) -> Self {
        Self {
            source,
            store,
            sink,
            gate: GatePolicy::default(),
            classifier: MovementClassifier::default(),
        }
    }

    pub fn with_gate_policy(mut self, gate: GatePolicy) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_classifier(mut self, classifier: MovementClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Run one monitoring cycle for one case as of `now`.
    pub fn run_case(
        &self,
        case: &TrackedCase,
        now: DateTime<Utc>,
    ) -> Result<CheckOutcome, StoreError> {
        if !gate::is_due(case, now, &self.gate) {
            return Ok(CheckOutcome::Throttled);
        }

        if !self.store.claim_check(&case.id, case.last_checked_at, now)? {
            return Ok(CheckOutcome::Lost);
        }

        let movements = match self.source.fetch_movements(&case.case_number) {
            Ok(movements) => movements,
            Err(err) => {
                self.sink.append(MonitoringLogEntry::new(
                    case,
                    LogKind::ApiError,
                    format!("Falha na consulta: {err}"),
                    now,
                ))?;
                return Ok(CheckOutcome::Failed);
            }
        };

        self.sink.append(MonitoringLogEntry::new(
            case,
            LogKind::QueryPerformed,
            format!("Consulta realizada: {} movimentações", movements.len()),
            now,
        ))?;

        let mut updates = 0;
        for movement in &movements {
            let text = movement.text.as_deref().unwrap_or("");
            if !self.classifier.is_relevant(text) {
                continue;
            }
            let category = self.classifier.classify(text);
            self.sink.append(MonitoringLogEntry::new(
                case,
                LogKind::UpdateFound,
                format!("{}: {}", category, excerpt(text)),
                now,
            ))?;
            updates += 1;
        }

        Ok(CheckOutcome::Polled { updates })
    }

    /// Run a batch sequentially. A store failure for one case never
    /// aborts the others; each case gets its own report.
    pub fn run_all(&self, cases: &[TrackedCase], now: DateTime<Utc>) -> Vec<CaseReport> {
        cases
            .iter()
            .map(|case| CaseReport {
                case_id: case.id.clone(),
                outcome: self.run_case(case, now),
            })
            .collect()
    }
}

fn excerpt(text: &str) -> String {
    let mut excerpt: String = text.chars().take(MESSAGE_EXCERPT_CHARS).collect();
    if excerpt.len() < text.len() {
        excerpt.push('…');
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::monitoring::CaseMovement;
    use std::sync::Mutex;

    struct FakeSource {
        movements: Result<Vec<CaseMovement>, ()>,
    }

    impl MovementSource for FakeSource {
        fn fetch_movements(&self, _case_number: &str) -> Result<Vec<CaseMovement>, ApiError> {
            match &self.movements {
                Ok(movements) => Ok(movements.clone()),
                Err(()) => Err(ApiError::Status { status: 503 }),
            }
        }
    }

    struct AlwaysClaim;

    impl CaseStore for AlwaysClaim {
        fn claim_check(
            &self,
            _case_id: &str,
            _expected: Option<DateTime<Utc>>,
            _now: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            Ok(true)
        }
    }

    struct NeverClaim;

    impl CaseStore for NeverClaim {
        fn claim_check(
            &self,
            _case_id: &str,
            _expected: Option<DateTime<Utc>>,
            _now: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct MemoryLog {
        entries: Mutex<Vec<MonitoringLogEntry>>,
    }

    impl LogSink for MemoryLog {
        fn append(&self, entry: MonitoringLogEntry) -> Result<(), StoreError> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    fn movement(text: &str) -> CaseMovement {
        CaseMovement {
            id: 1,
            date: "2024-02-12".to_string(),
            kind: None,
            text: Some(text.to_string()),
            source: Some("tribunal".to_string()),
        }
    }

    fn make_case(last_checked_at: Option<DateTime<Utc>>) -> TrackedCase {
        TrackedCase {
            id: "case-1".to_string(),
            case_number: "00012345620248260100".to_string(),
            last_checked_at,
            owner_id: "user-1".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-02-12T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_throttled_case_writes_nothing() {
        let sink = MemoryLog::default();
        let runner = MonitorRunner::new(
            FakeSource { movements: Ok(vec![]) },
            AlwaysClaim,
            sink,
        );

        let case = make_case(Some(now() - chrono::Duration::hours(1)));
        let outcome = runner.run_case(&case, now()).unwrap();

        assert_eq!(outcome, CheckOutcome::Throttled);
        assert!(runner.sink.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_lost_claim_skips_poll() {
        let runner = MonitorRunner::new(
            FakeSource { movements: Ok(vec![movement("sentença")]) },
            NeverClaim,
            MemoryLog::default(),
        );

        let outcome = runner.run_case(&make_case(None), now()).unwrap();
        assert_eq!(outcome, CheckOutcome::Lost);
        assert!(runner.sink.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_successful_poll_logs_query_and_updates() {
        let runner = MonitorRunner::new(
            FakeSource {
                movements: Ok(vec![
                    movement("Sentença proferida"),
                    movement("juntada de petição"),
                    movement("Intimação da parte"),
                ]),
            },
            AlwaysClaim,
            MemoryLog::default(),
        );

        let outcome = runner.run_case(&make_case(None), now()).unwrap();
        assert_eq!(outcome, CheckOutcome::Polled { updates: 2 });

        let entries = runner.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, LogKind::QueryPerformed);
        assert_eq!(entries[1].kind, LogKind::UpdateFound);
        assert!(entries[1].message.starts_with("Sentença:"));
        assert_eq!(entries[2].kind, LogKind::UpdateFound);
        assert!(entries[2].message.starts_with("Intimação:"));
    }

    #[test]
    fn test_api_failure_logs_error_only() {
        let runner = MonitorRunner::new(
            FakeSource { movements: Err(()) },
            AlwaysClaim,
            MemoryLog::default(),
        );

        let outcome = runner.run_case(&make_case(None), now()).unwrap();
        assert_eq!(outcome, CheckOutcome::Failed);

        let entries = runner.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, LogKind::ApiError);
    }

    #[test]
    fn test_movement_without_text_is_ignored() {
        let mut silent = movement("");
        silent.text = None;

        let runner = MonitorRunner::new(
            FakeSource { movements: Ok(vec![silent]) },
            AlwaysClaim,
            MemoryLog::default(),
        );

        let outcome = runner.run_case(&make_case(None), now()).unwrap();
        assert_eq!(outcome, CheckOutcome::Polled { updates: 0 });
    }

    #[test]
    fn test_run_all_isolates_cases() {
        struct FailingStore;
        impl CaseStore for FailingStore {
            fn claim_check(
                &self,
                case_id: &str,
                _expected: Option<DateTime<Utc>>,
                _now: DateTime<Utc>,
            ) -> Result<bool, StoreError> {
                if case_id == "case-1" {
                    Err(StoreError::Unavailable("row locked".to_string()))
                } else {
                    Ok(true)
                }
            }
        }

        let runner = MonitorRunner::new(
            FakeSource { movements: Ok(vec![]) },
            FailingStore,
            MemoryLog::default(),
        );

        let mut other = make_case(None);
        other.id = "case-2".to_string();
        let reports = runner.run_all(&[make_case(None), other], now());

        assert_eq!(reports.len(), 2);
        assert!(reports[0].outcome.is_err());
        assert_eq!(
            *reports[1].outcome.as_ref().unwrap(),
            CheckOutcome::Polled { updates: 0 }
        );
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "a".repeat(500);
        let short = excerpt(&long);
        assert!(short.chars().count() <= MESSAGE_EXCERPT_CHARS + 1);
        assert!(short.ends_with('…'));
    }
}
