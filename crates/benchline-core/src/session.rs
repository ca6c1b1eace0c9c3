//! Observable session state shared by a [`TestRunner`](crate::runner::TestRunner)
//!
//! State lives in a `tokio::sync::watch` channel. Every change replaces the
//! whole result sequence inside `send_modify`, so subscribers never observe a
//! half-applied prepend.

use crate::types::{TestResult, TestSummary};
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of a session at one point in time
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    results: Arc<Vec<TestResult>>,
    in_flight: usize,
    last_error: Option<String>,
}

impl SessionSnapshot {
    /// Results, most recent first
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Most recent result, if any
    pub fn latest(&self) -> Option<&TestResult> {
        self.results.first()
    }

    /// Number of tests currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_running(&self) -> bool {
        self.in_flight > 0
    }

    /// Message of the last collaborator fault, until the log is cleared
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary::from_results(self.results.iter())
    }
}

/// Write side of a session
#[derive(Debug)]
pub(crate) struct Session {
    state: watch::Sender<SessionSnapshot>,
}

impl Session {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { state }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Mark one test as running until the returned guard is dropped
    ///
    /// A new run replaces any standing fault from earlier runs.
    pub(crate) fn begin(&self) -> InFlightGuard<'_> {
        self.state.send_modify(|s| {
            s.in_flight += 1;
            s.last_error = None;
        });
        InFlightGuard { session: self }
    }

    /// Prepend `result`, keeping at most `max_results` entries
    pub(crate) fn record(&self, result: TestResult, fault: Option<&str>, max_results: Option<usize>) {
        self.state.send_modify(|s| {
            let keep = max_results.unwrap_or(usize::MAX);
            let mut results = Vec::with_capacity((s.results.len() + 1).min(keep));
            results.push(result);
            results.extend(s.results.iter().take(keep.saturating_sub(1)).cloned());
            results.truncate(keep);
            s.results = Arc::new(results);

            if let Some(message) = fault {
                s.last_error = Some(message.to_string());
            }
        });
    }

    /// Empty the log and clear the standing error
    pub(crate) fn clear(&self) {
        self.state.send_modify(|s| {
            s.results = Arc::new(Vec::new());
            s.last_error = None;
        });
    }
}

/// Decrements the in-flight count on drop, including when the test future is cancelled
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    session: &'a Session,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session
            .state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}
