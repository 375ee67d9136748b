//! Append-only record of what the dispatch loop did.

use super::PrefetchResponse;

/// Which unit of the plan a call belonged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchUnit {
    /// `repeat` is 1-based within the batch's repeat count.
    MultiBatch { index: usize, repeat: u32 },
    Single { index: usize },
}

/// Result of one call: an HTTP response (any status) or a local failure.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Delivered { status: u32, body: Vec<u8> },
    Failed { error: String },
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct DispatchEntry {
    pub unit: DispatchUnit,
    pub path_count: usize,
    pub outcome: DispatchOutcome,
}

impl DispatchEntry {
    /// True if the call got a 2xx response.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Delivered { status, .. } if (200..300).contains(&status))
    }
}

/// Everything the scheduler did in one run, in call order.
///
/// A non-2xx status or transport error is data here, not a control-flow
/// failure; callers inspect the report to decide what a run was worth.
#[derive(Debug, Default)]
pub struct DispatchReport {
    entries: Vec<DispatchEntry>,
    aborted: bool,
}

impl DispatchReport {
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Total calls issued.
    pub fn calls(&self) -> usize {
        self.entries.len()
    }

    /// Calls that got a 2xx response.
    pub fn delivered(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    /// Calls that got a non-2xx response or no response at all.
    pub fn failed(&self) -> usize {
        self.calls() - self.delivered()
    }

    /// True if the run was stopped early via the abort token.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub(crate) fn record(
        &mut self,
        unit: DispatchUnit,
        path_count: usize,
        result: Result<PrefetchResponse, super::PrefetchError>,
    ) {
        let outcome = match result {
            Ok(resp) => DispatchOutcome::Delivered {
                status: resp.status,
                body: resp.body,
            },
            Err(e) => DispatchOutcome::Failed {
                error: e.to_string(),
            },
        };
        self.entries.push(DispatchEntry {
            unit,
            path_count,
            outcome,
        });
    }

    pub(crate) fn mark_aborted(&mut self) {
        self.aborted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivered(status: u32) -> DispatchEntry {
        DispatchEntry {
            unit: DispatchUnit::Single { index: 0 },
            path_count: 1,
            outcome: DispatchOutcome::Delivered {
                status,
                body: Vec::new(),
            },
        }
    }

    #[test]
    fn success_is_2xx_only() {
        assert!(delivered(200).is_success());
        assert!(delivered(204).is_success());
        assert!(!delivered(301).is_success());
        assert!(!delivered(404).is_success());
        assert!(!delivered(503).is_success());
    }

    #[test]
    fn counts_split_delivered_and_failed() {
        let mut report = DispatchReport::default();
        report.record(
            DispatchUnit::MultiBatch { index: 0, repeat: 1 },
            3,
            Ok(PrefetchResponse {
                status: 200,
                body: b"ok".to_vec(),
            }),
        );
        report.record(
            DispatchUnit::Single { index: 0 },
            1,
            Ok(PrefetchResponse {
                status: 429,
                body: Vec::new(),
            }),
        );
        assert_eq!(report.calls(), 2);
        assert_eq!(report.delivered(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.aborted());
    }
}
