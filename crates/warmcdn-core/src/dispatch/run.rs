//! The sequential dispatch loop.
//!
//! All multi-batches (with their repeats) go out before any single path.
//! Repetition is outcome-independent: a batch is re-sent its full repeat
//! count even if every call succeeded or failed. Blocks the current thread
//! between calls; call from `spawn_blocking` if used from async code.

use std::time::{Duration, Instant};

use crate::plan::DispatchPlan;

use super::{AbortToken, DispatchReport, DispatchUnit, PacingConfig, Prefetch};

/// Abort is re-checked at this granularity while pacing.
const PACING_SLICE: Duration = Duration::from_millis(100);

/// Walks the plan, issuing prefetch calls with repetition and pacing.
///
/// Individual call failures are recorded and logged, never fatal: a transient
/// CDN outage degrades this run's warming instead of aborting it. Returns
/// early (with `aborted()` set on the report) once `abort` is raised; the
/// in-flight call always completes and is recorded first.
pub fn run_dispatch<P: Prefetch>(
    plan: &DispatchPlan,
    prefetch: &P,
    pacing: &PacingConfig,
    abort: &AbortToken,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (index, batch) in plan.batches.iter().enumerate() {
        for repeat in 1..=pacing.multi_repeat_count.max(1) {
            if abort.is_set() {
                report.mark_aborted();
                return report;
            }
            issue(
                prefetch,
                batch,
                DispatchUnit::MultiBatch { index, repeat },
                &mut report,
            );
            pace(pacing.multi_delay, abort);
        }
    }

    for (index, path) in plan.singles.iter().enumerate() {
        if abort.is_set() {
            report.mark_aborted();
            return report;
        }
        issue(
            prefetch,
            std::slice::from_ref(path),
            DispatchUnit::Single { index },
            &mut report,
        );
        pace(pacing.single_delay, abort);
    }

    report
}

fn issue<P: Prefetch>(
    prefetch: &P,
    paths: &[String],
    unit: DispatchUnit,
    report: &mut DispatchReport,
) {
    match prefetch.prefetch(paths) {
        Ok(resp) => {
            if resp.is_success() {
                tracing::debug!(?unit, paths = paths.len(), status = resp.status, "prefetched");
            } else {
                tracing::warn!(?unit, paths = paths.len(), status = resp.status, "prefetch rejected");
            }
            report.record(unit, paths.len(), Ok(resp));
        }
        Err(e) => {
            tracing::warn!(?unit, paths = paths.len(), error = %e, "prefetch call failed");
            report.record(unit, paths.len(), Err(e));
        }
    }
}

/// Sleep for `delay` in short slices, waking early if `abort` is raised.
/// The wait is unconditional per call; it runs even after the last one.
fn pace(delay: Duration, abort: &AbortToken) {
    let deadline = Instant::now() + delay;
    loop {
        if abort.is_set() {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep((deadline - now).min(PACING_SLICE));
    }
}
