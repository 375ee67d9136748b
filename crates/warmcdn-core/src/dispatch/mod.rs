//! Rate-limited dispatch of the plan against the CDN prefetch API.
//!
//! Strictly sequential: one prefetch call in flight at a time, with a pacing
//! delay after every call. The pacing is the throttling mechanism; do not
//! promote this to concurrent dispatch.

mod report;
mod run;

pub use report::{DispatchEntry, DispatchOutcome, DispatchReport, DispatchUnit};
pub use run::run_dispatch;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One call to the CDN prefetch API, however many paths it names.
///
/// Any HTTP response, 2xx or not, comes back as a [`PrefetchResponse`];
/// [`PrefetchError`] is reserved for failures with no response at all.
pub trait Prefetch {
    fn prefetch(&self, paths: &[String]) -> Result<PrefetchResponse, PrefetchError>;
}

/// Status and raw body of one prefetch call.
#[derive(Debug, Clone)]
pub struct PrefetchResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl PrefetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Local failure of a prefetch call (no HTTP response received).
#[derive(Debug, thiserror::Error)]
pub enum PrefetchError {
    /// libcurl failure: DNS, connect, timeout, TLS.
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// Request body could not be serialized.
    #[error("request encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Repetition and pacing parameters for one dispatch run.
#[derive(Debug, Clone, Copy)]
pub struct PacingConfig {
    /// Calls issued per multi-batch (>= 1), outcome-independent.
    pub multi_repeat_count: u32,
    /// Delay after every multi-batch call, including the last.
    pub multi_delay: Duration,
    /// Delay after every single-path call.
    pub single_delay: Duration,
}

/// Cooperative stop signal for the dispatch loop.
///
/// Setting the token stops the scheduler before its next call; the call
/// already in flight is allowed to finish and be recorded.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
