//! One warming run: list, classify, dispatch.
//!
//! Stateless and one-shot; nothing carries over between runs and no CDN
//! response feeds back into classification.

use anyhow::{Context, Result};

use crate::config::WarmerConfig;
use crate::dispatch::{run_dispatch, AbortToken, DispatchReport, PacingConfig, Prefetch};
use crate::plan::{build_plan, DispatchPlan};
use crate::storage::Listing;

/// Builds the dispatch plan for the configured bucket without touching the CDN.
pub fn plan_once<L: Listing>(cfg: &WarmerConfig, listing: &L) -> Result<DispatchPlan> {
    let keys = listing
        .list_keys(&cfg.storage.bucket)
        .with_context(|| format!("listing bucket {} failed", cfg.storage.bucket))?;
    let plan = build_plan(
        &keys,
        &cfg.filter.key_prefix,
        &cfg.extension_list(),
        cfg.filter.multi_prefetch_max_amount,
    );
    tracing::info!(
        keys = keys.len(),
        batches = plan.batches.len(),
        singles = plan.singles.len(),
        "dispatch plan built"
    );
    Ok(plan)
}

/// Runs one full warm: listing failure aborts the run, dispatch call
/// failures live inside the returned report.
pub fn run_once<L: Listing, P: Prefetch>(
    cfg: &WarmerConfig,
    listing: &L,
    prefetch: &P,
    abort: &AbortToken,
) -> Result<DispatchReport> {
    let plan = plan_once(cfg, listing)?;
    let pacing = PacingConfig {
        multi_repeat_count: cfg.pacing.multi_repeat_count,
        multi_delay: cfg.multi_delay(),
        single_delay: cfg.single_delay(),
    };
    Ok(run_dispatch(&plan, prefetch, &pacing, abort))
}
