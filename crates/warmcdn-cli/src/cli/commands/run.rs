//! `warmcdn run` – one warming pass against the bucket and CDN.

use anyhow::Result;
use warmcdn_core::cdn::CdnClient;
use warmcdn_core::config::WarmerConfig;
use warmcdn_core::dispatch::AbortToken;
use warmcdn_core::run::{plan_once, run_once};
use warmcdn_core::storage::ListingClient;

use super::print_plan;

pub async fn run_warm(cfg: &WarmerConfig, dry_run: bool) -> Result<()> {
    if dry_run {
        let cfg = cfg.clone();
        let plan = tokio::task::spawn_blocking(move || {
            let listing = ListingClient::new(&cfg.storage);
            plan_once(&cfg, &listing)
        })
        .await??;
        print_plan(&plan);
        return Ok(());
    }

    let cdn = CdnClient::new(&cfg.cdn)?;
    let abort = AbortToken::new();

    // Ctrl-C requests a graceful stop: the in-flight call finishes, the
    // partial report is still printed.
    let signal_token = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, stopping after the current call");
            signal_token.set();
        }
    });

    // The dispatch loop blocks between calls; keep it off the async runtime.
    let cfg = cfg.clone();
    let report = tokio::task::spawn_blocking(move || {
        let listing = ListingClient::new(&cfg.storage);
        run_once(&cfg, &listing, &cdn, &abort)
    })
    .await??;

    println!(
        "{} calls: {} delivered, {} failed{}",
        report.calls(),
        report.delivered(),
        report.failed(),
        if report.aborted() { " (aborted)" } else { "" }
    );
    if report.failed() > 0 {
        tracing::warn!(
            failed = report.failed(),
            "some prefetch calls did not succeed; see log for statuses"
        );
    }
    Ok(())
}
