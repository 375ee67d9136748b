//! `warmcdn plan` – list the bucket and print the dispatch plan.

use anyhow::Result;
use warmcdn_core::config::WarmerConfig;
use warmcdn_core::run::plan_once;
use warmcdn_core::storage::ListingClient;

use super::print_plan;

pub async fn run_plan(cfg: &WarmerConfig) -> Result<()> {
    let cfg = cfg.clone();
    let plan = tokio::task::spawn_blocking(move || {
        let listing = ListingClient::new(&cfg.storage);
        plan_once(&cfg, &listing)
    })
    .await??;
    print_plan(&plan);
    Ok(())
}
