//! CLI command handlers. Each command is in its own file.

mod config_path;
mod plan;
mod run;

pub use config_path::run_config_path;
pub use plan::run_plan;
pub use run::run_warm;

use warmcdn_core::plan::DispatchPlan;

/// Shared plan rendering for `plan` and `run --dry-run`.
pub(crate) fn print_plan(plan: &DispatchPlan) {
    if plan.is_empty() {
        println!("Nothing to prefetch.");
        return;
    }
    for (i, batch) in plan.batches.iter().enumerate() {
        println!("batch {} ({} paths):", i + 1, batch.len());
        for path in batch {
            println!("  {path}");
        }
    }
    for path in &plan.singles {
        println!("single: {path}");
    }
    println!(
        "{} batches, {} singles, {} paths total",
        plan.batches.len(),
        plan.singles.len(),
        plan.path_count()
    );
}
