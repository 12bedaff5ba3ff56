//! End-to-end demo: define factors, generate a design, execute it against a
//! stub engine and export the results.
//!
//! Run with: cargo run --example doe_sweep

use std::error::Error;

use doe_core::{generate, Design, Factor, FactorCatalog};
use doe_exec::{
    export_ledger_csv, export_plan_long_csv, export_plan_wide_csv, import_model, EngineKind,
    ExecutionOptions, ExecutionOrchestrator, StubAdapter,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let workspace = std::env::temp_dir().join("doe_sweep_demo");
    std::fs::create_dir_all(&workspace)?;

    // A placeholder model file standing in for a real AutoSched export.
    let model_dir = workspace.join("source_model");
    std::fs::create_dir_all(&model_dir)?;
    let model_file = model_dir.join("factory.xmdx");
    std::fs::write(&model_file, b"demo model")?;

    // Import copies the model into its sandbox; the source stays untouched.
    let model = import_model(&model_file, &workspace, EngineKind::AutoSchedAp)?;
    println!(
        "imported {} model into sandbox {}",
        model.engine,
        model.sandbox_dir.display()
    );

    // Two factor sources merged into one catalog.
    let catalog = FactorCatalog::from_sources([
        vec![Factor::numeric("lots", 10.0, 40.0, 10.0)?],
        vec![Factor::categorical("dispatch_rule", ["fifo", "critical_ratio"])?],
    ])?;

    // 4 lot counts x 2 dispatch rules = 8 configurations.
    let plan = generate(&catalog, &Design::FullFactorial, 42)?;
    println!("generated plan '{}' with {} runs", plan.label(), plan.run_count());

    // Drive the plan through a stub adapter on a small worker pool.
    let options = ExecutionOptions::new(workspace.join("runs"))
        .worker_threads(Some(2))
        .show_progress(true);
    let adapter = StubAdapter::failing_on([5]);
    let ledger =
        ExecutionOrchestrator::new(options).execute_with_adapter(&adapter, &model, &plan)?;
    println!(
        "batch finished: {} succeeded, {} failed",
        ledger.succeeded_count(),
        ledger.failed_count()
    );

    export_plan_wide_csv(&plan, workspace.join("plan_wide.csv"))?;
    export_plan_long_csv(&plan, workspace.join("plan_long.csv"))?;
    export_ledger_csv(&plan, &ledger, workspace.join("ledger.csv"))?;
    println!("exports written to {}", workspace.display());

    Ok(())
}
