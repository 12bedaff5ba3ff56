use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the DoE simulation workspace",
    long_about = "A unified CLI for running the demo sweep, tests and CI checks\n\
                  in the design-of-experiments workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the end-to-end demo sweep (generate, execute, export)
    Sweep,
    /// Run the workspace test suites
    Test,
    /// Run CI checks (fmt, clippy, tests, demo)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the demo sweep
    Examples,
    /// Run check + examples
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test doe_core");
    run_cargo(&["test", "-p", "doe_core"]);

    step("Test doe_exec");
    run_cargo(&["test", "-p", "doe_exec"]);
}

fn ci_examples() {
    step("Run doe_sweep demo");
    run_cargo(&["run", "-p", "doe_exec", "--example", "doe_sweep"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep => {
            run_cargo(&["run", "-p", "doe_exec", "--example", "doe_sweep"]);
        }
        Commands::Test => {
            run_cargo(&["test", "--workspace"]);
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
