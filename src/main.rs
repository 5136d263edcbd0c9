use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tf_audit::config::{AuditConfig, IssueCredentials};
use tf_audit::issue::IssueReporter;
use tf_audit::orchestrator::{self, RootAuditResult};
use tf_audit::report;

/// tf-audit - schema-diff audit for a Terraform/OpenTofu module tree
#[derive(Parser)]
#[command(name = "tf-audit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit the module tree for attributes and blocks the schema declares
    /// but the configuration never sets (the default when no subcommand is given)
    Run {
        /// Path to the module root under audit (defaults to TERRAFORM_ROOT or ".")
        root: Option<String>,

        /// Don't report findings as a tracker issue, even if credentials are present
        #[arg(long)]
        no_report: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let (root, no_report) = match cli.command {
        Some(Commands::Run { root, no_report }) => (root, no_report),
        None => (None, false),
    };

    let cfg = AuditConfig::from_env(root, no_report);

    match run(&cfg).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

async fn run(cfg: &AuditConfig) -> anyhow::Result<ExitCode> {
    let RootAuditResult {
        findings,
        submodule_failures,
    } = orchestrator::audit_root(cfg).await?;

    for (name, err) in &submodule_failures {
        tracing::warn!(submodule = %name, error = %err, "submodule audit failed, continuing");
    }

    if findings.is_empty() {
        println!("{}", "No missing attributes or blocks found.".green());
        return Ok(ExitCode::SUCCESS);
    }

    let formatted = report::format_all(&findings);
    println!("{formatted}");

    if cfg.report_enabled {
        if let Some(creds) = IssueCredentials::from_env() {
            let reporter = IssueReporter::new(cfg, creds);
            reporter.report(&formatted).await;
        }
    }

    Ok(ExitCode::from(1))
}
