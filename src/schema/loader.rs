//! Schema Loader (C3, §4.3).

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::model::SchemaCatalog;

/// Invoke the toolchain's `init` then `providers schema -json` in `dir`,
/// bounded by `cfg.toolchain_timeout`, and decode the catalog.
pub async fn load_schema(cfg: &AuditConfig, dir: &Path) -> Result<SchemaCatalog, AuditError> {
    run_toolchain(cfg, dir, &["init", "-no-color"]).await?;
    let stdout = run_toolchain(cfg, dir, &["providers", "schema", "-json"]).await?;

    serde_json::from_str(&stdout).map_err(|e| AuditError::SchemaDecode {
        dir: dir.to_path_buf(),
        message: e.to_string(),
    })
}

/// Run one toolchain command and return its captured stdout, with a
/// single wall-clock deadline over the whole invocation.
async fn run_toolchain(cfg: &AuditConfig, dir: &Path, args: &[&str]) -> Result<String, AuditError> {
    let result = tokio::time::timeout(cfg.toolchain_timeout, run(cfg, dir, args)).await;

    match result {
        Ok(inner) => inner,
        Err(_) => Err(AuditError::Toolchain {
            binary: cfg.terraform_binary.clone(),
            args: args.join(" "),
            dir: dir.to_path_buf(),
            exit_code: -1,
            output: format!("timed out after {:?}", cfg.toolchain_timeout),
        }),
    }
}

async fn run(cfg: &AuditConfig, dir: &Path, args: &[&str]) -> Result<String, AuditError> {
    tracing::info!(binary = %cfg.terraform_binary, ?args, dir = %dir.display(), "running toolchain");

    let spawn = || -> Result<tokio::process::Child, AuditError> {
        Command::new(&cfg.terraform_binary)
            .args(args)
            .current_dir(dir)
            .env("TF_IN_AUTOMATION", "1")
            .env("TF_INPUT", "0")
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| AuditError::Toolchain {
                binary: cfg.terraform_binary.clone(),
                args: args.join(" "),
                dir: dir.to_path_buf(),
                exit_code: -1,
                output: e.to_string(),
            })
    };

    let mut child = spawn()?;

    let stdout = child.stdout.take().expect("piped stdout");
    let stderr = child.stderr.take().expect("piped stderr");

    let stdout_handle = tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut reader = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            tracing::debug!(stream = "stdout", "{}", line);
            lines.push(line);
        }
        lines
    });
    let stderr_handle = tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut reader = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            tracing::debug!(stream = "stderr", "{}", line);
            lines.push(line);
        }
        lines
    });

    let stdout_lines = stdout_handle.await.unwrap_or_default();
    let stderr_lines = stderr_handle.await.unwrap_or_default();

    let status = child.wait().await.map_err(|e| AuditError::Toolchain {
        binary: cfg.terraform_binary.clone(),
        args: args.join(" "),
        dir: dir.to_path_buf(),
        exit_code: -1,
        output: e.to_string(),
    })?;

    tracing::info!(exit_code = status.code(), "toolchain command completed");

    if !status.success() {
        return Err(AuditError::Toolchain {
            binary: cfg.terraform_binary.clone(),
            args: args.join(" "),
            dir: dir.to_path_buf(),
            exit_code: status.code().unwrap_or(-1),
            output: stderr_lines.join("\n"),
        });
    }

    Ok(stdout_lines.join("\n"))
}
