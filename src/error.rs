use std::path::PathBuf;

use thiserror::Error;

/// The distinguishable error kinds the orchestrator matches on to decide
/// fatal-for-directory vs. fatal-for-run. Everything else flows through
/// `anyhow::Result` with added `.context(..)`.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("`{binary} {args}` failed in {dir} (exit {exit_code}): {output}")]
    Toolchain {
        binary: String,
        args: String,
        dir: PathBuf,
        exit_code: i32,
        output: String,
    },

    #[error("could not decode provider schema JSON for {dir}: {message}")]
    SchemaDecode { dir: PathBuf, message: String },
}
