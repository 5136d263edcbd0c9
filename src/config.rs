use std::env;
use std::time::Duration;

/// Configuration collected once at startup and threaded through explicitly —
/// no global state is required (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub root: String,
    pub terraform_binary: String,
    pub toolchain_timeout: Duration,
    pub issue_timeout: Duration,
    pub report_enabled: bool,
}

impl AuditConfig {
    /// Build config from the environment, letting explicit CLI flags
    /// override the corresponding env var.
    pub fn from_env(root_override: Option<String>, no_report: bool) -> Self {
        let root = root_override
            .or_else(|| env::var("TERRAFORM_ROOT").ok())
            .unwrap_or_else(|| ".".to_string());

        let terraform_binary =
            env::var("TF_AUDIT_BINARY").unwrap_or_else(|_| "terraform".to_string());

        let toolchain_timeout = env::var("TF_AUDIT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let issue_timeout = env::var("TF_AUDIT_ISSUE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Self {
            root,
            terraform_binary,
            toolchain_timeout,
            issue_timeout,
            report_enabled: !no_report,
        }
    }
}

/// Credentials for the issue tracker, read once from the environment.
/// Absent if any required piece is missing — the reporter is then
/// silently disabled (§4.7).
#[derive(Debug, Clone)]
pub struct IssueCredentials {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

impl IssueCredentials {
    pub fn from_env() -> Option<Self> {
        let token = env::var("GITHUB_TOKEN").ok()?;

        let (owner, repo) = if let (Ok(owner), Ok(repo)) = (
            env::var("GITHUB_REPOSITORY_OWNER"),
            env::var("GITHUB_REPOSITORY_NAME"),
        ) {
            (owner, repo)
        } else {
            let full = env::var("GITHUB_REPOSITORY").ok()?;
            let (owner, repo) = full.split_once('/')?;
            (owner.to_string(), repo.to_string())
        };

        Some(Self { token, owner, repo })
    }
}
