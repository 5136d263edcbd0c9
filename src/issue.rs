//! Issue Reporter (C7, §4.7).

use serde::{Deserialize, Serialize};

use crate::config::{AuditConfig, IssueCredentials};

const ISSUE_TITLE: &str = "Generated schema validation";
const HEADER: &str = "### \n\n";

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
    title: String,
    body: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct PatchIssueRequest<'a> {
    body: &'a str,
}

pub struct IssueReporter {
    client: reqwest::Client,
    creds: IssueCredentials,
}

impl IssueReporter {
    pub fn new(cfg: &AuditConfig, creds: IssueCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(cfg.issue_timeout)
            .build()
            .expect("reqwest client");
        Self { client, creds }
    }

    /// Open or update the generated-schema-validation issue with the given
    /// formatted findings body (§4.7). Failures are logged, never fatal.
    pub async fn report(&self, formatted_findings: &str) {
        match self.find_existing_issue().await {
            Ok(Some(issue)) => {
                let body = merge_body(issue.body.as_deref().unwrap_or(""), formatted_findings);
                if let Err(e) = self.patch_issue(issue.number, &body).await {
                    tracing::warn!(error = %e, "failed to update existing issue");
                }
            }
            Ok(None) => {
                let body = format!("{HEADER}{formatted_findings}");
                if let Err(e) = self.create_issue(&body).await {
                    tracing::warn!(error = %e, "failed to create issue");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to list existing issues");
            }
        }
    }

    async fn find_existing_issue(&self) -> anyhow::Result<Option<Issue>> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/issues?state=open",
            self.creds.owner, self.creds.repo
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.creds.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "tf-audit")
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("listing issues returned {}", response.status());
        }

        let issues: Vec<Issue> = response.json().await?;
        Ok(issues.into_iter().find(|i| i.title == ISSUE_TITLE))
    }

    async fn patch_issue(&self, number: u64, body: &str) -> anyhow::Result<()> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/issues/{}",
            self.creds.owner, self.creds.repo, number
        );

        let response = self
            .client
            .patch(&url)
            .header("Authorization", format!("token {}", self.creds.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "tf-audit")
            .json(&PatchIssueRequest { body })
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("patching issue returned {}", response.status());
        }
        Ok(())
    }

    async fn create_issue(&self, body: &str) -> anyhow::Result<()> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/issues",
            self.creds.owner, self.creds.repo
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("token {}", self.creds.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "tf-audit")
            .json(&CreateIssueRequest { title: ISSUE_TITLE, body })
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("creating issue returned {}", response.status());
        }
        Ok(())
    }
}

/// Preserve any human-authored preamble above the first `HEADER` marker and
/// replace only the machine-generated tail (§4.7).
fn merge_body(existing_body: &str, formatted_findings: &str) -> String {
    let preamble = existing_body.split(HEADER).next().unwrap_or("").trim();
    format!("{preamble}\n\n{HEADER}{formatted_findings}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_body_preserves_preamble() {
        let existing = "Some human notes.\n\n### \n\nold findings here";
        let merged = merge_body(existing, "new findings here");
        assert_eq!(merged, "Some human notes.\n\n### \n\nnew findings here");
    }

    #[test]
    fn merge_body_with_no_preamble() {
        let existing = "### \n\nold findings";
        let merged = merge_body(existing, "new findings");
        assert_eq!(merged, "\n\n### \n\nnew findings");
    }
}
