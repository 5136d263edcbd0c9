//! Deduplicator & Formatter (C6, §4.6).

use std::collections::HashSet;

use crate::model::Finding;

/// Collapse findings sharing a dedup key, keeping the first-seen survivor.
pub fn dedupe(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for finding in findings {
        if seen.insert(finding.dedup_key()) {
            out.push(finding);
        }
    }
    out
}

/// Render one finding per the §4.6 template.
pub fn format_finding(f: &Finding) -> String {
    let required = if f.required { "required" } else { "optional" };
    let kind = if f.is_block { "block" } else { "property" };
    let clean_path = clean_path(&f.path);
    let submodule = if f.submodule_name.is_empty() {
        String::new()
    } else {
        format!(" [in submodule `{}`]", f.submodule_name)
    };
    let source = if f.is_data_source { "data source" } else { "resource" };

    format!(
        "`{}`: missing {} {} `{}` in `{}`{} ({})",
        f.resource_type, required, kind, f.name, clean_path, submodule, source
    )
}

fn clean_path(path: &str) -> String {
    let cleaned = path.replace("root.", "");
    if cleaned == "root" {
        String::new()
    } else {
        cleaned
    }
}

/// Render the full finding set, one per line.
pub fn format_all(findings: &[Finding]) -> String {
    findings.iter().map(format_finding).collect::<Vec<_>>().join("\n")
}
