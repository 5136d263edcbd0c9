//! Directory Orchestrator (C5, §4.5).

use std::path::Path;

use crate::config::AuditConfig;
use crate::diff;
use crate::error::AuditError;
use crate::model::{Finding, ParsedItem, ProviderConfig, SchemaCatalog, ROOT_PATH};
use crate::parser;
use crate::schema::{self, CleanupGuard};

/// Result of auditing the whole root: the deduplicated findings plus any
/// per-submodule failures that did not abort the run.
pub struct RootAuditResult {
    pub findings: Vec<Finding>,
    pub submodule_failures: Vec<(String, AuditError)>,
}

/// `auditRoot` (§4.5 "Top level").
pub async fn audit_root(cfg: &AuditConfig) -> Result<RootAuditResult, AuditError> {
    let root = Path::new(&cfg.root);

    let mut findings = audit_directory(cfg, root, "").await?;
    let mut submodule_failures = Vec::new();

    let modules_dir = root.join("modules");
    if modules_dir.is_dir() {
        let mut entries: Vec<_> = std::fs::read_dir(&modules_dir)
            .map_err(|e| AuditError::Parse {
                file: modules_dir.clone(),
                message: e.to_string(),
            })?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        entries.sort();

        for sub_dir in entries {
            if !sub_dir.join("main.tf").exists() {
                continue;
            }
            let sub_name = sub_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            match audit_directory(cfg, &sub_dir, &sub_name).await {
                Ok(sub_findings) => findings.extend(sub_findings),
                Err(e) => {
                    tracing::warn!(submodule = %sub_name, error = %e, "submodule audit failed");
                    submodule_failures.push((sub_name, e));
                }
            }
        }
    }

    let findings = crate::report::dedupe(findings);

    Ok(RootAuditResult {
        findings,
        submodule_failures,
    })
}

/// `auditDirectory` (§4.5).
async fn audit_directory(
    cfg: &AuditConfig,
    dir: &Path,
    submodule_name: &str,
) -> Result<Vec<Finding>, AuditError> {
    if !dir.join("main.tf").exists() {
        return Ok(Vec::new());
    }

    let providers = parser::parse_provider_requirements(&dir.join("terraform.tf"))?;

    let _cleanup = CleanupGuard::new(dir);

    let catalog = schema::load_schema(cfg, dir).await?;

    let (resources, data_sources) = parser::parse_resources_and_data_sources(&dir.join("main.tf"))?;

    let mut findings = Vec::new();
    for item in &resources {
        audit_item(&providers, &catalog, item, false, submodule_name, &mut findings);
    }
    for item in &data_sources {
        audit_item(&providers, &catalog, item, true, submodule_name, &mut findings);
    }

    Ok(findings)
}

fn audit_item(
    providers: &std::collections::HashMap<String, ProviderConfig>,
    catalog: &SchemaCatalog,
    item: &ParsedItem,
    is_data_source: bool,
    submodule_name: &str,
    findings: &mut Vec<Finding>,
) {
    let Some(provider_cfg) = providers.get(item.provider_key()) else {
        tracing::warn!(resource_type = %item.resource_type, "no provider requirement for provider key, skipping");
        return;
    };
    let Some(provider_schemas) = catalog.provider_schemas.get(&provider_cfg.source) else {
        tracing::warn!(resource_type = %item.resource_type, source = %provider_cfg.source, "no schema for provider source, skipping");
        return;
    };

    let type_schema = if is_data_source {
        provider_schemas.data_source_schemas.get(&item.resource_type)
    } else {
        provider_schemas.resource_schemas.get(&item.resource_type)
    };
    let Some(type_schema) = type_schema else {
        tracing::warn!(resource_type = %item.resource_type, "no schema for resource type, skipping");
        return;
    };

    let ctx = diff::DiffContext {
        resource_type: &item.resource_type,
        is_data_source,
        submodule_name,
    };
    let mut item_findings = Vec::new();
    diff::validate(
        &ctx,
        ROOT_PATH,
        &type_schema.block,
        &item.body,
        &item.body.ignore_changes,
        &mut item_findings,
    );

    let item_findings = diff::post_filter(item_findings, &item.body.ignore_changes);
    findings.extend(item_findings);
}
