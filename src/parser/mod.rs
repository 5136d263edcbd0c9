//! Config Parser (C1, §4.1).

pub mod block;
pub mod suppression;

use std::collections::HashMap;
use std::path::Path;

use crate::error::AuditError;
use crate::model::{ParsedItem, ProviderConfig};

/// Parse the toolchain configuration file (`terraform.tf`) for
/// `terraform { required_providers { ... } }` entries. Missing or empty
/// files are not an error — they yield an empty map.
pub fn parse_provider_requirements(
    path: &Path,
) -> Result<HashMap<String, ProviderConfig>, AuditError> {
    let mut providers = HashMap::new();

    let Some(body) = parse_file(path)? else {
        return Ok(providers);
    };

    for structure in body.into_inner() {
        let hcl::Structure::Block(block) = structure else {
            continue;
        };
        if block.identifier() != "terraform" {
            continue;
        }

        for structure in block.body().iter() {
            let hcl::Structure::Block(inner) = structure else {
                continue;
            };
            if inner.identifier() != "required_providers" {
                continue;
            }

            for attr_structure in inner.body().iter() {
                let hcl::Structure::Attribute(attr) = attr_structure else {
                    continue;
                };
                let name = attr.key.to_string();
                if let Some(cfg) = parse_required_provider(&attr.expr) {
                    providers.insert(name, cfg);
                }
            }
        }
    }

    Ok(providers)
}

fn parse_required_provider(expr: &hcl::Expression) -> Option<ProviderConfig> {
    let hcl::Expression::Object(obj) = expr else {
        return None;
    };

    let mut source = None;
    let mut version = None;
    for (key_expr, value_expr) in obj {
        match object_key_to_string(key_expr).as_str() {
            "source" => source = expr_as_string(value_expr),
            "version" => version = expr_as_string(value_expr),
            _ => {}
        }
    }

    source.map(|s| ProviderConfig {
        source: ProviderConfig::normalize_source(&s),
        version,
    })
}

fn object_key_to_string(key: &hcl::expr::ObjectKey) -> String {
    match key {
        hcl::expr::ObjectKey::Identifier(id) => id.to_string(),
        hcl::expr::ObjectKey::Expression(expr) => expr_as_string(expr).unwrap_or_default(),
        _ => String::new(),
    }
}

fn expr_as_string(expr: &hcl::Expression) -> Option<String> {
    match expr {
        hcl::Expression::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Parse the main configuration file (`main.tf`) into resources and data
/// sources, each carrying a fully populated `BlockData`. Labels shorter
/// than two (malformed `resource`/`data` blocks) are skipped. Unknown
/// top-level block types are ignored silently.
pub fn parse_resources_and_data_sources(
    path: &Path,
) -> Result<(Vec<ParsedItem>, Vec<ParsedItem>), AuditError> {
    let mut resources = Vec::new();
    let mut data_sources = Vec::new();

    let Some(body) = parse_file(path)? else {
        return Ok((resources, data_sources));
    };

    for structure in body.into_inner() {
        let hcl::Structure::Block(hcl_block) = structure else {
            continue;
        };

        let kind = hcl_block.identifier().to_string();
        if kind != "resource" && kind != "data" {
            continue;
        }

        let labels: Vec<String> = hcl_block
            .labels()
            .iter()
            .map(|l| l.as_str().to_string())
            .collect();
        if labels.len() < 2 {
            continue;
        }

        let item = ParsedItem {
            resource_type: labels[0].clone(),
            name: labels[1].clone(),
            body: block::parse_body(hcl_block.body()),
        };

        if kind == "resource" {
            resources.push(item);
        } else {
            data_sources.push(item);
        }
    }

    Ok((resources, data_sources))
}

/// Read and parse a single configuration file. Returns `Ok(None)` when the
/// file doesn't exist — not an error, per §4.1.
fn parse_file(path: &Path) -> Result<Option<hcl::Body>, AuditError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| AuditError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let body: hcl::Body = hcl::from_str(&content).map_err(|e| AuditError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(Some(body))
}
