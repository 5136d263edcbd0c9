//! Diff Engine (C4, §4.4).

use crate::model::{BlockData, Finding, SchemaBlock};

/// The parts of a `Validate` call that stay constant across the recursion —
/// only `path`, `schema`, `block`, and `parent_ignore` change per level.
pub struct DiffContext<'a> {
    pub resource_type: &'a str,
    pub is_data_source: bool,
    pub submodule_name: &'a str,
}

/// Recursively compare a parsed block against its schema, appending
/// findings. `parent_ignore` is the suppression set inherited from the
/// enclosing scope; this block's own `ignore_changes` is appended before
/// use.
pub fn validate(
    ctx: &DiffContext,
    path: &str,
    schema: &SchemaBlock,
    block: &BlockData,
    parent_ignore: &[String],
    findings: &mut Vec<Finding>,
) {
    let mut effective_ignore = parent_ignore.to_vec();
    effective_ignore.extend(block.ignore_changes.iter().cloned());

    let is_suppressed = |name: &str| {
        effective_ignore
            .iter()
            .any(|n| n == "*all*" || n.eq_ignore_ascii_case(name))
    };

    for (name, attr) in &schema.attributes {
        if name == "id" {
            continue;
        }
        if attr.computed && !attr.optional && !attr.required {
            continue;
        }
        if is_suppressed(name) {
            continue;
        }
        if !block.properties.contains(name) {
            findings.push(Finding {
                resource_type: ctx.resource_type.to_string(),
                path: path.to_string(),
                name: name.clone(),
                required: attr.required,
                is_block: false,
                is_data_source: ctx.is_data_source,
                submodule_name: ctx.submodule_name.to_string(),
            });
        }
    }

    for (name, block_type) in &schema.block_types {
        if name == "timeouts" {
            continue;
        }
        if is_suppressed(name) {
            continue;
        }

        let child = block.static_blocks.get(name).or(block.dynamic_blocks.get(name));
        match child {
            None => {
                findings.push(Finding {
                    resource_type: ctx.resource_type.to_string(),
                    path: path.to_string(),
                    name: name.clone(),
                    required: block_type.min_items > 0,
                    is_block: true,
                    is_data_source: ctx.is_data_source,
                    submodule_name: ctx.submodule_name.to_string(),
                });
            }
            Some(child) => {
                validate(
                    ctx,
                    &format!("{path}.{name}"),
                    &block_type.block,
                    child,
                    &effective_ignore,
                    findings,
                );
            }
        }
    }
}

/// Outer-level post-filter (§4.4): drop findings matching the resource's own
/// `ignore_changes`, case-insensitively. Applied once, only at the
/// resource/data-source root, on top of the recursive suppression already
/// honored inside `validate`.
pub fn post_filter(findings: Vec<Finding>, resource_ignore: &[String]) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| {
            !resource_ignore
                .iter()
                .any(|n| n == "*all*" || n.eq_ignore_ascii_case(&f.name))
        })
        .collect()
}
