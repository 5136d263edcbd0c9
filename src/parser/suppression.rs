//! Suppression Extractor (C2, §4.2).
//!
//! Two independent paths, combined: an "evaluated" path that only succeeds
//! on expressions that are already literal values (no evaluation context is
//! ever built — expression evaluation is a Non-goal), and a "syntactic"
//! path that walks the raw expression shapes directly. Both are kept
//! because bare-identifier `ignore_changes` entries (the common case) fail
//! the evaluated path silently — see DESIGN.md.

use crate::model::WILDCARD_IGNORE;

/// Evaluated path: succeeds only for array elements that are literal
/// strings. A literal `"all"` element short-circuits the whole result to
/// the wildcard sentinel.
pub fn evaluated_path(expr: &hcl::Expression) -> Vec<String> {
    let hcl::Expression::Array(items) = expr else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for item in items {
        if let hcl::Expression::String(s) = item {
            if s == "all" {
                return vec![WILDCARD_IGNORE.to_string()];
            }
            names.push(s.clone());
        }
    }
    names
}

/// Syntactic path: walks the array's elements directly, handling the three
/// shapes named in §4.2 — a scoped traversal (take the root symbol), a
/// single-part literal template, or a bare literal string.
pub fn syntactic_path(expr: &hcl::Expression) -> Vec<String> {
    let hcl::Expression::Array(items) = expr else {
        return Vec::new();
    };

    items.iter().filter_map(syntactic_name).collect()
}

fn syntactic_name(expr: &hcl::Expression) -> Option<String> {
    match expr {
        hcl::Expression::Traversal(traversal) => match &traversal.expr {
            hcl::Expression::Variable(var) => Some(var.to_string()),
            _ => None,
        },
        hcl::Expression::Variable(var) => Some(var.to_string()),
        hcl::Expression::TemplateExpr(template) => {
            let rendered = template.to_string();
            if rendered.contains("${") {
                None
            } else {
                Some(rendered)
            }
        }
        hcl::Expression::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Run both paths against a single `lifecycle { ignore_changes = [...] }`
/// attribute expression and combine the results. Duplicates are tolerated
/// (later matching in the diff engine is case-insensitive membership).
pub fn extract(expr: &hcl::Expression) -> Vec<String> {
    let evaluated = evaluated_path(expr);
    if evaluated.iter().any(|n| n == WILDCARD_IGNORE) {
        return vec![WILDCARD_IGNORE.to_string()];
    }

    let mut combined = evaluated;
    combined.extend(syntactic_path(expr));
    combined
}

/// Walk a block body's direct `lifecycle` sub-blocks and extract their
/// `ignore_changes` entries. This is the call ParseBody makes against
/// every body it parses (§4.1 step 3, first bullet).
pub fn extract_from_body(body: &hcl::Body) -> Vec<String> {
    let mut names = Vec::new();
    for structure in body.iter() {
        let hcl::Structure::Block(block) = structure else {
            continue;
        };
        if block.identifier() != "lifecycle" {
            continue;
        }
        for inner in block.body().iter() {
            let hcl::Structure::Attribute(attr) = inner else {
                continue;
            };
            if &*attr.key == "ignore_changes" {
                let extracted = extract(&attr.expr);
                if extracted.iter().any(|n| n == WILDCARD_IGNORE) {
                    return vec![WILDCARD_IGNORE.to_string()];
                }
                names.extend(extracted);
            }
        }
    }
    names
}
