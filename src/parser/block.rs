//! Recursive ParseBody (C1 §4.1 step 3).

use crate::model::{BlockData, WILDCARD_IGNORE};

use super::suppression;

/// Parse one syntactic block body into a `BlockData`.
///
/// No evaluation context is supplied; interpolations that cannot be
/// evaluated statically are skipped without error. Unknown block types at
/// any level are stored as static blocks (the dispatch only special-cases
/// `lifecycle` and `dynamic`).
pub fn parse_body(body: &hcl::Body) -> BlockData {
    let mut block = BlockData {
        ignore_changes: suppression::extract_from_body(body),
        ..Default::default()
    };

    for structure in body.iter() {
        match structure {
            hcl::Structure::Attribute(attr) => {
                block.properties.insert(attr.key.to_string());
            }
            hcl::Structure::Block(inner) => match inner.identifier() {
                "lifecycle" => {
                    // §4.1: additionally feed this lifecycle block's
                    // attributes through the evaluated suppression path and
                    // append — on top of the combined extraction the
                    // `extract_from_body` call above already performed.
                    for s in inner.body().iter() {
                        if let hcl::Structure::Attribute(attr) = s {
                            if &*attr.key == "ignore_changes" {
                                let evaluated = suppression::evaluated_path(&attr.expr);
                                if evaluated.iter().any(|n| n == WILDCARD_IGNORE) {
                                    block.ignore_changes = vec![WILDCARD_IGNORE.to_string()];
                                } else {
                                    block.ignore_changes.extend(evaluated);
                                }
                            }
                        }
                    }
                }
                "dynamic" => {
                    let labels = inner.labels();
                    if labels.len() == 1 {
                        let label = labels[0].as_str().to_string();
                        let content_body = find_content_block(inner.body()).unwrap_or(inner.body());
                        let parsed = parse_body(content_body);

                        match block.dynamic_blocks.remove(&label) {
                            Some(mut existing) => {
                                existing.merge_from(parsed);
                                block.dynamic_blocks.insert(label, existing);
                            }
                            None => {
                                block.dynamic_blocks.insert(label, parsed);
                            }
                        }
                    }
                }
                other => {
                    // Canonical input has at most one block per type at a
                    // given level; a duplicate overwrites (§3 BlockData).
                    block
                        .static_blocks
                        .insert(other.to_string(), parse_body(inner.body()));
                }
            },
        }
    }

    block
}

/// Locate the `content` sub-block of a `dynamic` body, falling back to the
/// dynamic body itself when absent (§4.1).
fn find_content_block(body: &hcl::Body) -> Option<&hcl::Body> {
    for structure in body.iter() {
        if let hcl::Structure::Block(inner) = structure {
            if inner.identifier() == "content" {
                return Some(inner.body());
            }
        }
    }
    None
}
