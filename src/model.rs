use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

/// `terraform { required_providers { ... } }` entry, normalized per §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub source: String,
    pub version: Option<String>,
}

impl ProviderConfig {
    /// Normalize so that any value containing a `/` but not already rooted
    /// at the canonical registry host is prefixed with
    /// `registry.terraform.io/`. Idempotent: running it twice is a no-op.
    pub fn normalize_source(source: &str) -> String {
        if source.contains('/') && !source.starts_with("registry.terraform.io/") {
            format!("registry.terraform.io/{}", source)
        } else {
            source.to_string()
        }
    }
}

/// The structural image of a single block body (§3 BlockData).
///
/// `properties`/`staticBlocks`/`dynamicBlocks` use `BTreeMap`/`BTreeSet` for
/// deterministic iteration; the spec gives no ordering guarantee over
/// findings (§4.4) but reproducible ordering costs nothing and makes test
/// output and dedup "first-seen" behavior stable across runs, matching the
/// teacher's own preference for sorted directory scans.
#[derive(Debug, Clone, Default)]
pub struct BlockData {
    pub properties: BTreeSet<String>,
    pub static_blocks: BTreeMap<String, BlockData>,
    pub dynamic_blocks: BTreeMap<String, BlockData>,
    pub ignore_changes: Vec<String>,
}

impl BlockData {
    /// Merge rule for repeated `dynamic "L"` labels at the same level
    /// (§4.4): union properties, recursively merge matching static/dynamic
    /// blocks, concatenate ignore_changes. `other`'s children move into
    /// `self` — no sharing occurs (§9 recursive ownership).
    pub fn merge_from(&mut self, other: BlockData) {
        self.properties.extend(other.properties);
        self.ignore_changes.extend(other.ignore_changes);

        for (name, body) in other.static_blocks {
            self.static_blocks
                .entry(name)
                .and_modify(|existing| existing.merge_from(body.clone()))
                .or_insert(body);
        }
        for (name, body) in other.dynamic_blocks {
            self.dynamic_blocks
                .entry(name)
                .and_modify(|existing| existing.merge_from(body.clone()))
                .or_insert(body);
        }
    }
}

/// A parsed `resource` or `data` block (§3 ParsedResource / ParsedDataSource).
#[derive(Debug, Clone)]
pub struct ParsedItem {
    pub resource_type: String,
    pub name: String,
    pub body: BlockData,
}

impl ParsedItem {
    /// The first underscore-delimited segment of `resource_type`, e.g.
    /// `azurerm_key_vault` -> `azurerm`.
    pub fn provider_key(&self) -> &str {
        self.resource_type
            .split('_')
            .next()
            .unwrap_or(&self.resource_type)
    }
}

/// One attribute entry in a provider schema block.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaAttribute {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
}

/// One nested-block-type entry in a provider schema block.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaBlockType {
    #[serde(default)]
    pub min_items: u64,
    #[serde(default)]
    #[allow(dead_code)]
    pub max_items: u64,
    pub block: SchemaBlock,
}

/// `SchemaBlock` as emitted by `terraform providers schema -json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaBlock {
    #[serde(default)]
    pub attributes: BTreeMap<String, SchemaAttribute>,
    #[serde(default, rename = "block_types")]
    pub block_types: BTreeMap<String, SchemaBlockType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSchema {
    pub block: SchemaBlock,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSchemas {
    #[serde(default, rename = "resource_schemas")]
    pub resource_schemas: HashMap<String, ResourceSchema>,
    #[serde(default, rename = "data_source_schemas")]
    pub data_source_schemas: HashMap<String, ResourceSchema>,
}

/// Top-level shape of `terraform providers schema -json` stdout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default, rename = "provider_schemas")]
    pub provider_schemas: HashMap<String, ProviderSchemas>,
}

/// A single record of a schema-declared attribute or nested block the
/// configuration fails to set (§3 Finding).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finding {
    pub resource_type: String,
    pub path: String,
    pub name: String,
    pub required: bool,
    pub is_block: bool,
    pub is_data_source: bool,
    pub submodule_name: String,
}

impl Finding {
    /// Dedup key (§4.6): the 6-tuple identity of a finding, excluding
    /// `required` (two findings for the same name/path can't disagree on
    /// `required` since it's derived from the schema, not the config).
    pub fn dedup_key(&self) -> (String, String, String, bool, bool, String) {
        (
            self.resource_type.clone(),
            self.path.clone(),
            self.name.clone(),
            self.is_block,
            self.is_data_source,
            self.submodule_name.clone(),
        )
    }
}

pub const ROOT_PATH: &str = "root";
/// The wildcard sentinel a literal `"all"` `ignore_changes` entry is
/// promoted to — matches every name at and below the introducing scope.
pub const WILDCARD_IGNORE: &str = "*all*";
