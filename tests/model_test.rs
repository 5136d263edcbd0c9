use tf_audit::model::{ParsedItem, ProviderConfig, BlockData};

#[test]
fn normalize_source_prefixes_unrooted_sources() {
    assert_eq!(
        ProviderConfig::normalize_source("hashicorp/foo"),
        "registry.terraform.io/hashicorp/foo"
    );
}

#[test]
fn normalize_source_is_idempotent() {
    let once = ProviderConfig::normalize_source("hashicorp/foo");
    let twice = ProviderConfig::normalize_source(&once);
    assert_eq!(once, twice);
}

#[test]
fn normalize_source_leaves_sources_without_slash_untouched() {
    assert_eq!(ProviderConfig::normalize_source("foo"), "foo");
}

#[test]
fn provider_key_is_the_prefix_up_to_first_underscore() {
    let item = ParsedItem {
        resource_type: "azurerm_key_vault".to_string(),
        name: "x".to_string(),
        body: BlockData::default(),
    };
    assert_eq!(item.provider_key(), "azurerm");
}
