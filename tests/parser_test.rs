use tf_audit::model::WILDCARD_IGNORE;
use tf_audit::parser;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) {
    std::fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn missing_provider_requirements_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let providers = parser::parse_provider_requirements(&dir.path().join("terraform.tf")).unwrap();
    assert!(providers.is_empty());
}

#[test]
fn provider_requirements_are_parsed_and_normalized() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "terraform.tf",
        r#"
terraform {
  required_providers {
    foo = {
      source  = "hashicorp/foo"
      version = "~> 1.0"
    }
  }
}
"#,
    );

    let providers = parser::parse_provider_requirements(&dir.path().join("terraform.tf")).unwrap();
    let foo = providers.get("foo").expect("foo provider parsed");
    assert_eq!(foo.source, "registry.terraform.io/hashicorp/foo");
    assert_eq!(foo.version.as_deref(), Some("~> 1.0"));
}

#[test]
fn resources_and_data_sources_are_split() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "main.tf",
        r#"
resource "foo" "x" {
  name = "hello"
}

data "foo" "y" {
  q = "val"
}
"#,
    );

    let (resources, data_sources) =
        parser::parse_resources_and_data_sources(&dir.path().join("main.tf")).unwrap();

    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].resource_type, "foo");
    assert_eq!(resources[0].name, "x");
    assert!(resources[0].body.properties.contains("name"));

    assert_eq!(data_sources.len(), 1);
    assert_eq!(data_sources[0].resource_type, "foo");
    assert_eq!(data_sources[0].name, "y");
}

#[test]
fn lifecycle_ignore_changes_is_extracted_for_bare_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "main.tf",
        r#"
resource "foo" "x" {
  lifecycle {
    ignore_changes = [name, tags]
  }
}
"#,
    );

    let (resources, _) = parser::parse_resources_and_data_sources(&dir.path().join("main.tf")).unwrap();
    let ignore = &resources[0].body.ignore_changes;
    assert!(ignore.iter().any(|n| n == "name"));
    assert!(ignore.iter().any(|n| n == "tags"));
}

#[test]
fn wildcard_ignore_changes_all_is_promoted() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "main.tf",
        r#"
resource "foo" "x" {
  lifecycle {
    ignore_changes = ["all"]
  }
}
"#,
    );

    let (resources, _) = parser::parse_resources_and_data_sources(&dir.path().join("main.tf")).unwrap();
    assert_eq!(resources[0].body.ignore_changes, vec![WILDCARD_IGNORE.to_string()]);
}

#[test]
fn dynamic_block_content_is_parsed_into_dynamic_blocks() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "main.tf",
        r#"
resource "foo" "x" {
  dynamic "tag" {
    for_each = []
    content {
      key = "v"
    }
  }
}
"#,
    );

    let (resources, _) = parser::parse_resources_and_data_sources(&dir.path().join("main.tf")).unwrap();
    let tag = resources[0]
        .body
        .dynamic_blocks
        .get("tag")
        .expect("dynamic tag block parsed");
    assert!(tag.properties.contains("key"));
}

#[test]
fn missing_main_tf_yields_empty_lists() {
    let dir = tempfile::tempdir().unwrap();
    let (resources, data_sources) =
        parser::parse_resources_and_data_sources(&dir.path().join("main.tf")).unwrap();
    assert!(resources.is_empty());
    assert!(data_sources.is_empty());
}
