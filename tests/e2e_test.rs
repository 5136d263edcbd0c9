//! End-to-end tests driving the built `tf-audit` binary against a fake
//! toolchain binary, fixture module trees.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_SCHEMA: &str = r#"{
  "provider_schemas": {
    "registry.terraform.io/hashicorp/foo": {
      "resource_schemas": {
        "foo_thing": {
          "block": {
            "attributes": {
              "name": { "required": true }
            }
          }
        }
      },
      "data_source_schemas": {}
    }
  }
}"#;

/// Write an executable shell script standing in for the toolchain binary:
/// `init` is a no-op, `providers schema -json` prints the fixed catalog.
fn write_fake_terraform(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fake-terraform");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"init\" ]; then\n  exit 0\nfi\ncat <<'EOF'\n{FAKE_SCHEMA}\nEOF\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn tf_audit_cmd(fake_terraform: &Path, root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tf-audit").unwrap();
    cmd.env("TF_AUDIT_BINARY", fake_terraform)
        .env_remove("GITHUB_TOKEN")
        .arg("run")
        .arg(root)
        .arg("--no-report");
    cmd
}

#[test]
fn missing_required_attribute_exits_nonzero_and_reports_it() {
    let work = TempDir::new().unwrap();
    let fake_terraform = write_fake_terraform(work.path());

    let module = work.path().join("module");
    std::fs::create_dir_all(&module).unwrap();
    std::fs::write(
        module.join("terraform.tf"),
        r#"
terraform {
  required_providers {
    foo = {
      source = "hashicorp/foo"
    }
  }
}
"#,
    )
    .unwrap();
    std::fs::write(module.join("main.tf"), "resource \"foo_thing\" \"x\" {}\n").unwrap();

    tf_audit_cmd(&fake_terraform, &module)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("foo_thing"))
        .stdout(predicate::str::contains("name"));
}

#[test]
fn satisfied_configuration_exits_zero() {
    let work = TempDir::new().unwrap();
    let fake_terraform = write_fake_terraform(work.path());

    let module = work.path().join("module");
    std::fs::create_dir_all(&module).unwrap();
    std::fs::write(
        module.join("terraform.tf"),
        r#"
terraform {
  required_providers {
    foo = {
      source = "hashicorp/foo"
    }
  }
}
"#,
    )
    .unwrap();
    std::fs::write(
        module.join("main.tf"),
        "resource \"foo_thing\" \"x\" {\n  name = \"hello\"\n}\n",
    )
    .unwrap();

    tf_audit_cmd(&fake_terraform, &module)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No missing"));
}

#[test]
fn root_without_main_tf_is_not_an_error() {
    let work = TempDir::new().unwrap();
    let fake_terraform = write_fake_terraform(work.path());

    tf_audit_cmd(&fake_terraform, work.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No missing attributes or blocks found."));
}
