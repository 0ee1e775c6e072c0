use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REGISTRY: &str = r#"{
    "operations": [
        {
            "name": "gaussblur",
            "description": "gaussian blur",
            "category": "VipsConvolution",
            "args": [
                { "name": "in", "type": "image", "flags": 5, "priority": 1 },
                { "name": "out", "type": "image", "flags": 6, "priority": 2 },
                { "name": "sigma", "type": "double", "flags": 5, "priority": 3 },
                { "name": "precision", "type": "enum", "flags": 1, "priority": 4, "enum_type": "VipsPrecision" }
            ]
        },
        {
            "name": "jpegload",
            "description": "load jpeg from file",
            "category": "VipsForeignLoad",
            "args": [
                { "name": "filename", "type": "string", "flags": 5, "priority": 1 },
                { "name": "out", "type": "image", "flags": 6, "priority": 2 }
            ]
        }
    ],
    "enums": [
        {
            "name": "VipsPrecision",
            "values": [
                { "name": "VIPS_PRECISION_INTEGER", "nick": "integer", "value": 0 },
                { "name": "VIPS_PRECISION_FLOAT", "nick": "float", "value": 1 },
                { "name": "VIPS_PRECISION_LAST", "nick": "last", "value": 3 }
            ]
        }
    ]
}"#;

fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("registry.json"), REGISTRY).unwrap();
    temp_dir
}

fn vipsgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vipsgen").unwrap();
    cmd.current_dir(dir).env_remove("VIPSGEN_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_list() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Discovered 2 operations (1 excluded, 1 generatable)",
        ))
        .stdout(predicate::str::contains("=== convolution (1 ops) ==="))
        .stdout(predicate::str::contains("    optional: precision:VipsPrecision"))
        .stdout(predicate::str::contains("jpegload").not());
}

#[test]
fn test_enums() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "enums"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discovered 1 enum types"))
        .stdout(predicate::str::contains("VipsPrecision -> Precision"))
        .stdout(predicate::str::contains("  VIPS_PRECISION_FLOAT = 1 (nick: float)"))
        .stdout(predicate::str::contains("VIPS_PRECISION_LAST").not());
}

#[test]
fn test_coverage() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "coverage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coverage Report"))
        .stdout(predicate::str::contains(format!(
            "{:<20} {:>8} {:>8} {:>8}",
            "TOTAL", 1, 1, 2
        )));
}

#[test]
fn test_generate_then_rerun() {
    let temp_dir = setup();
    fs::create_dir(temp_dir.path().join("out")).unwrap();

    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "generate", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 operations"))
        .stdout(predicate::str::contains("written"));

    let bridge = fs::read_to_string(temp_dir.path().join("out/generated.go")).unwrap();
    assert!(bridge.contains("func vipsGenGaussblur("));
    assert!(!bridge.contains("jpegload"));

    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "generate", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 files modified)"));
}

#[test]
fn test_generate_uses_config_output_dir() {
    let temp_dir = setup();
    fs::create_dir(temp_dir.path().join("bindings")).unwrap();
    fs::write(
        temp_dir.path().join("vipsgen.json"),
        r#"{ "generator": { "output_dir": "bindings", "package": "vipsbind" } }"#,
    )
    .unwrap();

    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "generate"])
        .assert()
        .success();

    let bridge = fs::read_to_string(temp_dir.path().join("bindings/generated.go")).unwrap();
    assert!(bridge.contains("package vipsbind\n"));
}

#[test]
fn test_generate_into_missing_directory_fails() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "generate", "--output", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write"));
}

#[test]
fn test_snapshot_round_trip() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--registry", "registry.json", "snapshot", "--output", "copy.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 operations and 1 enum types"));

    vipsgen(temp_dir.path())
        .args(["--registry", "copy.json", "coverage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("convolution"));
}

#[test]
fn test_missing_library_fails() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .args(["--library", "/nonexistent/libvipsgen_introspect.so", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_malformed_registry_fails() {
    let temp_dir = setup();
    fs::write(temp_dir.path().join("bad.json"), "{").unwrap();
    vipsgen(temp_dir.path())
        .args(["--registry", "bad.json", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Introspection error"));
}

#[cfg(not(feature = "bundled-shim"))]
#[test]
fn test_no_registry_source_explains_options() {
    let temp_dir = setup();
    vipsgen(temp_dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--registry FILE or --library PATH"))
        .stderr(predicate::str::contains("--features bundled-shim"));
}

#[test]
fn test_empty_config_env_uses_nearest_file() {
    let temp_dir = setup();
    fs::create_dir(temp_dir.path().join("bindings")).unwrap();
    fs::write(
        temp_dir.path().join("vipsgen.json"),
        r#"{ "generator": { "output_dir": "bindings" } }"#,
    )
    .unwrap();

    vipsgen(temp_dir.path())
        .env("VIPSGEN_CONFIG", "")
        .args(["--registry", "registry.json", "generate"])
        .assert()
        .success();

    assert!(temp_dir.path().join("bindings/generated.go").exists());
}
