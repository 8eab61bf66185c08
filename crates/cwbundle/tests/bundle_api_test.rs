//! Integration tests for the Bundle API
//!
//! Each test works in its own temporary directory.

use std::{fs, path::Path};

use tempfile::tempdir;

use cwbundle::{
    Bundle, BundleError, Stage,
    archive::ConflictPolicy,
    catalog,
    config::{AppConfig, BundleConfig, DiagramConfig, StyleConfig},
    validate::validate_blob,
};

fn bundle_in(root: &Path) -> Bundle {
    bundle_with_policy(root, ConflictPolicy::Replace)
}

fn bundle_with_policy(root: &Path, policy: ConflictPolicy) -> Bundle {
    let mut bundle = BundleConfig::new(
        root.join("terraform_ssm_cwagent"),
        root.join("terraform_ssm_cwagent.zip"),
    );
    bundle.set_on_conflict(policy);
    let diagram = DiagramConfig::new(root.join("cloudwatch_autoscaling_architecture.svg"));
    Bundle::new(AppConfig::new(bundle, diagram, StyleConfig::default()))
}

#[test]
fn test_base_stage_creates_archive_with_two_entries() {
    let dir = tempdir().expect("Failed to create temp directory");
    let bundle = bundle_in(dir.path());

    let report = bundle.write_stages(&[Stage::Base]).unwrap();

    assert_eq!(report.added(), ["main.tf", "cwagent-config.json"]);
    assert_eq!(bundle.list().unwrap(), ["main.tf", "cwagent-config.json"]);
    assert!(dir.path().join("terraform_ssm_cwagent/main.tf").is_file());
    assert!(
        dir.path()
            .join("terraform_ssm_cwagent/cwagent-config.json")
            .is_file()
    );
}

#[test]
fn test_later_stage_appends_without_touching_earlier_entries() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());
    let archive = bundle.archive();

    bundle.write_stages(&[Stage::Base]).unwrap();
    let main_before = archive.read_entry("main.tf").unwrap();
    let config_before = archive.read_entry("cwagent-config.json").unwrap();

    bundle.write_stages(&[Stage::Alarms]).unwrap();

    assert_eq!(
        bundle.list().unwrap(),
        ["main.tf", "cwagent-config.json", "alarms_dashboard_autoscaling.tf"]
    );
    assert_eq!(archive.read_entry("main.tf").unwrap(), main_before);
    assert_eq!(archive.read_entry("cwagent-config.json").unwrap(), config_before);
}

#[test]
fn test_all_stages_in_delivery_order() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());

    for stage in Stage::ALL {
        bundle.write_stages(&[stage]).unwrap();
    }

    let expected: Vec<&str> = catalog::all_blobs().iter().map(|blob| blob.name()).collect();
    assert_eq!(bundle.list().unwrap(), expected);
    assert_eq!(bundle.verify().unwrap(), 5);

    // Entries mirror the files on disk
    for blob in catalog::all_blobs() {
        let on_disk = fs::read(dir.path().join("terraform_ssm_cwagent").join(blob.name())).unwrap();
        assert_eq!(bundle.archive().read_entry(blob.name()).unwrap(), on_disk);
        assert_eq!(on_disk, blob.as_bytes());
    }
}

#[test]
fn test_rewriting_is_idempotent_under_replace() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());

    bundle.write_stages(&Stage::ALL).unwrap();
    let report = bundle.write_stages(&Stage::ALL).unwrap();

    assert!(report.added().is_empty());
    assert_eq!(report.replaced().len(), 5);
    assert_eq!(bundle.archive().len().unwrap(), 5);
    assert_eq!(bundle.verify().unwrap(), 5);
}

#[test]
fn test_fail_policy_leaves_archive_byte_identical() {
    let dir = tempdir().unwrap();
    let bundle = bundle_with_policy(dir.path(), ConflictPolicy::Fail);

    bundle.write_stages(&[Stage::Base]).unwrap();
    let archive_path = dir.path().join("terraform_ssm_cwagent.zip");
    let before = fs::read(&archive_path).unwrap();
    let main_tf = bundle.config().bundle().directory().join("main.tf");
    fs::write(&main_tf, "# operator edited\n").unwrap();

    let result = bundle.write_stages(&[Stage::Alarms, Stage::Base]);

    assert!(matches!(result, Err(BundleError::EntryExists(name)) if name == "main.tf"));
    assert_eq!(fs::read(&archive_path).unwrap(), before);
    assert_eq!(fs::read_to_string(&main_tf).unwrap(), "# operator edited\n");
    assert!(!main_tf.with_file_name("alarms_dashboard_autoscaling.tf").exists());
}

#[test]
fn test_keep_policy_preserves_original_entry() {
    let dir = tempdir().unwrap();
    let bundle = bundle_with_policy(dir.path(), ConflictPolicy::Keep);
    let archive = bundle.archive();

    bundle.write_stages(&[Stage::Base]).unwrap();
    let original = archive.read_entry("main.tf").unwrap();

    let report = bundle.write_stages(&[Stage::Base, Stage::Memory]).unwrap();

    assert_eq!(report.kept(), ["main.tf", "cwagent-config.json"]);
    assert_eq!(report.added(), ["memory_scaling.tf"]);
    assert_eq!(archive.read_entry("main.tf").unwrap(), original);
}

#[test]
fn test_unwritable_bundle_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let config = AppConfig::new(
        BundleConfig::new(blocker.join("bundle"), dir.path().join("bundle.zip")),
        DiagramConfig::default(),
        StyleConfig::default(),
    );
    let result = Bundle::new(config).write_stages(&[Stage::Base]);

    assert!(matches!(result, Err(BundleError::Io(_))));
}

#[test]
fn test_corrupt_archive_is_archive_error() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());
    fs::write(dir.path().join("terraform_ssm_cwagent.zip"), b"PK but not really").unwrap();

    let result = bundle.write_stages(&[Stage::Base]);

    assert!(matches!(result, Err(BundleError::Archive(_))));
}

#[test]
fn test_agent_config_contents() {
    let blob = catalog::find("cwagent-config.json").unwrap();
    let value: serde_json::Value = serde_json::from_str(blob.content()).unwrap();

    assert_eq!(value["agent"]["metrics_collection_interval"], 60);
    assert_eq!(value["metrics"]["namespace"], "MyApp");
    let mem = value["metrics"]["metrics_collected"]["mem"]["measurement"]
        .as_array()
        .unwrap();
    assert!(mem.iter().any(|m| m == "mem_used_percent"));
}

#[test]
fn test_terraform_blobs_are_well_formed() {
    for blob in catalog::all_blobs() {
        assert!(
            validate_blob(blob).is_ok(),
            "{} should be valid: {:?}",
            blob.name(),
            validate_blob(blob).err()
        );
    }
}

#[test]
fn test_render_diagram_writes_image() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());

    let outcome = bundle.render_diagram(false).unwrap();

    assert!(outcome.is_none());
    let svg =
        fs::read_to_string(dir.path().join("cloudwatch_autoscaling_architecture.svg")).unwrap();
    assert!(!svg.is_empty());
    assert!(svg.contains("</svg>"));
    assert_eq!(svg.matches("marker-end=").count(), 10);
    assert!(!bundle.archive().exists());
}

#[test]
fn test_render_diagram_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());
    let output = dir.path().join("cloudwatch_autoscaling_architecture.svg");
    fs::write(&output, "stale").unwrap();

    bundle.render_diagram(false).unwrap();

    assert!(fs::read_to_string(output).unwrap().contains("<svg"));
}

#[test]
fn test_render_diagram_with_registration() {
    let dir = tempdir().unwrap();
    let bundle = bundle_in(dir.path());
    bundle.write_stages(&Stage::ALL).unwrap();

    let outcome = bundle.render_diagram(true).unwrap().unwrap();

    assert_eq!(outcome.added(), ["cloudwatch_autoscaling_architecture.svg"]);
    assert_eq!(bundle.list().unwrap().len(), 6);
    assert_eq!(bundle.verify().unwrap(), 6);
}
