use assert_cmd::Command;
use predicates::prelude::*;

fn coverage() -> Command {
    Command::cargo_bin("coverage").expect("coverage binary")
}

#[test]
fn estimate_defaults_reproduce_reference_trial() {
    coverage()
        .args(["estimate", "--model", "density-calibrated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("density-calibrated"))
        .stdout(predicate::str::contains("0.9550"))
        .stdout(predicate::str::contains("0.0216"));
}

#[test]
fn estimate_square_field_as_csv() {
    coverage()
        .args([
            "estimate",
            "--model",
            "fixed-turn-loss",
            "--shape",
            "square",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "model,ideal_area_acre,actual_area_acre,efficiency,turn_count,status",
        ))
        .stdout(predicate::str::contains("fixed-turn-loss,1.359078,"))
        .stdout(predicate::str::contains(",16,ok"));
}

#[test]
fn unknown_shape_fails() {
    coverage()
        .args(["compare", "--shape", "hexagon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shape 'hexagon' is not in the catalog"));
}

#[test]
fn zero_flow_is_rejected() {
    coverage()
        .args(["estimate", "--model", "shape-geometry", "--shape", "square", "--flow", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for flow_rate"));
}

#[test]
fn negative_turns_are_rejected() {
    coverage()
        .args(["estimate", "--model", "density-calibrated", "--turns", "-4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for turn_count"));
}

#[test]
fn compare_writes_json_report_to_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reports/compare.json");
    coverage()
        .args(["compare", "--shape", "rectangle", "--format", "json", "--output"])
        .arg(&path)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&path).expect("report written");
    assert!(contents.contains("\"profile\": \"default\""));
    assert!(contents.contains("\"model\": \"shape-geometry\""));
    assert!(contents.contains("\"turn_count\": 12"));
}

#[test]
fn custom_profile_directory_is_selectable() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("gusty.toml"),
        "name = \"gusty\"\ndescription = \"Field trial in wind\"\n[turn_loss]\nturn_loss_fraction = 0.05\n",
    )
    .unwrap();

    coverage()
        .args(["profiles", "--profiles"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("gusty"))
        .stdout(predicate::str::contains("low-sensitivity"));

    coverage()
        .args([
            "estimate",
            "--model",
            "fixed-turn-loss",
            "--turns",
            "1",
            "--profile",
            "gusty",
            "--profiles",
        ])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile : gusty"))
        .stdout(predicate::str::contains("0.9500"));
}

#[test]
fn shipped_profiles_shadow_builtins_once() {
    let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/profiles");
    let output = coverage()
        .args(["profiles", "--profiles", shipped])
        .output()
        .expect("run coverage");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let names: Vec<_> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(names, ["default", "low-sensitivity"]);
}

#[test]
fn unknown_profile_fails() {
    coverage()
        .args(["compare", "--profile", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("calibration profile 'missing' not found"));
}

#[test]
fn shapes_lists_catalog() {
    coverage()
        .arg("shapes")
        .assert()
        .success()
        .stdout(predicate::str::contains("long-rectangle"))
        .stdout(predicate::str::contains("l-shape"));
}
