//! End-to-end tests driving the `statcalc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn statcalc() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("statcalc"));
    cmd.env_remove("STATCALC_DECIMALS")
        .env_remove("STATCALC_NO_CLEAR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn z_score_text_output() {
    statcalc()
        .args(["normal", "--mean", "100", "--std-dev", "15", "z-score", "130"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Z-Score: 2"))
        .stdout(predicate::str::contains("Step-by-Step Solution:"))
        .stdout(predicate::str::contains("Formula: Z = (x - μ) / σ"));
}

#[test]
fn invalid_std_dev_fails() {
    statcalc()
        .args(["normal", "--mean", "0", "--std-dev", "0", "empirical"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("standard deviation must be positive"));
}

#[test]
fn z_test_json_output() {
    statcalc()
        .args([
            "--json",
            "test",
            "mean",
            "--alpha",
            "0.05",
            "--sample-mean",
            "105",
            "--sample-size",
            "36",
            "--null-mean",
            "100",
            "--population-std",
            "15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reject_null\": true"))
        .stdout(predicate::str::contains("\"test_statistic\": 2.0"));
}

#[test]
fn missing_std_dev_source_fails() {
    statcalc()
        .args([
            "interval",
            "mean",
            "--sample-mean",
            "50",
            "--sample-size",
            "25",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "either the population or the sample standard deviation must be provided",
        ));
}

#[test]
fn conservative_sample_size_for_proportion() {
    statcalc()
        .args(["interval", "sample-size-proportion", "--margin-error", "0.03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required Sample Size: 1068"))
        .stdout(predicate::str::contains("0.5 (conservative estimate)"));
}

#[test]
fn describe_with_decimals() {
    statcalc()
        .args(["--decimals", "2", "describe", "1,2,3,4,5,6,7,8,9,10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mean: 5.5"))
        .stdout(predicate::str::contains("Sample Std Dev: 3.0276503540974917 (rounded: 3.03)"))
        .stdout(predicate::str::contains("No mode"));
}

#[test]
fn decimals_out_of_range_is_rejected() {
    statcalc()
        .args(["--decimals", "11", "normal", "--mean", "0", "--std-dev", "1", "empirical"])
        .assert()
        .failure();
}

#[test]
fn two_tailed_is_default_tail() {
    statcalc()
        .args([
            "test",
            "two-proportion",
            "--successes1",
            "45",
            "--size1",
            "100",
            "--successes2",
            "30",
            "--size2",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("H₁: p₁ ≠ p₂"))
        .stdout(predicate::str::contains("Decision: REJECT the null hypothesis"));
}

#[test]
fn output_file_receives_json() {
    let dir = std::env::temp_dir().join(format!("statcalc-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("result.json");

    statcalc()
        .args(["--json", "--output"])
        .arg(&path)
        .args(["normal", "--mean", "0", "--std-dev", "1", "critical", "0.95"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["z_critical_upper"], serde_json::json!(1.96));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn interactive_session_from_stdin() {
    statcalc()
        .arg("--no-clear")
        .write_stdin("5\n3\n\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Decimal places updated to 3"))
        .stdout(predicate::str::contains("Thank you for using Statistics Calculator!"));
}
