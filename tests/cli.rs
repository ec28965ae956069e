//! Runs the `twobit` binary against temporary 2bit files.

use std::process::Command;

use twobit_seq::test_utilities::{temp_twobit_file, TwoBitBuilder};

fn twobit_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_twobit"))
}

fn builder() -> TwoBitBuilder {
    TwoBitBuilder::new()
        .sequence("chr1", "ACGTACGTnnnnACGT")
        .sequence("chrM", "GATCACAGGTCTATCACCC")
}

#[test]
fn test_cli_contigs() {
    let file = temp_twobit_file(&builder());
    let output = twobit_binary()
        .arg("contigs")
        .arg(file.path())
        .output()
        .expect("twobit contigs failed");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "chr1\t16\nchrM\t19\n"
    );
}

#[test]
fn test_cli_get() {
    let file = temp_twobit_file(&builder());
    let output = twobit_binary()
        .arg("get")
        .arg(file.path())
        .arg("chr1:6-13")
        .arg("M:0-3")
        .output()
        .expect("twobit get failed");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "GTNNNNAC\nGATC\n");
}

#[test]
fn test_cli_get_soft_masked_fasta() {
    let file = temp_twobit_file(&builder());
    let output = twobit_binary()
        .args(["get", "--soft-mask", "--fasta", "--width", "8"])
        .arg(file.path())
        .arg("chr1")
        .output()
        .expect("twobit get failed");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        ">chr1:0-15\nACGTACGT\nnnnnACGT\n"
    );
}

#[test]
fn test_cli_reports_errors() {
    let file = temp_twobit_file(&builder());

    let reversed = twobit_binary()
        .arg("get")
        .arg(file.path())
        .arg("chr1:9-2")
        .output()
        .expect("twobit get failed");
    assert!(!reversed.status.success());
    assert!(String::from_utf8_lossy(&reversed.stderr).contains("start > stop"));

    let missing = twobit_binary()
        .args(["get", "--no-aliases"])
        .arg(file.path())
        .arg("M:0-3")
        .output()
        .expect("twobit get failed");
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("'M'"));
}

#[test]
fn test_cli_empty_region_is_reported_not_fatal() {
    let file = temp_twobit_file(&builder());
    let output = twobit_binary()
        .arg("get")
        .arg(file.path())
        .arg("chrM:100-200")
        .output()
        .expect("twobit get failed");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no sequence available"));
}
