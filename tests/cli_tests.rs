//! End-to-end tests of the `isignify` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_fasta(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn isignify() -> Command {
    Command::cargo_bin("isignify").unwrap()
}

#[test]
fn test_help() {
    isignify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("find"))
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_find_text_output() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nAAATTTGGGCCC\n");
    let background = write_fasta(dir.path(), "background.fna", ">b1\nAAACCC\n");

    isignify()
        .args(["find", "-k", "3", "--target"])
        .arg(&target)
        .arg("--background")
        .arg(&background)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Analysis complete. Found 1 unique signature(s) using a k-mer size of 3.",
        ))
        .stdout(predicate::str::contains("AATTTGGGCC"));
}

#[test]
fn test_find_json_output() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nAAAGATTACACCC\n");
    let background = write_fasta(dir.path(), "background.fna", ">b1\nAAACCC\n");

    let output = isignify()
        .args(["find", "-k", "4", "--format", "json", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&background)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["signature_count"], 1);
    assert_eq!(json["signatures"][0]["sequence_id"], ">t1");
    assert_eq!(json["signatures"][0]["start"], 0);
    assert_eq!(json["signatures"][0]["end"], 12);
    assert_eq!(json["signatures"][0]["sequence"], "AAAGATTACACC");
}

#[test]
fn test_find_tsv_output() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nAAAGATTACACCC\n");
    let background = write_fasta(dir.path(), "background.fna", ">b1\nAAACCC\n");

    isignify()
        .args(["find", "-k", "4", "-f", "tsv", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&background)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "sequence_id\tstart\tend\tlength\tsequence\n",
        ))
        .stdout(predicate::str::contains(">t1\t0\t12\t12\tAAAGATTACACC\n"));
}

#[test]
fn test_find_multiple_backgrounds() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nAAAACCCCGGGG\n");
    let first = write_fasta(dir.path(), "b1.fna", ">b1\nAAAACC\n");
    let second = write_fasta(dir.path(), "b2.fna", ">b2\nCCGGGG\n");

    isignify()
        .args(["find", "-k", "4", "-f", "tsv", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains(">t1\t3\t9\t6\tACCCCG"));
}

#[test]
fn test_find_identical_genomes() {
    let dir = TempDir::new().unwrap();
    let genome = write_fasta(dir.path(), "genome.fna", ">g\nACGTTGCAACGT\n");

    isignify()
        .args(["find", "-k", "3", "-t"])
        .arg(&genome)
        .arg("-b")
        .arg(&genome)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 unique signature(s)"))
        .stdout(predicate::str::contains("No unique signatures found."));
}

#[test]
fn test_find_rejects_invalid_kmer_size() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nACGT\n");

    for k in ["0", "-2"] {
        isignify()
            .args(["find", "-k", k, "-t"])
            .arg(&target)
            .arg("-b")
            .arg(&target)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid k-mer size"));
    }
}

#[test]
fn test_find_requires_background() {
    let dir = TempDir::new().unwrap();
    let target = write_fasta(dir.path(), "target.fna", ">t1\nACGT\n");

    isignify()
        .args(["find", "-k", "3", "-t"])
        .arg(&target)
        .assert()
        .failure();
}

#[test]
fn test_find_missing_target_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let background = write_fasta(dir.path(), "background.fna", ">b1\nACGT\n");

    isignify()
        .args(["find", "-k", "3", "-t"])
        .arg(dir.path().join("missing.fna"))
        .arg("-b")
        .arg(&background)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 unique signature(s)"));
}

#[test]
fn test_normalize_merges_contigs() {
    let dir = TempDir::new().unwrap();
    let input = write_fasta(
        dir.path(),
        "assembly.fna",
        ">c1 first\nACGT\n>c2\nGGGG\n>c3\nTTTT\n",
    );
    let output = dir.path().join("merged.fna");

    isignify()
        .arg("normalize")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let merged = fs::read_to_string(&output).unwrap();
    assert!(merged.starts_with(">c1 first\n"));
    assert_eq!(merged.matches('>').count(), 1);

    let sequence: String = merged.lines().skip(1).collect();
    assert_eq!(sequence.len(), 12 + 200);
    assert_eq!(sequence.matches('N').count(), 200);
    assert!(sequence.starts_with("ACGTN"));
    assert!(sequence.ends_with("NTTTT"));
}

#[test]
fn test_normalize_single_record_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_fasta(dir.path(), "single.fna", ">only\nACGTACGT\n");

    isignify()
        .args(["--verbose", "normalize"])
        .arg(&input)
        .assert()
        .success()
        .stdout(">only\nACGTACGT\n")
        .stderr(predicate::str::contains("no changes needed"));
}
