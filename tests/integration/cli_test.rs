use std::path::PathBuf;
use std::process::{Command, Output};

fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flashbeam"))
}

fn run(args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute flashbeam")
}

fn assert_success(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            stdout
        );
    }
    stdout
}

#[test]
fn test_cyclic_search_finds_cycle() {
    let output = run(&["cyclic", "--modulus", "7", "--beam-width", "500", "--flash-size", "50"]);
    let stdout = assert_success(&output);

    assert!(
        stdout.contains("Searching for relations in Z/7"),
        "Expected search header in output"
    );
    assert!(
        stdout.contains("Found 1 solution(s) (solved)"),
        "Expected one solution, got:\n{}",
        stdout
    );
    assert!(
        stdout.contains("[7] +1.+1.+1.+1.+1.+1.+1"),
        "Expected the full cycle as solution, got:\n{}",
        stdout
    );
    assert!(
        stdout.contains("Search Statistics:"),
        "Expected statistics block in output"
    );
}

#[test]
fn test_long_reid_search_runs() {
    let output = run(&[
        "long-reid",
        "--t",
        "9",
        "--beam-width",
        "20",
        "--flash-size",
        "4",
        "--max-iterations",
        "2",
        "--preview-len",
        "3",
        "--forbid",
        "a . b . ai . bi",
    ]);
    let stdout = assert_success(&output);

    assert!(stdout.contains("Long-Reid(t=9)"), "Expected group name in output");
    assert!(stdout.contains("Beam width: 20"), "Expected beam width echo");
    assert!(stdout.contains("Search Statistics:"), "Expected statistics block");
}

#[test]
fn test_quaternion_search_with_visited_limit() {
    let output = run(&[
        "quaternion",
        "--beam-width",
        "50",
        "--flash-size",
        "5",
        "--visited-limit",
        "limit:10",
    ]);
    let stdout = assert_success(&output);

    assert!(
        stdout.contains("No solution found (visited limit reached)"),
        "Expected visited limit termination, got:\n{}",
        stdout
    );
}

#[test]
fn test_portfolio_search() {
    let output = run(&[
        "cyclic",
        "--modulus",
        "5",
        "--beam-width",
        "200",
        "--workers",
        "2",
        "--seed",
        "3",
    ]);
    let stdout = assert_success(&output);

    assert!(stdout.contains("Workers: 2"), "Expected worker count echo");
    assert!(
        stdout.contains("distinct solution(s)"),
        "Expected portfolio solutions, got:\n{}",
        stdout
    );
    assert!(stdout.contains("Worker 1 (seed Some(4))"), "Expected derived worker seed");
}

#[test]
fn test_verify_relation() {
    let stdout = assert_success(&run(&["verify", "a . ai"]));
    assert!(stdout.contains("Reduced:  (length 0)"), "Expected empty reduction");
    assert!(stdout.contains("Relation: yes"), "a . ai should be a relation");

    let stdout = assert_success(&run(&["verify", "a . b . ai . bi"]));
    assert!(stdout.contains("Determinant: "), "Expected determinant line");
    assert!(stdout.contains("Relation: no"), "Commutator is not a relation");
}

#[test]
fn test_invalid_input_fails() {
    let output = run(&["verify", "a . c"]);
    assert!(!output.status.success(), "Unknown letter should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown generator label: 'c'"), "stderr: {}", stderr);

    let output = run(&["long-reid", "--t", "1"]);
    assert!(!output.status.success(), "t = 1 should be rejected");

    let output = run(&["cyclic", "--beam-width", "0"]);
    assert!(!output.status.success(), "Zero beam width should be rejected");
}
