//! Integration tests for the cauldron engine binary.
//!
//! Spawns the engine process, pipes turn input via stdin, and verifies the
//! command lines on stdout and the exit status.

use std::io::{BufRead, Write};
use std::process::{Command, Output, Stdio};

/// Runs the engine over `input` with extra `args` and returns its output.
fn run_engine_raw(args: &[&str], input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_cauldron");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start cauldron");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).unwrap();
    stdin.flush().unwrap();
    drop(stdin);

    child.wait_with_output().expect("failed to wait on child")
}

/// Runs the engine in quiet mode and collects stdout lines, asserting a
/// clean exit.
fn run_engine(input: &str) -> Vec<String> {
    let output = run_engine_raw(&["--quiet"], input);
    assert!(output.status.success(), "engine failed: {:?}", output);
    output.stdout.as_slice().lines().map(|l| l.unwrap()).collect()
}

/// One affordable order and no spells.
const BREW_TURN: &str = "\
1
44 BREW -2 -2 0 0 5 0 0 0 0
3 3 0 0 0
3 0 0 0 0
";

/// Nothing affordable; one ready spell that supplies the missing tier.
const CAST_TURN: &str = "\
2
44 BREW -2 0 0 0 5 0 0 0 0
78 CAST 3 0 0 0 0 -1 -1 1 0
0 0 0 0 0
0 0 0 0 0
";

/// Nothing affordable and every spell exhausted.
const REST_TURN: &str = "\
3
44 BREW 0 0 -2 0 5 0 0 0 0
78 CAST 2 0 0 0 0 -1 -1 0 0
79 CAST -1 1 0 0 0 -1 -1 0 0
0 0 0 0 0
0 0 0 0 0
";

#[test]
fn affordable_order_is_brewed() {
    assert_eq!(run_engine(BREW_TURN), vec!["BREW 44"]);
}

#[test]
fn needed_spell_is_cast() {
    assert_eq!(run_engine(CAST_TURN), vec!["CAST 78"]);
}

#[test]
fn exhausted_spells_mean_rest() {
    assert_eq!(run_engine(REST_TURN), vec!["REST"]);
}

#[test]
fn one_line_per_turn_until_input_ends() {
    let input = format!("{}{}{}", BREW_TURN, CAST_TURN, REST_TURN);
    assert_eq!(run_engine(&input), vec!["BREW 44", "CAST 78", "REST"]);
}

#[test]
fn empty_input_exits_cleanly() {
    assert!(run_engine("").is_empty());
}

#[test]
fn diagnostics_report_brew_counts() {
    let after_brew = "\
0
1 1 0 0 5
3 0 0 0 2
";
    let output = run_engine_raw(&[], &format!("{}{}", BREW_TURN, after_brew));
    assert!(output.status.success());
    let lines: Vec<String> = output.stdout.as_slice().lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines[0], "BREW 44 ME: 0 VS OPNT: 0");
    assert_eq!(lines[1], "REST ME: 1 VS OPNT: 1");
}

#[test]
fn learn_is_fatal() {
    let learn = "\
1
30 LEARN 0 0 1 0 0 0 0 1 0
0 0 0 0 0
0 0 0 0 0
";
    let output = run_engine_raw(&["--quiet"], &format!("{}{}", BREW_TURN, learn));
    assert!(!output.status.success());
    let lines: Vec<String> = output.stdout.as_slice().lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines, vec!["BREW 44"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LEARN"), "stderr: {}", stderr);
}

#[test]
fn unknown_action_type_is_fatal() {
    let bogus = "\
1
5 WAIT 0 0 0 0 0 0 0 0 0
0 0 0 0 0
0 0 0 0 0
";
    let output = run_engine_raw(&["--quiet"], bogus);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WAIT"), "stderr: {}", stderr);
}

#[test]
fn truncated_turn_is_fatal() {
    let output = run_engine_raw(&["--quiet"], "1\n44 BREW -2 -2 0 0 5 0 0 0 0\n");
    assert!(!output.status.success());
}
