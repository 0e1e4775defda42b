use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const EXPECTED_FILE: &str = r#"Date,Amount,Category,Description
03/22/2025,45.99,Groceries,Weekly shopping at Kroger
03/23/2025,10.0,Food,"Lunch, with team"
03/24/2025,20.0,Food,Dinner
"#;

const INPUT: &str = "1
03/22/2025
45.99
Groceries
Weekly shopping at Kroger
1
13/40/2025
03/23/2025
-5
10
Food
Lunch, with team
add
03/24/2025
$20
Food
Dinner
7
2
3
4
";

/// Runs the binary in `dir` with `input` piped to stdin.
fn run_tracker(dir: &Path, input: &[u8]) -> Output {
    let bin_path = env!("CARGO_BIN_EXE_expense_tracker");

    let mut child = Command::new(bin_path)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute binary");

    // the binary may exit before reading everything, e.g. on a fatal load error
    let mut stdin = child.stdin.take().expect("stdin is piped");
    let _ = stdin.write_all(input);
    drop(stdin);

    child.wait_with_output().expect("Failed to wait for binary")
}

#[test]
fn test_session_persists_and_reports() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");

    let output = run_tracker(dir.path(), INPUT.as_bytes());
    assert!(
        output.status.success(),
        "Binary failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No existing expense file found. Starting fresh."));
    assert!(stdout.contains("Invalid date format or impossible date: 13/40/2025"));
    assert!(stdout.contains("Amount must be greater than zero."));
    assert!(stdout.contains("Invalid choice. Please try again."));
    assert!(stdout.contains("Food: $30.00"));
    assert!(stdout.contains("Groceries: $45.99"));
    assert!(stdout.contains("Total Spent: $75.99"));
    assert!(stdout.contains("Highest Expense: $45.99 for Groceries on 03/22/2025 (Weekly shopping at Kroger)"));
    assert!(stdout.contains("Exiting program. Goodbye!"));

    let saved = fs::read_to_string(dir.path().join("expenses.csv")).expect("expenses.csv was not written");
    assert_eq!(saved, EXPECTED_FILE);
}

#[test]
fn test_reloads_existing_file() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    fs::write(dir.path().join("expenses.csv"), EXPECTED_FILE).expect("Failed to seed expenses.csv");

    let output = run_tracker(dir.path(), b"2\n4\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded 3 expenses from file."));
    assert!(stdout.contains("Total Spent: $75.99"));

    let saved = fs::read_to_string(dir.path().join("expenses.csv")).expect("expenses.csv was not written");
    assert_eq!(saved, EXPECTED_FILE);
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let corrupt = "Date,Amount,Category,Description\n03/22/2025,not-a-number,Food,Lunch\n";
    fs::write(dir.path().join("expenses.csv"), corrupt).expect("Failed to seed expenses.csv");

    let output = run_tracker(dir.path(), b"4\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error loading expenses"));

    // the file is left untouched
    let saved = fs::read_to_string(dir.path().join("expenses.csv")).expect("expenses.csv disappeared");
    assert_eq!(saved, corrupt);
}

#[test]
fn test_non_utf8_input_does_not_end_session() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");

    let output = run_tracker(dir.path(), b"\xff\xfe\n1\n03/22/2025\n\xff\n12\nFood\nSnack\n4\n");
    assert!(
        output.status.success(),
        "Binary failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid choice. Please try again."));
    assert!(stdout.contains("Exiting program. Goodbye!"));

    let saved = fs::read_to_string(dir.path().join("expenses.csv")).expect("expenses.csv was not written");
    assert_eq!(saved, "Date,Amount,Category,Description\n03/22/2025,12.0,Food,Snack\n");
}

#[test]
fn test_closed_stdout_is_reported() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");

    let mut child = Command::new(env!("CARGO_BIN_EXE_expense_tracker"))
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute binary");

    // nobody reads stdout, so the binary's next write after the exit choice fails
    drop(child.stdout.take());
    let mut stdin = child.stdin.take().expect("stdin is piped");
    let _ = stdin.write_all(b"4\n");
    drop(stdin);

    let output = child.wait_with_output().expect("Failed to wait for binary");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error reading input or writing output"));
}
