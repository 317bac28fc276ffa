// Snapshot tests for the programs under tests/programs
//
// Every .simpl program is run and its rendered output compared with the
// checked-in .out file, the same way `simpl test` does from the command line.

use simpl::test_runner::{render_program, run_directory};
use std::fs;
use std::path::{Path, PathBuf};

fn programs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("programs")
}

#[test]
fn test_all_program_snapshots_match() {
    let report = run_directory(&programs_dir(), false).unwrap();
    assert!(report.total() > 0, "no .simpl programs found");
    for result in report.results.iter().filter(|r| !r.passed) {
        panic!(
            "snapshot mismatch for {}\nexpected:\n{}\ngot:\n{}",
            result.path.display(),
            result.expected,
            result.actual
        );
    }
    assert!(report.all_passed());
}

#[test]
fn test_demo_program_output() {
    let source = fs::read_to_string(programs_dir().join("demo.simpl")).unwrap();
    assert_eq!(render_program(&source), "22\n20");
}

#[test]
fn test_missing_snapshot_is_written_then_matched() {
    let name = format!("simpl-snapshots-{}", std::process::id());
    let dir = std::env::temp_dir().join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("fresh.simpl"), "let x = 6; print x * 7;").unwrap();
    fs::write(dir.join("notes.txt"), "not a program").unwrap();

    let first = run_directory(&dir, false).unwrap();
    assert_eq!(first.total(), 1);
    assert!(first.all_passed());
    assert_eq!(fs::read_to_string(dir.join("fresh.out")).unwrap(), "42\n");

    fs::write(dir.join("fresh.out"), "41\n").unwrap();
    let stale = run_directory(&dir, false).unwrap();
    assert_eq!(stale.failed(), 1);

    let updated = run_directory(&dir, true).unwrap();
    assert!(updated.all_passed());
    assert_eq!(fs::read_to_string(dir.join("fresh.out")).unwrap(), "42\n");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let missing = Path::new("definitely/not/here");
    assert!(run_directory(missing, false).is_err());
}
