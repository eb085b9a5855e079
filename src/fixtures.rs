// File: src/fixtures.rs
//
// Snapshot test runner for Pithon programs.
// Each `NAME.py` in a fixture directory is run in a fresh interpreter and its
// transcript (everything it prints, plus a final `Kind: message` line if
// evaluation fails) is compared byte for byte with `NAME.out`.

use crate::interpreter::{Interpreter, InterpreterConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Default fixture directory used by `pithon test`
pub const DEFAULT_FIXTURE_DIR: &str = "tests/fixtures/programs";

/// Result of a whole fixture run
#[derive(Debug, Default)]
pub struct FixtureSummary {
    pub passed: usize,
    pub failed: Vec<PathBuf>,
}

impl FixtureSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `source` in a fresh interpreter and returns what it printed.
/// An evaluation error ends the transcript with its one-line description.
pub fn transcript(source: &str, config: &InterpreterConfig) -> String {
    let mut interp = Interpreter::with_config(config.clone());
    let buffer = Arc::new(Mutex::new(Vec::new()));
    interp.set_output(buffer.clone());

    let outcome = interp.run_source(source);

    let mut output = {
        let lock = buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&lock).into_owned()
    };
    if let Err(err) = outcome {
        output.push_str(&err.describe());
        output.push('\n');
    }
    output
}

/// Reads and runs one fixture program
pub fn run_fixture(path: &Path, config: &InterpreterConfig) -> io::Result<String> {
    let source = fs::read_to_string(path)?;
    Ok(transcript(&source, config))
}

/// Every `*.py` file directly inside `dir`, sorted by name
pub fn fixture_programs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut programs: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "py").unwrap_or(false))
        .collect();
    programs.sort();
    Ok(programs)
}

/// Runs every fixture in `dir`, printing one line per program and a total.
///
/// With `update_snapshots` (or when a `.out` file is missing) the actual
/// transcript is written as the new expectation.
pub fn run_fixtures(
    dir: &Path,
    update_snapshots: bool,
    config: &InterpreterConfig,
) -> io::Result<FixtureSummary> {
    let mut summary = FixtureSummary::default();

    for path in fixture_programs(dir)? {
        let expected_path = path.with_extension("out");
        let start = Instant::now();

        let actual = match run_fixture(&path, config) {
            Ok(actual) => actual,
            Err(err) => {
                println!("[✗] {} (unreadable: {})", path.display(), err);
                summary.failed.push(path);
                continue;
            }
        };

        let expected = if expected_path.exists() && !update_snapshots {
            fs::read_to_string(&expected_path)?
        } else {
            fs::write(&expected_path, &actual)?;
            tracing::debug!(path = %expected_path.display(), "snapshot written");
            actual.clone()
        };

        if actual == expected {
            println!("[✓] {} ({:.2?})", path.display(), start.elapsed());
            summary.passed += 1;
        } else {
            println!("[✗] {}", path.display());
            println!("Expected:\n{}\nGot:\n{}\n", expected, actual);
            summary.failed.push(path);
        }
    }

    tracing::debug!(passed = summary.passed, total = summary.total(), "fixture run finished");
    println!("\n[✓] Passed {}/{} tests", summary.passed, summary.total());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_captures_prints() {
        let out = transcript("print(1)\nprint('two')\n", &InterpreterConfig::default());
        assert_eq!(out, "1\ntwo\n");
    }

    #[test]
    fn test_transcript_ends_with_error_line() {
        let out = transcript("print(1)\nprint(1 / 0)\nprint(2)\n", &InterpreterConfig::default());
        assert_eq!(out, "1\nZeroDivisionError: division by zero\n");
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let out = transcript("x = (1\n", &InterpreterConfig::default());
        assert!(out.starts_with("SyntaxError: "));
    }

    #[test]
    fn test_run_fixtures_writes_missing_snapshots_then_compares() {
        let dir = std::env::temp_dir().join(format!("pithon-fixtures-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.py"), "print(40 + 2)\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let config = InterpreterConfig::default();
        let first = run_fixtures(&dir, false, &config).unwrap();
        assert_eq!(first.total(), 1);
        assert_eq!(fs::read_to_string(dir.join("a.out")).unwrap(), "42\n");

        fs::write(dir.join("a.out"), "41\n").unwrap();
        let second = run_fixtures(&dir, false, &config).unwrap();
        assert!(!second.all_passed());

        let third = run_fixtures(&dir, true, &config).unwrap();
        assert!(third.all_passed());

        fs::remove_dir_all(&dir).unwrap();
    }
}
