// Snapshot tests for the programs under tests/fixtures/programs
//
// Every NAME.py is run in a fresh interpreter and its transcript must match
// NAME.out exactly. Regenerate expectations with `pithon test --update`.

use pithon::fixtures::{fixture_programs, run_fixture};
use pithon::interpreter::InterpreterConfig;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn fixture_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/programs"))
}

#[test]
fn test_fixture_programs_match_snapshots() {
    let config = InterpreterConfig::default();
    let programs = fixture_programs(fixture_dir()).unwrap();
    assert!(!programs.is_empty(), "no fixture programs found");

    for program in programs {
        let expected_path = program.with_extension("out");
        let expected = fs::read_to_string(&expected_path)
            .unwrap_or_else(|_| panic!("missing snapshot {}", expected_path.display()));
        let actual = run_fixture(&program, &config).unwrap();
        assert_eq!(actual, expected, "transcript of {}", program.display());
    }
}

#[test]
fn test_fixture_programs_are_sorted_and_filtered() {
    let programs = fixture_programs(fixture_dir()).unwrap();
    let names: Vec<String> = programs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.iter().all(|name| name.ends_with(".py")));
    assert!(names.contains(&"function-2.py".to_string()));
}
