use std::fs;

use transgen::{run, Config, Summary};

const LANG_FILE: &str = r"<?php

return array (
  'GREETING' =>
  array (
    1 => 'hello',
    2 => 'world',
  ),
  'EMPTY' =>
  array (
  ),
  'FAREWELL' =>
  array (
    9 => 'bye',
  ),
);
";

fn config(input: std::path::PathBuf, output: std::path::PathBuf) -> Config {
    Config {
        url: transgen::config::DEFAULT_URL.to_owned(),
        input: Some(input),
        output,
    }
}

#[test]
fn converts_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ageofempires.php");
    let output = dir.path().join("translations.rs");
    fs::write(&input, LANG_FILE).unwrap();

    let summary = run(&config(input, output.clone())).unwrap();
    let generated = fs::read_to_string(&output).unwrap();

    assert_eq!(
        summary,
        Summary {
            bytes_read: LANG_FILE.len(),
            bytes_written: generated.len(),
            output,
        }
    );
    let greeting = generated.find("GREETING_TRANS").unwrap();
    let farewell = generated.find("FAREWELL_TRANS").unwrap();
    assert!(greeting < farewell);
    assert!(!generated.contains("EMPTY"));
    assert!(generated.contains(r#""world""#));
}

#[test]
fn failed_fetch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("translations.rs");

    let err = run(&config(dir.path().join("missing.php"), output.clone())).unwrap_err();
    assert!(format!("{err:#}").contains("missing.php"), "{err:#}");
    assert!(!output.exists());
}

#[test]
fn reruns_overwrite_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ageofempires.php");
    let output = dir.path().join("translations.rs");
    fs::write(&input, LANG_FILE).unwrap();

    run(&config(input.clone(), output.clone())).unwrap();
    let first = fs::read_to_string(&output).unwrap();
    run(&config(input, output.clone())).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), first);
}
