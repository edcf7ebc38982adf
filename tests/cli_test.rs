mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{BOARD, script};
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_cli_first_pair() {
    let file = script(&["start,", "tap,0", "tap,3", "exit,"]);

    let mut cmd = Command::new(cargo_bin!("square-game"));
    cmd.arg(file.path()).arg("--layout").arg(BOARD).arg("--manual-clock");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"phase\":\"start\""))
        .stdout(predicate::str::contains("\"phase\":\"playing\""))
        .stdout(predicate::str::contains("\"matched\":[0,3]"))
        .stdout(predicate::str::contains("\"message\":\"Correct Selection!\""));
}

#[test]
fn test_cli_time_out() {
    let mut rows = vec!["start,"];
    rows.extend(std::iter::repeat_n("tick,", 30));
    let file = script(&rows);

    let mut cmd = Command::new(cargo_bin!("square-game"));
    cmd.arg(file.path()).arg("--manual-clock").arg("--seed").arg("3");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"time_remaining_seconds\":1,"))
        .stdout(predicate::str::contains("\"message\":\"Time's Up!\""));
}

#[test]
fn test_cli_reads_stdin() {
    let mut cmd = assert_cmd::Command::new(cargo_bin!());
    cmd.arg("--manual-clock")
        .write_stdin("event,value\nguidelines,\nback,\nscoreboard,\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"phase\":\"guidelines\""))
        .stdout(predicate::str::contains("Match the colors to score points."))
        .stdout(predicate::str::contains("Try to beat your high score!"))
        .stdout(predicate::str::contains("\"phase\":\"scoreboard\""));
}

#[test]
fn test_cli_completion_returns_to_start() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "completion_delay_ms = 50").unwrap();
    writeln!(config, "auto_tick = false").unwrap();

    let file = script(&[
        "start,", "tap,0", "tap,3", "tap,1", "tap,4", "tap,2", "tap,5", "tap,6", "tap,7",
        "wait,500", "exit,",
    ]);

    let mut cmd = Command::new(cargo_bin!("square-game"));
    cmd.arg(file.path())
        .arg("--layout")
        .arg(BOARD)
        .arg("--config")
        .arg(config.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let last = text.lines().last().unwrap();

    assert!(text.contains("Congratulations! You found all the pairs!"));
    assert!(last.contains("\"phase\":\"start\""));
    assert!(last.contains("\"high_score\":4"));
    assert!(last.contains("\"score\":0"));
}

#[test]
fn test_cli_exit_stops_reading() {
    let file = script(&["exit,", "start,"]);

    let mut cmd = Command::new(cargo_bin!("square-game"));
    cmd.arg(file.path()).arg("--manual-clock");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"phase\":\"playing\"").not());
}
