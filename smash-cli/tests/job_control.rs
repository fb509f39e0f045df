// This file is part of smash, a small job-control shell.
// Copyright (C) 2026 smash contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Tests that run the shell binary with commands on its standard input.
//!
//! External utilities are run by `/bin/bash`, which must be available.

use assert_matches::assert_matches;
use nix::sys::signal::Signal;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::io::Write as _;
use std::path::Path;
use std::process::Child;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;
use std::thread::sleep;
use std::time::Duration;
use std::time::Instant;

const BIN: &str = env!("CARGO_BIN_EXE_smash");

/// Time given to the shell to start a foreground command
const STARTUP_DELAY: Duration = Duration::from_millis(500);

/// Starts the shell in `dir` with piped standard input and output.
fn spawn_in(dir: &Path) -> Child {
    Command::new(BIN)
        .arg("--no-prompt")
        .current_dir(dir)
        .env_remove("SMASH_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn feed(child: &mut Child, input: &str) {
    let stdin = child.stdin.as_mut().unwrap();
    stdin.write_all(input.as_bytes()).unwrap();
    stdin.flush().unwrap();
}

/// Sends the signal to the shell process.
fn signal_shell(child: &Child, signal: Signal) {
    let pid = Pid::from_raw(child.id().try_into().unwrap());
    kill(pid, signal).unwrap();
}

/// Runs the shell in `dir` with the input and waits for it to exit.
fn run_in(dir: &Path, input: &str) -> Output {
    let mut child = spawn_in(dir);
    feed(&mut child, input);
    drop(child.stdin.take());
    child.wait_with_output().unwrap()
}

fn run(input: &str) -> Output {
    run_in(&std::env::temp_dir(), input)
}

fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

fn stderr(output: &Output) -> &str {
    std::str::from_utf8(&output.stderr).unwrap()
}

#[test]
fn redirection_writes_file_and_keeps_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), "echo hi > out.txt\necho after\n");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "after\n");
    let content = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(content, "hi\n");
}

#[test]
fn append_redirection() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), "echo one >> log\necho two >> log\n");

    assert!(output.status.success(), "{output:?}");
    let content = std::fs::read_to_string(dir.path().join("log")).unwrap();
    assert_eq!(content, "one\ntwo\n");
}

#[test]
fn pipeline_connects_commands() {
    let output = run("echo hello | tr a-z A-Z\n");
    assert_eq!(stdout(&output), "HELLO\n");
}

#[test]
fn builtin_on_left_side_of_pipeline() {
    let output = run("showpid | tr a-z A-Z\n");
    let text = stdout(&output);
    assert!(text.starts_with("SMASH PID IS "), "{text}");
}

#[test]
fn background_job_is_listed_once() {
    let output = run("sleep 30 &\njobs\nquit kill\n");

    assert!(output.status.success(), "{output:?}");
    let lines: Vec<&str> = stdout(&output).lines().collect();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].starts_with("[1] sleep 30 & : "), "{lines:?}");
    assert!(lines[0].ends_with(" secs"), "{lines:?}");
    assert!(!lines[0].contains("(stopped)"), "{lines:?}");
    assert!(lines[1].ends_with(": sleep 30 &"), "{lines:?}");
}

#[test]
fn kill_removes_job() {
    let output = run("sleep 30 &\nkill -9 1\njobs\n");

    let lines: Vec<&str> = stdout(&output).lines().collect();
    assert_matches!(lines.as_slice(), [line] => {
        assert!(line.starts_with("signal number 9 was sent to pid "), "{line}")
    });
}

#[test]
fn fg_without_jobs() {
    let output = run("fg\n");
    assert_eq!(stderr(&output), "smash error: fg: jobs list is empty\n");
}

#[test]
fn quit_exits_before_remaining_input() {
    let output = run("quit\necho unreachable\n");
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "");
}

#[test]
fn cd_and_pwd() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap();
    let input = format!("cd {}\npwd\ncd -\ncd -\npwd\n", path.display());

    let output = run_in(&std::env::temp_dir(), &input);

    let expected = format!("{0}\n{0}\n", path.display());
    assert_eq!(stdout(&output), expected);
}

#[test]
fn exit_status_of_last_command() {
    let output = run("bash -c 'exit 3'\n");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn failed_command_does_not_end_shell() {
    let output = run("no-such-command-for-smash\necho still here\n");
    assert_eq!(stdout(&output), "still here\n");
    assert!(stderr(&output).contains("no-such-command-for-smash"));
}

#[test]
fn invalid_option() {
    let output = Command::new(BIN).arg("--bogus").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "smash: unknown option '--bogus'\n");
}

#[test]
fn ctrl_z_stops_foreground_process_and_bg_resumes_it() {
    let mut shell = spawn_in(&std::env::temp_dir());
    feed(&mut shell, "sleep 30\n");
    sleep(STARTUP_DELAY);
    signal_shell(&shell, Signal::SIGTSTP);
    feed(&mut shell, "jobs\nbg\njobs\nquit kill\n");
    drop(shell.stdin.take());
    let output = shell.wait_with_output().unwrap();

    assert!(output.status.success(), "{output:?}");
    let lines: Vec<&str> = stdout(&output).lines().collect();
    assert_eq!(lines.len(), 6, "{lines:?}");
    assert_eq!(lines[0], "smash: got ctrl-Z");
    let pid = lines[1]
        .strip_prefix("smash: process ")
        .and_then(|rest| rest.strip_suffix(" was stopped"))
        .unwrap_or_else(|| panic!("{lines:?}"));
    let listed = format!("[1] sleep 30 : {pid} ");
    assert!(lines[2].starts_with(&listed), "{lines:?}");
    assert!(lines[2].ends_with(" secs (stopped)"), "{lines:?}");
    assert_eq!(lines[3], format!("{pid}: sleep 30"));
    assert!(lines[4].starts_with(&listed), "{lines:?}");
    assert!(lines[4].ends_with(" secs"), "{lines:?}");
    assert_eq!(lines[5], format!("{pid}: sleep 30"));
}

#[test]
fn ctrl_c_kills_foreground_process_only() {
    let mut shell = spawn_in(&std::env::temp_dir());
    feed(&mut shell, "sleep 30\n");
    sleep(STARTUP_DELAY);
    signal_shell(&shell, Signal::SIGINT);
    feed(&mut shell, "jobs\necho still here\n");
    drop(shell.stdin.take());
    let output = shell.wait_with_output().unwrap();

    assert!(output.status.success(), "{output:?}");
    let lines: Vec<&str> = stdout(&output).lines().collect();
    assert_matches!(lines.as_slice(), [banner, killed, after] => {
        assert_eq!(*banner, "smash: got ctrl-C");
        assert!(killed.starts_with("smash: process "), "{lines:?}");
        assert!(killed.ends_with(" was killed"), "{lines:?}");
        assert_eq!(*after, "still here");
    });
}

#[test]
fn background_redirection_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), "echo hi > out.txt &\n");
    assert!(output.status.success(), "{output:?}");

    // The shell does not wait for the background job.
    let path = dir.path().join("out.txt");
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        if content == "hi\n" || Instant::now() > deadline {
            assert_eq!(content, "hi\n");
            break;
        }
        sleep(Duration::from_millis(50));
    }
}

#[test]
fn jobs_in_background_lists_existing_jobs() {
    let output = run("sleep 30 &\njobs &\nsleep 1\nquit kill\n");

    assert!(output.status.success(), "{output:?}");
    let lines: Vec<&str> = stdout(&output).lines().collect();
    assert!(!lines.is_empty(), "{output:?}");
    assert!(lines[0].starts_with("[1] sleep 30 & : "), "{lines:?}");
    assert!(!lines[0].contains("(stopped)"), "{lines:?}");
    assert!(lines.last().unwrap().ends_with(": sleep 30 &"), "{lines:?}");
}

#[test]
fn pipeline_merging_stderr_feeds_right_side() {
    let output = run("ls /smash-missing-dir |& grep -c smash-missing-dir\n");
    assert_eq!(stdout(&output), "1\n");
    assert_eq!(stderr(&output), "");
}
