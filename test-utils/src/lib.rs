use std::{
    error::Error,
    io::{self, Write},
    path::Path,
    process::{Command, Output, Stdio},
    str,
};

const REMARK_PATH: &str = "./target/debug/remark";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_interpreter(src_path: &Path) -> Result<Output, io::Error> {
    Command::new(REMARK_PATH).arg(src_path).output()
}

fn run_interpreter_with_stdin(args: &[&str], input: &str) -> Result<Output, io::Error> {
    let mut child = Command::new(REMARK_PATH)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(input.as_bytes())?;
    }

    child.wait_with_output()
}

/// Evaluate a program file and compare exact stdout/stderr.
pub fn check_evaluation(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "remark exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Evaluate a program piped through stdin (`remark -`).
pub fn check_evaluation_from_stdin(source: &str, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter_with_stdin(&["-"], source)?;

    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "remark exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Feed lines to the REPL and compare exact stdout (prompts included).
pub fn check_repl_session(input: &str, expected_stdout: &str) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter_with_stdin(&["--repl"], input)?;

    assert_eq!(str::from_utf8(&output.stdout)?, expected_stdout);
    assert!(
        output.status.success(),
        "remark exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Feed lines to the REPL where some of them fail; only require that the
/// session stays alive and the good lines still produce their output.
pub fn check_repl_recovers(input: &str, expected_tail: &str) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter_with_stdin(&["--repl"], input)?;

    let stdout = str::from_utf8(&output.stdout)?;
    assert!(
        stdout.contains(expected_tail),
        "expected {expected_tail:?} within {stdout:?}"
    );
    assert!(
        output.status.success(),
        "remark exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// A program with a lex or parse error must exit with status 1.
pub fn check_failing_parse(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    assert_eq!(
        output.status.code(),
        Some(1),
        "remark should exit with status 1 on a parse error"
    );

    Ok(())
}
