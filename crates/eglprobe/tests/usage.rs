//! Exit-code contract of the binary, checked without touching a real
//! EGL implementation: argument handling runs before any driver loading.

use std::process::Command;

fn eglprobe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_eglprobe"))
}

#[test]
fn unrecognized_flag_exits_1_with_usage() {
    let output = eglprobe().arg("--foo").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "no usage in: {stderr}");
}

#[test]
fn malformed_version_exits_1() {
    let output = eglprobe().args(["--opengl-version", "latest"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_0() {
    let output = eglprobe().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--opengl-version"));
}
