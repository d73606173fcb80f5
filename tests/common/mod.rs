//! Shared test helpers for stablecheck integration tests.
//!
//! CLI tests run the real binary inside a temp directory so that no
//! `stablecheck.toml` from the developer's checkout leaks in.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Fresh empty working directory.
pub fn workdir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Run stablecheck with the given args in the given directory.
pub fn stablecheck_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stablecheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("STABLECHECK_SEED")
        .env_remove("STABLECHECK_LOG")
        .output()
        .expect("failed to execute stablecheck")
}

/// Run stablecheck and assert it exits 0. Returns stdout as string.
pub fn stablecheck_ok(dir: &Path, args: &[&str]) -> String {
    let out = stablecheck_in(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "stablecheck {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run stablecheck and assert it exits with `code`. Returns (stdout, stderr).
pub fn stablecheck_exit(dir: &Path, args: &[&str], code: i32) -> (String, String) {
    let out = stablecheck_in(dir, args);
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert_eq!(
        out.status.code(),
        Some(code),
        "stablecheck {}: unexpected exit status\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    (stdout, stderr)
}

/// Write `contents` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}
