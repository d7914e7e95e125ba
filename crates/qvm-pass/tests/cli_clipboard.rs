#![cfg(unix)]

//! Clipboard flows against a scripted `xclip`: the copy path of `show` and
//! `generate`, and the compare-and-swap behavior of the deferred clear.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/qvm-pass-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn install_qrexec_stub(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
n=$(cat "$STUB_DIR/count" 2>/dev/null || echo 0)
n=$((n + 1))
echo "$n" > "$STUB_DIR/count"
printf '%s\n' "$@" > "$STUB_DIR/argv.$n"
cat > "$STUB_DIR/input.$n"
cat "$STUB_DIR/reply.$n"
"#;
    let path = dir.join("qrexec-client-vm");
    fs::write(&path, script).expect("stub should be writable");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("stub should be executable");
}

/// A fake `xclip` backed by a plain file. `-o` reads it, anything else
/// writes it; every call logs its argv for selection assertions.
fn install_xclip_stub(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
printf '%s\n' "$@" >> "$STUB_DIR/xclip.log"
mode=copy
for arg in "$@"; do
    [ "$arg" = "-o" ] && mode=paste
done
if [ "$mode" = "paste" ]; then
    cat "$STUB_DIR/clipfile" 2>/dev/null || :
else
    cat > "$STUB_DIR/clipfile"
fi
"#;
    let path = dir.join("xclip");
    fs::write(&path, script).expect("xclip stub should be writable");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("xclip stub should be executable");
}

fn reply(echoed: &[&str], code: i32, stdout: &str, stderr: &str) -> String {
    serde_json::json!({
        "a": echoed,
        "r": code,
        "o": STANDARD.encode(stdout),
        "e": STANDARD.encode(stderr),
    })
    .to_string()
}

fn stage_reply(dir: &Path, n: u32, content: &str) {
    fs::write(dir.join(format!("reply.{n}")), content).expect("reply should be writable");
}

fn clipboard_contents(dir: &Path) -> String {
    fs::read_to_string(dir.join("clipfile")).expect("clipboard file should exist")
}

fn cli_command(dir: &Path) -> Command {
    let path = format!(
        "{}:{}",
        dir.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let mut command = Command::new(env!("CARGO_BIN_EXE_qvm-pass"));
    command
        .env("PATH", path)
        .env("STUB_DIR", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .env_remove("PASSWORD_STORE_CLIP_TIME")
        .env_remove("PASSWORD_STORE_X_SELECTION")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

fn run_with_stdin(command: &mut Command, stdin: Option<&str>) -> Output {
    command.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = command.spawn().expect("binary should start");
    if let Some(input) = stdin {
        use std::io::Write;
        let mut pipe = child.stdin.take().expect("stdin should be piped");
        pipe.write_all(input.as_bytes())
            .expect("stdin should accept input");
    }
    child.wait_with_output().expect("binary should finish")
}

#[test]
fn show_clip_copies_the_first_line_by_default() {
    let dir = unique_temp_dir("clip-first");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(
        &dir,
        1,
        &reply(
            &["pass", "show", "web/mail"],
            0,
            "s3cret\nuser: alice\n",
            "",
        ),
    );

    let output = run_with_stdin(cli_command(&dir).args(["show", "-c", "web/mail"]), None);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Copied web/mail to clipboard. Will clear in 45 seconds.\n"
    );
    assert_eq!(clipboard_contents(&dir), "s3cret");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn show_clip_selects_the_requested_line() {
    let dir = unique_temp_dir("clip-line");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(
        &dir,
        1,
        &reply(
            &["pass", "show", "web/mail"],
            0,
            "s3cret\nuser: alice\n",
            "",
        ),
    );

    let output = run_with_stdin(
        cli_command(&dir).args(["show", "--clip=2", "web/mail"]),
        None,
    );

    assert!(output.status.success());
    assert_eq!(clipboard_contents(&dir), "user: alice");
    // The clip flags never travel to the vault.
    let request: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.join("input.1")).expect("input should be recorded"))
            .expect("request should be json");
    assert_eq!(request["a"], serde_json::json!(["show", "web/mail"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_line_reports_and_still_succeeds() {
    let dir = unique_temp_dir("clip-missing");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(
        &dir,
        1,
        &reply(
            &["pass", "show", "web/mail"],
            0,
            "s3cret\nuser: alice\n",
            "",
        ),
    );

    let output = run_with_stdin(
        cli_command(&dir).args(["show", "--clip=99", "web/mail"]),
        None,
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "There is no password to put on the clipboard at line 98.\n"
    );
    assert!(!dir.join("clipfile").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn clip_countdown_comes_from_the_environment() {
    let dir = unique_temp_dir("clip-time");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(&dir, 1, &reply(&["pass", "show", "web/mail"], 0, "s3cret\n", ""));

    let output = run_with_stdin(
        cli_command(&dir)
            .args(["show", "-c", "web/mail"])
            .env("PASSWORD_STORE_CLIP_TIME", "7"),
        None,
    );

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Will clear in 7 seconds."));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn garbage_clip_countdown_is_fatal() {
    let dir = unique_temp_dir("clip-time-bad");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(&dir, 1, &reply(&["pass", "show", "web/mail"], 0, "s3cret\n", ""));

    let output = run_with_stdin(
        cli_command(&dir)
            .args(["show", "-c", "web/mail"])
            .env("PASSWORD_STORE_CLIP_TIME", "soon"),
        None,
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Invalid value for PASSWORD_STORE_CLIP_TIME: soon"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn selection_override_reaches_the_helper() {
    let dir = unique_temp_dir("clip-selection");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(&dir, 1, &reply(&["pass", "show", "web/mail"], 0, "s3cret\n", ""));

    let output = run_with_stdin(
        cli_command(&dir)
            .args(["show", "-c", "web/mail"])
            .env("PASSWORD_STORE_X_SELECTION", "p"),
        None,
    );

    assert!(output.status.success());
    let log = fs::read_to_string(dir.join("xclip.log")).expect("xclip should have been called");
    assert!(log.contains("primary"));
    assert!(!log.contains("\nclipboard\n"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unmatched_selection_override_is_fatal() {
    let dir = unique_temp_dir("clip-selection-bad");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    stage_reply(&dir, 1, &reply(&["pass", "show", "web/mail"], 0, "s3cret\n", ""));

    let output = run_with_stdin(
        cli_command(&dir)
            .args(["show", "-c", "web/mail"])
            .env("PASSWORD_STORE_X_SELECTION", "x"),
        None,
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Invalid value for PASSWORD_STORE_X_SELECTION: x"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn generate_clip_copies_the_decolored_fourth_line() {
    let dir = unique_temp_dir("generate-clip");
    install_qrexec_stub(&dir);
    install_xclip_stub(&dir);
    let banner = "\u{1b}[1mRegenerated password for web/mail.\u{1b}[0m\n\
                  \n\
                  \u{1b}[1mThe generated password is:\u{1b}[0m\n\
                  \u{1b}[1m\u{1b}[93mn3w!s3cret\u{1b}[0m\n";
    stage_reply(
        &dir,
        1,
        &reply(
            &["pass", "generate", "-f", "web/mail", "25"],
            0,
            banner,
            "",
        ),
    );

    let output = run_with_stdin(
        cli_command(&dir).args(["generate", "-c", "-f", "web/mail"]),
        None,
    );

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("Copied web/mail to clipboard. Will clear in 45 seconds."));
    assert_eq!(clipboard_contents(&dir), "n3w!s3cret");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn deferred_clear_restores_the_previous_contents() {
    let dir = unique_temp_dir("clear-restore");
    install_xclip_stub(&dir);
    fs::write(dir.join("clipfile"), "s3cret").expect("clipboard file should be writable");

    let state = serde_json::json!({
        "previous": "before",
        "secret": "s3cret",
        "seconds": 0,
        "selection": "clipboard",
    })
    .to_string();
    let output = run_with_stdin(cli_command(&dir).arg("__clipboard-clear"), Some(&state));

    assert!(output.status.success());
    assert_eq!(clipboard_contents(&dir), "before");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn deferred_clear_leaves_a_superseded_clipboard_alone() {
    let dir = unique_temp_dir("clear-superseded");
    install_xclip_stub(&dir);
    fs::write(dir.join("clipfile"), "user data").expect("clipboard file should be writable");

    let state = serde_json::json!({
        "previous": "before",
        "secret": "s3cret",
        "seconds": 0,
        "selection": "clipboard",
    })
    .to_string();
    let output = run_with_stdin(cli_command(&dir).arg("__clipboard-clear"), Some(&state));

    assert!(output.status.success());
    assert_eq!(clipboard_contents(&dir), "user data");

    let _ = fs::remove_dir_all(&dir);
}
