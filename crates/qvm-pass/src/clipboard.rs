//! Puts revealed secrets on the X clipboard and arms a detached clear.
//!
//! The clear runs in a re-executed copy of this binary (hidden
//! `__clipboard-clear` subcommand) in its own session, so it survives the
//! invoking process. It restores the previous clipboard contents only if
//! the clipboard still holds the secret it placed.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::exit::{io_error, CliError, CliResult, SUCCESS};

pub const CLEAR_SUBCOMMAND: &str = "__clipboard-clear";

/// X selection a secret is copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Primary,
    Secondary,
    Clipboard,
}

impl Selection {
    /// Resolves a unique case-insensitive prefix of one selection name.
    /// `""` prefixes all three, so it does not resolve.
    pub fn match_prefix(raw: &str) -> Option<Self> {
        const NAMES: [(Selection, &str); 3] = [
            (Selection::Primary, "primary"),
            (Selection::Secondary, "secondary"),
            (Selection::Clipboard, "clipboard"),
        ];

        let needle = raw.to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut found = None;
        for (selection, name) in NAMES {
            if name.starts_with(&needle) {
                if found.is_some() {
                    return None;
                }
                found = Some(selection);
            }
        }
        found
    }

    fn as_str(self) -> &'static str {
        match self {
            Selection::Primary => "primary",
            Selection::Secondary => "secondary",
            Selection::Clipboard => "clipboard",
        }
    }
}

/// Minimal copy/paste surface over an external clipboard helper.
pub trait Clipboard {
    fn copy(&self, text: &str) -> CliResult<()>;
    fn paste(&self) -> CliResult<String>;
}

#[derive(Debug, Clone, Copy)]
enum XTool {
    Xclip,
    Xsel,
}

/// `xclip` or `xsel`, whichever is on `$PATH`.
pub struct XToolClipboard {
    tool: XTool,
    selection: Selection,
}

impl XToolClipboard {
    pub fn detect(selection: Selection) -> CliResult<Self> {
        let tool = if find_in_path("xclip") {
            XTool::Xclip
        } else if find_in_path("xsel") {
            XTool::Xsel
        } else {
            return Err(CliError::failure(
                "no clipboard helper found (install xclip or xsel)",
            ));
        };
        Ok(Self { tool, selection })
    }

    fn program(&self) -> &'static str {
        match self.tool {
            XTool::Xclip => "xclip",
            XTool::Xsel => "xsel",
        }
    }

    fn command(&self, paste: bool) -> Command {
        let mut command = Command::new(self.program());
        match self.tool {
            XTool::Xclip => {
                command.args(["-selection", self.selection.as_str()]);
                if paste {
                    command.arg("-o");
                }
            }
            XTool::Xsel => {
                command.arg(format!("--{}", self.selection.as_str()));
                command.arg(if paste { "--output" } else { "--input" });
            }
        }
        command
    }
}

impl Clipboard for XToolClipboard {
    fn copy(&self, text: &str) -> CliResult<()> {
        let mut child = self
            .command(false)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| io_error(&format!("failed to run {}", self.program()), err))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|err| io_error("failed to write to clipboard helper", err))?;
        }

        let status = child
            .wait()
            .map_err(|err| io_error(&format!("failed to wait for {}", self.program()), err))?;
        if !status.success() {
            return Err(CliError::failure(format!(
                "{} exited with {status}",
                self.program()
            )));
        }
        Ok(())
    }

    fn paste(&self) -> CliResult<String> {
        let output = self
            .command(true)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|err| io_error(&format!("failed to run {}", self.program()), err))?;
        // An unowned selection makes the helper exit non-zero; that simply
        // reads as an empty clipboard.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Everything the deferred clear needs, handed to the child on stdin so the
/// secret never appears in a command line.
#[derive(Debug, Serialize, Deserialize)]
struct ClearState {
    previous: String,
    secret: String,
    seconds: u64,
    selection: Selection,
}

/// Copy `secret` to the configured selection, report it, and arm the clear.
pub fn place_secret(name: &str, secret: &str, settings: &Settings) -> CliResult<()> {
    let seconds = settings.clip_seconds()?;
    let selection = settings.x_selection()?;
    let helper = XToolClipboard::detect(selection)?;

    let state = arm(&helper, name, secret, seconds, selection)?;
    spawn_clear_child(&state)
}

/// Swap the secret in and report the countdown.
fn arm(
    clipboard: &dyn Clipboard,
    name: &str,
    secret: &str,
    seconds: u64,
    selection: Selection,
) -> CliResult<ClearState> {
    let previous = clipboard.paste()?;
    clipboard.copy(secret)?;
    println!("Copied {name} to clipboard. Will clear in {seconds} seconds.");

    Ok(ClearState {
        previous,
        secret: secret.to_string(),
        seconds,
        selection,
    })
}

/// Restore the previous contents unless something else owns the clipboard
/// by now.
fn clear_expired(clipboard: &dyn Clipboard, state: &ClearState) -> CliResult<()> {
    if clipboard.paste()? == state.secret {
        clipboard.copy(&state.previous)?;
    } else {
        debug!("clipboard superseded, leaving it alone");
    }
    Ok(())
}

fn spawn_clear_child(state: &ClearState) -> CliResult<()> {
    let exe = std::env::current_exe()
        .map_err(|err| io_error("failed to locate own executable", err))?;

    let mut command = Command::new(exe);
    command
        .arg(CLEAR_SUBCOMMAND)
        .stdin(Stdio::piped())
        // The child outlives this process; it must not hold its pipes.
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid only detaches the child from the controlling
        // session and is async-signal-safe.
        unsafe {
            command.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    let mut child = command
        .spawn()
        .map_err(|err| io_error("failed to spawn clipboard clear", err))?;

    let payload = serde_json::to_vec(state)
        .map_err(|err| CliError::failure(format!("failed to encode clear state: {err}")))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&payload)
            .map_err(|err| io_error("failed to hand off clear state", err))?;
    }

    // Deliberately not waited on; once this process exits the child is
    // reparented and finishes on its own.
    debug!(seconds = state.seconds, "armed deferred clipboard clear");
    Ok(())
}

/// Body of the hidden `__clipboard-clear` subcommand.
pub fn run_deferred_clear() -> CliResult<i32> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| io_error("failed to read clear state", err))?;
    let state: ClearState = serde_json::from_str(&raw)
        .map_err(|err| CliError::failure(format!("malformed clear state: {err}")))?;

    std::thread::sleep(Duration::from_secs(state.seconds));

    let helper = XToolClipboard::detect(state.selection)?;
    clear_expired(&helper, &state)?;
    Ok(SUCCESS)
}

fn find_in_path(program: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(program).is_file())
}
