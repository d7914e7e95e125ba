use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use zeroize::Zeroizing;

use crate::exit::{io_error, CliError, CliResult};

const FALLBACK_EDITOR: &str = "vi";

/// Open `initial` in the user's editor and return the edited text, or
/// `None` when the content came back unchanged. The editor command comes
/// from `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn edit_text(initial: Option<&str>) -> CliResult<Option<Zeroizing<String>>> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| FALLBACK_EDITOR.to_string());
    edit_text_with(&editor, initial)
}

/// Testable body of [`edit_text`] with the editor command injected.
fn edit_text_with(editor: &str, initial: Option<&str>) -> CliResult<Option<Zeroizing<String>>> {
    let path = scratch_path();

    let mut text = Zeroizing::new(initial.unwrap_or_default().to_string());
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    write_private(&path, text.as_bytes())?;

    let outcome = run_editor(editor, &path, &text);
    let _ = fs::remove_file(&path);
    outcome
}

fn run_editor(editor: &str, path: &Path, original: &str) -> CliResult<Option<Zeroizing<String>>> {
    // Through the shell so $EDITOR may carry its own flags.
    let status = Command::new("sh")
        .args(["-c", &format!("{editor} \"$1\""), "sh"])
        .arg(path)
        .status()
        .map_err(|err| io_error(&format!("failed to launch {editor}"), err))?;
    if !status.success() {
        return Err(CliError::failure(format!("{editor}: editing failed")));
    }

    let edited = fs::read_to_string(path)
        .map(Zeroizing::new)
        .map_err(|err| io_error("failed to read edited file", err))?;
    if *edited == original {
        Ok(None)
    } else {
        Ok(Some(edited))
    }
}

/// The scratch file briefly holds a secret, so it is created empty with
/// owner-only permissions before any content is written.
fn write_private(path: &Path, content: &[u8]) -> CliResult<()> {
    let write = |path: &Path| -> std::io::Result<()> {
        fs::write(path, b"")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        fs::write(path, content)
    };
    write(path).map_err(|err| io_error(&format!("failed to prepare {}", path.display()), err))
}

fn scratch_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("qvm-pass-edit-{}-{nanos}.txt", std::process::id()))
}
