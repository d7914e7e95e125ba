use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::clipboard::Selection;
use crate::exit::{io_error, CliError, CliResult};

/// Vault qube used when no configuration file names one.
pub const DEFAULT_VAULT: &str = "pass-vault";

const CLIP_TIME_VAR: &str = "PASSWORD_STORE_CLIP_TIME";
const X_SELECTION_VAR: &str = "PASSWORD_STORE_X_SELECTION";

const DEFAULT_CLIP_SECONDS: u64 = 45;

/// Ambient inputs resolved once at startup: the vault name from the config
/// file and a snapshot of the environment knobs. The raw values are only
/// validated at their point of use, so a broken `PASSWORD_STORE_CLIP_TIME`
/// never breaks `ls`.
#[derive(Debug, Clone)]
pub struct Settings {
    vault: String,
    clip_time: Option<String>,
    x_selection: Option<String>,
}

impl Settings {
    pub fn load() -> CliResult<Self> {
        let vault = match config_file() {
            Some(path) => vault_from_file(&path)?,
            None => None,
        }
        .unwrap_or_else(|| DEFAULT_VAULT.to_string());
        debug!(%vault, "resolved vault qube");

        Ok(Self {
            vault,
            clip_time: std::env::var(CLIP_TIME_VAR).ok(),
            x_selection: std::env::var(X_SELECTION_VAR).ok(),
        })
    }

    /// The vault qube all RPCs are addressed to.
    pub fn vault(&self) -> &str {
        &self.vault
    }

    /// Clipboard countdown in seconds.
    pub fn clip_seconds(&self) -> CliResult<u64> {
        match &self.clip_time {
            None => Ok(DEFAULT_CLIP_SECONDS),
            Some(raw) => raw.trim().parse().map_err(|_| {
                CliError::failure(format!("Invalid value for {CLIP_TIME_VAR}: {raw}"))
            }),
        }
    }

    /// X selection secrets are copied to. A set-but-unmatched value is
    /// fatal; only an unset variable means the default.
    pub fn x_selection(&self) -> CliResult<Selection> {
        match &self.x_selection {
            None => Ok(Selection::Clipboard),
            Some(raw) => Selection::match_prefix(raw).ok_or_else(|| {
                CliError::failure(format!("Invalid value for {X_SELECTION_VAR}: {raw}"))
            }),
        }
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qvm-pass").map(|dirs| dirs.config_dir().join("qube"))
}

/// First non-empty line of the `qube` file, if the file exists. Any other
/// read failure is fatal; silently falling back to the default vault would
/// send secrets-related traffic to the wrong qube.
fn vault_from_file(path: &Path) -> CliResult<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(&format!("failed to read {}", path.display()), err)),
    };
    Ok(first_nonempty_line(&content))
}

fn first_nonempty_line(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(clip_time: Option<&str>, x_selection: Option<&str>) -> Settings {
        Settings {
            vault: DEFAULT_VAULT.to_string(),
            clip_time: clip_time.map(str::to_string),
            x_selection: x_selection.map(str::to_string),
        }
    }

    #[test]
    fn first_nonempty_line_skips_blanks_and_trims() {
        assert_eq!(first_nonempty_line("vault-qube\n"), Some("vault-qube".to_string()));
        assert_eq!(first_nonempty_line("\n\n  my-vault  \nother\n"), Some("my-vault".to_string()));
        assert_eq!(first_nonempty_line("\n   \n"), None);
        assert_eq!(first_nonempty_line(""), None);
    }

    #[test]
    fn vault_file_missing_means_default() {
        let path = std::env::temp_dir().join(format!(
            "qvm-pass-config-missing-{}",
            std::process::id()
        ));
        assert_eq!(vault_from_file(&path).unwrap(), None);
    }

    #[test]
    fn vault_file_first_line_wins() {
        let dir = std::env::temp_dir().join(format!("qvm-pass-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("qube");
        std::fs::write(&path, "\nwork-vault\nignored\n").unwrap();

        assert_eq!(vault_from_file(&path).unwrap(), Some("work-vault".to_string()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn clip_seconds_defaults_and_parses() {
        assert_eq!(settings(None, None).clip_seconds().unwrap(), 45);
        assert_eq!(settings(Some("90"), None).clip_seconds().unwrap(), 90);
        assert_eq!(settings(Some(" 10 "), None).clip_seconds().unwrap(), 10);
    }

    #[test]
    fn clip_seconds_rejects_garbage() {
        let err = settings(Some("soon"), None).clip_seconds().unwrap_err();
        assert!(err.message.contains("PASSWORD_STORE_CLIP_TIME"));
        assert_eq!(err.code, crate::exit::FAILURE);
    }

    #[test]
    fn x_selection_defaults_and_matches_prefixes() {
        assert_eq!(settings(None, None).x_selection().unwrap(), Selection::Clipboard);
        assert_eq!(settings(None, Some("p")).x_selection().unwrap(), Selection::Primary);
        assert_eq!(settings(None, Some("SEC")).x_selection().unwrap(), Selection::Secondary);
    }

    #[test]
    fn x_selection_rejects_ambiguous_or_unknown() {
        assert!(settings(None, Some("")).x_selection().is_err());
        assert!(settings(None, Some("x")).x_selection().is_err());
        let err = settings(None, Some("q")).x_selection().unwrap_err();
        assert!(err.message.contains("Invalid value for PASSWORD_STORE_X_SELECTION: q"));
    }
}
