//! Source revision marker from `git describe`.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

const COMMAND: &str = "git describe --always";

/// Returns the `git describe --always` string for the current directory.
pub fn git_revision() -> Result<String> {
    git_revision_in(Path::new("."))
}

/// Returns the `git describe --always` string for a repository at `dir`.
pub fn git_revision_in(dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["describe", "--always"])
        .current_dir(dir)
        .output()
        .map_err(|source| Error::CommandSpawn {
            command: COMMAND.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: COMMAND.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    decode_revision(&output.stdout)
}

/// Trims the trailing newline and rejects non-UTF-8 output.
fn decode_revision(stdout: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(stdout).map_err(|_| Error::CommandOutput {
        command: COMMAND.to_string(),
    })?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_is_trimmed() {
        assert_eq!(decode_revision(b"3f9c2ab\n").unwrap(), "3f9c2ab");
        assert_eq!(decode_revision(b"v1.2.0-4-g3f9c2ab\n").unwrap(), "v1.2.0-4-g3f9c2ab");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode_revision(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::CommandOutput { .. }));
    }
}
