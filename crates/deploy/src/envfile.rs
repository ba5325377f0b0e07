//! Minimal `.env` file persistence for provisioning output.
//!
//! The pipeline writes the ids it creates (`ASSISTANT_ID`, the analytics
//! service SID) back into the local env file so the webhook server and
//! later reruns pick them up. Unrelated lines, comments, and ordering are
//! preserved; only the targeted keys are replaced or appended.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::DeployError;

/// Insert or replace `KEY=value` lines in the env file at `path`.
///
/// A missing file is treated as empty and created. Keys are matched on the
/// exact `KEY=` prefix; everything else passes through untouched.
///
/// # Errors
///
/// Returns `DeployError::Io` if the file cannot be read or written.
pub fn upsert_env_vars(path: &Path, updates: &[(&str, String)]) -> Result<(), DeployError> {
    let existing = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(DeployError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let rendered = apply_updates(&existing, updates);
    std::fs::write(path, rendered).map_err(|source| DeployError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn apply_updates(existing: &str, updates: &[(&str, String)]) -> String {
    let mut remaining: Vec<&(&str, String)> = updates.iter().collect();
    let mut output = String::new();

    for line in existing.lines() {
        let replacement = remaining
            .iter()
            .position(|(key, _)| line.starts_with(&format!("{key}=")));
        match replacement {
            Some(index) => {
                let (key, value) = remaining.swap_remove(index);
                let _ = writeln!(output, "{key}={value}");
            }
            None => {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    for (key, value) in remaining {
        let _ = writeln!(output, "{key}={value}");
    }

    output
}
