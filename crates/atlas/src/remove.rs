//! Removing affected symlinks through a version-control delete command.
//!
//! Links are only scheduled for deletion in the version-control system;
//! submitting the change is left to the operator.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Removes one symlink.
pub trait LinkRemover {
    /// Removes `link`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Removal`] if the link could not be removed.
    fn remove(&self, link: &Path) -> Result<()>;
}

/// Runs an external command in the link's directory with the link's file
/// name as the last argument, e.g. `p4 delete <name>`.
#[derive(Debug, Clone)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
}

impl CommandRemover {
    /// Builds a remover from a program and its leading arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `command` is empty.
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Config("remove command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The command line used for `link`, for display.
    #[must_use]
    pub fn describe(&self, link: &Path) -> String {
        let name = link
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.push(&name);
        parts.join(" ")
    }
}

impl LinkRemover for CommandRemover {
    fn remove(&self, link: &Path) -> Result<()> {
        let removal_error = |reason: String| Error::Removal {
            link: link.to_path_buf(),
            reason,
        };
        let (Some(dir), Some(name)) = (link.parent(), link.file_name()) else {
            return Err(removal_error("link has no parent directory".to_string()));
        };

        tracing::debug!(command = %self.describe(link), dir = %dir.display(), "Running remove command");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(name)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| removal_error(format!("cannot run '{}': {e}", self.program)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(removal_error(format!(
                "'{}' exited with {}: {}",
                self.describe(link),
                output.status,
                stderr.trim()
            )))
        }
    }
}

/// Outcome of removing a batch of links.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalSummary {
    /// Links removed successfully.
    pub removed: Vec<PathBuf>,
    /// Links that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Removes every link, continuing past failures.
///
/// A link listed more than once is removed only the first time.
pub fn remove_all<R: LinkRemover + ?Sized>(remover: &R, links: &[&Path]) -> RemovalSummary {
    let mut summary = RemovalSummary::default();
    let mut seen = std::collections::HashSet::new();

    for &link in links {
        if !seen.insert(link) {
            continue;
        }
        match remover.remove(link) {
            Ok(()) => {
                tracing::info!(link = %link.display(), "Removed");
                summary.removed.push(link.to_path_buf());
            }
            Err(e) => {
                tracing::warn!(link = %link.display(), error = %e, "Removal failed");
                summary.failed.push((link.to_path_buf(), e.to_string()));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls and fails for links named `fail`.
    #[derive(Default)]
    struct RecordingRemover {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl LinkRemover for RecordingRemover {
        fn remove(&self, link: &Path) -> Result<()> {
            self.calls.borrow_mut().push(link.to_path_buf());
            if link.ends_with("fail") {
                return Err(Error::Removal {
                    link: link.to_path_buf(),
                    reason: "refused".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn remove_all_continues_after_failure() {
        let remover = RecordingRemover::default();
        let links = [Path::new("/a/fail"), Path::new("/b/ok")];

        let summary = remove_all(&remover, &links);

        assert_eq!(summary.removed, vec![PathBuf::from("/b/ok")]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(remover.calls.borrow().len(), 2);
    }

    #[test]
    fn remove_all_skips_repeated_links() {
        let remover = RecordingRemover::default();
        let links = [Path::new("/a/l"), Path::new("/a/l")];

        let summary = remove_all(&remover, &links);

        assert_eq!(summary.removed.len(), 1);
        assert_eq!(remover.calls.borrow().len(), 1);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            CommandRemover::from_command(&[]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn describe_appends_file_name() {
        let remover =
            CommandRemover::from_command(&["p4".to_string(), "delete".to_string()]).unwrap();
        assert_eq!(remover.describe(Path::new("/ws/dir/link")), "p4 delete link");
    }

    #[cfg(unix)]
    #[test]
    fn command_runs_in_link_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let link = dir.path().join("victim");
        std::fs::write(&link, "").unwrap();
        let remover = CommandRemover::from_command(&["rm".to_string()]).unwrap();

        remover.remove(&link).unwrap();

        assert!(!link.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_a_removal_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let remover = CommandRemover::from_command(&["false".to_string()]).unwrap();

        let err = remover.remove(&dir.path().join("x")).unwrap_err();
        assert!(matches!(err, Error::Removal { .. }));
    }

    #[test]
    fn missing_program_is_a_removal_error() {
        let remover =
            CommandRemover::from_command(&["atlas-no-such-program".to_string()]).unwrap();
        let err = remover.remove(Path::new("/tmp/x")).unwrap_err();
        assert!(err.to_string().contains("cannot run"));
    }
}
