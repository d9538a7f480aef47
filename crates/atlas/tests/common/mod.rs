//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path of the atlas binary built for this test run
pub fn atlas_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_atlas"))
}

/// Run the atlas binary in the specified directory with colors disabled
pub fn run_atlas_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(atlas_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute atlas binary")
}

/// Stdout of a finished command as text
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command as text
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A scanned tree plus a separate directory for the atlas files.
///
/// ```text
/// data/shared/datasets/old/file.txt
/// data/shared/datasets/new/
/// home/alice/ds     -> data/shared/datasets
/// home/bob/old      -> data/shared/datasets/old
/// home/bob/file     -> data/shared/datasets/old/file.txt
/// home/carol/broken -> data/shared/gone
/// ```
pub struct Workspace {
    pub temp: TempDir,
    /// Canonical root, so paths match what the scanner records.
    pub root: PathBuf,
    pub atlas_dir: PathBuf,
}

impl Workspace {
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn arg(&self, relative: &str) -> String {
        self.path(relative).display().to_string()
    }

    pub fn atlas_arg(&self) -> String {
        self.atlas_dir.display().to_string()
    }

    /// Runs atlas with `--atlas-path` pointing at the workspace atlas dir.
    pub fn run(&self, args: &[&str]) -> Output {
        let atlas_dir = self.atlas_arg();
        let mut full = vec!["--atlas-path", atlas_dir.as_str()];
        full.extend_from_slice(args);
        run_atlas_in_dir(&self.root, &full)
    }
}

#[cfg(unix)]
pub fn workspace() -> Workspace {
    use std::fs;
    use std::os::unix::fs::symlink;

    let temp = TempDir::new().expect("Failed to create temp directory");
    let root = temp.path().canonicalize().unwrap();
    let atlas_dir = root.join("atlas-store");
    fs::create_dir_all(&atlas_dir).unwrap();

    let datasets = root.join("data/shared/datasets");
    fs::create_dir_all(datasets.join("old")).unwrap();
    fs::create_dir_all(datasets.join("new")).unwrap();
    fs::write(datasets.join("old/file.txt"), "x").unwrap();

    for user in ["alice", "bob", "carol"] {
        fs::create_dir_all(root.join("home").join(user)).unwrap();
    }
    symlink(&datasets, root.join("home/alice/ds")).unwrap();
    symlink(datasets.join("old"), root.join("home/bob/old")).unwrap();
    symlink(datasets.join("old/file.txt"), root.join("home/bob/file")).unwrap();
    symlink(root.join("data/shared/gone"), root.join("home/carol/broken")).unwrap();

    Workspace {
        temp,
        root,
        atlas_dir,
    }
}
