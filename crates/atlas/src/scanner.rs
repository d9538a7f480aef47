//! Recursive tree walk that builds the reverse symlink index.
//!
//! Each scan root is resolved and walked on its own, producing a partial
//! index and dead-link set, and the partials are merged at the end. Walking
//! never follows symlinks: a symlinked directory is classified like any other
//! link and its contents are reached only through its real location, if that
//! location lies inside a scan root.

use crate::domain::{DeadLinks, Index};
use crate::merge::{merge_dead_links, merge_indices};
use crate::resolve::{Resolution, absolute, resolve};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Default wall-clock time between liveness log lines on long scans.
pub const DEFAULT_ALIVE_INTERVAL: Duration = Duration::from_secs(300);

/// Result of scanning one or more roots.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Merged index over every root.
    pub index: Index,
    /// Merged dead links over every root.
    pub dead_links: DeadLinks,
    /// Roots that did not exist and were skipped.
    pub skipped_roots: Vec<PathBuf>,
    /// Symlinks that were neither indexed nor recorded as dead: the target
    /// could not be resolved due to permissions, or a path cannot be stored.
    pub unresolved: Vec<PathBuf>,
    /// Number of walk entries visited.
    pub entries_seen: usize,
    /// Number of liveness signals emitted.
    pub heartbeats: usize,
}

/// Partial result for a single root, merged into a [`ScanReport`] later.
#[derive(Debug, Default)]
struct RootScan {
    index: Index,
    dead_links: DeadLinks,
    unresolved: Vec<PathBuf>,
    entries_seen: usize,
}

/// Emits a log line whenever `interval` has elapsed since the last one.
struct Heartbeat {
    interval: Duration,
    last: Instant,
    beats: usize,
}

impl Heartbeat {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
            beats: 0,
        }
    }

    fn tick(&mut self, root: &Path, entries_seen: usize) {
        if self.last.elapsed() >= self.interval {
            tracing::info!(
                root = %root.display(),
                entries = entries_seen,
                "This could take a while, still scanning"
            );
            self.beats += 1;
            self.last = Instant::now();
        }
    }
}

/// Walks scan roots and classifies every symlink found.
#[derive(Debug, Clone)]
pub struct Scanner {
    alive_interval: Duration,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Creates a scanner with the default liveness interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alive_interval: DEFAULT_ALIVE_INTERVAL,
        }
    }

    /// Sets how often a long scan reports that it is still running.
    #[must_use]
    pub fn with_alive_interval(mut self, interval: Duration) -> Self {
        self.alive_interval = interval;
        self
    }

    /// Scans every root and merges the results.
    ///
    /// A root that does not exist is skipped and listed, made absolute, in
    /// [`ScanReport::skipped_roots`]; the remaining roots are still scanned.
    pub fn scan<P: AsRef<Path>>(&self, roots: &[P]) -> ScanReport {
        let mut heartbeat = Heartbeat::new(self.alive_interval);
        let mut skipped_roots = Vec::new();
        let mut partials = Vec::with_capacity(roots.len());

        for root in roots {
            let root = root.as_ref();
            match resolve(root) {
                Resolution::Existing(real_root) => {
                    tracing::info!(root = %real_root.display(), "Generating atlas");
                    partials.push(self.scan_root(&real_root, &mut heartbeat));
                }
                Resolution::Missing => {
                    tracing::warn!(root = %root.display(), "Scan root does not exist, ignored");
                    skipped_roots.push(absolute(root).unwrap_or_else(|_| root.to_path_buf()));
                }
                Resolution::Unreadable(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Scan root cannot be resolved, ignored");
                    skipped_roots.push(absolute(root).unwrap_or_else(|_| root.to_path_buf()));
                }
            }
        }

        let mut indices = Vec::with_capacity(partials.len());
        let mut dead_lists = Vec::with_capacity(partials.len());
        let mut unresolved = Vec::new();
        let mut entries_seen = 0;
        for partial in partials {
            indices.push(partial.index);
            dead_lists.push(partial.dead_links);
            unresolved.extend(partial.unresolved);
            entries_seen += partial.entries_seen;
        }
        unresolved.sort_unstable();
        unresolved.dedup();

        ScanReport {
            index: merge_indices(Index::new(), indices),
            dead_links: merge_dead_links(dead_lists),
            skipped_roots,
            unresolved,
            entries_seen,
            heartbeats: heartbeat.beats,
        }
    }

    /// Walks one already-resolved root.
    fn scan_root(&self, root: &Path, heartbeat: &mut Heartbeat) -> RootScan {
        let start = Instant::now();
        let mut scan = RootScan::default();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            scan.entries_seen += 1;
            heartbeat.tick(root, scan.entries_seen);

            if entry.file_type().is_symlink() {
                classify_link(entry.path(), &mut scan);
            }
        }

        tracing::debug!(
            root = %root.display(),
            targets = scan.index.len(),
            dead_links = scan.dead_links.len(),
            entries = scan.entries_seen,
            elapsed_ms = start.elapsed().as_millis(),
            "Root scanned"
        );
        scan
    }
}

/// Records one symlink as live, dead or unresolved.
///
/// Only paths the flat file can hold are indexed or listed as dead. A link
/// whose own path or target is not UTF-8 text, or spans several lines, is
/// reported as unresolved instead.
fn classify_link(link: &Path, scan: &mut RootScan) {
    if !storable(link) {
        tracing::warn!(link = ?link, "Symlink path cannot be stored, skipped");
        scan.unresolved.push(link.to_path_buf());
        return;
    }

    match resolve(link) {
        Resolution::Existing(target) => {
            if !storable(&target) {
                tracing::warn!(
                    link = %link.display(),
                    target = ?target,
                    "Symlink target cannot be stored, skipped"
                );
                scan.unresolved.push(link.to_path_buf());
                return;
            }
            tracing::trace!(link = %link.display(), target = %target.display(), "Link");
            scan.index.insert(target, link);
        }
        Resolution::Missing => {
            tracing::trace!(link = %link.display(), "Dead link");
            scan.dead_links.insert(link);
        }
        Resolution::Unreadable(e) => {
            tracing::warn!(link = %link.display(), error = %e, "Cannot resolve symlink, skipped");
            scan.unresolved.push(link.to_path_buf());
        }
    }
}

/// `true` if `path` is UTF-8 without line breaks.
fn storable(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|text| !text.contains(['\n', '\r']))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    /// Real root path of a temp dir, since the scanner records resolved paths.
    fn real_root(dir: &TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[test]
    fn classifies_live_and_dead_links() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        fs::create_dir(root.join("real_dir")).unwrap();
        symlink(root.join("real_dir"), root.join("link_to_dir")).unwrap();
        symlink(root.join("missing"), root.join("dead_link")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        let expected: Index = [(root.join("real_dir"), root.join("link_to_dir"))]
            .into_iter()
            .collect();
        assert_eq!(report.index, expected);
        assert_eq!(report.dead_links.sorted(), vec![root.join("dead_link").as_path()]);
        assert!(report.skipped_roots.is_empty());
    }

    #[test]
    fn links_to_files_are_indexed() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        fs::write(root.join("file.txt"), "data").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        symlink(root.join("file.txt"), root.join("nested").join("alias")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        assert_eq!(
            report.index.links_for(&root.join("file.txt")).unwrap(),
            vec![root.join("nested").join("alias").as_path()]
        );
    }

    #[test]
    fn relative_link_targets_are_resolved() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        fs::create_dir_all(root.join("a").join("b")).unwrap();
        symlink("../..", root.join("a").join("b").join("up")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        assert!(report.index.contains_target(&root));
    }

    #[test]
    fn symlinked_directories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        let outside = TempDir::new().unwrap();
        let outside_root = real_root(&outside);
        symlink(outside_root.join("nowhere"), outside_root.join("inner_dead")).unwrap();
        symlink(&outside_root, root.join("to_outside")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        assert!(report.index.contains_target(&outside_root));
        assert!(report.dead_links.is_empty());
    }

    #[test]
    fn missing_root_is_skipped_and_others_still_scanned() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("link")).unwrap();
        let missing = root.join("does-not-exist");

        let report = Scanner::new().scan(&[missing.clone(), root.clone()]);

        assert_eq!(report.skipped_roots, vec![missing]);
        assert!(report.index.contains_target(&root.join("real")));
    }

    #[test]
    fn overlapping_roots_count_each_link_once() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        let sub = root.join("sub");
        fs::create_dir(&sub).unwrap();
        fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), sub.join("live")).unwrap();
        symlink(root.join("gone"), sub.join("dead")).unwrap();

        let report = Scanner::new().scan(&[root.clone(), sub.clone()]);

        assert_eq!(report.index.link_count(), 1);
        assert_eq!(report.dead_links.len(), 1);
        assert!(report.dead_links.contains(&sub.join("dead")));
    }

    #[test]
    fn dead_links_never_reach_the_index() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        symlink(root.join("gone"), root.join("dead")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        assert!(report.index.is_empty());
        assert!(!report.index.contains_link(&root.join("dead")));
        assert!(!report.index.contains_target(&root.join("gone")));
    }

    #[test]
    fn symlinked_root_is_walked_at_its_target() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        let real = root.join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("f"), "").unwrap();
        symlink(real.join("f"), real.join("alias")).unwrap();
        symlink(&real, root.join("root_link")).unwrap();

        let report = Scanner::new().scan(&[root.join("root_link")]);

        assert_eq!(
            report.index.links_for(&real.join("f")).unwrap(),
            vec![real.join("alias").as_path()]
        );
    }

    #[test]
    fn link_with_line_break_in_name_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("good")).unwrap();
        symlink(root.join("real"), root.join("bad\nname")).unwrap();
        symlink(root.join("gone"), root.join("dead\rname")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        let expected: Index = [(root.join("real"), root.join("good"))].into_iter().collect();
        assert_eq!(report.index, expected);
        assert!(report.dead_links.is_empty());
        assert_eq!(
            report.unresolved,
            vec![root.join("bad\nname"), root.join("dead\rname")]
        );
    }

    #[test]
    fn link_to_target_with_line_break_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        let odd = root.join("odd\ndir");
        fs::create_dir(&odd).unwrap();
        symlink(&odd, root.join("to_odd")).unwrap();

        let report = Scanner::new().scan(&[&root]);

        assert!(report.index.is_empty());
        assert!(report.dead_links.is_empty());
        assert_eq!(report.unresolved, vec![root.join("to_odd")]);
    }

    /// Removes all permissions from `dir`. Returns `false`, with the mode
    /// restored, when the current user can still read it (e.g. root).
    fn lock(dir: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(dir).is_ok() {
            unlock(dir);
            return false;
        }
        true
    }

    fn unlock(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn permission_denied_target_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let root = real_root(&dir);
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret"), "").unwrap();
        symlink(locked.join("secret"), root.join("to_secret")).unwrap();
        if !lock(&locked) {
            return;
        }

        let report = Scanner::new().scan(&[&root]);
        unlock(&locked);

        assert_eq!(report.unresolved, vec![root.join("to_secret")]);
        assert!(!report.index.contains_link(&root.join("to_secret")));
        assert!(!report.dead_links.contains(&root.join("to_secret")));
    }

    #[test]
    fn zero_interval_emits_heartbeats() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let report = Scanner::new()
            .with_alive_interval(Duration::ZERO)
            .scan(&[dir.path()]);

        assert_eq!(report.heartbeats, report.entries_seen);
        assert!(report.entries_seen >= 2);
    }

    #[test]
    fn default_interval_is_quiet_on_small_trees() {
        let dir = TempDir::new().unwrap();
        let report = Scanner::new().scan(&[dir.path()]);
        assert_eq!(report.heartbeats, 0);
    }
}
