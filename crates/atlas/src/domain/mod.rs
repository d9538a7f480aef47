//! Core value types: the reverse symlink index and the dead-link set.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Name of the persisted index file inside the atlas directory.
pub const INDEX_FILE_NAME: &str = ".atlas";

/// Name of the persisted dead-link list inside the atlas directory.
pub const DEAD_LINKS_FILE_NAME: &str = "dead_links.list";

/// Name of the optional configuration file inside the atlas directory.
pub const CONFIG_FILE_NAME: &str = "atlas.yaml";

/// Reverse mapping from resolved target paths to the symlinks pointing at them.
///
/// Every stored link set is non-empty: links can only be added one at a time
/// through [`Index::insert`] or unioned in by [`Index::absorb`], and no
/// operation removes links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: HashMap<PathBuf, HashSet<PathBuf>>,
}

impl Index {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `link` resolves to `target`.
    ///
    /// Returns `true` if the link was not already recorded for that target.
    pub fn insert(&mut self, target: impl Into<PathBuf>, link: impl Into<PathBuf>) -> bool {
        self.entries
            .entry(target.into())
            .or_default()
            .insert(link.into())
    }

    /// Unions every entry of `other` into this index.
    pub fn absorb(&mut self, other: Index) {
        for (target, links) in other.entries {
            match self.entries.get_mut(&target) {
                Some(existing) => existing.extend(links),
                None => {
                    self.entries.insert(target, links);
                }
            }
        }
    }

    /// Number of distinct targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no target is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (target, link) pairs.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    /// `true` if `target` has at least one recorded link.
    #[must_use]
    pub fn contains_target(&self, target: &Path) -> bool {
        self.entries.contains_key(target)
    }

    /// Links recorded against `target`, sorted.
    #[must_use]
    pub fn links_for(&self, target: &Path) -> Option<Vec<&Path>> {
        self.entries.get(target).map(|links| {
            let mut sorted: Vec<&Path> = links.iter().map(PathBuf::as_path).collect();
            sorted.sort_unstable();
            sorted
        })
    }

    /// `true` if `link` is recorded against any target.
    #[must_use]
    pub fn contains_link(&self, link: &Path) -> bool {
        self.entries.values().any(|links| links.contains(link))
    }

    /// Iterates over targets and their unsorted link sets.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &HashSet<PathBuf>)> {
        self.entries.iter().map(|(k, v)| (k.as_path(), v))
    }

    /// All entries with targets and links sorted, for deterministic output.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&Path, Vec<&Path>)> {
        let mut entries: Vec<(&Path, Vec<&Path>)> = self
            .entries
            .iter()
            .map(|(target, links)| {
                let mut sorted: Vec<&Path> = links.iter().map(PathBuf::as_path).collect();
                sorted.sort_unstable();
                (target.as_path(), sorted)
            })
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<T, L> FromIterator<(T, L)> for Index
where
    T: Into<PathBuf>,
    L: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (T, L)>>(iter: I) -> Self {
        let mut index = Index::new();
        for (target, link) in iter {
            index.insert(target, link);
        }
        index
    }
}

/// Symlinks whose resolved target did not exist at scan time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadLinks {
    links: HashSet<PathBuf>,
}

impl DeadLinks {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dead link. Returns `true` if it was not already present.
    pub fn insert(&mut self, link: impl Into<PathBuf>) -> bool {
        self.links.insert(link.into())
    }

    /// Unions `other` into this set.
    pub fn absorb(&mut self, other: DeadLinks) {
        self.links.extend(other.links);
    }

    /// `true` if `link` is recorded as dead.
    #[must_use]
    pub fn contains(&self, link: &Path) -> bool {
        self.links.contains(link)
    }

    /// Number of dead links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// `true` when no dead link is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Dead links in sorted order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Path> {
        let mut sorted: Vec<&Path> = self.links.iter().map(PathBuf::as_path).collect();
        sorted.sort_unstable();
        sorted
    }
}

impl<L: Into<PathBuf>> FromIterator<L> for DeadLinks {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().map(Into::into).collect(),
        }
    }
}
