//! Answering "what breaks if I change this path?".
//!
//! A target is affected by every symlink recorded against the target itself
//! or against any of its ancestors, because a link to `/a` also reaches
//! `/a/b/c`. The walk therefore visits the whole ancestor chain and never
//! stops at the first match. It ends below the filesystem root: `/` itself
//! is never checked.

use crate::domain::Index;
use crate::error::{Error, Result};
use crate::resolve::{Resolution, resolve};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Links recorded against one level of a target's ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    /// The indexed path: the target itself or one of its ancestors.
    pub level: PathBuf,
    /// Symlinks pointing at `level`, sorted.
    pub links: Vec<PathBuf>,
}

/// How a single queried target relates to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// At least one level of the ancestor chain is linked.
    Linked,
    /// Nothing links to the target or any ancestor.
    Free,
    /// The target does not exist or is a dead symlink.
    Missing,
}

/// Query result for one requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    /// The path as the caller supplied it.
    pub requested: PathBuf,
    /// The real path that was looked up, when the target exists.
    pub resolved: Option<PathBuf>,
    /// Overall classification.
    pub status: TargetStatus,
    /// Matches, deepest level first.
    pub hits: Vec<Hit>,
}

/// Query results for every requested path, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryReport {
    /// One report per requested path.
    pub targets: Vec<TargetReport>,
}

impl QueryReport {
    /// Every affected symlink, in target order, then deepest level first.
    ///
    /// Links reachable from several targets appear once per target.
    #[must_use]
    pub fn affected(&self) -> Vec<&Path> {
        self.targets
            .iter()
            .flat_map(|target| &target.hits)
            .flat_map(|hit| &hit.links)
            .map(PathBuf::as_path)
            .collect()
    }

    /// `true` if any target is linked.
    #[must_use]
    pub fn any_linked(&self) -> bool {
        self.targets
            .iter()
            .any(|target| target.status == TargetStatus::Linked)
    }
}

/// Collects the links recorded against `resolved` and each of its ancestors,
/// excluding the filesystem root.
///
/// `resolved` must already be a real absolute path. No filesystem access is
/// performed, so this is usable on synthetic indices.
///
/// # Examples
///
/// ```
/// use atlas::domain::Index;
/// use atlas::query::ancestor_hits;
/// use std::path::Path;
///
/// let index: Index = [("/a/b", "/x/link1"), ("/a", "/y/link2")].into_iter().collect();
/// let hits = ancestor_hits(&index, Path::new("/a/b/c"));
///
/// assert_eq!(hits.len(), 2);
/// assert_eq!(hits[0].level, Path::new("/a/b"));
/// assert_eq!(hits[1].level, Path::new("/a"));
/// ```
#[must_use]
pub fn ancestor_hits(index: &Index, resolved: &Path) -> Vec<Hit> {
    resolved
        .ancestors()
        .take_while(|level| level.parent().is_some())
        .filter_map(|level| {
            index.links_for(level).map(|links| Hit {
                level: level.to_path_buf(),
                links: links.into_iter().map(Path::to_path_buf).collect(),
            })
        })
        .collect()
}

/// Looks up every target against the index.
///
/// Each target is resolved first, so querying through a symlink checks what
/// it points at.
///
/// # Errors
///
/// Returns [`Error::EmptyIndex`] if `index` has no entries, since an empty
/// index cannot tell "nothing depends on this" from "nothing was scanned".
pub fn query<P: AsRef<Path>>(index: &Index, targets: &[P]) -> Result<QueryReport> {
    if index.is_empty() {
        return Err(Error::EmptyIndex);
    }

    let targets = targets
        .iter()
        .map(|target| check_target(index, target.as_ref()))
        .collect();
    Ok(QueryReport { targets })
}

fn check_target(index: &Index, requested: &Path) -> TargetReport {
    let resolved = match resolve(requested) {
        Resolution::Existing(path) => path,
        Resolution::Missing => return missing(requested),
        Resolution::Unreadable(e) => {
            tracing::warn!(target = %requested.display(), error = %e, "Cannot resolve target");
            return missing(requested);
        }
    };

    let hits = ancestor_hits(index, &resolved);
    let status = if hits.is_empty() {
        TargetStatus::Free
    } else {
        TargetStatus::Linked
    };
    tracing::debug!(
        target = %requested.display(),
        resolved = %resolved.display(),
        levels = hits.len(),
        "Target checked"
    );

    TargetReport {
        requested: requested.to_path_buf(),
        resolved: Some(resolved),
        status,
        hits,
    }
}

fn missing(requested: &Path) -> TargetReport {
    TargetReport {
        requested: requested.to_path_buf(),
        resolved: None,
        status: TargetStatus::Missing,
        hits: Vec::new(),
    }
}
