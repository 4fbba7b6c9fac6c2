//! Section keys and the section hierarchy index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identifies a grouping level in the local document tree.
///
/// Sections are synthetic: they have no remote page of their own and are
/// represented by an anchor borrowed from one of their member pages. The
/// root key is distinguished and always resolves to the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(Option<String>);

impl SectionKey {
    /// The distinguished root key.
    pub const fn root() -> Self {
        Self(None)
    }

    /// A named (non-root) section key.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// Returns true for the root key.
    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the section name, or `None` for root.
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => f.write_str(name),
            None => f.write_str("<root>"),
        }
    }
}

impl From<Option<String>> for SectionKey {
    fn from(name: Option<String>) -> Self {
        Self(name)
    }
}

/// The section hierarchy contains a cycle and cannot be traversed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cyclic section hierarchy involving \"{0}\"")]
pub struct CycleError(pub String);

/// Precomputed adjacency over a section hierarchy map.
///
/// The raw hierarchy is a flat `section -> parent` map; traversal needs the
/// opposite direction. The index is built once per run and provides:
///
/// - `children_of`: child sections of a given section, in a deterministic
///   (sorted) sibling order
/// - `parent_of`: the declared parent of a section (root when undeclared)
/// - `unreachable`: sections whose parent chain does not terminate at root
///
/// Building the index fails fast on a cycle, before any remote call is made.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    parents: HashMap<String, SectionKey>,
    children: HashMap<SectionKey, Vec<SectionKey>>,
    unreachable: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Reach {
    InProgress,
    Root,
    Dangling,
}

impl SectionIndex {
    /// Builds the index from a `section -> parent` hierarchy map.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if any section's parent chain loops back on
    /// itself.
    pub fn build(hierarchy: &HashMap<String, SectionKey>) -> Result<Self, CycleError> {
        let mut status: HashMap<String, Reach> = HashMap::new();

        for name in hierarchy.keys() {
            Self::classify(name, hierarchy, &mut status)?;
        }

        let mut children: HashMap<SectionKey, Vec<SectionKey>> = HashMap::new();
        let mut unreachable = Vec::new();
        for (name, parent) in hierarchy {
            match status.get(name) {
                Some(Reach::Root) => children
                    .entry(parent.clone())
                    .or_default()
                    .push(SectionKey::named(name.clone())),
                _ => unreachable.push(name.clone()),
            }
        }

        // Sibling order carries no dependency; sort it so traversal is
        // reproducible across runs.
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| a.name().cmp(&b.name()));
        }
        unreachable.sort();

        Ok(Self {
            parents: hierarchy.clone(),
            children,
            unreachable,
        })
    }

    /// Walks one section's parent chain, memoizing reachability.
    fn classify(
        name: &str,
        hierarchy: &HashMap<String, SectionKey>,
        status: &mut HashMap<String, Reach>,
    ) -> Result<Reach, CycleError> {
        if let Some(&known) = status.get(name) {
            if known == Reach::InProgress {
                return Err(CycleError(name.to_string()));
            }
            return Ok(known);
        }

        let reach = match hierarchy.get(name) {
            // Sections absent from the map have no children to resolve and
            // never reach this point via keys(); a named parent that is not
            // itself a section leaves the chain dangling.
            None => Reach::Dangling,
            Some(parent) => match parent.name() {
                None => Reach::Root,
                Some(parent_name) => {
                    status.insert(name.to_string(), Reach::InProgress);
                    if !hierarchy.contains_key(parent_name) {
                        Reach::Dangling
                    } else {
                        Self::classify(parent_name, hierarchy, status)?
                    }
                }
            },
        };

        status.insert(name.to_string(), reach);
        Ok(reach)
    }

    /// Child sections of `key`, in deterministic sibling order.
    pub fn children_of(&self, key: &SectionKey) -> &[SectionKey] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declared parent of a section. Undeclared sections parent to root.
    pub fn parent_of(&self, key: &SectionKey) -> SectionKey {
        key.name()
            .and_then(|name| self.parents.get(name).cloned())
            .unwrap_or_default()
    }

    /// Sections whose parent chain does not terminate at root.
    ///
    /// These are never visited by the traversal driver; callers should
    /// surface them to the operator.
    pub fn unreachable(&self) -> &[String] {
        &self.unreachable
    }

    /// Whether the traversal driver will visit this section.
    ///
    /// Root always is. A named section must be declared in the hierarchy and
    /// have a parent chain terminating at root; anything else (defunct or
    /// dangling) is skipped, and remote pages still tagged with it are stale.
    pub fn is_reachable(&self, key: &SectionKey) -> bool {
        match key.name() {
            None => true,
            Some(name) => {
                self.parents.contains_key(name)
                    && !self.unreachable.iter().any(|n| n == name)
            }
        }
    }
}
