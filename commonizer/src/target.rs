//! Commonizer targets
//!
//! A leaf target is one concrete platform whose libraries are merge inputs.
//! The shared target is the virtual platform "common to all leaves" that
//! receives the commonized declarations.

use std::collections::BTreeSet;
use std::fmt;

/// One concrete platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafTarget {
    name: String,
}

impl LeafTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for LeafTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The virtual target shared by a set of leaf targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedTarget {
    targets: BTreeSet<LeafTarget>,
}

impl SharedTarget {
    pub fn new(targets: impl IntoIterator<Item = LeafTarget>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &LeafTarget> {
        self.targets.iter()
    }

    pub fn contains(&self, target: &LeafTarget) -> bool {
        self.targets.contains(target)
    }
}

impl fmt::Display for SharedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, target) in self.targets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{target}")?;
        }
        f.write_str("]")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommonizerTarget {
    Leaf(LeafTarget),
    Shared(SharedTarget),
}

impl CommonizerTarget {
    pub fn is_leaf(&self) -> bool {
        matches!(self, CommonizerTarget::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafTarget> {
        match self {
            CommonizerTarget::Leaf(target) => Some(target),
            CommonizerTarget::Shared(_) => None,
        }
    }
}

impl fmt::Display for CommonizerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonizerTarget::Leaf(target) => write!(f, "{target}"),
            CommonizerTarget::Shared(target) => write!(f, "{target}"),
        }
    }
}

impl From<LeafTarget> for CommonizerTarget {
    fn from(target: LeafTarget) -> Self {
        CommonizerTarget::Leaf(target)
    }
}

impl From<SharedTarget> for CommonizerTarget {
    fn from(target: SharedTarget) -> Self {
        CommonizerTarget::Shared(target)
    }
}

/// Position of a builder or lookup within a run: a leaf slot or the shared target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    Leaf(usize),
    Shared,
}
