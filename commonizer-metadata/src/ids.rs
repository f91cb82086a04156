// Commonizer Metadata Identifiers
// Names used to address modules, packages and classifiers across targets

use std::fmt;

/// A simple (unqualified) declaration name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Name of a library module as reported by a modules provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Fully qualified package name, stored as its segments.
///
/// The root package has no segments and renders as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PackageName {
    segments: Vec<Name>,
}

impl PackageName {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot-separated package name, e.g. `platform.posix`
    pub fn parse(fq_name: &str) -> Self {
        let segments = fq_name
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(Name::new)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Name::new(segment));
        Self { segments }
    }

    /// True if `self` equals `other` or is nested somewhere below it
    pub fn starts_with(&self, other: &PackageName) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl From<&str> for PackageName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Identity of a class, interface, object or type alias.
///
/// Rendered as `package.name/Outer.Inner`; the relative path always has at
/// least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassifierId {
    package: PackageName,
    relative_name: Vec<Name>,
}

impl ClassifierId {
    pub fn new(package: PackageName, name: impl Into<String>) -> Self {
        Self {
            package,
            relative_name: vec![Name::new(name)],
        }
    }

    /// Parse the `package/Outer.Inner` form.
    ///
    /// A string without `/` is treated as a top-level classifier in the root
    /// package.
    pub fn parse(id: &str) -> Self {
        let (package, relative) = match id.rsplit_once('/') {
            Some((package, relative)) => (PackageName::parse(package), relative),
            None => (PackageName::root(), id),
        };
        let relative_name = relative
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(Name::new)
            .collect();
        Self {
            package,
            relative_name,
        }
    }

    pub fn nested(&self, name: impl Into<String>) -> Self {
        let mut relative_name = self.relative_name.clone();
        relative_name.push(Name::new(name));
        Self {
            package: self.package.clone(),
            relative_name,
        }
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn relative_name(&self) -> &[Name] {
        &self.relative_name
    }

    /// The simple name of the innermost classifier
    pub fn short_name(&self) -> Option<&Name> {
        self.relative_name.last()
    }

    /// The enclosing classifier, if this one is nested
    pub fn outer(&self) -> Option<ClassifierId> {
        if self.relative_name.len() < 2 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            relative_name: self.relative_name[..self.relative_name.len() - 1].to_vec(),
        })
    }

    pub fn is_nested(&self) -> bool {
        self.relative_name.len() > 1
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/", self.package)?;
        for (i, segment) in self.relative_name.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl From<&str> for ClassifierId {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
