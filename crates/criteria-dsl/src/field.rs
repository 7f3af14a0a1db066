//! Module: field
//! Responsibility: typed field references and their resolution to dotted paths.
//! Does not own: any reflection; callers declare references explicitly.
//! Boundary: group collectors only ever see a resolved `FieldPath`.

use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// FieldRef
///
/// Zero-cost typed reference to a (possibly nested) field, declared as a
/// static list of path segments. Usually declared once per field as a `const`.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FieldRef(&'static [&'static str]);

impl FieldRef {
    #[must_use]
    pub const fn new(segments: &'static [&'static str]) -> Self {
        Self(segments)
    }

    #[must_use]
    pub const fn segments(self) -> &'static [&'static str] {
        self.0
    }

    /// Segments joined with `.`, without any renaming.
    #[must_use]
    pub fn dotted(self) -> String {
        self.0.join(".")
    }
}

///
/// FieldPath
/// resolved dotted path, as stored in a leaf
///

#[derive(Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Wrap a path that the caller has already resolved.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

///
/// FieldPathResolver
///

pub trait FieldPathResolver {
    fn resolve(&self, field: FieldRef) -> FieldPath;
}

impl<F> FieldPathResolver for F
where
    F: Fn(FieldRef) -> FieldPath,
{
    fn resolve(&self, field: FieldRef) -> FieldPath {
        self(field)
    }
}

///
/// DotPath
/// resolves a reference to its segments joined with `.`
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DotPath;

impl FieldPathResolver for DotPath {
    fn resolve(&self, field: FieldRef) -> FieldPath {
        FieldPath(field.dotted())
    }
}

///
/// FieldPathMap
///
/// Mapping table from declared names to stored names.
///
/// A key containing `.` matches a whole dotted reference; any other key
/// renames a single segment wherever it appears. Unmapped segments pass
/// through unchanged.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldPathMap(BTreeMap<String, String>);

impl FieldPathMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.insert(from, to);
        self
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) -> Option<String> {
        self.0.insert(from.into(), to.into())
    }

    #[must_use]
    pub fn get(&self, from: &str) -> Option<&str> {
        self.0.get(from).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldPathResolver for FieldPathMap {
    fn resolve(&self, field: FieldRef) -> FieldPath {
        let dotted = field.dotted();
        if let Some(path) = self.get(&dotted) {
            return FieldPath::new(path);
        }

        let segments: Vec<&str> = field
            .segments()
            .iter()
            .map(|segment| self.get(segment).unwrap_or(*segment))
            .collect();

        FieldPath(segments.join("."))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldPathMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

///
/// TESTS
///
