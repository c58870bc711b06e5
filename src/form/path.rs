//! Path addressing over the form value tree.
//!
//! Paths are dotted field names (`address.city`). Every function here is a
//! total function over [`FormMap`]: descending only ever happens through
//! [`FormValue::Map`] nodes, so lists and scalars are always leaves.

use std::fmt::{Display, Formatter};

use super::error::{FormError, FormResult};
use super::value::{FormMap, FormValue};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldPath {
    name: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(name: &str) -> FormResult<Self> {
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(FormError::InvalidPath(name.to_owned()));
        }
        Ok(Self::from_trusted(name))
    }

    pub fn from_segments<I, S>(segments: I) -> FormResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments.into_iter().map(Into::into).collect::<Vec<_>>();
        let name = segments.join(".");
        if segments.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
            return Err(FormError::InvalidPath(name));
        }
        Ok(Self { name, segments })
    }

    /// Builds a path from a name that was already validated on the way in.
    pub(crate) fn from_trusted(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            segments: name.split('.').map(str::to_owned).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = FormError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// What [`set`] did with the value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetOutcome {
    Inserted,
    Replaced,
    /// An intermediate segment is an existing leaf; nothing was written.
    Blocked,
}

pub fn get<'a>(root: &'a FormMap, path: &FieldPath) -> Option<&'a FormValue> {
    let (first, rest) = path.segments().split_first()?;
    rest.iter().try_fold(root.get(first.as_str())?, |node, segment| {
        node.as_map()?.get(segment.as_str())
    })
}

pub fn get_mut<'a>(root: &'a mut FormMap, path: &FieldPath) -> Option<&'a mut FormValue> {
    let (first, rest) = path.segments().split_first()?;
    let mut node = root.get_mut(first.as_str())?;
    for segment in rest {
        node = node.as_map_mut()?.get_mut(segment.as_str())?;
    }
    Some(node)
}

/// Whether `path` names an existing value that is not itself a map.
pub fn is_leaf(root: &FormMap, path: &FieldPath) -> bool {
    get(root, path).is_some_and(|value| !value.is_map())
}

/// Writes `value` at `path`, creating empty maps for missing intermediate
/// segments. An existing leaf in an intermediate position is never replaced.
pub fn set(root: &mut FormMap, path: &FieldPath, value: FormValue) -> SetOutcome {
    let Some((last, parents)) = path.segments().split_last() else {
        return SetOutcome::Blocked;
    };

    let mut map = root;
    for segment in parents {
        let node = map
            .entry(segment.clone())
            .or_insert_with(FormValue::map);
        map = match node {
            FormValue::Map(child) => child,
            _ => return SetOutcome::Blocked,
        };
    }

    match map.insert(last.clone(), value) {
        Some(_) => SetOutcome::Replaced,
        None => SetOutcome::Inserted,
    }
}

/// Removes the value at `path` from its parent map and returns it.
pub fn delete(root: &mut FormMap, path: &FieldPath) -> Option<FormValue> {
    let (last, parents) = path.segments().split_last()?;
    let mut map = root;
    for segment in parents {
        map = map.get_mut(segment.as_str())?.as_map_mut()?;
    }
    map.shift_remove(last.as_str())
}

/// Every leaf path in the tree, depth first, in key insertion order.
pub fn leaves(root: &FormMap) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaves(root, None, &mut out);
    out
}

fn collect_leaves(map: &FormMap, prefix: Option<&str>, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            FormValue::Map(child) => collect_leaves(child, Some(&path), out),
            _ => out.push(path),
        }
    }
}
