use serde::Serialize;
use std::collections::BTreeSet;

/// Presenter classes already entered on the current nesting path.
///
/// Never mutated in place: descending into a nested presenter produces an
/// extended copy, so sibling branches never observe each other's path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Visited(BTreeSet<String>);

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    /// The set handed to a nested presenter of class `target` created by a
    /// presenter of class `current`.
    pub fn descend(&self, current: &str, target: &str) -> Visited {
        let mut next = self.0.clone();
        next.insert(current.to_string());
        next.insert(target.to_string());
        Visited(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Visited {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Visited(iter.into_iter().map(Into::into).collect())
    }
}
