//! Run-wide index of per-class test reports.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::report::UnitTestClassReport;

/// Character that marks a nested type in a reported class name.
pub const NESTING_SEPARATOR: char = '$';

/// Returns the enclosing class of a nested class name: the text before the
/// first [`NESTING_SEPARATOR`]. `Outer$Mid$Inner` folds straight into
/// `Outer`. Returns `None` when the name is not nested.
pub fn parent_class_name(class_name: &str) -> Option<&str> {
    class_name
        .split_once(NESTING_SEPARATOR)
        .map(|(parent, _)| parent)
}

/// Maps class names to their aggregated report. Holds exactly one report per
/// distinct class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitTestIndex {
    index_by_class_name: BTreeMap<String, UnitTestClassReport>,
}

impl UnitTestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report for `class_name`, creating an empty one if absent.
    pub fn record_for(&mut self, class_name: &str) -> &mut UnitTestClassReport {
        self.index_by_class_name
            .entry(class_name.to_string())
            .or_default()
    }

    /// Moves the report of `child` into the report of `parent` (created if
    /// needed) and removes the child entry. Returns the parent report, or
    /// `None` when the child has no entry.
    pub fn merge(&mut self, child: &str, parent: &str) -> Option<&UnitTestClassReport> {
        if child == parent {
            return self.index_by_class_name.get(parent);
        }
        let from = self.index_by_class_name.remove(child)?;
        let to = self.record_for(parent);
        to.absorb(from);
        Some(&*to)
    }

    /// Folds every report of `other` into this index.
    pub fn absorb(&mut self, other: UnitTestIndex) {
        for (class_name, report) in other.index_by_class_name {
            match self.index_by_class_name.entry(class_name) {
                btree_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().absorb(report);
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(report);
                }
            }
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&UnitTestClassReport> {
        self.index_by_class_name.get(class_name)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.index_by_class_name.contains_key(class_name)
    }

    /// Snapshot of the current class names, safe to iterate while merging.
    pub fn class_names(&self) -> Vec<String> {
        self.index_by_class_name.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitTestClassReport)> {
        self.index_by_class_name
            .iter()
            .map(|(name, report)| (name.as_str(), report))
    }

    pub fn len(&self) -> usize {
        self.index_by_class_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_by_class_name.is_empty()
    }
}
