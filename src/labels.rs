//! Bidirectional label <-> index mapping.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

/// Assigns dense indices to labels in first-seen order and maps them back.
#[derive(Debug, Clone)]
pub struct LabelGroup<L> {
    indices: HashMap<L, usize>,
    labels: Vec<L>,
}

impl<L> Default for LabelGroup<L> {
    fn default() -> Self {
        Self {
            indices: HashMap::new(),
            labels: Vec::new(),
        }
    }
}

impl<L: Eq + Hash + Clone> LabelGroup<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `label`, allocating the next free index if it is new.
    pub fn get_or_insert(&mut self, label: &L) -> usize {
        if let Some(&index) = self.indices.get(label) {
            return index;
        }
        let index = self.labels.len();
        self.labels.push(label.clone());
        self.indices.insert(label.clone(), index);
        index
    }

    /// Index of `label`, if it has one.
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.indices.get(label).copied()
    }

    /// Label at `index`, if allocated.
    pub fn label(&self, index: usize) -> Option<&L> {
        self.labels.get(index)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Forget every mapping.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.labels.clear();
    }

    /// Borrow the group for one scoped use; it is cleared when the scope drops,
    /// including on early returns and unwinding.
    pub fn scope(&mut self) -> LabelScope<'_, L> {
        self.clear();
        LabelScope { group: self }
    }
}

/// Drop guard returned by `LabelGroup::scope`.
#[derive(Debug)]
pub struct LabelScope<'a, L: Eq + Hash + Clone> {
    group: &'a mut LabelGroup<L>,
}

impl<L: Eq + Hash + Clone> Deref for LabelScope<'_, L> {
    type Target = LabelGroup<L>;

    fn deref(&self) -> &Self::Target {
        self.group
    }
}

impl<L: Eq + Hash + Clone> DerefMut for LabelScope<'_, L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.group
    }
}

impl<L: Eq + Hash + Clone> Drop for LabelScope<'_, L> {
    fn drop(&mut self) {
        self.group.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_insert_allocates_in_order() {
        let mut group = LabelGroup::new();
        assert_eq!(group.get_or_insert(&"b"), 0);
        assert_eq!(group.get_or_insert(&"a"), 1);
        assert_eq!(group.get_or_insert(&"b"), 0);
        assert_eq!(group.len(), 2);
        assert_eq!(group.labels(), &["b", "a"]);
    }

    #[test]
    fn test_bidirectional_lookup() {
        let mut group = LabelGroup::new();
        let idx = group.get_or_insert(&String::from("slot"));
        assert_eq!(group.label(idx).map(String::as_str), Some("slot"));
        assert_eq!(group.index_of(&String::from("slot")), Some(idx));
        assert_eq!(group.index_of(&String::from("missing")), None);
        assert_eq!(group.label(5), None);
    }

    #[test]
    fn test_clear() {
        let mut group = LabelGroup::new();
        group.get_or_insert(&1);
        group.get_or_insert(&2);
        group.clear();
        assert!(group.is_empty());
        assert_eq!(group.get_or_insert(&2), 0);
    }

    #[test]
    fn test_scope_clears_on_drop() {
        let mut group = LabelGroup::new();
        {
            let mut scope = group.scope();
            scope.get_or_insert(&'x');
            scope.get_or_insert(&'y');
            assert_eq!(scope.len(), 2);
        }
        assert!(group.is_empty());
    }

    #[test]
    fn test_scope_clears_on_early_return() {
        fn fill_then_fail(group: &mut LabelGroup<u32>) -> Result<(), String> {
            let mut scope = group.scope();
            let index = scope.get_or_insert(&7);
            if index == 0 {
                return Err("bail".to_string());
            }
            scope.get_or_insert(&8);
            Ok(())
        }

        let mut group = LabelGroup::new();
        assert!(fill_then_fail(&mut group).is_err());
        assert!(group.is_empty());
    }

    #[test]
    fn test_scope_starts_empty() {
        let mut group = LabelGroup::new();
        group.get_or_insert(&"stale");
        let scope = group.scope();
        assert!(scope.is_empty());
    }
}
