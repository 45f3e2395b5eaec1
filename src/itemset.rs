//! Items, itemsets and transactions
//!
//! An [`ItemSet`] keeps its items sorted and deduplicated, so two itemsets built
//! from the same items in any order are equal and hash identically. That makes
//! it usable directly as a cache key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An opaque item label, e.g. `"age=30"` or a raw token
pub type Item = String;

/// A transaction is stored in the same canonical form as an itemset
pub type Transaction = ItemSet;

/// Immutable, canonical set of items
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<Item>", into = "Vec<Item>")]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    /// The empty itemset
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        let mut items: Vec<Item> = items.into_iter().map(Into::into).collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn singleton(item: impl Into<Item>) -> Self {
        Self {
            items: vec![item.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in canonical (sorted) order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.binary_search_by(|probe| probe.as_str().cmp(item)).is_ok()
    }

    pub fn union(&self, other: &ItemSet) -> ItemSet {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut items = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.items.len() && j < other.items.len() {
            match self.items[i].cmp(&other.items[j]) {
                std::cmp::Ordering::Less => {
                    items.push(self.items[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    items.push(other.items[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    items.push(self.items[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        items.extend_from_slice(&self.items[i..]);
        items.extend_from_slice(&other.items[j..]);
        Self { items }
    }

    /// Items of `self` not in `other`
    pub fn difference(&self, other: &ItemSet) -> ItemSet {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        }
    }

    pub fn intersection_len(&self, other: &ItemSet) -> usize {
        let (mut i, mut j, mut common) = (0, 0, 0);
        while i < self.items.len() && j < other.items.len() {
            match self.items[i].cmp(&other.items[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    common += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        common
    }

    pub fn is_disjoint(&self, other: &ItemSet) -> bool {
        self.intersection_len(other) == 0
    }

    /// Sorted merge walk; both sides are canonical so this is linear
    pub fn is_subset_of(&self, other: &ItemSet) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut rest = other.items.iter();
        'outer: for item in &self.items {
            for candidate in rest.by_ref() {
                match candidate.cmp(item) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    /// All sub-itemsets with exactly `size` items, in lexicographic order
    pub fn subsets_of_size(&self, size: usize) -> Vec<ItemSet> {
        let n = self.items.len();
        if size > n {
            return Vec::new();
        }

        let mut subsets = Vec::new();
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            subsets.push(Self {
                items: indices.iter().map(|&i| self.items[i].clone()).collect(),
            });

            // Advance the rightmost index that still has room
            let Some(pos) = (0..size).rev().find(|&p| indices[p] < n - size + p) else {
                break;
            };
            indices[pos] += 1;
            for p in pos + 1..size {
                indices[p] = indices[p - 1] + 1;
            }
        }
        subsets
    }
}

impl From<Vec<Item>> for ItemSet {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl From<ItemSet> for Vec<Item> {
    fn from(set: ItemSet) -> Self {
        set.items
    }
}

impl FromIterator<Item> for ItemSet {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.items.join(", "))
    }
}

/// Distinct items across all transactions
pub fn universe_of(transactions: &[Transaction]) -> BTreeSet<Item> {
    transactions
        .iter()
        .flat_map(|transaction| transaction.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> ItemSet {
        ItemSet::new(items.iter().copied())
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(set(&["b", "a", "c", "a"]), set(&["c", "b", "a"]));
        assert_eq!(set(&["b", "a"]).items(), &["a".to_string(), "b".to_string()]);
        assert!(ItemSet::empty().is_empty());
        assert_eq!(set(&["b", "a"]).to_string(), "{a, b}");
    }

    #[test]
    fn test_set_operations() {
        let ab = set(&["a", "b"]);
        let bc = set(&["b", "c"]);

        assert_eq!(ab.union(&bc), set(&["a", "b", "c"]));
        assert_eq!(ab.union(&ItemSet::empty()), ab);
        assert_eq!(ab.intersection_len(&bc), 1);
        assert_eq!(ab.difference(&bc), set(&["a"]));
        assert!(!ab.is_disjoint(&bc));
        assert!(set(&["a"]).is_disjoint(&set(&["c"])));
    }

    #[test]
    fn test_subset() {
        let abc = set(&["a", "b", "c"]);
        assert!(ItemSet::empty().is_subset_of(&abc));
        assert!(set(&["a", "c"]).is_subset_of(&abc));
        assert!(abc.is_subset_of(&abc));
        assert!(!set(&["a", "d"]).is_subset_of(&abc));
        assert!(!set(&["0"]).is_subset_of(&abc));
        assert!(!abc.is_subset_of(&set(&["a", "b"])));
    }

    #[test]
    fn test_subsets_of_size() {
        let abcd = set(&["a", "b", "c", "d"]);

        assert_eq!(abcd.subsets_of_size(0), vec![ItemSet::empty()]);
        assert_eq!(abcd.subsets_of_size(1).len(), 4);
        assert_eq!(
            abcd.subsets_of_size(2),
            vec![
                set(&["a", "b"]),
                set(&["a", "c"]),
                set(&["a", "d"]),
                set(&["b", "c"]),
                set(&["b", "d"]),
                set(&["c", "d"]),
            ]
        );
        assert_eq!(abcd.subsets_of_size(4), vec![abcd.clone()]);
        assert!(abcd.subsets_of_size(5).is_empty());
    }

    #[test]
    fn test_serde_canonicalizes() {
        let json = serde_json::to_string(&set(&["b", "a"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let parsed: ItemSet = serde_json::from_str(r#"["z","y","z"]"#).unwrap();
        assert_eq!(parsed, set(&["y", "z"]));
    }

    #[test]
    fn test_universe_of() {
        let transactions = vec![set(&["a", "b"]), set(&["c"]), ItemSet::empty()];
        let universe = universe_of(&transactions);
        assert_eq!(universe.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
