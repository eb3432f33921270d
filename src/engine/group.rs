//! Stable grouping of records by a derived key

use std::collections::HashMap;
use std::hash::Hash;

/// Records sharing one derived key, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K, T> {
    pub key: K,
    pub members: Vec<T>,
}

impl<K, T> Group<K, T> {
    /// The record decisions are made on
    pub fn representative(&self) -> &T {
        // Groups are only created when their first member arrives.
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups in first-seen key order
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<K, T> {
    groups: Vec<Group<K, T>>,
}

impl<K, T> Grouped<K, T> {
    pub fn groups(&self) -> &[Group<K, T>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group<K, T>> {
        self.groups
    }

    /// Number of unique keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|g| &g.key)
    }

    pub fn get(&self, key: &K) -> Option<&Group<K, T>>
    where
        K: PartialEq,
    {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// All records, group order first, then member order
    pub fn flatten(self) -> Vec<T> {
        self.groups.into_iter().flat_map(|g| g.members).collect()
    }
}

impl<K, T> IntoIterator for Grouped<K, T> {
    type Item = Group<K, T>;
    type IntoIter = std::vec::IntoIter<Group<K, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition `records` by `key_fn` in a single pass.
///
/// Groups come out in the order their key was first seen and members keep
/// their input order.
pub fn group_by<I, T, K, F>(records: I, mut key_fn: F) -> Grouped<K, T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let result: Result<_, std::convert::Infallible> =
        try_group_by(records, |record| Ok(key_fn(record)));
    match result {
        Ok(grouped) => grouped,
        Err(never) => match never {},
    }
}

/// Like [`group_by`], but the key function may fail. The first failure stops
/// the traversal and is returned unchanged.
pub fn try_group_by<I, T, K, E, F>(records: I, mut key_fn: F) -> Result<Grouped<K, T>, E>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Result<K, E>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<K, T>> = Vec::new();

    for record in records {
        let key = key_fn(&record)?;
        match index.get(&key) {
            Some(&slot) => groups[slot].members.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    tracing::trace!(groups = groups.len(), "grouped records");
    Ok(Grouped { groups })
}
