//! Per-group decisions broadcast to every member
//!
//! A decision runs once per unique key, on the group's first record, so with
//! `k` keys over `n` records the decision cost is `O(k)`. This is only sound
//! when the decision reads nothing but the key-defining fields; decisions are
//! handed the key so they can be written against it directly.

use super::group::{Grouped, group_by};
use std::hash::Hash;

/// One record tagged with its group's verdict. `None` means the record passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T, V> {
    pub record: T,
    pub verdict: Option<V>,
}

impl<T, V> Tagged<T, V> {
    pub fn is_flagged(&self) -> bool {
        self.verdict.is_some()
    }
}

/// Records in group order, each tagged with a verdict
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<T, V> {
    entries: Vec<Tagged<T, V>>,
    decisions: usize,
}

impl<T, V> Classification<T, V> {
    pub fn entries(&self) -> &[Tagged<T, V>] {
        &self.entries
    }

    /// How many times the decision function ran
    pub fn decisions(&self) -> usize {
        self.decisions
    }

    /// Flagged records with their verdict, in classification order
    pub fn flagged(&self) -> impl Iterator<Item = (&T, &V)> {
        self.entries
            .iter()
            .filter_map(|e| e.verdict.as_ref().map(|v| (&e.record, v)))
    }

    pub fn into_flagged(self) -> Vec<(T, V)> {
        self.entries
            .into_iter()
            .filter_map(|e| e.verdict.map(|v| (e.record, v)))
            .collect()
    }

    pub fn flagged_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_flagged()).count()
    }

    /// True when no group was flagged
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| !e.is_flagged())
    }

    pub fn into_records(self) -> Vec<T> {
        self.entries.into_iter().map(|e| e.record).collect()
    }
}

/// Run `decide` once per group and tag every member with the result.
pub fn classify<K, T, V, F>(grouped: Grouped<K, T>, mut decide: F) -> Classification<T, V>
where
    V: Clone,
    F: FnMut(&K, &T) -> Option<V>,
{
    let mut entries = Vec::with_capacity(grouped.record_count());
    let mut decisions = 0;

    for group in grouped {
        let verdict = decide(&group.key, group.representative());
        decisions += 1;

        if verdict.is_some() {
            tracing::debug!(members = group.len(), "group flagged");
        }

        for record in group.members {
            entries.push(Tagged {
                record,
                verdict: verdict.clone(),
            });
        }
    }

    Classification { entries, decisions }
}

/// Group `records` by `key_fn`, then [`classify`] the groups.
pub fn classify_by<I, T, K, V, KF, DF>(records: I, key_fn: KF, decide: DF) -> Classification<T, V>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    V: Clone,
    KF: FnMut(&T) -> K,
    DF: FnMut(&K, &T) -> Option<V>,
{
    classify(group_by(records, key_fn), decide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        k: &'static str,
        v: u32,
    }

    fn sample() -> Vec<Rec> {
        vec![
            Rec { k: "A", v: 1 },
            Rec { k: "B", v: 2 },
            Rec { k: "A", v: 3 },
        ]
    }

    fn ban_b(key: &&'static str, _: &Rec) -> Option<&'static str> {
        (*key == "B").then_some("banned")
    }

    #[test]
    fn test_ban_single_key() {
        let result = classify_by(sample(), |r| r.k, ban_b);
        let flagged: Vec<_> = result.flagged().map(|(r, _)| r.clone()).collect();
        assert_eq!(flagged, vec![Rec { k: "B", v: 2 }]);
        assert_eq!(result.flagged_count(), 1);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_decision_runs_once_per_key() {
        let records: Vec<Rec> = (0..100)
            .map(|v| Rec {
                k: ["A", "B", "C", "D"][(v % 4) as usize],
                v,
            })
            .collect();

        let mut calls = 0;
        let result = classify_by(records, |r| r.k, |_, _| {
            calls += 1;
            None::<()>
        });

        assert_eq!(calls, 4);
        assert_eq!(result.decisions(), 4);
        assert_eq!(result.entries().len(), 100);
    }

    #[test]
    fn test_verdict_broadcast_to_all_members() {
        let result = classify_by(sample(), |r| r.k, |k, _| (*k == "A").then_some(*k));
        let tagged: Vec<_> = result
            .entries()
            .iter()
            .map(|e| (e.record.v, e.verdict))
            .collect();
        assert_eq!(tagged, vec![(1, Some("A")), (3, Some("A")), (2, None)]);
    }

    #[test]
    fn test_reclassification_is_stable() {
        let first = classify_by(sample(), |r| r.k, ban_b);
        let verdicts: Vec<_> = first.entries().iter().map(|e| e.verdict).collect();

        let second = classify_by(first.into_records(), |r| r.k, ban_b);
        let again: Vec<_> = second.entries().iter().map(|e| e.verdict).collect();
        assert_eq!(verdicts, again);
    }

    #[test]
    fn test_clean_result_has_no_flags() {
        let result = classify_by(sample(), |r| r.k, |_, _| None::<String>);
        assert!(result.is_clean());
        assert!(result.into_flagged().is_empty());
    }
}
