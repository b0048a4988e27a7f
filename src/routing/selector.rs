//! Load-balanced manager selection.
//!
//! Candidates are ordered by `(load, name)` and the two lowest are kept.
//! A per-bucket counter alternates between them so tied managers share
//! tickets instead of the alphabetically first one absorbing all of them.
//! The chosen manager's load is bumped immediately, so the next ticket
//! sees it.

use std::collections::HashMap;

use tracing::debug;

use crate::classify::{Intent, Language};
use crate::routing::types::{Assignee, Manager, ResolvedOffice, SegmentBucket};

/// How many of the least-loaded candidates take part in the alternation.
const TOP_N: usize = 2;

/// Routing key with its own alternation counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub office: ResolvedOffice,
    pub segment: SegmentBucket,
    pub intent: Intent,
    pub language: Language,
}

/// Run-scoped round-robin counters, one per [`BucketKey`].
#[derive(Debug, Default)]
pub struct RoundRobinState {
    counters: HashMap<BucketKey, usize>,
}

impl RoundRobinState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }

    /// Current counter for `key` (0 if never used).
    pub fn peek(&self, key: &BucketKey) -> usize {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Return the current counter and advance it.
    fn advance(&mut self, key: &BucketKey) -> usize {
        let counter = self.counters.entry(key.clone()).or_insert(0);
        let current = *counter;
        *counter += 1;
        current
    }
}

/// Pick one manager out of `candidates` and charge them one ticket.
///
/// Reading loads, picking and writing the new load happen as one step;
/// nothing else touches the pool in between. An empty candidate set
/// returns [`Assignee::Unassigned`] without touching counters or loads.
pub fn select(
    managers: &mut [Manager],
    candidates: &[usize],
    key: &BucketKey,
    state: &mut RoundRobinState,
) -> Assignee {
    if candidates.is_empty() {
        return Assignee::Unassigned;
    }

    let mut ordered = candidates.to_vec();
    ordered.sort_by(|&a, &b| {
        managers[a]
            .load
            .cmp(&managers[b].load)
            .then_with(|| managers[a].name.cmp(&managers[b].name))
    });
    ordered.truncate(TOP_N);

    let counter = state.advance(key);
    let chosen = ordered[counter % ordered.len()];

    let manager = &mut managers[chosen];
    manager.load = manager.load.saturating_add(1);

    debug!(
        manager = %manager.name,
        load = manager.load,
        counter,
        office = %key.office,
        "Selected manager"
    );
    Assignee::Manager(manager.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> BucketKey {
        BucketKey {
            office: ResolvedOffice::Unit("Алматы".into()),
            segment: SegmentBucket::Mass,
            intent: Intent::Consultation,
            language: Language::Ru,
        }
    }

    fn managers(loads: &[(&str, u32)]) -> Vec<Manager> {
        loads
            .iter()
            .map(|(name, load)| Manager::new(name, "Спец", "", "Алматы", *load))
            .collect()
    }

    #[test]
    fn empty_set_is_unassigned_without_side_effects() {
        let mut pool = managers(&[("A", 0)]);
        let mut state = RoundRobinState::new();
        assert_eq!(
            select(&mut pool, &[], &key(), &mut state),
            Assignee::Unassigned
        );
        assert_eq!(pool[0].load, 0);
        assert_eq!(state.peek(&key()), 0);
    }

    #[test]
    fn single_candidate_always_chosen() {
        let mut pool = managers(&[("A", 5)]);
        let mut state = RoundRobinState::new();
        for expected_load in 6..9 {
            assert_eq!(
                select(&mut pool, &[0], &key(), &mut state),
                Assignee::Manager("A".into())
            );
            assert_eq!(pool[0].load, expected_load);
        }
        assert_eq!(state.peek(&key()), 3);
    }

    #[test]
    fn load_saturates_at_max() {
        let mut pool = managers(&[("A", u32::MAX)]);
        let mut state = RoundRobinState::new();
        assert_eq!(
            select(&mut pool, &[0], &key(), &mut state),
            Assignee::Manager("A".into())
        );
        assert_eq!(pool[0].load, u32::MAX);
    }

    #[test]
    fn tied_loads_alternate_between_two_lowest_names() {
        let mut pool = managers(&[("Cara", 0), ("Bob", 0), ("Ann", 0)]);
        let mut state = RoundRobinState::new();
        let mut picks = Vec::new();
        for _ in 0..4 {
            picks.push(select(&mut pool, &[0, 1, 2], &key(), &mut state));
            // Keep the tie so only the counter decides.
            pool.iter_mut().for_each(|m| m.load = 0);
        }
        let names: Vec<&str> = picks.iter().map(Assignee::as_str).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Ann", "Bob"]);
    }

    #[test]
    fn top_two_is_recomputed_after_each_pick() {
        let mut pool = managers(&[("Ann", 1), ("Bob", 1), ("Cara", 1)]);
        let mut state = RoundRobinState::new();
        let names: Vec<String> = (0..4)
            .map(|_| {
                select(&mut pool, &[0, 1, 2], &key(), &mut state)
                    .as_str()
                    .to_string()
            })
            .collect();
        // [Ann, Bob]#0 → Ann; [Bob, Cara]#1 → Cara; [Bob, Ann]#2 → Bob;
        // [Ann, Bob]#3 → Bob.
        assert_eq!(names, vec!["Ann", "Cara", "Bob", "Bob"]);
        let loads: Vec<u32> = pool.iter().map(|m| m.load).collect();
        assert_eq!(loads, vec![2, 3, 2]);
    }

    #[test]
    fn lower_load_wins_over_name() {
        let mut pool = managers(&[("Ann", 3), ("Zed", 0), ("Bob", 1)]);
        let mut state = RoundRobinState::new();
        assert_eq!(
            select(&mut pool, &[0, 1, 2], &key(), &mut state).as_str(),
            "Zed"
        );
        assert_eq!(pool[1].load, 1);
    }

    #[test]
    fn counters_are_per_bucket() {
        let mut pool = managers(&[("Ann", 0), ("Bob", 0)]);
        let mut state = RoundRobinState::new();
        let other = BucketKey {
            language: Language::Kz,
            ..key()
        };
        select(&mut pool, &[0, 1], &key(), &mut state);
        select(&mut pool, &[0, 1], &other, &mut state);
        assert_eq!(state.peek(&key()), 1);
        assert_eq!(state.peek(&other), 1);

        state.reset();
        assert_eq!(state.peek(&key()), 0);
    }
}
