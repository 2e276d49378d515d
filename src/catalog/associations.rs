//! Cast ordering and association reconciliation.
//!
//! A movie's cast is stored as join rows carrying a `cast_order`. Every write
//! that submits a cast list re-derives the order from list position, so the
//! stored orders are always the dense sequence `0..n` in submission order.
//! Genre membership is reconciled with the same set difference, minus order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entry of a submitted cast list. Its position in the list is its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastSubmission {
    pub actor_id: i32,
    #[serde(default)]
    pub character: String,
}

impl CastSubmission {
    pub fn new(actor_id: i32, character: impl Into<String>) -> Self {
        Self {
            actor_id,
            character: character.into(),
        }
    }
}

/// A stored cast row, minus the owning movie id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastMember {
    pub actor_id: i32,
    pub character: String,
    pub order: i32,
}

fn position_to_order(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Cast for a freshly created movie.
#[must_use]
pub fn assign_cast_order(submitted: &[CastSubmission]) -> Vec<CastMember> {
    submitted
        .iter()
        .enumerate()
        .map(|(position, entry)| CastMember {
            actor_id: entry.actor_id,
            character: entry.character.clone(),
            order: position_to_order(position),
        })
        .collect()
}

/// Row-level changes that turn the stored cast into the submitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastPlan {
    /// Actors not previously in the cast.
    pub insert: Vec<CastMember>,
    /// Actors kept in the cast. Order and character always come from the
    /// new submission, even when unchanged.
    pub retain: Vec<CastMember>,
    /// Actor ids whose rows must be deleted.
    pub remove: Vec<i32>,
}

impl CastPlan {
    /// The cast as it reads once the plan is applied, sorted by order.
    #[cfg(test)]
    #[must_use]
    pub fn resulting_cast(&self) -> Vec<CastMember> {
        let mut cast: Vec<CastMember> = self
            .retain
            .iter()
            .chain(self.insert.iter())
            .cloned()
            .collect();
        cast.sort_by_key(|member| member.order);
        cast
    }
}

/// Diffs the stored cast against a newly submitted list.
///
/// The submitted list must not contain duplicate actors; callers reject
/// those with [`duplicate_actor_ids`] first.
#[must_use]
pub fn reconcile_cast(existing: &[CastMember], submitted: &[CastSubmission]) -> CastPlan {
    let stored: HashSet<i32> = existing.iter().map(|member| member.actor_id).collect();
    let wanted: HashSet<i32> = submitted.iter().map(|entry| entry.actor_id).collect();

    let mut plan = CastPlan {
        remove: existing
            .iter()
            .map(|member| member.actor_id)
            .filter(|actor_id| !wanted.contains(actor_id))
            .collect(),
        ..CastPlan::default()
    };

    for member in assign_cast_order(submitted) {
        if stored.contains(&member.actor_id) {
            plan.retain.push(member);
        } else {
            plan.insert.push(member);
        }
    }

    plan
}

/// Renumbers a cast to `0..n`, keeping relative order. Used when rows
/// disappear without a new submission, e.g. an actor being deleted.
#[must_use]
pub fn compact_cast(mut cast: Vec<CastMember>) -> Vec<CastMember> {
    cast.sort_by_key(|member| member.order);
    for (position, member) in cast.iter_mut().enumerate() {
        member.order = position_to_order(position);
    }
    cast
}

/// Actor ids listed more than once, in first-repeat order.
#[must_use]
pub fn duplicate_actor_ids(submitted: &[CastSubmission]) -> Vec<i32> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in submitted {
        if !seen.insert(entry.actor_id) && !duplicates.contains(&entry.actor_id) {
            duplicates.push(entry.actor_id);
        }
    }
    duplicates
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenrePlan {
    pub insert: Vec<i32>,
    pub remove: Vec<i32>,
}

/// Submitted genre ids without repeats, first occurrence wins.
#[must_use]
pub fn distinct_genre_ids(submitted: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    submitted
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

#[must_use]
pub fn reconcile_genres(existing: &[i32], submitted: &[i32]) -> GenrePlan {
    let stored: HashSet<i32> = existing.iter().copied().collect();
    let wanted = distinct_genre_ids(submitted);
    let wanted_set: HashSet<i32> = wanted.iter().copied().collect();

    GenrePlan {
        insert: wanted
            .into_iter()
            .filter(|id| !stored.contains(id))
            .collect(),
        remove: existing
            .iter()
            .copied()
            .filter(|id| !wanted_set.contains(id))
            .collect(),
    }
}

/// Checks that `cast` is ordered `0..n` with no actor listed twice.
#[cfg(test)]
#[must_use]
pub fn is_dense(cast: &[CastMember]) -> bool {
    let mut orders = std::collections::HashMap::new();
    for member in cast {
        if orders.insert(member.actor_id, member.order).is_some() {
            return false;
        }
    }
    let mut values: Vec<i32> = orders.into_values().collect();
    values.sort_unstable();
    values
        .iter()
        .enumerate()
        .all(|(position, order)| *order == position_to_order(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(entries: &[(i32, &str)]) -> Vec<CastSubmission> {
        entries
            .iter()
            .map(|(id, character)| CastSubmission::new(*id, *character))
            .collect()
    }

    fn orders(members: &[CastMember]) -> Vec<(i32, i32)> {
        members.iter().map(|m| (m.actor_id, m.order)).collect()
    }

    #[test]
    fn create_assigns_submission_positions() {
        let members = assign_cast_order(&cast(&[(10, "Neo"), (20, "Trinity"), (30, "Morpheus")]));
        assert_eq!(orders(&members), vec![(10, 0), (20, 1), (30, 2)]);
        assert!(is_dense(&members));
    }

    #[test]
    fn empty_cast_is_valid() {
        assert!(assign_cast_order(&[]).is_empty());
        let plan = reconcile_cast(&[], &[]);
        assert_eq!(plan, CastPlan::default());
    }

    #[test]
    fn update_reorders_and_removes() {
        let existing = assign_cast_order(&cast(&[(1, "A"), (2, "B"), (3, "C")]));
        let plan = reconcile_cast(&existing, &cast(&[(3, "C"), (1, "A")]));

        assert_eq!(plan.remove, vec![2]);
        assert!(plan.insert.is_empty());
        assert_eq!(orders(&plan.retain), vec![(3, 0), (1, 1)]);
        assert_eq!(orders(&plan.resulting_cast()), vec![(3, 0), (1, 1)]);
    }

    #[test]
    fn retained_members_are_always_rewritten() {
        let existing = assign_cast_order(&cast(&[(1, "Old"), (2, "Same")]));
        let plan = reconcile_cast(&existing, &cast(&[(1, "New"), (2, "Same")]));

        assert_eq!(plan.retain.len(), 2);
        assert_eq!(plan.retain[0].character, "New");
        assert_eq!(plan.retain[1].order, 1);
    }

    #[test]
    fn stale_orders_never_survive() {
        let existing = vec![
            CastMember {
                actor_id: 7,
                character: "X".to_string(),
                order: 5,
            },
            CastMember {
                actor_id: 8,
                character: "Y".to_string(),
                order: 9,
            },
        ];
        let plan = reconcile_cast(&existing, &cast(&[(8, "Y"), (9, "Z"), (7, "X")]));
        let result = plan.resulting_cast();

        assert_eq!(orders(&result), vec![(8, 0), (9, 1), (7, 2)]);
        assert_eq!(orders(&plan.insert), vec![(9, 1)]);
        assert!(is_dense(&result));
    }

    #[test]
    fn submitting_empty_list_removes_everyone() {
        let existing = assign_cast_order(&cast(&[(1, "A"), (2, "B")]));
        let plan = reconcile_cast(&existing, &[]);
        assert_eq!(plan.remove, vec![1, 2]);
        assert!(plan.resulting_cast().is_empty());
    }

    #[test]
    fn ana_and_bob_scenario() {
        let created = assign_cast_order(&cast(&[(2, "Bob's part"), (1, "Ana's part")]));
        assert_eq!(orders(&created), vec![(2, 0), (1, 1)]);

        let plan = reconcile_cast(&created, &cast(&[(1, "Ana's part")]));
        assert_eq!(plan.remove, vec![2]);
        assert_eq!(orders(&plan.resulting_cast()), vec![(1, 0)]);
    }

    #[test]
    fn compact_closes_gaps_in_order() {
        let members = vec![
            CastMember {
                actor_id: 4,
                character: String::new(),
                order: 3,
            },
            CastMember {
                actor_id: 2,
                character: String::new(),
                order: 0,
            },
        ];
        let compacted = compact_cast(members);
        assert_eq!(orders(&compacted), vec![(2, 0), (4, 1)]);
    }

    #[test]
    fn duplicates_are_reported_once() {
        let submitted = cast(&[(1, "A"), (2, "B"), (1, "A again"), (1, "thrice")]);
        assert_eq!(duplicate_actor_ids(&submitted), vec![1]);
        assert!(duplicate_actor_ids(&cast(&[(1, "A"), (2, "B")])).is_empty());
    }

    #[test]
    fn genre_reconciliation_is_a_set_difference() {
        let plan = reconcile_genres(&[1, 2, 3], &[3, 4, 4, 5]);
        assert_eq!(plan.insert, vec![4, 5]);
        assert_eq!(plan.remove, vec![1, 2]);

        let plan = reconcile_genres(&[1, 2], &[]);
        assert!(plan.insert.is_empty());
        assert_eq!(plan.remove, vec![1, 2]);

        assert_eq!(distinct_genre_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn dense_check_rejects_gaps_and_duplicates() {
        let gap = vec![CastMember {
            actor_id: 1,
            character: String::new(),
            order: 1,
        }];
        assert!(!is_dense(&gap));

        let twice = vec![
            CastMember {
                actor_id: 1,
                character: String::new(),
                order: 0,
            },
            CastMember {
                actor_id: 1,
                character: String::new(),
                order: 1,
            },
        ];
        assert!(!is_dense(&twice));
    }
}
