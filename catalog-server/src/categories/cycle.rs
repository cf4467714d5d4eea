//! Cycle detection for parent assignments

use shared::models::Category;
use std::collections::{HashMap, HashSet};

/// Whether making `proposed_parent` the parent of `category_id` would close a loop.
///
/// Walks the ancestor chain starting at the proposed parent. Reaching a root
/// or a dangling reference ends the walk; a repeated id means the snapshot is
/// already corrupted and is reported as a cycle.
pub fn would_create_cycle(
    category_id: i64,
    proposed_parent: Option<i64>,
    categories: &[Category],
) -> bool {
    cycle_chain(category_id, proposed_parent, categories).is_some()
}

/// Ancestor ids walked from `proposed_parent` up to the point where the loop
/// closes, or `None` when the assignment is safe.
pub fn cycle_chain(
    category_id: i64,
    proposed_parent: Option<i64>,
    categories: &[Category],
) -> Option<Vec<i64>> {
    let mut current = proposed_parent?;

    let parents: HashMap<i64, Option<i64>> = categories
        .iter()
        .map(|c| (c.id, c.parent_category))
        .collect();

    let mut chain = Vec::new();
    let mut visited = HashSet::new();

    loop {
        chain.push(current);
        if current == category_id || !visited.insert(current) {
            return Some(chain);
        }
        match parents.get(&current) {
            Some(Some(next)) => current = *next,
            // Root reached, or dangling reference
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::fixtures::wood_oak_tables;

    #[test]
    fn test_absent_parent_never_cycles() {
        let categories = wood_oak_tables();
        for c in &categories {
            assert!(!would_create_cycle(c.id, None, &categories));
        }
        assert!(!would_create_cycle(99, None, &[]));
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let categories = wood_oak_tables();
        for c in &categories {
            assert!(would_create_cycle(c.id, Some(c.id), &categories));
        }
    }

    #[test]
    fn test_descendant_as_parent_is_cycle() {
        let categories = wood_oak_tables();
        assert_eq!(cycle_chain(1, Some(3), &categories), Some(vec![3, 2, 1]));
        assert!(would_create_cycle(1, Some(2), &categories));
    }

    #[test]
    fn test_moving_under_unrelated_branch_is_safe() {
        let mut categories = wood_oak_tables();
        categories.push(Category::new(4, "Metal", "metal"));
        assert!(!would_create_cycle(2, Some(4), &categories));
        assert!(!would_create_cycle(4, Some(3), &categories));
    }

    #[test]
    fn test_dangling_parent_terminates_walk() {
        let categories = vec![Category::new(1, "Orphan", "orphan").with_parent(42)];
        assert!(!would_create_cycle(7, Some(1), &categories));
        assert!(!would_create_cycle(7, Some(42), &categories));
    }

    #[test]
    fn test_new_category_never_cycles() {
        let categories = wood_oak_tables();
        assert!(!would_create_cycle(100, Some(3), &categories));
    }

    #[test]
    fn test_preexisting_corruption_terminates() {
        // 1 -> 2 -> 1 loop already stored
        let categories = vec![
            Category::new(1, "A", "a").with_parent(2),
            Category::new(2, "B", "b").with_parent(1),
            Category::new(3, "C", "c"),
        ];
        assert!(would_create_cycle(3, Some(1), &categories));
    }

    #[test]
    fn test_safe_assignment_keeps_forest_acyclic() {
        let base = vec![
            Category::new(1, "A", "a"),
            Category::new(2, "B", "b").with_parent(1),
            Category::new(3, "C", "c").with_parent(1),
            Category::new(4, "D", "d").with_parent(3),
            Category::new(5, "E", "e"),
        ];
        for x in 1..=5 {
            for y in 1..=5 {
                if would_create_cycle(x, Some(y), &base) {
                    continue;
                }
                let mut moved = base.clone();
                if let Some(c) = moved.iter_mut().find(|c| c.id == x) {
                    c.parent_category = Some(y);
                }
                for c in &moved {
                    assert!(
                        !would_create_cycle(c.id, c.parent_category, &moved),
                        "moving {x} under {y} produced a loop at {}",
                        c.id
                    );
                }
            }
        }
    }
}
