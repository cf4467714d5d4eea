//! Tree and breadcrumb views over a flat category snapshot

use super::Hierarchy;
use shared::models::{Category, CategoryTreeNode};
use std::collections::{HashMap, HashSet};

/// Build the nested tree below `parent` (None = from the roots).
///
/// Siblings are ordered by `sort_order`, then `name`. Categories whose
/// parent is missing from the snapshot are not reachable and are omitted.
pub fn build_tree(
    categories: &[Category],
    parent: Option<i64>,
    depth: u32,
) -> Vec<CategoryTreeNode> {
    let hierarchy = Hierarchy::new(categories);
    let mut visited = HashSet::new();
    build_level(&hierarchy, parent, depth, None, &mut visited)
}

/// Same as [`build_tree`] from the roots, filling in `product_count` from `counts`.
pub fn build_tree_with_counts(
    categories: &[Category],
    counts: &HashMap<i64, u64>,
) -> Vec<CategoryTreeNode> {
    let hierarchy = Hierarchy::new(categories);
    let mut visited = HashSet::new();
    build_level(&hierarchy, None, 0, Some(counts), &mut visited)
}

fn build_level(
    hierarchy: &Hierarchy<'_>,
    parent: Option<i64>,
    depth: u32,
    counts: Option<&HashMap<i64, u64>>,
    visited: &mut HashSet<i64>,
) -> Vec<CategoryTreeNode> {
    let mut nodes = Vec::new();
    for category in hierarchy.children_of(parent) {
        // A stored loop would otherwise recurse forever
        if !visited.insert(category.id) {
            continue;
        }
        let children = build_level(hierarchy, Some(category.id), depth + 1, counts, visited);
        nodes.push(CategoryTreeNode {
            category: (*category).clone(),
            level: depth,
            product_count: counts
                .and_then(|c| c.get(&category.id).copied())
                .unwrap_or(0),
            children,
        });
    }
    nodes
}

/// Pre-order traversal of a tree: every parent precedes its children.
pub fn flatten(tree: &[CategoryTreeNode]) -> Vec<&Category> {
    let mut out = Vec::new();
    let mut stack: Vec<&CategoryTreeNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(&node.category);
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Names from the root down to `id`, for breadcrumbs.
///
/// Returns `None` when `id` is not in the snapshot. A dangling parent ends the
/// path at the last category that exists.
pub fn category_path(id: i64, categories: &[Category]) -> Option<Vec<String>> {
    let hierarchy = Hierarchy::new(categories);
    let mut current = hierarchy.get(id)?;

    let mut names = vec![current.name.clone()];
    let mut visited = HashSet::from([current.id]);

    while let Some(parent_id) = current.parent_category {
        let Some(parent) = hierarchy.get(parent_id) else {
            break;
        };
        if !visited.insert(parent.id) {
            break;
        }
        names.push(parent.name.clone());
        current = parent;
    }

    names.reverse();
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::fixtures::wood_oak_tables;

    fn ids(tree: &[CategoryTreeNode]) -> Vec<i64> {
        flatten(tree).into_iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_build_tree_nests_and_levels() {
        let tree = build_tree(&wood_oak_tables(), None, 0);
        assert_eq!(tree.len(), 1);
        let wood = &tree[0];
        assert_eq!(wood.category.name, "Wood");
        assert_eq!(wood.level, 0);
        let oak = &wood.children[0];
        assert_eq!(oak.category.name, "Oak");
        assert_eq!(oak.level, 1);
        let tables = &oak.children[0];
        assert_eq!(tables.category.name, "Tables");
        assert_eq!(tables.level, 2);
        assert!(tables.children.is_empty());
    }

    #[test]
    fn test_siblings_sorted_by_sort_order_then_name() {
        let categories = vec![
            Category::new(1, "Zebra", "zebra").with_sort_order(1),
            Category::new(2, "Beta", "beta").with_sort_order(0),
            Category::new(3, "Alpha", "alpha").with_sort_order(0),
            Category::new(4, "Child B", "child-b").with_parent(1),
            Category::new(5, "Child A", "child-a").with_parent(1),
        ];
        let tree = build_tree(&categories, None, 0);
        let root_names: Vec<_> = tree.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(root_names, ["Alpha", "Beta", "Zebra"]);
        let child_names: Vec<_> = tree[2]
            .children
            .iter()
            .map(|n| n.category.name.as_str())
            .collect();
        assert_eq!(child_names, ["Child A", "Child B"]);
    }

    #[test]
    fn test_subtree_from_parent_with_depth() {
        let tree = build_tree(&wood_oak_tables(), Some(1), 1);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category.id, 2);
        assert_eq!(tree[0].level, 1);
        assert_eq!(tree[0].children[0].level, 2);
    }

    #[test]
    fn test_flatten_recovers_ids_parent_first() {
        let categories = vec![
            Category::new(10, "Living", "living"),
            Category::new(11, "Sofas", "sofas").with_parent(10),
            Category::new(12, "Armchairs", "armchairs").with_parent(10),
            Category::new(13, "Recliners", "recliners").with_parent(12),
            Category::new(20, "Office", "office"),
            Category::new(21, "Desks", "desks").with_parent(20),
        ];
        let tree = build_tree(&categories, None, 0);
        let order = ids(&tree);

        let mut expected: Vec<i64> = categories.iter().map(|c| c.id).collect();
        let mut got = order.clone();
        expected.sort();
        got.sort();
        assert_eq!(got, expected);

        let position = |id: i64| order.iter().position(|&x| x == id).unwrap();
        for c in &categories {
            if let Some(parent) = c.parent_category {
                assert!(position(parent) < position(c.id));
            }
        }
    }

    #[test]
    fn test_build_tree_does_not_mutate_and_is_repeatable() {
        let categories = wood_oak_tables();
        let snapshot = categories.clone();
        let first = build_tree(&categories, None, 0);
        let second = build_tree(&categories, None, 0);
        assert_eq!(first, second);
        assert_eq!(categories, snapshot);
    }

    #[test]
    fn test_orphans_are_omitted() {
        let mut categories = wood_oak_tables();
        categories.push(Category::new(9, "Lost", "lost").with_parent(404));
        let tree = build_tree(&categories, None, 0);
        assert!(!ids(&tree).contains(&9));
    }

    #[test]
    fn test_stored_loop_terminates() {
        let categories = vec![
            Category::new(1, "A", "a").with_parent(2),
            Category::new(2, "B", "b").with_parent(1),
        ];
        let tree = build_tree(&categories, Some(1), 0);
        assert_eq!(ids(&tree), vec![2, 1]);
    }

    #[test]
    fn test_build_tree_with_counts() {
        let counts = HashMap::from([(1, 3), (3, 2)]);
        let tree = build_tree_with_counts(&wood_oak_tables(), &counts);
        assert_eq!(tree[0].product_count, 3);
        assert_eq!(tree[0].children[0].product_count, 0);
        assert_eq!(tree[0].children[0].children[0].product_count, 2);
    }

    #[test]
    fn test_category_path() {
        let categories = wood_oak_tables();
        assert_eq!(
            category_path(3, &categories),
            Some(vec!["Wood".to_string(), "Oak".to_string(), "Tables".to_string()])
        );
        assert_eq!(category_path(1, &categories), Some(vec!["Wood".to_string()]));
        assert_eq!(category_path(99, &categories), None);
    }

    #[test]
    fn test_category_path_stops_at_dangling_parent() {
        let categories = vec![
            Category::new(2, "Oak", "oak").with_parent(1),
            Category::new(3, "Tables", "tables").with_parent(2),
        ];
        assert_eq!(
            category_path(3, &categories),
            Some(vec!["Oak".to_string(), "Tables".to_string()])
        );
    }
}
