//! Descendant-aware product counts
//!
//! A category's product count is the number of products assigned directly
//! to it plus those assigned to any of its descendants. How products are
//! stored is hidden behind [`ProductCounter`].

use super::Hierarchy;
use crate::db::repository::{ProductCounter, RepoResult};
use shared::models::Category;
use std::collections::{HashMap, HashSet, VecDeque};

/// All ids below `category_id` (children, grandchildren, ...), excluding itself.
pub fn descendant_ids(category_id: i64, categories: &[Category]) -> HashSet<i64> {
    let hierarchy = Hierarchy::new(categories);
    collect_descendants(&hierarchy, category_id)
}

fn collect_descendants(hierarchy: &Hierarchy<'_>, category_id: i64) -> HashSet<i64> {
    let mut found = HashSet::new();
    let mut queue = VecDeque::from([category_id]);

    while let Some(current) = queue.pop_front() {
        for child in hierarchy.children_of(Some(current)) {
            if child.id != category_id && found.insert(child.id) {
                queue.push_back(child.id);
            }
        }
    }

    found
}

/// Products in `category_id` plus all of its descendants.
///
/// Issues two independent counts (direct, then descendants); they are not
/// taken from one atomic snapshot of the product collection.
pub async fn count_products<C>(
    category_id: i64,
    categories: &[Category],
    counter: &C,
) -> RepoResult<u64>
where
    C: ProductCounter + ?Sized,
{
    let descendants = descendant_ids(category_id, categories);

    let direct = counter.count_in(&HashSet::from([category_id])).await?;
    let nested = if descendants.is_empty() {
        0
    } else {
        counter.count_in(&descendants).await?
    };

    Ok(direct + nested)
}

/// Counts for every category in the snapshot with a single grouped query.
///
/// Gives the same numbers as calling [`count_products`] per category.
pub async fn count_products_batch<C>(
    categories: &[Category],
    counter: &C,
) -> RepoResult<HashMap<i64, u64>>
where
    C: ProductCounter + ?Sized,
{
    if categories.is_empty() {
        return Ok(HashMap::new());
    }

    let all_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    let direct = counter.count_grouped(&all_ids).await?;

    let hierarchy = Hierarchy::new(categories);
    let totals = categories
        .iter()
        .map(|category| {
            let own = direct.get(&category.id).copied().unwrap_or(0);
            let nested: u64 = collect_descendants(&hierarchy, category.id)
                .iter()
                .map(|id| direct.get(id).copied().unwrap_or(0))
                .sum();
            (category.id, own + nested)
        })
        .collect();

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::fixtures::wood_oak_tables;
    use crate::db::MemoryStore;
    use shared::models::Product;

    fn store_with_products(categories: &[&str]) -> MemoryStore {
        let products = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| Product::new(i as i64 + 100, format!("p{i}"), *cat))
            .collect();
        MemoryStore::with_products(products)
    }

    #[test]
    fn test_descendant_ids() {
        let categories = wood_oak_tables();
        assert_eq!(descendant_ids(1, &categories), HashSet::from([2, 3]));
        assert_eq!(descendant_ids(2, &categories), HashSet::from([3]));
        assert!(descendant_ids(3, &categories).is_empty());
        assert!(descendant_ids(42, &categories).is_empty());
    }

    #[test]
    fn test_descendant_ids_survive_stored_loop() {
        let categories = vec![
            Category::new(1, "A", "a").with_parent(2),
            Category::new(2, "B", "b").with_parent(1),
        ];
        assert_eq!(descendant_ids(1, &categories), HashSet::from([2]));
    }

    #[tokio::test]
    async fn test_count_products_includes_descendants() {
        let categories = wood_oak_tables();
        let store = store_with_products(&["2", "3", "3"]);

        assert_eq!(count_products(1, &categories, &store).await.unwrap(), 3);
        assert_eq!(count_products(2, &categories, &store).await.unwrap(), 3);
        assert_eq!(count_products(3, &categories, &store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_count_products_direct_only() {
        let categories = wood_oak_tables();
        let store = store_with_products(&["1", "1"]);
        assert_eq!(count_products(1, &categories, &store).await.unwrap(), 2);
        assert_eq!(count_products(2, &categories, &store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_matches_per_category_counts() {
        let mut categories = wood_oak_tables();
        categories.push(Category::new(4, "Metal", "metal"));
        categories.push(Category::new(5, "Steel", "steel").with_parent(4));
        let store = store_with_products(&["1", "2", "3", "3", "5", "4", "99"]);

        let batch = count_products_batch(&categories, &store).await.unwrap();
        for c in &categories {
            let single = count_products(c.id, &categories, &store).await.unwrap();
            assert_eq!(batch[&c.id], single, "category {}", c.id);
        }
        assert_eq!(batch[&1], 4);
        assert_eq!(batch[&4], 2);
    }

    #[tokio::test]
    async fn test_batch_on_empty_snapshot() {
        let store = store_with_products(&["1"]);
        assert!(count_products_batch(&[], &store).await.unwrap().is_empty());
    }
}
