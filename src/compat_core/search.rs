//! Ingredient name lookup by case-insensitive substring

use super::presenter::compare_names;
use super::types::Ingredient;
use serde::Serialize;

/// Upper bound on search results
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub category: String,
}

impl From<Ingredient> for SearchHit {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            name: ingredient.name,
            category: ingredient.category,
        }
    }
}

/// Ingredients whose name contains `query`, alphabetical, capped at 10
///
/// `query` must be non-empty; validating that is the caller's job.
pub fn match_ingredients(query: &str, candidates: Vec<Ingredient>) -> Vec<SearchHit> {
    let needle = query.to_lowercase();

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .map(SearchHit::from)
        .collect();

    hits.sort_by(|a, b| compare_names(&a.name, &b.name));
    hits.truncate(MAX_SEARCH_RESULTS);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, category: &str) -> Ingredient {
        Ingredient {
            id: 0,
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_substring_alphabetical() {
        let candidates = vec![
            ingredient("orange juice", "beverage"),
            ingredient("spinach", "vegetable"),
            ingredient("orange", "fruit"),
        ];

        let names: Vec<_> = match_ingredients("oran", candidates)
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["orange", "orange juice"]);
    }

    #[test]
    fn test_case_insensitive() {
        let hits = match_ingredients("MILK", vec![ingredient("milk", "dairy")]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "dairy");
    }

    #[test]
    fn test_capped_at_ten() {
        let candidates = (0..25)
            .map(|i| ingredient(&format!("nut {:02}", i), "protein"))
            .collect();

        let hits = match_ingredients("nut", candidates);
        assert_eq!(hits.len(), MAX_SEARCH_RESULTS);
        assert_eq!(hits[0].name, "nut 00");
        assert_eq!(hits[9].name, "nut 09");
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let candidates = vec![
            ingredient("Zucchini bread", "grain"),
            ingredient("apple bread", "grain"),
            ingredient("Apple bread", "grain"),
        ];

        let names: Vec<_> = match_ingredients("bread", candidates)
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["Apple bread", "apple bread", "Zucchini bread"]);
    }

    #[test]
    fn test_no_match() {
        assert!(match_ingredients("xyz", vec![ingredient("oats", "grain")]).is_empty());
    }
}
