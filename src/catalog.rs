use std::collections::HashMap;
use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::models::{Category, Ingredient};

const DEFAULT_CATALOG: &str = include_str!("../data/ingredients.json");

/// Read-only ingredient lookup table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(ingredients: Vec<Ingredient>) -> Result<Self> {
        let mut index = HashMap::with_capacity(ingredients.len());
        for (pos, ingredient) in ingredients.iter().enumerate() {
            if ingredient.id.trim().is_empty() {
                return Err(PlannerError::InvalidCatalog(format!(
                    "ingredient '{}' has an empty id",
                    ingredient.name
                )));
            }
            if index.insert(ingredient.id.clone(), pos).is_some() {
                return Err(PlannerError::InvalidCatalog(format!(
                    "duplicate ingredient id '{}'",
                    ingredient.id
                )));
            }
        }
        Ok(Self { ingredients, index })
    }

    /// The catalog bundled with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let ingredients: Vec<Ingredient> = serde_json::from_str(json)
            .map_err(|e| PlannerError::InvalidCatalog(e.to_string()))?;
        Self::new(ingredients)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PlannerError::InvalidCatalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.index.get(id).map(|&pos| &self.ingredients[pos])
    }

    pub fn category_of(&self, id: &str) -> Option<Category> {
        self.get(id).map(|i| i.category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.id.as_str())
    }

    /// Case-insensitive substring match on the display name.
    pub fn search(&self, query: &str) -> Vec<&Ingredient> {
        let needle = query.trim().to_lowercase();
        self.ingredients
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_covers_every_category() {
        let catalog = Catalog::embedded().unwrap();
        for category in Category::ALL {
            let count = catalog.iter().filter(|i| i.category == category).count();
            assert!(count >= 3, "{category} has only {count} ingredients");
        }
        assert_eq!(catalog.category_of("salmon"), Some(Category::Proteins));
        assert_eq!(catalog.category_of("unobtainium"), None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[
            { "id": "rice", "name": "Rice", "category": "carbohydrates" },
            { "id": "rice", "name": "Brown Rice", "category": "carbohydrates" }
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidCatalog(_)));
    }

    #[test]
    fn rejects_unknown_category() {
        let json = r#"[{ "id": "x", "name": "X", "category": "sweets" }]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn search_ignores_case() {
        let catalog = Catalog::embedded().unwrap();
        let hits: Vec<_> = catalog.search("POTATO").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(hits, vec!["potato", "sweet_potato"]);
    }
}
