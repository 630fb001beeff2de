//! Category registry

use odra::prelude::*;

use crate::errors::Error;
use crate::types::Category;

/// Named tags courses attach to
#[odra::module]
pub struct CategoryRegistry {
    /// Mapping of category ID to Category data
    categories: Mapping<u64, Category>,
    /// Total number of categories (used for generating IDs)
    category_count: Var<u64>,
}

#[odra::module]
impl CategoryRegistry {
    /// Append a new active category and return it
    pub fn create(&mut self, name: String) -> Category {
        if name.is_empty() {
            self.env().revert(Error::EmptyCategoryName);
        }

        let category_id = self.category_count.get_or_default() + 1;
        self.category_count.set(category_id);

        let category = Category {
            id: category_id,
            name,
            active: true,
        };
        self.categories.set(&category_id, category.clone());
        category
    }

    /// Rename and enable/disable an existing category
    pub fn update(&mut self, category_id: u64, name: String, active: bool) -> Category {
        let mut category = self.categories.get(&category_id)
            .unwrap_or_else(|| self.env().revert(Error::CategoryNotFound));
        if name.is_empty() {
            self.env().revert(Error::EmptyCategoryName);
        }

        category.name = name;
        category.active = active;
        self.categories.set(&category_id, category.clone());
        category
    }

    /// Revert unless a course may be filed under `category_id`.
    /// Zero means uncategorized and is always allowed.
    pub fn require_assignable(&self, category_id: u64) {
        if category_id == 0 {
            return;
        }
        let category = self.categories.get(&category_id)
            .unwrap_or_else(|| self.env().revert(Error::CategoryNotFound));
        if !category.active {
            self.env().revert(Error::CategoryInactive);
        }
    }

    /// Get a category by ID
    pub fn get_category(&self, category_id: u64) -> Option<Category> {
        self.categories.get(&category_id)
    }

    /// Number of categories ever created
    pub fn get_category_count(&self) -> u64 {
        self.category_count.get_or_default()
    }

    /// All categories, active or not
    pub fn get_all_categories(&self) -> Vec<Category> {
        let count = self.category_count.get_or_default();
        let mut result = Vec::new();

        for id in 1..=count {
            if let Some(category) = self.categories.get(&id) {
                result.push(category);
            }
        }

        result
    }
}
