//! Catalog filters

use crate::items::Item;

/// Value that disables a brand or category criterion.
pub const ALL: &str = "all";

/// Narrows a catalog by brand, category and free-text query.
///
/// Every criterion is optional; `None`, an empty string, or [`ALL`] disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Brand slug, e.g. `oliver-peoples`
    pub brand: Option<String>,

    /// Category slug, e.g. `sunglasses`
    pub category: Option<String>,

    /// Case-insensitive substring of the name, brand or description
    pub query: Option<String>,
}

impl CatalogFilter {
    /// A filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a brand slug.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Restrict to a category slug.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to items mentioning `query`.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Check whether `item` passes every active criterion.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(brand) = selector(self.brand.as_deref())
            && slugify(&item.brand) != slugify(brand)
        {
            return false;
        }

        if let Some(category) = selector(self.category.as_deref())
            && item.category != category
        {
            return false;
        }

        match self.query.as_deref() {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();

                [&item.name, &item.brand, &item.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            }
            _ => true,
        }
    }
}

/// Lowercases and joins whitespace-separated words with `-`.
///
/// `"Oliver Peoples"` becomes `"oliver-peoples"`; `"Ray-Ban"` becomes `"ray-ban"`.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn selector(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
}
