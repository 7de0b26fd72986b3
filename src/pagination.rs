//! Shared pagination primitives.

use serde::Serialize;

/// Items shown per listing page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// One page of items together with the page index and total page count,
/// ready to be handed to a template.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, pages: usize) -> Self {
        Self { items, page, pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_serializes_page_fields() {
        let paginated = Paginated::new(vec![1, 2, 3], 2, 5);
        let value = serde_json::to_value(&paginated).unwrap();
        assert_eq!(value["page"], 2);
        assert_eq!(value["pages"], 5);
        assert_eq!(value["items"].as_array().unwrap().len(), 3);
    }
}
