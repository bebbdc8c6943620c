//! Service category model

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::prompt::Choice;

/// A service category the user can request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Text shown on the button and in the summary
    pub label: String,
    /// Callback data sent back when the button is pressed
    pub code: String,
}

impl Category {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }
}

/// Ordered, read-only list of categories offered in the start menu.
///
/// Built once at startup; clones share the same list.
#[derive(Debug, Clone)]
pub struct CategoryMenu {
    categories: Arc<[Category]>,
}

impl CategoryMenu {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into(),
        }
    }

    /// Look up a category by its selection code
    pub fn find_by_code(&self, code: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.code == code)
    }

    /// Buttons for the menu, one per category, in menu order
    pub fn choices(&self) -> Vec<Choice> {
        self.categories
            .iter()
            .map(|c| Choice::new(c.label.clone(), c.code.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryMenu {
    fn default() -> Self {
        Self::new(vec![
            Category::new("Тепловые насосы", "cat_hp"),
            Category::new("Электромонтаж", "cat_elec"),
            Category::new("Видеонаблюдение", "cat_cctv"),
            Category::new("Солнечные панели", "cat_pv"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_order() {
        let menu = CategoryMenu::default();
        let codes: Vec<_> = menu.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["cat_hp", "cat_elec", "cat_cctv", "cat_pv"]);
    }

    #[test]
    fn test_find_by_code() {
        let menu = CategoryMenu::default();
        assert_eq!(menu.find_by_code("cat_pv").map(|c| c.label.as_str()), Some("Солнечные панели"));
        assert!(menu.find_by_code("cat_unknown").is_none());
        assert!(menu.find_by_code("Солнечные панели").is_none());
    }

    #[test]
    fn test_choices_mirror_menu() {
        let menu = CategoryMenu::default();
        let choices = menu.choices();
        assert_eq!(choices.len(), menu.len());
        assert_eq!(choices[1], Choice::new("Электромонтаж", "cat_elec"));
    }
}
