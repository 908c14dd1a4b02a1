// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::*;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTab {
    #[default]
    Services,
    Products,
}

impl CatalogTab {
    pub const ALL: [Self; 2] = [Self::Products, Self::Services];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Products => "products",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "services" => Some(Self::Services),
            "products" => Some(Self::Products),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::Products => "Products",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Services => Self::Products,
            Self::Products => Self::Services,
        }
    }

    pub const fn unavailable_message(self) -> &'static str {
        match self {
            Self::Services => "No services are available at your location",
            Self::Products => "No products are available at your location",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryMembership {
    Single(String),
    Multiple(Vec<String>),
}

impl Default for CategoryMembership {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl CategoryMembership {
    /// Substring match for a single label, element match for a list. The
    /// empty selection matches every item either way.
    pub fn contains(&self, selected: &str) -> bool {
        match self {
            Self::Single(label) => label.contains(selected),
            Self::Multiple(labels) => {
                selected.is_empty() || labels.iter().any(|label| label == selected)
            }
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Single(label) => label.clone(),
            Self::Multiple(labels) => labels.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: CategoryMembership,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: CategoryMembership::Single(category.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    Loading,
    Ready,
    Error,
}

impl FetchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Fetched<T> {
    pub const fn status(&self) -> FetchStatus {
        match self {
            Self::Loading => FetchStatus::Loading,
            Self::Ready(_) => FetchStatus::Ready,
            Self::Failed(_) => FetchStatus::Error,
        }
    }

    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Loading => Fetched::Loading,
            Self::Ready(value) => Fetched::Ready(f(value)),
            Self::Failed(error) => Fetched::Failed(error),
        }
    }
}

/// Backing collection for one tab. `Unavailable` means this deployment never
/// materializes a feed for the tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabSource {
    #[default]
    Unavailable,
    Feed(Fetched<Vec<Item>>),
}

impl TabSource {
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Feed(Fetched::Ready(items)) => items,
            _ => &[],
        }
    }

    pub fn status(&self) -> Option<FetchStatus> {
        match self {
            Self::Unavailable => None,
            Self::Feed(fetched) => Some(fetched.status()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub products: TabSource,
    pub services: TabSource,
    pub categories: Fetched<Vec<Category>>,
}

impl Catalog {
    pub fn with_feeds(tabs: &[CatalogTab]) -> Self {
        let mut catalog = Self::default();
        for tab in tabs {
            *catalog.source_mut(*tab) = TabSource::Feed(Fetched::Loading);
        }
        catalog
    }

    pub fn source(&self, tab: CatalogTab) -> &TabSource {
        match tab {
            CatalogTab::Services => &self.services,
            CatalogTab::Products => &self.products,
        }
    }

    pub fn source_mut(&mut self, tab: CatalogTab) -> &mut TabSource {
        match tab {
            CatalogTab::Services => &mut self.services,
            CatalogTab::Products => &mut self.products,
        }
    }

    pub fn find_item(&self, id: &ItemId) -> Option<&Item> {
        CatalogTab::ALL
            .iter()
            .flat_map(|tab| self.source(*tab).items())
            .find(|item| &item.id == id)
    }

    pub fn category_list(&self) -> &[Category] {
        self.categories.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogTab, CategoryMembership, Fetched, Item, ItemId, TabSource};

    #[test]
    fn item_decodes_single_and_list_categories() -> anyhow::Result<()> {
        let single: Item =
            serde_json::from_str(r#"{"id":1,"name":"Kale","category":"veg","price":3}"#)?;
        assert_eq!(single.id, ItemId::new("1"));
        assert_eq!(single.category, CategoryMembership::Single("veg".to_owned()));

        let list: Item =
            serde_json::from_str(r#"{"id":"b","name":"Plum","category":["fruit","stone"]}"#)?;
        assert_eq!(
            list.category,
            CategoryMembership::Multiple(vec!["fruit".to_owned(), "stone".to_owned()])
        );
        Ok(())
    }

    #[test]
    fn missing_or_null_category_reads_as_empty_label() -> anyhow::Result<()> {
        let missing: Item = serde_json::from_str(r#"{"id":"a","name":"Tea"}"#)?;
        let null: Item = serde_json::from_str(r#"{"id":"a","name":"Tea","category":null}"#)?;
        assert_eq!(missing.category, CategoryMembership::default());
        assert_eq!(null.category, CategoryMembership::default());
        Ok(())
    }

    #[test]
    fn single_label_uses_substring_membership() {
        let membership = CategoryMembership::Single("vegetables".to_owned());
        assert!(membership.contains("veg"));
        assert!(membership.contains(""));
        assert!(!membership.contains("fruit"));
    }

    #[test]
    fn label_list_uses_element_membership() {
        let membership = CategoryMembership::Multiple(vec!["vegetables".to_owned()]);
        assert!(membership.contains("vegetables"));
        assert!(membership.contains(""));
        assert!(!membership.contains("veg"));
    }

    #[test]
    fn tab_toggle_flips_between_both_tabs() {
        assert_eq!(CatalogTab::default(), CatalogTab::Services);
        assert_eq!(CatalogTab::Services.toggled(), CatalogTab::Products);
        assert_eq!(CatalogTab::Products.toggled(), CatalogTab::Services);
        assert_eq!(CatalogTab::parse("products"), Some(CatalogTab::Products));
        assert_eq!(CatalogTab::parse("Products"), None);
    }

    #[test]
    fn non_ready_feeds_read_as_empty() {
        let loading = TabSource::Feed(Fetched::Loading);
        let failed = TabSource::Feed(Fetched::Failed("boom".to_owned()));
        assert!(loading.items().is_empty());
        assert!(failed.items().is_empty());
        assert!(TabSource::Unavailable.items().is_empty());
        assert_eq!(TabSource::Unavailable.status(), None);
    }

    #[test]
    fn with_feeds_leaves_other_tabs_unavailable() {
        let catalog = Catalog::with_feeds(&[CatalogTab::Products]);
        assert_eq!(catalog.products, TabSource::Feed(Fetched::Loading));
        assert_eq!(catalog.services, TabSource::Unavailable);
    }
}
