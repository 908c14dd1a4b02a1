// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Catalog, CatalogTab, Item};

pub fn filter_by_category<'a>(items: &'a [Item], category: &str) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| item.category.contains(category))
        .collect()
}

pub fn visible_items<'a>(catalog: &'a Catalog, tab: CatalogTab, category: &str) -> Vec<&'a Item> {
    filter_by_category(catalog.source(tab).items(), category)
}

pub fn narrow_by_search<'a>(items: Vec<&'a Item>, query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}
