// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Category, Fetched, Item, NoticeKind};

pub trait CatalogSource {
    fn fetch_catalog_items(&mut self) -> Fetched<Vec<Item>>;

    fn fetch_categories(&mut self) -> Fetched<Vec<Category>>;

    fn fetch_service_items(&mut self) -> Option<Fetched<Vec<Item>>> {
        None
    }
}

pub trait CartDispatcher {
    fn dispatch_add(&self, item: &Item);
}

pub trait Notifier {
    fn notify(&mut self, kind: NoticeKind, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoad {
    pub products: Fetched<Vec<Item>>,
    pub services: Option<Fetched<Vec<Item>>>,
    pub categories: Fetched<Vec<Category>>,
}

pub fn load_catalog(source: &mut impl CatalogSource) -> CatalogLoad {
    CatalogLoad {
        products: source.fetch_catalog_items(),
        services: source.fetch_service_items(),
        categories: source.fetch_categories(),
    }
}

pub fn add_to_cart_and_notify(
    item: &Item,
    dispatcher: &impl CartDispatcher,
    notifier: &mut impl Notifier,
) {
    dispatcher.dispatch_add(item);
    tracing::info!(item = %item.id, name = %item.name, "added to cart");
    notifier.notify(
        NoticeKind::Success,
        "Success",
        &format!("{} added to cart", item.name),
    );
}
