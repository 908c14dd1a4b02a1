// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use storefront_app::{
    CartStore, Catalog, CatalogSource, CatalogTab, Category, Fetched, Item, ScreenController,
    ScreenState, load_catalog,
};
use storefront_catalog::{Client, HttpCatalogSource};
use storefront_testkit::DemoCatalogSource;

use crate::config::Config;

#[derive(Debug, Clone)]
pub enum RuntimeSource {
    Http(HttpCatalogSource),
    Demo(DemoCatalogSource),
}

impl RuntimeSource {
    pub fn from_config(config: &Config, demo: bool) -> Result<Self> {
        if demo {
            return Ok(Self::Demo(DemoCatalogSource::demo()));
        }
        let client = Client::new(config.catalog_base_url(), config.catalog_timeout()?)?;
        Ok(Self::Http(HttpCatalogSource::new(
            client,
            config.catalog_paths(),
        )))
    }

    pub fn feeds(&self) -> Vec<CatalogTab> {
        let has_services = match self {
            Self::Http(source) => source.paths().services.is_some(),
            Self::Demo(_) => true,
        };
        if has_services {
            vec![CatalogTab::Products, CatalogTab::Services]
        } else {
            vec![CatalogTab::Products]
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.client().base_url().to_owned(),
            Self::Demo(_) => "demo catalog".to_owned(),
        }
    }
}

impl CatalogSource for RuntimeSource {
    fn fetch_catalog_items(&mut self) -> Fetched<Vec<Item>> {
        match self {
            Self::Http(source) => source.fetch_catalog_items(),
            Self::Demo(source) => source.fetch_catalog_items(),
        }
    }

    fn fetch_categories(&mut self) -> Fetched<Vec<Category>> {
        match self {
            Self::Http(source) => source.fetch_categories(),
            Self::Demo(source) => source.fetch_categories(),
        }
    }

    fn fetch_service_items(&mut self) -> Option<Fetched<Vec<Item>>> {
        match self {
            Self::Http(source) => source.fetch_service_items(),
            Self::Demo(source) => source.fetch_service_items(),
        }
    }
}

pub fn build_controller(
    source: &RuntimeSource,
    initial_tab: CatalogTab,
    category: &str,
) -> ScreenController {
    let state = ScreenState {
        tab: initial_tab,
        ..ScreenState::opened_with(Some(category))
    };
    ScreenController::new(
        CartStore::new(),
        Catalog::with_feeds(&source.feeds()),
        state,
    )
}

pub fn check_catalog(source: &mut impl CatalogSource) -> Result<String> {
    let load = load_catalog(source);
    let mut failures = Vec::new();
    if let Fetched::Failed(error) = &load.products {
        failures.push(format!("products: {error}"));
    }
    if let Some(Fetched::Failed(error)) = &load.services {
        failures.push(format!("services: {error}"));
    }
    if let Fetched::Failed(error) = &load.categories {
        failures.push(format!("categories: {error}"));
    }
    if !failures.is_empty() {
        bail!("catalog check failed; {}", failures.join("; "));
    }

    let count = |fetched: &Fetched<Vec<Item>>| fetched.ready().map_or(0, Vec::len);
    let services = match &load.services {
        Some(services) => format!("{} services", count(services)),
        None => "no services feed".to_owned(),
    };
    Ok(format!(
        "catalog ok: {} products, {}, {} categories",
        count(&load.products),
        services,
        load.categories.ready().map_or(0, Vec::len),
    ))
}

pub fn launch(source: RuntimeSource, initial_tab: CatalogTab, category: &str) -> Result<()> {
    let controller = build_controller(&source, initial_tab, category);
    tracing::info!(
        source = %source.describe(),
        tab = initial_tab.as_str(),
        category,
        "storefront session started"
    );
    let result = storefront_tui::run_app(&controller, source);
    tracing::info!(
        cart_units = controller.cart().total_units(),
        "storefront session ended"
    );
    result
}
