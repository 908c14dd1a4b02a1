// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use storefront_app::{
    CatalogSource, Category, CategoryId, CategoryMembership, Fetched, Item, ItemId,
};

const PRODUCT_CATEGORIES: [&str; 5] = ["veg", "fruit", "bakery", "dairy", "pantry"];
const SERVICE_CATEGORIES: [&str; 3] = ["cleaning", "repair", "delivery"];

const PRODUCE_ADJECTIVES: [&str; 10] = [
    "Organic",
    "Heirloom",
    "Local",
    "Fresh",
    "Baby",
    "Wild",
    "Golden",
    "Red",
    "Crisp",
    "Seasonal",
];

const SERVICE_ADJECTIVES: [&str; 6] = ["Express", "Weekly", "Same-day", "Deep", "Basic", "Premium"];

const PROMO_LABEL: &str = "sale";
const DEMO_SEED: u64 = 7;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn one_in(&mut self, n: u64) -> bool {
        n > 0 && self.next_u64() % n == 0
    }
}

#[derive(Debug, Clone)]
pub struct StoreFaker {
    rng: DeterministicRng,
    next_product: u32,
    next_service: u32,
}

impl StoreFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_product: 1,
            next_service: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn product(&mut self) -> Item {
        let category = self.pick(&PRODUCT_CATEGORIES);
        let noun = self.pick(product_nouns(category));
        let adjective = self.pick(&PRODUCE_ADJECTIVES);
        let id = format!("p-{:03}", self.next_product);
        self.next_product += 1;

        let membership = if self.rng.one_in(5) {
            CategoryMembership::Multiple(vec![category.to_owned(), PROMO_LABEL.to_owned()])
        } else {
            CategoryMembership::Single(category.to_owned())
        };
        Item {
            id: ItemId::new(id),
            name: format!("{adjective} {noun}"),
            category: membership,
        }
    }

    pub fn service(&mut self) -> Item {
        let category = self.pick(&SERVICE_CATEGORIES);
        let noun = self.pick(service_nouns(category));
        let adjective = self.pick(&SERVICE_ADJECTIVES);
        let id = format!("s-{:03}", self.next_service);
        self.next_service += 1;
        Item::new(id, format!("{adjective} {noun}"), category)
    }

    pub fn products(&mut self, count: usize) -> Vec<Item> {
        (0..count).map(|_| self.product()).collect()
    }

    pub fn services(&mut self, count: usize) -> Vec<Item> {
        (0..count).map(|_| self.service()).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn categories() -> Vec<Category> {
    PRODUCT_CATEGORIES
        .iter()
        .chain(SERVICE_CATEGORIES.iter())
        .chain(std::iter::once(&PROMO_LABEL))
        .enumerate()
        .map(|(index, name)| Category {
            id: CategoryId::new((index + 1).to_string()),
            name: (*name).to_owned(),
        })
        .collect()
}

pub fn product_categories() -> &'static [&'static str] {
    &PRODUCT_CATEGORIES
}

pub fn service_categories() -> &'static [&'static str] {
    &SERVICE_CATEGORIES
}

fn product_nouns(category: &str) -> &'static [&'static str] {
    match category {
        "veg" => &["Kale", "Carrots", "Leeks", "Spinach", "Beets", "Chard"],
        "fruit" => &["Pears", "Apples", "Plums", "Figs", "Cherries"],
        "bakery" => &["Sourdough", "Rye Loaf", "Baguette", "Focaccia"],
        "dairy" => &["Yogurt", "Cheddar", "Butter", "Milk"],
        "pantry" => &["Oats", "Lentils", "Honey", "Olive Oil", "Rice"],
        _ => &["Groceries"],
    }
}

fn service_nouns(category: &str) -> &'static [&'static str] {
    match category {
        "cleaning" => &["Kitchen Clean", "Window Wash", "Carpet Shampoo"],
        "repair" => &["Appliance Fix", "Bike Tune-up", "Shoe Repair"],
        "delivery" => &["Grocery Drop-off", "Bulk Pickup"],
        _ => &["Errand"],
    }
}

#[derive(Debug, Clone)]
pub struct DemoCatalogSource {
    products: Fetched<Vec<Item>>,
    services: Option<Fetched<Vec<Item>>>,
    categories: Fetched<Vec<Category>>,
    fetches: usize,
}

impl DemoCatalogSource {
    pub fn demo() -> Self {
        let mut faker = StoreFaker::new(DEMO_SEED);
        Self {
            products: Fetched::Ready(faker.products(18)),
            services: Some(Fetched::Ready(faker.services(6))),
            categories: Fetched::Ready(categories()),
            fetches: 0,
        }
    }

    pub fn with_products(mut self, products: Fetched<Vec<Item>>) -> Self {
        self.products = products;
        self
    }

    pub fn with_services(mut self, services: Option<Fetched<Vec<Item>>>) -> Self {
        self.services = services;
        self
    }

    pub fn with_categories(mut self, categories: Fetched<Vec<Category>>) -> Self {
        self.categories = categories;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

impl CatalogSource for DemoCatalogSource {
    fn fetch_catalog_items(&mut self) -> Fetched<Vec<Item>> {
        self.fetches += 1;
        self.products.clone()
    }

    fn fetch_categories(&mut self) -> Fetched<Vec<Category>> {
        self.categories.clone()
    }

    fn fetch_service_items(&mut self) -> Option<Fetched<Vec<Item>>> {
        self.services.clone()
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let config_path = dir.path().join("config.toml");
    Ok((dir, config_path))
}
