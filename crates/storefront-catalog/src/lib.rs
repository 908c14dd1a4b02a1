// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use storefront_app::{CatalogSource, Category, Fetched, Item};
use url::Url;

pub const DEFAULT_PRODUCTS_PATH: &str = "/products";
pub const DEFAULT_CATEGORIES_PATH: &str = "/categories";

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("catalog.base_url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse catalog base url {trimmed:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "catalog.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn list_items(&self, path: &str) -> Result<Vec<Item>> {
        self.get_listing(path)
    }

    pub fn list_categories(&self, path: &str) -> Result<Vec<Category>> {
        self.get_listing(path)
    }

    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    fn get_listing<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "fetching catalog listing");
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response
            .text()
            .with_context(|| format!("read response body from {url}"))?;
        parse_listing(&body).with_context(|| format!("decode listing from {url}"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

fn parse_listing<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("response body is not valid JSON")?;
    if !value.is_array() && value.get("data").is_none_or(|data| !data.is_array()) {
        bail!("expected a JSON array of records or an object with a `data` array");
    }
    match serde_json::from_value::<Listing<T>>(value)? {
        Listing::Bare(records) | Listing::Wrapped { data: records } => Ok(records),
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach catalog at {} -- check [catalog].base_url and that the service is running ({})",
        base_url,
        error
    )
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Text(String),
    Detailed { message: String },
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = match parsed.error {
            Some(ErrorBody::Text(message)) | Some(ErrorBody::Detailed { message }) => Some(message),
            None => parsed.message,
        };
        if let Some(message) = message
            && !message.is_empty()
        {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub products: String,
    pub services: Option<String>,
    pub categories: String,
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self {
            products: DEFAULT_PRODUCTS_PATH.to_owned(),
            services: None,
            categories: DEFAULT_CATEGORIES_PATH.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    paths: CatalogPaths,
}

impl HttpCatalogSource {
    pub fn new(client: Client, paths: CatalogPaths) -> Self {
        Self { client, paths }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn paths(&self) -> &CatalogPaths {
        &self.paths
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch_catalog_items(&mut self) -> Fetched<Vec<Item>> {
        into_fetched("products", self.client.list_items(&self.paths.products))
    }

    fn fetch_categories(&mut self) -> Fetched<Vec<Category>> {
        into_fetched(
            "categories",
            self.client.list_categories(&self.paths.categories),
        )
    }

    fn fetch_service_items(&mut self) -> Option<Fetched<Vec<Item>>> {
        let path = self.paths.services.as_deref()?;
        Some(into_fetched("services", self.client.list_items(path)))
    }
}

fn into_fetched<T>(feed: &str, result: Result<T>) -> Fetched<T> {
    match result {
        Ok(value) => Fetched::Ready(value),
        Err(error) => {
            let message = format!("{error:#}");
            tracing::warn!(feed, error = %message, "catalog fetch failed");
            Fetched::Failed(message)
        }
    }
}
