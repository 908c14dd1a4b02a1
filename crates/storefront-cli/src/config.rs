// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_app::CatalogTab;
use storefront_catalog::{CatalogPaths, DEFAULT_CATEGORIES_PATH, DEFAULT_PRODUCTS_PATH};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "storefront";

const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: Catalog::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub base_url: Option<String>,
    pub products_path: Option<String>,
    pub services_path: Option<String>,
    pub categories_path: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            products_path: Some(DEFAULT_PRODUCTS_PATH.to_owned()),
            services_path: None,
            categories_path: Some(DEFAULT_CATEGORIES_PATH.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub initial_tab: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            path: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("STOREFRONT_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set STOREFRONT_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [catalog], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.catalog.base_url
            && base_url.trim().is_empty()
        {
            bail!("catalog.base_url in {} must not be empty", path.display());
        }

        for (key, value) in [
            ("products_path", &self.catalog.products_path),
            ("services_path", &self.catalog.services_path),
            ("categories_path", &self.catalog.categories_path),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                bail!(
                    "catalog.{key} in {} must not be empty; remove the key to use the default",
                    path.display()
                );
            }
        }

        if let Some(timeout) = &self.catalog.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("catalog.timeout in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "catalog.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(tab) = &self.ui.initial_tab
            && CatalogTab::parse(tab).is_none()
        {
            bail!(
                "ui.initial_tab in {} must be \"services\" or \"products\", got {:?}",
                path.display(),
                tab
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!("log.level in {} is not a valid filter: {level:?}", path.display())
            })?;
        }

        Ok(())
    }

    pub fn catalog_base_url(&self) -> &str {
        self.catalog
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn catalog_paths(&self) -> CatalogPaths {
        CatalogPaths {
            products: self
                .catalog
                .products_path
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCTS_PATH.to_owned()),
            services: self.catalog.services_path.clone(),
            categories: self
                .catalog
                .categories_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORIES_PATH.to_owned()),
        }
    }

    pub fn catalog_timeout(&self) -> Result<Duration> {
        parse_duration(self.catalog.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn initial_tab(&self) -> CatalogTab {
        self.ui
            .initial_tab
            .as_deref()
            .and_then(CatalogTab::parse)
            .unwrap_or_default()
    }

    pub fn initial_category(&self) -> &str {
        self.ui.category.as_deref().unwrap_or("")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.path {
            return Ok(PathBuf::from(path));
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].path in the config file")
        })?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# storefront config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\nbase_url = \"{}\"\nproducts_path = \"{}\"\n# Optional. Without it the services tab shows its unavailable message.\n# services_path = \"/services\"\ncategories_path = \"{}\"\ntimeout = \"{}\"\n\n[ui]\n# services or products\ninitial_tab = \"services\"\n# Empty shows every category.\ncategory = \"\"\n\n[log]\n# tracing filter; RUST_LOG takes precedence\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/storefront/storefront.log)\n# path = \"/absolute/path/to/storefront.log\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_PRODUCTS_PATH,
            DEFAULT_CATEGORIES_PATH,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .with_context(|| format!("timeout duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
