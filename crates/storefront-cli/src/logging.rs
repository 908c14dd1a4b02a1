// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub fn init_file_logger(level: &str, path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    let filter = resolve_filter(level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn resolve_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}")),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].path to a writable location",
                path.display()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::open_log_file;
    use anyhow::Result;

    #[test]
    fn open_log_file_creates_missing_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("storefront.log");
        open_log_file(&path)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn open_log_file_names_the_path_on_failure() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory")?;

        let error = open_log_file(&blocker.join("storefront.log"))
            .expect_err("file parent should fail");
        assert!(error.to_string().contains("blocker"));
        Ok(())
    }
}
