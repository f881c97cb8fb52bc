use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

pub const STORE_ENV: &str = "LESSONBOOK_STORE";
pub const BASE_URL_ENV: &str = "LESSONBOOK_BASE_URL";

pub const DEFAULT_STORE_PATH: &str = ".lessonbook/storage.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// File backing the key-value store.
    pub store_path: PathBuf,
    /// Document location; lesson links and heading fragments hang off it.
    pub base_url: Url,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::resolve(None, None)
    }

    /// Explicit values (CLI flags) win over the environment, which wins over defaults.
    pub fn resolve(store: Option<&str>, base_url: Option<&str>) -> anyhow::Result<Self> {
        let store = store
            .map(str::to_owned)
            .or_else(|| std::env::var(STORE_ENV).ok());
        let base_url = base_url
            .map(str::to_owned)
            .or_else(|| std::env::var(BASE_URL_ENV).ok());
        Self::parse(store, base_url)
    }

    pub fn parse(store: Option<String>, base_url: Option<String>) -> anyhow::Result<Self> {
        let store_path = store
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_PATH.to_owned());

        let raw_url = base_url
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let mut base_url =
            Url::parse(&raw_url).with_context(|| format!("invalid base url: {raw_url:?}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("base url cannot carry lesson paths: {raw_url:?}");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_fragment(None);

        Ok(Self {
            store_path: PathBuf::from(store_path),
            base_url,
        })
    }

    /// Location of one lesson, e.g. `http://localhost/p0-m1`.
    pub fn lesson_url(&self, module_id: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(module_id)
            .with_context(|| format!("build lesson url for {module_id}"))
    }
}
