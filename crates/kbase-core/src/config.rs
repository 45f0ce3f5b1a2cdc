//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_RETRIEVAL__TOP_K=5`). Provides
//! helpers to expand `~` and `${VAR}` and to resolve relative paths against a
//! known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.01;

/// Tunables for the retrieval engine, read from the `retrieval` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    /// Vector matches must score strictly above this.
    pub similarity_threshold: f32,
    /// Extra terms routed to the company category (e.g. the company name).
    pub company_terms: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            company_terms: Vec::new(),
        }
    }
}

impl RetrievalSettings {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be greater than 0".into()));
        }
        if !(0.0..1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidConfig(format!(
                "retrieval.similarity_threshold must be in [0, 1), got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Loads `config.toml` and the environment overlay from `dir`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::default("retrieval", RetrievalSettings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self::from_figment(figment, dir);
        config.retrieval()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment, base_dir: &Path) -> Self {
        Self { figment, base_dir: base_dir.to_path_buf() }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn retrieval(&self) -> Result<RetrievalSettings> {
        let settings: RetrievalSettings = if self.figment.find_value("retrieval").is_ok() {
            self.figment
                .extract_inner("retrieval")
                .map_err(|e| Error::InvalidConfig(e.to_string()))?
        } else {
            RetrievalSettings::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    /// `data.records_path`, expanded and resolved against the config directory.
    pub fn records_path(&self) -> Option<PathBuf> {
        let raw: String = self.get("data.records_path").ok()?;
        Some(resolve_with_base(&self.base_dir, raw))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = RetrievalSettings::default();
        assert_eq!(s.top_k, 3);
        assert!((s.similarity_threshold - 0.01).abs() < f32::EPSILON);
        s.validate().expect("default settings validate");
    }

    #[test]
    fn zero_top_k_rejected() {
        let s = RetrievalSettings { top_k: 0, ..Default::default() };
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn absolute_paths_pass_through() {
        let base = Path::new("/srv/kbase");
        assert_eq!(resolve_with_base(base, "/data/company.json"), PathBuf::from("/data/company.json"));
        assert_eq!(resolve_with_base(base, "data/company.json"), PathBuf::from("/srv/kbase/data/company.json"));
    }
}
