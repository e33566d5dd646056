//! Replaceable human-readable strings.
//!
//! Tool descriptions and titles are looked up through a [`Translator`] by a
//! stable key, with the English text as fallback. [`TranslationHelper`]
//! resolves keys from environment overrides first, then from a JSON file,
//! then from the default, and remembers every key it was asked for so the
//! full set can be exported as a starting point for a translation file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

/// Environment prefix for translation overrides.
pub const DEFAULT_ENV_PREFIX: &str = "DEPSCOPE";

/// Strategy for resolving a translation key.
pub trait Translator: Send + Sync {
    /// Resolve `key`, falling back to `default` when no translation exists.
    fn translate(&self, key: &str, default: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn translate(&self, key: &str, default: &str) -> String {
        (self)(key, default)
    }
}

/// Translator that always returns the default text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn translate(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read translation file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse translation file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Translator backed by environment overrides and an optional JSON file.
#[derive(Debug, Default)]
pub struct TranslationHelper {
    prefix: String,
    env_overrides: HashMap<String, String>,
    file_overrides: HashMap<String, String>,
    used: Mutex<BTreeMap<String, String>>,
}

impl TranslationHelper {
    /// Helper that reads `DEPSCOPE_<KEY>` overrides from the process environment.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX).with_env_overrides(std::env::vars())
    }

    /// Empty helper using `prefix` for environment keys.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Take overrides from `(variable, value)` pairs, keeping only
    /// variables named `<PREFIX>_<KEY>`.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let marker = format!("{}_", self.prefix);
        for (name, value) in vars {
            let name = name.into();
            if let Some(key) = name.strip_prefix(&marker) {
                self.env_overrides.insert(key.to_string(), value.into());
            }
        }
        self
    }

    pub fn with_file_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.file_overrides = overrides;
        self
    }

    /// Load overrides from a JSON object of `{"KEY": "text"}` pairs.
    pub fn load_file<P: AsRef<Path>>(self, path: P) -> Result<Self, TranslationError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let overrides: HashMap<String, String> = serde_json::from_str(&content)?;
        debug!(
            path = %path.as_ref().display(),
            keys = overrides.len(),
            "Loaded translation overrides"
        );
        Ok(self.with_file_overrides(overrides))
    }

    /// Like [`load_file`](Self::load_file), but a missing file is not an error.
    pub fn load_file_if_exists<P: AsRef<Path>>(self, path: P) -> Result<Self, TranslationError> {
        if path.as_ref().exists() {
            self.load_file(path)
        } else {
            Ok(self)
        }
    }

    /// Every key resolved so far, with the text it resolved to.
    pub fn used_keys(&self) -> BTreeMap<String, String> {
        self.used
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Render the resolved keys as pretty JSON.
    pub fn export_json(&self) -> Result<String, TranslationError> {
        Ok(serde_json::to_string_pretty(&self.used_keys())?)
    }

    /// Write the resolved keys to `path` as pretty JSON.
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TranslationError> {
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }
}

impl Translator for TranslationHelper {
    fn translate(&self, key: &str, default: &str) -> String {
        let key = key.to_uppercase();
        let value = self
            .env_overrides
            .get(&key)
            .or_else(|| self.file_overrides.get(&key))
            .cloned()
            .unwrap_or_else(|| default.to_string());

        self.used
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value.clone());
        value
    }
}
