//! Configuration file loading.
//!
//! The config file is TOML. It can name query aliases under `[sqlaliases]`,
//! pick a default output format and raise the input size cap:
//!
//! ```toml
//! output = "unicode"
//! max_file_size = 1073741824
//!
//! [sqlaliases]
//! funcs = "SELECT Name, Size FROM symbols WHERE Type = 'FUNC' ORDER BY Size DESC"
//! ```
//!
//! File aliases are merged over the built-in set, replacing built-ins of the
//! same name.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ElfQueryError, Result};
use crate::io::DEFAULT_MAX_FILE_SIZE;
use crate::render::OutputFormat;

/// File name looked up in the working directory and in `$HOME`
pub const CONFIG_FILE_NAME: &str = ".elfquery.toml";

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    (
        "sections",
        "SELECT Name, printf('0x%X', Address) AS Address, Size FROM sections",
    ),
    ("symbols", "SELECT * FROM symbols ORDER BY ID ASC"),
    ("bss", "SELECT Name, Size FROM symbols WHERE Section = 'bss'"),
    (
        "bss10",
        "SELECT Name, Size FROM symbols WHERE Section = 'bss' ORDER BY Size DESC LIMIT 10",
    ),
    ("weak", "SELECT * FROM symbols WHERE Binding LIKE 'weak'"),
];

/// Aliases available without a config file
pub fn builtin_aliases() -> BTreeMap<String, String> {
    BUILTIN_ALIASES
        .iter()
        .map(|(name, query)| (name.to_string(), query.to_string()))
        .collect()
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named queries, by alias
    pub sqlaliases: BTreeMap<String, String>,
    /// Default output format name
    pub output: Option<String>,
    /// Largest input file accepted, in bytes
    pub max_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sqlaliases: BTreeMap::new(),
            output: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ElfQueryError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ElfQueryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            ElfQueryError::Config(msg) => {
                ElfQueryError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load the first config found.
    ///
    /// An explicit path must exist. Otherwise `./.elfquery.toml` then
    /// `$HOME/.elfquery.toml` are tried, falling back to defaults. Returns
    /// the path that was loaded, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let cwd = std::env::current_dir()?;
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::discover_from(explicit, &cwd, home.as_deref())
    }

    pub fn discover_from(
        explicit: Option<&Path>,
        cwd: &Path,
        home: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        let candidates = std::iter::once(cwd.join(CONFIG_FILE_NAME))
            .chain(home.map(|h| h.join(CONFIG_FILE_NAME)));
        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Loading config");
                return Ok((Self::from_file(&candidate)?, Some(candidate)));
            }
        }

        debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Built-in aliases overlaid with the configured ones
    pub fn aliases(&self) -> BTreeMap<String, String> {
        let mut aliases = builtin_aliases();
        aliases.extend(self.sqlaliases.clone());
        aliases
    }

    /// Query text for `name`
    pub fn resolve_alias(&self, name: &str) -> Result<String> {
        let mut aliases = self.aliases();
        aliases.remove(name).ok_or_else(|| {
            let known: Vec<&str> = aliases.keys().map(String::as_str).collect();
            ElfQueryError::Config(format!(
                "Unknown alias '{}' (known aliases: {})",
                name,
                known.join(", ")
            ))
        })
    }

    /// Configured default output format, if any
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.output
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .map_err(ElfQueryError::from)
    }
}
