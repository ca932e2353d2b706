use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use super::setting::Setting;
use crate::utils::error::{ConfigError, Result};

/// Variable selecting which environment file is overlaid.
pub const NODE_ENV: &str = "NODE_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Environments that have a dedicated `.env.<name>` file.
const KNOWN_ENVIRONMENTS: [&str; 3] = ["staging", "production", "test"];

/// Immutable copy of the environment variables the loader reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment. Variables whose name or
    /// value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Setting<&str> {
        Setting::from_option(self.vars.get(name).map(String::as_str))
    }

    /// Like [`EnvSnapshot::get`], but an empty value counts as unset.
    pub fn get_non_empty(&self, name: &str) -> Setting<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Name of the active environment, `development` when `NODE_ENV` is
    /// unset or empty.
    pub fn environment_name(&self) -> &str {
        self.get_non_empty(NODE_ENV).unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Returns a new snapshot with the environment file for `environment`
    /// (resolved against `cwd`) merged underneath the existing variables.
    ///
    /// A missing file leaves the snapshot unchanged. Values are taken
    /// verbatim: `$VAR` and `${VAR}` are not expanded.
    pub fn overlay(&self, cwd: &Path, environment: &str) -> Result<Self> {
        let path = cwd.join(overlay_file_name(environment));

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Env: no overlay file at {}", path.display());
                return Ok(self.clone());
            }
            Err(e) => {
                return Err(ConfigError::EnvFile {
                    path,
                    source: dotenvy::Error::Io(e),
                })
            }
        };

        let escaped = escape_substitutions(&contents);
        let mut vars = self.vars.clone();
        let mut applied = 0usize;
        for item in dotenvy::from_read_iter(escaped.as_bytes()) {
            let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                path: path.clone(),
                source,
            })?;
            // Live variables take precedence over the file.
            if let Entry::Vacant(slot) = vars.entry(key) {
                slot.insert(value);
                applied += 1;
            }
        }

        info!(
            "Env: overlaid {} variable(s) from {}",
            applied,
            path.display()
        );
        Ok(Self { vars })
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Escapes every `$` that dotenvy would treat as a substitution, so parsing
/// never consults the process environment. Single-quoted text, already
/// escaped characters and comments are copied unchanged.
fn escape_substitutions(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    let mut quote: Option<char> = None;
    let mut after_space = true;
    let mut chars = contents.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), _) => {}
            (_, '\\') => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                after_space = false;
                continue;
            }
            (_, '$') => {
                out.push_str("\\$");
                after_space = false;
                continue;
            }
            (Some('"'), '"') => quote = None,
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') if after_space => {
                out.push(c);
                for rest in chars.by_ref() {
                    out.push(rest);
                    if rest == '\n' {
                        break;
                    }
                }
                after_space = true;
                continue;
            }
            _ => {}
        }
        out.push(c);
        after_space = c.is_whitespace();
    }

    out
}

impl From<BTreeMap<String, String>> for EnvSnapshot {
    fn from(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }
}

/// File name of the overlay for `environment`: `.env.<name>` for staging,
/// production and test, `.env` otherwise.
pub fn overlay_file_name(environment: &str) -> String {
    if KNOWN_ENVIRONMENTS.contains(&environment) {
        format!(".env.{}", environment)
    } else {
        ".env".to_string()
    }
}
