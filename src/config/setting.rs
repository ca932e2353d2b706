use serde::{Serialize, Serializer};

use crate::utils::error::ConfigError;

/// A configuration value that may not have been provided.
///
/// Consumers match on the variant instead of treating an empty string as
/// "unset".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Setting<T> {
    Present(T),
    #[default]
    Absent,
}

impl<T> Setting<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Setting::Present(v),
            None => Setting::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Setting::Present(_))
    }

    pub fn as_ref(&self) -> Setting<&T> {
        match self {
            Setting::Present(v) => Setting::Present(v),
            Setting::Absent => Setting::Absent,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Setting<U> {
        match self {
            Setting::Present(v) => Setting::Present(f(v)),
            Setting::Absent => Setting::Absent,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Setting::Present(v) => v,
            Setting::Absent => default,
        }
    }

    /// Keeps the value only if `predicate` accepts it.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Setting::Present(v) if predicate(&v) => Setting::Present(v),
            _ => Setting::Absent,
        }
    }

    /// Returns the value, or a [`ConfigError::Missing`] naming `variable`.
    pub fn require(&self, variable: &'static str) -> Result<&T, ConfigError> {
        match self {
            Setting::Present(v) => Ok(v),
            Setting::Absent => Err(ConfigError::Missing(variable)),
        }
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Setting::Present(v) => v.serialize(serializer),
            Setting::Absent => serializer.serialize_none(),
        }
    }
}
