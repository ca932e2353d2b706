use serde::{Serialize, Serializer};

/// One entry of a CORS rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    /// An origin compared literally, e.g. `http://localhost:9000`.
    Exact(String),
    /// A `/.../` regular-expression entry, stored without the slashes.
    Pattern(String),
}

/// A comma-separated CORS allow rule as read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsRule {
    raw: String,
    origins: Vec<CorsOrigin>,
}

impl CorsRule {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let origins = raw
            .split(',')
            .filter_map(|entry| {
                let trimmed = entry.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed
                    .strip_prefix('/')
                    .and_then(|rest| rest.strip_suffix('/'))
                {
                    Some(pattern) if !pattern.is_empty() => {
                        Some(CorsOrigin::Pattern(pattern.to_string()))
                    }
                    _ => Some(CorsOrigin::Exact(trimmed.to_string())),
                }
            })
            .collect();

        Self { raw, origins }
    }

    /// The rule exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn origins(&self) -> &[CorsOrigin] {
        &self.origins
    }

    pub fn exact_origins(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().filter_map(|o| match o {
            CorsOrigin::Exact(origin) => Some(origin.as_str()),
            CorsOrigin::Pattern(_) => None,
        })
    }
}

impl Serialize for CorsRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
