use serde::Serialize;
use tracing::debug;

/// Hostnames appended to the admin dev server's allow-list in every environment.
pub const EXTRA_ALLOWED_HOSTS: [&str; 3] = ["lx-dev", "v-dev", "dev.mobi.vdev.com"];

/// Development-server settings of the admin build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    pub allowed_hosts: Vec<String>,
}

impl DevServerConfig {
    pub fn with_allowed_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    dev_server: DevServerConfig,
}

impl AdminConfig {
    /// Builds the admin settings from the build tool's current dev-server
    /// settings, with the extra hosts appended.
    pub fn from_dev_server(dev_server: DevServerConfig) -> Self {
        Self {
            dev_server: extend_allowed_hosts(dev_server),
        }
    }

    pub fn dev_server(&self) -> &DevServerConfig {
        &self.dev_server
    }

    pub fn allowed_hosts(&self) -> &[String] {
        &self.dev_server.allowed_hosts
    }
}

/// Returns `dev` with [`EXTRA_ALLOWED_HOSTS`] appended after its existing
/// entries. Existing entries keep their order and are not deduplicated.
pub fn extend_allowed_hosts(dev: DevServerConfig) -> DevServerConfig {
    let mut allowed_hosts = dev.allowed_hosts;
    allowed_hosts.extend(EXTRA_ALLOWED_HOSTS.iter().map(|h| h.to_string()));

    debug!("Admin: dev server allows {} host(s)", allowed_hosts.len());

    DevServerConfig { allowed_hosts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_empty_list() {
        let dev = extend_allowed_hosts(DevServerConfig::default());
        assert_eq!(dev.allowed_hosts, ["lx-dev", "v-dev", "dev.mobi.vdev.com"]);
    }

    #[test]
    fn test_extend_preserves_existing_entries_first() {
        let dev = DevServerConfig::with_allowed_hosts(["localhost", "v-dev"]);
        let extended = extend_allowed_hosts(dev);
        assert_eq!(
            extended.allowed_hosts,
            ["localhost", "v-dev", "lx-dev", "v-dev", "dev.mobi.vdev.com"]
        );
    }

    #[test]
    fn test_admin_config_exposes_extended_hosts() {
        let admin = AdminConfig::from_dev_server(DevServerConfig::with_allowed_hosts([".local"]));
        assert_eq!(admin.allowed_hosts().first().map(String::as_str), Some(".local"));
        assert!(admin.allowed_hosts().ends_with(&[
            "lx-dev".to_string(),
            "v-dev".to_string(),
            "dev.mobi.vdev.com".to_string(),
        ]));
    }
}
