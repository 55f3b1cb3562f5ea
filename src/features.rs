use std::path::Path;

use crate::config::DeploymentType;

/// Dropped by the nginx manifest.
pub const PROXY_MARKER: &str = "etc/init.d/nginx";

/// Dropped by the application-server manifest.
pub const APP_SERVER_MARKER: &str = "etc/supervisor/conf.d/zulip.conf";

/// Dropped by the rabbitmq manifest.
pub const BROKER_MARKER: &str = "etc/cron.d/rabbitmq-numconsumers";

/// Dropped by the postgres manifest.
pub const DATABASE_MARKER: &str = "etc/init.d/postgresql";

/// Dropped by the memcached manifest.
pub const CACHE_MARKER: &str = "etc/init.d/memcached";

/// Present once the broker package itself is installed.
pub const BROKER_CTL: &str = "usr/sbin/rabbitmqctl";

/// Which services are installed locally and need post-configuration.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstalledServices {
    pub proxy: bool,
    pub app_server: bool,
    pub broker: bool,
    pub database: bool,
    pub cache: bool,
}

#[must_use]
pub fn proxy_installed(root: &Path) -> bool {
    root.join(PROXY_MARKER).exists()
}

#[must_use]
pub fn app_server_installed(root: &Path) -> bool {
    root.join(APP_SERVER_MARKER).exists()
}

#[must_use]
pub fn broker_installed(root: &Path) -> bool {
    root.join(BROKER_MARKER).exists()
}

#[must_use]
pub fn database_installed(root: &Path) -> bool {
    root.join(DATABASE_MARKER).exists()
}

#[must_use]
pub fn cache_installed(root: &Path) -> bool {
    root.join(CACHE_MARKER).exists()
}

/// Whether the broker's control tool is present, independent of the
/// cron marker the manifest drops later.
#[must_use]
pub fn broker_ctl_installed(root: &Path) -> bool {
    root.join(BROKER_CTL).exists()
}

/// Detect which services the puppet manifests put on this host.
///
/// The manifests drop well-known files when they install a service;
/// probing for those files under `root` tells the later stages what
/// to configure.
///
/// Containerized deployments report nothing installed even when the
/// markers exist: the orchestrator owns those services, and the
/// installer must not restart or reconfigure them.
#[must_use]
pub fn detect(root: &Path, deployment_type: DeploymentType) -> InstalledServices {
    if deployment_type == DeploymentType::Containerized {
        return InstalledServices::default();
    }
    InstalledServices {
        proxy: proxy_installed(root),
        app_server: app_server_installed(root),
        broker: broker_installed(root),
        database: database_installed(root),
        cache: cache_installed(root),
    }
}
