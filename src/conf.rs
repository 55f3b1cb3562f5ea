use std::fs;
use std::path::{Path, PathBuf};

use crate::config::InstallConfig;
use crate::error::InstallResult;

/// Location of the machine configuration file relative to the
/// filesystem root.
pub const CONF_FILE: &str = "etc/zulip/zulip.conf";

/// Render the machine configuration the puppet stage reads.
///
/// The rabbitmq stanza pins the node name to `zulip@localhost` so the
/// broker keeps its database across hostname changes; it is emitted
/// only when the broker is (about to be) local, which the caller
/// decides from the `rabbitmqctl` probe.
#[must_use]
pub fn render(config: &InstallConfig, broker_installed: bool) -> String {
    let mut contents = format!(
        "[machine]\npuppet_classes = {}\ndeploy_type = {}\n",
        config.puppet_classes.join(","),
        config.deployment_type.as_str(),
    );
    if broker_installed {
        contents.push_str("\n[rabbitmq]\nnodename = zulip@localhost\n");
    }
    if config.use_certbot {
        contents.push_str("\n[certbot]\nauto_renew = yes\n");
    }
    contents
}

/// Write the configuration file under `root`, creating parents.
pub fn write(root: &Path, contents: &str) -> InstallResult<PathBuf> {
    let path = root.join(CONF_FILE);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}
