use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::Path;

use crate::cmd;
use crate::error::{InstallError, InstallResult};
use crate::settings;

/// Directory all releases are unpacked into.
pub const DEPLOYMENTS_DIR: &str = "/home/zulip/deployments";

/// Symlink to the release the services run from.
pub const CURRENT_LINK: &str = "/home/zulip/deployments/current";

/// Directory the proxy serves static assets from.
pub const STATIC_ROOT: &str = "/home/zulip/prod-static";

/// Present once a release has populated the static asset tree.
pub const STATIC_BUILD_MARKER: &str = "/home/zulip/prod-static/generated";

/// Control socket of the process supervisor.
pub const SUPERVISOR_SOCKET: &str = "/var/run/supervisor.sock";

/// Account the server processes run as.
pub const SERVICE_USER: &str = "zulip";

/// Point `link` at `target`, replacing whatever was there.
pub fn replace_link(target: &Path, link: &Path) -> InstallResult<()> {
    match fs::symlink_metadata(link) {
        Ok(_) => fs::remove_file(link)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    symlink(target, link)?;
    Ok(())
}

/// Move the unpacked tree to its release directory and update the
/// deployment symlinks.
///
/// The tree is renamed into place when it shares a filesystem with
/// the deployments directory and copied across with `mv` otherwise.
/// A `next` symlink is left at the tree's old location so anything
/// still holding that path keeps resolving during the switch.
pub fn switch_release(
    tree: &Path,
    deploy_path: &Path,
    deployments_dir: &Path,
) -> InstallResult<()> {
    fs::create_dir_all(deployments_dir)?;
    move_tree(tree, deploy_path)?;
    replace_link(&deployments_dir.join("next"), tree)?;
    replace_link(deploy_path, &deployments_dir.join("next"))?;
    replace_link(deploy_path, &deployments_dir.join("current"))?;
    Ok(())
}

fn move_tree(tree: &Path, deploy_path: &Path) -> InstallResult<()> {
    match fs::rename(tree, deploy_path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            // A rename cannot cross filesystems; mv copies and
            // unlinks in that case.
            let from = tree.display().to_string();
            let to = deploy_path.display().to_string();
            cmd::run("mv", &[&from, &to])?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Copy the release's pre-built assets into the served static tree.
pub fn publish_static_assets(deploy_path: &Path) -> InstallResult<()> {
    let serve = deploy_path.join("prod-static/serve");
    if !serve.is_dir() {
        return Err(InstallError::FileNotFound(format!(
            "{} (is this an unpacked release tree?)",
            serve.display()
        )));
    }
    let serve = serve.display().to_string();
    // cp -rT merges into the existing tree rather than nesting under it.
    cmd::run("cp", &["-rT", &serve, STATIC_ROOT])?;
    Ok(())
}

/// Hand the deployment trees and settings file to the service account.
pub fn fix_ownership() -> InstallResult<()> {
    let owner = format!("{SERVICE_USER}:{SERVICE_USER}");
    let settings_file = settings::installed_path().display().to_string();
    for path in ["/home/zulip", "/var/log/zulip", settings_file.as_str()] {
        cmd::run("chown", &["-R", &owner, path])?;
    }
    Ok(())
}

/// Whether a previous run already built the static assets.
#[must_use]
pub fn static_assets_built() -> bool {
    Path::new(STATIC_BUILD_MARKER).exists()
}

/// Let the service account drive the supervisor.
///
/// The socket only exists once the supervisor has started, which
/// puppet may or may not have done yet.
pub fn fix_supervisor_socket() -> InstallResult<()> {
    if Path::new(SUPERVISOR_SOCKET).exists() {
        let owner = format!("{SERVICE_USER}:{SERVICE_USER}");
        cmd::run("chown", &[&owner, SUPERVISOR_SOCKET])?;
    }
    Ok(())
}
