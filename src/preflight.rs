use std::fs;

use crate::cmd;
use crate::config::InstallConfig;
use crate::error::{InstallError, InstallResult};
use crate::packages;

/// Smallest memory size the application server runs acceptably with.
pub const MINIMUM_MEMORY_KB: u64 = 1_900_000;

/// Utilities the installer itself needs before the package stage.
const BOOTSTRAP_UTILITIES: &[&str] = &["lsb-release", "software-properties-common"];

/// Verify the process runs with root privileges.
pub fn ensure_root() -> InstallResult<()> {
    let uid = cmd::run("id", &["-u"])?;
    if uid == "0" {
        Ok(())
    } else {
        Err(InstallError::PrerequisiteMissing(
            "the installer must run as root".to_string(),
        ))
    }
}

/// Total physical memory of this host in kilobytes.
pub fn total_memory_kb() -> InstallResult<u64> {
    let meminfo = fs::read_to_string("/proc/meminfo")?;
    parse_total_memory_kb(&meminfo).ok_or_else(|| {
        InstallError::Other("could not read MemTotal from /proc/meminfo".to_string())
    })
}

/// Extract the `MemTotal` value from `/proc/meminfo` contents.
#[must_use]
pub fn parse_total_memory_kb(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}

/// Fail early on hosts too small to run the server.
pub fn ensure_sufficient_memory(available_kb: u64) -> InstallResult<()> {
    if available_kb < MINIMUM_MEMORY_KB {
        return Err(InstallError::InsufficientMemory {
            available_kb,
            required_kb: MINIMUM_MEMORY_KB,
        });
    }
    Ok(())
}

/// Verify the host uses the package manager the installer drives.
pub fn ensure_package_manager() -> InstallResult<()> {
    if cmd::command_exists("apt-get") {
        Ok(())
    } else {
        Err(InstallError::PrerequisiteMissing(
            "apt-get not found; only Debian and Ubuntu hosts are supported".to_string(),
        ))
    }
}

/// Install the utilities later stages depend on.
pub fn install_bootstrap_utilities(config: &InstallConfig) -> InstallResult<()> {
    let utilities: Vec<String> = BOOTSTRAP_UTILITIES
        .iter()
        .map(ToString::to_string)
        .collect();
    packages::install(config, &utilities)
}
