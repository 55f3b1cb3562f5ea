use crate::cmd;
use crate::config::InstallConfig;
use crate::error::InstallResult;

/// Packages every deployment needs regardless of selected services.
pub const BASE_PACKAGES: &[&str] = &["puppet", "git", "python3", "python3-venv", "crudini"];

/// Environment for every apt invocation: no interactive prompts, and
/// a locale that exists before any locale setup has run.
const APT_ENV: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive"), ("LC_ALL", "C.UTF-8")];

/// Build the argument list for one apt action.
#[must_use]
pub fn apt_invocation(action: &str, options: &[String], packages: &[String]) -> Vec<String> {
    let mut args = vec![action.to_string(), "-y".to_string()];
    args.extend(options.iter().cloned());
    args.extend(packages.iter().cloned());
    args
}

/// The base set plus any extras requested through the environment.
#[must_use]
pub fn base_packages(config: &InstallConfig) -> Vec<String> {
    let mut packages: Vec<String> = BASE_PACKAGES.iter().map(ToString::to_string).collect();
    packages.extend(config.additional_packages.iter().cloned());
    packages
}

/// Upgrade the whole system, including kernel and held packages.
pub fn dist_upgrade(config: &InstallConfig) -> InstallResult<()> {
    eprintln!("Updating and upgrading system packages...");
    run_apt(&apt_invocation("update", &config.apt_options, &[]))?;
    run_apt(&apt_invocation("dist-upgrade", &config.apt_options, &[]))
}

/// Upgrade packages the configuration stage may have made upgradable.
pub fn upgrade(config: &InstallConfig) -> InstallResult<()> {
    eprintln!("Upgrading packages from the configured repositories...");
    run_apt(&apt_invocation("update", &config.apt_options, &[]))?;
    run_apt(&apt_invocation("upgrade", &config.apt_options, &[]))
}

/// Install a set of packages.
pub fn install(config: &InstallConfig, packages: &[String]) -> InstallResult<()> {
    eprintln!("Installing packages: {}...", packages.join(" "));
    run_apt(&apt_invocation("install", &config.apt_options, packages))
}

fn run_apt(args: &[String]) -> InstallResult<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    cmd::run_interactive_env("apt-get", &args, APT_ENV)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstallConfig, InstallOptions};
    use clap::Parser;

    fn config_with_extras(extras: &str) -> InstallConfig {
        let options = InstallOptions::parse_from(["palisade"]);
        let defaults = crate::config::EnvironmentDefaults {
            additional_packages: extras.to_string(),
            tree_root: Some("/srv/app".to_string()),
            ..crate::config::EnvironmentDefaults::default()
        };
        InstallConfig::with_defaults(options, &defaults).unwrap()
    }

    #[test]
    fn invocation_orders_action_options_packages() {
        let args = apt_invocation(
            "install",
            &["--quiet".to_string()],
            &["git".to_string(), "puppet".to_string()],
        );
        assert_eq!(args, vec!["install", "-y", "--quiet", "git", "puppet"]);
    }

    #[test]
    fn base_set_includes_environment_extras() {
        let packages = base_packages(&config_with_extras("jq strace"));
        assert!(packages.starts_with(&["puppet".to_string(), "git".to_string()]));
        assert!(packages.contains(&"jq".to_string()));
        assert!(packages.contains(&"strace".to_string()));
    }

    #[test]
    fn base_set_without_extras_is_the_constant() {
        let packages = base_packages(&config_with_extras(""));
        assert_eq!(packages.len(), BASE_PACKAGES.len());
    }
}
