use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::error::{InstallError, InstallResult};

/// Command-line surface of the installer.
///
/// Everything else is controlled through environment variables; see
/// [`EnvironmentDefaults`].
#[derive(Debug, Parser)]
#[command(name = "palisade", version)]
#[command(about = "Single-host production installer for the Zulip server stack")]
pub struct InstallOptions {
    /// Acquire a TLS certificate with certbot (standalone method);
    /// requires --hostname and --email
    #[arg(long)]
    pub certbot: bool,

    /// External hostname the server will be reachable at
    #[arg(long, value_name = "HOST")]
    pub hostname: Option<String>,

    /// Administrator contact address
    #[arg(long, value_name = "ADDR")]
    pub email: Option<String>,
}

/// How this host participates in the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentType {
    /// Everything runs on this host.
    Production,
    /// An external container orchestrator owns the auxiliary
    /// services; the installer must not touch them.
    Containerized,
}

impl DeploymentType {
    /// Name written into the machine configuration file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Containerized => "containerized",
        }
    }
}

impl FromStr for DeploymentType {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "containerized" => Ok(Self::Containerized),
            other => Err(InstallError::BadOptions(format!(
                "unknown deployment type '{other}' \
                 (expected 'production' or 'containerized')"
            ))),
        }
    }
}

/// Raw environment-variable overrides, read once at startup.
#[derive(Debug, Clone)]
pub struct EnvironmentDefaults {
    /// `APT_OPTIONS`: extra package-manager arguments, whitespace-split.
    pub apt_options: String,
    /// `ADDITIONAL_PACKAGES`: extra packages to install, whitespace-split.
    pub additional_packages: String,
    /// `DEPLOYMENT_TYPE`: `production` or `containerized`.
    pub deployment_type: String,
    /// `PUPPET_CLASSES`: comma-separated manifest classes.
    pub puppet_classes: String,
    /// `VIRTUALENV_NEEDED`: the Python environment stage runs iff `yes`.
    pub virtualenv_needed: String,
    /// `CI`: non-empty disables the memcached restart, which hangs
    /// under CI supervisors.
    pub ci: bool,
    /// `ZULIP_PATH`: root of the unpacked release tree; defaults to
    /// the current working directory.
    pub tree_root: Option<String>,
}

impl EnvironmentDefaults {
    /// Read the overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            apt_options: env::var("APT_OPTIONS").unwrap_or(base.apt_options),
            additional_packages: env::var("ADDITIONAL_PACKAGES").unwrap_or(base.additional_packages),
            deployment_type: env::var("DEPLOYMENT_TYPE").unwrap_or(base.deployment_type),
            puppet_classes: env::var("PUPPET_CLASSES").unwrap_or(base.puppet_classes),
            virtualenv_needed: env::var("VIRTUALENV_NEEDED").unwrap_or(base.virtualenv_needed),
            ci: env::var("CI").is_ok_and(|v| !v.is_empty()),
            tree_root: env::var("ZULIP_PATH").ok(),
        }
    }
}

impl Default for EnvironmentDefaults {
    fn default() -> Self {
        Self {
            apt_options: String::new(),
            additional_packages: String::new(),
            deployment_type: "production".to_string(),
            puppet_classes: "zulip::voyager".to_string(),
            virtualenv_needed: "yes".to_string(),
            ci: false,
            tree_root: None,
        }
    }
}

/// Immutable configuration for one installer run, assembled once from
/// the command line and the environment, then handed to every stage.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub use_certbot: bool,
    pub external_host: Option<String>,
    pub administrator_email: Option<String>,
    pub apt_options: Vec<String>,
    pub additional_packages: Vec<String>,
    pub deployment_type: DeploymentType,
    pub puppet_classes: Vec<String>,
    pub virtualenv_needed: bool,
    pub in_ci: bool,
    pub tree_root: PathBuf,
}

impl InstallConfig {
    /// Resolve options against the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BadOptions` for incoherent flag combinations or
    /// malformed environment values. No external command runs before
    /// this validation has passed.
    pub fn resolve(options: InstallOptions) -> InstallResult<Self> {
        Self::with_defaults(options, &EnvironmentDefaults::from_env())
    }

    /// Resolve options against explicit defaults.
    pub fn with_defaults(
        options: InstallOptions,
        defaults: &EnvironmentDefaults,
    ) -> InstallResult<Self> {
        let external_host = non_empty(options.hostname);
        let administrator_email = non_empty(options.email);

        if options.certbot && (external_host.is_none() || administrator_email.is_none()) {
            return Err(InstallError::BadOptions(
                "--certbot requires --hostname and --email".to_string(),
            ));
        }

        let deployment_type = defaults.deployment_type.parse()?;

        let puppet_classes: Vec<String> = defaults
            .puppet_classes
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if puppet_classes.is_empty() {
            return Err(InstallError::BadOptions(
                "PUPPET_CLASSES must name at least one manifest class".to_string(),
            ));
        }

        let tree_root = match &defaults.tree_root {
            Some(path) => PathBuf::from(path),
            None => env::current_dir()?,
        };

        Ok(Self {
            use_certbot: options.certbot,
            external_host,
            administrator_email,
            apt_options: split_words(&defaults.apt_options),
            additional_packages: split_words(&defaults.additional_packages),
            deployment_type,
            puppet_classes,
            virtualenv_needed: defaults.virtualenv_needed == "yes",
            in_ci: defaults.ci,
            tree_root,
        })
    }

    /// Whether the selected manifest classes put a TLS-terminating
    /// reverse proxy on this host.
    #[must_use]
    pub fn requires_tls_proxy(&self) -> bool {
        self.puppet_classes
            .iter()
            .any(|class| class == "zulip::voyager" || class == "zulip::nginx")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn split_words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_type_names_round_trip() {
        for ty in [DeploymentType::Production, DeploymentType::Containerized] {
            assert_eq!(ty.as_str().parse::<DeploymentType>().unwrap(), ty);
        }
    }

    #[test]
    fn split_words_handles_runs_of_whitespace() {
        assert_eq!(
            split_words("  --assume-yes \t -o Dpkg::Options::=--force-confnew "),
            vec!["--assume-yes", "-o", "Dpkg::Options::=--force-confnew"]
        );
        assert!(split_words("").is_empty());
    }
}
