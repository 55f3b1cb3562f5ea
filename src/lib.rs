//! Single-host production installer for the Zulip server stack.
//!
//! Palisade takes an unpacked release tree and turns the machine it
//! runs on into a working server: it checks prerequisites, installs
//! packages, applies puppet manifests, configures each service the
//! manifests put on the host, and moves the tree into the versioned
//! deployment layout the upgrade tooling expects.
//!
//! # Overview
//!
//! One run walks a fixed sequence of stages:
//!
//! 1. **Preflight** - root privileges, memory floor, apt present,
//!    bootstrap utilities
//! 2. **Certificates** - optional certbot acquisition, then a
//!    presence check when the host terminates TLS
//! 3. **Packages** - full system upgrade plus the base package set
//! 4. **Configuration** - write `/etc/zulip/zulip.conf` and apply
//!    the puppet manifests it names
//! 5. **Services** - detect which services landed on this host and
//!    post-configure each (nginx, settings file, memcached,
//!    rabbitmq, postgres)
//! 6. **Release** - move the tree under
//!    `/home/zulip/deployments`, point the `current` and `next`
//!    symlinks at it, publish static assets
//!
//! Failures abort the run with exit code 1. Every stage tolerates
//! its own work already being done, so fixing the reported cause
//! and re-running the installer is always safe.
//!
//! # Environment
//!
//! Besides the command line, behavior is controlled by `APT_OPTIONS`,
//! `ADDITIONAL_PACKAGES`, `DEPLOYMENT_TYPE`, `PUPPET_CLASSES`,
//! `VIRTUALENV_NEEDED`, `CI`, and `ZULIP_PATH`; see
//! [`EnvironmentDefaults`] for the semantics of each.
//!
//! # Examples
//!
//! Embed the installer instead of shelling out to the binary:
//!
//! ```rust,no_run
//! use clap::Parser;
//! use palisade::{InstallConfig, InstallOptions, Installer};
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = InstallOptions::parse();
//!     let config = InstallConfig::resolve(options)?;
//!     Installer::new(config).run()?;
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for an
// installer crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod certificates;
pub mod cmd;
pub mod conf;
pub mod config;
pub mod error;
pub mod features;
pub mod installer;
pub mod packages;
pub mod preflight;
pub mod release;
pub mod scripts;
pub mod services;
pub mod settings;

pub use config::DeploymentType;
pub use config::EnvironmentDefaults;
pub use config::InstallConfig;
pub use config::InstallOptions;
pub use error::InstallError;
pub use error::InstallResult;
pub use features::InstalledServices;
pub use installer::Installer;
