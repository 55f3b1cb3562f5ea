use std::path::Path;

use crate::certificates;
use crate::conf;
use crate::config::InstallConfig;
use crate::error::InstallResult;
use crate::features::{self, InstalledServices};
use crate::packages;
use crate::preflight;
use crate::release;
use crate::scripts::SetupScripts;
use crate::services;
use crate::settings;

/// Drives an installation from prerequisite checks to the completion
/// report. Stages run in a fixed order; the first failure aborts the
/// run, and a re-run picks up where it left off because every stage
/// tolerates its own work already being done.
pub struct Installer {
    config: InstallConfig,
    scripts: SetupScripts,
}

impl Installer {
    #[must_use]
    pub fn new(config: InstallConfig) -> Self {
        let scripts = SetupScripts::new(&config.tree_root);
        Self { config, scripts }
    }

    #[must_use]
    pub const fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Run the installation end to end.
    pub fn run(&self) -> InstallResult<()> {
        let root = Path::new("/");

        self.preflight()?;
        self.scripts.setup_package_repo()?;
        self.scripts.setup_init_shim()?;
        self.acquire_certificates()?;
        self.verify_certificates(root)?;
        packages::dist_upgrade(&self.config)?;
        packages::install(&self.config, &packages::base_packages(&self.config))?;
        if self.config.virtualenv_needed {
            self.scripts.create_python_environment()?;
        }
        self.scripts.install_frontend_toolchain()?;
        self.apply_configuration(root)?;

        let installed = features::detect(root, self.config.deployment_type);

        packages::upgrade(&self.config)?;
        self.configure_services(installed)?;
        if installed.app_server {
            self.finalize_release()?;
        }
        release::fix_supervisor_socket()?;
        Self::print_completion_report();
        Ok(())
    }

    fn preflight(&self) -> InstallResult<()> {
        eprintln!("Checking host prerequisites...");
        preflight::ensure_root()?;
        preflight::ensure_sufficient_memory(preflight::total_memory_kb()?)?;
        preflight::ensure_package_manager()?;
        preflight::install_bootstrap_utilities(&self.config)
    }

    fn acquire_certificates(&self) -> InstallResult<()> {
        if !self.config.use_certbot {
            return Ok(());
        }
        // Option resolution rejects --certbot without both values.
        let host = self.config.external_host.as_deref().unwrap_or_default();
        let email = self.config.administrator_email.as_deref().unwrap_or_default();
        self.scripts.request_certificate(host, email)
    }

    fn verify_certificates(&self, root: &Path) -> InstallResult<()> {
        if !self.config.requires_tls_proxy() {
            return Ok(());
        }
        certificates::verify_certificates(root)
    }

    fn apply_configuration(&self, root: &Path) -> InstallResult<()> {
        let broker_local = features::broker_ctl_installed(root);
        let contents = conf::render(&self.config, broker_local);
        conf::write(root, &contents)?;
        self.scripts.apply_puppet()
    }

    fn configure_services(&self, installed: InstalledServices) -> InstallResult<()> {
        if installed.proxy {
            services::configure_proxy()?;
        }
        if installed.app_server {
            self.scripts.generate_secrets()?;
            let path = settings::install(
                Path::new("/"),
                &self.config.tree_root,
                self.config.external_host.as_deref(),
                self.config.administrator_email.as_deref(),
            )?;
            eprintln!("Wrote {}.", path.display());
            release::replace_link(
                &settings::installed_path(),
                &self.config.tree_root.join(settings::SETTINGS_LINK),
            )?;
        }
        if installed.cache {
            if self.config.in_ci {
                eprintln!("Skipping memcached restart (CI environment).");
            } else {
                services::restart("memcached")?;
            }
        }
        if installed.broker {
            services::check_broker()?;
            self.scripts.configure_broker()?;
        }
        if installed.database {
            self.scripts.init_database()?;
        }
        Ok(())
    }

    fn finalize_release(&self) -> InstallResult<()> {
        let deploy_path = self.scripts.allocate_deploy_path()?;
        eprintln!("Finalizing release at {}...", deploy_path.display());
        release::switch_release(
            &self.config.tree_root,
            &deploy_path,
            Path::new(release::DEPLOYMENTS_DIR),
        )?;
        release::replace_link(
            &settings::installed_path(),
            &deploy_path.join(settings::SETTINGS_LINK),
        )?;
        release::publish_static_assets(&deploy_path)?;
        release::fix_ownership()?;
        if !release::static_assets_built() {
            self.scripts.build_static_assets()?;
        }
        Ok(())
    }

    fn print_completion_report() {
        eprintln!();
        eprintln!("{}", "=".repeat(64));
        eprintln!(" Installation complete!");
        eprintln!("{}", "=".repeat(64));
        eprintln!();
        eprintln!("Next step: edit {}", settings::installed_path().display());
        eprintln!("and set EXTERNAL_HOST and ZULIP_ADMINISTRATOR, then run");
        eprintln!();
        eprintln!(
            "  su zulip -c '{}/scripts/setup/initialize-database'",
            release::CURRENT_LINK
        );
        eprintln!();
        eprintln!("to create the database and your organization.");
    }

    /// Stage names in execution order for this configuration, with the
    /// conditional stages resolved against `installed`.
    #[must_use]
    pub fn plan(&self, installed: InstalledServices) -> Vec<&'static str> {
        let mut stages = vec!["preflight", "package-repo", "init-shim"];
        if self.config.use_certbot {
            stages.push("certbot");
        }
        if self.config.requires_tls_proxy() {
            stages.push("certificate-check");
        }
        stages.push("dist-upgrade");
        stages.push("install-packages");
        if self.config.virtualenv_needed {
            stages.push("python-environment");
        }
        stages.push("frontend-toolchain");
        stages.push("puppet-apply");
        stages.push("detect-services");
        stages.push("upgrade");
        if installed.proxy {
            stages.push("configure-proxy");
        }
        if installed.app_server {
            stages.push("install-settings");
        }
        if installed.cache && !self.config.in_ci {
            stages.push("restart-cache");
        }
        if installed.broker {
            stages.push("configure-broker");
        }
        if installed.database {
            stages.push("init-database");
        }
        if installed.app_server {
            stages.push("finalize-release");
        }
        stages.push("supervisor-socket");
        stages.push("report");
        stages
    }
}
