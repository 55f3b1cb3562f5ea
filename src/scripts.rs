use std::path::{Path, PathBuf};

use crate::cmd;
use crate::error::{InstallError, InstallResult};
use crate::release;

/// Runner for the helper scripts shipped inside one release tree.
///
/// The heavy lifting of several stages lives in scripts maintained
/// alongside the server code; those stages delegate instead of
/// reimplementing them.
pub struct SetupScripts {
    root: PathBuf,
}

impl SetupScripts {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Absolute path of a helper inside the tree.
    #[must_use]
    pub fn path(&self, helper: &str) -> String {
        self.root.join(helper).to_string_lossy().into_owned()
    }

    fn run(&self, helper: &str, args: &[&str]) -> InstallResult<()> {
        cmd::run_interactive(&self.path(helper), args)
    }

    /// Configure the package repositories the server packages come from.
    pub fn setup_package_repo(&self) -> InstallResult<()> {
        eprintln!("Setting up package sources...");
        self.run("scripts/lib/setup-apt-repo", &[])
    }

    /// Make `service` work under init systems that lack it.
    pub fn setup_init_shim(&self) -> InstallResult<()> {
        self.run("scripts/lib/setup-init-shim", &[])
    }

    /// Obtain a TLS certificate for `host` with certbot.
    pub fn request_certificate(&self, host: &str, email: &str) -> InstallResult<()> {
        eprintln!("Requesting a TLS certificate for {host}...");
        self.run(
            "scripts/setup/setup-certbot",
            &["--no-zulip-conf", "--method=standalone", host, "--email", email],
        )
    }

    /// Create the production Python environment.
    pub fn create_python_environment(&self) -> InstallResult<()> {
        eprintln!("Creating the production Python environment...");
        let root = self.root.to_string_lossy().into_owned();
        self.run("scripts/lib/create-production-venv", &[&root])
    }

    /// Install the frontend build toolchain.
    pub fn install_frontend_toolchain(&self) -> InstallResult<()> {
        self.run("scripts/lib/install-node", &[])
    }

    /// Apply the puppet manifests named in the machine configuration.
    pub fn apply_puppet(&self) -> InstallResult<()> {
        eprintln!("Applying puppet manifests (this may take a while)...");
        self.run("scripts/zulip-puppet-apply", &["-f"])
    }

    /// Generate the server's secret keys.
    pub fn generate_secrets(&self) -> InstallResult<()> {
        self.run("scripts/setup/generate_secrets.py", &["--production"])
    }

    /// Ask the tree for a fresh, unused release directory path.
    pub fn allocate_deploy_path(&self) -> InstallResult<PathBuf> {
        let output = cmd::run(&self.path("scripts/lib/make-deploy-path"), &[])?;
        if output.is_empty() {
            return Err(InstallError::Other(
                "deploy path helper returned nothing".to_string(),
            ));
        }
        Ok(PathBuf::from(output))
    }

    /// Create the broker's users and permissions.
    pub fn configure_broker(&self) -> InstallResult<()> {
        self.run("scripts/setup/configure-rabbitmq", &[])
    }

    /// Create the database cluster and roles.
    pub fn init_database(&self) -> InstallResult<()> {
        eprintln!("Initializing the database...");
        self.run("scripts/setup/postgres-init-db", &[])
    }

    /// Build the static assets as the service account.
    pub fn build_static_assets(&self) -> InstallResult<()> {
        eprintln!("Building static assets (this may take a while)...");
        let build = format!("{}/tools/update-prod-static", release::CURRENT_LINK);
        cmd::run_interactive("su", &[release::SERVICE_USER, "-c", &build])
    }
}
