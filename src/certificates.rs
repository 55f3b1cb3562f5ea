use std::path::Path;

use crate::error::{InstallError, InstallResult};

/// Private key the proxy is configured to serve with, relative to
/// the filesystem root.
pub const KEY_FILE: &str = "etc/ssl/private/zulip.key";

/// Combined certificate chain the proxy is configured to serve with,
/// relative to the filesystem root.
pub const CERTIFICATE_FILE: &str = "etc/ssl/certs/zulip.combined-chain.crt";

/// Paths of the expected certificate files that do not exist under
/// `root`, in the order they should be reported.
#[must_use]
pub fn missing_certificates(root: &Path) -> Vec<String> {
    [KEY_FILE, CERTIFICATE_FILE]
        .into_iter()
        .map(|relative| root.join(relative))
        .filter(|path| !path.exists())
        .map(|path| path.display().to_string())
        .collect()
}

/// Fail unless both certificate files are in place.
///
/// Runs after the certbot stage, so a certificate obtained in this
/// very run satisfies the check.
pub fn verify_certificates(root: &Path) -> InstallResult<()> {
    let missing = missing_certificates(root);
    if missing.is_empty() {
        return Ok(());
    }

    eprintln!("No TLS certificate found. The server needs one to serve HTTPS.");
    eprintln!();
    eprintln!("Either re-run the installer with --certbot to obtain one");
    eprintln!("automatically, or install your own certificate and key at:");
    eprintln!();
    eprintln!("  {}", root.join(KEY_FILE).display());
    eprintln!("  {}", root.join(CERTIFICATE_FILE).display());
    eprintln!();
    eprintln!("For testing, scripts/setup/generate-self-signed-cert can");
    eprintln!("create a self-signed pair at those paths.");
    Err(InstallError::MissingCertificates(missing))
}
