use crate::cmd;
use crate::error::{InstallError, InstallResult};

/// Restart a service through the init system.
pub fn restart(service: &str) -> InstallResult<()> {
    eprintln!("Restarting {service}...");
    cmd::run_interactive("service", &[service, "restart"])
}

/// Validate the proxy configuration and restart the proxy.
///
/// Validation runs first so a broken configuration is reported with
/// nginx's own diagnostics instead of a silent failed restart.
pub fn configure_proxy() -> InstallResult<()> {
    if cmd::run_interactive("nginx", &["-t"]).is_err() {
        eprintln!();
        eprintln!("nginx configuration validation failed. The most common");
        eprintln!("cause is a missing or misconfigured TLS certificate;");
        eprintln!("check the files under /etc/ssl and re-run the installer.");
        return Err(InstallError::ServiceUnhealthy {
            service: "nginx".to_string(),
            hint: "configuration validation failed".to_string(),
        });
    }
    restart("nginx")
}

/// Verify the message broker answers status queries.
pub fn check_broker() -> InstallResult<()> {
    if cmd::run("rabbitmqctl", &["status"]).is_err() {
        eprintln!();
        eprintln!("RabbitMQ did not come up properly. In virtualized");
        eprintln!("environments this is often a misconfigured /etc/hosts;");
        eprintln!("the machine's hostname must resolve to a local address.");
        return Err(InstallError::ServiceUnhealthy {
            service: "rabbitmq".to_string(),
            hint: "status query failed".to_string(),
        });
    }
    Ok(())
}
