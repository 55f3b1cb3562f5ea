use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallError, InstallResult};

/// Installed settings file the server reads, relative to the
/// filesystem root.
pub const SETTINGS_FILE: &str = "etc/zulip/settings.py";

/// Template inside the release tree the settings file starts from.
pub const SETTINGS_TEMPLATE: &str = "zproject/prod_settings_template.py";

/// Symlink inside the release tree through which the server imports
/// the installed settings file.
pub const SETTINGS_LINK: &str = "zproject/prod_settings.py";

/// Absolute path of the installed settings file on a production host.
#[must_use]
pub fn installed_path() -> PathBuf {
    Path::new("/").join(SETTINGS_FILE)
}

/// Render the settings file from the template.
///
/// The host assignment is rewritten only when a hostname was given,
/// leaving the template's placeholder for the operator otherwise. The
/// administrator assignment is rewritten on every render; with no
/// address on the command line it becomes an empty string the
/// operator must fill in before the first start.
#[must_use]
pub fn render(
    template: &str,
    external_host: Option<&str>,
    administrator_email: Option<&str>,
) -> String {
    let admin = administrator_email.unwrap_or_default();
    let mut lines: Vec<String> = Vec::new();
    for line in template.lines() {
        if line.starts_with("ZULIP_ADMINISTRATOR =") {
            lines.push(format!("ZULIP_ADMINISTRATOR = '{admin}'"));
            continue;
        }
        match external_host {
            Some(host) if line.starts_with("EXTERNAL_HOST =") => {
                lines.push(format!("EXTERNAL_HOST = '{host}'"));
            }
            _ => lines.push(line.to_string()),
        }
    }
    let mut rendered = lines.join("\n");
    if template.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Render the template from the release tree and install it under
/// `root`, creating parents. Overwrites any previous settings file.
pub fn install(
    root: &Path,
    tree: &Path,
    external_host: Option<&str>,
    administrator_email: Option<&str>,
) -> InstallResult<PathBuf> {
    let template_path = tree.join(SETTINGS_TEMPLATE);
    if !template_path.exists() {
        return Err(InstallError::FileNotFound(format!(
            "{} (is this an unpacked release tree?)",
            template_path.display()
        )));
    }
    let template = fs::read_to_string(&template_path)?;
    let rendered = render(&template, external_host, administrator_email);

    let path = root.join(SETTINGS_FILE);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, rendered)?;
    Ok(path)
}
