use std::process;

use clap::Parser;
use clap::error::ErrorKind;

use palisade::{InstallConfig, InstallError, InstallOptions, Installer};

fn main() {
    let options = match InstallOptions::try_parse() {
        Ok(options) => options,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            // clap exits with 2 on usage errors; every installer
            // failure reports 1.
            let _ = err.print();
            process::exit(1);
        }
    };

    let config = match InstallConfig::resolve(options) {
        Ok(config) => config,
        Err(err) => fail(&err),
    };

    if let Err(err) = Installer::new(config).run() {
        fail(&err);
    }
}

fn fail(err: &InstallError) -> ! {
    eprintln!();
    eprintln!("Installation failed: {err}");
    eprintln!();
    eprintln!("Once the cause above is fixed, re-running the installer is safe:");
    eprintln!("completed steps are idempotent and the run resumes from the failure.");
    process::exit(1);
}
