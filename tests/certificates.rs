use std::fs;
use std::path::Path;

use palisade::certificates::{self, CERTIFICATE_FILE, KEY_FILE};
use palisade::error::InstallError;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn both_files_present_passes() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), KEY_FILE);
    touch(root.path(), CERTIFICATE_FILE);
    assert!(certificates::missing_certificates(root.path()).is_empty());
    assert!(certificates::verify_certificates(root.path()).is_ok());
}

#[test]
fn missing_key_is_reported_by_path() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), CERTIFICATE_FILE);
    let missing = certificates::missing_certificates(root.path());
    assert_eq!(missing.len(), 1);
    assert!(missing[0].ends_with("etc/ssl/private/zulip.key"));
}

#[test]
fn missing_certificate_is_reported_by_path() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), KEY_FILE);
    let missing = certificates::missing_certificates(root.path());
    assert_eq!(missing.len(), 1);
    assert!(missing[0].ends_with("etc/ssl/certs/zulip.combined-chain.crt"));
}

#[test]
fn both_missing_reports_key_first() {
    let root = tempfile::tempdir().unwrap();
    let missing = certificates::missing_certificates(root.path());
    assert_eq!(missing.len(), 2);
    assert!(missing[0].contains("zulip.key"));
    assert!(missing[1].contains("zulip.combined-chain.crt"));
}

#[test]
fn verify_fails_with_the_missing_files() {
    let root = tempfile::tempdir().unwrap();
    let err = certificates::verify_certificates(root.path()).unwrap_err();
    match err {
        InstallError::MissingCertificates(missing) => assert_eq!(missing.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn verify_passes_after_files_appear() {
    // Models a re-run after the certbot stage put the files in place.
    let root = tempfile::tempdir().unwrap();
    assert!(certificates::verify_certificates(root.path()).is_err());
    touch(root.path(), KEY_FILE);
    touch(root.path(), CERTIFICATE_FILE);
    assert!(certificates::verify_certificates(root.path()).is_ok());
}
