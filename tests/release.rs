use std::fs;
use std::path::Path;

use palisade::error::InstallError;
use palisade::release;

#[test]
fn replace_link_creates_a_fresh_symlink() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("target");
    fs::create_dir(&target).unwrap();
    let link = dir.path().join("link");

    release::replace_link(&target, &link).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), target);
}

#[test]
fn replace_link_repoints_an_existing_symlink() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old");
    let new = dir.path().join("new");
    fs::create_dir(&old).unwrap();
    fs::create_dir(&new).unwrap();
    let link = dir.path().join("link");

    release::replace_link(&old, &link).unwrap();
    release::replace_link(&new, &link).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), new);
}

#[test]
fn replace_link_replaces_a_regular_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("target");
    fs::create_dir(&target).unwrap();
    let link = dir.path().join("link");
    fs::write(&link, b"stale").unwrap();

    release::replace_link(&target, &link).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), target);
}

#[test]
fn replace_link_replaces_a_dangling_symlink() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("target");
    fs::create_dir(&target).unwrap();
    let link = dir.path().join("link");
    release::replace_link(&dir.path().join("gone"), &link).unwrap();

    release::replace_link(&target, &link).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), target);
}

#[test]
fn switch_release_moves_the_tree_and_updates_links() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("unpacked");
    fs::create_dir(&tree).unwrap();
    fs::write(tree.join("version.py"), b"ZULIP_VERSION = '9.0'\n").unwrap();

    let deployments = dir.path().join("deployments");
    let deploy_path = deployments.join("2026-08-25-12-00-00");

    release::switch_release(&tree, &deploy_path, &deployments).unwrap();

    // The tree lives at its release directory now.
    assert!(deploy_path.join("version.py").exists());

    // current and next point at the release.
    assert_eq!(fs::read_link(deployments.join("current")).unwrap(), deploy_path);
    assert_eq!(fs::read_link(deployments.join("next")).unwrap(), deploy_path);

    // The old tree location forwards into the deployment layout.
    assert_eq!(fs::read_link(&tree).unwrap(), deployments.join("next"));

    // Reading through the chain still reaches the release files.
    assert_eq!(
        fs::read_to_string(tree.join("version.py")).unwrap(),
        "ZULIP_VERSION = '9.0'\n"
    );
}

#[test]
fn switch_release_creates_the_deployments_directory() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("unpacked");
    fs::create_dir(&tree).unwrap();

    let deployments = dir.path().join("a/b/deployments");
    let deploy_path = deployments.join("first");

    release::switch_release(&tree, &deploy_path, &deployments).unwrap();
    assert!(deploy_path.is_dir());
}

#[test]
fn switch_release_crosses_filesystem_boundaries() {
    // /dev/shm is its own tmpfs on Linux hosts, so a tree staged
    // there and a deployments directory on disk cannot be joined by
    // a plain rename.
    let shm = Path::new("/dev/shm");
    if !shm.is_dir() {
        return;
    }
    let staging = tempfile::tempdir_in(shm).unwrap();
    let tree = staging.path().join("unpacked");
    fs::create_dir(&tree).unwrap();
    fs::write(tree.join("version.py"), b"ZULIP_VERSION = '9.0'\n").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let deployments = dir.path().join("deployments");
    let deploy_path = deployments.join("2026-08-25-12-00-00");

    release::switch_release(&tree, &deploy_path, &deployments).unwrap();

    assert_eq!(
        fs::read_to_string(deploy_path.join("version.py")).unwrap(),
        "ZULIP_VERSION = '9.0'\n"
    );
    assert_eq!(fs::read_link(deployments.join("current")).unwrap(), deploy_path);
    assert_eq!(fs::read_link(&tree).unwrap(), deployments.join("next"));
}

#[test]
fn publish_static_assets_rejects_a_tree_without_served_assets() {
    let dir = tempfile::tempdir().unwrap();
    let err = release::publish_static_assets(dir.path()).unwrap_err();
    match err {
        InstallError::FileNotFound(path) => {
            assert!(path.contains("prod-static/serve"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
