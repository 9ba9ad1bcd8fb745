//! End-to-end updates against config files on disk

use std::fs;
use std::path::PathBuf;

use ssh_host_update_core::{
    Document, UpdateError, UpdatePlan, UpdateRequest, plan_update, update_ssh_config,
};
use tempfile::TempDir;

const CONFIG: &str = "# deploy targets
Host *
    ServerAliveInterval 60

Host myhost
    HostName 203.0.113.10
    User ubuntu
    IdentityFile ~/.ssh/old.pem
";

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_updates_hostname_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let request = UpdateRequest::new("myhost").with_host_name("1.2.3.4");
    let plan = update_ssh_config(&path, &request).unwrap();

    match plan {
        UpdatePlan::Write(pending) => {
            assert_eq!(pending.summary.matched_blocks, 1);
            assert_eq!(pending.summary.changed_values, 1);
        }
        other => panic!("expected a write, got {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        CONFIG.replace("203.0.113.10", "1.2.3.4")
    );
}

#[test]
fn test_missing_config_is_not_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");

    let request = UpdateRequest::new("myhost").with_host_name("1.2.3.4");
    let plan = update_ssh_config(&path, &request).unwrap();

    assert!(matches!(plan, UpdatePlan::ConfigMissing(p) if p == path));
    assert!(!path.exists());
}

#[test]
fn test_unmatched_key_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let request = UpdateRequest::new("ghost").with_user("root");
    let plan = update_ssh_config(&path, &request).unwrap();

    assert!(matches!(plan, UpdatePlan::HostNotFound(ref key) if key == "ghost"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

#[test]
fn test_plan_does_not_write() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let request = UpdateRequest::new("myhost").with_user("ec2-user");
    let plan = plan_update(&path, &request).unwrap();

    let UpdatePlan::Write(pending) = plan else {
        panic!("expected a write plan");
    };
    assert!(pending.contents.contains("User ec2-user"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);

    pending.commit().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), pending.contents);
}

#[test]
fn test_parse_error_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "Host myhost\n    HostName\n");

    let request = UpdateRequest::new("myhost").with_host_name("1.2.3.4");
    let err = update_ssh_config(&path, &request).unwrap_err();

    assert!(matches!(err, UpdateError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse"));
    let cause = std::error::Error::source(&err).unwrap();
    assert!(cause.to_string().contains("line 2"));
}

#[test]
fn test_quoted_value_is_refused_and_config_stays_readable() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let request = UpdateRequest::new("myhost").with_user("a\"b");
    let err = update_ssh_config(&path, &request).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidValue { field: "User", .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);

    let retry = UpdateRequest::new("myhost").with_user("ab");
    update_ssh_config(&path, &retry).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(Document::decode(&written).is_ok());
    assert!(written.contains("    User ab\n"));
}

#[test]
fn test_directory_path_is_open_or_read_error() {
    let dir = TempDir::new().unwrap();

    let request = UpdateRequest::new("myhost").with_host_name("1.2.3.4");
    let err = update_ssh_config(dir.path(), &request).unwrap_err();

    assert!(matches!(
        err,
        UpdateError::Open { .. } | UpdateError::Read { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_existing_permissions_are_kept() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let request = UpdateRequest::new("myhost").with_user("admin");
    update_ssh_config(&path, &request).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}
