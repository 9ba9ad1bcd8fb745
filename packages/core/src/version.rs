//! Version information for ssh-host-update

/// Get the current version string
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the long version string with build information
///
/// Returns version plus build metadata when available (git commit, build date).
/// Falls back to "unknown" when the build did not provide them.
pub fn get_version_long() -> String {
    let git_hash = option_env!("SSH_HOST_UPDATE_GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("SSH_HOST_UPDATE_BUILD_DATE").unwrap_or("unknown");

    format!("{} (git: {git_hash}, built: {build_date})", get_version())
}
