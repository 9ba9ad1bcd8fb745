//! SSH config path resolution

use std::path::PathBuf;

/// Get the path to the user's SSH client config
///
/// Returns: `{home}/.ssh/config`, with the home directory taken from `HOME`
/// on Unix.
pub fn get_ssh_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(ssh_config_path_in)
}

/// SSH config path below an explicit home directory
pub fn ssh_config_path_in(home: impl Into<PathBuf>) -> PathBuf {
    home.into().join(".ssh").join("config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ssh_config_path() {
        let path = get_ssh_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with(".ssh/config"));
    }

    #[test]
    fn test_ssh_config_path_in() {
        let path = ssh_config_path_in("/home/deploy");
        assert_eq!(path, PathBuf::from("/home/deploy/.ssh/config"));
    }
}
