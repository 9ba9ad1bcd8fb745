//! Update error types
//!
//! Fatal errors that can occur while rewriting the SSH config. A missing
//! config file or an unmatched host is not an error; see `UpdatePlan`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ssh_config::ParseError;

/// Errors that can occur during an SSH config update
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Home directory could not be resolved
    #[error("Could not determine home directory (is HOME set?)")]
    HomeDirUnavailable,

    /// Replacement value cannot be written as a config value
    #[error("Invalid {field} value {value:?}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Opening the config failed for a reason other than it being absent
    #[error("Failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the config failed
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config text is malformed
    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Writing the updated config failed
    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
