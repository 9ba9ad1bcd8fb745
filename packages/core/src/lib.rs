//! ssh-host-update-core - Core library for ssh-host-update
//!
//! Parses the SSH client config, matches host blocks against an alias, and
//! rewrites `HostName`, `IdentityFile` and `User` values in place.

pub mod paths;
pub mod ssh_config;
pub mod update;
pub mod version;

pub use paths::get_ssh_config_path;
pub use ssh_config::{Document, HostBlock, KeyValue, Node, ParseError, Pattern};
pub use update::{
    PendingWrite, UpdateError, UpdatePlan, UpdateRequest, UpdateSummary, apply_updates,
    plan_update, update_ssh_config,
};
pub use version::{get_version, get_version_long};
