//! In-place host updates for the SSH client config
//!
//! Finds every non-wildcard host block matching a key and overwrites its
//! `HostName`, `IdentityFile` and `User` values. A missing config file and an
//! unmatched key are both reported as plans, not errors, so deployment
//! scripts can call this unconditionally.

mod error;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::ssh_config::{Document, HostBlock};

pub use error::UpdateError;

/// Replacement values for a single host key
///
/// Built once from the command line. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Host alias matched against each block's patterns
    pub key: String,
    /// New `HostName` value
    pub host_name: Option<String>,
    /// New `IdentityFile` value
    pub identity_file: Option<String>,
    /// New `User` value
    pub user: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl UpdateRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Build a request from raw flag values, treating empty strings as unset
    pub fn from_flags(key: String, host_name: String, identity_file: String, user: String) -> Self {
        Self {
            key,
            host_name: non_empty(host_name),
            identity_file: non_empty(identity_file),
            user: non_empty(user),
        }
    }

    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    pub fn with_identity_file(mut self, identity_file: impl Into<String>) -> Self {
        self.identity_file = Some(identity_file.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// True when no replacement value is set
    pub fn is_empty(&self) -> bool {
        self.host_name.is_none() && self.identity_file.is_none() && self.user.is_none()
    }

    /// Check that every replacement can be written back as a single value
    ///
    /// SSH config has no escape for `"`, and a line break would split the
    /// value into a new directive, so both are refused.
    pub fn validate(&self) -> Result<(), UpdateError> {
        let fields = [
            ("HostName", &self.host_name),
            ("IdentityFile", &self.identity_file),
            ("User", &self.user),
        ];
        for (field, value) in fields {
            let Some(value) = value else { continue };
            let reason = if value.contains('"') {
                "double quotes cannot be written to an SSH config"
            } else if value.contains(['\n', '\r']) {
                "line breaks cannot be written to an SSH config"
            } else {
                continue;
            };
            return Err(UpdateError::InvalidValue {
                field,
                value: value.clone(),
                reason,
            });
        }
        Ok(())
    }

    /// Replacement for a config key, if one was requested
    fn replacement_for(&self, key: &str) -> Option<&str> {
        let value = match key.to_ascii_lowercase().as_str() {
            "hostname" => &self.host_name,
            "identityfile" => &self.identity_file,
            "user" => &self.user,
            _ => return None,
        };
        value.as_deref()
    }

    /// Whether `block` is a target for this request
    ///
    /// The universal `*` block is never a target, whatever the key.
    fn targets(&self, block: &HostBlock) -> bool {
        !block.is_wildcard_only() && block.matches(&self.key)
    }
}

/// Counts from applying a request to a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Host blocks whose patterns matched the key
    pub matched_blocks: usize,
    /// Values overwritten across those blocks
    pub changed_values: usize,
}

impl UpdateSummary {
    pub fn matched(&self) -> bool {
        self.matched_blocks > 0
    }
}

/// Apply `request` to every matching host block in `document`
///
/// Does not stop at the first match: if several blocks match the key, all of
/// them are updated.
pub fn apply_updates(document: &mut Document, request: &UpdateRequest) -> UpdateSummary {
    let mut summary = UpdateSummary::default();

    for block in document.hosts_mut() {
        if !request.targets(block) {
            continue;
        }
        summary.matched_blocks += 1;

        for kv in block.key_values_mut() {
            if let Some(value) = request.replacement_for(kv.key()) {
                tracing::debug!(
                    "Setting {} for '{}': {} -> {}",
                    kv.key(),
                    request.key,
                    kv.value(),
                    value
                );
                kv.set_value(value);
                summary.changed_values += 1;
            }
        }
    }

    if summary.matched_blocks > 1 {
        tracing::warn!(
            "Host key '{}' matched {} blocks; all of them were updated",
            request.key,
            summary.matched_blocks
        );
    }

    summary
}

/// Serialized config ready to be written back
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub contents: String,
    pub summary: UpdateSummary,
}

impl PendingWrite {
    /// Overwrite the config file with the new contents
    ///
    /// This is a plain truncate-and-write. No backup is kept.
    pub fn commit(&self) -> Result<(), UpdateError> {
        let write_err = |source: io::Error| UpdateError::Write {
            path: self.path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(&self.path).map_err(write_err)?;
        file.write_all(self.contents.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        tracing::info!(
            "Updated {} value(s) in {} host block(s) in {}",
            self.summary.changed_values,
            self.summary.matched_blocks,
            self.path.display()
        );
        Ok(())
    }
}

/// What an update would do to the config at a given path
#[derive(Debug, Clone)]
pub enum UpdatePlan {
    /// No config file exists; nothing to do
    ConfigMissing(PathBuf),
    /// No non-wildcard block matches the key; nothing to do
    HostNotFound(String),
    /// At least one block matched
    Write(PendingWrite),
}

/// Read, parse and update the config at `path` without writing it
pub fn plan_update(path: &Path, request: &UpdateRequest) -> Result<UpdatePlan, UpdateError> {
    request.validate()?;

    let text = match read_config(path)? {
        Some(text) => text,
        None => {
            tracing::debug!("SSH config not found at {}", path.display());
            return Ok(UpdatePlan::ConfigMissing(path.to_path_buf()));
        }
    };

    let mut document = Document::decode(&text).map_err(|source| UpdateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = apply_updates(&mut document, request);
    if !summary.matched() {
        return Ok(UpdatePlan::HostNotFound(request.key.clone()));
    }

    Ok(UpdatePlan::Write(PendingWrite {
        path: path.to_path_buf(),
        contents: document.marshal_text(),
        summary,
    }))
}

/// Update the config at `path` and write it back when a host matched
pub fn update_ssh_config(path: &Path, request: &UpdateRequest) -> Result<UpdatePlan, UpdateError> {
    let plan = plan_update(path, request)?;
    if let UpdatePlan::Write(pending) = &plan {
        pending.commit()?;
    }
    Ok(plan)
}

/// Read the whole config, returning `None` when it does not exist
fn read_config(path: &Path) -> Result<Option<String>, UpdateError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(UpdateError::Open {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| UpdateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(contents))
}
