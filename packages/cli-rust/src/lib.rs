//! ssh-host-update CLI - Point an SSH host alias at a new machine
//!
//! Updates the `HostName`, `IdentityFile` and `User` lines of the host blocks
//! in `~/.ssh/config` that match a key. Intended to run from deployment
//! tooling right after a machine is provisioned.

mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ssh_host_update_core::{
    UpdateError, UpdatePlan, UpdateRequest, get_ssh_config_path, get_version_long, plan_update,
};
use tracing_subscriber::EnvFilter;

/// Update a host entry in your SSH client config
///
/// A missing config file or an unmatched key is reported and exits
/// successfully, so this can run unconditionally after provisioning.
#[derive(Parser, Debug)]
#[command(name = "ssh-host-update")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Update a host entry in your SSH client config", long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Host key to match and update
    #[arg(short = 'k', long = "key", default_value = "")]
    key: String,

    /// New HostName value
    #[arg(short = 'h', long = "hostname", default_value = "")]
    host_name: String,

    /// New IdentityFile value
    #[arg(short = 'i', long = "identity-file", default_value = "")]
    identity_file: String,

    /// New User value
    #[arg(short = 'u', long = "user", default_value = "")]
    user: String,

    /// SSH config to update (defaults to ~/.ssh/config)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the updated config instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the success message
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print help (-h sets the HostName)
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn update_request(&self) -> UpdateRequest {
        UpdateRequest::from_flags(
            self.key.clone(),
            self.host_name.clone(),
            self.identity_file.clone(),
            self.user.clone(),
        )
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `-v` selects info and `-vv` debug.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when run() is called more than once
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Print a fatal error from [`run`] with its cause chain
pub fn report_error(err: &anyhow::Error) {
    output::show_error(err);
}

fn execute(cli: Cli) -> Result<()> {
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    init_tracing(cli.verbose);
    tracing::debug!("ssh-host-update {}", get_version_long());

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_ssh_config_path().ok_or(UpdateError::HomeDirUnavailable)?,
    };

    let request = cli.update_request();
    if request.key.is_empty() {
        tracing::warn!("No host key given; use -k <alias> to select a host block");
    }
    if request.is_empty() {
        tracing::info!("No replacement values given; matching blocks are rewritten unchanged");
    }

    match plan_update(&config_path, &request)? {
        UpdatePlan::ConfigMissing(path) => {
            output::show_skip(&output::config_missing_message(&path));
        }
        UpdatePlan::HostNotFound(key) => {
            output::show_skip(&output::host_not_found_message(&key));
        }
        UpdatePlan::Write(pending) if cli.dry_run => {
            tracing::info!(
                "Dry run: {} value(s) would change in {}",
                pending.summary.changed_values,
                pending.path.display()
            );
            print!("{}", pending.contents);
        }
        UpdatePlan::Write(pending) => {
            pending.commit()?;
            if !cli.quiet {
                output::show_updated(&request.key, &pending);
            }
        }
    }

    Ok(())
}
