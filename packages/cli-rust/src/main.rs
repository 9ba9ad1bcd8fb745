//! ssh-host-update - Point an SSH host alias at a new machine
//!
//! This is the main entry point for the binary.

fn main() {
    if let Err(err) = ssh_host_update::run() {
        ssh_host_update::report_error(&err);
        std::process::exit(1);
    }
}
