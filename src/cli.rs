use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use crate::error::MountCliError;
use crate::options;
use crate::orchestrator::{LoopCleanup, MountRequest};

pub const PROC_MOUNTS: &str = "/proc/mounts";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Mount a filesystem at the specified path.
///
/// Without any argument, print the current mount table.
#[derive(Parser, Debug)]
#[command(name = "mount", version, about, long_about = None)]
pub struct Cli {
    /// Read only mount
    #[arg(short = 'r')]
    pub read_only: bool,
    /// Comma separated list of mount options
    #[arg(short = 'o', value_name = "OPTIONS")]
    pub options: Vec<String>,
    /// File system type
    #[arg(short = 't', value_name = "FSTYPE")]
    pub fstype: Option<String>,
    /// Loop device handling when the mount fails [default: keep]
    #[arg(long, value_enum)]
    pub loop_cleanup: Option<LoopCleanup>,
    /// Desktop notification for mount events
    #[arg(long)]
    pub notify: bool,
    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
    /// DEV PATH
    pub args: Vec<String>,
}

impl Cli {
    /// True when neither a flag nor an argument was given.
    pub fn is_bare(&self) -> bool {
        self.args.is_empty()
            && !self.read_only
            && self.options.is_empty()
            && self.fstype.is_none()
            && self.loop_cleanup.is_none()
            && !self.notify
            && !self.verbose
    }

    pub fn loop_cleanup(&self) -> LoopCleanup {
        self.loop_cleanup.unwrap_or_default()
    }

    /// `None` when DEV or PATH is missing.
    pub fn request(&self) -> Option<MountRequest> {
        let [device, target, ..] = self.args.as_slice() else {
            return None;
        };
        Some(MountRequest {
            device: device.clone(),
            target: target.clone(),
            fstype: self.fstype.clone(),
            read_only: self.read_only,
            options: options::split_option_args(self.options.as_slice()),
        })
    }
}

/// env_logger filter used when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Usage line printed to stderr when DEV or PATH is missing.
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}

/// The error followed by its causes, `: `-separated.
pub fn describe(err: &MountCliError) -> String {
    anyhow::Chain::new(err)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

pub fn exit_status(result: &Result<(), MountCliError>) -> u8 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

pub fn print_mounts() -> Result<()> {
    print_mounts_from(PROC_MOUNTS, &mut io::stdout().lock())
}

pub fn print_mounts_from<P: AsRef<Path>, W: Write>(path: P, out: &mut W) -> Result<()> {
    let path = path.as_ref();
    let mounts = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    out.write_all(&mounts)?;
    out.flush()?;
    Ok(())
}
