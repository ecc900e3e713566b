use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("no free loop device")]
    DeviceExhausted(#[source] io::Error),
    #[error("cannot bind {file} to {device}")]
    BindFailed {
        device: String,
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot detach {device}")]
    DetachFailed {
        device: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything that terminates a mount invocation with a non-zero status.
#[derive(Debug, Error)]
pub enum MountCliError {
    #[error("No file system type provided!\nUsage: mount [-r] [-o mount options] -t fstype dev path")]
    MissingFsType,
    #[error("Error setting loop device")]
    Loop(#[from] LoopError),
    // the OS error is shown as-is, not as a cause
    #[error("{error}")]
    Mount {
        device: String,
        target: String,
        fstype: String,
        error: io::Error,
    },
}
