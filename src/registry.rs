use std::fs;
use std::path::PathBuf;

use crate::error::RegistryError;

pub const PROC_FILESYSTEMS: &str = "/proc/filesystems";

/// Filesystem drivers known to the running kernel.
pub struct FilesystemRegistry {
    path: PathBuf,
}

impl Default for FilesystemRegistry {
    fn default() -> Self {
        Self::new(PROC_FILESYSTEMS)
    }
}

impl FilesystemRegistry {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn query(&self, fstype: &str) -> Result<(Vec<String>, bool), RegistryError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| RegistryError::Read {
            path: self.path.clone(),
            source,
        })?;
        let known = parse_filesystems(&contents);
        let found = known.iter().any(|name| name == fstype);
        Ok((known, found))
    }

    /// A hint when `fstype` is not supported. An unreadable registry gives none.
    pub fn hint(&self, fstype: &str) -> Option<String> {
        match self.query(fstype) {
            Ok((_, true)) => None,
            Ok((known, false)) => Some(format!(
                "Hint: unknown filesystem {fstype}. Known are: [{}]",
                known.join(" ")
            )),
            Err(err) => {
                log::debug!("no filesystem hint: {err}");
                None
            }
        }
    }
}

// "nodev\tproc" and "\text4" both name the last field
pub fn parse_filesystems(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .map(str::to_string)
        .collect()
}
