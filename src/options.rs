use libc::c_ulong;

pub type MountFlags = c_ulong;

/// Token that requests a loop device instead of being passed to the kernel.
pub const LOOP_OPTION: &str = "loop";

/// Option names understood as kernel mount flags. Anything else is
/// filesystem-specific data.
pub const KNOWN_OPTIONS: &[(&str, MountFlags)] = &[
    ("ro", libc::MS_RDONLY),
    ("rdonly", libc::MS_RDONLY),
    ("nosuid", libc::MS_NOSUID),
    ("nodev", libc::MS_NODEV),
    ("noexec", libc::MS_NOEXEC),
    ("sync", libc::MS_SYNCHRONOUS),
    ("synchronous", libc::MS_SYNCHRONOUS),
    ("remount", libc::MS_REMOUNT),
    ("mand", libc::MS_MANDLOCK),
    ("mandlock", libc::MS_MANDLOCK),
    ("dirsync", libc::MS_DIRSYNC),
    ("noatime", libc::MS_NOATIME),
    ("nodiratime", libc::MS_NODIRATIME),
    ("bind", libc::MS_BIND),
    ("rbind", libc::MS_BIND | libc::MS_REC),
    ("move", libc::MS_MOVE),
    ("rec", libc::MS_REC),
    ("silent", libc::MS_SILENT),
    ("posixacl", libc::MS_POSIXACL),
    ("unbindable", libc::MS_UNBINDABLE),
    ("private", libc::MS_PRIVATE),
    ("slave", libc::MS_SLAVE),
    ("shared", libc::MS_SHARED),
    ("relatime", libc::MS_RELATIME),
    ("iversion", libc::MS_I_VERSION),
    ("i_version", libc::MS_I_VERSION),
    ("strictatime", libc::MS_STRICTATIME),
    ("lazytime", libc::MS_LAZYTIME),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Translation {
    pub flags: MountFlags,
    pub data: Vec<String>,
    pub loop_requested: bool,
}

impl Translation {
    pub fn data_string(&self) -> String {
        self.data.join(",")
    }
}

pub fn lookup(name: &str) -> Option<MountFlags> {
    KNOWN_OPTIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, flag)| *flag)
}

/// Splits every `-o` value on commas. Order, duplicates and empty tokens
/// are kept.
pub fn split_option_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::to_string)
        .collect()
}

pub fn translate<S: AsRef<str>>(options: &[S], read_only: bool) -> Translation {
    let mut translation = Translation::default();
    for option in options {
        let option = option.as_ref();
        if option == LOOP_OPTION {
            translation.loop_requested = true;
        } else if let Some(flag) = lookup(option) {
            translation.flags |= flag;
        } else {
            translation.data.push(option.to_string());
        }
    }
    if read_only {
        translation.flags |= libc::MS_RDONLY;
    }
    translation
}
