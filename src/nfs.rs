use std::sync::OnceLock;

use regex::Regex;

const NFS_TYPES: &[&str] = &["nfs", "nfs3", "nfs4"];

fn device_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}):[/0-9A-Za-z_]+$")
            .expect("nfs device pattern")
    })
}

pub fn is_nfs(fstype: &str) -> bool {
    NFS_TYPES.contains(&fstype)
}

/// Server address of an `<ipv4>:<path>` device. Hostnames are not resolved.
pub fn server_addr(device: &str) -> Option<&str> {
    device_pattern()
        .captures(device)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Appends `addr=<ip>` to `data` for NFS mounts of a literal address.
pub fn augment(fstype: &str, device: &str, data: &mut Vec<String>) {
    if !is_nfs(fstype) {
        return;
    }
    if let Some(addr) = server_addr(device) {
        log::debug!("nfs server address {addr} taken from {device}");
        data.push(format!("addr={addr}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_address() {
        let mut data = vec!["vers=4".to_string()];
        augment("nfs4", "10.0.0.1:/export", &mut data);
        assert_eq!(data, vec!["vers=4", "addr=10.0.0.1"]);
    }
    #[test]
    fn hostname_is_ignored() {
        let mut data = Vec::new();
        augment("nfs", "myserver:/export", &mut data);
        assert!(data.is_empty());
    }
    #[test]
    fn only_nfs_types() {
        assert!(is_nfs("nfs"));
        assert!(is_nfs("nfs3"));
        assert!(is_nfs("nfs4"));
        assert!(!is_nfs("cifs"));
        assert!(!is_nfs("nfs2"));
        let mut data = Vec::new();
        augment("ext4", "10.0.0.1:/export", &mut data);
        assert!(data.is_empty());
    }
    #[test]
    fn anchored_pattern() {
        assert_eq!(server_addr("192.168.1.20:/srv/nfs_root"), Some("192.168.1.20"));
        assert_eq!(server_addr("192.168.1.20:export"), Some("192.168.1.20"));
        assert_eq!(server_addr("x192.168.1.20:/export"), None);
        assert_eq!(server_addr("192.168.1.20:/export-1"), None);
        assert_eq!(server_addr("192.168.1.20:"), None);
        assert_eq!(server_addr("1234.1.1.1:/export"), None);
        assert_eq!(server_addr("/dev/sda1"), None);
    }
}
