use std::ffi::CString;
use std::io;

use crate::options::MountFlags;

pub trait Mounter {
    fn mount(
        &self,
        device: &str,
        target: &str,
        fstype: &str,
        data: &str,
        flags: MountFlags,
    ) -> io::Result<()>;
}

impl<T: Mounter + ?Sized> Mounter for &T {
    fn mount(
        &self,
        device: &str,
        target: &str,
        fstype: &str,
        data: &str,
        flags: MountFlags,
    ) -> io::Result<()> {
        (**self).mount(device, target, fstype, data, flags)
    }
}

/// `mount(2)`.
pub struct SysMounter;

fn c_string(s: &str) -> io::Result<CString> {
    CString::new(s).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

impl Mounter for SysMounter {
    fn mount(
        &self,
        device: &str,
        target: &str,
        fstype: &str,
        data: &str,
        flags: MountFlags,
    ) -> io::Result<()> {
        let device = c_string(device)?;
        let target = c_string(target)?;
        let fstype = c_string(fstype)?;
        // an empty data string is still passed, never NULL
        let data = c_string(data)?;
        let ret = unsafe {
            libc::mount(
                device.as_ptr(),
                target.as_ptr(),
                fstype.as_ptr(),
                flags,
                data.as_ptr() as *const libc::c_void,
            )
        };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_nul_is_rejected() {
        let err = SysMounter
            .mount("/dev/sda1\0", "/mnt", "ext4", "", 0)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
