use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;

use libc::c_ulong;

use crate::error::LoopError;

pub const LOOP_CONTROL: &str = "/dev/loop-control";

// linux/loop.h
const LOOP_SET_FD: c_ulong = 0x4C00;
const LOOP_CLR_FD: c_ulong = 0x4C01;
const LOOP_CTL_GET_FREE: c_ulong = 0x4C82;

/// Access to the kernel loop subsystem.
pub trait LoopControl {
    /// Path of an unbound loop device, e.g. `/dev/loop3`.
    fn find_free_device(&self) -> Result<String, LoopError>;
    /// Backs `device` with the contents of `file`.
    fn bind_file(&self, device: &str, file: &str, read_only: bool) -> Result<(), LoopError>;
    fn detach(&self, device: &str) -> Result<(), LoopError>;
}

impl<T: LoopControl + ?Sized> LoopControl for &T {
    fn find_free_device(&self) -> Result<String, LoopError> {
        (**self).find_free_device()
    }
    fn bind_file(&self, device: &str, file: &str, read_only: bool) -> Result<(), LoopError> {
        (**self).bind_file(device, file, read_only)
    }
    fn detach(&self, device: &str) -> Result<(), LoopError> {
        (**self).detach(device)
    }
}

/// Finds a free loop device and binds `file` to it.
///
/// The binding stays in place once this returns, whatever happens to the
/// mount afterwards.
pub fn provision<L: LoopControl + ?Sized>(
    control: &L,
    file: &str,
    read_only: bool,
) -> Result<String, LoopError> {
    let device = control.find_free_device()?;
    log::debug!("binding {file} to {device}");
    control.bind_file(&device, file, read_only)?;
    Ok(device)
}

pub struct SysLoopControl;

fn ioctl(file: &File, request: c_ulong, arg: libc::c_int) -> io::Result<libc::c_int> {
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), request as _, arg) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(ret)
}

impl LoopControl for SysLoopControl {
    fn find_free_device(&self) -> Result<String, LoopError> {
        let control = File::open(LOOP_CONTROL).map_err(LoopError::DeviceExhausted)?;
        let index = ioctl(&control, LOOP_CTL_GET_FREE, 0).map_err(LoopError::DeviceExhausted)?;
        Ok(format!("/dev/loop{index}"))
    }

    fn bind_file(&self, device: &str, file: &str, read_only: bool) -> Result<(), LoopError> {
        let bind_failed = |source| LoopError::BindFailed {
            device: device.to_string(),
            file: file.to_string(),
            source,
        };
        let backing = OpenOptions::new()
            .read(true)
            .write(!read_only)
            .open(file)
            .map_err(bind_failed)?;
        let loop_dev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .map_err(bind_failed)?;
        ioctl(&loop_dev, LOOP_SET_FD, backing.as_raw_fd()).map_err(bind_failed)?;
        Ok(())
    }

    fn detach(&self, device: &str) -> Result<(), LoopError> {
        let detach_failed = |source| LoopError::DetachFailed {
            device: device.to_string(),
            source,
        };
        let loop_dev = File::open(device).map_err(detach_failed)?;
        ioctl(&loop_dev, LOOP_CLR_FD, 0).map_err(detach_failed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeLoop {
        free: Option<u32>,
        refuse_bind: bool,
        bound: RefCell<Vec<(String, String, bool)>>,
    }

    impl LoopControl for FakeLoop {
        fn find_free_device(&self) -> Result<String, LoopError> {
            match self.free {
                Some(n) => Ok(format!("/dev/loop{n}")),
                None => Err(LoopError::DeviceExhausted(io::Error::from_raw_os_error(
                    libc::ENODEV,
                ))),
            }
        }
        fn bind_file(&self, device: &str, file: &str, read_only: bool) -> Result<(), LoopError> {
            if self.refuse_bind {
                return Err(LoopError::BindFailed {
                    device: device.to_string(),
                    file: file.to_string(),
                    source: io::Error::from_raw_os_error(libc::EBUSY),
                });
            }
            self.bound
                .borrow_mut()
                .push((device.to_string(), file.to_string(), read_only));
            Ok(())
        }
        fn detach(&self, _device: &str) -> Result<(), LoopError> {
            Ok(())
        }
    }

    #[test]
    fn provision_binds_free_device() {
        let fake = FakeLoop {
            free: Some(7),
            refuse_bind: false,
            bound: RefCell::new(Vec::new()),
        };
        let device = provision(&fake, "/images/disk.img", true).unwrap();
        assert_eq!(device, "/dev/loop7");
        assert_eq!(
            fake.bound.borrow().as_slice(),
            &[("/dev/loop7".to_string(), "/images/disk.img".to_string(), true)]
        );
    }
    #[test]
    fn provision_exhausted() {
        let fake = FakeLoop {
            free: None,
            refuse_bind: false,
            bound: RefCell::new(Vec::new()),
        };
        let err = provision(&fake, "/images/disk.img", false).unwrap_err();
        assert!(matches!(err, LoopError::DeviceExhausted(_)));
        assert!(fake.bound.borrow().is_empty());
    }
    #[test]
    fn provision_bind_failed() {
        let fake = FakeLoop {
            free: Some(0),
            refuse_bind: true,
            bound: RefCell::new(Vec::new()),
        };
        let err = provision(&fake, "/images/disk.img", false).unwrap_err();
        assert!(matches!(err, LoopError::BindFailed { ref device, .. } if device == "/dev/loop0"));
    }
    #[test]
    fn bind_missing_backing_file() {
        let err = SysLoopControl
            .bind_file("/dev/loop0", "/tmp/mount_loop_missing/disk.img", true)
            .unwrap_err();
        match err {
            LoopError::BindFailed { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
