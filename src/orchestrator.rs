use clap::ValueEnum;

use crate::error::MountCliError;
use crate::logger::{EventType, Logger};
use crate::loop_device::{self, LoopControl};
use crate::mounter::Mounter;
use crate::nfs;
use crate::options::{self, Translation};
use crate::registry::FilesystemRegistry;


/// What to do with a loop device bound for a mount that then fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoopCleanup {
    /// Leave the binding in place for inspection.
    #[default]
    Keep,
    /// Detach the loop device again.
    Detach,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    pub device: String,
    pub target: String,
    pub fstype: Option<String>,
    pub read_only: bool,
    pub options: Vec<String>,
}

pub struct Orchestrator<M, L> {
    mounter: M,
    loops: L,
    registry: FilesystemRegistry,
    logger: Logger,
    loop_cleanup: LoopCleanup,
}

impl<M: Mounter, L: LoopControl> Orchestrator<M, L> {
    pub fn new(
        mounter: M,
        loops: L,
        registry: FilesystemRegistry,
        logger: Logger,
        loop_cleanup: LoopCleanup,
    ) -> Self {
        Self {
            mounter,
            loops,
            registry,
            logger,
            loop_cleanup,
        }
    }

    pub fn run(&self, mut request: MountRequest) -> Result<(), MountCliError> {
        let fstype = match request.fstype.take() {
            Some(fstype) if !fstype.is_empty() => fstype,
            _ => return Err(MountCliError::MissingFsType),
        };

        let Translation {
            flags,
            mut data,
            loop_requested,
        } = options::translate(request.options.as_slice(), request.read_only);

        let mut bound_loop = None;
        if loop_requested {
            let device = loop_device::provision(&self.loops, &request.device, request.read_only)?;
            self.logger.log(
                EventType::LoopAttached,
                &format!("{} on {device}", request.device),
            );
            request.device = device.clone();
            bound_loop = Some(device);
        }

        nfs::augment(&fstype, &request.device, &mut data);

        let data = data.join(",");
        log::debug!(
            "mount({}, {}, {fstype}, {data:?}, {flags:#x})",
            request.device,
            request.target
        );
        if let Err(error) =
            self.mounter
                .mount(&request.device, &request.target, &fstype, &data, flags)
        {
            self.logger.log(
                EventType::MountFailed,
                &format!("{} on {}: {error}", request.device, request.target),
            );
            if let Some(device) = bound_loop {
                self.release_loop(&device);
            }
            return Err(MountCliError::Mount {
                device: request.device,
                target: request.target,
                fstype,
                error,
            });
        }
        self.logger.log(
            EventType::Mounted,
            &format!("{} on {} type {fstype}", request.device, request.target),
        );
        Ok(())
    }

    /// Hint printed after a failed mount when the kernel lacks `fstype`.
    pub fn hint(&self, fstype: &str) -> Option<String> {
        self.registry.hint(fstype)
    }

    /// Hint for a failed invocation. Only a rejected mount gets one.
    pub fn failure_hint(&self, err: &MountCliError) -> Option<String> {
        match err {
            MountCliError::Mount { fstype, .. } => self.hint(fstype),
            MountCliError::MissingFsType | MountCliError::Loop(_) => None,
        }
    }

    fn release_loop(&self, device: &str) {
        match self.loop_cleanup {
            LoopCleanup::Keep => log::info!("{device} left bound"),
            LoopCleanup::Detach => match self.loops.detach(device) {
                Ok(()) => self.logger.log(EventType::LoopDetached, device),
                Err(err) => log::warn!("{:#}", anyhow::Error::from(err)),
            },
        }
    }
}
