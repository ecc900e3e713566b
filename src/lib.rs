pub mod cli;
pub mod error;
pub mod logger;
pub mod loop_device;
pub mod mounter;
pub mod nfs;
pub mod options;
pub mod orchestrator;
pub mod registry;
