use notify_rust::Notification;
use std::fmt;

pub struct Logger {
    appname: String,
    notification: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    LoopAttached,
    LoopDetached,
    Mounted,
    MountFailed,
}

impl Logger {
    pub fn new(appname: String, notification: bool) -> Self {
        Self {
            appname,
            notification,
        }
    }
    pub fn log(&self, event_type: EventType, message: &str) {
        match event_type {
            EventType::MountFailed => log::warn!("{event_type} {message}"),
            _ => log::info!("{event_type} {message}"),
        }
        if self.notification {
            let _ = Notification::new()
                .summary(&self.appname)
                .appname(&self.appname)
                .body(&format!("{event_type} {message}"))
                .timeout(0)
                .show();
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            EventType::LoopAttached => "LoopAttached",
            EventType::LoopDetached => "LoopDetached",
            EventType::Mounted => "Mounted",
            EventType::MountFailed => "MountFailed",
        };
        write!(f, "{}", s)
    }
}
