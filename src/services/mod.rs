//! Injectable notification and busy-indicator services

mod loading;
mod toast;

pub use loading::*;
pub use toast::*;

/// Fire-and-forget user notification capability.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: &str);
}

/// Advisory busy indicator, toggled while a submission is in flight.
pub trait BusyIndicator: Send + Sync {
    fn set_busy(&self, busy: bool);
}
