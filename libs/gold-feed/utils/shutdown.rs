//! Cooperative stop signal for the polling loops.

use tokio::sync::watch;

/// Cloneable stop flag. The feed selects on it between timer ticks;
/// nothing in flight is aborted beyond the transport's own timeout.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Signals every loop holding a watcher to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// A receiver that resolves `changed()` once [`trigger`] is called.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
