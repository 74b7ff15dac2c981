use gloo_timers::callback::Timeout;

/// Runs a callback once input has been quiet for `delay_ms`.
///
/// Rescheduling drops the pending `Timeout`, which clears the browser timer.
/// Whether the work is still wanted when it fires is for the caller to check
/// (see `common::editor::EditorSession`).
pub struct Debouncer {
    delay_ms: u32,
    pending: Option<Timeout>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.pending = Some(Timeout::new(self.delay_ms, callback));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
