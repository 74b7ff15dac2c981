/// Proof that a piece of delayed work was scheduled at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Cancellation token source for debounced work.
///
/// Every `schedule` supersedes the previous tickets, so only the latest
/// scheduled work (and the response it triggers) is allowed to land. The
/// owner calls `cancel` on teardown so nothing calls back into a view that no
/// longer exists.
#[derive(Debug, Default)]
pub struct DebounceGate {
    generation: u64,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self) -> DebounceTicket {
        self.generation += 1;
        DebounceTicket(self.generation)
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: DebounceTicket) -> bool {
        ticket.0 == self.generation
    }
}
