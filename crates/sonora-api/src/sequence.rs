use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    Translate,
    Library,
}

/// Handle of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub operation: Operation,
    pub sequence: u64,
}

/// Per-operation sequence numbers. Only the latest ticket of an operation is
/// current; responses carrying an older one are stale.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generate: AtomicU64,
    translate: AtomicU64,
    library: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, operation: Operation) -> &AtomicU64 {
        match operation {
            Operation::Generate => &self.generate,
            Operation::Translate => &self.translate,
            Operation::Library => &self.library,
        }
    }

    pub fn issue(&self, operation: Operation) -> RequestTicket {
        let sequence = self.counter(operation).fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Issued {operation:?} request #{sequence}");
        RequestTicket {
            operation,
            sequence,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.counter(ticket.operation).load(Ordering::SeqCst) == ticket.sequence
    }

    /// Sequence of the most recently issued request, 0 if none
    pub fn latest(&self, operation: Operation) -> u64 {
        self.counter(operation).load(Ordering::SeqCst)
    }
}
