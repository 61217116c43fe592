/// Correlates backend completions with the request that is currently in flight
///
/// Every request gets the next generation number for its kind. A completion is
/// only accepted while its number is the one in flight; anything else is stale.

/// Kinds of backend request with independent generation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Transcript,
    Analysis,
    Generation,
}

impl RequestKind {
    fn index(self) -> usize {
        match self {
            Self::Transcript => 0,
            Self::Analysis => 1,
            Self::Generation => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcript => "transcript",
            Self::Analysis => "analysis",
            Self::Generation => "generation",
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    /// Last generation handed out per kind (monotonic, never reset)
    counters: [u64; 3],

    /// Generation currently awaited per kind
    in_flight: [Option<u64>; 3],
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request and return its generation
    pub fn begin(&mut self, kind: RequestKind) -> u64 {
        let slot = kind.index();
        self.counters[slot] += 1;
        self.in_flight[slot] = Some(self.counters[slot]);
        self.counters[slot]
    }

    /// Accept a completion if it belongs to the request in flight
    ///
    /// Returns false for stale generations; an accepted completion clears the slot.
    pub fn finish(&mut self, kind: RequestKind, generation: u64) -> bool {
        let slot = kind.index();
        if self.in_flight[slot] == Some(generation) {
            self.in_flight[slot] = None;
            true
        } else {
            false
        }
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.in_flight[kind.index()].is_some()
    }

    /// Forget every outstanding request; their completions become stale
    pub fn clear(&mut self) {
        self.in_flight = [None; 3];
    }
}
