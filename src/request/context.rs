use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::state::RequestState;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of one inbound request, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Explicit per-request context passed to every declaration and render
/// call. Dropping it drops everything stored for the request.
#[derive(Debug)]
pub struct RequestContext {
    id: RequestId,
    state: RequestState,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::with_id(RequestId::next())
    }

    /// Use an id assigned by the hosting framework.
    pub fn with_id(id: RequestId) -> Self {
        Self {
            id,
            state: RequestState::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RequestState {
        &mut self.state
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
