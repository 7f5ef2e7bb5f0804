//! Per-tab invocation sessions

#[allow(clippy::module_inception)]
mod session;


pub use session::{InitialRequest, InvocationSession, ListRequest, RoundTripCost, SessionPhase};

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a tab
pub type TabId = u64;

static TAB_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique tab ID
pub fn next_tab_id() -> TabId {
    TAB_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Tag attached to one network step of a session.
///
/// `generation` is the selection generation the step was issued under; `seq`
/// orders steps within the session. A response is applied only if its ticket is
/// still the one the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub seq: u64,
}

/// Which boundary call a ticket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStep {
    ListMethods,
    DescribeMethod,
    Invoke,
}
