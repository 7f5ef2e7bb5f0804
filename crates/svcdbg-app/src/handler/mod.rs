//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes
//! - `navigator`: Catalog listing, filter and history/saved entries
//! - `session`: Tabs, selection and gateway responses
//! - `editor`: Request editor and text view
//! - `notifications`: Notification queue and login prompt

pub(crate) mod editor;
pub(crate) mod keys;
pub(crate) mod navigator;
pub(crate) mod notifications;
pub(crate) mod session;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use svcdbg_core::Value;
use svcdbg_gateway::CallTarget;

use crate::message::Message;
use crate::notifications::TimerCommand;
use crate::session::{ListRequest, TabId, Ticket};

// Re-export main entry point
pub use session::METHOD_HEADER_ROWS;
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// List every module known to the gateway
    ListServices,

    /// List services, instances and methods for a tab
    ListMethods { tab_id: TabId, request: ListRequest },

    /// Fetch the schema of the tab's selected method
    DescribeMethod {
        tab_id: TabId,
        ticket: Ticket,
        target: CallTarget,
    },

    /// Send a request; the task measures client-side time around the call
    Invoke {
        tab_id: TabId,
        ticket: Ticket,
        target: CallTarget,
        body: Value,
    },

    /// Exchange credentials for a gateway token
    Login { username: String, password: String },

    /// Start or cancel a notification expiry timer
    Timer(TimerCommand),

    /// Several of the above, performed in order
    Batch(Vec<UpdateAction>),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Zero or more actions; more than one becomes a `Batch`.
    pub fn actions(mut actions: Vec<UpdateAction>) -> Self {
        match actions.len() {
            0 => Self::none(),
            1 => Self::action(actions.remove(0)),
            _ => Self::action(UpdateAction::Batch(actions)),
        }
    }

    /// Timer command from a notification queue operation, if any
    pub fn timer(command: Option<TimerCommand>) -> Self {
        command.map_or_else(Self::none, |c| Self::action(UpdateAction::Timer(c)))
    }
}
