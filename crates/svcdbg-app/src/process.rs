//! Message processing: runs the TEA update loop and dispatches actions

use std::sync::Arc;

use svcdbg_gateway::GatewayApi;
use tokio::sync::mpsc;

use crate::actions::{handle_action, TimerMap};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<G>(
    state: &mut AppState,
    message: Message,
    gateway: &Arc<G>,
    msg_tx: &mpsc::Sender<Message>,
    timers: &TimerMap,
) where
    G: GatewayApi + Sync + 'static,
{
    // Process message through TEA update loop
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, gateway, msg_tx, timers);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
