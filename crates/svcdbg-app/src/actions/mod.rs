//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;
use std::sync::Arc;

use svcdbg_gateway::GatewayApi;
use tokio::sync::mpsc;
use tracing::trace;

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::notifications::{TimerCommand, TimerToken};

pub(crate) mod gateway;

/// Running notification expiry timers, keyed by token
pub type TimerMap = Arc<std::sync::Mutex<HashMap<TimerToken, tokio::task::JoinHandle<()>>>>;

/// Execute an action by spawning a background task
pub fn handle_action<G>(
    action: UpdateAction,
    gateway: &Arc<G>,
    msg_tx: &mpsc::Sender<Message>,
    timers: &TimerMap,
) where
    G: GatewayApi + Sync + 'static,
{
    match action {
        UpdateAction::ListServices => {
            gateway::spawn_list_services(gateway.clone(), msg_tx.clone());
        }

        UpdateAction::ListMethods { tab_id, request } => {
            gateway::spawn_list_methods(gateway.clone(), msg_tx.clone(), tab_id, request);
        }

        UpdateAction::DescribeMethod {
            tab_id,
            ticket,
            target,
        } => {
            gateway::spawn_describe_method(gateway.clone(), msg_tx.clone(), tab_id, ticket, target);
        }

        UpdateAction::Invoke {
            tab_id,
            ticket,
            target,
            body,
        } => {
            gateway::spawn_invoke(gateway.clone(), msg_tx.clone(), tab_id, ticket, target, body);
        }

        UpdateAction::Login { username, password } => {
            gateway::spawn_login(gateway.clone(), msg_tx.clone(), username, password);
        }

        UpdateAction::Timer(command) => run_timer_command(command, msg_tx, timers),

        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(action, gateway, msg_tx, timers);
            }
        }
    }
}

/// Start or abort one expiry timer
fn run_timer_command(command: TimerCommand, msg_tx: &mpsc::Sender<Message>, timers: &TimerMap) {
    let mut map = timers.lock().unwrap_or_else(|e| e.into_inner());
    match command {
        TimerCommand::Start { id, token, after } => {
            let tx = msg_tx.clone();
            let registry = Arc::clone(timers);
            let handle = tokio::spawn(async move {
                tokio::time::sleep(after).await;
                // Blocks until the spawning side has inserted this handle
                registry
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .remove(&token);
                let _ = tx.send(Message::NotificationTimerFired { id, token }).await;
            });
            if let Some(previous) = map.insert(token, handle) {
                previous.abort();
            }
        }
        TimerCommand::Cancel { token } => {
            if let Some(handle) = map.remove(&token) {
                trace!("Cancelled timer {:?}", token);
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationId;
    use std::time::Duration;
    use svcdbg_gateway::test_utils::ScriptedGateway;

    fn timers() -> TimerMap {
        Arc::new(std::sync::Mutex::new(HashMap::new()))
    }

    #[tokio::test]
    async fn test_timer_start_fires_message() {
        let (tx, mut rx) = mpsc::channel(4);
        let gateway = Arc::new(ScriptedGateway::new());
        let timers = timers();
        let command = TimerCommand::Start {
            id: NotificationId(7),
            token: TimerToken(70),
            after: Duration::from_millis(5),
        };

        handle_action(UpdateAction::Timer(command), &gateway, &tx, &timers);

        let msg = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timer did not fire");
        assert!(matches!(
            msg,
            Some(Message::NotificationTimerFired {
                id: NotificationId(7),
                token: TimerToken(70)
            })
        ));
        assert!(timers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fired_timers_leave_the_map() {
        let (tx, mut rx) = mpsc::channel(8);
        let gateway = Arc::new(ScriptedGateway::new());
        let timers = timers();
        for n in 0..5 {
            let command = TimerCommand::Start {
                id: NotificationId(n),
                token: TimerToken(100 + n),
                after: Duration::from_millis(1),
            };
            handle_action(UpdateAction::Timer(command), &gateway, &tx, &timers);
        }

        for _ in 0..5 {
            tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("timer did not fire");
        }
        assert!(timers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timer_cancel_aborts() {
        let (tx, mut rx) = mpsc::channel(4);
        let gateway = Arc::new(ScriptedGateway::new());
        let timers = timers();
        let token = TimerToken(71);

        handle_action(
            UpdateAction::Batch(vec![
                UpdateAction::Timer(TimerCommand::Start {
                    id: NotificationId(8),
                    token,
                    after: Duration::from_millis(20),
                }),
                UpdateAction::Timer(TimerCommand::Cancel { token }),
            ]),
            &gateway,
            &tx,
            &timers,
        );

        assert!(timers.lock().unwrap().is_empty());
        let fired = tokio::time::timeout(Duration::from_millis(60), rx.recv()).await;
        assert!(fired.is_err());
    }
}
