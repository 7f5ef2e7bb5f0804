//! Gateway calls run on spawned tasks; results come back as messages

use std::sync::Arc;
use std::time::Instant;

use svcdbg_core::prelude::*;
use svcdbg_core::Value;
use svcdbg_gateway::{CallTarget, GatewayApi};
use tokio::sync::mpsc;

use crate::message::Message;
use crate::session::{ListRequest, NetworkStep, TabId, Ticket};

pub(super) fn spawn_list_services<G>(gateway: Arc<G>, msg_tx: mpsc::Sender<Message>)
where
    G: GatewayApi + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match gateway.list_services().await {
            Ok(modules) => Message::CatalogLoaded { modules },
            Err(e) => {
                debug!("Module listing failed: {}", e);
                Message::CatalogFailed {
                    failure: e.network_failure(),
                }
            }
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_list_methods<G>(
    gateway: Arc<G>,
    msg_tx: mpsc::Sender<Message>,
    tab_id: TabId,
    request: ListRequest,
) where
    G: GatewayApi + Sync + 'static,
{
    tokio::spawn(async move {
        let result = gateway
            .list_methods(
                &request.module,
                request.service.as_deref(),
                request.instance.as_deref(),
            )
            .await;
        let msg = match result {
            Ok(catalog) => Message::MethodsListed {
                tab_id,
                ticket: request.ticket,
                catalog,
            },
            Err(e) => failed(tab_id, NetworkStep::ListMethods, request.ticket, &e),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_describe_method<G>(
    gateway: Arc<G>,
    msg_tx: mpsc::Sender<Message>,
    tab_id: TabId,
    ticket: Ticket,
    target: CallTarget,
) where
    G: GatewayApi + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match gateway.describe_method(&target).await {
            Ok(info) => Message::MethodDescribed {
                tab_id,
                ticket,
                info: Box::new(info),
            },
            Err(e) => failed(tab_id, NetworkStep::DescribeMethod, ticket, &e),
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Client time covers the whole round trip as seen from here.
pub(super) fn spawn_invoke<G>(
    gateway: Arc<G>,
    msg_tx: mpsc::Sender<Message>,
    tab_id: TabId,
    ticket: Ticket,
    target: CallTarget,
    body: Value,
) where
    G: GatewayApi + Sync + 'static,
{
    tokio::spawn(async move {
        let started = Instant::now();
        let result = gateway.invoke(&target, &body).await;
        let client_ms = started.elapsed().as_millis() as u64;
        let msg = match result {
            Ok(response) => Message::InvokeCompleted {
                tab_id,
                ticket,
                response,
                client_ms,
            },
            Err(e) => failed(tab_id, NetworkStep::Invoke, ticket, &e),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_login<G>(
    gateway: Arc<G>,
    msg_tx: mpsc::Sender<Message>,
    username: String,
    password: String,
) where
    G: GatewayApi + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match gateway.login(&username, &password).await {
            Ok(()) => Message::LoginSucceeded,
            Err(e) => Message::LoginFailed {
                message: e.network_failure().summary(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

fn failed(tab_id: TabId, step: NetworkStep, ticket: Ticket, error: &Error) -> Message {
    debug!("{:?} failed for tab {}: {}", step, tab_id, error);
    Message::RequestFailed {
        tab_id,
        step,
        ticket,
        failure: error.network_failure(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use svcdbg_gateway::test_utils::{test_catalog, test_rpc_info, ScriptedFailure, ScriptedGateway};

    use crate::session::InvocationSession;

    async fn recv(rx: &mut mpsc::Receiver<Message>) -> Message {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("no message")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_list_methods_answers_with_ticket() {
        let gateway = Arc::new(
            ScriptedGateway::new().with_catalog("", test_catalog("Svc", "a", &["Get"])),
        );
        let (tx, mut rx) = mpsc::channel(4);
        let mut session = InvocationSession::new("users");
        let request = session.open();
        let ticket = request.ticket;

        spawn_list_methods(gateway.clone(), tx, 1, request);

        match recv(&mut rx).await {
            Message::MethodsListed {
                tab_id,
                ticket: got,
                catalog,
            } => {
                assert_eq!(tab_id, 1);
                assert_eq!(got, ticket);
                assert_eq!(catalog.rpcs, vec!["Get".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(gateway.calls(), vec!["list_methods users//".to_string()]);
    }

    #[tokio::test]
    async fn test_describe_failure_carries_status() {
        let gateway = Arc::new(ScriptedGateway::new().with_rpc_info("Get", test_rpc_info("Get")));
        gateway.fail("describe_method", ScriptedFailure::Status(500));
        let (tx, mut rx) = mpsc::channel(4);
        let target = CallTarget::new("users", "Svc", "a", "Get");
        let ticket = Ticket {
            generation: 1,
            seq: 2,
        };

        spawn_describe_method(gateway, tx, 3, ticket, target);

        match recv(&mut rx).await {
            Message::RequestFailed {
                step, failure, ..
            } => {
                assert_eq!(step, NetworkStep::DescribeMethod);
                assert_eq!(failure.status, Some(500));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_sends_body_verbatim() {
        let gateway = Arc::new(
            ScriptedGateway::new().with_invoke_result(Value::from(serde_json::json!({"ok": 1})), 4),
        );
        let (tx, mut rx) = mpsc::channel(4);
        let body = Value::from(serde_json::json!({"age": 3}));
        let ticket = Ticket {
            generation: 0,
            seq: 1,
        };

        spawn_invoke(
            gateway.clone(),
            tx,
            1,
            ticket,
            CallTarget::new("users", "Svc", "a", "Get"),
            body.clone(),
        );

        match recv(&mut rx).await {
            Message::InvokeCompleted { response, .. } => assert_eq!(response.server_cost_ms, 4),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(gateway.invoked_bodies(), vec![body]);
    }

    #[tokio::test]
    async fn test_unauthorized_listing_reports_401() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.fail("list_services", ScriptedFailure::Unauthorized);
        let (tx, mut rx) = mpsc::channel(4);

        spawn_list_services(gateway, tx);

        match recv(&mut rx).await {
            Message::CatalogFailed { failure } => assert!(failure.is_auth_required()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.fail("login", ScriptedFailure::Status(403));
        let (tx, mut rx) = mpsc::channel(4);

        spawn_login(gateway, tx, "u".into(), "p".into());

        assert!(matches!(recv(&mut rx).await, Message::LoginFailed { .. }));
    }
}
