//! Engine - orchestration state shared by the TUI runner and tests
//!
//! The Engine owns the TEA state, the message channel, the gateway client, the
//! notification timers and the shutdown signal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use svcdbg_gateway::GatewayApi;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::actions::TimerMap;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;

/// Orchestration engine for the service debugger.
///
/// Must be created inside a tokio runtime: construction spawns the signal
/// handler and the catalog refresh ticker.
pub struct Engine<G> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    gateway: Arc<G>,

    timers: TimerMap,
}

impl<G> Engine<G>
where
    G: GatewayApi + Sync + 'static,
{
    /// Create an engine around a prepared state.
    ///
    /// - Creates message channel (capacity 256)
    /// - Creates shutdown signal channel
    /// - Spawns signal handler
    /// - Spawns the catalog refresh ticker when enabled
    /// - Queues the first catalog listing
    pub fn new(state: AppState, gateway: Arc<G>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        signals::spawn_signal_handler(msg_tx.clone());

        if let Some(period) = state.settings.gateway.catalog_refresh() {
            spawn_catalog_refresh(period, msg_tx.clone(), shutdown_rx.clone());
        }

        let _ = msg_tx.try_send(Message::RefreshCatalog);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            gateway,
            timers: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.gateway,
            &self.msg_tx,
            &self.timers,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. Used by the TUI runner
    /// which needs to drain all pending messages before rendering.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Number of notification timers still tracked
    pub fn pending_timers(&self) -> usize {
        self.timers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Stop background tasks and abort pending notification timers.
    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);

        let timers: Vec<_> = {
            let mut map = self.timers.lock().unwrap_or_else(|e| e.into_inner());
            map.drain().collect()
        };
        for (_, handle) in timers {
            handle.abort();
        }
        info!("Engine shut down");
    }
}

/// Re-list the catalog every `period` until shutdown
fn spawn_catalog_refresh(
    period: Duration,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; the initial listing is queued separately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if msg_tx.send(Message::RefreshCatalog).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    debug!("Catalog refresh stopped");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::history::QueryStore;
    use svcdbg_core::NetworkFailure;
    use svcdbg_gateway::test_utils::{test_catalog, ScriptedGateway};

    fn engine(gateway: ScriptedGateway) -> Engine<ScriptedGateway> {
        let mut settings = Settings::default();
        settings.gateway.catalog_refresh_ms = 0;
        let state = AppState::with_settings(
            settings,
            QueryStore::in_memory(Some(10)),
            QueryStore::in_memory(None),
        );
        Engine::new(state, Arc::new(gateway))
    }

    /// Process channel messages until `done` holds or a second passes
    async fn pump(engine: &mut Engine<ScriptedGateway>, done: impl Fn(&AppState) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while !done(&engine.state) {
            let msg = tokio::time::timeout_at(deadline, engine.msg_rx.recv())
                .await
                .expect("condition not reached")
                .expect("channel closed");
            engine.process_message(msg);
        }
    }

    #[tokio::test]
    async fn test_engine_lists_catalog_on_start() {
        let mut engine = engine(ScriptedGateway::new().with_services(&["users", "orders"]));
        pump(&mut engine, |s| s.catalog.loaded).await;
        assert_eq!(engine.state.catalog.modules, vec!["users", "orders"]);
    }

    #[tokio::test]
    async fn test_open_module_round_trip() {
        let gateway = ScriptedGateway::new()
            .with_services(&["users"])
            .with_catalog("", test_catalog("Svc", "a", &["Get"]));
        let mut engine = engine(gateway);
        engine.process_message(Message::OpenModule {
            module: "users".into(),
        });
        pump(&mut engine, |s| {
            s.tabs.selected().is_some_and(|t| t.methods.len() == 1)
        })
        .await;
        assert_eq!(engine.state.tabs.selected().unwrap().service.as_deref(), Some("Svc"));
    }

    #[tokio::test]
    async fn test_expired_notification_releases_its_timer() {
        let mut settings = Settings::default();
        settings.gateway.catalog_refresh_ms = 0;
        settings.notifications.expire_ms = 1;
        let state = AppState::with_settings(
            settings,
            QueryStore::in_memory(Some(10)),
            QueryStore::in_memory(None),
        );
        let mut engine = Engine::new(state, Arc::new(ScriptedGateway::new()));

        engine.process_message(Message::CatalogFailed {
            failure: NetworkFailure {
                url: "http://gateway/api/service/list".into(),
                status: Some(500),
                status_text: "Internal Server Error".into(),
                body: String::new(),
            },
        });
        assert_eq!(engine.state.notifications.len(), 1);

        pump(&mut engine, |s| s.notifications.is_empty()).await;
        assert_eq!(engine.pending_timers(), 0);
    }

    #[tokio::test]
    async fn test_quit_message() {
        let mut engine = engine(ScriptedGateway::new());
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
        engine.shutdown();
        assert_eq!(engine.pending_timers(), 0);
    }
}
