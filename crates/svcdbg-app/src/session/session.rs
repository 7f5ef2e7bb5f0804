//! Invocation session: catalog, method selection, request editing and results
//! for one open tab.

use std::sync::Arc;

use svcdbg_core::prelude::*;
use svcdbg_core::{validate, MethodCatalog, RpcInfo, Value};
use svcdbg_gateway::{CallTarget, InvokeResponse};

use super::{next_tab_id, NetworkStep, TabId, Ticket};
use crate::request_editor::RequestEditor;

/// Where the session is in the list → describe → invoke flow.
///
/// Derived from what is pending and what is installed, so it can never disagree
/// with the loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    ListingServices,
    AwaitingSelection,
    DescribingMethod,
    Editing,
    Invoking,
    Result,
    /// The first listing failed; nothing stable to fall back to
    Error,
}

/// Client-measured and server-reported durations of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTripCost {
    pub client_ms: u64,
    pub server_ms: u64,
}

/// Request to restore into a new tab (from history or saved queries)
#[derive(Debug, Clone, PartialEq)]
pub struct InitialRequest {
    pub service: Option<String>,
    pub instance: Option<String>,
    pub method: String,
    pub body: Value,
}

/// Parameters of a `list_methods` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub ticket: Ticket,
    pub module: String,
    pub service: Option<String>,
    pub instance: Option<String>,
}

#[derive(Debug)]
pub struct InvocationSession {
    /// Unique tab identifier
    pub id: TabId,

    /// Module (catalog entry) this tab was opened for
    pub module: String,

    // ─────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────
    pub services: Vec<String>,
    pub service: Option<String>,
    pub instances: Vec<String>,
    pub instance: Option<String>,
    pub methods: Vec<String>,
    pub method: Option<String>,

    /// Cursor in the methods pane (service row, instance row, then methods)
    pub method_cursor: usize,

    // ─────────────────────────────────────────────────────────
    // Request / Response
    // ─────────────────────────────────────────────────────────
    rpc_info: Option<Arc<RpcInfo>>,
    editor: Option<RequestEditor>,
    result: Option<Value>,
    cost: Option<RoundTripCost>,
    initial: Option<InitialRequest>,

    /// Scroll offset of the response view
    pub result_scroll: usize,

    // ─────────────────────────────────────────────────────────
    // Network steps
    // ─────────────────────────────────────────────────────────
    generation: u64,
    next_seq: u64,
    pending_list: Option<Ticket>,
    pending_describe: Option<(Ticket, String)>,
    pending_invoke: Option<Ticket>,
    listed: bool,

    /// Summary of the last failed step, cleared by the next success
    pub last_error: Option<String>,
}

impl InvocationSession {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            id: next_tab_id(),
            module: module.into(),
            services: Vec::new(),
            service: None,
            instances: Vec::new(),
            instance: None,
            methods: Vec::new(),
            method: None,
            method_cursor: 0,
            rpc_info: None,
            editor: None,
            result: None,
            cost: None,
            initial: None,
            result_scroll: 0,
            generation: 0,
            next_seq: 0,
            pending_list: None,
            pending_describe: None,
            pending_invoke: None,
            listed: false,
            last_error: None,
        }
    }

    /// Session that restores `initial` once its method has been described.
    pub fn with_initial(mut self, initial: InitialRequest) -> Self {
        self.service = initial.service.clone();
        self.instance = initial.instance.clone();
        self.initial = Some(initial);
        self
    }

    // ─────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        if self.pending_invoke.is_some() {
            SessionPhase::Invoking
        } else if self.pending_describe.is_some() {
            SessionPhase::DescribingMethod
        } else if self.pending_list.is_some() {
            SessionPhase::ListingServices
        } else if self.editor.is_some() {
            if self.result.is_some() {
                SessionPhase::Result
            } else {
                SessionPhase::Editing
            }
        } else if self.listed {
            SessionPhase::AwaitingSelection
        } else if self.last_error.is_some() {
            SessionPhase::Error
        } else {
            SessionPhase::Idle
        }
    }

    /// Set while any network step is in flight. Observational only.
    pub fn is_loading(&self) -> bool {
        self.pending_list.is_some() || self.pending_describe.is_some() || self.pending_invoke.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rpc_info(&self) -> Option<&RpcInfo> {
        self.rpc_info.as_deref()
    }

    pub fn editor(&self) -> Option<&RequestEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut RequestEditor> {
        self.editor.as_mut()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn cost(&self) -> Option<RoundTripCost> {
        self.cost
    }

    /// Method of a pending restore that the current catalog offers and that has not
    /// been selected yet.
    pub fn initial_method(&self) -> Option<&str> {
        let initial = self.initial.as_ref()?;
        (self.method.is_none() && self.methods.contains(&initial.method))
            .then_some(initial.method.as_str())
    }

    /// Selected method whose describe was superseded by a newer listing, e.g. an
    /// instance change while describing. It needs describing again once listed.
    pub fn undescribed_method(&self) -> Option<&str> {
        if self.editor.is_some() || self.pending_describe.is_some() || self.pending_list.is_some() {
            return None;
        }
        self.method.as_deref()
    }

    pub fn call_target(&self) -> Option<CallTarget> {
        Some(CallTarget::new(
            self.module.clone(),
            self.service.clone()?,
            self.instance.clone()?,
            self.method.clone()?,
        ))
    }

    /// Tab title
    pub fn title(&self) -> String {
        self.module.clone()
    }

    /// `.service.method` of the selected method
    pub fn caption(&self) -> Option<String> {
        self.call_target().map(|t| t.caption())
    }

    // ─────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────

    fn issue(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            generation: self.generation,
            seq: self.next_seq,
        }
    }

    /// New selection generation. Everything still in flight becomes stale.
    fn begin_listing(&mut self) -> ListRequest {
        self.generation += 1;
        self.pending_describe = None;
        self.pending_invoke = None;
        let ticket = self.issue();
        self.pending_list = Some(ticket);
        debug!(
            "Tab {} listing {} (generation {})",
            self.id, self.module, self.generation
        );
        ListRequest {
            ticket,
            module: self.module.clone(),
            service: self.service.clone(),
            instance: self.instance.clone(),
        }
    }

    /// (Re)load the catalog for the current selection.
    pub fn open(&mut self) -> ListRequest {
        self.begin_listing()
    }

    /// A new service invalidates its instances, the method, schema and request.
    pub fn select_service(&mut self, service: impl Into<String>) -> ListRequest {
        self.service = Some(service.into());
        self.instance = None;
        self.clear_method();
        self.begin_listing()
    }

    /// Same service on another instance keeps the method and request.
    pub fn select_instance(&mut self, instance: impl Into<String>) -> ListRequest {
        self.instance = Some(instance.into());
        self.begin_listing()
    }

    fn clear_method(&mut self) {
        self.method = None;
        self.rpc_info = None;
        self.editor = None;
        self.result = None;
        self.cost = None;
        self.result_scroll = 0;
    }

    pub fn apply_catalog(&mut self, ticket: Ticket, catalog: MethodCatalog) -> bool {
        if self.pending_list != Some(ticket) {
            debug!("Tab {} dropping stale catalog {:?}", self.id, ticket);
            return false;
        }
        self.pending_list = None;
        self.listed = true;
        self.last_error = None;

        self.services = catalog.services;
        self.service = non_empty(catalog.service).or_else(|| self.services.first().cloned());
        self.instances = catalog.instances;
        self.instance = non_empty(catalog.instance).or_else(|| self.instances.first().cloned());
        self.methods = catalog.rpcs;

        let method_gone = self
            .method
            .as_ref()
            .is_some_and(|m| !self.methods.contains(m));
        if method_gone {
            self.clear_method();
        }
        true
    }

    /// Start describing `method`. `None` when no service/instance is selected yet.
    pub fn select_method(&mut self, method: impl Into<String>) -> Option<(Ticket, CallTarget)> {
        let method = method.into();
        self.clear_method();
        self.method = Some(method.clone());
        let target = self.call_target()?;
        let ticket = self.issue();
        self.pending_describe = Some((ticket, method));
        Some((ticket, target))
    }

    pub fn apply_rpc_info(&mut self, ticket: Ticket, info: RpcInfo) -> bool {
        match &self.pending_describe {
            Some((pending, method)) if *pending == ticket && self.method.as_ref() == Some(method) => {}
            _ => {
                debug!("Tab {} dropping stale describe {:?}", self.id, ticket);
                return false;
            }
        }
        self.pending_describe = None;
        self.last_error = None;

        let info = Arc::new(info);
        let registry = Arc::new(info.relate_schema.clone());
        let mut editor = RequestEditor::new(registry, info.request_typename.clone());

        let restore = self
            .initial
            .take_if(|initial| self.method.as_deref() == Some(initial.method.as_str()));
        if let Some(initial) = restore {
            match validate::conform(editor.registry(), editor.root_type(), &initial.body) {
                Ok(()) => editor.set_value(initial.body),
                Err(e) => warn!("Discarding restored request for {}: {}", initial.method, e),
            }
        }

        self.rpc_info = Some(info);
        self.editor = Some(editor);
        true
    }

    /// Start invoking with the current request. `None` unless a method has been
    /// described and a target is complete.
    pub fn begin_invoke(&mut self) -> Option<(Ticket, CallTarget, Value)> {
        let target = self.call_target()?;
        let body = self.editor.as_ref()?.value().clone();
        let ticket = self.issue();
        self.pending_invoke = Some(ticket);
        Some((ticket, target, body))
    }

    pub fn apply_invoke(&mut self, ticket: Ticket, response: InvokeResponse, client_ms: u64) -> bool {
        if self.pending_invoke != Some(ticket) {
            debug!("Tab {} dropping stale invoke result {:?}", self.id, ticket);
            return false;
        }
        self.pending_invoke = None;
        self.last_error = None;
        self.result = Some(response.data);
        self.cost = Some(RoundTripCost {
            client_ms,
            server_ms: response.server_cost_ms,
        });
        self.result_scroll = 0;
        true
    }

    /// Clear a failed step. The phase falls back to whatever is still installed.
    pub fn fail(&mut self, step: NetworkStep, ticket: Ticket, summary: impl Into<String>) -> bool {
        let matched = match step {
            NetworkStep::ListMethods => take_if_eq(&mut self.pending_list, ticket),
            NetworkStep::DescribeMethod => {
                if self.pending_describe.as_ref().map(|(t, _)| *t) == Some(ticket) {
                    self.pending_describe = None;
                    self.method = None;
                    true
                } else {
                    false
                }
            }
            NetworkStep::Invoke => take_if_eq(&mut self.pending_invoke, ticket),
        };
        if matched {
            self.last_error = Some(summary.into());
        } else {
            debug!("Tab {} dropping stale failure {:?}", self.id, ticket);
        }
        matched
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn take_if_eq(slot: &mut Option<Ticket>, ticket: Ticket) -> bool {
    if *slot == Some(ticket) {
        *slot = None;
        true
    } else {
        false
    }
}
