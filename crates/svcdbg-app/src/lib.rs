//! svcdbg-app - Application state and orchestration for the service debugger
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state management:
//! per-tab invocation sessions, the request editor, notifications, query history,
//! configuration loading and the Engine that runs gateway calls on background tasks.

pub mod actions;
pub mod config;
pub mod dual_view;
pub mod engine;
pub mod handler;
pub mod history;
pub mod input_key;
pub mod message;
pub mod notifications;
pub mod process;
pub mod request_editor;
pub mod session;
pub mod signals;
pub mod state;
pub mod tab_manager;
pub mod text_buffer;

// Re-export primary types
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use session::{InvocationSession, SessionPhase, TabId};
pub use state::AppState;
