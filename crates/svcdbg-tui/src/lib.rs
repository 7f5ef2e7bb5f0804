//! # svcdbg-tui - Terminal UI
//!
//! ratatui/crossterm front end for the service debugger. Presentation only:
//! every state change goes through [`svcdbg_app::handler::update`] via the
//! [`svcdbg_app::Engine`].
//!
//! ## Public API
//!
//! - [`run()`] - Take over the terminal and run an engine until quit
//! - [`render::view()`] - Draw one frame from an [`svcdbg_app::AppState`]
//! - [`event::key_event_to_input()`] - crossterm key → [`svcdbg_app::InputKey`]

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

pub use runner::run;
