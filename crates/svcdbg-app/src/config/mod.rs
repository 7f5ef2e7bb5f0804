//! Configuration file handling for the service debugger
//!
//! Settings live in `<config_dir>/svcdbg/config.toml` unless a directory is given
//! on the command line.

pub mod settings;
pub mod types;

pub use settings::{default_config_dir, init_config_dir, load_settings, save_settings};
pub use types::*;
