//! TUI runner: owns the terminal and drives the engine's update loop

use svcdbg_app::Engine;
use svcdbg_core::prelude::*;
use svcdbg_gateway::GatewayApi;

use crate::{event, render, terminal};

/// Run the TUI until the app quits, then restore the terminal and stop the
/// engine's background tasks.
///
/// Must run on a multi-threaded tokio runtime: terminal polling blocks the
/// current worker while gateway calls complete on the others.
pub async fn run<G>(mut engine: Engine<G>) -> Result<()>
where
    G: GatewayApi + Sync + 'static,
{
    let mut term = terminal::init();
    info!("Terminal UI started");

    let result = run_loop(&mut term, &mut engine);

    terminal::restore();
    engine.shutdown();
    info!("Terminal UI stopped");

    result
}

/// Main event loop
fn run_loop<G>(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine<G>) -> Result<()>
where
    G: GatewayApi + Sync + 'static,
{
    while !engine.should_quit() {
        // Gateway results, timers, signals
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    Ok(())
}
