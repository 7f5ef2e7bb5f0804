//! Terminal setup and restoration

use ratatui::DefaultTerminal;

/// Install a panic hook that restores the terminal before the report is printed
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Enter the alternate screen in raw mode
pub fn init() -> DefaultTerminal {
    install_panic_hook();
    ratatui::init()
}

pub fn restore() {
    ratatui::restore();
}
