//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use svcdbg_app::SessionPhase;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Keybinding hint style ---
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Selection styles ---

/// "Black on Cyan" - the cursor row of the focused pane
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Cursor row of a pane without focus
pub fn unfocused_selected() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .bg(palette::POPUP_BG)
}

pub fn selection(focused: bool) -> Style {
    if focused {
        focused_selected()
    } else {
        unfocused_selected()
    }
}

/// Text being typed into an inline input
pub fn input_field() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .bg(palette::INPUT_BG)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::CARD_BG))
}

// --- Phase indicator mapping ---

/// Phase indicator for tabs and the status bar.
///
/// Returns `(icon_char, label, Style)` for the given session phase.
pub fn phase_indicator(phase: SessionPhase) -> (&'static str, &'static str, Style) {
    match phase {
        SessionPhase::Idle => ("○", "Idle", text_muted()),
        SessionPhase::ListingServices => ("↻", "Listing", status_yellow()),
        SessionPhase::AwaitingSelection => ("○", "Select a method", text_secondary()),
        SessionPhase::DescribingMethod => ("↻", "Describing", status_yellow()),
        SessionPhase::Editing => ("●", "Editing", accent()),
        SessionPhase::Invoking => (
            "↻",
            "Invoking",
            status_yellow().add_modifier(Modifier::BOLD),
        ),
        SessionPhase::Result => (
            "●",
            "Result",
            status_green().add_modifier(Modifier::BOLD),
        ),
        SessionPhase::Error => ("✗", "Error", status_red()),
    }
}
