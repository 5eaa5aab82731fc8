//! Color palette and shared styles for the Rackbook TUI.
//!
//! A muted slate scheme: steel blue accents for chrome, amber for warnings,
//! green/red for object health. Centralized here so screens never hardcode
//! colors.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ──────────────────────────────────────────────────────────

/// Primary accent — titles, selection markers, active elements.
pub const STEEL_BLUE: Color = Color::Rgb(0x5f, 0xaf, 0xff);
/// Secondary accent — labels, section names, links.
pub const SKY_CYAN: Color = Color::Rgb(0x66, 0xd9, 0xef);
/// Warnings and attention.
pub const AMBER: Color = Color::Rgb(0xe5, 0xc0, 0x7b);
/// Healthy / success.
pub const SIGNAL_GREEN: Color = Color::Rgb(0x98, 0xc3, 0x79);
/// Errors and failing objects.
pub const ALERT_RED: Color = Color::Rgb(0xe0, 0x6c, 0x75);
/// Editor cursor, markdown emphasis.
pub const VIOLET: Color = Color::Rgb(0xc6, 0x78, 0xdd);
/// Default foreground.
pub const FOG_WHITE: Color = Color::Rgb(0xab, 0xb2, 0xbf);
/// Unfocused borders, tree guides, secondary text.
pub const BORDER_GRAY: Color = Color::Rgb(0x5c, 0x63, 0x70);
/// Row highlight background.
pub const BG_HIGHLIGHT: Color = Color::Rgb(0x2c, 0x31, 0x3c);
/// Modal / overlay background.
pub const BG_DARK: Color = Color::Rgb(0x1e, 0x21, 0x27);

// ── Semantic styles ──────────────────────────────────────────────────

/// Pane and modal titles.
pub fn title_style() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

/// Border of the focused pane.
pub fn border_focused() -> Style {
    Style::default().fg(STEEL_BLUE)
}

/// Border of everything else.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Cursor row in the tree and in lists.
pub fn selected_row() -> Style {
    Style::default()
        .fg(STEEL_BLUE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Row matching the current route (the "open" object).
pub fn active_row() -> Style {
    Style::default().fg(SKY_CYAN).add_modifier(Modifier::BOLD)
}

/// Active section tab.
pub fn tab_active() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

/// Inactive section tabs.
pub fn tab_inactive() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Status bar base style.
pub fn status_bar() -> Style {
    Style::default().fg(FOG_WHITE).bg(BG_DARK)
}

/// Key hint description text ("quit", "filter", ...).
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key text ("q", "/", ...).
pub fn key_hint_key() -> Style {
    Style::default().fg(SKY_CYAN).add_modifier(Modifier::BOLD)
}

/// Secondary metadata (IPs, timestamps, counts).
pub fn meta_text() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Placeholder text for empty panels.
pub fn placeholder() -> Style {
    Style::default()
        .fg(BORDER_GRAY)
        .add_modifier(Modifier::ITALIC)
}
