//! Object health indicator — glyph + color per status.

use ratatui::style::{Color, Style};
use ratatui::text::Span;

use rackbook_core::ObjectStatus;

use crate::theme;

pub fn status_color(status: ObjectStatus) -> Color {
    match status {
        ObjectStatus::Ok => theme::SIGNAL_GREEN,
        ObjectStatus::Warn => theme::AMBER,
        ObjectStatus::Bad => theme::ALERT_RED,
        ObjectStatus::Unknown => theme::BORDER_GRAY,
    }
}

pub fn status_glyph(status: ObjectStatus) -> &'static str {
    match status {
        ObjectStatus::Ok => "●",
        ObjectStatus::Warn => "◐",
        ObjectStatus::Bad => "✗",
        ObjectStatus::Unknown => "○",
    }
}

/// Styled status dot for tree rows and headers.
pub fn status_span(status: ObjectStatus) -> Span<'static> {
    Span::styled(
        status_glyph(status),
        Style::default().fg(status_color(status)),
    )
}

/// Status dot plus the textual status, for the object header.
pub fn status_badge(status: ObjectStatus) -> Vec<Span<'static>> {
    vec![
        status_span(status),
        Span::styled(
            format!(" {}", status.as_str()),
            Style::default().fg(status_color(status)),
        ),
    ]
}
