//! Horizontal section tab bar for the object view.

use ratatui::text::{Line, Span};

use crate::theme;

/// Render tab labels as one line, the active one bracketed and highlighted.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        if i == active_index {
            spans.push(Span::styled(format!("[{label}]"), theme::tab_active()));
        } else {
            spans.push(Span::styled((*label).to_string(), theme::tab_inactive()));
        }
    }
    Line::from(spans)
}
