//! Modal dialogs: sign-in, page editor, document upload.
//!
//! At most one modal is open at a time; while open it captures all input
//! except Ctrl+C. Local validation problems render inline; server failures
//! arrive back as actions that clear the busy state and leave every field
//! untouched.

pub mod editor;
pub mod login;
pub mod upload;

pub use editor::EditorModal;
pub use login::LoginModal;
pub use upload::UploadModal;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::component::Component;
use crate::theme;

/// The currently open modal.
pub enum Modal {
    Login(LoginModal),
    Editor(EditorModal),
    Upload(UploadModal),
}

impl Modal {
    pub fn component(&self) -> &dyn Component {
        match self {
            Self::Login(m) => m,
            Self::Editor(m) => m,
            Self::Upload(m) => m,
        }
    }

    pub fn component_mut(&mut self) -> &mut dyn Component {
        match self {
            Self::Login(m) => m,
            Self::Editor(m) => m,
            Self::Upload(m) => m,
        }
    }
}

/// Center a `width` x `height` box inside `area`, clamped to fit.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Clear the backdrop and draw the modal frame. Returns the inner area.
pub(crate) fn render_panel(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), theme::title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// A labeled one-line input box. Takes a 4-row area: label + bordered box.
/// Masked fields render dots; the active field shows a block cursor.
pub(crate) fn render_input_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    masked: bool,
) {
    if area.height < 4 {
        return;
    }
    let label_style = if active {
        Style::default().fg(theme::SKY_CYAN)
    } else {
        theme::meta_text()
    };
    let label_area = Rect { height: 1, ..area };
    frame.render_widget(Paragraph::new(Line::styled(label.to_string(), label_style)), label_area);

    let box_area = Rect {
        y: area.y + 1,
        height: 3,
        ..area
    };
    let border_style = if active {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let box_inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let mut display = if masked {
        "\u{25cf}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if active {
        display.push('\u{2588}');
    }
    frame.render_widget(
        Paragraph::new(Line::styled(
            display,
            Style::default().fg(theme::FOG_WHITE),
        )),
        box_inner,
    );
}
