//! Attach-document form: a link URL or a local file to upload.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::{Throbber, ThrobberState};

use rackbook_core::{DocumentKind, ObjectId};

use crate::action::Action;
use crate::component::Component;
use crate::modals::{centered_rect, render_input_field, render_panel};
use crate::theme;

const FIELD_TITLE: usize = 0;
const FIELD_KIND: usize = 1;
const FIELD_LOCATION: usize = 2;
const FIELD_COUNT: usize = 3;

pub struct UploadModal {
    object_id: ObjectId,
    title: String,
    kind: DocumentKind,
    url: String,
    path: String,
    field: usize,
    busy: bool,
    error: Option<String>,
    throbber: ThrobberState,
}

impl UploadModal {
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            title: String::new(),
            kind: DocumentKind::Link,
            url: String::new(),
            path: String::new(),
            field: FIELD_TITLE,
            busy: false,
            error: None,
            throbber: ThrobberState::default(),
        }
    }

    fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            DocumentKind::Link => DocumentKind::File,
            DocumentKind::File => DocumentKind::Link,
        };
    }

    fn active_text_field(&mut self) -> Option<&mut String> {
        match self.field {
            FIELD_TITLE => Some(&mut self.title),
            FIELD_LOCATION => match self.kind {
                DocumentKind::Link => Some(&mut self.url),
                DocumentKind::File => Some(&mut self.path),
            },
            _ => None,
        }
    }

    fn submit(&mut self) -> Option<Action> {
        let title = self.title.trim();
        if title.is_empty() {
            self.error = Some("Title is required".to_string());
            return None;
        }
        let (url, path) = match self.kind {
            DocumentKind::Link => {
                let url = self.url.trim();
                if url.is_empty() {
                    self.error = Some("URL is required for a link".to_string());
                    return None;
                }
                (Some(url.to_string()), None)
            }
            DocumentKind::File => {
                let path = self.path.trim();
                if path.is_empty() {
                    self.error = Some("File path is required".to_string());
                    return None;
                }
                (None, Some(path.to_string()))
            }
        };
        self.busy = true;
        Some(Action::SubmitUpload {
            object_id: self.object_id,
            title: title.to_string(),
            kind: self.kind,
            url,
            path,
        })
    }
}

impl Component for UploadModal {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::CloseModal));
        }
        if self.busy {
            return Ok(None);
        }
        if key.code != KeyCode::Enter {
            self.error = None;
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.field = (self.field + 1) % FIELD_COUNT;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = (self.field + FIELD_COUNT - 1) % FIELD_COUNT;
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.field == FIELD_KIND =>
            {
                self.toggle_kind();
                None
            }
            KeyCode::Backspace => {
                if let Some(text) = self.active_text_field() {
                    text.pop();
                }
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(text) = self.active_text_field() {
                    text.push(c);
                }
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // Keep the form; the toast explains what went wrong.
            Action::DocumentUploadFailed(_) => self.busy = false,
            Action::Tick if self.busy => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(area, 52, 17);
        let inner = render_panel(frame, panel, "Add document");

        render_input_field(
            frame,
            Rect { height: 4, ..inner },
            "Title",
            &self.title,
            self.field == FIELD_TITLE,
            false,
        );

        let (link_mark, file_mark) = match self.kind {
            DocumentKind::Link => ("◉", "○"),
            DocumentKind::File => ("○", "◉"),
        };
        let kind_style = if self.field == FIELD_KIND {
            Style::default().fg(theme::SKY_CYAN)
        } else {
            Style::default().fg(theme::FOG_WHITE)
        };
        let kind_line = Line::from(vec![
            Span::styled("Kind  ", kind_style),
            Span::styled(format!("{link_mark} link"), kind_style),
            Span::raw("   "),
            Span::styled(format!("{file_mark} file"), kind_style),
        ]);
        let kind_area = Rect {
            y: inner.y + 4,
            height: 1,
            ..inner
        };
        frame.render_widget(Paragraph::new(kind_line), kind_area);

        let (label, value) = match self.kind {
            DocumentKind::Link => ("URL", &self.url),
            DocumentKind::File => ("File path", &self.path),
        };
        render_input_field(
            frame,
            Rect {
                y: inner.y + 6,
                height: 4,
                ..inner
            },
            label,
            value,
            self.field == FIELD_LOCATION,
            false,
        );

        let status_area = Rect {
            y: inner.y + 11,
            height: 1,
            ..inner
        };
        if self.busy {
            let throbber = Throbber::default()
                .label("Uploading…")
                .style(Style::default().fg(theme::SKY_CYAN));
            frame.render_stateful_widget(throbber, status_area, &mut self.throbber.clone());
        } else if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    error.clone(),
                    Style::default().fg(theme::ALERT_RED),
                )),
                status_area,
            );
        }

        let hints = Line::from(vec![
            Span::styled("tab", theme::key_hint_key()),
            Span::styled(" field  ", theme::key_hint()),
            Span::styled("space", theme::key_hint_key()),
            Span::styled(" kind  ", theme::key_hint()),
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" add  ", theme::key_hint()),
            Span::styled("esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]);
        let hint_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(Paragraph::new(hints), hint_area);
    }

    fn id(&self) -> &str {
        "upload"
    }
}
