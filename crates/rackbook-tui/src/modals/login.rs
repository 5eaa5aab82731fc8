//! Sign-in modal. Submits credentials, shows progress, and keeps the form
//! intact when the attempt fails.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::component::Component;
use crate::modals::{centered_rect, render_input_field, render_panel};
use crate::theme;

const FIELD_USERNAME: usize = 0;
const FIELD_PASSWORD: usize = 1;

pub struct LoginModal {
    username: String,
    password: String,
    field: usize,
    show_password: bool,
    busy: bool,
    error: Option<String>,
    throbber: ThrobberState,
}

impl LoginModal {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: FIELD_USERNAME,
            show_password: false,
            busy: false,
            error: None,
            throbber: ThrobberState::default(),
        }
    }

    fn active_field_mut(&mut self) -> &mut String {
        if self.field == FIELD_PASSWORD {
            &mut self.password
        } else {
            &mut self.username
        }
    }

    fn submit(&mut self) -> Option<Action> {
        if self.username.trim().is_empty() {
            self.error = Some("Username is required".to_string());
            return None;
        }
        if self.password.is_empty() {
            self.error = Some("Password is required".to_string());
            return None;
        }
        self.busy = true;
        self.error = None;
        Some(Action::SubmitLogin {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

impl Default for LoginModal {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LoginModal {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::CloseModal));
        }
        if self.busy {
            return Ok(None);
        }
        // typing resumes after a validation error
        if key.code != KeyCode::Enter {
            self.error = None;
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.field = (self.field + 1) % 2;
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.show_password = !self.show_password;
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.active_field_mut().pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.active_field_mut().push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // The form stays exactly as typed; the toast carries the reason.
            Action::LoginResult(_) => self.busy = false,
            Action::Tick => {
                if self.busy {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(area, 46, 16);
        let inner = render_panel(frame, panel, "Sign in");
        if inner.height < 11 {
            return;
        }

        let field_area = |offset: u16| Rect {
            x: inner.x + 1,
            y: inner.y + offset,
            width: inner.width.saturating_sub(2),
            height: 4,
        };
        render_input_field(
            frame,
            field_area(0),
            "Username",
            &self.username,
            self.field == FIELD_USERNAME && !self.busy,
            false,
        );
        render_input_field(
            frame,
            field_area(4),
            "Password",
            &self.password,
            self.field == FIELD_PASSWORD && !self.busy,
            !self.show_password,
        );

        let status_area = Rect {
            x: inner.x + 1,
            y: inner.y + 9,
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        if self.busy {
            let throbber = Throbber::default()
                .label("Signing in…")
                .style(Style::default().fg(theme::FOG_WHITE))
                .throbber_style(Style::default().fg(theme::STEEL_BLUE));
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
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" sign in  ", theme::key_hint()),
            Span::styled("^u", theme::key_hint_key()),
            Span::styled(" reveal  ", theme::key_hint()),
            Span::styled("esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]);
        let hint_area = Rect {
            x: inner.x + 1,
            y: inner.y + inner.height - 1,
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(hints), hint_area);
    }

    fn id(&self) -> &str {
        "login"
    }
}
