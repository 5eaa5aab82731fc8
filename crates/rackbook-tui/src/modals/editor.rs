//! Full-screen markdown editor for one runbook page.
//!
//! Holds a line-based draft with a character-addressed cursor. Ctrl+S saves;
//! Esc discards unconditionally. While a save is in flight the draft is
//! frozen, and a failed save hands it back untouched.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use rackbook_core::{PageId, Section};

use crate::action::Action;
use crate::component::Component;
use crate::modals::{centered_rect, render_panel};
use crate::theme;

/// Rough text viewport for scroll-follow outside render.
const VIEWPORT_GUESS: usize = 18;

pub struct EditorModal {
    page_id: PageId,
    section: Section,
    lines: Vec<String>,
    row: usize,
    /// Cursor column in characters, not bytes.
    col: usize,
    scroll: usize,
    dirty: bool,
    busy: bool,
}

/// Byte offset of the `col`-th character, or the string's end.
fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl EditorModal {
    pub fn new(page_id: PageId, section: Section, content: &str) -> Self {
        let lines = content.split('\n').map(String::from).collect();
        Self {
            page_id,
            section,
            lines,
            row: 0,
            col: 0,
            scroll: 0,
            dirty: false,
            busy: false,
        }
    }

    /// The draft as it would be saved.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    fn current_line(&self) -> &str {
        self.lines.get(self.row).map_or("", String::as_str)
    }

    fn clamp_col(&mut self) {
        self.col = self.col.min(char_len(self.current_line()));
    }

    fn follow_cursor(&mut self) {
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + VIEWPORT_GUESS {
            self.scroll = self.row + 1 - VIEWPORT_GUESS;
        }
    }

    fn insert_str(&mut self, text: &str) {
        let at = byte_index(self.current_line(), self.col);
        if let Some(line) = self.lines.get_mut(self.row) {
            line.insert_str(at, text);
            self.col += char_len(text);
            self.dirty = true;
        }
    }

    fn insert_newline(&mut self) {
        let at = byte_index(self.current_line(), self.col);
        if let Some(line) = self.lines.get_mut(self.row) {
            let rest = line.split_off(at);
            self.lines.insert(self.row + 1, rest);
            self.row += 1;
            self.col = 0;
            self.dirty = true;
            self.follow_cursor();
        }
    }

    fn backspace(&mut self) {
        if self.col > 0 {
            let at = byte_index(self.current_line(), self.col - 1);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.remove(at);
                self.col -= 1;
                self.dirty = true;
            }
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(self.current_line());
            if let Some(line) = self.lines.get_mut(self.row) {
                line.push_str(&current);
            }
            self.dirty = true;
            self.follow_cursor();
        }
    }

    fn delete_forward(&mut self) {
        let len = char_len(self.current_line());
        if self.col < len {
            let at = byte_index(self.current_line(), self.col);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.remove(at);
                self.dirty = true;
            }
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.push_str(&next);
            }
            self.dirty = true;
        }
    }

    fn move_cursor(&mut self, rows: isize, cols: isize) {
        if cols < 0 && self.col == 0 && self.row > 0 {
            // wrap to the end of the previous line
            self.row -= 1;
            self.col = char_len(self.current_line());
        } else if cols > 0 && self.col >= char_len(self.current_line()) && self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        } else if cols != 0 {
            self.col = self.col.saturating_add_signed(cols);
            self.clamp_col();
        }

        if rows != 0 {
            self.row = self
                .row
                .saturating_add_signed(rows)
                .min(self.lines.len().saturating_sub(1));
            self.clamp_col();
        }
        self.follow_cursor();
    }

    fn save(&mut self) -> Option<Action> {
        self.busy = true;
        Some(Action::SavePage {
            page_id: self.page_id,
            content: self.content(),
        })
    }
}

impl Component for EditorModal {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::CloseModal));
        }
        if self.busy {
            return Ok(None);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Enter => {
                self.insert_newline();
                None
            }
            KeyCode::Backspace => {
                self.backspace();
                None
            }
            KeyCode::Delete => {
                self.delete_forward();
                None
            }
            KeyCode::Left => {
                self.move_cursor(0, -1);
                None
            }
            KeyCode::Right => {
                self.move_cursor(0, 1);
                None
            }
            KeyCode::Up => {
                self.move_cursor(-1, 0);
                None
            }
            KeyCode::Down => {
                self.move_cursor(1, 0);
                None
            }
            KeyCode::PageUp => {
                self.move_cursor(-isize::try_from(VIEWPORT_GUESS).unwrap_or(isize::MAX), 0);
                None
            }
            KeyCode::PageDown => {
                self.move_cursor(isize::try_from(VIEWPORT_GUESS).unwrap_or(isize::MAX), 0);
                None
            }
            KeyCode::Home => {
                self.col = 0;
                None
            }
            KeyCode::End => {
                self.col = char_len(self.current_line());
                None
            }
            KeyCode::Tab => {
                self.insert_str("    ");
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.insert_str(&c.to_string());
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        // A failed save unfreezes the draft exactly as it was.
        if matches!(action, Action::PageSaveFailed(_)) {
            self.busy = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(
            area,
            area.width.saturating_sub(8).max(40),
            area.height.saturating_sub(4).max(12),
        );
        let title = format!("Edit · {}", self.section.label());
        let inner = render_panel(frame, panel, &title);
        if inner.height < 2 {
            return;
        }

        let text_area = Rect {
            height: inner.height - 1,
            ..inner
        };
        let viewport = usize::from(text_area.height);
        let scroll = self
            .scroll
            .min(self.lines.len().saturating_sub(viewport));

        let mut rendered: Vec<Line<'static>> = Vec::with_capacity(viewport);
        for (idx, line) in self
            .lines
            .iter()
            .enumerate()
            .skip(scroll)
            .take(viewport)
        {
            if idx == self.row {
                rendered.push(cursor_line(line, self.col));
            } else {
                rendered.push(Line::styled(
                    line.clone(),
                    Style::default().fg(theme::FOG_WHITE),
                ));
            }
        }
        frame.render_widget(Paragraph::new(rendered), text_area);

        // status line: position, dirty marker, key hints
        let mut status = vec![
            Span::styled(
                format!("{}:{}", self.row + 1, self.col + 1),
                theme::meta_text(),
            ),
            Span::styled(if self.dirty { " *" } else { "  " }, theme::tab_active()),
            Span::raw("  "),
        ];
        if self.busy {
            status.push(Span::styled("saving…  ", Style::default().fg(theme::AMBER)));
        }
        status.extend([
            Span::styled("^s", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("esc", theme::key_hint_key()),
            Span::styled(" discard", theme::key_hint()),
        ]);
        let status_area = Rect {
            x: inner.x,
            y: inner.y + inner.height - 1,
            width: inner.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(status)), status_area);
    }

    fn id(&self) -> &str {
        "editor"
    }
}

/// Render the cursor row with the character under the cursor reversed.
fn cursor_line(line: &str, col: usize) -> Line<'static> {
    let at = byte_index(line, col);
    let (before, rest) = line.split_at(at);
    let mut chars = rest.chars();
    let under = chars.next();
    let after: String = chars.collect();

    let base = Style::default().fg(theme::FOG_WHITE);
    let cursor = Style::default()
        .fg(theme::VIOLET)
        .add_modifier(Modifier::REVERSED);

    let mut spans = vec![Span::styled(before.to_string(), base)];
    match under {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor)),
        None => spans.push(Span::styled(" ", cursor)),
    }
    if !after.is_empty() {
        spans.push(Span::styled(after, base));
    }
    Line::from(spans)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn modal(content: &str) -> EditorModal {
        EditorModal::new(PageId(7), Section::Overview, content)
    }

    fn press(m: &mut EditorModal, code: KeyCode) -> Option<Action> {
        m.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    fn type_str(m: &mut EditorModal, text: &str) {
        for c in text.chars() {
            press(m, KeyCode::Char(c));
        }
    }

    #[test]
    fn seeds_draft_and_round_trips_content() {
        let m = modal("# Title\n\nbody");
        assert_eq!(m.lines.len(), 3);
        assert_eq!(m.content(), "# Title\n\nbody");
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut m = modal("ab");
        press(&mut m, KeyCode::Right);
        type_str(&mut m, "X");
        assert_eq!(m.content(), "aXb");
        assert!(m.dirty);
    }

    #[test]
    fn multibyte_text_is_edited_by_character() {
        let mut m = modal("héllo");
        press(&mut m, KeyCode::Right);
        press(&mut m, KeyCode::Right);
        type_str(&mut m, "X");
        assert_eq!(m.content(), "héXllo");

        press(&mut m, KeyCode::Backspace);
        press(&mut m, KeyCode::Backspace);
        assert_eq!(m.content(), "hllo");
    }

    #[test]
    fn enter_splits_the_line_at_cursor() {
        let mut m = modal("headtail");
        for _ in 0..4 {
            press(&mut m, KeyCode::Right);
        }
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.content(), "head\ntail");
        assert_eq!((m.row, m.col), (1, 0));
    }

    #[test]
    fn backspace_at_line_start_merges_lines() {
        let mut m = modal("head\ntail");
        press(&mut m, KeyCode::Down);
        press(&mut m, KeyCode::Backspace);
        assert_eq!(m.content(), "headtail");
        assert_eq!((m.row, m.col), (0, 4));
    }

    #[test]
    fn delete_at_line_end_merges_the_next_line() {
        let mut m = modal("head\ntail");
        press(&mut m, KeyCode::End);
        press(&mut m, KeyCode::Delete);
        assert_eq!(m.content(), "headtail");
    }

    #[test]
    fn vertical_moves_clamp_the_column() {
        let mut m = modal("long line here\nhi");
        press(&mut m, KeyCode::End);
        press(&mut m, KeyCode::Down);
        assert_eq!((m.row, m.col), (1, 2));
    }

    #[test]
    fn left_at_line_start_wraps_to_previous_end() {
        let mut m = modal("ab\ncd");
        press(&mut m, KeyCode::Down);
        press(&mut m, KeyCode::Left);
        assert_eq!((m.row, m.col), (0, 2));
    }

    #[test]
    fn save_emits_the_draft_and_freezes_it() {
        let mut m = modal("before");
        type_str(&mut m, "x");
        let action = m
            .handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::SavePage { page_id: PageId(7), content }) if content == "xbefore"
        ));
        assert!(m.busy);

        // frozen while saving
        type_str(&mut m, "zzz");
        assert_eq!(m.content(), "xbefore");
    }

    #[test]
    fn failed_save_unfreezes_with_the_draft_intact() {
        let mut m = modal("draft");
        type_str(&mut m, "!");
        m.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        m.update(&Action::PageSaveFailed("boom".to_string())).unwrap();

        assert!(!m.busy);
        assert_eq!(m.content(), "!draft");
        type_str(&mut m, "?");
        assert_eq!(m.content(), "!?draft");
    }

    #[test]
    fn escape_discards_unconditionally() {
        let mut m = modal("x");
        type_str(&mut m, "edits");
        let action = press(&mut m, KeyCode::Esc);
        assert!(matches!(action, Some(Action::CloseModal)));

        // even while busy
        m.busy = true;
        let action = press(&mut m, KeyCode::Esc);
        assert!(matches!(action, Some(Action::CloseModal)));
    }

    #[test]
    fn empty_content_still_has_one_editable_line() {
        let mut m = modal("");
        assert_eq!(m.lines.len(), 1);
        type_str(&mut m, "hello");
        assert_eq!(m.content(), "hello");
    }
}
