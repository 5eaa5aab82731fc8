//! Detail pane: the dashboard welcome view, or one object with its six
//! runbook sections behind sub-tabs.

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use rackbook_core::{ObjectDetail, ObjectId, Section};

use crate::action::{Action, Notification, ScopeSummary};
use crate::component::Component;
use crate::markdown;
use crate::route::Route;
use crate::theme;
use crate::widgets::{status, sub_tabs};

/// Rough content viewport for scroll adjustments made in key handlers.
const VIEWPORT_GUESS: u16 = 20;

pub struct DetailPane {
    focused: bool,
    route: Route,
    scope: ScopeSummary,
    detail: Option<Arc<ObjectDetail>>,
    loading: bool,
    load_error: Option<String>,
    can_edit: bool,
    scroll: u16,
    link_sel: usize,
    /// Highest useful scroll for the last rendered frame.
    max_scroll: Cell<u16>,
    throbber: ThrobberState,
}

impl DetailPane {
    pub fn new() -> Self {
        Self {
            focused: false,
            route: Route::Dashboard,
            scope: ScopeSummary::default(),
            detail: None,
            loading: false,
            load_error: None,
            can_edit: false,
            scroll: 0,
            link_sel: 0,
            max_scroll: Cell::new(0),
            throbber: ThrobberState::default(),
        }
    }

    fn section(&self) -> Option<Section> {
        match self.route {
            Route::Dashboard => None,
            Route::Object { section, .. } => Some(section),
        }
    }

    fn object_id(&self) -> Option<ObjectId> {
        self.route.object_id()
    }

    /// Switch tabs by replacing the current history entry.
    fn switch_section(&self, section: Section) -> Option<Action> {
        let id = self.object_id()?;
        Some(Action::ReplaceRoute(Route::Object { id, section }))
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = i64::from(self.scroll) + i64::from(delta);
        let clamped = next.clamp(0, i64::from(self.max_scroll.get()));
        self.scroll = u16::try_from(clamped).unwrap_or(0);
    }

    fn move_link_selection(&mut self, delta: isize) {
        let Some(detail) = &self.detail else { return };
        if detail.relations.is_empty() {
            return;
        }
        let last = detail.relations.len() - 1;
        self.link_sel = self.link_sel.saturating_add_signed(delta).min(last);

        // keep the selected relation row on screen
        let row = u16::try_from(self.link_sel).unwrap_or(u16::MAX);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + VIEWPORT_GUESS {
            self.scroll = row + 1 - VIEWPORT_GUESS;
        }
    }

    fn open_selected_relation(&self) -> Option<Action> {
        let detail = self.detail.as_ref()?;
        let id = self.object_id()?;
        let relation = detail.relations.get(self.link_sel)?;
        Some(Action::Navigate(Route::object(relation.other_end(id))))
    }

    /// `e` — open the editor for the current section, if allowed.
    fn open_editor(&self) -> Option<Action> {
        if !self.can_edit {
            return None;
        }
        let detail = self.detail.as_ref()?;
        let section = self.section()?;
        match detail.page(section) {
            Some(page) => Some(Action::OpenEditor {
                page_id: page.id,
                section,
                content: page.content_md.clone(),
            }),
            None => Some(Action::Notify(Notification::error(
                "Page not found for this section",
            ))),
        }
    }

    fn open_upload(&self) -> Option<Action> {
        if self.section() != Some(Section::Docs) {
            return None;
        }
        let object_id = self.detail.as_ref().map(|d| d.object.id)?;
        Some(Action::OpenUpload { object_id })
    }

    // ── Content assembly ─────────────────────────────────────────────

    fn page_lines(&self, section: Section, width: usize) -> Vec<Line<'static>> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };
        let Some(page) = detail.page(section) else {
            return vec![Line::styled(
                "No data for this section yet.",
                theme::placeholder(),
            )];
        };

        let mut lines = Vec::new();
        if let Some(ts) = page.updated_at {
            let mut meta = format!("updated {}", ts.format("%Y-%m-%d %H:%M"));
            if let Some(user) = page.updated_by {
                meta.push_str(&format!(" · user #{user}"));
            }
            lines.push(Line::styled(meta, theme::meta_text()));
            lines.push(Line::default());
        }
        if page.content_md.trim().is_empty() {
            lines.push(Line::styled(
                "No data for this section yet.",
                theme::placeholder(),
            ));
        } else {
            lines.extend(markdown::render_markdown(&page.content_md, width));
        }
        lines
    }

    fn links_lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };
        let Some(id) = self.object_id() else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        if detail.relations.is_empty() {
            lines.push(Line::styled(
                "No relations recorded.",
                theme::placeholder(),
            ));
        } else {
            for (i, relation) in detail.relations.iter().enumerate() {
                let selected = i == self.link_sel && self.focused;
                let arrow = if relation.is_outgoing(id) { "→" } else { "←" };
                let other = relation.other_end(id);
                let mut text = format!(" {arrow} {}  #{other}", relation.relation_type);
                if !relation.note.is_empty() {
                    text.push_str(&format!("  ({})", relation.note));
                }
                let style = if selected {
                    theme::selected_row()
                } else {
                    Style::default().fg(theme::FOG_WHITE)
                };
                lines.push(Line::styled(text, style));
            }
        }

        let markdown = self.page_lines(Section::Links, width);
        if !markdown.is_empty() {
            lines.push(Line::default());
            lines.extend(markdown);
        }
        lines
    }

    fn incident_lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };

        let mut lines = self.page_lines(Section::Inc, width);
        lines.push(Line::default());
        lines.push(Line::styled(
            "Incidents",
            Style::default()
                .fg(theme::SKY_CYAN)
                .add_modifier(Modifier::BOLD),
        ));
        if detail.incidents.is_empty() {
            lines.push(Line::styled(
                "No incidents recorded.",
                theme::placeholder(),
            ));
            return lines;
        }

        for incident in &detail.incidents {
            let mut spans = vec![Span::styled(
                format!(" [{}] ", incident.severity),
                Style::default().fg(theme::AMBER),
            )];
            spans.push(Span::styled(
                incident.title.clone(),
                Style::default().fg(theme::FOG_WHITE),
            ));
            if let Some(ts) = incident.created_at {
                spans.push(Span::styled(
                    format!("  {}", ts.format("%Y-%m-%d")),
                    theme::meta_text(),
                ));
            }
            lines.push(Line::from(spans));
            if !incident.symptom.is_empty() {
                lines.push(Line::styled(
                    format!("      {}", incident.symptom),
                    theme::meta_text(),
                ));
            }
        }
        lines
    }

    fn document_lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        if detail.documents.is_empty() {
            lines.push(Line::styled(
                "No documents attached.",
                theme::placeholder(),
            ));
        } else {
            for doc in &detail.documents {
                let mut spans = vec![
                    Span::styled(format!(" [{}] ", doc.kind), theme::meta_text()),
                    Span::styled(doc.title.clone(), Style::default().fg(theme::FOG_WHITE)),
                ];
                if let Some(location) = doc.location() {
                    spans.push(Span::styled(
                        format!("  {location}"),
                        Style::default()
                            .fg(theme::SKY_CYAN)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }

        let markdown = self.page_lines(Section::Docs, width);
        if !markdown.is_empty() {
            lines.push(Line::default());
            lines.extend(markdown);
        }
        lines
    }

    fn content_lines(&self, section: Section, width: usize) -> Vec<Line<'static>> {
        match section {
            Section::Links => self.links_lines(width),
            Section::Inc => self.incident_lines(width),
            Section::Docs => self.document_lines(width),
            Section::Overview | Section::Arch | Section::Net => self.page_lines(section, width),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let company = self.scope.company.as_deref().unwrap_or("—");
        let lines = vec![
            Line::default(),
            Line::styled(format!("  {company}"), theme::title_style()),
            Line::default(),
            Line::from(vec![
                Span::styled("  Datacenter: ", theme::meta_text()),
                Span::styled(
                    self.scope.datacenter.clone().unwrap_or_else(|| "—".to_string()),
                    Style::default().fg(theme::FOG_WHITE),
                ),
                Span::styled("    Objects: ", theme::meta_text()),
                Span::styled(
                    self.scope.object_count.to_string(),
                    Style::default().fg(theme::FOG_WHITE),
                ),
            ]),
            Line::default(),
            Line::styled(
                "  Every object keeps six runbook sections: overview, links,",
                Style::default().fg(theme::FOG_WHITE),
            ),
            Line::styled(
                "  architecture, network, incidents, and documents.",
                Style::default().fg(theme::FOG_WHITE),
            ),
            Line::default(),
            Line::from(vec![
                Span::styled("  ⏎", theme::key_hint_key()),
                Span::styled(" open object   ", theme::key_hint()),
                Span::styled("/", theme::key_hint_key()),
                Span::styled(" filter   ", theme::key_hint()),
                Span::styled("L", theme::key_hint_key()),
                Span::styled(" sign in/out", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let throbber = Throbber::default()
            .label("Loading object…")
            .style(Style::default().fg(theme::FOG_WHITE))
            .throbber_style(Style::default().fg(theme::STEEL_BLUE));
        let centered = Rect {
            x: area.x + 2,
            y: area.y + area.height / 2,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_stateful_widget(throbber, centered, &mut self.throbber.clone());
    }

    fn render_object(&self, frame: &mut Frame, area: Rect, detail: &ObjectDetail) {
        let section = self.section().unwrap_or_default();
        let [header_area, tabs_area, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        // header: status, kind, ip, tags
        let object = &detail.object;
        let mut header = status::status_badge(object.status);
        header.push(Span::styled(
            format!("  {}", object.kind),
            Style::default().fg(theme::SKY_CYAN),
        ));
        if let Some(ip) = &object.ip {
            header.push(Span::styled(format!("  {ip}"), theme::meta_text()));
        }
        if let Some(fqdn) = &object.fqdn {
            header.push(Span::styled(format!("  {fqdn}"), theme::meta_text()));
        }
        for tag in object.tag_list() {
            header.push(Span::styled(format!("  #{tag}"), theme::meta_text()));
        }
        frame.render_widget(Paragraph::new(Line::from(header)), header_area);

        // sub-tabs
        let labels: Vec<&str> = Section::ALL.iter().map(|s| s.label()).collect();
        let active = Section::ALL.iter().position(|s| *s == section).unwrap_or(0);
        let tab_line = sub_tabs::render_sub_tabs(&labels, active);
        frame.render_widget(
            Paragraph::new(vec![Line::default(), tab_line]),
            tabs_area,
        );

        // content, scrolled
        let width = usize::from(content_area.width.saturating_sub(1));
        let lines = self.content_lines(section, width);
        let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let max_scroll = total.saturating_sub(content_area.height.max(1));
        self.max_scroll.set(max_scroll);
        let scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            content_area,
        );

        // hints
        let mut hints = vec![
            Span::styled("h/l", theme::key_hint_key()),
            Span::styled(" tabs  ", theme::key_hint()),
        ];
        if section == Section::Links && !detail.relations.is_empty() {
            hints.push(Span::styled("j/k", theme::key_hint_key()));
            hints.push(Span::styled(" select  ", theme::key_hint()));
            hints.push(Span::styled("⏎", theme::key_hint_key()));
            hints.push(Span::styled(" follow  ", theme::key_hint()));
        } else {
            hints.push(Span::styled("j/k", theme::key_hint_key()));
            hints.push(Span::styled(" scroll  ", theme::key_hint()));
        }
        if section == Section::Docs {
            hints.push(Span::styled("a", theme::key_hint_key()));
            hints.push(Span::styled(" add doc  ", theme::key_hint()));
        }
        if self.can_edit {
            hints.push(Span::styled("e", theme::key_hint_key()));
            hints.push(Span::styled(" edit  ", theme::key_hint()));
        }
        hints.push(Span::styled("esc", theme::key_hint_key()));
        hints.push(Span::styled(" back", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(hints)), hints_area);
    }
}

impl Default for DetailPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DetailPane {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.route == Route::Dashboard {
            return Ok(None);
        }
        let on_links = self.section() == Some(Section::Links)
            && self.detail.as_ref().is_some_and(|d| !d.relations.is_empty());

        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.section().and_then(|s| self.switch_section(s.prev()))
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.section().and_then(|s| self.switch_section(s.next()))
            }
            KeyCode::Char(c @ '1'..='6') => {
                let idx = usize::from(u8::try_from(c).unwrap_or(b'1') - b'1');
                self.switch_section(Section::ALL[idx])
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if on_links {
                    self.move_link_selection(1);
                } else {
                    self.scroll_by(1);
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if on_links {
                    self.move_link_selection(-1);
                } else {
                    self.scroll_by(-1);
                }
                None
            }
            KeyCode::PageDown => {
                self.scroll_by(i32::from(VIEWPORT_GUESS));
                None
            }
            KeyCode::PageUp => {
                self.scroll_by(-i32::from(VIEWPORT_GUESS));
                None
            }
            KeyCode::Char('g') => {
                self.scroll = 0;
                None
            }
            KeyCode::Char('G') => {
                self.scroll = self.max_scroll.get();
                None
            }
            KeyCode::Enter if on_links => self.open_selected_relation(),
            KeyCode::Char('e') => self.open_editor(),
            KeyCode::Char('a') => self.open_upload(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RouteChanged(route) => {
                let same_object = match (self.route, *route) {
                    (Route::Object { id: a, .. }, Route::Object { id: b, .. }) => a == b,
                    _ => false,
                };
                let section_changed = self.section()
                    != match route {
                        Route::Dashboard => None,
                        Route::Object { section, .. } => Some(*section),
                    };
                self.route = *route;
                match route {
                    Route::Dashboard => {
                        self.detail = None;
                        self.loading = false;
                        self.load_error = None;
                    }
                    Route::Object { .. } if !same_object => {
                        self.detail = None;
                        self.loading = true;
                        self.load_error = None;
                    }
                    Route::Object { .. } => {}
                }
                if section_changed {
                    self.scroll = 0;
                    self.link_sel = 0;
                }
            }
            Action::ObjectLoaded { detail, .. } => {
                if self.object_id() == Some(detail.object.id) {
                    self.detail = Some(Arc::clone(detail));
                    self.loading = false;
                    self.load_error = None;
                    self.link_sel = 0;
                }
            }
            Action::ObjectLoadFailed { message, .. } => {
                if self.route != Route::Dashboard {
                    self.loading = false;
                    self.load_error = Some(message.clone());
                }
            }
            Action::ScopeChanged(scope) => self.scope = scope.clone(),
            Action::SessionChanged { can_edit } => self.can_edit = *can_edit,
            Action::Tick => {
                if self.loading {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let title = match (&self.route, &self.detail) {
            (Route::Dashboard, _) => " Dashboard ".to_string(),
            (Route::Object { .. }, Some(detail)) => format!(" {} ", detail.object.name),
            (Route::Object { id, .. }, None) => format!(" Object #{id} "),
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 3 {
            return;
        }

        match &self.route {
            Route::Dashboard => self.render_dashboard(frame, inner),
            Route::Object { .. } => {
                if let Some(detail) = &self.detail {
                    self.render_object(frame, inner, detail);
                } else if self.loading {
                    self.render_loading(frame, inner);
                } else if let Some(error) = &self.load_error {
                    let lines = vec![
                        Line::default(),
                        Line::styled("  Failed to load object", Style::default().fg(theme::ALERT_RED)),
                        Line::styled(format!("  {error}"), theme::meta_text()),
                        Line::default(),
                        Line::from(vec![
                            Span::styled("  r", theme::key_hint_key()),
                            Span::styled(" retry  ", theme::key_hint()),
                            Span::styled("esc", theme::key_hint_key()),
                            Span::styled(" back", theme::key_hint()),
                        ]),
                    ];
                    frame.render_widget(Paragraph::new(lines), inner);
                }
            }
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "detail"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rackbook_core::{
        DatacenterId, ObjectKind, ObjectRecord, ObjectStatus, Page, PageId, Relation, RelationId,
    };

    use super::*;

    fn sample_detail() -> Arc<ObjectDetail> {
        Arc::new(ObjectDetail {
            object: ObjectRecord {
                id: ObjectId(5),
                dc_id: DatacenterId(10),
                kind: ObjectKind::Service,
                name: "auth-api".to_string(),
                status: ObjectStatus::Ok,
                ip: Some("10.0.0.5".to_string()),
                fqdn: None,
                tags: Some("prod, pci".to_string()),
                description: None,
            },
            pages: vec![Page {
                id: PageId(50),
                section: Section::Overview,
                content_md: "# Overview\nRuns auth.".to_string(),
                updated_at: None,
                updated_by: None,
            }],
            relations: vec![
                Relation {
                    id: RelationId(1),
                    relation_type: "depends_on".to_string(),
                    note: String::new(),
                    src_object_id: ObjectId(5),
                    dst_object_id: ObjectId(7),
                },
                Relation {
                    id: RelationId(2),
                    relation_type: "runs_on".to_string(),
                    note: "primary".to_string(),
                    src_object_id: ObjectId(9),
                    dst_object_id: ObjectId(5),
                },
            ],
            documents: vec![],
            incidents: vec![],
        })
    }

    fn loaded_pane() -> DetailPane {
        let mut pane = DetailPane::new();
        pane.set_focused(true);
        pane.update(&Action::RouteChanged(Route::object(ObjectId(5))))
            .unwrap();
        pane.update(&Action::ObjectLoaded {
            generation: 1,
            detail: sample_detail(),
        })
        .unwrap();
        pane
    }

    #[test]
    fn navigation_to_object_enters_loading_state() {
        let mut pane = DetailPane::new();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(5))))
            .unwrap();
        assert!(pane.loading);
        assert!(pane.detail.is_none());
    }

    #[test]
    fn loaded_detail_is_kept_for_matching_route_only() {
        let mut pane = DetailPane::new();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(6))))
            .unwrap();
        pane.update(&Action::ObjectLoaded {
            generation: 1,
            detail: sample_detail(), // object 5, stale
        })
        .unwrap();
        assert!(pane.detail.is_none());
        assert!(pane.loading);
    }

    #[test]
    fn tab_switch_replaces_route_and_keeps_detail() {
        let mut pane = loaded_pane();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('l')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::ReplaceRoute(Route::Object {
                id: ObjectId(5),
                section: Section::Links
            }))
        ));

        // the app echoes the replace back as a route change
        pane.update(&Action::RouteChanged(Route::Object {
            id: ObjectId(5),
            section: Section::Links,
        }))
        .unwrap();
        assert!(pane.detail.is_some());
        assert!(!pane.loading);
    }

    #[test]
    fn section_switch_resets_scroll() {
        let mut pane = loaded_pane();
        pane.scroll = 7;
        pane.update(&Action::RouteChanged(Route::Object {
            id: ObjectId(5),
            section: Section::Net,
        }))
        .unwrap();
        assert_eq!(pane.scroll, 0);
    }

    #[test]
    fn number_keys_jump_to_sections() {
        let mut pane = loaded_pane();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('4')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::ReplaceRoute(Route::Object {
                section: Section::Net,
                ..
            }))
        ));
    }

    #[test]
    fn enter_on_links_follows_the_far_end() {
        let mut pane = loaded_pane();
        pane.update(&Action::RouteChanged(Route::Object {
            id: ObjectId(5),
            section: Section::Links,
        }))
        .unwrap();

        // first relation: 5 → 7
        let action = pane.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(
            matches!(action, Some(Action::Navigate(Route::Object { id, .. })) if id == ObjectId(7))
        );

        // second relation is incoming from 9; following it goes to 9
        pane.handle_key_event(KeyEvent::from(KeyCode::Char('j'))).unwrap();
        let action = pane.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(
            matches!(action, Some(Action::Navigate(Route::Object { id, .. })) if id == ObjectId(9))
        );
    }

    #[test]
    fn edit_without_permission_is_ignored() {
        let mut pane = loaded_pane();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('e')))
            .unwrap();
        assert!(action.is_none());
    }

    #[test]
    fn edit_opens_editor_for_existing_page() {
        let mut pane = loaded_pane();
        pane.update(&Action::SessionChanged { can_edit: true }).unwrap();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('e')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::OpenEditor {
                page_id: PageId(50),
                section: Section::Overview,
                ..
            })
        ));
    }

    #[test]
    fn edit_of_missing_page_surfaces_page_not_found() {
        let mut pane = loaded_pane();
        pane.update(&Action::SessionChanged { can_edit: true }).unwrap();
        pane.update(&Action::RouteChanged(Route::Object {
            id: ObjectId(5),
            section: Section::Arch,
        }))
        .unwrap();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('e')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::Notify(Notification { message, .. })) if message.contains("not found")
        ));
    }

    #[test]
    fn upload_only_offered_on_documents_tab() {
        let mut pane = loaded_pane();
        assert!(
            pane.handle_key_event(KeyEvent::from(KeyCode::Char('a')))
                .unwrap()
                .is_none()
        );

        pane.update(&Action::RouteChanged(Route::Object {
            id: ObjectId(5),
            section: Section::Docs,
        }))
        .unwrap();
        let action = pane
            .handle_key_event(KeyEvent::from(KeyCode::Char('a')))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::OpenUpload {
                object_id: ObjectId(5)
            })
        ));
    }

    #[test]
    fn dashboard_route_discards_detail() {
        let mut pane = loaded_pane();
        pane.update(&Action::RouteChanged(Route::Dashboard)).unwrap();
        assert!(pane.detail.is_none());
    }

    #[test]
    fn load_failure_is_kept_for_display() {
        let mut pane = DetailPane::new();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(5))))
            .unwrap();
        pane.update(&Action::ObjectLoadFailed {
            generation: 1,
            message: "server unreachable".to_string(),
        })
        .unwrap();
        assert_eq!(pane.load_error.as_deref(), Some("server unreachable"));
        assert!(!pane.loading);
    }

    #[test]
    fn links_lines_mark_direction_and_note() {
        let pane = loaded_pane();
        let lines = pane.links_lines(80);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(texts[0].contains("→ depends_on  #7"));
        assert!(texts[1].contains("← runs_on  #9"));
        assert!(texts[1].contains("(primary)"));
    }
}
