//! Inventory tree pane: one datacenter at a time, objects in three fixed
//! groups, with incremental filtering and route-driven highlighting.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use rackbook_core::{InventoryTree, ObjectId, ObjectStatus, TreeNode};

use crate::action::{Action, ScopeSummary};
use crate::component::Component;
use crate::route::Route;
use crate::theme;
use crate::widgets::status;

/// Rough viewport estimate for scroll adjustments made outside render.
const VIEWPORT_GUESS: usize = 30;

/// What a flattened tree row stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowKind {
    /// The datacenter root — activating it navigates to the dashboard.
    DcRoot,
    /// A collapsible group header.
    Group(usize),
    /// An object leaf — activating it opens the object.
    Leaf(ObjectId),
    /// Inert filler ("(empty)", "(no matches)").
    Placeholder,
}

/// One visible row, flattened from the hierarchy at rebuild time.
#[derive(Debug, Clone)]
struct Row {
    kind: RowKind,
    /// Tree guides ("├── ", "│   └── ", ...), structure only.
    prefix: String,
    label: String,
    meta: String,
    status: Option<ObjectStatus>,
}

pub struct TreePane {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    tree: Arc<InventoryTree>,
    loaded: bool,
    load_error: Option<String>,
    company_idx: usize,
    dc_idx: usize,
    filter: String,
    /// Expansion state of the three groups, in display order.
    open: [bool; 3],
    rows: Vec<Row>,
    selected: usize,
    scroll: usize,
    /// Object the current route points at, if any.
    highlighted: Option<ObjectId>,
}

impl TreePane {
    pub fn new() -> Self {
        let mut pane = Self {
            focused: true,
            action_tx: None,
            tree: Arc::new(InventoryTree::default()),
            loaded: false,
            load_error: None,
            company_idx: 0,
            dc_idx: 0,
            filter: String::new(),
            open: [true; 3],
            rows: Vec::new(),
            selected: 0,
            scroll: 0,
            highlighted: None,
        };
        pane.rebuild_rows();
        pane
    }

    /// Current company/datacenter shown, for the dashboard header.
    pub fn scope_summary(&self) -> ScopeSummary {
        let company = self.tree.companies.get(self.company_idx);
        let datacenter = company.and_then(|c| c.datacenters.get(self.dc_idx));
        ScopeSummary {
            company: company.map(|c| c.name.clone()),
            datacenter: datacenter.map(|d| d.name.clone()),
            object_count: datacenter.map_or(0, |d| d.nodes().count()),
        }
    }

    fn emit_scope(&self) {
        if let Some(tx) = &self.action_tx {
            let _ = tx.send(Action::ScopeChanged(self.scope_summary()));
        }
    }

    fn matches_filter(&self, node: &TreeNode) -> bool {
        let query = self.filter.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        node.name.to_lowercase().contains(&query)
            || node
                .ip
                .as_deref()
                .is_some_and(|ip| ip.to_lowercase().contains(&query))
    }

    /// Flatten the selected datacenter into visible rows.
    fn rebuild_rows(&mut self) {
        self.rows.clear();

        let datacenter = self
            .tree
            .companies
            .get(self.company_idx)
            .and_then(|c| c.datacenters.get(self.dc_idx));

        let Some(dc) = datacenter else {
            let label = match &self.load_error {
                Some(_) => "(failed to load inventory)",
                None if self.loaded => "(no inventory data)",
                None => "(loading…)",
            };
            self.rows.push(Row {
                kind: RowKind::Placeholder,
                prefix: String::new(),
                label: label.to_string(),
                meta: String::new(),
                status: None,
            });
            self.selected = 0;
            return;
        };

        self.rows.push(Row {
            kind: RowKind::DcRoot,
            prefix: String::new(),
            label: format!("⌂ {}", dc.name),
            meta: String::new(),
            status: None,
        });

        let groups = dc.groups();
        for (gi, (group, nodes)) in groups.iter().enumerate() {
            let group_last = gi + 1 == groups.len();
            let filtered: Vec<&TreeNode> =
                nodes.iter().filter(|n| self.matches_filter(n)).collect();
            let marker = if self.open[gi] { "▾" } else { "▸" };

            self.rows.push(Row {
                kind: RowKind::Group(gi),
                prefix: if group_last { "└── " } else { "├── " }.to_string(),
                label: format!("{marker} {} ({})", group.label(), filtered.len()),
                meta: String::new(),
                status: None,
            });

            if !self.open[gi] {
                continue;
            }

            let trunk = if group_last { "    " } else { "│   " };
            if filtered.is_empty() {
                self.rows.push(Row {
                    kind: RowKind::Placeholder,
                    prefix: format!("{trunk}└── "),
                    label: if nodes.is_empty() { "(empty)" } else { "(no matches)" }.to_string(),
                    meta: String::new(),
                    status: None,
                });
                continue;
            }

            for (i, node) in filtered.iter().enumerate() {
                let leaf_last = i + 1 == filtered.len();
                let branch = if leaf_last { "└── " } else { "├── " };
                self.rows.push(Row {
                    kind: RowKind::Leaf(node.id),
                    prefix: format!("{trunk}{branch}"),
                    label: node.name.clone(),
                    meta: node.ip.clone().unwrap_or_default(),
                    status: Some(node.status),
                });
            }
        }

        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    /// Put the cursor on the row of `id`. Returns whether it was found.
    fn select_row_of(&mut self, id: ObjectId) -> bool {
        let found = self
            .rows
            .iter()
            .position(|row| row.kind == RowKind::Leaf(id));
        if let Some(idx) = found {
            self.selected = idx;
            self.ensure_visible(VIEWPORT_GUESS);
            return true;
        }
        false
    }

    /// Route-driven highlight: select the object's row, and when something
    /// hides it (filter, collapsed group, other scope) undo all of that and
    /// retry a single time. Still absent → out of scope, nothing happens.
    fn apply_highlight(&mut self, id: ObjectId) {
        self.highlighted = Some(id);
        if self.select_row_of(id) {
            return;
        }

        self.filter.clear();
        self.open = [true; 3];
        if let Some((ci, di)) = self.tree.locate(id) {
            self.company_idx = ci;
            self.dc_idx = di;
        }
        self.rebuild_rows();
        self.emit_scope();
        let _ = self.select_row_of(id);
    }

    fn ensure_visible(&mut self, viewport: usize) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + viewport {
            self.scroll = self.selected + 1 - viewport;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(last);
        self.ensure_visible(VIEWPORT_GUESS);
    }

    /// Enter on the selected row.
    fn activate_selected(&mut self) -> Option<Action> {
        match self.rows.get(self.selected)?.kind.clone() {
            RowKind::DcRoot => Some(Action::Navigate(Route::Dashboard)),
            RowKind::Leaf(id) => Some(Action::Navigate(Route::object(id))),
            RowKind::Group(gi) => {
                self.toggle_group(gi);
                None
            }
            RowKind::Placeholder => None,
        }
    }

    fn toggle_group(&mut self, gi: usize) {
        if let Some(open) = self.open.get_mut(gi) {
            *open = !*open;
        }
        self.rebuild_rows();
    }

    fn cycle_company(&mut self) -> Option<Action> {
        let count = self.tree.companies.len();
        if count < 2 {
            return None;
        }
        self.company_idx = (self.company_idx + 1) % count;
        self.dc_idx = 0;
        self.selected = 0;
        self.scroll = 0;
        self.rebuild_rows();
        self.emit_scope();
        Some(Action::Navigate(Route::Dashboard))
    }

    fn cycle_datacenter(&mut self) -> Option<Action> {
        let count = self
            .tree
            .companies
            .get(self.company_idx)
            .map_or(0, |c| c.datacenters.len());
        if count < 2 {
            return None;
        }
        self.dc_idx = (self.dc_idx + 1) % count;
        self.selected = 0;
        self.scroll = 0;
        self.rebuild_rows();
        self.emit_scope();
        Some(Action::Navigate(Route::Dashboard))
    }

    fn row_line(&self, idx: usize, row: &Row) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();

        if idx == self.selected && self.focused {
            spans.push(Span::styled("▸ ", theme::title_style()));
        } else {
            spans.push(Span::raw("  "));
        }

        if !row.prefix.is_empty() {
            spans.push(Span::styled(row.prefix.clone(), theme::meta_text()));
        }

        if let Some(st) = row.status {
            spans.push(status::status_span(st));
            spans.push(Span::raw(" "));
        }

        let is_active = match row.kind {
            RowKind::Leaf(id) => self.highlighted == Some(id),
            RowKind::DcRoot => self.highlighted.is_none() && self.loaded,
            _ => false,
        };
        let label_style = if idx == self.selected && self.focused {
            theme::selected_row()
        } else if is_active {
            theme::active_row()
        } else {
            match row.kind {
                RowKind::Group(_) => theme::title_style(),
                RowKind::Placeholder => theme::placeholder(),
                _ => ratatui::style::Style::default().fg(theme::FOG_WHITE),
            }
        };
        spans.push(Span::styled(row.label.clone(), label_style));

        if !row.meta.is_empty() {
            spans.push(Span::styled(format!("  {}", row.meta), theme::meta_text()));
        }

        Line::from(spans)
    }
}

impl Default for TreePane {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TreePane {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                self.ensure_visible(VIEWPORT_GUESS);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.rows.len().saturating_sub(1);
                self.ensure_visible(VIEWPORT_GUESS);
                None
            }
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Char(' ') => {
                if let Some(Row {
                    kind: RowKind::Group(gi),
                    ..
                }) = self.rows.get(self.selected)
                {
                    let gi = *gi;
                    self.toggle_group(gi);
                }
                None
            }
            KeyCode::Char('c') => self.cycle_company(),
            KeyCode::Char('d') => self.cycle_datacenter(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TreeLoaded(tree) => {
                self.tree = Arc::clone(tree);
                self.loaded = true;
                self.load_error = None;
                self.company_idx = self
                    .company_idx
                    .min(self.tree.companies.len().saturating_sub(1));
                let dc_count = self
                    .tree
                    .companies
                    .get(self.company_idx)
                    .map_or(0, |c| c.datacenters.len());
                self.dc_idx = self.dc_idx.min(dc_count.saturating_sub(1));
                self.rebuild_rows();
                self.emit_scope();
                // A deep link may have arrived before the data.
                if let Some(id) = self.highlighted {
                    self.apply_highlight(id);
                }
            }
            Action::TreeLoadFailed(message) => {
                self.loaded = true;
                self.load_error = Some(message.clone());
                self.tree = Arc::new(InventoryTree::default());
                self.rebuild_rows();
                self.emit_scope();
            }
            Action::RouteChanged(route) => match route {
                Route::Dashboard => self.highlighted = None,
                Route::Object { id, .. } => self.apply_highlight(*id),
            },
            Action::FilterInput(query) => {
                self.filter = query.clone();
                self.rebuild_rows();
            }
            Action::FilterClear => {
                self.filter.clear();
                self.rebuild_rows();
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
        let scope = self.scope_summary();
        let title = format!(
            " {} ",
            scope.company.as_deref().unwrap_or("—")
        );
        let block = Block::default()
            .title(Span::styled(title, theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        if !self.filter.trim().is_empty() {
            lines.push(Line::from(vec![
                Span::styled("filter: ", theme::meta_text()),
                Span::styled(self.filter.clone(), theme::tab_active()),
            ]));
        }

        let header_rows = lines.len();
        let viewport = usize::from(inner.height)
            .saturating_sub(header_rows + 1)
            .max(1);
        let scroll = self
            .scroll
            .min(self.rows.len().saturating_sub(viewport));

        for (idx, row) in self
            .rows
            .iter()
            .enumerate()
            .skip(scroll)
            .take(viewport)
        {
            lines.push(self.row_line(idx, row));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        // key hints on the bottom border line of the pane
        let hints = Line::from(vec![
            Span::styled("j/k", theme::key_hint_key()),
            Span::styled(" move  ", theme::key_hint()),
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" open  ", theme::key_hint()),
            Span::styled("/", theme::key_hint_key()),
            Span::styled(" filter  ", theme::key_hint()),
            Span::styled("c/d", theme::key_hint_key()),
            Span::styled(" scope", theme::key_hint()),
        ]);
        let hint_area = Rect {
            x: inner.x,
            y: inner.y + inner.height - 1,
            width: inner.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(hints), hint_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "tree"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rackbook_core::{Company, CompanyId, Datacenter, DatacenterId, ObjectKind};

    use super::*;

    fn node(id: i64, name: &str, ip: &str) -> TreeNode {
        TreeNode {
            id: ObjectId(id),
            name: name.to_string(),
            kind: ObjectKind::Service,
            status: ObjectStatus::Ok,
            ip: Some(ip.to_string()),
        }
    }

    fn sample_tree() -> Arc<InventoryTree> {
        Arc::new(InventoryTree {
            companies: vec![
                Company {
                    id: CompanyId(1),
                    name: "Acme".to_string(),
                    datacenters: vec![Datacenter {
                        id: DatacenterId(10),
                        name: "FRA-1".to_string(),
                        services: vec![node(100, "auth-api", "10.0.0.10"), node(101, "billing", "10.0.0.11")],
                        servers: vec![node(102, "db-master", "10.0.1.10")],
                        network: vec![],
                    }],
                },
                Company {
                    id: CompanyId(2),
                    name: "Globex".to_string(),
                    datacenters: vec![Datacenter {
                        id: DatacenterId(20),
                        name: "AMS-2".to_string(),
                        services: vec![node(200, "erp", "10.1.0.10")],
                        servers: vec![],
                        network: vec![],
                    }],
                },
            ],
        })
    }

    fn loaded_pane() -> TreePane {
        let mut pane = TreePane::new();
        pane.update(&Action::TreeLoaded(sample_tree())).unwrap();
        pane
    }

    fn labels(pane: &TreePane) -> Vec<String> {
        pane.rows.iter().map(|r| r.label.clone()).collect()
    }

    #[test]
    fn flattens_datacenter_with_groups_and_counts() {
        let pane = loaded_pane();
        assert_eq!(
            labels(&pane),
            vec![
                "⌂ FRA-1",
                "▾ Services (2)",
                "auth-api",
                "billing",
                "▾ Servers (1)",
                "db-master",
                "▾ Network (0)",
                "(empty)",
            ]
        );
    }

    #[test]
    fn guides_mark_last_children() {
        let pane = loaded_pane();
        assert_eq!(pane.rows[1].prefix, "├── ");
        assert_eq!(pane.rows[2].prefix, "│   ├── ");
        assert_eq!(pane.rows[3].prefix, "│   └── ");
        assert_eq!(pane.rows[6].prefix, "└── ");
        assert_eq!(pane.rows[7].prefix, "    └── ");
    }

    #[test]
    fn filter_matches_name_or_ip() {
        let mut pane = loaded_pane();
        pane.update(&Action::FilterInput("auth".to_string())).unwrap();
        assert_eq!(
            labels(&pane),
            vec![
                "⌂ FRA-1",
                "▾ Services (1)",
                "auth-api",
                "▾ Servers (0)",
                "(no matches)",
                "▾ Network (0)",
                "(no matches)",
            ]
        );

        pane.update(&Action::FilterInput("10.0.1".to_string())).unwrap();
        assert!(labels(&pane).contains(&"db-master".to_string()));
        assert!(!labels(&pane).contains(&"auth-api".to_string()));
    }

    #[test]
    fn filter_is_case_insensitive_on_names() {
        let mut pane = loaded_pane();
        pane.update(&Action::FilterInput("BILLING".to_string())).unwrap();
        assert!(labels(&pane).contains(&"billing".to_string()));
    }

    #[test]
    fn filter_is_case_insensitive_on_ips() {
        let mut pane = TreePane::new();
        pane.update(&Action::TreeLoaded(Arc::new(InventoryTree {
            companies: vec![Company {
                id: CompanyId(1),
                name: "Acme".to_string(),
                datacenters: vec![Datacenter {
                    id: DatacenterId(10),
                    name: "FRA-1".to_string(),
                    services: vec![],
                    servers: vec![],
                    network: vec![node(300, "edge-router", "FE80::1")],
                }],
            }],
        })))
        .unwrap();

        pane.update(&Action::FilterInput("fe80".to_string())).unwrap();
        assert!(labels(&pane).contains(&"edge-router".to_string()));
    }

    #[test]
    fn collapsing_a_group_hides_its_leaves() {
        let mut pane = loaded_pane();
        pane.selected = 1; // Services header
        pane.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert_eq!(
            labels(&pane),
            vec![
                "⌂ FRA-1",
                "▸ Services (2)",
                "▾ Servers (1)",
                "db-master",
                "▾ Network (0)",
                "(empty)",
            ]
        );
    }

    #[test]
    fn enter_on_leaf_navigates_to_object() {
        let mut pane = loaded_pane();
        pane.selected = 2; // auth-api
        let action = pane.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(
            matches!(action, Some(Action::Navigate(Route::Object { id, .. })) if id == ObjectId(100))
        );
    }

    #[test]
    fn enter_on_root_navigates_to_dashboard() {
        let mut pane = loaded_pane();
        pane.selected = 0;
        let action = pane.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::Navigate(Route::Dashboard))));
    }

    #[test]
    fn highlight_selects_the_object_row() {
        let mut pane = loaded_pane();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(102))))
            .unwrap();
        assert_eq!(pane.rows[pane.selected].kind, RowKind::Leaf(ObjectId(102)));
        assert_eq!(pane.highlighted, Some(ObjectId(102)));
    }

    #[test]
    fn highlight_retries_after_clearing_filter_and_collapse() {
        let mut pane = loaded_pane();
        pane.update(&Action::FilterInput("billing".to_string())).unwrap();
        pane.open = [false, false, false];
        pane.rebuild_rows();

        pane.update(&Action::RouteChanged(Route::object(ObjectId(102))))
            .unwrap();

        assert!(pane.filter.is_empty());
        assert_eq!(pane.open, [true; 3]);
        assert_eq!(pane.rows[pane.selected].kind, RowKind::Leaf(ObjectId(102)));
    }

    #[test]
    fn highlight_switches_scope_for_deep_links() {
        let mut pane = loaded_pane();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(200))))
            .unwrap();

        assert_eq!(pane.company_idx, 1);
        assert_eq!(pane.scope_summary().company.as_deref(), Some("Globex"));
        assert_eq!(pane.rows[pane.selected].kind, RowKind::Leaf(ObjectId(200)));
    }

    #[test]
    fn highlight_of_unknown_object_is_a_noop() {
        let mut pane = loaded_pane();
        let before = pane.selected;
        pane.update(&Action::RouteChanged(Route::object(ObjectId(999))))
            .unwrap();
        assert_eq!(pane.selected, before);
    }

    #[test]
    fn company_cycle_resets_datacenter_and_goes_home() {
        let mut pane = loaded_pane();
        let action = pane.handle_key_event(KeyEvent::from(KeyCode::Char('c'))).unwrap();
        assert!(matches!(action, Some(Action::Navigate(Route::Dashboard))));
        assert_eq!(pane.scope_summary().company.as_deref(), Some("Globex"));
        assert_eq!(pane.dc_idx, 0);
    }

    #[test]
    fn empty_tree_renders_placeholder_scope() {
        let mut pane = TreePane::new();
        pane.update(&Action::TreeLoaded(Arc::new(InventoryTree::default())))
            .unwrap();
        assert_eq!(labels(&pane), vec!["(no inventory data)"]);
        let scope = pane.scope_summary();
        assert_eq!(scope.company, None);
        assert_eq!(scope.object_count, 0);
    }

    #[test]
    fn dashboard_route_clears_highlight() {
        let mut pane = loaded_pane();
        pane.update(&Action::RouteChanged(Route::object(ObjectId(100))))
            .unwrap();
        pane.update(&Action::RouteChanged(Route::Dashboard)).unwrap();
        assert_eq!(pane.highlighted, None);
    }
}
