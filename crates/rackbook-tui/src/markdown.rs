//! Markdown → ratatui rendering for runbook pages.
//!
//! Turns a page's markdown into styled [`Line`]s: headings, emphasis, inline
//! and fenced code, lists, quotes, links, and tables. Raw HTML in the source
//! is emitted as literal text, never interpreted, so page content cannot
//! smuggle anything past the renderer. Long paragraphs are left unwrapped —
//! the displaying `Paragraph` widget wraps to its area.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

/// Render markdown into owned lines. `width` bounds rules and tables.
pub fn render_markdown(source: &str, width: usize) -> Vec<Line<'static>> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::new(width);
    for event in Parser::new_ext(source, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,

    // inline style state
    bold: bool,
    italic: bool,
    strike: bool,
    heading: Option<HeadingLevel>,
    in_link: bool,
    link_target: Option<String>,

    // block state
    quote_depth: usize,
    list_stack: Vec<Option<u64>>,
    code: Option<String>,
    table: Option<TableState>,
}

struct TableState {
    rows: Vec<Vec<String>>,
    cells: Vec<String>,
    current: String,
    header_rows: usize,
}

impl Renderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            bold: false,
            italic: false,
            strike: false,
            heading: None,
            in_link: false,
            link_target: None,
            quote_depth: 0,
            list_stack: Vec::new(),
            code: None,
            table: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::SoftBreak => self.push_span(" ".to_string()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                let bar = "─".repeat(self.width.clamp(8, 72));
                self.lines.push(Line::styled(bar, theme::meta_text()));
                self.blank();
            }
            // Raw HTML is shown verbatim as dimmed text, by contract.
            Event::Html(html) | Event::InlineHtml(html) => {
                for piece in html.lines() {
                    self.spans
                        .push(Span::styled(piece.to_string(), theme::meta_text()));
                    self.flush();
                }
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.spans
                    .push(Span::styled(marker, Style::default().fg(theme::SKY_CYAN)));
            }
            Event::FootnoteReference(name) => {
                self.push_span(format!("[^{name}]"));
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level);
                self.spans.push(Span::styled(
                    format!("{} ", heading_marker(level)),
                    theme::meta_text(),
                ));
            }
            Tag::BlockQuote => self.quote_depth += 1,
            Tag::CodeBlock(kind) => {
                self.flush();
                if let CodeBlockKind::Fenced(lang) = &kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::styled(
                            format!("┌ {lang}"),
                            theme::meta_text(),
                        ));
                    }
                }
                self.code = Some(String::new());
            }
            Tag::List(first) => self.list_stack.push(first),
            Tag::Item => {
                self.flush();
                let depth = self.list_stack.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let label = format!("{indent}{n}. ");
                        *n += 1;
                        label
                    }
                    _ => format!("{indent}• "),
                };
                self.spans
                    .push(Span::styled(marker, Style::default().fg(theme::SKY_CYAN)));
            }
            Tag::Emphasis => self.italic = true,
            Tag::Strong => self.bold = true,
            Tag::Strikethrough => self.strike = true,
            Tag::Link { dest_url, .. } => {
                self.in_link = true;
                self.link_target = Some(dest_url.to_string());
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableState {
                    rows: Vec::new(),
                    cells: Vec::new(),
                    current: String::new(),
                    header_rows: 0,
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.cells.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = &mut self.table {
                    table.current.clear();
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
                self.blank();
            }
            TagEnd::BlockQuote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    for line in code.lines() {
                        self.lines.push(Line::from(vec![
                            Span::raw("  "),
                            Span::styled(
                                line.to_string(),
                                Style::default().fg(theme::AMBER),
                            ),
                        ]));
                    }
                }
                self.blank();
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis => self.italic = false,
            TagEnd::Strong => self.bold = false,
            TagEnd::Strikethrough => self.strike = false,
            TagEnd::Link => {
                self.in_link = false;
                if let Some(url) = self.link_target.take() {
                    self.spans
                        .push(Span::styled(format!(" ({url})"), theme::meta_text()));
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = &mut self.table {
                    table.cells.push(std::mem::take(&mut table.current));
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = &mut self.table {
                    table.rows.push(std::mem::take(&mut table.cells));
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = &mut self.table {
                    table.rows.push(std::mem::take(&mut table.cells));
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.emit_table(&table);
                }
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.push_str(text);
        } else if let Some(table) = &mut self.table {
            table.current.push_str(text);
        } else {
            self.push_span(text.to_string());
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(table) = &mut self.table {
            table.current.push_str(code);
            return;
        }
        self.spans.push(Span::styled(
            code.to_string(),
            Style::default()
                .fg(theme::AMBER)
                .bg(theme::BG_HIGHLIGHT),
        ));
    }

    fn push_span(&mut self, text: String) {
        self.spans.push(Span::styled(text, self.current_style()));
    }

    fn current_style(&self) -> Style {
        let mut style = match self.heading {
            Some(HeadingLevel::H1) => theme::title_style().add_modifier(Modifier::UNDERLINED),
            Some(HeadingLevel::H2) => Style::default()
                .fg(theme::SKY_CYAN)
                .add_modifier(Modifier::BOLD),
            Some(_) => Style::default()
                .fg(theme::FOG_WHITE)
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(theme::FOG_WHITE),
        };
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.in_link {
            style = style
                .fg(theme::SKY_CYAN)
                .add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    /// Close the current line, applying the blockquote gutter.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = std::mem::take(&mut self.spans);
        if self.quote_depth > 0 {
            let gutter = "▌ ".repeat(self.quote_depth);
            spans.insert(0, Span::styled(gutter, theme::meta_text()));
        }
        self.lines.push(Line::from(spans));
    }

    /// Insert a blank separator, collapsing runs of them.
    fn blank(&mut self) {
        if matches!(self.lines.last(), Some(last) if !last.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn emit_table(&mut self, table: &TableState) {
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }
        let max_cell = (self.width / columns).saturating_sub(3).max(4);
        let mut widths = vec![0usize; columns];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count().min(max_cell));
            }
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let mut spans = Vec::new();
            for (i, &col_width) in widths.iter().enumerate() {
                let cell = row.get(i).map_or("", String::as_str);
                let clipped: String = cell.chars().take(col_width).collect();
                spans.push(Span::styled("│ ", theme::meta_text()));
                let style = if idx < table.header_rows {
                    Style::default()
                        .fg(theme::FOG_WHITE)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::FOG_WHITE)
                };
                spans.push(Span::styled(format!("{clipped:<col_width$} "), style));
            }
            spans.push(Span::styled("│", theme::meta_text()));
            self.lines.push(Line::from(spans));

            if idx + 1 == table.header_rows {
                let mut rule = String::new();
                for width in &widths {
                    rule.push('├');
                    rule.push_str(&"─".repeat(width + 2));
                }
                rule.push('┤');
                self.lines.push(Line::styled(rule, theme::meta_text()));
            }
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while matches!(self.lines.last(), Some(last) if last.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn heading_marker(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "#",
        HeadingLevel::H2 => "##",
        HeadingLevel::H3 => "###",
        HeadingLevel::H4 => "####",
        HeadingLevel::H5 => "#####",
        HeadingLevel::H6 => "######",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn plain_all(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(plain).collect()
    }

    #[test]
    fn heading_keeps_marker_and_bold_text() {
        let lines = render_markdown("# Incident response", 80);
        assert_eq!(plain(&lines[0]), "# Incident response");
        let text_span = &lines[0].spans[1];
        assert!(text_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn soft_breaks_join_into_one_line() {
        let lines = render_markdown("first\nsecond", 80);
        assert_eq!(plain(&lines[0]), "first second");
    }

    #[test]
    fn hard_break_splits_lines() {
        let lines = render_markdown("first  \nsecond", 80);
        assert_eq!(plain_all(&lines), vec!["first", "second"]);
    }

    #[test]
    fn bullet_and_ordered_lists() {
        let lines = render_markdown("- alpha\n- beta", 80);
        assert_eq!(plain_all(&lines), vec!["• alpha", "• beta"]);

        let lines = render_markdown("1. first\n2. second", 80);
        assert_eq!(plain_all(&lines), vec!["1. first", "2. second"]);
    }

    #[test]
    fn nested_list_is_indented() {
        let lines = render_markdown("- outer\n  - inner", 80);
        assert_eq!(plain(&lines[0]), "• outer");
        assert_eq!(plain(&lines[1]), "  • inner");
    }

    #[test]
    fn fenced_code_block_is_indented_with_language_header() {
        let lines = render_markdown("```bash\nsystemctl restart nginx\n```", 80);
        assert_eq!(plain(&lines[0]), "┌ bash");
        assert_eq!(plain(&lines[1]), "  systemctl restart nginx");
    }

    #[test]
    fn inline_code_is_highlighted() {
        let lines = render_markdown("run `fsck` now", 80);
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "fsck")
            .unwrap();
        assert_eq!(code.style.fg, Some(theme::AMBER));
    }

    #[test]
    fn html_is_rendered_as_literal_text() {
        let lines = render_markdown("<script>alert('x')</script>", 80);
        let all: String = plain_all(&lines).join("\n");
        assert!(all.contains("<script>"), "html must stay literal: {all}");
    }

    #[test]
    fn link_shows_its_target() {
        let lines = render_markdown("[grafana](https://grafana.local)", 80);
        assert_eq!(plain(&lines[0]), "grafana (https://grafana.local)");
    }

    #[test]
    fn blockquote_gets_a_gutter() {
        let lines = render_markdown("> escalate to oncall", 80);
        assert_eq!(plain(&lines[0]), "▌ escalate to oncall");
    }

    #[test]
    fn rule_renders_as_bar() {
        let lines = render_markdown("---", 40);
        assert!(plain(&lines[0]).starts_with('─'));
    }

    #[test]
    fn table_renders_aligned_rows() {
        let lines = render_markdown("| host | ip |\n|---|---|\n| web1 | 10.0.0.1 |", 80);
        let rendered = plain_all(&lines);
        assert!(rendered[0].contains("host") && rendered[0].contains("ip"));
        assert!(rendered[1].starts_with('├'));
        assert!(rendered[2].contains("web1") && rendered[2].contains("10.0.0.1"));
    }

    #[test]
    fn task_list_markers() {
        let lines = render_markdown("- [x] done\n- [ ] open", 80);
        assert_eq!(plain(&lines[0]), "• [x] done");
        assert_eq!(plain(&lines[1]), "• [ ] open");
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_markdown("", 80).is_empty());
    }

    #[test]
    fn trailing_blank_lines_are_trimmed() {
        let lines = render_markdown("only paragraph", 80);
        assert_eq!(plain_all(&lines), vec!["only paragraph"]);
    }
}
