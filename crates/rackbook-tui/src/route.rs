//! URL-style routes and navigation history.
//!
//! Every screen state is addressable as a path, mirroring the web UI:
//! `/` is the dashboard, `/object/42?tab=net` an object's network section.
//! Unknown paths and unknown tab values degrade gracefully instead of
//! erroring, so stale links always land somewhere sensible.

use std::fmt;

use rackbook_core::{ObjectId, Section};

/// An addressable location in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Company/datacenter overview.
    Dashboard,
    /// One object, opened on a specific runbook section.
    Object { id: ObjectId, section: Section },
}

impl Route {
    /// Open an object on its default section.
    pub fn object(id: ObjectId) -> Self {
        Self::Object {
            id,
            section: Section::default(),
        }
    }

    /// Parse a path like `/object/42?tab=links`.
    ///
    /// Anything unrecognized falls back to the dashboard; an unknown `tab`
    /// value falls back to the overview section.
    pub fn parse(input: &str) -> Self {
        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (input, None),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next(), segments.next()) {
            (Some("object"), Some(raw_id), None) => match raw_id.parse::<ObjectId>() {
                Ok(id) => Self::Object {
                    id,
                    section: query.map_or_else(Section::default, parse_tab),
                },
                Err(_) => Self::Dashboard,
            },
            _ => Self::Dashboard,
        }
    }

    /// The canonical path for this route. `parse` round-trips it.
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Object { id, section } => {
                if *section == Section::default() {
                    format!("/object/{id}")
                } else {
                    format!("/object/{id}?tab={section}")
                }
            }
        }
    }

    /// The object this route points at, if any.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Dashboard => None,
            Self::Object { id, .. } => Some(*id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Extract the `tab` parameter from a query string.
fn parse_tab(query: &str) -> Section {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("tab="))
        .and_then(|v| v.parse::<Section>().ok())
        .unwrap_or_default()
}

/// Linear navigation history with back/forward, browser-style.
///
/// Pushing while positioned mid-history truncates the forward entries.
/// Section tab switches use [`History::replace`] so flipping through tabs
/// never pollutes the back stack.
#[derive(Debug)]
pub struct History {
    entries: Vec<Route>,
    pos: usize,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
            pos: 0,
        }
    }

    pub fn current(&self) -> Route {
        self.entries[self.pos]
    }

    /// Push a new route, dropping any forward entries.
    pub fn push(&mut self, route: Route) {
        if route == self.current() {
            return;
        }
        self.entries.truncate(self.pos + 1);
        self.entries.push(route);
        self.pos += 1;
    }

    /// Replace the current entry in place.
    pub fn replace(&mut self, route: Route) {
        self.entries[self.pos] = route;
    }

    /// Step back, if there is anywhere to go.
    pub fn back(&mut self) -> Option<Route> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        Some(self.current())
    }

    /// Step forward after a back.
    pub fn forward(&mut self) -> Option<Route> {
        if self.pos + 1 >= self.entries.len() {
            return None;
        }
        self.pos += 1;
        Some(self.current())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}
