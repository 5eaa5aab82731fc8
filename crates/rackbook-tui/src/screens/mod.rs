//! The two always-visible panes: inventory tree and detail view.

pub mod detail;
pub mod tree;
