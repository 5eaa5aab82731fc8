//! Small reusable rendering helpers shared by panes and modals.

pub mod status;
pub mod sub_tabs;
