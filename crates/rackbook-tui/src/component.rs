//! The `Component` trait — the unit of composition for panes and modals.
//!
//! Components receive key/mouse input, react to [`Action`]s dispatched by the
//! app loop, and render into a `Rect`. Async work never happens inside a
//! component: they emit actions and the app spawns the tasks.

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

pub trait Component: Send {
    /// Called once with the action sender before the first event.
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        let _ = action_tx;
        Ok(())
    }

    /// Handle a key press, optionally producing a follow-up action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Handle mouse input, optionally producing a follow-up action.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// React to a dispatched action, optionally producing a follow-up.
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component into `area`.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has input focus.
    fn focused(&self) -> bool {
        false
    }

    /// Grant or revoke input focus.
    fn set_focused(&mut self, focused: bool) {
        let _ = focused;
    }

    /// Stable identifier for logging.
    fn id(&self) -> &str;
}
