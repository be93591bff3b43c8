use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::{action::Action, tui::Event};

pub trait Component {
    /// Handle incoming events and produce actions if necessary.
    fn handle_events(&mut self, event: Event) -> Result<Option<Action>> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            _ => Ok(None),
        }
    }
    /// Handle key events that are not consumed by a keybinding.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key; // to appease clippy
        Ok(None)
    }
    /// Update the state of the component based on a received action.
    /// Runs on the UI loop, so this is the only place a component may be mutated in response to
    /// a worker.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action; // to appease clippy
        Ok(None)
    }
    /// Render the component on the screen.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
