use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};
use tui_textarea::TextArea;

use crate::components::traits::focusable::Focusable;

/// Single line text input with a bordered title
pub struct TextField {
    input: TextArea<'static>,
    title: &'static str,
    focused: bool,
}

impl TextField {
    pub fn new(title: &'static str, focused: bool) -> Self {
        let mut res = Self {
            input: TextArea::default(),
            title,
            focused,
        };
        res.update_style();
        res
    }

    pub fn masked(mut self, mask: char) -> Self {
        self.input.set_mask_char(mask);
        self
    }

    fn update_style(&mut self) {
        if self.focused {
            self.input
                .set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));
            self.input
                .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
            self.input.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default())
                    .title(self.title),
            );
        } else {
            self.input.set_cursor_line_style(Style::default());
            self.input.set_cursor_style(Style::default());
            self.input.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::DarkGray))
                    .title(self.title),
            );
        }
    }

    pub fn input(&mut self, key: KeyEvent) {
        self.input.input(key);
    }

    /// Newlines would end up as a second line that is never shown, so they are dropped
    pub fn paste(&mut self, text: &str) {
        let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        self.input.insert_str(line);
    }

    pub fn value(&self) -> &str {
        self.input.lines().first().map(String::as_str).unwrap_or_default()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.input, area);
    }
}

impl Focusable for TextField {
    fn set_enabled(&mut self, enable: bool) {
        if self.focused != enable {
            self.focused = enable;
            self.update_style();
        }
    }
}
