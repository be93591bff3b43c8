use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Short-lived message, similar to a phone's toast notification.
/// It is only removed on [`Toast::expired`] checks, which happen on every tick.
#[derive(Debug, Clone)]
pub struct Toast {
    text: String,
    kind: ToastKind,
    until: Instant,
}

impl Toast {
    pub fn new(text: String, kind: ToastKind, duration: Duration) -> Self {
        Self {
            text,
            kind,
            until: Instant::now() + duration,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.until
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let color = match self.kind() {
            ToastKind::Info => Color::Reset,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(Line::raw(self.text()))
                .centered()
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            area,
        );
    }
}
