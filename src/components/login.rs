use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info};

use crate::{
    action::Action,
    authclient::credentials::Credentials,
    components::{
        lib::{
            textfield::TextField,
            toast::{Toast, ToastKind},
        },
        traits::{component::Component, focusable::Focusable},
    },
    config::Config,
    queryworker::query::{FromQueryWorker, Query, QueryResponse, ToQueryWorker},
    tui::Event,
};

#[derive(Debug, Default, PartialEq)]
enum Status {
    #[default]
    Normal,
    /// Contains the ticket for the Login query
    Pending(usize),
}

#[derive(Debug, Default, PartialEq)]
enum Focus {
    #[default]
    Username,
    Password,
}

pub struct Login {
    username: TextField,
    password: TextField,
    focus: Focus,
    status: Status,
    toast: Option<Toast>,
    config: Config,
}

impl Login {
    pub fn new(config: Config) -> Self {
        Self {
            username: TextField::new("Username", true),
            password: TextField::new("Password", false).masked('*'),
            focus: Focus::default(),
            status: Status::default(),
            toast: None,
            config,
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending(_))
    }

    fn update_style(&mut self) {
        let editable = !self.is_pending();
        self.username
            .set_enabled(editable && self.focus == Focus::Username);
        self.password
            .set_enabled(editable && self.focus == Focus::Password);
    }

    fn navigate(&mut self) -> Result<Option<Action>> {
        if self.is_pending() {
            return Ok(None);
        }
        self.focus = match self.focus {
            Focus::Username => Focus::Password,
            Focus::Password => Focus::Username,
        };
        self.update_style();
        Ok(None)
    }

    fn notify(&mut self, text: String, kind: ToastKind, long: bool) {
        let duration = if long {
            self.config.notification.long()
        } else {
            self.config.notification.short()
        };
        self.toast = Some(Toast::new(text, kind, duration));
    }

    /// Validates the form and turns it into a login query.
    /// Nothing is sent if either field is blank, or if a login is already in progress.
    fn submit(&mut self) -> Result<Option<Action>> {
        if self.is_pending() {
            return Ok(None);
        }
        let credentials = match Credentials::new(self.username.value(), self.password.value()) {
            Ok(c) => c,
            Err(e) => {
                self.notify(e.to_string(), ToastKind::Info, false);
                return Ok(None);
            }
        };
        let q = ToQueryWorker::new(Query::Login(credentials));
        self.status = Status::Pending(q.ticket);
        self.toast = None;
        self.update_style();
        Ok(Some(Action::ToQueryWorker(q)))
    }

    fn handle_reply(&mut self, reply: FromQueryWorker) {
        let Status::Pending(ticket) = self.status else {
            debug!("Ignoring reply #{}, no login in progress", reply.ticket);
            return;
        };
        if ticket != reply.ticket {
            debug!("Ignoring stale reply #{} (waiting for #{})", reply.ticket, ticket);
            return;
        }
        let QueryResponse::Login(outcome) = reply.res;
        info!("Login #{} finished: {}", ticket, outcome);
        let kind = if outcome.is_success() {
            ToastKind::Success
        } else {
            ToastKind::Error
        };
        self.status = Status::Normal;
        self.update_style();
        self.notify(outcome.to_string(), kind, true);
    }
}

impl Component for Login {
    fn handle_events(&mut self, event: Event) -> Result<Option<Action>> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Paste(text) if !self.is_pending() => {
                match self.focus {
                    Focus::Username => self.username.paste(&text),
                    Focus::Password => self.password.paste(&text),
                };
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => self.navigate(),
            KeyCode::Esc => Ok(Some(Action::Quit)),
            KeyCode::Enter => self.submit(),
            _ if self.is_pending() => Ok(None),
            _ => {
                match self.focus {
                    Focus::Username => self.username.input(key),
                    Focus::Password => self.password.input(key),
                };
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FromQueryWorker(reply) => self.handle_reply(reply),
            Action::Tick => {
                if self.toast.as_ref().is_some_and(|t| t.expired(Instant::now())) {
                    self.toast = None;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let [horizontal] = Layout::horizontal([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(area);
        let [centered] = Layout::vertical([Constraint::Length(15)])
            .flex(Flex::Center)
            .areas(horizontal);
        let [username, password, status, help, toast] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(centered);
        self.username.draw(frame, username);
        self.password.draw(frame, password);
        if self.is_pending() {
            frame.render_widget(Paragraph::new("Logging in...").centered(), status);
        }
        frame.render_widget(
            Paragraph::new(vec![
                Line::raw("Enter: Log in"),
                Line::raw("Tab or arrow keys: Navigate"),
                Line::raw("Esc: Quit"),
            ])
            .centered(),
            help,
        );
        if let Some(t) = &self.toast {
            t.draw(frame, toast);
        }
        Ok(())
    }
}
