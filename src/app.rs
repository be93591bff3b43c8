use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::{
    action::Action,
    components::{login::Login, traits::component::Component},
    config::Config,
    queryworker::query::{Query, ToQueryWorker},
    tui::{Event, Tui},
};

/// Owns the terminal and the UI state. Everything that touches the login form happens inside
/// [`App::run`]; workers only talk to it through the action channel.
pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    component: Box<dyn Component + Send>,
    should_quit: bool,
    should_suspend: bool,
    key_stack: Vec<KeyEvent>,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    query_tx: UnboundedSender<ToQueryWorker>,
}

impl App {
    pub fn new(
        config: Config,
        action_tx: UnboundedSender<Action>,
        action_rx: UnboundedReceiver<Action>,
        query_tx: UnboundedSender<ToQueryWorker>,
        tick_rate: f64,
        frame_rate: f64,
    ) -> Self {
        Self {
            tick_rate,
            frame_rate,
            component: Box::new(Login::new(config.clone())),
            should_quit: false,
            should_suspend: false,
            config,
            key_stack: Vec::new(),
            action_tx,
            action_rx,
            query_tx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        let action_tx = self.action_tx.clone();
        loop {
            self.handle_events(&mut tui).await?;
            self.handle_actions(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        // Worker may have a login in flight, it is not needed anymore
        let _ = self.query_tx.send(ToQueryWorker::new(Query::Kill));
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };
        let action_tx = self.action_tx.clone();
        match &event {
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(*x, *y))?,
            Event::Key(key) => {
                // Keys that belong to a binding never reach the form
                for key in self.handle_key_event(*key)? {
                    if let Some(action) = self.component.handle_events(Event::Key(key))? {
                        action_tx.send(action)?;
                    }
                }
                return Ok(());
            }
            _ => {}
        }
        if let Some(action) = self.component.handle_events(event)? {
            action_tx.send(action)?;
        }
        Ok(())
    }

    /// Returns the keys that should be passed on to the form, in the order they were pressed.
    /// If a partially typed sequence stops matching any binding, the held keys are given back.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Vec<KeyEvent>> {
        self.key_stack.push(key);

        if let Some(action) = self.config.keybindings.get(&self.key_stack).cloned() {
            info!("Got action: {action:?}");
            self.action_tx.send(action)?;
            self.key_stack.drain(..);
            return Ok(vec![]);
        }
        // Only keep the stack while it is still the prefix of some binding
        let is_prefix = self
            .config
            .keybindings
            .keys()
            .any(|seq| seq.starts_with(&self.key_stack));
        if is_prefix {
            return Ok(vec![]);
        }
        let mut held: Vec<KeyEvent> = self.key_stack.drain(..).collect();
        held.pop();
        if held.is_empty() {
            return Ok(vec![key]);
        }
        // The key that broke the sequence may start a binding of its own
        held.extend(self.handle_key_event(key)?);
        Ok(held)
    }

    fn handle_actions(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                debug!("{action:?}");
            }
            match &action {
                Action::EndKeySeq => {
                    self.key_stack.drain(..);
                }
                Action::ToQueryWorker(q) => {
                    self.query_tx.send(q.clone())?;
                }
                Action::Quit => self.should_quit = true,
                Action::Suspend => self.should_suspend = true,
                Action::Resume => self.should_suspend = false,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Error(msg) => error!("{msg}"),
                _ => {}
            }
            if let Some(ret) = self.component.update(action)? {
                debug!("Got {ret:?} as a response");
                self.action_tx.send(ret)?
            }
        }
        Ok(())
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            if let Err(err) = self.component.draw(frame, frame.area()) {
                let _ = self
                    .action_tx
                    .send(Action::Error(format!("Failed to draw: {:?}", err)));
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::keybindings::KeyBindings;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn setup(binds: &[(&str, Action)]) -> App {
        let mut config = Config::default();
        config.keybindings = KeyBindings(
            binds
                .iter()
                .map(|(seq, action)| {
                    (
                        KeyBindings::<Action>::parse_key_sequence(seq).unwrap(),
                        action.clone(),
                    )
                })
                .collect::<HashMap<_, _>>(),
        );
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (query_tx, _) = mpsc::unbounded_channel();
        App::new(config, action_tx, action_rx, query_tx, 4.0, 60.0)
    }

    #[test]
    fn test_sequence_fires_action() {
        let mut app = setup(&[("<g><q>", Action::Quit)]);
        assert_eq!(app.handle_key_event(key('g')).unwrap(), Vec::<KeyEvent>::new());
        assert_eq!(app.handle_key_event(key('q')).unwrap(), Vec::<KeyEvent>::new());
        assert_eq!(app.action_rx.try_recv().unwrap(), Action::Quit);
        assert!(app.key_stack.is_empty());
    }

    #[test]
    fn test_unbound_key_is_forwarded() {
        let mut app = setup(&[("<g><q>", Action::Quit)]);
        assert_eq!(app.handle_key_event(key('a')).unwrap(), vec![key('a')]);
        assert!(app.action_rx.try_recv().is_err());
    }

    #[test]
    fn test_broken_prefix_is_replayed() {
        let mut app = setup(&[("<g><q>", Action::Quit)]);
        assert_eq!(app.handle_key_event(key('g')).unwrap(), Vec::<KeyEvent>::new());
        assert_eq!(
            app.handle_key_event(key('x')).unwrap(),
            vec![key('g'), key('x')]
        );
        assert!(app.key_stack.is_empty());
        assert!(app.action_rx.try_recv().is_err());
    }

    #[test]
    fn test_breaking_key_can_start_new_sequence() {
        let mut app = setup(&[("<g><q>", Action::Quit), ("<x>", Action::Suspend)]);
        assert_eq!(app.handle_key_event(key('g')).unwrap(), Vec::<KeyEvent>::new());
        assert_eq!(app.handle_key_event(key('x')).unwrap(), vec![key('g')]);
        assert_eq!(app.action_rx.try_recv().unwrap(), Action::Suspend);
    }
}
