use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use weather_dash_core::{
    Due, Key, PendingLocate, PendingQuery, Resolved, Suggested, ViewController,
    render::RenderContext,
};

use crate::dashboard::ui;

/// Longest wait between loop iterations; finished requests are applied on wake-up.
const TICK_RATE: Duration = Duration::from_millis(100);

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Controller(Key),
    Type(char),
    Erase,
    HighlightPrev,
    HighlightNext,
    /// Tab: take the highlighted suggestion, or move focus when there is none.
    Accept,
    Locate,
    ToggleTheme,
    Quit,
    Ignore,
}

/// Follow-up work that needs the network.
#[derive(Debug)]
enum Work {
    Query(PendingQuery),
    Locate,
}

/// Background work handed back to the loop.
#[derive(Debug)]
enum Finished {
    Weather(Resolved),
    Suggestions(Suggested),
}

pub fn map_key(key: KeyEvent, search_focused: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('l') if ctrl => Action::Locate,
        KeyCode::Char('t') if ctrl => Action::ToggleTheme,
        KeyCode::Char('s' | 'S') if alt => Action::Controller(Key::FocusSearch),
        KeyCode::Enter => Action::Controller(Key::Enter),
        KeyCode::Esc => Action::Controller(Key::Escape),
        KeyCode::Up => Action::HighlightPrev,
        KeyCode::Down => Action::HighlightNext,
        KeyCode::Tab => Action::Accept,
        KeyCode::Backspace if search_focused => Action::Erase,
        KeyCode::Char('q') if !search_focused => Action::Quit,
        KeyCode::Char(c) if search_focused && !ctrl && !alt => Action::Type(c),
        _ => Action::Ignore,
    }
}

pub struct App {
    pub controller: ViewController,
    /// Suggestion picked with Up/Down, if any.
    pub highlighted: Option<usize>,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: ViewController) -> Self {
        Self { controller, highlighted: None, should_quit: false }
    }

    pub async fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        city: Option<String>,
    ) -> Result<()> {
        let (tx, mut rx) = unbounded_channel();

        self.controller.focus_search();
        if let Some(city) = city {
            self.controller.input(city, Instant::now());
            if let Some(pending) = self.controller.key(Key::Enter) {
                self.spawn_query(pending, &tx);
            }
        }

        loop {
            while let Ok(finished) = rx.try_recv() {
                self.finish(finished);
            }
            self.draw(terminal)?;

            let now = Instant::now();
            let timeout = self
                .controller
                .next_deadline()
                .map_or(TICK_RATE, |at| at.saturating_duration_since(now).min(TICK_RATE));

            if event::poll(timeout).context("Failed to poll terminal events")? {
                if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                    if key.kind == KeyEventKind::Press {
                        let action = map_key(key, self.controller.state().search.focused);
                        match self.handle_action(action, Instant::now()) {
                            Some(Work::Query(pending)) => self.spawn_query(pending, &tx),
                            Some(Work::Locate) => {
                                if let Some(pending) = self.controller.begin_locate() {
                                    self.spawn_locate(pending, &tx);
                                }
                            }
                            None => {}
                        }
                    }
                }
            }

            for due in self.controller.poll_due(Instant::now()) {
                self.spawn_due(due, &tx);
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn draw(&self, terminal: &mut DefaultTerminal) -> Result<()> {
        let screen = self.controller.screen(&RenderContext::local());
        terminal
            .draw(|frame| ui::draw(frame, &screen, self.highlighted))
            .context("Failed to draw dashboard")?;
        Ok(())
    }

    fn finish(&mut self, finished: Finished) {
        match finished {
            Finished::Weather(resolved) => {
                self.controller.apply(resolved);
            }
            Finished::Suggestions(suggested) => {
                if self.controller.apply_suggestions(suggested) {
                    self.highlighted = None;
                }
            }
        }
    }

    // Network work runs in the background so typing stays responsive. A send
    // fails only once the dashboard has exited and dropped the receiver.
    fn spawn_query(&self, pending: PendingQuery, tx: &UnboundedSender<Finished>) {
        let backend = self.controller.backend();
        let tx = tx.clone();
        tokio::spawn(async move {
            let resolved = pending.run(backend.as_ref()).await;
            let _ = tx.send(Finished::Weather(resolved));
        });
    }

    fn spawn_locate(&self, pending: PendingLocate, tx: &UnboundedSender<Finished>) {
        let backend = self.controller.backend();
        let geolocator = self.controller.geolocator();
        let tx = tx.clone();
        tokio::spawn(async move {
            let resolved = pending.run(geolocator.as_ref(), backend.as_ref()).await;
            let _ = tx.send(Finished::Weather(resolved));
        });
    }

    fn spawn_due(&self, due: Due, tx: &UnboundedSender<Finished>) {
        let backend = self.controller.backend();
        let tx = tx.clone();
        tokio::spawn(async move {
            let finished = match due {
                Due::Suggest(pending) => Finished::Suggestions(pending.run(backend.as_ref()).await),
                Due::Refresh(pending) => Finished::Weather(pending.run(backend.as_ref()).await),
            };
            let _ = tx.send(finished);
        });
    }

    fn suggestion_count(&self) -> usize {
        let list = &self.controller.state().suggestions;
        if list.visible { list.items.len() } else { 0 }
    }

    fn handle_action(&mut self, action: Action, now: Instant) -> Option<Work> {
        let count = self.suggestion_count();

        match action {
            Action::Controller(Key::Enter) => {
                let pending = match self.highlighted.take().filter(|&i| i < count) {
                    Some(index) => self.controller.choose_suggestion(index),
                    None => self.controller.key(Key::Enter),
                };
                pending.map(Work::Query)
            }
            Action::Controller(key) => {
                self.highlighted = None;
                self.controller.key(key).map(Work::Query)
            }
            Action::Type(c) => {
                let search = &self.controller.state().search;
                let mut text = if search.selected { String::new() } else { search.text.clone() };
                text.push(c);
                self.highlighted = None;
                self.controller.input(text, now);
                None
            }
            Action::Erase => {
                let search = &self.controller.state().search;
                let mut text = if search.selected { String::new() } else { search.text.clone() };
                text.pop();
                self.highlighted = None;
                self.controller.input(text, now);
                None
            }
            Action::HighlightNext if count > 0 => {
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % count));
                None
            }
            Action::HighlightPrev if count > 0 => {
                self.highlighted = Some(match self.highlighted {
                    Some(0) | None => count - 1,
                    Some(i) => i - 1,
                });
                None
            }
            Action::Accept if count > 0 => {
                let index = self.highlighted.take().unwrap_or(0).min(count - 1);
                self.controller.choose_suggestion(index).map(Work::Query)
            }
            Action::Accept => {
                if self.controller.state().search.focused {
                    self.controller.blur_search();
                } else {
                    self.controller.focus_search();
                }
                None
            }
            Action::Locate => Some(Work::Locate),
            Action::ToggleTheme => {
                let theme = self.controller.toggle_theme();
                tracing::info!(%theme, "theme toggled");
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::HighlightNext | Action::HighlightPrev | Action::Ignore => None,
        }
    }
}
