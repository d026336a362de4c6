use std::time::Duration;

use anyhow::Context;
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tokio::time::Instant;

use cinefav_core::models::MovieItem;
use cinefav_runtime::{SessionEvent, SessionHandle, ViewState};

use crate::commands::{self, Action, Command, Mode, Pane};
use crate::poster::{self, PosterCache};
use crate::toast::{ToastKind, Toasts};
use crate::view::{self, Cursor, Screen};
use crate::widgets::Pagination;

/// How long the input thread blocks before checking whether the app is gone.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Terminal front-end state: a thin layer over the session handle.
pub struct App {
    handle: SessionHandle,
    view: ViewState,
    mode: Mode,
    /// The search box. Every edit is forwarded to the session as typed.
    query: String,
    command: String,
    cursor: Cursor,
    search_pager: Pagination,
    favorites_pager: Pagination,
    toasts: Toasts,
    posters: PosterCache,
    http: reqwest::Client,
    poster_tx: mpsc::UnboundedSender<(String, bool)>,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl App {
    /// Returns the app and the receiver for poster check outcomes.
    pub fn new(
        handle: SessionHandle,
        http: reqwest::Client,
        toast_ttl: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<(String, bool)>) {
        let (poster_tx, poster_rx) = mpsc::unbounded_channel();
        let view = handle.view();
        let mut app = Self {
            handle,
            view: ViewState::default(),
            mode: Mode::Query,
            query: view.query.clone(),
            command: String::new(),
            cursor: Cursor::default(),
            search_pager: Pagination::default(),
            favorites_pager: Pagination::default(),
            toasts: Toasts::new(toast_ttl),
            posters: PosterCache::default(),
            http,
            poster_tx,
        };
        app.apply_view(view);
        (app, poster_rx)
    }

    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
        mut posters: mpsc::UnboundedReceiver<(String, bool)>,
    ) -> anyhow::Result<()> {
        let mut input = spawn_input_reader();
        let mut view_rx = self.handle.subscribe();

        loop {
            terminal
                .draw(|frame| view::draw(frame, &self.screen()))
                .context("Failed to draw terminal frame")?;

            let expiry = self.toasts.next_expiry();
            tokio::select! {
                event = input.recv() => match event {
                    Some(Ok(Event::Key(key))) => {
                        if self.handle_key(key) == Flow::Quit {
                            break;
                        }
                    }
                    // Resize: the next draw picks up the new size.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.handle.shutdown();
                        return Err(e).context("Failed to read terminal event");
                    }
                    None => break,
                },
                changed = view_rx.changed() => {
                    if changed.is_err() {
                        tracing::warn!("session ended unexpectedly");
                        break;
                    }
                    let view = view_rx.borrow_and_update().clone();
                    self.apply_view(view);
                }
                Some(event) = events.recv() => self.handle_event(event),
                Some((url, loaded)) = posters.recv() => self.posters.resolve(url, loaded),
                _ = tokio::time::sleep_until(expiry.unwrap_or_else(Instant::now)), if expiry.is_some() => {
                    self.toasts.expire(Instant::now());
                }
            }
        }

        self.handle.shutdown();
        Ok(())
    }

    fn screen(&self) -> Screen<'_> {
        Screen {
            view: &self.view,
            query: &self.query,
            command: &self.command,
            mode: self.mode,
            cursor: self.cursor,
            search_pager: &self.search_pager,
            favorites_pager: &self.favorites_pager,
            posters: &self.posters,
            toasts: &self.toasts,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match commands::key_action(self.mode, key) {
            Some(action) => {
                tracing::trace!(?action, mode = ?self.mode, "key");
                self.apply(action)
            }
            None => Flow::Continue,
        }
    }

    fn apply(&mut self, action: Action) -> Flow {
        if action == Action::Quit {
            return Flow::Quit;
        }
        match self.mode {
            Mode::Query => self.apply_query(action),
            Mode::Browse(pane) => self.apply_browse(pane, action),
            Mode::Jump(pane) => self.apply_jump(pane, action),
            Mode::Command(pane) => return self.apply_command(pane, action),
        }
        Flow::Continue
    }

    fn apply_query(&mut self, action: Action) {
        match action {
            Action::Insert(c) => {
                self.query.push(c);
                self.handle.edit_query(self.query.clone());
            }
            Action::Backspace => {
                if self.query.pop().is_some() {
                    self.handle.edit_query(self.query.clone());
                }
            }
            Action::ClearInput | Action::Cancel => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.handle.edit_query("");
                }
            }
            Action::Submit | Action::FocusNext => self.mode = Mode::Browse(Pane::Results),
            Action::FocusPrev => self.mode = Mode::Browse(Pane::Favorites),
            _ => {}
        }
    }

    fn apply_browse(&mut self, pane: Pane, action: Action) {
        match action {
            Action::Up => match pane {
                Pane::Results if self.cursor.results == 0 => self.mode = Mode::Query,
                Pane::Results => self.cursor.results -= 1,
                Pane::Favorites => self.cursor.favorites = self.cursor.favorites.saturating_sub(1),
            },
            Action::Down => {
                let len = self.items(pane).len();
                let row = self.row_mut(pane);
                if *row + 1 < len {
                    *row += 1;
                }
            }
            Action::Toggle => {
                let row = match pane {
                    Pane::Results => self.cursor.results,
                    Pane::Favorites => self.cursor.favorites,
                };
                if let Some(item) = self.items(pane).get(row) {
                    self.handle.toggle_favorite(item.clone());
                }
            }
            Action::PrevPage => self.step_page(pane, Pagination::prev),
            Action::NextPage => self.step_page(pane, Pagination::next),
            Action::StartJump => {
                let len = self.items(pane).len();
                let pager = self.pager_mut(pane);
                if pager.visible(len) {
                    pager.set_input("");
                    self.mode = Mode::Jump(pane);
                }
            }
            Action::StartCommand => {
                self.command.clear();
                self.mode = Mode::Command(pane);
            }
            Action::FocusQuery => self.mode = Mode::Query,
            Action::FocusNext => {
                self.mode = match pane {
                    Pane::Results => Mode::Browse(Pane::Favorites),
                    Pane::Favorites => Mode::Query,
                }
            }
            Action::FocusPrev => {
                self.mode = match pane {
                    Pane::Results => Mode::Query,
                    Pane::Favorites => Mode::Browse(Pane::Results),
                }
            }
            _ => {}
        }
    }

    /// The jump buffer is edited on its own; only Enter turns it into a request.
    fn apply_jump(&mut self, pane: Pane, action: Action) {
        match action {
            Action::Insert(c) => self.pager_mut(pane).push_input(c),
            Action::Backspace => self.pager_mut(pane).pop_input(),
            Action::ClearInput => self.pager_mut(pane).set_input(""),
            Action::Submit => {
                let pager = self.pager_mut(pane);
                let target = pager.jump();
                if target.is_none() {
                    tracing::debug!(?pane, input = pager.input(), "ignoring out-of-range page jump");
                }
                pager.reset_input();
                if let Some(page) = target {
                    self.request_page(pane, page);
                }
                self.mode = Mode::Browse(pane);
            }
            Action::Cancel => {
                self.pager_mut(pane).reset_input();
                self.mode = Mode::Browse(pane);
            }
            _ => {}
        }
    }

    fn apply_command(&mut self, pane: Pane, action: Action) -> Flow {
        match action {
            Action::Insert(c) => self.command.push(c),
            Action::Backspace => {
                self.command.pop();
            }
            Action::ClearInput => self.command.clear(),
            Action::Cancel => self.mode = Mode::Browse(pane),
            Action::Submit => {
                let line = std::mem::take(&mut self.command);
                self.mode = Mode::Browse(pane);
                if line.trim().is_empty() {
                    return Flow::Continue;
                }
                match commands::parse(&line) {
                    Ok(command) => return self.run_command(command),
                    Err(e) => self.toasts.push(e.to_string(), ToastKind::Error),
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn run_command(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "command");

        match command {
            Command::Clear => {
                self.query.clear();
                self.handle.edit_query("");
            }
            Command::ToggleResult(n) => match self.view.search.items.get(n - 1) {
                Some(item) => self.handle.toggle_favorite(item.clone()),
                None => self.toasts.push(format!("No result #{n}"), ToastKind::Error),
            },
            Command::ToggleFavorite(n) => match self.view.favorites.items.get(n - 1) {
                Some(item) => self.handle.toggle_favorite(item.clone()),
                None => self.toasts.push(format!("No favorite #{n}"), ToastKind::Error),
            },
            Command::NextPage => self.step_page(Pane::Results, Pagination::next),
            Command::PrevPage => self.step_page(Pane::Results, Pagination::prev),
            Command::JumpPage(text) => self.jump_page(Pane::Results, &text),
            Command::NextFavoritesPage => self.step_page(Pane::Favorites, Pagination::next),
            Command::PrevFavoritesPage => self.step_page(Pane::Favorites, Pagination::prev),
            Command::JumpFavoritesPage(text) => self.jump_page(Pane::Favorites, &text),
            Command::Recent(n) => match self.view.recent.get(n - 1) {
                Some(query) => {
                    self.query = query.clone();
                    self.handle.select_recent(query.clone());
                }
                None => self.toasts.push(format!("No recent search #{n}"), ToastKind::Error),
            },
            Command::Open(location) => self.handle.navigate(location),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn jump_page(&mut self, pane: Pane, text: &str) {
        let pager = self.pager_mut(pane);
        let target = pager.jump_to(text);
        pager.reset_input();
        match target {
            Some(page) => self.request_page(pane, page),
            None => tracing::debug!(?pane, input = text, "ignoring out-of-range page jump"),
        }
    }

    /// Prev/next only act while the control is on screen.
    fn step_page(&self, pane: Pane, step: fn(&Pagination) -> Option<u32>) {
        let len = self.items(pane).len();
        let pager = match pane {
            Pane::Results => &self.search_pager,
            Pane::Favorites => &self.favorites_pager,
        };
        if !pager.visible(len) {
            return;
        }
        if let Some(page) = step(pager) {
            self.request_page(pane, page);
        }
    }

    fn request_page(&self, pane: Pane, page: u32) {
        match pane {
            Pane::Results => self.handle.request_search_page(page),
            Pane::Favorites => self.handle.request_favorites_page(page),
        }
    }

    fn items(&self, pane: Pane) -> &[MovieItem] {
        match pane {
            Pane::Results => &self.view.search.items,
            Pane::Favorites => &self.view.favorites.items,
        }
    }

    fn row_mut(&mut self, pane: Pane) -> &mut usize {
        match pane {
            Pane::Results => &mut self.cursor.results,
            Pane::Favorites => &mut self.cursor.favorites,
        }
    }

    fn pager_mut(&mut self, pane: Pane) -> &mut Pagination {
        match pane {
            Pane::Results => &mut self.search_pager,
            Pane::Favorites => &mut self.favorites_pager,
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LocationChanged(location) => {
                tracing::info!(%location, "location");
            }
            SessionEvent::Notification(notification) => {
                self.toasts.push(notification.message, notification.kind.into());
            }
        }
    }

    fn apply_view(&mut self, view: ViewState) {
        self.search_pager
            .sync(view.search.current_page, view.search.total_pages);
        self.favorites_pager
            .sync(view.favorites.current_page, view.favorites.total_pages);
        self.cursor.results = self.cursor.results.min(view.search.items.len().saturating_sub(1));
        self.cursor.favorites = self
            .cursor
            .favorites
            .min(view.favorites.items.len().saturating_sub(1));
        // While typing, the local buffer is ahead of the session.
        if self.mode != Mode::Query {
            self.query.clone_from(&view.query);
        }

        let pending = self
            .posters
            .request(view.search.items.iter().chain(&view.favorites.items));
        for url in pending {
            let http = self.http.clone();
            let tx = self.poster_tx.clone();
            tokio::spawn(async move {
                let loaded = poster::check(&http, &url).await;
                let _ = tx.send((url, loaded));
            });
        }

        self.view = view;
    }
}

/// Read terminal events on a blocking thread and forward key presses and
/// resizes. The thread exits once the receiver is dropped.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<std::io::Result<Event>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while !tx.is_closed() {
            let event = match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => event::read(),
                Err(e) => Err(e),
            };
            let forward = match &event {
                Ok(Event::Key(key)) => key.kind == KeyEventKind::Press,
                Ok(Event::Resize(..)) => true,
                Ok(_) => false,
                Err(_) => true,
            };
            let failed = event.is_err();
            if forward && tx.send(event).is_err() {
                break;
            }
            if failed {
                break;
            }
        }
    });
    rx
}
