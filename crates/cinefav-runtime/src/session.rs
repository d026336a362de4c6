//! The session driver: one event loop around the [`Controller`].
//!
//! Messages are processed strictly one at a time. Remote calls run as
//! spawned tasks that post their outcome back into the loop, so typing and
//! navigation keep flowing while requests are in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use cinefav_api::traits::{FavoritesStore, MovieSearch};
use cinefav_core::debounce::Debouncer;
use cinefav_core::location::Location;
use cinefav_core::models::MovieItem;

use crate::controller::{
    Controller, ControllerSettings, Effect, FavoriteChange, Message, Notification, ViewState,
};

/// Settings for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub controller: ControllerSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(600),
            controller: ControllerSettings::default(),
        }
    }
}

/// Events a front-end reacts to besides the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The location changed as a result of an in-app action.
    LocationChanged(Location),
    Notification(Notification),
}

enum Command {
    Dispatch(Message),
    Shutdown,
}

/// Cheap, cloneable handle for sending input into a running session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ViewState>,
}

impl SessionHandle {
    pub fn send(&self, message: Message) {
        let _ = self.tx.send(Command::Dispatch(message));
    }

    pub fn edit_query(&self, text: impl Into<String>) {
        self.send(Message::QueryEdited(text.into()));
    }

    pub fn navigate(&self, location: Location) {
        self.send(Message::Navigated(location));
    }

    pub fn select_recent(&self, text: impl Into<String>) {
        self.send(Message::RecentSelected(text.into()));
    }

    pub fn toggle_favorite(&self, item: MovieItem) {
        self.send(Message::ToggleFavorite(item));
    }

    pub fn request_search_page(&self, page: u32) {
        self.send(Message::SearchPageRequested(page));
    }

    pub fn request_favorites_page(&self, page: u32) {
        self.send(Message::FavoritesPageRequested(page));
    }

    /// Stop the event loop. In-flight requests are left to finish on their own.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }

    /// Latest view state.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Receiver notified after every processed message.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }
}

/// Start a session on the current tokio runtime.
///
/// Returns the input handle, the event stream, and the loop's join handle.
pub fn spawn<S, F>(
    settings: SessionSettings,
    location: Location,
    search: S,
    favorites: F,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<SessionEvent>,
    JoinHandle<()>,
)
where
    S: MovieSearch + 'static,
    F: FavoritesStore + 'static,
{
    let (controller, initial) = Controller::new(settings.controller, location);
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(controller.snapshot());
    let (debouncer, settled_rx) = Debouncer::new(settings.debounce);

    let session = Session {
        controller,
        search: Arc::new(search),
        favorites: Arc::new(favorites),
        debouncer,
        result_tx,
        event_tx,
        view_tx,
    };
    let join = tokio::spawn(session.run(initial, cmd_rx, result_rx, settled_rx));

    (
        SessionHandle {
            tx: cmd_tx,
            view: view_rx,
        },
        event_rx,
        join,
    )
}

struct Session<S, F> {
    controller: Controller,
    search: Arc<S>,
    favorites: Arc<F>,
    debouncer: Debouncer<String>,
    /// Outcomes of spawned requests, fed back into the loop.
    result_tx: mpsc::UnboundedSender<Message>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    view_tx: watch::Sender<ViewState>,
}

impl<S, F> Session<S, F>
where
    S: MovieSearch + 'static,
    F: FavoritesStore + 'static,
{
    async fn run(
        mut self,
        initial: Vec<Effect>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut results: mpsc::UnboundedReceiver<Message>,
        mut settled: mpsc::UnboundedReceiver<String>,
    ) {
        tracing::debug!(
            location = %self.controller.location(),
            debounce_ms = self.debouncer.delay().as_millis() as u64,
            "session started"
        );
        self.execute(initial);
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Dispatch(message)) => self.dispatch(message),
                    // Shut down explicitly or once every handle is gone.
                    Some(Command::Shutdown) | None => break,
                },
                Some(message) = results.recv() => self.dispatch(message),
                Some(value) = settled.recv() => self.dispatch(Message::QuerySettled(value)),
            }
        }

        self.debouncer.cancel();
        tracing::debug!("session stopped");
    }

    fn dispatch(&mut self, message: Message) {
        let effects = self.controller.update(message);
        self.execute(effects);
        self.publish();
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.controller.snapshot());
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Debounce(text) => self.debouncer.push(text),
                Effect::Search { seq, query, page } => self.spawn_search(seq, query, page),
                Effect::LoadFavorites { seq, page, limit } => {
                    self.spawn_load_favorites(seq, page, limit)
                }
                Effect::AddFavorite(item) => self.spawn_toggle(FavoriteChange::Added(item)),
                Effect::RemoveFavorite(item) => self.spawn_toggle(FavoriteChange::Removed(item)),
                Effect::UpdateLocation(location) => {
                    tracing::debug!(%location, "location updated");
                    let _ = self.event_tx.send(SessionEvent::LocationChanged(location));
                }
                Effect::Notify(notification) => {
                    let _ = self.event_tx.send(SessionEvent::Notification(notification));
                }
            }
        }
    }

    fn spawn_search(&self, seq: u64, query: String, page: u32) {
        let search = Arc::clone(&self.search);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = search.search(&query, page).await.map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(query = %query, page, "search request failed: {e}");
            }
            let _ = tx.send(Message::SearchLoaded { seq, result });
        });
    }

    fn spawn_load_favorites(&self, seq: u64, page: u32, limit: u32) {
        let favorites = Arc::clone(&self.favorites);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = favorites.list(page, limit).await.map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(page, "favorites request failed: {e}");
            }
            let _ = tx.send(Message::FavoritesLoaded { seq, page, result });
        });
    }

    fn spawn_toggle(&self, change: FavoriteChange) {
        let favorites = Arc::clone(&self.favorites);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = match &change {
                FavoriteChange::Added(item) => favorites.add(item).await,
                FavoriteChange::Removed(item) => favorites.remove(&item.id).await,
            }
            .map_err(|e| e.to_string());
            let _ = tx.send(Message::FavoriteToggled { change, result });
        });
    }
}
