//! Client state machine and the async session that drives it.

pub mod controller;
pub mod session;

pub use controller::{
    Controller, ControllerSettings, Effect, FavoriteChange, Message, Notification,
    NotificationKind, ViewState,
};
pub use session::{spawn, SessionEvent, SessionHandle, SessionSettings};
