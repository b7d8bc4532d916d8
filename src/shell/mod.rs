//! Login gate, apology dialog and music transport around the scene.

mod apology;
mod login;
mod playlist;
mod ui;

pub use apology::{ApologyDialog, Choice, DialogState, MessageLength, LONG_MESSAGE, SHORT_MESSAGE};
pub use login::{Credentials, LoginGate, LOGIN_ERROR};
pub use playlist::{default_playlist, Track, Transport};
pub use ui::{ShellEvent, ShellUi};
