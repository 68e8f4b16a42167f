//! Interactive console.
//!
//! A line-driven terminal front end for the mail log: a live message list,
//! the selected message in one of its source views and a notice line.
//! [`state::Console`] holds the state, [`runtime::run`] drives it.

pub mod input;
pub mod layout;
pub mod list;
pub mod loader;
pub mod notice;
pub mod prefs;
pub mod render;
pub mod runtime;
pub mod state;

pub use loader::LoadGuard;
pub use prefs::ViewPrefs;
pub use runtime::{ConsoleOptions, run};
pub use state::{Action, Console, Request};
