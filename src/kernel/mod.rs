//! Headless workspace core (state/action/effect).

pub mod action;
pub mod console;
pub mod effect;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use console::{ConsoleEntry, ConsoleState};
pub use effect::Effect;
pub use state::{AppState, PreviewState};
pub use store::{DispatchResult, Store, StoreError};
