//! Async runtime adapter: executes IO effects and sends messages back to the store.

mod message;
mod runtime;

pub use message::AppMessage;
pub use runtime::AsyncRuntime;
