//! Services layer (ports + adapters).
//!
//! - `bus`: one-way preview bridge channel.
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: OS/runtime specific implementations (IO/async).

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{
    preview_bridge, BridgeEnvelope, BridgeMessage, BridgeReceiver, BridgeSender, RunId, Severity,
};
