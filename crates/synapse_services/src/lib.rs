//! Synapse Services Layer
//!
//! Host-side plumbing around the field: pointer/scroll signals, listener
//! lifetimes and settings files.

pub mod input;
pub mod settings;
pub mod signals;

pub use input::{InputChannel, Viewport};
pub use settings::{DisplaySettings, Settings, SettingsError};
pub use signals::{Signal, SignalBus, Subscription};
